//! Headless host that records what the engine asked for
//!
//! Used by the CLI and by tests in place of a real widget tree and timer.

use std::collections::{BTreeMap, HashMap};

use super::{DialogView, EntityHandle, Navigator, RenderAdapter, TextHandle, TickScheduler};
use crate::persistence::{KvStore, MemoryStore, StoreError};

/// Recording host backed by any `KvStore`
#[derive(Debug, Default)]
pub struct HeadlessHost<S = MemoryStore> {
    pub positions: BTreeMap<EntityHandle, (i32, i32)>,
    pub visible: BTreeMap<EntityHandle, bool>,
    pub texts: HashMap<TextHandle, String>,
    /// Dialog currently on screen
    pub dialog: Option<DialogView>,
    /// Number of times a dialog was released
    pub dialog_releases: u32,
    /// Active timer period; `None` when stopped
    pub period_ms: Option<u32>,
    /// Every period the engine requested, in order
    pub period_history: Vec<u32>,
    pub cancel_calls: u32,
    pub go_back_calls: u32,
    pub store: S,
}

impl HeadlessHost<MemoryStore> {
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new())
    }
}

impl<S> HeadlessHost<S> {
    pub fn with_store(store: S) -> Self {
        Self {
            positions: BTreeMap::new(),
            visible: BTreeMap::new(),
            texts: HashMap::new(),
            dialog: None,
            dialog_releases: 0,
            period_ms: None,
            period_history: Vec::new(),
            cancel_calls: 0,
            go_back_calls: 0,
            store,
        }
    }

    pub fn text(&self, handle: TextHandle) -> Option<&str> {
        self.texts.get(&handle).map(String::as_str)
    }

    pub fn is_visible(&self, handle: EntityHandle) -> bool {
        self.visible.get(&handle).copied().unwrap_or(false)
    }

    /// Number of entities currently shown
    pub fn visible_count(&self) -> usize {
        self.visible.values().filter(|v| **v).count()
    }

    /// True while the timer would keep firing
    pub fn timer_running(&self) -> bool {
        self.period_ms.is_some()
    }
}

impl<S> RenderAdapter for HeadlessHost<S> {
    fn set_entity_position(&mut self, handle: EntityHandle, x: i32, y: i32) {
        self.positions.insert(handle, (x, y));
    }

    fn set_entity_visible(&mut self, handle: EntityHandle, visible: bool) {
        self.visible.insert(handle, visible);
    }

    fn set_text(&mut self, handle: TextHandle, text: &str) {
        self.texts.insert(handle, text.to_string());
    }

    fn present_dialog(&mut self, dialog: Option<&DialogView>) {
        if dialog.is_none() && self.dialog.is_some() {
            self.dialog_releases += 1;
        }
        self.dialog = dialog.copied();
    }
}

impl<S> TickScheduler for HeadlessHost<S> {
    fn set_period(&mut self, period_ms: u32) {
        self.period_ms = Some(period_ms);
        self.period_history.push(period_ms);
    }

    fn cancel(&mut self) {
        self.period_ms = None;
        self.cancel_calls += 1;
    }
}

impl<S> Navigator for HeadlessHost<S> {
    fn go_back(&mut self) {
        self.go_back_calls += 1;
    }
}

impl<S: KvStore> KvStore for HeadlessHost<S> {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.store.get(key)
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.store.set(key, value)
    }
}
