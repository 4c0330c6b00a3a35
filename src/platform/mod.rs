//! Host boundary
//!
//! The engine never draws, owns a timer, or navigates screens. It drives the
//! host through these traits:
//! - `RenderAdapter`: positions, visibility and text of host-owned widgets
//! - `TickScheduler`: the periodic timer that calls back into the session
//! - `Navigator`: the screen stack the session returns to on exit
//! - `KvStore` (see `persistence`): where the high score lives

pub mod headless;

use serde::{Deserialize, Serialize};

use crate::dialog::DialogKind;
use crate::persistence::KvStore;

/// Opaque id of a host-owned visual entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityHandle(pub u16);

/// Runner actor
pub const ACTOR_HANDLE: EntityHandle = EntityHandle(0);
/// Runner ground obstacle slot
pub const GROUND_OBSTACLE_HANDLE: EntityHandle = EntityHandle(1);
/// Runner air obstacle slot
pub const AIR_OBSTACLE_HANDLE: EntityHandle = EntityHandle(2);
/// Snake food marker
pub const FOOD_HANDLE: EntityHandle = EntityHandle(0);
/// First snake segment; segment `i` is `FIRST_SEGMENT_HANDLE + i`
pub const FIRST_SEGMENT_HANDLE: EntityHandle = EntityHandle(1);

/// Text widgets the engine writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextHandle {
    Score,
}

/// What a shown dialog should display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogView {
    pub kind: DialogKind,
    /// 0 = left button, 1 = right button
    pub selection: u8,
    pub title: &'static str,
    pub left_label: &'static str,
    pub right_label: &'static str,
    /// Best score so far (game-over dialog)
    pub high_score: u16,
    /// Score of the run that just ended (game-over dialog)
    pub score: u16,
}

/// Reflects engine state into the host's widget tree
pub trait RenderAdapter {
    fn set_entity_position(&mut self, handle: EntityHandle, x: i32, y: i32);
    fn set_entity_visible(&mut self, handle: EntityHandle, visible: bool);
    fn set_text(&mut self, handle: TextHandle, text: &str);
    /// Show, update (`Some`) or release (`None`) the dialog overlay
    fn present_dialog(&mut self, _dialog: Option<&DialogView>) {}
}

/// Periodic timer driving `GameSession::on_tick`
pub trait TickScheduler {
    /// Start or retune the timer
    fn set_period(&mut self, period_ms: u32);
    /// Stop delivering ticks
    fn cancel(&mut self);
}

/// Screen stack owned by the host
pub trait Navigator {
    /// Leave the game screen and re-enter the previous one
    fn go_back(&mut self);
}

/// Everything a session needs from its host
pub trait Host: RenderAdapter + TickScheduler + Navigator + KvStore {}

impl<T: RenderAdapter + TickScheduler + Navigator + KvStore> Host for T {}
