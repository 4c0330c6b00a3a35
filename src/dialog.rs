//! Modal confirm dialogs
//!
//! At most one dialog is shown at a time. While one is shown it consumes every
//! key; the session stops ticking until it resolves. The overlay is plain state:
//! the render adapter is told what to show through a [`DialogView`].

use serde::{Deserialize, Serialize};

use crate::platform::DialogView;
use crate::sim::Key;

/// Which dialog is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DialogKind {
    #[default]
    None,
    /// "Exit Game?" - left: No, right: Yes
    ExitConfirm,
    /// "Play Again?" - left: Yes (restart), right: No (exit)
    GameOverConfirm,
}

/// What the session should do after a key reached the dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogAction {
    /// Key had no meaning here
    Ignored,
    /// Selection moved to the other button
    Toggled,
    /// Close the dialog and keep playing
    Resume,
    /// Close the dialog and start a new run
    Restart,
    /// Tear the session down
    Exit,
}

/// Dialog layer state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DialogOverlay {
    kind: DialogKind,
    /// false = left button, true = right button
    selection: bool,
}

impl DialogOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(&self) -> DialogKind {
        self.kind
    }

    pub fn is_shown(&self) -> bool {
        self.kind != DialogKind::None
    }

    /// 0 = left button, 1 = right button
    pub fn selection(&self) -> u8 {
        self.selection as u8
    }

    /// Show a dialog with the left button selected. No-op (returns false) if a
    /// dialog is already shown.
    pub fn open(&mut self, kind: DialogKind) -> bool {
        if self.is_shown() || kind == DialogKind::None {
            return false;
        }
        self.kind = kind;
        self.selection = false;
        true
    }

    /// Hide whatever is shown; returns false if nothing was
    pub fn close(&mut self) -> bool {
        let was_shown = self.is_shown();
        *self = Self::default();
        was_shown
    }

    pub fn toggle(&mut self) {
        if self.is_shown() {
            self.selection = !self.selection;
        }
    }

    /// Interpret a key; the caller applies the returned action
    pub fn handle_key(&mut self, key: Key) -> DialogAction {
        match (self.kind, key) {
            (DialogKind::None, _) => DialogAction::Ignored,
            (_, Key::Left | Key::Right) => {
                self.toggle();
                DialogAction::Toggled
            }
            (DialogKind::ExitConfirm, Key::Enter) => {
                if self.selection {
                    DialogAction::Exit
                } else {
                    DialogAction::Resume
                }
            }
            (DialogKind::ExitConfirm, Key::Esc) => DialogAction::Resume,
            (DialogKind::GameOverConfirm, Key::Enter) => {
                if self.selection {
                    DialogAction::Exit
                } else {
                    DialogAction::Restart
                }
            }
            _ => DialogAction::Ignored,
        }
    }

    /// Render description, or `None` when hidden
    pub fn view(&self, high_score: u16, score: u16) -> Option<DialogView> {
        let (title, left_label, right_label) = match self.kind {
            DialogKind::None => return None,
            DialogKind::ExitConfirm => ("Exit Game?", "NO", "YES"),
            DialogKind::GameOverConfirm => ("Play Again?", "YES", "NO"),
        };
        Some(DialogView {
            kind: self.kind,
            selection: self.selection(),
            title,
            left_label,
            right_label,
            high_score,
            score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_one_dialog_at_a_time() {
        let mut overlay = DialogOverlay::new();
        assert!(overlay.open(DialogKind::ExitConfirm));
        assert!(!overlay.open(DialogKind::GameOverConfirm));
        assert_eq!(overlay.kind(), DialogKind::ExitConfirm);
        assert!(overlay.close());
        assert!(!overlay.close());
        assert!(!overlay.open(DialogKind::None));
    }

    #[test]
    fn test_exit_dialog_keys() {
        let mut overlay = DialogOverlay::new();
        overlay.open(DialogKind::ExitConfirm);
        assert_eq!(overlay.selection(), 0);
        assert_eq!(overlay.handle_key(Key::Enter), DialogAction::Resume);
        assert_eq!(overlay.handle_key(Key::Right), DialogAction::Toggled);
        assert_eq!(overlay.selection(), 1);
        assert_eq!(overlay.handle_key(Key::Up), DialogAction::Ignored);
        assert_eq!(overlay.handle_key(Key::Enter), DialogAction::Exit);
        assert_eq!(overlay.handle_key(Key::Left), DialogAction::Toggled);
        assert_eq!(overlay.selection(), 0);
        assert_eq!(overlay.handle_key(Key::Esc), DialogAction::Resume);
    }

    #[test]
    fn test_game_over_dialog_keys() {
        let mut overlay = DialogOverlay::new();
        overlay.open(DialogKind::GameOverConfirm);
        assert_eq!(overlay.handle_key(Key::Esc), DialogAction::Ignored);
        assert_eq!(overlay.handle_key(Key::Down), DialogAction::Ignored);
        assert_eq!(overlay.handle_key(Key::Enter), DialogAction::Restart);
        overlay.handle_key(Key::Left);
        assert_eq!(overlay.handle_key(Key::Enter), DialogAction::Exit);
    }

    #[test]
    fn test_reopen_resets_selection() {
        let mut overlay = DialogOverlay::new();
        overlay.open(DialogKind::ExitConfirm);
        overlay.toggle();
        overlay.close();
        overlay.open(DialogKind::ExitConfirm);
        assert_eq!(overlay.selection(), 0);
    }

    #[test]
    fn test_hidden_overlay_ignores_keys() {
        let mut overlay = DialogOverlay::new();
        assert_eq!(overlay.handle_key(Key::Enter), DialogAction::Ignored);
        overlay.toggle();
        assert_eq!(overlay.selection(), 0);
        assert!(overlay.view(0, 0).is_none());
    }

    #[test]
    fn test_view_labels() {
        let mut overlay = DialogOverlay::new();
        overlay.open(DialogKind::GameOverConfirm);
        let view = overlay.view(40, 12).unwrap();
        assert_eq!(view.title, "Play Again?");
        assert_eq!((view.left_label, view.right_label), ("YES", "NO"));
        assert_eq!((view.high_score, view.score), (40, 12));
    }
}
