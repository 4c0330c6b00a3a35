//! Shared simulation types
//!
//! Everything both variants agree on: which game is running, where the session
//! is in its lifecycle, which keys exist, and what a tick reports back.

use serde::{Deserialize, Serialize};

/// Which game a session plays; fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    /// Side-scrolling jumper with ground and air obstacles
    Runner,
    /// Grid snake
    Snake,
}

impl Variant {
    /// Key-value store key holding this variant's high score
    pub fn high_score_key(&self) -> &'static str {
        match self {
            Variant::Runner => "dino_high_score",
            Variant::Snake => "snake_high_score",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Runner => "runner",
            Variant::Snake => "snake",
        }
    }
}

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Built but not started; ticks and keys are ignored
    Initializing,
    /// Simulation advancing
    Running,
    /// Suspended by the host
    Paused,
    /// Exit confirmation dialog shown
    ExitConfirm,
    /// Game-over dialog shown
    GameOverConfirm,
    /// Run ended, no dialog shown
    Over,
    /// Torn down; control returned to the host
    Closed,
}

impl SessionState {
    /// True while a dialog owns input
    pub fn is_dialog(&self) -> bool {
        matches!(self, SessionState::ExitConfirm | SessionState::GameOverConfirm)
    }
}

/// Discrete keys delivered by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Esc,
}

/// What happened during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// The variant advanced (false when the tick was a no-op)
    pub advanced: bool,
    /// Score went up this tick
    pub scored: bool,
    /// The run ended on a collision
    pub collided: bool,
    /// New tick period the scheduler should adopt
    pub period_ms: Option<u32>,
}
