//! Tick Arcade - tick-driven engine for handheld mini-games
//!
//! Core modules:
//! - `sim`: Deterministic simulation (runner physics, snake grid, collisions, RNG)
//! - `pool`: Reusable render-entity pool
//! - `dialog`: Modal confirm dialogs that suspend the simulation
//! - `session`: Session lifecycle, input routing, high-score bookkeeping
//! - `platform`: Host boundary (render adapter, tick scheduler, navigator)
//! - `persistence`: Key-value storage for the high-score record
//! - `settings`: Data-driven game tuning

pub mod autopilot;
pub mod dialog;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod pool;
pub mod session;
pub mod settings;
pub mod sim;

pub use dialog::{DialogAction, DialogKind, DialogOverlay};
pub use highscores::HighScore;
pub use session::{GameSession, GameSnapshot};
pub use settings::{GameConfig, RunnerTuning, SnakeTuning};
pub use sim::{Key, SessionState, Variant};

/// Game configuration constants
pub mod consts {
    /// Screen dimensions (handheld display)
    pub const SCREEN_WIDTH: i32 = 384;
    pub const SCREEN_HEIGHT: i32 = 168;
    /// Distance from the bottom of the screen to the ground line
    pub const GROUND_MARGIN: i32 = 30;
    /// Screen y of the ground line
    pub const GROUND_Y: i32 = SCREEN_HEIGHT - GROUND_MARGIN;

    /// Runner actor size
    pub const ACTOR_WIDTH: i32 = 50;
    pub const ACTOR_HEIGHT: i32 = 50;

    /// Ground obstacle: a quarter of the actor's width, half its height
    pub const GROUND_OBSTACLE_WIDTH: i32 = 12;
    pub const GROUND_OBSTACLE_HEIGHT: i32 = 25;
    /// Air obstacle size
    pub const AIR_OBSTACLE_WIDTH: i32 = 40;
    pub const AIR_OBSTACLE_HEIGHT: i32 = 40;
    /// Air obstacle top sits this far above the ground obstacle's top
    pub const AIR_OBSTACLE_LIFT: i32 = 90;

    /// Snake cell size in pixels
    pub const CELL_SIZE: i32 = 16;
    /// Food marker inset inside its cell
    pub const FOOD_INSET: i32 = 3;

    /// Fixed constant mixed into every LFSR seed
    pub const LFSR_SEED: u16 = 0x1234;
}
