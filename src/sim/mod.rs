//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One step per externally delivered tick
//! - Randomness only through an injected `RandomSource`
//! - No rendering, storage or platform dependencies

pub mod collision;
pub mod rng;
pub mod runner;
pub mod snake;
pub mod state;
pub mod tick;

pub use collision::{Aabb, boxes_collide, hits_body, hits_wall};
pub use rng::{Lfsr16, PcgSource, RandomSource, ScriptedSource, session_seed};
pub use runner::{Actor, Obstacle, ObstacleKind, RunnerState};
pub use snake::{Cell, Direction, SnakeState};
pub use state::{Key, SessionState, TickOutcome, Variant};
pub use tick::VariantState;
