//! Per-tick dispatch across game variants
//!
//! The session owns one `VariantState` and forwards ticks, control keys and
//! restarts here without caring which game is loaded.

use serde::{Deserialize, Serialize};

use super::rng::RandomSource;
use super::runner::RunnerState;
use super::snake::SnakeState;
use super::state::{Key, TickOutcome, Variant};
use crate::settings::GameConfig;

/// State of whichever game the session plays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VariantState {
    Runner(RunnerState),
    Snake(SnakeState),
}

impl VariantState {
    /// Opening state for a variant
    pub fn new(variant: Variant, config: &GameConfig, rng: &mut dyn RandomSource) -> Self {
        match variant {
            Variant::Runner => VariantState::Runner(RunnerState::new(&config.runner)),
            Variant::Snake => VariantState::Snake(SnakeState::new(&config.snake, rng)),
        }
    }

    pub fn variant(&self) -> Variant {
        match self {
            VariantState::Runner(_) => Variant::Runner,
            VariantState::Snake(_) => Variant::Snake,
        }
    }

    pub fn score(&self) -> u16 {
        match self {
            VariantState::Runner(r) => r.score,
            VariantState::Snake(s) => s.score,
        }
    }

    /// Obstacle speed for the runner, ticks per second for the snake
    pub fn speed(&self) -> u32 {
        match self {
            VariantState::Runner(r) => r.speed as u32,
            VariantState::Snake(s) => 1000 / s.period_ms.max(1),
        }
    }

    /// Current tick period the scheduler should run at
    pub fn period_ms(&self, config: &GameConfig) -> u32 {
        match self {
            VariantState::Runner(_) => config.runner.tick_period_ms,
            VariantState::Snake(s) => s.period_ms,
        }
    }

    /// Advance one simulation step
    pub fn tick(&mut self, rng: &mut dyn RandomSource, config: &GameConfig) -> TickOutcome {
        match self {
            VariantState::Runner(r) => r.tick(rng, &config.runner),
            VariantState::Snake(s) => s.tick(rng, &config.snake),
        }
    }

    /// Gameplay keys (no dialog shown); returns true if the key had an effect
    pub fn handle_key(&mut self, key: Key, config: &GameConfig) -> bool {
        match self {
            VariantState::Runner(r) => r.handle_key(key, &config.runner),
            VariantState::Snake(s) => s.handle_key(key),
        }
    }

    /// Reset in place for another run
    pub fn restart(&mut self, rng: &mut dyn RandomSource, config: &GameConfig) {
        match self {
            VariantState::Runner(r) => r.restart(&config.runner),
            VariantState::Snake(s) => s.restart(&config.snake, rng),
        }
    }
}
