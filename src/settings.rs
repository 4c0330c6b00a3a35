//! Game tuning and configuration
//!
//! Loaded from a JSON file; any field left out falls back to the handheld
//! defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure to read or accept a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Runner physics and pacing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerTuning {
    /// Upward velocity applied by a jump
    pub jump_velocity: f32,
    /// Subtracted from vertical velocity every airborne tick
    pub gravity: f32,
    /// Cap on downward velocity
    pub max_fall_speed: f32,
    /// Horizontal velocity added per left/right press
    pub move_speed: f32,
    /// Scale on `move_speed` while airborne
    pub air_control: f32,
    /// Horizontal velocity multiplier per grounded tick
    pub ground_friction: f32,
    /// Horizontal velocity multiplier per airborne tick
    pub air_friction: f32,
    /// Grounded speeds below this snap to zero
    pub stop_threshold: f32,
    /// Actor x at start and after restart
    pub start_x: f32,
    /// Obstacle speed at start
    pub start_speed: u8,
    /// Obstacle speed cap
    pub max_speed: u8,
    /// Speed rises by one each time the score is a multiple of this
    pub speed_up_every: u16,
    /// Obstacles past this x are recycled
    pub despawn_x: i32,
    /// Respawn distance beyond the right edge
    pub spawn_gap: i32,
    /// Random extra respawn distance (exclusive upper bound)
    pub spawn_jitter: u16,
    /// Inward shrink applied to each hitbox before overlap testing
    pub collision_inset: i32,
    /// Tick period in milliseconds
    pub tick_period_ms: u32,
}

impl Default for RunnerTuning {
    fn default() -> Self {
        Self {
            jump_velocity: 13.0,
            gravity: 1.0,
            max_fall_speed: 20.0,
            move_speed: 3.0,
            air_control: 0.8,
            ground_friction: 0.85,
            air_friction: 0.95,
            stop_threshold: 0.1,
            start_x: 20.0,
            start_speed: 4,
            max_speed: 30,
            speed_up_every: 2,
            despawn_x: -40,
            spawn_gap: 50,
            spawn_jitter: 100,
            collision_inset: 5,
            tick_period_ms: 20,
        }
    }
}

/// Snake grid and pacing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeTuning {
    pub grid_width: u8,
    pub grid_height: u8,
    /// Body length at start and after restart
    pub initial_length: u8,
    /// Tick period at start
    pub tick_period_ms: u32,
    /// Fastest allowed tick period
    pub min_tick_period_ms: u32,
    /// Period reduction per speed-up step
    pub period_step_ms: u32,
    /// A speed-up step happens each time the score is a multiple of this
    pub speed_up_every: u16,
}

impl Default for SnakeTuning {
    fn default() -> Self {
        Self {
            grid_width: 23,
            grid_height: 8,
            initial_length: 3,
            tick_period_ms: 300,
            min_tick_period_ms: 100,
            period_step_ms: 20,
            speed_up_every: 5,
        }
    }
}

impl SnakeTuning {
    /// Number of cells on the board
    pub fn area(&self) -> usize {
        self.grid_width as usize * self.grid_height as usize
    }

    /// Tick period for a given score
    pub fn period_for_score(&self, score: u16) -> u32 {
        let steps = (score / self.speed_up_every.max(1)) as u32;
        self.tick_period_ms
            .saturating_sub(steps.saturating_mul(self.period_step_ms))
            .max(self.min_tick_period_ms)
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub runner: RunnerTuning,
    pub snake: SnakeTuning,
}

impl GameConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let r = &self.runner;
        if r.tick_period_ms == 0 {
            return Err(ConfigError::Invalid("runner tick period must be positive".into()));
        }
        if r.speed_up_every == 0 {
            return Err(ConfigError::Invalid("runner speed_up_every must be positive".into()));
        }
        if r.start_speed == 0 || r.start_speed > r.max_speed {
            return Err(ConfigError::Invalid(format!(
                "runner start speed {} must be in 1..={}",
                r.start_speed, r.max_speed
            )));
        }
        if r.spawn_jitter == 0 {
            return Err(ConfigError::Invalid("runner spawn_jitter must be positive".into()));
        }

        let s = &self.snake;
        if s.tick_period_ms == 0 || s.min_tick_period_ms == 0 {
            return Err(ConfigError::Invalid("snake tick periods must be positive".into()));
        }
        if s.min_tick_period_ms > s.tick_period_ms {
            return Err(ConfigError::Invalid(
                "snake min tick period exceeds the start period".into(),
            ));
        }
        if s.speed_up_every == 0 {
            return Err(ConfigError::Invalid("snake speed_up_every must be positive".into()));
        }
        if s.initial_length < 3 {
            return Err(ConfigError::Invalid("snake needs at least 3 segments".into()));
        }
        // Initial body is laid out leftward from the middle column
        if s.initial_length as usize > s.grid_width as usize / 2 + 1 || s.grid_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "snake of length {} does not fit a {}x{} grid",
                s.initial_length, s.grid_width, s.grid_height
            )));
        }
        if s.area() < s.initial_length as usize + 1 {
            return Err(ConfigError::Invalid("snake grid has no room for food".into()));
        }
        Ok(())
    }

    /// Pretty JSON, for `--dump-config` style tooling
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GameConfig::from_json_str(r#"{ "snake": { "grid_width": 10 } }"#).unwrap();
        assert_eq!(config.snake.grid_width, 10);
        assert_eq!(config.snake.grid_height, 8);
        assert_eq!(config.runner, RunnerTuning::default());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = GameConfig::default();
        let json = config.to_json().unwrap();
        assert_eq!(GameConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = GameConfig::from_json_str(r#"{ "snake": { "initial_length": 2 } }"#);
        assert!(matches!(err, Err(ConfigError::Invalid(_))));

        let err = GameConfig::from_json_str(r#"{ "snake": { "grid_width": 3 } }"#);
        assert!(matches!(err, Err(ConfigError::Invalid(_))));

        let err = GameConfig::from_json_str(r#"{ "runner": { "tick_period_ms": 0 } }"#);
        assert!(matches!(err, Err(ConfigError::Invalid(_))));

        let err = GameConfig::from_json_str("not json");
        assert!(matches!(err, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let err = GameConfig::load("/nonexistent/tick-arcade.json");
        assert!(matches!(err, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_snake_period_schedule() {
        let s = SnakeTuning::default();
        assert_eq!(s.period_for_score(0), 300);
        assert_eq!(s.period_for_score(4), 300);
        assert_eq!(s.period_for_score(5), 280);
        assert_eq!(s.period_for_score(10), 260);
        assert_eq!(s.period_for_score(50), 100);
        assert_eq!(s.period_for_score(500), 100);
    }
}
