//! Runner variant: continuous physics against a stream of obstacles
//!
//! The actor lives in "ground space" (x to the right, y up from the ground line)
//! while obstacles and hitboxes are in screen pixels. Exactly one obstacle is
//! active at a time; the other slot waits off-screen, hidden.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, boxes_collide};
use super::rng::RandomSource;
use super::state::{Key, TickOutcome};
use crate::consts::*;
use crate::settings::RunnerTuning;

/// Obstacle flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Short block on the ground; jump over it
    Ground,
    /// Flyer at head height; stay on the ground under it
    Air,
}

impl ObstacleKind {
    /// Pick a kind from one random draw (even = ground)
    pub fn from_roll(roll: u16) -> Self {
        if roll % 2 == 0 {
            ObstacleKind::Ground
        } else {
            ObstacleKind::Air
        }
    }

    fn index(self) -> usize {
        match self {
            ObstacleKind::Ground => 0,
            ObstacleKind::Air => 1,
        }
    }
}

/// One obstacle slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    /// Left edge in screen pixels
    pub x: i32,
}

impl Obstacle {
    /// Screen y of the obstacle's top edge
    pub fn top(&self) -> i32 {
        let ground_top = GROUND_Y - GROUND_OBSTACLE_HEIGHT;
        match self.kind {
            ObstacleKind::Ground => ground_top,
            ObstacleKind::Air => ground_top - AIR_OBSTACLE_LIFT,
        }
    }

    pub fn size(&self) -> (i32, i32) {
        match self.kind {
            ObstacleKind::Ground => (GROUND_OBSTACLE_WIDTH, GROUND_OBSTACLE_HEIGHT),
            ObstacleKind::Air => (AIR_OBSTACLE_WIDTH, AIR_OBSTACLE_HEIGHT),
        }
    }

    pub fn bounds(&self) -> Aabb {
        let (w, h) = self.size();
        Aabb::from_size(self.x, self.top(), w, h)
    }
}

/// The player character
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// x: left edge in pixels, y: height above the ground line
    pub pos: Vec2,
    pub vel: Vec2,
    pub grounded: bool,
}

impl Actor {
    fn new(start_x: f32) -> Self {
        Self {
            pos: Vec2::new(start_x, 0.0),
            vel: Vec2::ZERO,
            grounded: true,
        }
    }

    /// Top-left corner in screen pixels
    pub fn screen_pos(&self) -> (i32, i32) {
        (
            self.pos.x as i32,
            GROUND_Y - ACTOR_HEIGHT - self.pos.y as i32,
        )
    }

    pub fn bounds(&self) -> Aabb {
        let (x, y) = self.screen_pos();
        Aabb::from_size(x, y, ACTOR_WIDTH, ACTOR_HEIGHT)
    }

    /// Start a jump if standing on the ground
    pub fn jump(&mut self, impulse: f32) -> bool {
        if !self.grounded {
            return false;
        }
        self.vel.y = impulse;
        self.grounded = false;
        true
    }

    /// Horizontal nudge; weaker in the air
    pub fn nudge(&mut self, delta: f32, air_control: f32) {
        let scale = if self.grounded { 1.0 } else { air_control };
        self.vel.x += delta * scale;
    }

    /// Friction, horizontal integration, screen clamp
    fn step_horizontal(&mut self, t: &RunnerTuning) {
        if self.grounded {
            self.vel.x *= t.ground_friction;
            if self.vel.x.abs() < t.stop_threshold {
                self.vel.x = 0.0;
            }
        } else {
            self.vel.x *= t.air_friction;
        }

        self.pos.x += self.vel.x;

        let max_x = (SCREEN_WIDTH - ACTOR_WIDTH) as f32;
        if self.pos.x < 0.0 {
            self.pos.x = 0.0;
            self.vel.x = 0.0;
        }
        if self.pos.x > max_x {
            self.pos.x = max_x;
            self.vel.x = 0.0;
        }
    }

    /// Gravity and landing
    fn step_vertical(&mut self, t: &RunnerTuning) {
        if self.grounded {
            return;
        }
        self.vel.y = (self.vel.y - t.gravity).max(-t.max_fall_speed);
        self.pos.y += self.vel.y;

        if self.pos.y <= 0.0 {
            self.pos.y = 0.0;
            self.vel.y = 0.0;
            self.grounded = true;
        }
    }
}

/// Complete runner state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerState {
    pub actor: Actor,
    /// Both slots, indexed by kind (ground, air)
    obstacles: [Obstacle; 2],
    /// The slot currently on screen
    pub active: ObstacleKind,
    pub score: u16,
    /// Obstacle travel per tick, in pixels
    pub speed: u8,
}

impl RunnerState {
    pub fn new(tuning: &RunnerTuning) -> Self {
        let spawn_x = SCREEN_WIDTH + tuning.spawn_gap;
        Self {
            actor: Actor::new(tuning.start_x),
            obstacles: [
                Obstacle {
                    kind: ObstacleKind::Ground,
                    x: spawn_x,
                },
                Obstacle {
                    kind: ObstacleKind::Air,
                    x: spawn_x,
                },
            ],
            active: ObstacleKind::Ground,
            score: 0,
            speed: tuning.start_speed,
        }
    }

    /// Back to the opening layout (ground obstacle first, speed and score reset)
    pub fn restart(&mut self, tuning: &RunnerTuning) {
        *self = Self::new(tuning);
    }

    pub fn obstacle(&self, kind: ObstacleKind) -> &Obstacle {
        &self.obstacles[kind.index()]
    }

    pub fn active_obstacle(&self) -> &Obstacle {
        self.obstacle(self.active)
    }

    fn active_obstacle_mut(&mut self) -> &mut Obstacle {
        &mut self.obstacles[self.active.index()]
    }

    /// Advance one tick
    pub fn tick(&mut self, rng: &mut dyn RandomSource, tuning: &RunnerTuning) -> TickOutcome {
        let mut outcome = TickOutcome {
            advanced: true,
            ..Default::default()
        };

        self.actor.step_horizontal(tuning);
        self.actor.step_vertical(tuning);

        let speed = self.speed as i32;
        let obstacle = self.active_obstacle_mut();
        obstacle.x -= speed;
        if obstacle.x < tuning.despawn_x {
            self.spawn_next(rng, tuning);
            outcome.scored = true;
        }

        if boxes_collide(
            &self.actor.bounds(),
            &self.active_obstacle().bounds(),
            tuning.collision_inset,
        ) {
            outcome.collided = true;
        }

        outcome
    }

    /// Recycle the obstacle that left the screen and award a point
    fn spawn_next(&mut self, rng: &mut dyn RandomSource, tuning: &RunnerTuning) {
        let kind = ObstacleKind::from_roll(rng.next_u16());
        let jitter = (rng.next_u16() % tuning.spawn_jitter.max(1)) as i32;
        self.active = kind;
        self.obstacles[kind.index()].x = SCREEN_WIDTH + tuning.spawn_gap + jitter;

        self.score = self.score.saturating_add(1);
        if self.score % tuning.speed_up_every.max(1) == 0 && self.speed < tuning.max_speed {
            self.speed += 1;
            log::debug!("Runner speed -> {}", self.speed);
        }
        log::debug!(
            "Spawned {:?} obstacle at x={} (score {})",
            kind,
            self.obstacles[kind.index()].x,
            self.score
        );
    }

    /// Control keys while playing; returns true if the key did anything
    pub fn handle_key(&mut self, key: Key, tuning: &RunnerTuning) -> bool {
        match key {
            Key::Enter | Key::Up => self.actor.jump(tuning.jump_velocity),
            Key::Left => {
                self.actor.nudge(-tuning.move_speed, tuning.air_control);
                true
            }
            Key::Right => {
                self.actor.nudge(tuning.move_speed, tuning.air_control);
                true
            }
            Key::Down | Key::Esc => false,
        }
    }
}
