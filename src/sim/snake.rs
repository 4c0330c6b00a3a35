//! Snake variant: discrete movement on a bounded grid
//!
//! The body is a ring buffer reserved for the whole board up front, so growing
//! never reallocates. Coordinates are `u8`; stepping left or up from zero wraps
//! to 255, which the wall check then rejects.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::collision::{hits_body, hits_wall};
use super::rng::RandomSource;
use super::state::{Key, TickOutcome};
use crate::settings::SnakeTuning;

/// Heading on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn from_key(key: Key) -> Option<Direction> {
        match key {
            Key::Up => Some(Direction::Up),
            Key::Down => Some(Direction::Down),
            Key::Left => Some(Direction::Left),
            Key::Right => Some(Direction::Right),
            Key::Enter | Key::Esc => None,
        }
    }
}

/// One grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: u8,
    pub y: u8,
}

impl Cell {
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Neighbor one step away (wrapping at the u8 range)
    pub fn step(self, dir: Direction) -> Cell {
        match dir {
            Direction::Up => Cell::new(self.x, self.y.wrapping_sub(1)),
            Direction::Down => Cell::new(self.x, self.y.wrapping_add(1)),
            Direction::Left => Cell::new(self.x.wrapping_sub(1), self.y),
            Direction::Right => Cell::new(self.x.wrapping_add(1), self.y),
        }
    }
}

/// Complete snake state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnakeState {
    /// Head first
    pub body: VecDeque<Cell>,
    pub direction: Direction,
    /// Applied at the start of the next tick
    pub pending_direction: Direction,
    /// `None` only when the body covers the whole board
    pub food: Option<Cell>,
    pub score: u16,
    /// Current tick period
    pub period_ms: u32,
}

impl SnakeState {
    pub fn new(tuning: &SnakeTuning, rng: &mut dyn RandomSource) -> Self {
        let mut state = Self {
            body: VecDeque::with_capacity(tuning.area()),
            direction: Direction::Right,
            pending_direction: Direction::Right,
            food: None,
            score: 0,
            period_ms: tuning.tick_period_ms,
        };
        state.lay_out(tuning);
        state.food = state.spawn_food(rng, tuning);
        state
    }

    /// Straight body heading right from the middle of the board
    fn lay_out(&mut self, tuning: &SnakeTuning) {
        let head = Cell::new(tuning.grid_width / 2, tuning.grid_height / 2);
        self.body.clear();
        for i in 0..tuning.initial_length {
            self.body.push_back(Cell::new(head.x.saturating_sub(i), head.y));
        }
    }

    /// Back to the opening layout with fresh food; keeps the body's allocation
    pub fn restart(&mut self, tuning: &SnakeTuning, rng: &mut dyn RandomSource) {
        self.direction = Direction::Right;
        self.pending_direction = Direction::Right;
        self.score = 0;
        self.period_ms = tuning.tick_period_ms;
        self.lay_out(tuning);
        self.food = self.spawn_food(rng, tuning);
    }

    pub fn head(&self) -> Cell {
        // Body is never shorter than the initial length
        self.body.front().copied().unwrap_or(Cell::new(0, 0))
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Queue a turn; reversals onto the neck are rejected
    pub fn steer(&mut self, dir: Direction) -> bool {
        if dir == self.direction.opposite() {
            return false;
        }
        self.pending_direction = dir;
        true
    }

    pub fn handle_key(&mut self, key: Key) -> bool {
        match Direction::from_key(key) {
            Some(dir) => self.steer(dir),
            None => false,
        }
    }

    /// Pick a free cell for the next food.
    ///
    /// Retries random cells until one misses the body. After a long run of misses
    /// it scans forward from the last candidate instead, so a nearly full board
    /// still terminates. Placement matches the handheld's open-ended retry loop
    /// except after `area * 8` consecutive misses.
    pub fn spawn_food(&self, rng: &mut dyn RandomSource, tuning: &SnakeTuning) -> Option<Cell> {
        let (w, h) = (tuning.grid_width, tuning.grid_height);
        let area = tuning.area();
        if self.body.len() >= area {
            log::warn!("Board full, no room for food");
            return None;
        }

        let mut candidate = Cell::new(0, 0);
        for _ in 0..area * 8 {
            candidate = Cell::new(
                (rng.next_u16() % w as u16) as u8,
                (rng.next_u16() % h as u16) as u8,
            );
            if !self.body.contains(&candidate) {
                return Some(candidate);
            }
        }

        let start = candidate.y as usize * w as usize + candidate.x as usize;
        (0..area)
            .map(|i| (start + i) % area)
            .map(|idx| Cell::new((idx % w as usize) as u8, (idx / w as usize) as u8))
            .find(|c| !self.body.contains(c))
    }

    /// Advance one tick: turn, move, collide, eat
    pub fn tick(&mut self, rng: &mut dyn RandomSource, tuning: &SnakeTuning) -> TickOutcome {
        let mut outcome = TickOutcome {
            advanced: true,
            ..Default::default()
        };

        self.direction = self.pending_direction;

        let new_head = self.head().step(self.direction);
        let Some(old_tail) = self.body.pop_back() else {
            return outcome;
        };
        // Remaining body is the pre-move body minus its tail, which moves away this tick
        let self_hit = hits_body(new_head, &self.body);
        self.body.push_front(new_head);

        if hits_wall(new_head, tuning.grid_width, tuning.grid_height) || self_hit {
            outcome.collided = true;
            return outcome;
        }

        if self.food == Some(new_head) {
            self.body.push_back(old_tail);
            self.score = self.score.saturating_add(1);
            outcome.scored = true;
            self.food = self.spawn_food(rng, tuning);

            if self.score % tuning.speed_up_every.max(1) == 0 {
                let period = tuning.period_for_score(self.score);
                if period != self.period_ms {
                    log::debug!("Snake period {} -> {} ms", self.period_ms, period);
                    self.period_ms = period;
                    outcome.period_ms = Some(period);
                }
            }
        }

        outcome
    }
}
