//! Game session: lifecycle, input routing and host synchronization
//!
//! One `GameSession` backs one game screen. The host delivers two kinds of
//! events on the same thread: timer ticks (`on_tick`) and key presses
//! (`on_key`). Every entry point is total: in any state, any event either has
//! a defined effect or is ignored.
//!
//! ```text
//! Initializing -> Running <-> Paused
//! Running -> ExitConfirm -> Running | Closed
//! Running -> Over -> GameOverConfirm -> Running (restart) | Closed
//! ```

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::dialog::{DialogAction, DialogKind, DialogOverlay};
use crate::highscores::HighScore;
use crate::persistence::KvStore;
use crate::platform::{
    ACTOR_HANDLE, AIR_OBSTACLE_HANDLE, FIRST_SEGMENT_HANDLE, FOOD_HANDLE, GROUND_OBSTACLE_HANDLE,
    Host, RenderAdapter, TextHandle,
};
use crate::pool::EntityPool;
use crate::settings::GameConfig;
use crate::sim::{
    Key, Lfsr16, ObstacleKind, RandomSource, RunnerState, SessionState, SnakeState, TickOutcome,
    Variant, VariantState,
};

/// Serializable view of a session, for debugging and replays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub variant: Variant,
    pub state: SessionState,
    pub score: u16,
    pub high_score: u16,
    pub ticks: u64,
    pub dialog: DialogOverlay,
    pub game: VariantState,
}

/// One running game screen
pub struct GameSession {
    config: GameConfig,
    state: SessionState,
    game: VariantState,
    dialog: DialogOverlay,
    high_score: HighScore,
    rng: Box<dyn RandomSource>,
    /// Snake segment widgets; the runner has a fixed set of entities
    segments: Option<EntityPool>,
    /// The current run has ended (collision) and not yet restarted
    over: bool,
    /// Simulation steps taken since creation
    ticks: u64,
}

impl GameSession {
    /// Build a session. Loads the variant's high score from `store`; the game
    /// does not advance until [`start`](Self::start). A config that fails
    /// validation is replaced by the defaults.
    pub fn new(
        variant: Variant,
        config: GameConfig,
        mut rng: Box<dyn RandomSource>,
        store: &dyn KvStore,
    ) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                log::warn!("Rejected game config ({}), using defaults", e);
                GameConfig::default()
            }
        };
        let high_score = HighScore::load(variant, store);
        let game = VariantState::new(variant, &config, rng.as_mut());
        let segments = match variant {
            Variant::Runner => None,
            Variant::Snake => Some(EntityPool::new(
                FIRST_SEGMENT_HANDLE,
                config.snake.initial_length as usize,
                config.snake.area(),
            )),
        };
        Self {
            config,
            state: SessionState::Initializing,
            game,
            dialog: DialogOverlay::new(),
            high_score,
            rng,
            segments,
            over: false,
            ticks: 0,
        }
    }

    /// Session with the built-in LFSR seeded explicitly
    pub fn with_seed(variant: Variant, config: GameConfig, seed: u16, store: &dyn KvStore) -> Self {
        Self::new(variant, config, Box::new(Lfsr16::new(seed)), store)
    }

    pub fn variant(&self) -> Variant {
        self.game.variant()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn score(&self) -> u16 {
        self.game.score()
    }

    pub fn speed(&self) -> u32 {
        self.game.speed()
    }

    pub fn high_score(&self) -> u16 {
        self.high_score.best
    }

    pub fn game(&self) -> &VariantState {
        &self.game
    }

    pub fn dialog(&self) -> &DialogOverlay {
        &self.dialog
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Tick period the scheduler should currently run at
    pub fn period_ms(&self) -> u32 {
        self.game.period_ms(&self.config)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            variant: self.variant(),
            state: self.state,
            score: self.score(),
            high_score: self.high_score(),
            ticks: self.ticks,
            dialog: self.dialog,
            game: self.game.clone(),
        }
    }

    /// Arm the timer, draw the opening frame and begin accepting input
    pub fn start<H: Host>(&mut self, host: &mut H) -> bool {
        if self.state != SessionState::Initializing {
            return false;
        }
        host.set_period(self.period_ms());
        self.render_all(host);
        self.update_score_text(host);
        self.state = SessionState::Running;
        log::info!(
            "{} session started (high score {})",
            self.variant().as_str(),
            self.high_score()
        );
        true
    }

    /// Timer callback. Advances the game only while `Running`.
    pub fn on_tick<H: Host>(&mut self, host: &mut H) -> TickOutcome {
        if self.state != SessionState::Running {
            return TickOutcome::default();
        }

        let outcome = self.game.tick(self.rng.as_mut(), &self.config);
        self.ticks += 1;

        if let Some(period) = outcome.period_ms {
            host.set_period(period);
        }
        // The crashing frame is never drawn; the head may sit off the board
        if outcome.collided {
            self.finish_run(host);
            return outcome;
        }
        self.render_frame(host, outcome.scored);
        if outcome.scored {
            self.update_score_text(host);
        }
        outcome
    }

    /// Key callback. Dialogs see keys first; otherwise the game does.
    /// Returns true if the key had an effect.
    pub fn on_key<H: Host>(&mut self, key: Key, host: &mut H) -> bool {
        match self.state {
            SessionState::Initializing | SessionState::Closed => false,
            SessionState::ExitConfirm | SessionState::GameOverConfirm => {
                self.apply_dialog_key(key, host)
            }
            SessionState::Paused => match key {
                Key::Enter => self.resume(),
                Key::Esc => self.open_dialog(DialogKind::ExitConfirm, host),
                _ => false,
            },
            SessionState::Over => match key {
                Key::Enter => {
                    self.restart(host);
                    true
                }
                Key::Esc => self.teardown(host),
                _ => false,
            },
            SessionState::Running => match key {
                Key::Esc => self.open_dialog(DialogKind::ExitConfirm, host),
                _ => self.game.handle_key(key, &self.config),
            },
        }
    }

    /// Host-requested suspension (e.g. focus lost)
    pub fn pause(&mut self) -> bool {
        if self.state != SessionState::Running {
            return false;
        }
        self.state = SessionState::Paused;
        log::debug!("Session paused");
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.state != SessionState::Paused {
            return false;
        }
        self.state = SessionState::Running;
        log::debug!("Session resumed");
        true
    }

    /// Start a new run in place: score and speed reset, extra entities hidden
    pub fn restart<H: Host>(&mut self, host: &mut H) {
        if self.state == SessionState::Closed {
            return;
        }
        if self.dialog.close() {
            host.present_dialog(None);
        }
        self.game.restart(self.rng.as_mut(), &self.config);
        self.over = false;
        if let Some(pool) = self.segments.as_mut() {
            pool.reset(host);
        }
        host.set_period(self.period_ms());
        self.render_all(host);
        self.update_score_text(host);
        self.state = SessionState::Running;
        log::info!("{} session restarted", self.variant().as_str());
    }

    /// Stop the timer, release any dialog and hand control back to the host.
    /// Happens at most once.
    pub fn teardown<H: Host>(&mut self, host: &mut H) -> bool {
        if self.state == SessionState::Closed {
            return false;
        }
        host.cancel();
        if self.dialog.close() {
            host.present_dialog(None);
        }
        self.state = SessionState::Closed;
        log::info!(
            "{} session closed (score {}, high score {})",
            self.variant().as_str(),
            self.score(),
            self.high_score()
        );
        host.go_back();
        true
    }

    fn finish_run<H: Host>(&mut self, host: &mut H) {
        self.state = SessionState::Over;
        self.over = true;
        let score = self.score();
        self.high_score.record(score, host);
        host.set_text(TextHandle::Score, &format!("GAME OVER: {}", score));
        log::info!("{} game over at score {}", self.variant().as_str(), score);
        self.open_dialog(DialogKind::GameOverConfirm, host);
    }

    fn open_dialog<H: Host>(&mut self, kind: DialogKind, host: &mut H) -> bool {
        if !self.dialog.open(kind) {
            return false;
        }
        self.state = match kind {
            DialogKind::ExitConfirm => SessionState::ExitConfirm,
            DialogKind::GameOverConfirm => SessionState::GameOverConfirm,
            DialogKind::None => self.state,
        };
        self.present_dialog(host);
        true
    }

    fn close_dialog<H: Host>(&mut self, host: &mut H) {
        if !self.dialog.close() {
            return;
        }
        host.present_dialog(None);
        self.state = if self.over {
            SessionState::Over
        } else {
            SessionState::Running
        };
    }

    fn apply_dialog_key<H: Host>(&mut self, key: Key, host: &mut H) -> bool {
        match self.dialog.handle_key(key) {
            DialogAction::Ignored => false,
            DialogAction::Toggled => {
                self.present_dialog(host);
                true
            }
            DialogAction::Resume => {
                self.close_dialog(host);
                true
            }
            DialogAction::Restart => {
                self.restart(host);
                true
            }
            DialogAction::Exit => self.teardown(host),
        }
    }

    fn present_dialog(&self, render: &mut dyn RenderAdapter) {
        if let Some(view) = self.dialog.view(self.high_score(), self.score()) {
            render.present_dialog(Some(&view));
        }
    }

    fn update_score_text(&self, render: &mut dyn RenderAdapter) {
        render.set_text(TextHandle::Score, &format!("SCORE: {}", self.score()));
    }

    /// Push every entity's position and visibility
    fn render_all<H: Host>(&mut self, host: &mut H) {
        match &self.game {
            VariantState::Runner(runner) => {
                render_runner(runner, host);
                render_runner_visibility(runner, host);
            }
            VariantState::Snake(snake) => {
                if let Some(pool) = self.segments.as_mut() {
                    render_snake(snake, pool, host);
                }
            }
        }
    }

    /// Per-tick update; runner visibility only changes when an obstacle respawns
    fn render_frame<H: Host>(&mut self, host: &mut H, respawned: bool) {
        match &self.game {
            VariantState::Runner(runner) => {
                render_runner(runner, host);
                if respawned {
                    render_runner_visibility(runner, host);
                }
            }
            VariantState::Snake(snake) => {
                if let Some(pool) = self.segments.as_mut() {
                    render_snake(snake, pool, host);
                }
            }
        }
    }
}

fn render_runner(runner: &RunnerState, render: &mut dyn RenderAdapter) {
    let (x, y) = runner.actor.screen_pos();
    render.set_entity_position(ACTOR_HANDLE, x, y);
    for (kind, handle) in [
        (ObstacleKind::Ground, GROUND_OBSTACLE_HANDLE),
        (ObstacleKind::Air, AIR_OBSTACLE_HANDLE),
    ] {
        let obstacle = runner.obstacle(kind);
        render.set_entity_position(handle, obstacle.x, obstacle.top());
    }
}

fn render_runner_visibility(runner: &RunnerState, render: &mut dyn RenderAdapter) {
    render.set_entity_visible(ACTOR_HANDLE, true);
    render.set_entity_visible(GROUND_OBSTACLE_HANDLE, runner.active == ObstacleKind::Ground);
    render.set_entity_visible(AIR_OBSTACLE_HANDLE, runner.active == ObstacleKind::Air);
}

fn render_snake(snake: &SnakeState, pool: &mut EntityPool, render: &mut dyn RenderAdapter) {
    pool.ensure_capacity(snake.len(), render);
    for (i, cell) in snake.body.iter().enumerate() {
        let Some(handle) = pool.handle(i) else {
            break;
        };
        render.set_entity_position(handle, cell.x as i32 * CELL_SIZE, cell.y as i32 * CELL_SIZE);
    }
    match snake.food {
        Some(food) => {
            render.set_entity_position(
                FOOD_HANDLE,
                food.x as i32 * CELL_SIZE + FOOD_INSET,
                food.y as i32 * CELL_SIZE + FOOD_INSET,
            );
            render.set_entity_visible(FOOD_HANDLE, true);
        }
        None => render.set_entity_visible(FOOD_HANDLE, false),
    }
}
