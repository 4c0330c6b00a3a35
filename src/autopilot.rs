//! Simple computer player
//!
//! Used by the headless CLI to drive unattended runs and by tests that need a
//! session to survive for a while. Looks at the current game state and
//! suggests at most one key per tick.

use crate::settings::GameConfig;
use crate::sim::{
    Cell, Direction, Key, ObstacleKind, RunnerState, ScriptedSource, SnakeState, VariantState,
    hits_body, hits_wall,
};

/// Runner look-ahead, in ticks
const RUNNER_HORIZON: usize = 40;

/// Key to press before the next tick, if any
pub fn suggest(game: &VariantState, config: &GameConfig) -> Option<Key> {
    match game {
        VariantState::Runner(runner) => suggest_runner(runner, config),
        VariantState::Snake(snake) => suggest_snake(snake, config),
    }
}

/// Jump once a single jump clears the ground obstacle; stay down under air ones
fn suggest_runner(runner: &RunnerState, config: &GameConfig) -> Option<Key> {
    if !runner.actor.grounded || runner.active != ObstacleKind::Ground {
        return None;
    }
    if survives(runner.clone(), config, false) {
        return None;
    }
    survives(runner.clone(), config, true).then_some(Key::Up)
}

/// Play the runner forward with no further input until the current obstacle
/// has passed
fn survives(mut runner: RunnerState, config: &GameConfig, jump: bool) -> bool {
    // Never consulted: the look-ahead stops at the first respawn
    let mut rng = ScriptedSource::new(vec![0]);
    if jump {
        runner.handle_key(Key::Up, &config.runner);
    }
    for _ in 0..RUNNER_HORIZON {
        let outcome = runner.tick(&mut rng, &config.runner);
        if outcome.collided {
            return false;
        }
        if outcome.scored {
            break;
        }
    }
    true
}

/// Greedy step toward the food that avoids walls and the body
fn suggest_snake(snake: &SnakeState, config: &GameConfig) -> Option<Key> {
    let tuning = &config.snake;
    let head = snake.head();
    let target = snake.food;

    // Tail cell is vacated by the move unless the snake eats
    let keep = snake.len().saturating_sub(1);
    let blocked = |cell: Cell| {
        hits_wall(cell, tuning.grid_width, tuning.grid_height)
            || hits_body(cell, snake.body.iter().take(keep))
    };

    let mut options = [
        snake.pending_direction,
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ]
    .into_iter()
    .filter(|dir| *dir != snake.direction.opposite())
    .filter(|dir| !blocked(head.step(*dir)))
    .map(|dir| (distance(head.step(dir), target), dir))
    .collect::<Vec<_>>();

    // Stable sort keeps the queued direction first among ties
    options.sort_by_key(|(d, _)| *d);
    let (_, best) = options.first().copied()?;
    (best != snake.pending_direction).then(|| direction_key(best))
}

fn distance(cell: Cell, target: Option<Cell>) -> u32 {
    match target {
        Some(t) => cell.x.abs_diff(t.x) as u32 + cell.y.abs_diff(t.y) as u32,
        None => 0,
    }
}

fn direction_key(dir: Direction) -> Key {
    match dir {
        Direction::Up => Key::Up,
        Direction::Down => Key::Down,
        Direction::Left => Key::Left,
        Direction::Right => Key::Right,
    }
}
