//! End-to-end session behavior against the headless host

use proptest::prelude::*;

use tick_arcade::persistence::{JsonFileStore, KvStore, MemoryStore};
use tick_arcade::platform::headless::HeadlessHost;
use tick_arcade::platform::{EntityHandle, TextHandle};
use tick_arcade::sim::{Cell, ScriptedSource, VariantState};
use tick_arcade::{DialogKind, GameConfig, GameSession, Key, SessionState, Variant};

/// Snake whose food always tries (15, 4) first
fn scripted_snake(host: &HeadlessHost<impl KvStore>) -> GameSession {
    let rng = Box::new(ScriptedSource::new(vec![15, 4]));
    GameSession::new(Variant::Snake, GameConfig::default(), rng, &host.store)
}

fn snake_body(session: &GameSession) -> Vec<(u8, u8)> {
    match session.game() {
        VariantState::Snake(s) => s.body.iter().map(|c| (c.x, c.y)).collect(),
        VariantState::Runner(_) => panic!("not a snake session"),
    }
}

fn temp_store_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("tick-arcade-{}-{}.json", std::process::id(), name))
}

#[test]
fn snake_eats_food_on_fourth_tick() {
    let mut host = HeadlessHost::new();
    let mut session = scripted_snake(&host);
    session.start(&mut host);

    for _ in 0..3 {
        let outcome = session.on_tick(&mut host);
        assert!(!outcome.scored);
    }
    assert!(session.on_tick(&mut host).scored);
    assert_eq!(snake_body(&session), vec![(15, 4), (14, 4), (13, 4), (12, 4)]);
    assert_eq!(session.score(), 1);
    assert_eq!(host.text(TextHandle::Score), Some("SCORE: 1"));

    let food = match session.game() {
        VariantState::Snake(s) => s.food,
        VariantState::Runner(_) => unreachable!(),
    };
    assert_eq!(food, Some(Cell::new(16, 4)));
    assert_eq!(host.visible_count(), 5);
}

#[test]
fn exit_dialog_freezes_then_tears_down_once() {
    let mut host = HeadlessHost::new();
    let mut session = GameSession::with_seed(Variant::Snake, GameConfig::default(), 42, &host.store);
    session.start(&mut host);
    session.on_tick(&mut host);

    session.on_key(Key::Esc, &mut host);
    assert_eq!(session.state(), SessionState::ExitConfirm);
    assert_eq!(session.dialog().kind(), DialogKind::ExitConfirm);

    let frozen = session.snapshot();
    for _ in 0..10 {
        session.on_tick(&mut host);
    }
    assert_eq!(session.snapshot(), frozen);

    session.on_key(Key::Right, &mut host);
    assert_eq!(session.dialog().selection(), 1);
    session.on_key(Key::Left, &mut host);
    assert_eq!(session.dialog().selection(), 0);
    session.on_key(Key::Right, &mut host);
    session.on_key(Key::Enter, &mut host);

    assert_eq!(session.state(), SessionState::Closed);
    assert_eq!(host.go_back_calls, 1);
    assert!(!host.timer_running());

    for key in [Key::Enter, Key::Esc, Key::Up] {
        session.on_key(key, &mut host);
    }
    session.on_tick(&mut host);
    assert_eq!(host.go_back_calls, 1);
    assert_eq!(host.cancel_calls, 1);
}

#[test]
fn high_score_survives_sessions() {
    let path = temp_store_path("survives");
    let _ = std::fs::remove_file(&path);

    {
        let mut host = HeadlessHost::with_store(JsonFileStore::open(&path));
        let mut session = scripted_snake(&host);
        session.start(&mut host);
        while !session.on_tick(&mut host).collided {}
        // Eats every cell from x=15 to the right wall
        assert_eq!(session.score(), 8);
        assert_eq!(session.high_score(), 8);
        assert_eq!(host.period_history, vec![300, 280]);
        session.teardown(&mut host);
    }

    let host = HeadlessHost::with_store(JsonFileStore::open(&path));
    assert_eq!(host.store.get("snake_high_score"), Some(vec![8, 0]));
    let session = GameSession::with_seed(Variant::Snake, GameConfig::default(), 1, &host.store);
    assert_eq!(session.high_score(), 8);
    // The other variant keeps its own record
    let runner = GameSession::with_seed(Variant::Runner, GameConfig::default(), 1, &host.store);
    assert_eq!(runner.high_score(), 0);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn corrupt_record_reads_as_zero() {
    let store = MemoryStore::new().with_entry("dino_high_score", &[1, 2, 3]);
    let session = GameSession::with_seed(Variant::Runner, GameConfig::default(), 1, &store);
    assert_eq!(session.high_score(), 0);
}

#[test]
fn restart_reuses_segment_widgets() {
    let mut host = HeadlessHost::new();
    let mut session = scripted_snake(&host);
    session.start(&mut host);
    while !session.on_tick(&mut host).collided {}
    // 11 segments + food
    assert_eq!(host.visible_count(), 12);

    session.on_key(Key::Enter, &mut host);
    assert_eq!(session.state(), SessionState::Running);
    assert_eq!(session.score(), 0);
    assert_eq!(session.speed(), 3);
    assert_eq!(host.visible_count(), 4);
    for h in 4..=11 {
        assert!(!host.is_visible(EntityHandle(h)));
    }
    assert_eq!(snake_body(&session), vec![(11, 4), (10, 4), (9, 4)]);
}

#[test]
fn runner_without_input_crashes_into_first_obstacle() {
    let mut host = HeadlessHost::new();
    let mut session = GameSession::with_seed(Variant::Runner, GameConfig::default(), 9, &host.store);
    session.start(&mut host);
    let mut ticks = 0;
    while !session.on_tick(&mut host).collided {
        ticks += 1;
        assert!(ticks < 200);
    }
    assert_eq!(session.score(), 0);
    assert_eq!(session.state(), SessionState::GameOverConfirm);
    assert_eq!(host.text(TextHandle::Score), Some("GAME OVER: 0"));
    // Score 0 never beats the stored 0
    assert_eq!(host.store.get("dino_high_score"), None);
}

fn arb_key() -> impl Strategy<Value = Key> {
    prop_oneof![
        Just(Key::Up),
        Just(Key::Down),
        Just(Key::Left),
        Just(Key::Right),
        Just(Key::Enter),
    ]
}

fn arb_variant() -> impl Strategy<Value = Variant> {
    prop_oneof![Just(Variant::Runner), Just(Variant::Snake)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Score never drops within a run, and the high score tracks the best run
    #[test]
    fn score_monotonic_and_high_score_is_running_max(
        variant in arb_variant(),
        seed in 1u16..,
        inputs in prop::collection::vec(prop::option::of(arb_key()), 1..600),
    ) {
        let mut host = HeadlessHost::new();
        let mut session = GameSession::with_seed(variant, GameConfig::default(), seed, &host.store);
        session.start(&mut host);

        let mut last_score = 0u16;
        let mut best = 0u16;
        for input in inputs {
            match session.state() {
                SessionState::Running => {
                    if let Some(key) = input {
                        session.on_key(key, &mut host);
                    }
                    session.on_tick(&mut host);
                    prop_assert!(session.score() >= last_score);
                    last_score = session.score();
                    best = best.max(last_score);
                    prop_assert!(session.speed() >= 1);
                }
                SessionState::GameOverConfirm => {
                    prop_assert_eq!(session.high_score(), best);
                    // Selection 0 restarts
                    session.on_key(Key::Enter, &mut host);
                    prop_assert_eq!(session.score(), 0);
                    last_score = 0;
                }
                other => prop_assert!(false, "unexpected state {:?}", other),
            }
        }
        prop_assert!(session.high_score() <= best);
    }
}
