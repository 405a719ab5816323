//! Offline catch-up: chunk invariance, cancellation and the session's
//! catch-up state machine.
//!
//! Uses seeded ChaCha8Rng for deterministic behavior.

use idlesim::core::ids::{ActionId, DungeonId, ItemId, MonsterId, Skill};
use idlesim::core::{
    BatchResult, BatchSimulator, CatchUpPhase, GameSession, GameState, StopReason, TickContext,
    ToggleError,
};
use idlesim::drops::StandardDrops;
use idlesim::modifiers::NoModifiers;
use idlesim::registry::Registry;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn test_rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(42)
}

fn new_session() -> GameSession {
    GameSession::new(
        GameState::new(0),
        Registry::builtin(),
        Box::new(NoModifiers),
        Box::new(StandardDrops),
    )
}

fn replay(state: GameState, ticks: u64, chunk: u64) -> BatchResult {
    let registry = Registry::builtin();
    let ctx = TickContext::new(&registry, &NoModifiers, &StandardDrops);
    BatchSimulator::new(state, test_rng(), ticks)
        .with_chunk_size(chunk)
        .run(&ctx)
}

fn fighting_chickens() -> GameState {
    let mut session = new_session();
    session.start_monster(&MonsterId::new("chicken")).unwrap();
    session.state().clone()
}

fn cooking_shrimp() -> GameState {
    let mut state = GameState::new(0);
    state
        .inventory
        .add(&idlesim::items::ItemStack::new("raw_shrimp", 200));
    let mut session = GameSession::new(
        state,
        Registry::builtin(),
        Box::new(NoModifiers),
        Box::new(StandardDrops),
    );
    session
        .start_gathering(&ActionId::new("shrimp"), None)
        .unwrap();
    session.state().clone()
}

#[test]
fn test_chunk_size_does_not_change_combat_outcome() {
    let reference = replay(fighting_chickens(), 10_000, 10_000);
    assert!(reference.changes.total_kills() > 0, "expected some kills");

    for chunk in [1_000, 337, 1] {
        let result = replay(fighting_chickens(), 10_000, chunk);
        assert_eq!(result.state, reference.state, "state differs at chunk {}", chunk);
        assert_eq!(result.changes, reference.changes, "changes differ at chunk {}", chunk);
        assert_eq!(result.ticks_simulated, reference.ticks_simulated);
        assert_eq!(result.stop_reason, reference.stop_reason);
    }
}

#[test]
fn test_chunk_size_does_not_change_stopping_point() {
    // 200 shrimp at 30 ticks each; the 201st attempt finds none at tick 6030.
    let reference = replay(cooking_shrimp(), 10_000, 10_000);
    assert_eq!(reference.stop_reason, Some(StopReason::MissingInputs));
    assert_eq!(reference.changes.items[&ItemId::new("shrimp")], 200);
    assert_eq!(reference.changes.items[&ItemId::new("raw_shrimp")], -200);
    assert_eq!(reference.ticks_simulated, 6_030);

    for chunk in [1_000, 337, 1] {
        let result = replay(cooking_shrimp(), 10_000, chunk);
        assert_eq!(result.state, reference.state, "chunk {}", chunk);
        assert_eq!(result.changes, reference.changes, "chunk {}", chunk);
        assert_eq!(result.ticks_simulated, 6_030);
    }
}

#[test]
fn test_live_ticks_match_batch() {
    let mut session = new_session();
    session.start_monster(&MonsterId::new("chicken")).unwrap();
    let start = session.state().clone();

    let mut rng = test_rng();
    for _ in 0..2_000 {
        session.live_tick(&mut rng);
    }
    let batch = replay(start, 2_000, 337);

    let mut expected = batch.state;
    expected.last_tick_at += 2_000 * 100;
    assert_eq!(session.state(), &expected);
}

#[test]
fn test_session_catch_up_completes() {
    let mut session = new_session();
    session
        .start_gathering(&ActionId::new("normal_tree"), None)
        .unwrap();

    let away = session.catch_up(36_000 * 100 + 99, test_rng());
    assert_eq!(away.ticks_requested, 36_000);
    assert!(!away.cancelled);
    assert_eq!(away.changes.items[&ItemId::new("normal_logs")], 1_200);
    assert!(away.rates.skill_xp_per_hour[&Skill::Woodcutting] > 0.0);
    assert_eq!(session.phase(), CatchUpPhase::Completed);
    assert_eq!(session.state().last_tick_at, 3_600_000, "remainder kept");
    assert!(session.state().is_active());
}

#[test]
fn test_cancelled_catch_up_keeps_partial_progress() {
    let mut session = new_session();
    session
        .start_gathering(&ActionId::new("normal_tree"), None)
        .unwrap();

    let mut simulator = session.begin_catch_up(10_000 * 100, test_rng());
    let token = simulator.cancel_token();
    let ctx = session.context();
    assert!(simulator.next_chunk(&ctx).is_some());
    assert!(simulator.next_chunk(&ctx).is_some());
    token.cancel();
    let result = simulator.run(&ctx);

    let away = session.finish_catch_up(result);
    assert!(away.cancelled);
    assert_eq!(away.ticks_simulated, 2_000);
    assert_eq!(away.changes.items[&ItemId::new("normal_logs")], 66);
    assert!(away.to_text().contains("cancelled"));

    assert_eq!(session.phase(), CatchUpPhase::Cancelled);
    assert_eq!(session.state().last_tick_at, 200_000);

    // The skipped time is still owed and replays on the next catch-up.
    let away = session.catch_up(10_000 * 100, test_rng());
    assert_eq!(away.ticks_requested, 8_000);
    assert_eq!(session.phase(), CatchUpPhase::Completed);
}

#[test]
fn test_finished_activity_consumes_remaining_time() {
    let mut session = new_session();
    session
        .start_course(vec![ActionId::new("cargo_net"), ActionId::new("balance_beam")])
        .unwrap();

    let away = session.catch_up(5_000 * 100, test_rng());
    assert_eq!(away.stop_reason, Some(StopReason::CourseCompleted));
    assert_eq!(away.ticks_simulated, 110);
    assert!(!session.state().is_active());
    assert_eq!(session.state().last_tick_at, 500_000);
}

#[test]
fn test_dungeon_catch_up_reports_completion() {
    let mut state = GameState::new(0);
    for skill in [Skill::Attack, Skill::Strength, Skill::Defence] {
        state.add_skill_xp(skill, idlesim::mastery::xp_for_level(99));
    }
    let mut session = GameSession::new(
        state,
        Registry::builtin(),
        Box::new(NoModifiers),
        Box::new(StandardDrops),
    );
    session.start_dungeon(&DungeonId::new("goblin_camp")).unwrap();

    let away = session.catch_up(36_000 * 100, test_rng());
    assert_eq!(away.stop_reason, Some(StopReason::DungeonCompleted));
    assert_eq!(away.changes.dungeon_completions[&DungeonId::new("goblin_camp")], 1);
    assert_eq!(away.changes.monster_kills[&MonsterId::new("goblin")], 2);
    assert_eq!(away.changes.monster_kills[&MonsterId::new("goblin_chief")], 1);
    assert_eq!(away.changes.items[&ItemId::new("goblin_totem")], 1);
    assert!(session.state().currency(idlesim::core::ids::Currency::Gold) >= 100);
}

#[test]
fn test_acknowledge_returns_to_idle() {
    let mut session = new_session();
    session.catch_up(1_000, test_rng());
    assert_eq!(session.phase(), CatchUpPhase::Completed);
    let away = session.acknowledge().unwrap();
    assert!(away.is_empty());
    assert_eq!(session.phase(), CatchUpPhase::Idle);
    assert!(session.time_away().is_none());
}

#[test]
fn test_toggles_refused_while_running() {
    let mut session = new_session();
    let _simulator = session.begin_catch_up(1_000, test_rng());
    assert_eq!(session.phase(), CatchUpPhase::Running);
    assert_eq!(
        session.start_gathering(&ActionId::new("normal_tree"), None),
        Err(ToggleError::CatchUpInProgress)
    );
}

#[test]
#[should_panic(expected = "live tick while catch-up is running")]
fn test_live_tick_while_running_panics() {
    let mut session = new_session();
    let _simulator = session.begin_catch_up(1_000, test_rng());
    session.live_tick(&mut test_rng());
}

#[test]
#[should_panic(expected = "no catch-up is running")]
fn test_finish_without_begin_panics() {
    let mut session = new_session();
    let result = replay(GameState::new(0), 10, 10);
    session.finish_catch_up(result);
}

#[cfg(feature = "async")]
#[tokio::test]
async fn test_async_run_matches_sync() {
    let registry = Registry::builtin();
    let ctx = TickContext::new(&registry, &NoModifiers, &StandardDrops);

    let mut chunks = Vec::new();
    let result = BatchSimulator::new(fighting_chickens(), test_rng(), 5_000)
        .with_chunk_size(1_000)
        .run_async(&ctx, |progress| chunks.push(progress.ticks_done))
        .await;

    assert_eq!(chunks, vec![1_000, 2_000, 3_000, 4_000, 5_000]);
    let sync = replay(fighting_chickens(), 5_000, 1_000);
    assert_eq!(result.state, sync.state);
    assert_eq!(result.changes, sync.changes);
}

#[cfg(feature = "async")]
#[tokio::test]
async fn test_cancel_between_async_chunks() {
    let registry = Registry::builtin();
    let ctx = TickContext::new(&registry, &NoModifiers, &StandardDrops);
    let simulator = BatchSimulator::new(fighting_chickens(), test_rng(), 50_000);
    let token = simulator.cancel_token();

    let result = simulator
        .run_async(&ctx, |progress| {
            if progress.ticks_done >= 3_000 {
                token.cancel();
            }
        })
        .await;

    assert!(result.cancelled);
    assert_eq!(result.ticks_simulated, 3_000);
    assert_eq!(result.ticks_accounted(), 3_000);
}
