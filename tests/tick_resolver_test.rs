//! End-to-end tick resolution across every activity kind.
//!
//! Uses seeded ChaCha8Rng for deterministic behavior.

use idlesim::activity::{ActivityState, GatheringActivity};
use idlesim::core::ids::{ActionId, Currency, ItemId, MonsterId, Skill};
use idlesim::core::{
    resolve_tick, GameSession, GameState, StopReason, TickContext, TickEvent, TickOutcome,
};
use idlesim::drops::{NoDrops, StandardDrops};
use idlesim::items::{Inventory, ItemStack};
use idlesim::modifiers::{ModifierKind, ModifierTable, NoModifiers};
use idlesim::registry::Registry;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn test_rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(42)
}

/// Ticks until the activity stops or `limit` runs out, collecting events.
fn run_until_stopped(
    mut state: GameState,
    ctx: &TickContext<'_>,
    rng: &mut ChaCha8Rng,
    limit: u32,
) -> (TickOutcome, Vec<TickEvent>) {
    let mut events = Vec::new();
    for _ in 0..limit {
        let outcome = resolve_tick(state, ctx, rng);
        events.extend(outcome.events.iter().cloned());
        if outcome.stop_reason.is_some() {
            return (outcome, events);
        }
        state = outcome.state;
    }
    panic!("activity still running after {} ticks", limit);
}

#[test]
fn test_idle_tick_is_noop() {
    let registry = Registry::builtin();
    let ctx = TickContext::new(&registry, &NoModifiers, &NoDrops);
    let state = GameState::new(500);
    let outcome = resolve_tick(state.clone(), &ctx, &mut test_rng());
    assert_eq!(outcome.state, state);
    assert!(outcome.changes.is_empty());
    assert!(outcome.events.is_empty());
    assert_eq!(outcome.stop_reason, None);
}

#[test]
fn test_unknown_action_stops_activity() {
    let registry = Registry::builtin();
    let ctx = TickContext::new(&registry, &NoModifiers, &NoDrops);
    let mut state = GameState::new(0);
    state.activity = Some(ActivityState::Gathering(GatheringActivity::new(
        ActionId::new("magic_tree"),
        30,
        None,
    )));
    let outcome = resolve_tick(state, &ctx, &mut test_rng());
    assert_eq!(outcome.stop_reason, Some(StopReason::UnknownDefinition));
    assert!(outcome.state.activity.is_none());
}

#[test]
fn test_first_completion_accrues_mastery_and_pool() {
    let registry = Registry::builtin();
    let ctx = TickContext::new(&registry, &NoModifiers, &NoDrops);
    let mut state = GameState::new(0);
    state.activity = Some(ActivityState::Gathering(GatheringActivity::new(
        ActionId::new("normal_tree"),
        30,
        None,
    )));

    let mut rng = test_rng();
    let mut completed = None;
    for _ in 0..30 {
        let outcome = resolve_tick(state, &ctx, &mut rng);
        if outcome.events.iter().any(|e| matches!(e, TickEvent::ActionCompleted { .. })) {
            completed = Some(outcome.changes.clone());
        }
        state = outcome.state;
    }

    let changes = completed.expect("one completion in 30 ticks");
    let tree = ActionId::new("normal_tree");
    // 30 ticks * (10 + level 1) / 20, a quarter of which feeds the pool.
    assert_eq!(changes.mastery_xp[&tree], 16);
    assert_eq!(changes.mastery_pool_xp[&Skill::Woodcutting], 4);
    assert_eq!(changes.items[&ItemId::new("normal_logs")], 1);
    assert_eq!(state.mastery.action_xp(&tree), 16);
    assert_eq!(state.mastery.pool_xp(Skill::Woodcutting), 4);
    assert_eq!(state.stats.actions_completed, 1);
}

#[test]
fn test_modifiers_shorten_interval_and_boost_xp() {
    let table = ModifierTable::new()
        .action(ModifierKind::ActionInterval, "normal_tree", 50.0)
        .global(ModifierKind::SkillXp, 100.0);
    let mut session = GameSession::new(
        GameState::new(0),
        Registry::builtin(),
        Box::new(table),
        Box::new(NoDrops),
    );
    session
        .start_gathering(&ActionId::new("normal_tree"), None)
        .unwrap();
    assert_eq!(session.state().activity.as_ref().unwrap().total_ticks(), 15);

    let mut rng = test_rng();
    for _ in 0..15 {
        session.live_tick(&mut rng);
    }
    assert_eq!(session.state().skill_xp(Skill::Woodcutting), 20);
}

#[test]
fn test_full_inventory_stops_and_records_loss() {
    let registry = Registry::builtin();
    let ctx = TickContext::new(&registry, &NoModifiers, &NoDrops);
    let mut state = GameState::new(0);
    state.inventory = Inventory::new(1);
    state.inventory.add(&ItemStack::new("feathers", 3));
    state.activity = Some(ActivityState::Gathering(GatheringActivity::new(
        ActionId::new("normal_tree"),
        30,
        None,
    )));

    let (outcome, events) = run_until_stopped(state, &ctx, &mut test_rng(), 100);
    assert_eq!(outcome.stop_reason, Some(StopReason::InventoryFull));
    assert_eq!(outcome.changes.items_lost[&ItemId::new("normal_logs")], 1);
    assert_eq!(outcome.state.skill_xp(Skill::Woodcutting), 10, "xp still awarded");
    assert!(events.contains(&TickEvent::ItemsLost {
        item: ItemId::new("normal_logs"),
        quantity: 1
    }));
    assert!(events.contains(&TickEvent::ActivityStopped {
        reason: StopReason::InventoryFull
    }));
}

#[test]
fn test_course_runs_once_then_stops() {
    let registry = Registry::builtin();
    let ctx = TickContext::new(&registry, &NoModifiers, &NoDrops);
    let mut session = GameSession::new(
        GameState::new(0),
        Registry::builtin(),
        Box::new(NoModifiers),
        Box::new(NoDrops),
    );
    session
        .start_course(vec![
            ActionId::new("cargo_net"),
            ActionId::new("balance_beam"),
            ActionId::new("cargo_net"),
        ])
        .unwrap();

    let (outcome, events) =
        run_until_stopped(session.state().clone(), &ctx, &mut test_rng(), 1_000);
    assert_eq!(outcome.stop_reason, Some(StopReason::CourseCompleted));
    let cleared: Vec<usize> = events
        .iter()
        .filter_map(|e| match e {
            TickEvent::ObstacleCleared { index, .. } => Some(*index),
            _ => None,
        })
        .collect();
    assert_eq!(cleared, vec![0, 1, 2]);
    // 8 + 10 + 8 per obstacle, then half of 26 as the completion bonus.
    assert_eq!(outcome.state.skill_xp(Skill::Agility), 26 + 13);
    // 5 + 10 + 5 gold, then half of 20.
    assert_eq!(outcome.state.currency(Currency::Gold), 20 + 10);
    assert!(outcome.state.activity.is_none());
}

#[test]
fn test_death_interrupts_combat_and_costs_equipment() {
    let registry = Registry::builtin();
    let ctx = TickContext::new(&registry, &NoModifiers, &StandardDrops);
    let mut session = GameSession::new(
        GameState::new(0),
        Registry::builtin(),
        Box::new(NoModifiers),
        Box::new(StandardDrops),
    );
    session.start_monster(&MonsterId::new("cow")).unwrap();
    let mut state = session.state().clone();
    state.player.hp = 1;
    state.equipment.push(ItemId::new("bronze_sword"));

    let (outcome, events) = run_until_stopped(state, &ctx, &mut test_rng(), 50_000);
    assert_eq!(outcome.stop_reason, Some(StopReason::PlayerDied));
    assert_eq!(outcome.changes.deaths, 1);
    assert_eq!(outcome.changes.lost_on_death[&ItemId::new("bronze_sword")], 1);
    assert!(outcome.state.equipment.is_empty());
    assert_eq!(outcome.state.player.hp, outcome.state.max_hp());
    assert_eq!(outcome.state.stats.deaths, 1);
    assert!(outcome.state.activity.is_none());
    assert!(events.iter().any(|e| matches!(
        e,
        TickEvent::PlayerDied { item_lost: Some(item), .. } if item.as_str() == "bronze_sword"
    )));
}

#[test]
fn test_single_monster_respawns_after_kill() {
    let mut state = GameState::new(0);
    for skill in [Skill::Attack, Skill::Strength] {
        state.add_skill_xp(skill, idlesim::mastery::xp_for_level(99));
    }
    let mut session = GameSession::new(
        state,
        Registry::builtin(),
        Box::new(NoModifiers),
        Box::new(NoDrops),
    );
    session.start_monster(&MonsterId::new("chicken")).unwrap();

    let mut rng = test_rng();
    let mut events = Vec::new();
    for _ in 0..2_000 {
        events.extend(session.live_tick(&mut rng).events);
    }
    let kills = events
        .iter()
        .filter(|e| matches!(e, TickEvent::MonsterKilled { .. }))
        .count();
    let spawns = events
        .iter()
        .filter(|e| matches!(e, TickEvent::MonsterSpawned { .. }))
        .count();
    assert!(kills >= 10, "only {} kills", kills);
    assert!(spawns >= kills, "every kill is followed by a respawn");
    assert!(session.state().is_active());
    assert_eq!(session.state().inventory.count(&ItemId::new("bones")) as usize, kills);
}
