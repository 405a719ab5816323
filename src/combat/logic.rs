//! Combat tick processing.
//!
//! Both sides run on independent attack timers. When both expire on the same
//! tick the player swings first, and a monster that dies to that swing does
//! not attack back. A fresh monster spends a few ticks spawning, during which
//! neither timer advances.

use super::types::PlayerCombatStats;
use crate::activity::{ActivityState, CombatActivity, CombatContext, CombatProgressState};
use crate::core::constants::*;
use crate::core::game_state::GameState;
use crate::core::ids::{Currency, DungeonId, MonsterId, Skill};
use crate::core::progression::{grant_currency, grant_items, grant_skill_xp};
use crate::core::tick::{StopReason, TickContext, TickEvent, TickOutput};
use crate::items::ItemStack;
use crate::modifiers::{reduce_ticks, ModifierKind, ModifierProvider, ModifierScope};
use crate::registry::MonsterDef;
use rand::{Rng, RngCore};
use std::ops::ControlFlow;

/// Chance that an attack with `accuracy` lands against `evasion`.
pub fn hit_chance(accuracy: f64, evasion: f64) -> f64 {
    let total = accuracy + evasion;
    if total <= 0.0 {
        return MIN_HIT_CHANCE;
    }
    (accuracy / total).clamp(MIN_HIT_CHANCE, MAX_HIT_CHANCE)
}

/// The player's ratings against `monster`, modifiers included.
pub fn player_combat_stats(
    state: &GameState,
    modifiers: &dyn ModifierProvider,
    monster: &MonsterId,
) -> PlayerCombatStats {
    let scope = ModifierScope::Monster(monster);
    let percent = |kind| 1.0 + modifiers.modifier(kind, scope) / 100.0;

    let attack = state.skill_level(Skill::Attack) + RATING_LEVEL_OFFSET;
    let defence = state.skill_level(Skill::Defence) + RATING_LEVEL_OFFSET;
    let strength = state.skill_level(Skill::Strength);

    let base_max_hit = BASE_PLAYER_MAX_HIT + MAX_HIT_PER_STRENGTH_LEVEL * strength;
    let max_hit = (base_max_hit as f64 * percent(ModifierKind::Damage)).max(1.0) as u32;

    PlayerCombatStats {
        accuracy: (attack * ACCURACY_PER_ATTACK_LEVEL) as f64 * percent(ModifierKind::Accuracy),
        evasion: (defence * EVASION_PER_DEFENCE_LEVEL) as f64 * percent(ModifierKind::Evasion),
        max_hit,
        attack_interval_ticks: reduce_ticks(
            PLAYER_ATTACK_INTERVAL_TICKS,
            modifiers.modifier(ModifierKind::AttackInterval, scope),
        ),
        damage_reduction_percent: modifiers
            .modifier(ModifierKind::DamageReduction, scope)
            .clamp(0.0, 100.0),
    }
}

/// A combat activity against `context`'s current monster, starting with a spawn delay.
pub fn start_fight(
    state: &GameState,
    modifiers: &dyn ModifierProvider,
    context: CombatContext,
    monster: &MonsterDef,
) -> CombatActivity {
    let stats = player_combat_stats(state, modifiers, &monster.id);
    CombatActivity {
        context,
        progress: CombatProgressState::spawning(monster.hitpoints, MONSTER_SPAWN_TICKS),
        progress_ticks: 0,
        total_ticks: stats.attack_interval_ticks,
    }
}

/// Advances a fight by one tick.
pub fn tick(
    state: &mut GameState,
    mut fight: CombatActivity,
    ctx: &TickContext<'_>,
    rng: &mut dyn RngCore,
    out: &mut TickOutput,
) -> ControlFlow<StopReason, ActivityState> {
    let Some(monster) = fight
        .context
        .current_monster_id()
        .and_then(|id| ctx.registry.monster(id))
    else {
        tracing::warn!(context = fight.context.kind(), "fight references unknown monster");
        return ControlFlow::Break(StopReason::UnknownDefinition);
    };

    regenerate(state, out);

    let stats = player_combat_stats(state, ctx.modifiers, &monster.id);

    // A zero spawn timer means the monster is already up.
    if fight.progress.spawn_ticks_remaining == Some(0) {
        fight.progress.spawn_ticks_remaining = None;
    }

    if let Some(spawn) = fight.progress.spawn_ticks_remaining {
        let remaining = spawn.saturating_sub(1);
        if remaining > 0 {
            fight.progress.spawn_ticks_remaining = Some(remaining);
            return ControlFlow::Continue(ActivityState::Combat(fight));
        }
        fight.progress = CombatProgressState {
            monster_hp: monster.hitpoints,
            player_attack_ticks_remaining: stats.attack_interval_ticks,
            monster_attack_ticks_remaining: monster.attack_interval_ticks.max(1),
            spawn_ticks_remaining: None,
        };
        fight.progress_ticks = 0;
        fight.total_ticks = stats.attack_interval_ticks;
        out.emit(TickEvent::MonsterSpawned {
            monster_id: monster.id.clone(),
        });
        return ControlFlow::Continue(ActivityState::Combat(fight));
    }

    let progress = &mut fight.progress;
    progress.player_attack_ticks_remaining =
        progress.player_attack_ticks_remaining.saturating_sub(1);
    progress.monster_attack_ticks_remaining =
        progress.monster_attack_ticks_remaining.saturating_sub(1);
    fight.progress_ticks = fight
        .total_ticks
        .saturating_sub(fight.progress.player_attack_ticks_remaining);

    if fight.progress.player_attack_ticks_remaining == 0 {
        player_attack(&mut fight.progress, &stats, monster, rng, out);
        fight.progress.player_attack_ticks_remaining = stats.attack_interval_ticks;
        fight.progress_ticks = 0;
        fight.total_ticks = stats.attack_interval_ticks;

        if fight.progress.monster_hp == 0 {
            return on_monster_killed(state, fight, monster, ctx, rng, out);
        }
    }

    if fight.progress.monster_attack_ticks_remaining == 0 {
        monster_attack(state, &stats, monster, rng, out);
        fight.progress.monster_attack_ticks_remaining = monster.attack_interval_ticks.max(1);

        if state.player.hp == 0 {
            on_player_died(state, monster, ctx, rng, out);
            return ControlFlow::Break(StopReason::PlayerDied);
        }
    }

    ControlFlow::Continue(ActivityState::Combat(fight))
}

/// Restores 1% of max HP (at least 1) every regen interval.
fn regenerate(state: &mut GameState, out: &mut TickOutput) {
    state.player.regen_ticks_remaining = state.player.regen_ticks_remaining.saturating_sub(1);
    if state.player.regen_ticks_remaining > 0 {
        return;
    }
    state.player.regen_ticks_remaining = PLAYER_REGEN_INTERVAL_TICKS;

    let max_hp = state.max_hp();
    if state.player.hp >= max_hp {
        return;
    }
    let amount = (max_hp * PLAYER_REGEN_PERCENT / 100)
        .max(1)
        .min(max_hp - state.player.hp);
    state.player.hp += amount;
    out.emit(TickEvent::PlayerRegenerated { amount });
}

fn player_attack(
    progress: &mut CombatProgressState,
    stats: &PlayerCombatStats,
    monster: &MonsterDef,
    rng: &mut dyn RngCore,
    out: &mut TickOutput,
) {
    let evasion = (monster.evasion * RATING_PER_MONSTER_POINT) as f64;
    if rng.gen_bool(hit_chance(stats.accuracy, evasion)) {
        let damage = rng.gen_range(1..=stats.max_hit.max(1));
        progress.monster_hp = progress.monster_hp.saturating_sub(damage);
        out.emit(TickEvent::PlayerHit { damage });
    } else {
        out.emit(TickEvent::PlayerMissed);
    }
}

fn monster_attack(
    state: &mut GameState,
    stats: &PlayerCombatStats,
    monster: &MonsterDef,
    rng: &mut dyn RngCore,
    out: &mut TickOutput,
) {
    let accuracy = (monster.accuracy * RATING_PER_MONSTER_POINT) as f64;
    if rng.gen_bool(hit_chance(accuracy, stats.evasion)) {
        let rolled = rng.gen_range(1..=monster.max_hit.max(1));
        let damage = (rolled as f64 * (1.0 - stats.damage_reduction_percent / 100.0)) as u32;
        state.player.hp = state.player.hp.saturating_sub(damage);
        out.emit(TickEvent::MonsterHit { damage });
    } else {
        out.emit(TickEvent::MonsterMissed);
    }
}

fn on_monster_killed(
    state: &mut GameState,
    mut fight: CombatActivity,
    monster: &MonsterDef,
    ctx: &TickContext<'_>,
    rng: &mut dyn RngCore,
    out: &mut TickOutput,
) -> ControlFlow<StopReason, ActivityState> {
    out.changes.add_kill(&monster.id);
    state.stats.monster_kills += 1;

    let mut drops = ctx.combat.roll_drops(monster, rng);
    if let Some(bones) = &monster.bones {
        drops.push(ItemStack::new(bones.clone(), 1));
    }
    for stack in &drops {
        grant_items(state, stack, out);
    }

    let (min_gold, max_gold) = monster.gold;
    if max_gold > 0 {
        let gold = rng.gen_range(min_gold.max(0)..=max_gold.max(min_gold));
        if gold > 0 {
            grant_currency(state, ctx, Currency::Gold, gold, out);
        }
    }

    let hp = monster.hitpoints as u64;
    let style = state.combat_style.skill();
    let style_percent = ctx.modifiers.modifier(ModifierKind::SkillXp, ModifierScope::Skill(style));
    let xp = grant_skill_xp(state, style, hp * COMBAT_XP_PER_MONSTER_HP, style_percent, out);
    let hp_percent = ctx
        .modifiers
        .modifier(ModifierKind::SkillXp, ModifierScope::Skill(Skill::Hitpoints));
    grant_skill_xp(
        state,
        Skill::Hitpoints,
        hp * HITPOINTS_XP_NUMERATOR / HITPOINTS_XP_DENOMINATOR,
        hp_percent,
        out,
    );

    out.emit(TickEvent::MonsterKilled {
        monster_id: monster.id.clone(),
        xp,
    });

    let next_monster = match &mut fight.context {
        CombatContext::SingleMonster { .. } => monster,
        CombatContext::Sequence {
            sequence_id,
            current_monster_index,
            monster_ids,
        } => {
            if *current_monster_index + 1 >= monster_ids.len() {
                let dungeon_id = sequence_id.clone();
                complete_dungeon(state, ctx, &dungeon_id, out);
                return ControlFlow::Break(StopReason::DungeonCompleted);
            }
            *current_monster_index += 1;
            match ctx.registry.monster(&monster_ids[*current_monster_index]) {
                Some(next) => next,
                None => return ControlFlow::Break(StopReason::UnknownDefinition),
            }
        }
    };

    fight.progress = CombatProgressState::spawning(next_monster.hitpoints, MONSTER_SPAWN_TICKS);
    fight.progress_ticks = 0;
    ControlFlow::Continue(ActivityState::Combat(fight))
}

fn complete_dungeon(
    state: &mut GameState,
    ctx: &TickContext<'_>,
    dungeon_id: &DungeonId,
    out: &mut TickOutput,
) {
    out.changes.add_dungeon_completion(dungeon_id);
    state.stats.dungeon_completions += 1;

    if let Some(dungeon) = ctx.registry.dungeon(dungeon_id) {
        for reward in &dungeon.completion_rewards {
            grant_items(state, reward, out);
        }
        if dungeon.completion_gold != 0 {
            grant_currency(state, ctx, Currency::Gold, dungeon.completion_gold, out);
        }
    }

    tracing::info!(dungeon = %dungeon_id, "dungeon completed");
    out.emit(TickEvent::DungeonCompleted {
        dungeon_id: dungeon_id.clone(),
    });
}

fn on_player_died(
    state: &mut GameState,
    monster: &MonsterDef,
    ctx: &TickContext<'_>,
    rng: &mut dyn RngCore,
    out: &mut TickOutput,
) {
    out.changes.deaths += 1;
    state.stats.deaths += 1;

    let item_lost = ctx.combat.death_penalty(&state.equipment, rng);
    if let Some(item) = &item_lost {
        if let Some(position) = state.equipment.iter().position(|held| held == item) {
            state.equipment.remove(position);
            out.changes.add_lost_on_death(item);
        }
    }

    state.player.hp = state.max_hp();
    state.player.regen_ticks_remaining = PLAYER_REGEN_INTERVAL_TICKS;

    tracing::info!(monster = %monster.id, lost = ?item_lost, "player died");
    out.emit(TickEvent::PlayerDied {
        monster_id: monster.id.clone(),
        item_lost,
    });
}
