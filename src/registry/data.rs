use super::types::{ActionDef, DungeonDef, LootEntry, MonsterDef, Recipe};
use crate::core::ids::{Currency, Skill};
use crate::items::ItemStack;

#[allow(clippy::too_many_arguments)]
fn action(
    id: &str,
    name: &str,
    skill: Skill,
    level_required: u32,
    base_ticks: u32,
    skill_xp: u64,
    mastery_tier: u8,
    recipes: Vec<Recipe>,
) -> ActionDef {
    ActionDef {
        id: id.into(),
        name: name.to_string(),
        skill,
        level_required,
        base_ticks,
        skill_xp,
        mastery_tier,
        recipes,
        currency_rewards: Vec::new(),
    }
}

fn obstacle(
    id: &str,
    name: &str,
    level_required: u32,
    base_ticks: u32,
    skill_xp: u64,
    gold: i64,
) -> ActionDef {
    ActionDef {
        currency_rewards: vec![(Currency::Gold, gold)],
        ..action(id, name, Skill::Agility, level_required, base_ticks, skill_xp, 1, Vec::new())
    }
}

fn loot(item: &str, weight: u32, min: u64, max: u64) -> LootEntry {
    LootEntry {
        item: item.into(),
        weight,
        min,
        max,
    }
}

#[rustfmt::skip]
pub(super) fn actions() -> Vec<ActionDef> {
    use Skill::*;
    vec![
        // Woodcutting
        action("normal_tree", "Normal Tree", Woodcutting, 1, 30, 10, 1,
            vec![Recipe::gather(ItemStack::new("normal_logs", 1))]),
        action("oak_tree", "Oak Tree", Woodcutting, 10, 40, 15, 1,
            vec![Recipe::gather(ItemStack::new("oak_logs", 1))]),
        action("willow_tree", "Willow Tree", Woodcutting, 25, 50, 22, 2,
            vec![Recipe::gather(ItemStack::new("willow_logs", 1))]),
        action("yew_tree", "Yew Tree", Woodcutting, 60, 80, 80, 3,
            vec![Recipe::gather(ItemStack::new("yew_logs", 1))]),
        // Fishing
        action("raw_shrimp", "Raw Shrimp", Fishing, 1, 50, 10, 1,
            vec![Recipe::gather(ItemStack::new("raw_shrimp", 1))]),
        action("raw_sardine", "Raw Sardine", Fishing, 5, 55, 15, 1,
            vec![Recipe::gather(ItemStack::new("raw_sardine", 1))]),
        // Mining
        action("copper_ore", "Copper", Mining, 1, 30, 7, 1,
            vec![Recipe::gather(ItemStack::new("copper_ore", 1))]),
        action("tin_ore", "Tin", Mining, 1, 30, 7, 1,
            vec![Recipe::gather(ItemStack::new("tin_ore", 1))]),
        action("iron_ore", "Iron", Mining, 15, 30, 14, 2,
            vec![Recipe::gather(ItemStack::new("iron_ore", 1))]),
        // Smithing
        action("bronze_bar", "Bronze Bar", Smithing, 1, 20, 5, 1, vec![
            Recipe::produce(
                vec![ItemStack::new("copper_ore", 1), ItemStack::new("tin_ore", 1)],
                ItemStack::new("bronze_bar", 1),
            ),
            Recipe::produce(
                vec![ItemStack::new("bronze_scrap", 2)],
                ItemStack::new("bronze_bar", 1),
            ),
        ]),
        action("iron_bar", "Iron Bar", Smithing, 10, 20, 8, 2, vec![Recipe::produce(
            vec![ItemStack::new("iron_ore", 1)],
            ItemStack::new("iron_bar", 1),
        )]),
        // Cooking
        action("shrimp", "Shrimp", Cooking, 1, 30, 30, 1, vec![Recipe::produce(
            vec![ItemStack::new("raw_shrimp", 1)],
            ItemStack::new("shrimp", 1),
        )]),
        action("sardine", "Sardine", Cooking, 5, 30, 40, 1, vec![Recipe::produce(
            vec![ItemStack::new("raw_sardine", 1)],
            ItemStack::new("sardine", 1),
        )]),
        // Agility
        obstacle("cargo_net", "Cargo Net", 1, 50, 8, 5),
        obstacle("balance_beam", "Balance Beam", 1, 60, 10, 10),
        obstacle("rope_swing", "Rope Swing", 10, 80, 16, 15),
        obstacle("rock_climb", "Rock Climb", 20, 100, 25, 25),
    ]
}

pub(super) fn monsters() -> Vec<MonsterDef> {
    vec![
        MonsterDef {
            id: "chicken".into(),
            name: "Chicken".to_string(),
            hitpoints: 30,
            attack_interval_ticks: 28,
            max_hit: 2,
            accuracy: 1,
            evasion: 1,
            gold: (0, 2),
            loot_chance_percent: 100,
            loot: vec![loot("feathers", 1, 2, 6)],
            bones: Some("bones".into()),
        },
        MonsterDef {
            id: "cow".into(),
            name: "Cow".to_string(),
            hitpoints: 80,
            attack_interval_ticks: 30,
            max_hit: 4,
            accuracy: 2,
            evasion: 2,
            gold: (0, 5),
            loot_chance_percent: 100,
            loot: vec![loot("cowhide", 1, 1, 1)],
            bones: Some("bones".into()),
        },
        MonsterDef {
            id: "goblin".into(),
            name: "Goblin".to_string(),
            hitpoints: 60,
            attack_interval_ticks: 26,
            max_hit: 6,
            accuracy: 5,
            evasion: 4,
            gold: (3, 15),
            loot_chance_percent: 40,
            loot: vec![loot("bronze_scrap", 3, 1, 2), loot("copper_ore", 1, 1, 3)],
            bones: Some("bones".into()),
        },
        MonsterDef {
            id: "goblin_chief".into(),
            name: "Goblin Chief".to_string(),
            hitpoints: 200,
            attack_interval_ticks: 24,
            max_hit: 12,
            accuracy: 10,
            evasion: 8,
            gold: (20, 60),
            loot_chance_percent: 100,
            loot: vec![loot("bronze_scrap", 1, 3, 6)],
            bones: Some("big_bones".into()),
        },
    ]
}

pub(super) fn dungeons() -> Vec<DungeonDef> {
    vec![DungeonDef {
        id: "goblin_camp".into(),
        name: "Goblin Camp".to_string(),
        monsters: vec!["goblin".into(), "goblin".into(), "goblin_chief".into()],
        completion_rewards: vec![ItemStack::new("goblin_totem", 1)],
        completion_gold: 100,
    }]
}
