// Tick and timing
pub const TICK_INTERVAL_MS: i64 = 100;
pub const TICKS_PER_SECOND: u64 = 10;
pub const TICKS_PER_HOUR: u64 = 36_000;

// Offline catch-up
pub const CATCH_UP_CHUNK_TICKS: u64 = 1_000;
pub const MAX_OFFLINE_TICKS: u64 = 24 * TICKS_PER_HOUR;

// Levels (skills and mastery share one XP table)
pub const MAX_LEVEL: u32 = 99;

// Mastery
/// Pool checkpoints, ascending, as percentages of the pool maximum.
pub const MASTERY_CHECKPOINTS: [u32; 4] = [10, 25, 50, 95];
/// Pool cap contributed by one unlocked action of tier 1..=4.
pub const MASTERY_POOL_CAP_PER_TIER: [u64; 4] = [250_000, 500_000, 750_000, 1_000_000];
pub const MASTERY_POOL_SHARE_PERCENT: u64 = 25;
pub const MASTERY_POOL_SHARE_MAXED_PERCENT: u64 = 50;

// Checkpoint bonuses (percent), held while the pool sits at or above the checkpoint
pub const CHECKPOINT_MASTERY_XP_BONUS: f64 = 5.0;
pub const CHECKPOINT_SKILL_XP_BONUS: f64 = 5.0;
pub const CHECKPOINT_INTERVAL_REDUCTION: f64 = 5.0;
pub const CHECKPOINT_DOUBLE_ITEMS_BONUS: f64 = 10.0;

// Agility
pub const COURSE_COMPLETION_BONUS_PERCENT: u64 = 50;

// Combat timing
pub const PLAYER_ATTACK_INTERVAL_TICKS: u32 = 24;
pub const MONSTER_SPAWN_TICKS: u32 = 30;
pub const PLAYER_REGEN_INTERVAL_TICKS: u32 = 100;
pub const PLAYER_REGEN_PERCENT: u32 = 1;

// Combat stats
pub const HP_PER_HITPOINTS_LEVEL: u32 = 10;
pub const STARTING_HITPOINTS_LEVEL: u32 = 10;
pub const BASE_PLAYER_MAX_HIT: u32 = 10;
pub const MAX_HIT_PER_STRENGTH_LEVEL: u32 = 2;
pub const RATING_LEVEL_OFFSET: u32 = 8;
pub const ACCURACY_PER_ATTACK_LEVEL: u32 = 10;
pub const EVASION_PER_DEFENCE_LEVEL: u32 = 10;
pub const RATING_PER_MONSTER_POINT: u32 = 10;
pub const MIN_HIT_CHANCE: f64 = 0.05;
pub const MAX_HIT_CHANCE: f64 = 0.95;

// Combat XP, awarded on kill
pub const COMBAT_XP_PER_MONSTER_HP: u64 = 4;
pub const HITPOINTS_XP_NUMERATOR: u64 = 4;
pub const HITPOINTS_XP_DENOMINATOR: u64 = 3;

// Inventory
pub const DEFAULT_INVENTORY_SLOTS: usize = 20;

// Snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;
