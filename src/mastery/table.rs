//! The shared XP-to-level table used by skills and action mastery.
//!
//! `xp(L) = floor(sum_{n=1}^{L-1} floor(n + 300 * 2^(n/7)) / 4)`, levels 1..=99.

use crate::core::constants::MAX_LEVEL;
use std::sync::OnceLock;

static XP_TABLE: OnceLock<[u64; MAX_LEVEL as usize + 1]> = OnceLock::new();

fn table() -> &'static [u64; MAX_LEVEL as usize + 1] {
    XP_TABLE.get_or_init(|| {
        // Index 0 is unused, index L holds the threshold for level L.
        let mut table = [0u64; MAX_LEVEL as usize + 1];
        let mut points = 0u64;
        for level in 2..=MAX_LEVEL {
            let n = (level - 1) as f64;
            points += (n + 300.0 * 2f64.powf(n / 7.0)).floor() as u64;
            table[level as usize] = points / 4;
        }
        table
    })
}

/// XP required to reach `level`. Levels above the cap clamp to the cap.
pub fn xp_for_level(level: u32) -> u64 {
    let level = level.clamp(1, MAX_LEVEL);
    table()[level as usize]
}

/// Level reached with `xp` total experience (1..=99).
pub fn level_for_xp(xp: u64) -> u32 {
    let table = table();
    // Thresholds are strictly increasing from level 2 on.
    let reached = table[2..].partition_point(|&threshold| threshold <= xp);
    1 + reached as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_two_needs_83_xp() {
        assert_eq!(xp_for_level(1), 0);
        assert_eq!(xp_for_level(2), 83);
        assert_eq!(xp_for_level(10), 1_154);
    }

    #[test]
    fn test_level_99_threshold() {
        assert_eq!(xp_for_level(99), 13_034_431);
        assert_eq!(xp_for_level(150), 13_034_431);
    }

    #[test]
    fn test_table_strictly_increasing() {
        for level in 2..MAX_LEVEL {
            assert!(
                xp_for_level(level + 1) > xp_for_level(level),
                "threshold for level {} must exceed level {}",
                level + 1,
                level
            );
        }
    }

    #[test]
    fn test_level_for_xp_boundaries() {
        assert_eq!(level_for_xp(0), 1);
        assert_eq!(level_for_xp(82), 1);
        assert_eq!(level_for_xp(83), 2);
        assert_eq!(level_for_xp(1_154), 10);
        assert_eq!(level_for_xp(13_034_430), 98);
        assert_eq!(level_for_xp(13_034_431), 99);
        assert_eq!(level_for_xp(u64::MAX), 99);
    }

    #[test]
    fn test_level_for_xp_inverts_threshold() {
        for level in 1..=MAX_LEVEL {
            assert_eq!(level_for_xp(xp_for_level(level)), level);
        }
    }
}
