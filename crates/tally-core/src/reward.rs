//! Currency rewards for level-ups: a flat coin amount per level gained
//! plus one-time bonuses at milestone levels.

use serde::{Deserialize, Serialize};

/// Coin paid per level gained.
pub const COIN_PER_LEVEL: u64 = 50;

/// One-time bonuses paid when a milestone level is first reached.
/// Must stay sorted by level.
pub const MILESTONES: &[(u32, u64)] = &[
    (5, 20),
    (10, 40),
    (20, 60),
    (30, 80),
    (40, 100),
    (50, 150),
    (75, 200),
    (100, 300),
];

/// Breakdown of a single level-up payout.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub per_level_coin: u64,
    pub milestone_coin: u64,
    pub total_coin: u64,
    /// Milestone levels crossed by this jump, ascending.
    pub milestones_hit: Vec<u32>,
}

/// Payout for climbing from `old_level` to `new_level`.
///
/// Every milestone in the range `(old_level, new_level]` pays exactly
/// once, so a jump that skips past a milestone without landing on it
/// still collects the bonus. Levels beyond the table pay per-level coin
/// only.
pub fn compute_reward(old_level: u32, new_level: u32) -> Reward {
    let gained = new_level.saturating_sub(old_level) as u64;
    let per_level_coin = gained * COIN_PER_LEVEL;

    let mut milestone_coin = 0;
    let mut milestones_hit = Vec::new();
    for &(level, bonus) in MILESTONES {
        if level > old_level && level <= new_level {
            milestone_coin += bonus;
            milestones_hit.push(level);
        }
    }

    Reward {
        per_level_coin,
        milestone_coin,
        total_coin: per_level_coin + milestone_coin,
        milestones_hit,
    }
}
