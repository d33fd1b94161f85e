//! Per-event progression: filter → rollover → clamp → level → reward,
//! expressed as a pure snapshot transformation.
//!
//! The caller loads a [`UserProgress`], calls [`process_event`], persists
//! the returned snapshot, and (for level-ups) delivers the announcement.
//! Delivery is best-effort: a failed announcement never rolls back state
//! that was already computed.

use serde::Serialize;

use crate::config::QuotaConfig;
use crate::eligibility::{RejectReason, reject_reason};
use crate::event::ActivityEvent;
use crate::level::level_for;
use crate::progress::UserProgress;
use crate::quota::{apply_window_rollover, exhausted, max_grantable};
use crate::reward::{Reward, compute_reward};

/// Trimmed payload length above which a message earns 2 XP instead of 1.
pub const LONG_MESSAGE_CHARS: usize = 50;

/// What one event did to a user's progression.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Outcome {
    /// Ineligible: no XP field changed.
    Rejected { reason: RejectReason },
    /// Eligible, but a quota window was already full.
    QuotaExhausted,
    /// XP applied without crossing a level threshold.
    Granted { gain: u64 },
    /// XP applied and at least one level threshold crossed.
    LeveledUp {
        gain: u64,
        new_level: u32,
        reward: Reward,
    },
}

/// Updated snapshot plus the outcome tag.
#[derive(Clone, Debug)]
pub struct ProcessResult {
    pub user: UserProgress,
    pub outcome: Outcome,
}

/// Apply one activity event to a user snapshot at `now` (unix seconds).
///
/// The input snapshot is never mutated. Bookkeeping (the lifetime message
/// counter and the last-message fields) is unconditional: bans and
/// rejections gate XP only.
pub fn process_event(
    user: &UserProgress,
    event: &ActivityEvent,
    config: &QuotaConfig,
    now: u64,
) -> ProcessResult {
    let mut next = user.clone();
    let trimmed = event.payload().trim();

    next.message_count += 1;
    next.last_message_text = trimmed.to_string();
    next.last_message_at = Some(now);

    if let Some(reason) = reject_reason(event, user.banned) {
        return ProcessResult {
            user: next,
            outcome: Outcome::Rejected { reason },
        };
    }

    apply_window_rollover(&mut next, now);

    if exhausted(&next, config) {
        return ProcessResult {
            user: next,
            outcome: Outcome::QuotaExhausted,
        };
    }

    let requested = if trimmed.chars().count() > LONG_MESSAGE_CHARS {
        2
    } else {
        1
    };
    let gain = max_grantable(&next, requested, config);
    if gain == 0 {
        return ProcessResult {
            user: next,
            outcome: Outcome::QuotaExhausted,
        };
    }

    let old_level = level_for(next.total_xp);
    next.total_xp += gain;
    next.day_xp += gain;
    next.week_xp += gain;
    next.month_xp += gain;
    next.minute_xp += gain;

    let new_level = level_for(next.total_xp);
    next.level = new_level;

    if new_level == old_level {
        return ProcessResult {
            user: next,
            outcome: Outcome::Granted { gain },
        };
    }

    let reward = compute_reward(old_level, new_level);
    next.coins += reward.total_coin;
    ProcessResult {
        user: next,
        outcome: Outcome::LeveledUp {
            gain,
            new_level,
            reward,
        },
    }
}
