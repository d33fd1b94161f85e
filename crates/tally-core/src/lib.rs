//! Per-user XP accrual and leveling engine.
//!
//! Converts a stream of chat activity events into bounded, time-windowed
//! progress: an eligibility gate decides whether a message counts at all,
//! a two-tier (per-minute, per-day) quota clamps each gain, level-ups
//! fall out of a square-root curve over lifetime XP, and tiered coin
//! rewards pay out when thresholds are crossed.
//!
//! Zero I/O — pure engine with no opinions about transport, persistence,
//! or the clock. The caller loads a [`UserProgress`] snapshot, hands it
//! to [`process_event`] together with the event and quota limits,
//! persists the returned snapshot, and delivers any announcement.

pub mod config;
pub mod eligibility;
pub mod event;
pub mod level;
pub mod progress;
pub mod progression;
pub mod quota;
pub mod reward;
pub mod window;

pub use config::{DEFAULT_DAILY_LIMIT, DEFAULT_MINUTE_LIMIT, QuotaConfig};
pub use eligibility::{MIN_PAYLOAD_CHARS, RejectReason, is_eligible, reject_reason};
pub use event::{ActivityEvent, ChatContext};
pub use level::{level_delta, level_for};
pub use progress::{Role, UserProgress};
pub use progression::{LONG_MESSAGE_CHARS, Outcome, ProcessResult, process_event};
pub use quota::{apply_window_rollover, exhausted, max_grantable, remaining};
pub use reward::{COIN_PER_LEVEL, MILESTONES, Reward, compute_reward};
pub use window::{day_key, minute_key};
