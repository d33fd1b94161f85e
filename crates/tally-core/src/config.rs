use serde::{Deserialize, Serialize};

/// Default XP cap per minute window.
pub const DEFAULT_MINUTE_LIMIT: u64 = 5;

/// Default XP cap per day window.
pub const DEFAULT_DAILY_LIMIT: u64 = 500;

/// Two-tier quota limits. Read-only for the engine; absent fields fall
/// back to the defaults when deserialized from a settings file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaConfig {
    #[serde(default = "default_minute_limit")]
    pub minute_limit: u64,
    #[serde(default = "default_daily_limit")]
    pub daily_limit: u64,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            minute_limit: DEFAULT_MINUTE_LIMIT,
            daily_limit: DEFAULT_DAILY_LIMIT,
        }
    }
}

fn default_minute_limit() -> u64 {
    DEFAULT_MINUTE_LIMIT
}

fn default_daily_limit() -> u64 {
    DEFAULT_DAILY_LIMIT
}
