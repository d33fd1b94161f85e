use serde::{Deserialize, Serialize};

/// Privilege tier, assigned once when the user record is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        if s == "admin" { Role::Admin } else { Role::User }
    }
}

/// Per-user progression snapshot.
///
/// Owned by the caller: the engine receives a snapshot, returns an updated
/// copy, and never persists anything itself. `day_xp`/`minute_xp` are
/// capped by the quota windows named in `day_key`/`minute_key`;
/// `week_xp`/`month_xp` are unbounded accumulators zeroed by an external
/// periodic job through the reset hooks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProgress {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
    pub banned: bool,
    pub message_count: u64,
    pub total_xp: u64,
    pub day_xp: u64,
    pub week_xp: u64,
    pub month_xp: u64,
    pub minute_xp: u64,
    pub day_key: String,
    pub minute_key: String,
    /// Cached level; always equals `level_for(total_xp)` after any
    /// engine call.
    pub level: u32,
    pub coins: u64,
    pub last_message_text: String,
    pub last_message_at: Option<u64>,
}

impl UserProgress {
    /// Fresh record: all counters zero, level 1, empty window keys (the
    /// first rollover check sets them).
    pub fn new(user_id: i64, username: &str, role: Role) -> Self {
        Self {
            user_id,
            username: username.to_string(),
            role,
            banned: false,
            message_count: 0,
            total_xp: 0,
            day_xp: 0,
            week_xp: 0,
            month_xp: 0,
            minute_xp: 0,
            day_key: String::new(),
            minute_key: String::new(),
            level: 1,
            coins: 0,
            last_message_text: String::new(),
            last_message_at: None,
        }
    }

    /// Zero the weekly aggregate. Called by an external periodic job,
    /// never by the engine.
    pub fn reset_week_xp(&mut self) {
        self.week_xp = 0;
    }

    /// Zero the monthly aggregate. Called by an external periodic job,
    /// never by the engine.
    pub fn reset_month_xp(&mut self) {
        self.month_xp = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_starts_at_level_one() {
        let user = UserProgress::new(42, "alice", Role::User);
        assert_eq!(user.level, 1);
        assert_eq!(user.total_xp, 0);
        assert_eq!(user.coins, 0);
        assert!(user.day_key.is_empty());
        assert!(user.minute_key.is_empty());
        assert_eq!(user.last_message_at, None);
    }

    #[test]
    fn test_reset_hooks_only_touch_their_aggregate() {
        let mut user = UserProgress::new(1, "", Role::User);
        user.total_xp = 100;
        user.week_xp = 40;
        user.month_xp = 90;

        user.reset_week_xp();
        assert_eq!(user.week_xp, 0);
        assert_eq!(user.month_xp, 90);
        assert_eq!(user.total_xp, 100);

        user.reset_month_xp();
        assert_eq!(user.month_xp, 0);
    }

    #[test]
    fn test_role_round_trip() {
        assert_eq!(Role::from(Role::Admin.as_str()), Role::Admin);
        assert_eq!(Role::from(Role::User.as_str()), Role::User);
        // Unknown labels degrade to the unprivileged tier
        assert_eq!(Role::from("moderator"), Role::User);
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut user = UserProgress::new(9, "bob", Role::Admin);
        user.total_xp = 123;
        user.day_key = "2024-01-01".to_string();
        let json = serde_json::to_string(&user).unwrap();
        let back: UserProgress = serde_json::from_str(&json).unwrap();
        assert_eq!(user, back);
    }
}
