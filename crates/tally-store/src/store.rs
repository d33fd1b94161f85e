use std::collections::HashSet;
use std::path::Path;

use rusqlite::{Connection, OptionalExtension, Row, params};

use tally_core::{Role, UserProgress};

use crate::error::Result;
use crate::schema;

const USER_COLUMNS: &str = "user_id, username, role, banned, message_count, \
     total_xp, day_xp, week_xp, month_xp, minute_xp, day_key, minute_key, \
     level, coins, last_message_text, last_message_at";

/// SQLite-backed store of per-user progression snapshots.
///
/// The store never mutates progression state itself; it loads snapshots
/// for the engine and writes back whatever the engine returned.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    // --- Metadata ---

    pub fn get_metadata(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM metadata WHERE key = ?1")?;
        let result = stmt.query_row([key], |row| row.get(0)).ok();
        Ok(result)
    }

    pub fn set_metadata(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    // --- Users ---

    /// Load a user's snapshot, if one exists.
    pub fn find_user(&self, user_id: i64) -> Result<Option<UserProgress>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"))?;
        let user = stmt.query_row([user_id], user_from_row).optional()?;
        Ok(user)
    }

    /// Load a user or create a fresh record. First-seen users get the
    /// admin role when their id is in the privileged set; an updated
    /// username on the event refreshes the stored one.
    pub fn ensure_user(
        &self,
        user_id: i64,
        username: &str,
        admin_ids: &HashSet<i64>,
    ) -> Result<UserProgress> {
        if let Some(mut user) = self.find_user(user_id)? {
            if !username.is_empty() && user.username != username {
                user.username = username.to_string();
            }
            return Ok(user);
        }

        let role = if admin_ids.contains(&user_id) {
            Role::Admin
        } else {
            Role::User
        };
        let user = UserProgress::new(user_id, username, role);
        self.save_user(&user)?;
        tracing::debug!("created user {user_id} with role {}", role.as_str());
        Ok(user)
    }

    /// Write a snapshot back, replacing any previous row for the user.
    pub fn save_user(&self, user: &UserProgress) -> Result<()> {
        self.conn.execute(
            &format!(
                "INSERT OR REPLACE INTO users ({USER_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)"
            ),
            params![
                user.user_id,
                user.username,
                user.role.as_str(),
                user.banned as i64,
                user.message_count,
                user.total_xp,
                user.day_xp,
                user.week_xp,
                user.month_xp,
                user.minute_xp,
                user.day_key,
                user.minute_key,
                user.level,
                user.coins,
                user.last_message_text,
                user.last_message_at,
            ],
        )?;
        Ok(())
    }

    pub fn user_count(&self) -> Result<u64> {
        let count: u64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Top users by lifetime XP, ties broken by id for a stable order.
    pub fn top_by_xp(&self, limit: u32) -> Result<Vec<UserProgress>> {
        self.top_by("total_xp", limit)
    }

    /// Top users by coin balance.
    pub fn top_by_coins(&self, limit: u32) -> Result<Vec<UserProgress>> {
        self.top_by("coins", limit)
    }

    fn top_by(&self, column: &str, limit: u32) -> Result<Vec<UserProgress>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY {column} DESC, user_id ASC LIMIT ?1"
        ))?;
        let users = stmt
            .query_map([limit], user_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(users)
    }

    // --- Aggregate resets (driven by an external periodic job) ---

    /// Zero `week_xp` for every user. Returns the number of rows touched.
    pub fn reset_week_xp(&self) -> Result<usize> {
        let n = self
            .conn
            .execute("UPDATE users SET week_xp = 0 WHERE week_xp > 0", [])?;
        tracing::info!("reset week_xp for {n} users");
        Ok(n)
    }

    /// Zero `month_xp` for every user. Returns the number of rows touched.
    pub fn reset_month_xp(&self) -> Result<usize> {
        let n = self
            .conn
            .execute("UPDATE users SET month_xp = 0 WHERE month_xp > 0", [])?;
        tracing::info!("reset month_xp for {n} users");
        Ok(n)
    }
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserProgress> {
    Ok(UserProgress {
        user_id: row.get(0)?,
        username: row.get(1)?,
        role: Role::from(row.get::<_, String>(2)?.as_str()),
        banned: row.get::<_, i64>(3)? != 0,
        message_count: row.get(4)?,
        total_xp: row.get(5)?,
        day_xp: row.get(6)?,
        week_xp: row.get(7)?,
        month_xp: row.get(8)?,
        minute_xp: row.get(9)?,
        day_key: row.get(10)?,
        minute_key: row.get(11)?,
        level: row.get(12)?,
        coins: row.get(13)?,
        last_message_text: row.get(14)?,
        last_message_at: row.get(15)?,
    })
}
