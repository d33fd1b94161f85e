use rusqlite::Connection;

use crate::error::Result;

pub const SCHEMA_VERSION: i64 = 1;

pub fn initialize(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA journal_mode = WAL;")?;
    conn.pragma_update(None, "busy_timeout", 5000)?;

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS metadata (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS users (
            user_id           INTEGER PRIMARY KEY,
            username          TEXT NOT NULL DEFAULT '',
            role              TEXT NOT NULL DEFAULT 'user',
            banned            INTEGER NOT NULL DEFAULT 0,
            message_count     INTEGER NOT NULL DEFAULT 0,
            total_xp          INTEGER NOT NULL DEFAULT 0,
            day_xp            INTEGER NOT NULL DEFAULT 0,
            week_xp           INTEGER NOT NULL DEFAULT 0,
            month_xp          INTEGER NOT NULL DEFAULT 0,
            minute_xp         INTEGER NOT NULL DEFAULT 0,
            day_key           TEXT NOT NULL DEFAULT '',
            minute_key        TEXT NOT NULL DEFAULT '',
            level             INTEGER NOT NULL DEFAULT 1,
            coins             INTEGER NOT NULL DEFAULT 0,
            last_message_text TEXT NOT NULL DEFAULT '',
            last_message_at   INTEGER
        );

        CREATE INDEX IF NOT EXISTS idx_users_total_xp ON users(total_xp DESC);
        CREATE INDEX IF NOT EXISTS idx_users_coins ON users(coins DESC);
        ",
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO metadata (key, value) VALUES ('schema_version', ?1)",
        [SCHEMA_VERSION.to_string()],
    )?;

    Ok(())
}
