use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::Mutex;

use crate::types::{ChatMessage, ChatRole, UserAccount};

const SCHEMA_SQL: &str = include_str!("../../../schema.sql");

pub struct Db {
    conn: Mutex<Connection>,
}

// ── Timestamp helpers ─────────────────────────────────────────────────────

fn parse_ts(s: &str) -> DateTime<Utc> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|ndt| ndt.and_utc())
        .unwrap_or_else(|_| Utc::now())
}

fn fmt_ts(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

// ── Row mappers ───────────────────────────────────────────────────────────

fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserAccount> {
    let created_at_str: String = row.get(3)?;
    Ok(UserAccount {
        id: row.get(0)?,
        username: row.get(1)?,
        password_hash: row.get(2)?,
        created_at: parse_ts(&created_at_str),
    })
}

fn row_to_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<ChatMessage> {
    let role_str: String = row.get(0)?;
    let timestamp_str: String = row.get(2)?;
    Ok(ChatMessage {
        role: if role_str == "assistant" {
            ChatRole::Assistant
        } else {
            ChatRole::User
        },
        content: row.get(1)?,
        timestamp: parse_ts(&timestamp_str),
    })
}

// ── Db impl ───────────────────────────────────────────────────────────────

impl Db {
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open SQLite database at {path:?}"))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("failed to set PRAGMAs")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn migrate(&mut self) -> Result<()> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        conn.execute_batch(SCHEMA_SQL)
            .context("failed to apply schema migrations")?;
        Ok(())
    }

    // ── Users ─────────────────────────────────────────────────────────────

    /// Insert a new account. Fails if the username is already taken.
    pub fn insert_user(&self, username: &str, password_hash: &str) -> Result<i64> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        conn.execute(
            "INSERT INTO users (username, password_hash, created_at) VALUES (?1, ?2, ?3)",
            params![username, password_hash, fmt_ts(&Utc::now())],
        )
        .context("insert_user")?;
        Ok(conn.last_insert_rowid())
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserAccount>> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let result = conn
            .query_row(
                "SELECT id, username, password_hash, created_at FROM users WHERE username = ?1",
                params![username],
                row_to_user,
            )
            .optional()
            .context("get_user_by_username")?;
        Ok(result)
    }

    pub fn username_taken(&self, username: &str) -> Result<bool> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM users WHERE username = ?1",
                params![username],
                |row| row.get(0),
            )
            .context("username_taken")?;
        Ok(count > 0)
    }

    // ── Conversations ─────────────────────────────────────────────────────

    /// The full conversation for a user, in chronological order. Empty if
    /// the user has no stored messages.
    pub fn get_conversation(&self, user_id: &str) -> Result<Vec<ChatMessage>> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let mut stmt = conn.prepare(
            "SELECT role, content, timestamp FROM conversations \
             WHERE user_id = ?1 ORDER BY seq ASC",
        )?;
        let messages = stmt
            .query_map(params![user_id], row_to_message)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("get_conversation")?;
        Ok(messages)
    }

    /// Replace the stored conversation with `messages`, all-or-nothing.
    /// A failure anywhere rolls back and leaves the previous sequence
    /// untouched.
    pub fn replace_conversation(&self, user_id: &str, messages: &[ChatMessage]) -> Result<()> {
        let mut guard = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        let tx = guard.transaction().context("replace_conversation: begin")?;
        tx.execute(
            "DELETE FROM conversations WHERE user_id = ?1",
            params![user_id],
        )
        .context("replace_conversation: delete")?;
        for (seq, msg) in messages.iter().enumerate() {
            tx.execute(
                "INSERT INTO conversations (user_id, seq, role, content, timestamp) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    user_id,
                    seq as i64,
                    msg.role.as_str(),
                    msg.content,
                    fmt_ts(&msg.timestamp),
                ],
            )
            .context("replace_conversation: insert")?;
        }
        tx.commit().context("replace_conversation: commit")?;
        Ok(())
    }

    pub fn clear_conversation(&self, user_id: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap_or_else(|e| e.into_inner());
        conn.execute(
            "DELETE FROM conversations WHERE user_id = ?1",
            params![user_id],
        )
        .context("clear_conversation")?;
        Ok(())
    }
}
