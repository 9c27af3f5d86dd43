//! Session repository.
//!
//! # Responsibility
//! - Persist login sessions and resolve the `sessionid` cookie token back
//!   to a user id.
//!
//! # Invariants
//! - Tokens are opaque v4 UUIDs generated here, never supplied by callers.
//! - Logout deletes the row; a deleted token never resolves again.

use crate::model::now_epoch_ms;
use crate::model::user::Session;
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

/// Repository interface for login sessions.
pub trait SessionRepository {
    /// Creates a session row for `user_id` and returns it with a fresh token.
    fn create_session(&self, user_id: i64) -> RepoResult<Session>;
    /// Deletes the session; `NotFound` when the token is unknown.
    fn delete_session(&self, token: &str) -> RepoResult<()>;
    /// Resolves a token to its user id, `None` when unknown.
    fn user_id_for_token(&self, token: &str) -> RepoResult<Option<i64>>;
}

/// SQLite-backed session repository.
pub struct SqliteSessionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSessionRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SessionRepository for SqliteSessionRepository<'_> {
    fn create_session(&self, user_id: i64) -> RepoResult<Session> {
        let session = Session {
            token: Uuid::new_v4().to_string(),
            user_id,
            created_at: now_epoch_ms(),
        };

        self.conn.execute(
            "INSERT INTO sessions (token, user_id, created_at)
             VALUES (?1, ?2, ?3);",
            params![
                session.token.as_str(),
                session.user_id,
                session.created_at
            ],
        )?;

        Ok(session)
    }

    fn delete_session(&self, token: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM sessions WHERE token = ?1;", [token])?;
        if changed == 0 {
            return Err(RepoError::NotFound(token.to_string()));
        }
        Ok(())
    }

    fn user_id_for_token(&self, token: &str) -> RepoResult<Option<i64>> {
        let found = self
            .conn
            .query_row(
                "SELECT user_id FROM sessions WHERE token = ?1;",
                [token],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(found)
    }
}
