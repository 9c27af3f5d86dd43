//! Account repository.
//!
//! # Responsibility
//! - Persist registered accounts and resolve them by id or username.
//!
//! # Invariants
//! - `username` uniqueness is enforced by the schema; a violating insert
//!   surfaces as [`RepoError::Conflict`], never as a generic DB fault.

use crate::model::now_epoch_ms;
use crate::model::user::User;
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};

/// Repository interface for account persistence.
pub trait UserRepository {
    /// Inserts a new account with an already-hashed password.
    fn create_user(&self, username: &str, password_hash: &str) -> RepoResult<User>;
    fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;
    fn find_by_id(&self, id: i64) -> RepoResult<Option<User>>;
}

/// SQLite-backed account repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, username: &str, password_hash: &str) -> RepoResult<User> {
        let inserted = self.conn.execute(
            "INSERT INTO users (username, password_hash, created_at)
             VALUES (?1, ?2, ?3);",
            params![username, password_hash, now_epoch_ms()],
        );

        if let Err(err) = inserted {
            if is_unique_violation(&err) {
                return Err(RepoError::Conflict(format!(
                    "username `{username}` is already taken"
                )));
            }
            return Err(err.into());
        }

        let id = self.conn.last_insert_rowid();
        self.find_by_id(id)?.ok_or_else(|| {
            RepoError::InvalidData("created user not found in read-back".to_string())
        })
    }

    fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let found = self
            .conn
            .query_row(
                "SELECT id, username, password_hash, created_at
                 FROM users WHERE username = ?1;",
                [username],
                parse_user_row,
            )
            .optional()?;
        Ok(found)
    }

    fn find_by_id(&self, id: i64) -> RepoResult<Option<User>> {
        let found = self
            .conn
            .query_row(
                "SELECT id, username, password_hash, created_at
                 FROM users WHERE id = ?1;",
                [id],
                parse_user_row,
            )
            .optional()?;
        Ok(found)
    }
}

fn parse_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("id")?,
        username: row.get("username")?,
        password_hash: row.get("password_hash")?,
        created_at: row.get("created_at")?,
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(inner, _)
            if inner.code == ErrorCode::ConstraintViolation
    )
}
