//! Persistence layer: repository contracts and SQLite implementations.

pub mod card_repo;
pub mod session_repo;
pub mod user_repo;

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error shared by card, user and session persistence.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// The key (slug, token, username) resolved to no row.
    NotFound(String),
    /// A uniqueness constraint rejected the write (e.g. duplicate username).
    Conflict(String),
    /// Persisted state failed to decode into a domain value.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(key) => write!(f, "record not found: {key}"),
            Self::Conflict(message) => write!(f, "conflicting record: {message}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::Conflict(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
