//! Account and session models backing the authentication glue.
//!
//! # Invariants
//! - `username` is unique across all accounts.
//! - `password_hash` is always a PHC-format argon2 string, never plaintext.
//! - A session token maps to exactly one user until logout deletes it.

use serde::{Deserialize, Serialize};

/// Registered account able to create and edit cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Argon2id PHC string. Skipped on serialization so accidental JSON
    /// dumps never leak credential material.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

/// One login session, carried by the `sessionid` cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque UUID token handed to the client.
    pub token: String,
    pub user_id: i64,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}
