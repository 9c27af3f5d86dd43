//! Core domain logic for CityCards.
//! This crate is the single source of truth for business invariants:
//! slug uniqueness, atomic view counting, and listing order.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod slug;

pub use logging::{default_log_level, init_logging};
pub use model::card::{CardChanges, CardDraft, CardListQuery, CityCard, SortKey};
pub use model::user::{Session, User};
pub use repo::card_repo::{CardRepository, SqliteCardRepository};
pub use repo::session_repo::{SessionRepository, SqliteSessionRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::auth_service::{AuthError, AuthService};
pub use service::card_service::{CardService, CardServiceError};
pub use slug::slugify;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
