//! Request handlers and the page-level error taxonomy.

pub mod accounts;
pub mod cards;

use crate::render;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use citycards_core::{CardServiceError, RepoError};

/// User-visible request outcome for anything that is not a success page.
#[derive(Debug)]
pub enum PageError {
    /// Slug or path resolved to nothing: 404.
    NotFound,
    /// Storage or infrastructure fault: logged, generic 500.
    Internal(String),
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => {
                (StatusCode::NOT_FOUND, Html(render::not_found_page())).into_response()
            }
            Self::Internal(detail) => {
                log::error!("event=request_failed module=web status=error error={detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(render::server_error_page()),
                )
                    .into_response()
            }
        }
    }
}

impl From<CardServiceError> for PageError {
    fn from(value: CardServiceError) -> Self {
        match value {
            CardServiceError::CardNotFound(_) => Self::NotFound,
            CardServiceError::Repo(err) => Self::Internal(err.to_string()),
        }
    }
}

impl From<RepoError> for PageError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(_) => Self::NotFound,
            other => Self::Internal(other.to_string()),
        }
    }
}

/// Locks the shared SQLite connection for a burst of repository calls.
/// Never held across an await point.
pub(crate) fn lock_conn(
    state: &crate::state::AppState,
) -> Result<std::sync::MutexGuard<'_, rusqlite::Connection>, PageError> {
    state
        .conn
        .lock()
        .map_err(|_| PageError::Internal("connection lock poisoned".to_string()))
}

/// Parses an optional numeric form field: empty (and unparsable) input
/// means absent, never zero.
pub(crate) fn parse_optional<T: std::str::FromStr>(raw: Option<&str>) -> Option<T> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .and_then(|value| value.parse().ok())
}
