//! Cookie-session glue.
//!
//! # Responsibility
//! - Carry the session token in the `sessionid` cookie.
//! - Resolve the cookie to a [`User`] once per request.
//!
//! # Invariants
//! - Cookies are HttpOnly and scoped to `/`.
//! - An unknown or missing token means anonymous, never an error.

use crate::handlers::PageError;
use crate::state::AppState;
use axum::http::HeaderMap;
use citycards_core::{AuthService, SqliteSessionRepository, SqliteUserRepository, User};

pub const SESSION_COOKIE: &str = "sessionid";

/// Builds the `Set-Cookie` value establishing a session.
pub fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax")
}

/// Builds the `Set-Cookie` value clearing the session on logout.
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Extracts the session token from the request's `Cookie` header.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let cookie_header = headers.get(axum::http::header::COOKIE)?.to_str().ok()?;
    for pair in cookie_header.split(';') {
        let mut parts = pair.trim().splitn(2, '=');
        if parts.next() == Some(SESSION_COOKIE) {
            let value = parts.next().unwrap_or("").trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// Resolves the request's session cookie to a user.
///
/// Anonymous requests and stale tokens yield `Ok(None)`; only storage
/// faults error.
pub fn current_user(state: &AppState, headers: &HeaderMap) -> Result<Option<User>, PageError> {
    let Some(token) = session_token(headers) else {
        return Ok(None);
    };

    let conn = crate::handlers::lock_conn(state)?;
    let auth = AuthService::new(
        SqliteUserRepository::new(&conn),
        SqliteSessionRepository::new(&conn),
    );
    auth.user_for_token(&token)
        .map_err(|err| PageError::Internal(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{session_cookie, session_token, SESSION_COOKIE};
    use axum::http::{header::COOKIE, HeaderMap, HeaderValue};

    #[test]
    fn token_is_found_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; sessionid=abc-123; lang=ru"),
        );
        assert_eq!(session_token(&headers).as_deref(), Some("abc-123"));
    }

    #[test]
    fn missing_or_empty_cookie_is_anonymous() {
        assert_eq!(session_token(&HeaderMap::new()), None);

        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("sessionid=; theme=dark"));
        assert_eq!(session_token(&headers), None);
    }

    #[test]
    fn set_cookie_values_are_http_only() {
        let cookie = session_cookie("tok");
        assert!(cookie.starts_with(&format!("{SESSION_COOKIE}=tok")));
        assert!(cookie.contains("HttpOnly"));
    }
}
