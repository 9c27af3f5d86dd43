//! Account handlers: signup, login, logout.
//!
//! Validation failures re-render the form inline; successful signup logs
//! the new account straight in. Already-authenticated visitors are bounced
//! from the login page back to the listing.

use crate::handlers::{lock_conn, PageError};
use crate::state::AppState;
use crate::{render, session};
use axum::extract::{Form, State};
use axum::http::{header::SET_COOKIE, HeaderMap};
use axum::response::{AppendHeaders, Html, IntoResponse, Redirect, Response};
use citycards_core::{
    AuthError, AuthService, SqliteSessionRepository, SqliteUserRepository,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password1: String,
    #[serde(default)]
    pub password2: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// GET `/signup/`: registration form.
pub async fn signup_form_handler() -> Html<String> {
    Html(render::signup_page("", &[]))
}

/// POST `/signup/`: creates the account, starts a session, redirects to
/// the listing. Validation failures re-render the form.
pub async fn signup_handler(
    State(state): State<AppState>,
    Form(form): Form<SignupForm>,
) -> Result<Response, PageError> {
    let outcome = {
        let conn = lock_conn(&state)?;
        let auth = AuthService::new(
            SqliteUserRepository::new(&conn),
            SqliteSessionRepository::new(&conn),
        );
        auth.signup(&form.username, &form.password1, &form.password2)
    };

    match outcome {
        Ok((_, new_session)) => Ok(login_redirect(&new_session.token)),
        Err(AuthError::Validation(problems)) => Ok(Html(render::signup_page(
            form.username.trim(),
            &problems,
        ))
        .into_response()),
        Err(other) => Err(PageError::Internal(other.to_string())),
    }
}

/// GET `/accounts/login/`: login form; authenticated visitors go home.
pub async fn login_form_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, PageError> {
    if session::current_user(&state, &headers)?.is_some() {
        return Ok(Redirect::to("/").into_response());
    }
    Ok(Html(render::login_page("", &[])).into_response())
}

/// POST `/accounts/login/`: verifies credentials and starts a session.
pub async fn login_handler(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, PageError> {
    let outcome = {
        let conn = lock_conn(&state)?;
        let auth = AuthService::new(
            SqliteUserRepository::new(&conn),
            SqliteSessionRepository::new(&conn),
        );
        auth.login(&form.username, &form.password)
    };

    match outcome {
        Ok((_, new_session)) => Ok(login_redirect(&new_session.token)),
        Err(AuthError::InvalidCredentials) => Ok(Html(render::login_page(
            form.username.trim(),
            &["Please enter a correct username and password.".to_string()],
        ))
        .into_response()),
        Err(other) => Err(PageError::Internal(other.to_string())),
    }
}

/// POST `/accounts/logout/`: ends the session and clears the cookie.
pub async fn logout_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, PageError> {
    if let Some(token) = session::session_token(&headers) {
        let conn = lock_conn(&state)?;
        let auth = AuthService::new(
            SqliteUserRepository::new(&conn),
            SqliteSessionRepository::new(&conn),
        );
        auth.logout(&token)
            .map_err(|err| PageError::Internal(err.to_string()))?;
    }

    Ok((
        AppendHeaders([(SET_COOKIE, session::clear_session_cookie())]),
        Redirect::to("/"),
    )
        .into_response())
}

fn login_redirect(token: &str) -> Response {
    (
        AppendHeaders([(SET_COOKIE, session::session_cookie(token))]),
        Redirect::to("/"),
    )
        .into_response()
}
