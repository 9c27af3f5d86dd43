//! Route table.

use crate::handlers::{accounts, cards};
use crate::media;
use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;

/// Builds the application router.
///
/// The literal `add`, `edit` and `delete` routes are registered before the
/// generic `/city/:slug/` pattern so those segments are never interpreted
/// as slug values.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(cards::list_handler))
        .route(
            "/city/add/",
            get(cards::add_form_handler).post(cards::create_handler),
        )
        .route(
            "/city/:slug/edit/",
            get(cards::edit_form_handler).post(cards::edit_handler),
        )
        .route(
            "/city/:slug/delete/",
            get(cards::delete_confirm_handler).post(cards::delete_handler),
        )
        .route("/city/:slug/", get(cards::detail_handler))
        .route(
            "/signup/",
            get(accounts::signup_form_handler).post(accounts::signup_handler),
        )
        .route(
            "/accounts/login/",
            get(accounts::login_form_handler).post(accounts::login_handler),
        )
        .route("/accounts/logout/", post(accounts::logout_handler))
        .route("/media/*path", get(media::media_handler))
        .with_state(state)
}
