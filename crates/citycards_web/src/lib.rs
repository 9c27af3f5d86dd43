//! HTTP delivery surface for CityCards.
//!
//! Thin axum glue over `citycards_core`: routing, cookie-session wiring,
//! multipart form intake, media storage and minimal HTML rendering. All
//! business invariants live in the core crate.

pub mod config;
pub mod handlers;
pub mod media;
pub mod render;
pub mod routes;
pub mod session;
pub mod state;

pub use config::Config;
pub use routes::app;
pub use state::AppState;
