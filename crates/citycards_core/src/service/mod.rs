//! Use-case services composing repositories for callers.

pub mod auth_service;
pub mod card_service;
