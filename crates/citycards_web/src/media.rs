//! Uploaded image storage and serving.
//!
//! # Responsibility
//! - Write uploaded image bytes under `<media_dir>/cities/` and hand back
//!   the relative path stored on the card.
//! - Serve stored files under `/media/*`.
//!
//! # Invariants
//! - Stored names are uuid-prefixed and sanitized; an upload can never
//!   escape the media root or overwrite another upload.

use crate::handlers::PageError;
use crate::state::AppState;
use axum::extract::{Path as UrlPath, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use std::path::Path;
use uuid::Uuid;

/// Persists uploaded image bytes and returns the stored relative path
/// (e.g. `cities/1f3c...-photo.jpg`).
pub fn save_image(
    media_dir: &Path,
    original_name: &str,
    bytes: &[u8],
) -> Result<String, PageError> {
    let relative = format!("cities/{}-{}", Uuid::new_v4(), sanitize_filename(original_name));
    let target = media_dir.join(&relative);

    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|err| PageError::Internal(format!("media dir creation failed: {err}")))?;
    }
    std::fs::write(&target, bytes)
        .map_err(|err| PageError::Internal(format!("media write failed: {err}")))?;

    log::info!(
        "event=media_store module=web status=ok path={relative} bytes={}",
        bytes.len()
    );
    Ok(relative)
}

/// Best-effort removal of a stored upload whose owning record failed to
/// persist.
pub fn discard_image(media_dir: &Path, relative: &str) {
    if std::fs::remove_file(media_dir.join(relative)).is_err() {
        log::warn!("event=media_discard module=web status=error path={relative}");
    }
}

/// GET `/media/*path`: serves a stored upload.
pub async fn media_handler(
    State(state): State<AppState>,
    UrlPath(path): UrlPath<String>,
) -> Response {
    // Reject anything that could step outside the media root.
    if path.split('/').any(|segment| segment == ".." || segment.is_empty()) {
        return StatusCode::NOT_FOUND.into_response();
    }

    match tokio::fs::read(state.media_dir.join(&path)).await {
        Ok(bytes) => (
            [(header::CONTENT_TYPE, content_type_for(&path))],
            bytes,
        )
            .into_response(),
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}

fn sanitize_filename(original: &str) -> String {
    let base = original.rsplit(['/', '\\']).next().unwrap_or("");
    let cleaned: String = base
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_') {
                ch
            } else {
                '-'
            }
        })
        .collect();
    let trimmed = cleaned.trim_matches('-').to_string();
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed
    }
}

fn content_type_for(path: &str) -> &'static str {
    match path.rsplit('.').next().map(str::to_ascii_lowercase).as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
