//! City card domain model.
//!
//! # Responsibility
//! - Define the canonical record for one city card and its write shapes.
//! - Define listing query options (search text + sort key).
//!
//! # Invariants
//! - `id` is stable and never reused for another card.
//! - `slug` is globally unique; once set it only changes when explicitly
//!   cleared to empty before a save.
//! - `views_count` is non-negative and only ever incremented.

use serde::{Deserialize, Serialize};

/// Stable identifier for a persisted city card.
pub type CardId = i64;

/// Canonical city card record as persisted in the `cities` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityCard {
    /// Stable row id assigned at creation.
    pub id: CardId,
    /// City name. May be empty; this layer does not validate content.
    pub title: String,
    /// Region name. May be empty.
    pub region: String,
    /// Unique URL-safe identifier derived from `title` at creation.
    pub slug: String,
    /// Stored media path reference, relative to the media root.
    pub image: Option<String>,
    /// Population count. `None` means unknown, not zero.
    pub population: Option<u32>,
    /// Listing teaser text.
    pub short_description: String,
    /// Full article body.
    pub content: String,
    /// Unix epoch milliseconds. Set once at creation, immutable.
    pub created_at: i64,
    /// Creating user. Required; any authenticated user may edit later.
    pub author_id: i64,
    /// Detail-view counter. Incremented atomically in storage.
    pub views_count: i64,
    /// Optional map coordinate.
    pub lat: Option<f64>,
    /// Optional map coordinate.
    pub lon: Option<f64>,
}

/// Write shape for creating a new card.
///
/// The slug is intentionally absent: it is derived from `title` inside the
/// repository so uniqueness probing and insertion share one connection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardDraft {
    pub title: String,
    pub region: String,
    pub short_description: String,
    pub content: String,
    pub population: Option<u32>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub image: Option<String>,
    pub author_id: i64,
}

/// Write shape for editing an existing card.
///
/// `image = None` keeps the stored image (form uploads are optional on
/// edit); every other field replaces the stored value. The slug is never
/// part of an edit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardChanges {
    pub title: String,
    pub region: String,
    pub short_description: String,
    pub content: String,
    pub population: Option<u32>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub image: Option<String>,
}

/// Listing order selected by the `sort` request parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// `created_at` descending.
    Newest,
    /// `title` ascending.
    Title,
    /// `population` descending with unknown values last, then newest first.
    /// This is the default and absorbs every unrecognized parameter value.
    #[default]
    Population,
}

impl SortKey {
    /// Maps the raw `sort` query parameter to a sort key.
    ///
    /// Anything other than `new` or `title` (including absence) falls back
    /// to population order.
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("new") => Self::Newest,
            Some("title") => Self::Title,
            _ => Self::Population,
        }
    }
}

/// Query options for the card listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardListQuery {
    /// Free-text filter matched case-insensitively against title OR region.
    /// `None` or blank means no filtering.
    pub q: Option<String>,
    /// Requested ordering.
    pub sort: SortKey,
}
