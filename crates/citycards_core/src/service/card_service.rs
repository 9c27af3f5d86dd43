//! City card use-case service.
//!
//! # Responsibility
//! - Front the card repository for handlers: trim text intake, map the
//!   repository's not-found into a typed service error, normalize listing
//!   parameters.
//!
//! # Invariants
//! - Text fields are whitespace-trimmed before persistence; trimming never
//!   rejects (empty title/region are accepted by design).
//! - `view_card` is the only path that touches the view counter.

use crate::model::card::{CardChanges, CardDraft, CardListQuery, CityCard, SortKey};
use crate::repo::card_repo::CardRepository;
use crate::repo::{RepoError, RepoResult};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for card use-cases.
#[derive(Debug)]
pub enum CardServiceError {
    /// The slug resolved to no card.
    CardNotFound(String),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for CardServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CardNotFound(slug) => write!(f, "city card not found: {slug}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CardServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::CardNotFound(_) => None,
        }
    }
}

impl From<RepoError> for CardServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(slug) => Self::CardNotFound(slug),
            other => Self::Repo(other),
        }
    }
}

/// Card service facade over repository implementations.
pub struct CardService<R: CardRepository> {
    repo: R,
}

impl<R: CardRepository> CardService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one card from form intake. Returns the persisted record
    /// including its final slug.
    pub fn create_card(&self, mut draft: CardDraft) -> Result<CityCard, CardServiceError> {
        trim_in_place(&mut draft.title);
        trim_in_place(&mut draft.region);
        trim_in_place(&mut draft.short_description);
        trim_in_place(&mut draft.content);
        Ok(self.repo.create_card(&draft)?)
    }

    /// Rewrites the editable fields of the card stored under `slug`.
    pub fn update_card(
        &self,
        slug: &str,
        mut changes: CardChanges,
    ) -> Result<CityCard, CardServiceError> {
        trim_in_place(&mut changes.title);
        trim_in_place(&mut changes.region);
        trim_in_place(&mut changes.short_description);
        trim_in_place(&mut changes.content);
        Ok(self.repo.update_card(slug, &changes)?)
    }

    /// Deletes the card stored under `slug`.
    pub fn delete_card(&self, slug: &str) -> Result<(), CardServiceError> {
        Ok(self.repo.delete_card(slug)?)
    }

    /// Plain lookup without counting a view (edit/delete forms).
    pub fn get_card(&self, slug: &str) -> RepoResult<Option<CityCard>> {
        self.repo.get_by_slug(slug)
    }

    /// Detail-view lookup: adds exactly one view and returns the card with
    /// the incremented counter.
    pub fn view_card(&self, slug: &str) -> Result<CityCard, CardServiceError> {
        Ok(self.repo.get_by_slug_counting_view(slug)?)
    }

    /// Runs the listing query from raw request parameters.
    ///
    /// Blank search text means no filter; any unrecognized sort parameter
    /// falls back to population order.
    pub fn list_cards(
        &self,
        q: Option<&str>,
        sort_param: Option<&str>,
    ) -> Result<Vec<CityCard>, CardServiceError> {
        let query = CardListQuery {
            q: q.map(str::trim)
                .filter(|text| !text.is_empty())
                .map(str::to_string),
            sort: SortKey::from_param(sort_param),
        };
        Ok(self.repo.list_cards(&query)?)
    }
}

fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        let owned = trimmed.to_string();
        *value = owned;
    }
}
