//! City card repository: the record store plus the listing query.
//!
//! # Responsibility
//! - Own slug uniqueness: derive-and-probe happens here, on the same
//!   connection that inserts the row.
//! - Own the view counter: increments are a single additive UPDATE in
//!   storage, never a read-modify-write in process memory.
//! - Serve the listing as a fresh query per call (no cursor state).
//!
//! # Invariants
//! - `slug` stays unique across all cards; probing excludes the card being
//!   saved so re-saving a card keeps its own slug.
//! - An existing non-empty slug is never regenerated by an edit.
//! - `created_at` and `author_id` are write-once.

use crate::model::card::{CardChanges, CardDraft, CardId, CardListQuery, CityCard, SortKey};
use crate::model::now_epoch_ms;
use crate::repo::{RepoError, RepoResult};
use crate::slug::slug_base;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const CARD_SELECT_SQL: &str = "SELECT
    id,
    title,
    region,
    slug,
    image,
    population,
    short_description,
    content,
    created_at,
    author_id,
    views_count,
    lat,
    lon
FROM cities";

/// Repository interface for city card persistence and queries.
pub trait CardRepository {
    /// Persists a new card, deriving a unique slug from its title.
    fn create_card(&self, draft: &CardDraft) -> RepoResult<CityCard>;
    /// Rewrites the editable fields of the card stored under `slug`.
    fn update_card(&self, slug: &str, changes: &CardChanges) -> RepoResult<CityCard>;
    /// Removes the card stored under `slug`.
    fn delete_card(&self, slug: &str) -> RepoResult<()>;
    /// Plain lookup without side effects (edit/delete form rendering).
    fn get_by_slug(&self, slug: &str) -> RepoResult<Option<CityCard>>;
    /// Detail-view lookup: atomically adds one view, then returns the card
    /// with the fresh counter visible.
    fn get_by_slug_counting_view(&self, slug: &str) -> RepoResult<CityCard>;
    /// Runs the listing query: optional text filter, requested order.
    fn list_cards(&self, query: &CardListQuery) -> RepoResult<Vec<CityCard>>;
}

/// SQLite-backed card repository.
pub struct SqliteCardRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCardRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn get_by_id(&self, id: CardId) -> RepoResult<Option<CityCard>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CARD_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_card_row(row)?));
        }
        Ok(None)
    }
}

impl CardRepository for SqliteCardRepository<'_> {
    fn create_card(&self, draft: &CardDraft) -> RepoResult<CityCard> {
        let slug = next_free_slug(self.conn, &slug_base(&draft.title), None)?;

        self.conn.execute(
            "INSERT INTO cities (
                title,
                region,
                slug,
                image,
                population,
                short_description,
                content,
                created_at,
                author_id,
                views_count,
                lat,
                lon
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 0, ?10, ?11);",
            params![
                draft.title.as_str(),
                draft.region.as_str(),
                slug.as_str(),
                draft.image.as_deref(),
                draft.population.map(i64::from),
                draft.short_description.as_str(),
                draft.content.as_str(),
                now_epoch_ms(),
                draft.author_id,
                draft.lat,
                draft.lon,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        self.get_by_id(id)?.ok_or_else(|| {
            RepoError::InvalidData("created card not found in read-back".to_string())
        })
    }

    fn update_card(&self, slug: &str, changes: &CardChanges) -> RepoResult<CityCard> {
        let Some((id, stored_slug)) = find_id_and_slug(self.conn, slug)? else {
            return Err(RepoError::NotFound(slug.to_string()));
        };

        // COALESCE keeps the stored image when no replacement was uploaded.
        self.conn.execute(
            "UPDATE cities
             SET
                title = ?1,
                region = ?2,
                short_description = ?3,
                content = ?4,
                population = ?5,
                lat = ?6,
                lon = ?7,
                image = COALESCE(?8, image)
             WHERE id = ?9;",
            params![
                changes.title.as_str(),
                changes.region.as_str(),
                changes.short_description.as_str(),
                changes.content.as_str(),
                changes.population.map(i64::from),
                changes.lat,
                changes.lon,
                changes.image.as_deref(),
                id,
            ],
        )?;

        // A cleared slug regenerates at save time, exactly like creation but
        // excluding this row from the uniqueness probe.
        if stored_slug.is_empty() {
            let regenerated = next_free_slug(self.conn, &slug_base(&changes.title), Some(id))?;
            self.conn.execute(
                "UPDATE cities SET slug = ?1 WHERE id = ?2;",
                params![regenerated.as_str(), id],
            )?;
        }

        self.get_by_id(id)?.ok_or_else(|| {
            RepoError::InvalidData("updated card not found in read-back".to_string())
        })
    }

    fn delete_card(&self, slug: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM cities WHERE slug = ?1;", [slug])?;
        if changed == 0 {
            return Err(RepoError::NotFound(slug.to_string()));
        }
        Ok(())
    }

    fn get_by_slug(&self, slug: &str) -> RepoResult<Option<CityCard>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CARD_SELECT_SQL} WHERE slug = ?1;"))?;
        let mut rows = stmt.query([slug])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_card_row(row)?));
        }
        Ok(None)
    }

    fn get_by_slug_counting_view(&self, slug: &str) -> RepoResult<CityCard> {
        let Some((id, _)) = find_id_and_slug(self.conn, slug)? else {
            return Err(RepoError::NotFound(slug.to_string()));
        };

        // Additive update keyed by id: N concurrent requests produce
        // exactly +N regardless of interleaving.
        let changed = self.conn.execute(
            "UPDATE cities SET views_count = views_count + 1 WHERE id = ?1;",
            [id],
        )?;
        if changed == 0 {
            // Deleted between lookup and increment.
            return Err(RepoError::NotFound(slug.to_string()));
        }

        self.get_by_id(id)?
            .ok_or_else(|| RepoError::NotFound(slug.to_string()))
    }

    fn list_cards(&self, query: &CardListQuery) -> RepoResult<Vec<CityCard>> {
        let mut sql = format!("{CARD_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(q) = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            sql.push_str(
                " AND (title LIKE ?1 ESCAPE '\\'
                   OR region LIKE ?1 ESCAPE '\\')",
            );
            bind_values.push(Value::Text(format!("%{}%", escape_like(q))));
        }

        // SQLite sorts NULL lowest, so DESC population naturally puts
        // unknown populations last.
        sql.push_str(match query.sort {
            SortKey::Newest => " ORDER BY created_at DESC, id DESC",
            SortKey::Title => " ORDER BY title ASC, id ASC",
            SortKey::Population => " ORDER BY population DESC, created_at DESC, id DESC",
        });

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut cards = Vec::new();
        while let Some(row) = rows.next()? {
            cards.push(parse_card_row(row)?);
        }

        Ok(cards)
    }
}

/// Probes for the first free slug: `base`, `base-2`, `base-3`, ...
///
/// `exclude` skips the row being saved so a card never collides with
/// itself on re-save.
fn next_free_slug(conn: &Connection, base: &str, exclude: Option<CardId>) -> RepoResult<String> {
    let mut candidate = base.to_string();
    let mut i: u64 = 2;
    while slug_taken(conn, &candidate, exclude)? {
        candidate = format!("{base}-{i}");
        i += 1;
    }
    Ok(candidate)
}

fn slug_taken(conn: &Connection, candidate: &str, exclude: Option<CardId>) -> RepoResult<bool> {
    let taken: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM cities
            WHERE slug = ?1
              AND (?2 IS NULL OR id != ?2)
        );",
        params![candidate, exclude],
        |row| row.get(0),
    )?;
    Ok(taken == 1)
}

fn find_id_and_slug(conn: &Connection, slug: &str) -> RepoResult<Option<(CardId, String)>> {
    let found = conn
        .query_row(
            "SELECT id, slug FROM cities WHERE slug = ?1;",
            [slug],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)),
        )
        .optional()?;
    Ok(found)
}

/// Escapes `%`, `_` and the escape character itself so user text matches
/// literally inside a LIKE pattern.
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn parse_card_row(row: &Row<'_>) -> RepoResult<CityCard> {
    let population = match row.get::<_, Option<i64>>("population")? {
        Some(raw) => Some(u32::try_from(raw).map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid population value `{raw}` in cities.population"
            ))
        })?),
        None => None,
    };

    let views_count: i64 = row.get("views_count")?;
    if views_count < 0 {
        return Err(RepoError::InvalidData(format!(
            "invalid views_count value `{views_count}` in cities.views_count"
        )));
    }

    Ok(CityCard {
        id: row.get("id")?,
        title: row.get("title")?,
        region: row.get("region")?,
        slug: row.get("slug")?,
        image: row.get("image")?,
        population,
        short_description: row.get("short_description")?,
        content: row.get("content")?,
        created_at: row.get("created_at")?,
        author_id: row.get("author_id")?,
        views_count,
        lat: row.get("lat")?,
        lon: row.get("lon")?,
    })
}
