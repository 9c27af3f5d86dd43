use citycards_core::db::open_db_in_memory;
use citycards_core::{
    CardDraft, CardService, CityCard, SqliteCardRepository, SqliteUserRepository, UserRepository,
};
use rusqlite::{params, Connection};

fn seed_author(conn: &Connection) -> i64 {
    SqliteUserRepository::new(conn)
        .create_user("author", "irrelevant-hash")
        .unwrap()
        .id
}

fn seed_card(
    conn: &Connection,
    author_id: i64,
    title: &str,
    region: &str,
    population: Option<u32>,
    created_at: i64,
) -> CityCard {
    let service = CardService::new(SqliteCardRepository::new(conn));
    let card = service
        .create_card(CardDraft {
            title: title.to_string(),
            region: region.to_string(),
            population,
            author_id,
            ..CardDraft::default()
        })
        .unwrap();

    // Pin creation time so ordering assertions are deterministic.
    conn.execute(
        "UPDATE cities SET created_at = ?1 WHERE id = ?2;",
        params![created_at, card.id],
    )
    .unwrap();
    card
}

fn titles(cards: &[CityCard]) -> Vec<&str> {
    cards.iter().map(|card| card.title.as_str()).collect()
}

#[test]
fn search_is_case_insensitive_over_title_and_region() {
    let conn = open_db_in_memory().unwrap();
    let author_id = seed_author(&conn);
    seed_card(&conn, author_id, "Moscow", "Central", Some(13_000_000), 100);
    seed_card(&conn, author_id, "Zelenograd", "Moscow Oblast", None, 200);
    seed_card(&conn, author_id, "Kazan", "Tatarstan", Some(1_300_000), 300);

    let service = CardService::new(SqliteCardRepository::new(&conn));

    let lower = service.list_cards(Some("moscow"), None).unwrap();
    let upper = service.list_cards(Some("MOSCOW"), None).unwrap();
    assert_eq!(lower, upper);
    // Matches title on one card and region on the other.
    assert_eq!(lower.len(), 2);

    let padded = service.list_cards(Some("  moscow  "), None).unwrap();
    assert_eq!(padded, lower);
}

#[test]
fn blank_search_returns_everything() {
    let conn = open_db_in_memory().unwrap();
    let author_id = seed_author(&conn);
    seed_card(&conn, author_id, "A", "R1", None, 100);
    seed_card(&conn, author_id, "B", "R2", None, 200);

    let service = CardService::new(SqliteCardRepository::new(&conn));
    assert_eq!(service.list_cards(None, None).unwrap().len(), 2);
    assert_eq!(service.list_cards(Some("   "), None).unwrap().len(), 2);
}

#[test]
fn like_wildcards_in_search_text_match_literally() {
    let conn = open_db_in_memory().unwrap();
    let author_id = seed_author(&conn);
    seed_card(&conn, author_id, "100% Cotton Town", "R", None, 100);
    seed_card(&conn, author_id, "Plainville", "R", None, 200);

    let service = CardService::new(SqliteCardRepository::new(&conn));
    let hits = service.list_cards(Some("100%"), None).unwrap();
    assert_eq!(titles(&hits), vec!["100% Cotton Town"]);

    // `_` must not act as a single-character wildcard.
    assert!(service.list_cards(Some("Plain_ille"), None).unwrap().is_empty());
}

#[test]
fn default_sort_is_population_desc_with_unknown_last() {
    let conn = open_db_in_memory().unwrap();
    let author_id = seed_author(&conn);
    seed_card(&conn, author_id, "NoCensus", "R", None, 300);
    seed_card(&conn, author_id, "Big", "R", Some(500), 100);
    seed_card(&conn, author_id, "Small", "R", Some(100), 200);

    let service = CardService::new(SqliteCardRepository::new(&conn));

    let ordered = service.list_cards(None, Some("pop")).unwrap();
    assert_eq!(titles(&ordered), vec!["Big", "Small", "NoCensus"]);

    // Unrecognized sort values fall back to the same order.
    let fallback = service.list_cards(None, Some("bogus")).unwrap();
    assert_eq!(ordered, fallback);
}

#[test]
fn population_ties_break_by_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let author_id = seed_author(&conn);
    seed_card(&conn, author_id, "Older", "R", Some(1000), 100);
    seed_card(&conn, author_id, "Newer", "R", Some(1000), 200);

    let service = CardService::new(SqliteCardRepository::new(&conn));
    let ordered = service.list_cards(None, None).unwrap();
    assert_eq!(titles(&ordered), vec!["Newer", "Older"]);
}

#[test]
fn new_sort_is_strictly_descending_created_at() {
    let conn = open_db_in_memory().unwrap();
    let author_id = seed_author(&conn);
    seed_card(&conn, author_id, "First", "R", None, 100);
    seed_card(&conn, author_id, "Third", "R", None, 300);
    seed_card(&conn, author_id, "Second", "R", None, 200);

    let service = CardService::new(SqliteCardRepository::new(&conn));
    let ordered = service.list_cards(None, Some("new")).unwrap();
    assert_eq!(titles(&ordered), vec!["Third", "Second", "First"]);
    assert!(ordered.windows(2).all(|w| w[0].created_at >= w[1].created_at));
}

#[test]
fn title_sort_is_ascending() {
    let conn = open_db_in_memory().unwrap();
    let author_id = seed_author(&conn);
    seed_card(&conn, author_id, "Bryansk", "R", None, 100);
    seed_card(&conn, author_id, "Anapa", "R", None, 200);
    seed_card(&conn, author_id, "Chita", "R", None, 300);

    let service = CardService::new(SqliteCardRepository::new(&conn));
    let ordered = service.list_cards(None, Some("title")).unwrap();
    assert_eq!(titles(&ordered), vec!["Anapa", "Bryansk", "Chita"]);
}

#[test]
fn listing_is_restartable_with_no_cursor_state() {
    let conn = open_db_in_memory().unwrap();
    let author_id = seed_author(&conn);
    seed_card(&conn, author_id, "A", "R", None, 100);
    seed_card(&conn, author_id, "B", "R", None, 200);

    let service = CardService::new(SqliteCardRepository::new(&conn));
    let first = service.list_cards(None, Some("new")).unwrap();
    let second = service.list_cards(None, Some("new")).unwrap();
    assert_eq!(first, second);
}
