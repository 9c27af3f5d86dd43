use citycards_core::db::open_db_in_memory;
use citycards_core::{
    CardChanges, CardDraft, CardRepository, SqliteCardRepository, SqliteUserRepository,
    UserRepository,
};
use rusqlite::Connection;

fn seed_author(conn: &Connection) -> i64 {
    SqliteUserRepository::new(conn)
        .create_user("author", "irrelevant-hash")
        .unwrap()
        .id
}

fn draft(title: &str, author_id: i64) -> CardDraft {
    CardDraft {
        title: title.to_string(),
        region: "Test Region".to_string(),
        author_id,
        ..CardDraft::default()
    }
}

fn changes_with_title(title: &str) -> CardChanges {
    CardChanges {
        title: title.to_string(),
        region: "Test Region".to_string(),
        ..CardChanges::default()
    }
}

#[test]
fn identical_titles_get_numeric_suffixes() {
    let conn = open_db_in_memory().unwrap();
    let author_id = seed_author(&conn);
    let repo = SqliteCardRepository::new(&conn);

    let slugs: Vec<String> = (0..4)
        .map(|_| repo.create_card(&draft("Moscow", author_id)).unwrap().slug)
        .collect();
    assert_eq!(slugs, vec!["moscow", "moscow-2", "moscow-3", "moscow-4"]);
}

#[test]
fn cyrillic_title_transliterates_and_dedupes() {
    let conn = open_db_in_memory().unwrap();
    let author_id = seed_author(&conn);
    let repo = SqliteCardRepository::new(&conn);

    let first = repo
        .create_card(&draft("Нижний Новгород", author_id))
        .unwrap();
    assert_eq!(first.slug, "nizhnij-novgorod");

    let second = repo
        .create_card(&draft("Нижний Новгород", author_id))
        .unwrap();
    assert_eq!(second.slug, "nizhnij-novgorod-2");
}

#[test]
fn empty_title_falls_back_to_city_base() {
    let conn = open_db_in_memory().unwrap();
    let author_id = seed_author(&conn);
    let repo = SqliteCardRepository::new(&conn);

    assert_eq!(repo.create_card(&draft("", author_id)).unwrap().slug, "city");
    assert_eq!(
        repo.create_card(&draft("!!!", author_id)).unwrap().slug,
        "city-2"
    );
}

#[test]
fn editing_a_title_never_changes_the_slug() {
    let conn = open_db_in_memory().unwrap();
    let author_id = seed_author(&conn);
    let repo = SqliteCardRepository::new(&conn);

    let created = repo.create_card(&draft("Old Town", author_id)).unwrap();
    assert_eq!(created.slug, "old-town");

    let updated = repo
        .update_card("old-town", &changes_with_title("Completely New Name"))
        .unwrap();
    assert_eq!(updated.slug, "old-town");
    assert_eq!(updated.title, "Completely New Name");
}

#[test]
fn cleared_slug_regenerates_on_save_excluding_self() {
    let conn = open_db_in_memory().unwrap();
    let author_id = seed_author(&conn);
    let repo = SqliteCardRepository::new(&conn);

    repo.create_card(&draft("Kazan", author_id)).unwrap();
    let second = repo.create_card(&draft("Samara", author_id)).unwrap();

    // Simulate an explicitly cleared slug (admin-style intervention).
    conn.execute(
        "UPDATE cities SET slug = '' WHERE id = ?1;",
        [second.id],
    )
    .unwrap();

    let saved = repo.update_card("", &changes_with_title("Kazan")).unwrap();
    // Regeneration probes against the other record and skips to -2.
    assert_eq!(saved.slug, "kazan-2");

    // A second save keeps the now-set slug: the probe excludes self.
    let resaved = repo
        .update_card("kazan-2", &changes_with_title("Kazan"))
        .unwrap();
    assert_eq!(resaved.slug, "kazan-2");
}
