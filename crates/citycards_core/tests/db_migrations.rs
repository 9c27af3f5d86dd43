use citycards_core::db::migrations::{apply_migrations, latest_version};
use citycards_core::db::{open_db, open_db_in_memory};

fn table_exists(conn: &rusqlite::Connection, table: &str) -> bool {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
            );",
            [table],
            |row| row.get(0),
        )
        .unwrap();
    exists == 1
}

#[test]
fn open_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, latest_version());

    for table in ["users", "sessions", "cities"] {
        assert!(table_exists(&conn, table), "missing table {table}");
    }
}

#[test]
fn reopening_a_file_database_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("citycards.db");

    {
        let conn = open_db(&path).unwrap();
        assert!(table_exists(&conn, "cities"));
    }

    let mut conn = open_db(&path).unwrap();
    apply_migrations(&mut conn).unwrap();
    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, latest_version());
}

#[test]
fn connections_enforce_foreign_keys() {
    let conn = open_db_in_memory().unwrap();

    // A card without an existing author must be rejected.
    let result = conn.execute(
        "INSERT INTO cities (title, region, slug, short_description, content,
                             created_at, author_id)
         VALUES ('x', 'y', 'x', '', '', 0, 999);",
        [],
    );
    assert!(result.is_err());
}
