use citycards_core::db::open_db_in_memory;
use citycards_core::{
    AuthError, AuthService, SqliteSessionRepository, SqliteUserRepository,
};
use rusqlite::Connection;

fn auth(conn: &Connection) -> AuthService<SqliteUserRepository<'_>, SqliteSessionRepository<'_>> {
    AuthService::new(
        SqliteUserRepository::new(conn),
        SqliteSessionRepository::new(conn),
    )
}

#[test]
fn signup_creates_account_and_logs_in() {
    let conn = open_db_in_memory().unwrap();
    let service = auth(&conn);

    let (user, session) = service
        .signup("new_user", "sensible password", "sensible password")
        .unwrap();
    assert_eq!(user.username, "new_user");
    assert_eq!(session.user_id, user.id);

    // The fresh session token resolves straight back to the user.
    let resolved = service.user_for_token(&session.token).unwrap().unwrap();
    assert_eq!(resolved.id, user.id);
}

#[test]
fn signup_rejects_weak_or_mismatched_credentials() {
    let conn = open_db_in_memory().unwrap();
    let service = auth(&conn);

    let short = service.signup("someone", "short", "short").unwrap_err();
    assert!(matches!(short, AuthError::Validation(_)));

    let numeric = service
        .signup("someone", "123456789", "123456789")
        .unwrap_err();
    assert!(matches!(numeric, AuthError::Validation(_)));

    let mismatch = service
        .signup("someone", "long enough pw", "different enough pw")
        .unwrap_err();
    assert!(matches!(mismatch, AuthError::Validation(_)));

    let bad_name = service
        .signup("no spaces allowed", "long enough pw", "long enough pw")
        .unwrap_err();
    assert!(matches!(bad_name, AuthError::Validation(_)));
}

#[test]
fn signup_rejects_duplicate_username() {
    let conn = open_db_in_memory().unwrap();
    let service = auth(&conn);

    service
        .signup("taken", "long enough pw", "long enough pw")
        .unwrap();
    let err = service
        .signup("taken", "another password", "another password")
        .unwrap_err();
    let AuthError::Validation(problems) = err else {
        panic!("expected validation failure");
    };
    assert!(problems[0].contains("already exists"));
}

#[test]
fn login_verifies_password_and_rejects_unknowns() {
    let conn = open_db_in_memory().unwrap();
    let service = auth(&conn);
    service
        .signup("resident", "long enough pw", "long enough pw")
        .unwrap();

    let (user, session) = service.login("resident", "long enough pw").unwrap();
    assert_eq!(user.username, "resident");
    assert!(service.user_for_token(&session.token).unwrap().is_some());

    let wrong = service.login("resident", "wrong password").unwrap_err();
    assert!(matches!(wrong, AuthError::InvalidCredentials));

    let unknown = service.login("nobody", "long enough pw").unwrap_err();
    assert!(matches!(unknown, AuthError::InvalidCredentials));
}

#[test]
fn logout_invalidates_the_token_and_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let service = auth(&conn);
    let (_, session) = service
        .signup("leaver", "long enough pw", "long enough pw")
        .unwrap();

    service.logout(&session.token).unwrap();
    assert!(service.user_for_token(&session.token).unwrap().is_none());

    // Logging out twice is fine.
    service.logout(&session.token).unwrap();
}

#[test]
fn serialized_user_never_exposes_the_password_hash() {
    let conn = open_db_in_memory().unwrap();
    let service = auth(&conn);
    let (user, _) = service
        .signup("careful", "long enough pw", "long enough pw")
        .unwrap();

    let value = serde_json::to_value(&user).unwrap();
    assert_eq!(value["username"], "careful");
    assert!(value.get("password_hash").is_none());
}

#[test]
fn stale_token_resolves_to_none() {
    let conn = open_db_in_memory().unwrap();
    let service = auth(&conn);
    assert!(service
        .user_for_token("00000000-0000-0000-0000-000000000000")
        .unwrap()
        .is_none());
}
