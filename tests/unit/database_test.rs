//! Unit tests for the NavHub database layer (connection + migrations).

use navhub::database::Database;

#[test]
fn test_open_in_memory_succeeds() {
    let db = Database::open_in_memory();
    assert!(db.is_ok(), "open_in_memory should succeed");
}

#[test]
fn test_migrations_create_storage_table() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let conn = db.connection();

    let exists: bool = conn
        .query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='storage'",
            [],
            |row| row.get(0),
        )
        .unwrap_or(false);
    assert!(exists, "storage table should exist after migrations");
}

#[test]
fn test_schema_version_recorded() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let version = navhub::database::migrations::get_schema_version(db.connection());
    assert_eq!(version, navhub::database::migrations::CURRENT_SCHEMA_VERSION);
}

#[test]
fn test_migrations_are_idempotent() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    // Running migrations a second time should not fail
    let result = navhub::database::migrations::run_all(db.connection());
    assert!(result.is_ok(), "Running migrations twice should succeed (idempotent)");
}

#[test]
fn test_open_file_database() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("navhub.db");

    {
        let db = Database::open(&db_path).expect("open should succeed");
        db.connection()
            .execute(
                "INSERT INTO storage (key, value, updated_at) VALUES ('k', 'v', 0)",
                [],
            )
            .unwrap();
    }

    // Reopen and verify the row survived
    let db = Database::open(&db_path).expect("reopen should succeed");
    let value: String = db
        .connection()
        .query_row("SELECT value FROM storage WHERE key = 'k'", [], |row| row.get(0))
        .unwrap();
    assert_eq!(value, "v");
}
