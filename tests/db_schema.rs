use person_registry::db::SCHEMA_VERSION;
use person_registry::{open_db, DbError};
use rusqlite::Connection;

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn new_file_is_stamped_with_the_schema_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("people.sqlite");

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), SCHEMA_VERSION);
    drop(conn);

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), SCHEMA_VERSION);
}

#[test]
fn foreign_schema_version_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("old.sqlite");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 1;").unwrap();
    drop(conn);

    match open_db(&path) {
        Err(DbError::UnsupportedSchemaVersion { found, supported }) => {
            assert_eq!(found, 1);
            assert_eq!(supported, SCHEMA_VERSION);
        }
        other => panic!("unexpected result: {:?}", other.map(|_| ())),
    }
}
