use std::fs;
use std::path::Path;
use std::time::Duration;

use log::{error, info};
use rusqlite::Connection;

use super::{DbError, DbResult};

/// Version stamped into `PRAGMA user_version`. Bumped on incompatible layout
/// changes; there are no migration scripts, so any other non-zero version is
/// refused.
pub const SCHEMA_VERSION: u32 = 2;

const CREATE_RECORDS: &str = "CREATE TABLE IF NOT EXISTS records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    age TEXT NOT NULL,
    phone_number TEXT NOT NULL
)";

/// Open (or create) the database file at `path` and make sure the schema is
/// in place. Parent directories are created on demand so a first launch
/// works with an empty home directory.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let conn = Connection::open(path).map_err(|err| {
        error!("event=db_open module=db status=error mode=file error={err}");
        DbError::from(err)
    })?;
    bootstrap(&conn, "file")?;
    Ok(conn)
}

/// Open a throwaway database. Used by tests and by nothing else.
pub fn open_db_in_memory() -> DbResult<Connection> {
    let conn = Connection::open_in_memory()?;
    bootstrap(&conn, "memory")?;
    Ok(conn)
}

fn bootstrap(conn: &Connection, mode: &str) -> DbResult<()> {
    conn.busy_timeout(Duration::from_secs(5))?;

    match ensure_schema(conn) {
        Ok(()) => {
            info!("event=db_open module=db status=ok mode={mode} schema_version={SCHEMA_VERSION}");
            Ok(())
        }
        Err(err) => {
            error!("event=db_open module=db status=error mode={mode} error={err}");
            Err(err)
        }
    }
}

fn ensure_schema(conn: &Connection) -> DbResult<()> {
    let found: u32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    match found {
        0 => {
            conn.execute_batch(&format!(
                "BEGIN;
                 {CREATE_RECORDS};
                 PRAGMA user_version = {SCHEMA_VERSION};
                 COMMIT;"
            ))?;
            Ok(())
        }
        SCHEMA_VERSION => Ok(()),
        found => Err(DbError::UnsupportedSchemaVersion {
            found,
            supported: SCHEMA_VERSION,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_exists(conn: &Connection, name: &str) -> bool {
        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
            [name],
            |row| row.get::<_, i64>(0),
        )
        .unwrap()
            == 1
    }

    #[test]
    fn fresh_database_gets_table_and_version() {
        let conn = open_db_in_memory().unwrap();
        let version: u32 = conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, SCHEMA_VERSION);
        assert!(table_exists(&conn, "records"));
    }

    #[test]
    fn ensure_schema_is_idempotent() {
        let conn = open_db_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        ensure_schema(&conn).unwrap();
        assert!(table_exists(&conn, "records"));
    }
}
