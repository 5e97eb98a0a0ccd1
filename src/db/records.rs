use std::sync::mpsc::{self, Receiver, Sender};

use log::{debug, error, info};
use rusqlite::{params, Connection};

use super::{DbError, DbResult};
use crate::models::Record;

/// Receiving end of a record subscription. Every message is the complete list
/// of stored records in insertion order.
pub type RecordFeed = Receiver<Vec<Record>>;

/// Retrieve every record in insertion order. The query doubles as the single
/// source of truth for how the list is ordered on screen.
pub fn fetch_all(conn: &Connection) -> DbResult<Vec<Record>> {
    let mut stmt = conn.prepare(
        "SELECT id, first_name, last_name, age, phone_number
         FROM records
         ORDER BY id",
    )?;

    let records = stmt
        .query_map([], |row| {
            Ok(Record {
                id: Some(row.get(0)?),
                first_name: row.get(1)?,
                last_name: row.get(2)?,
                age: row.get(3)?,
                phone_number: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(records)
}

/// Append-only record table plus the subscribers watching it.
///
/// The store owns its connection. After every successful insert it re-reads
/// the table and pushes the snapshot to each live subscriber; subscribers
/// whose receiver was dropped are forgotten on that same pass.
pub struct RecordStore {
    conn: Connection,
    subscribers: Vec<Sender<Vec<Record>>>,
}

impl RecordStore {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn,
            subscribers: Vec::new(),
        }
    }

    /// Persist an unsaved record and return the id SQLite assigned to it.
    /// `AUTOINCREMENT` keeps ids from being handed out twice, even after the
    /// highest row is gone.
    ///
    /// Once the row is written the id is always returned. A failure while
    /// pushing the new snapshot to subscribers is logged, not reported, so
    /// callers never retry a write that already landed.
    pub fn insert(&mut self, record: &Record) -> DbResult<i64> {
        if let Some(id) = record.id {
            return Err(DbError::IdAlreadyAssigned(id));
        }

        self.conn.execute(
            "INSERT INTO records (first_name, last_name, age, phone_number)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                record.first_name,
                record.last_name,
                record.age,
                record.phone_number
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        info!("event=record_insert module=db status=ok id={id}");

        if let Err(err) = self.publish() {
            error!("event=record_publish module=db status=error id={id} error={err}");
        }
        Ok(id)
    }

    /// Start watching the table. The returned feed already holds the current
    /// snapshot, so a fresh subscriber can render without waiting for the next
    /// insert.
    pub fn subscribe(&mut self) -> DbResult<RecordFeed> {
        let (tx, rx) = mpsc::channel();
        let snapshot = fetch_all(&self.conn)?;
        // The receiver is still in scope, so this send cannot fail.
        let _ = tx.send(snapshot);
        self.subscribers.push(tx);
        Ok(rx)
    }

    pub fn fetch_all(&self) -> DbResult<Vec<Record>> {
        fetch_all(&self.conn)
    }

    pub fn count(&self) -> DbResult<usize> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Number of subscribers that were alive at the last publish.
    pub(crate) fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn publish(&mut self) -> DbResult<()> {
        if self.subscribers.is_empty() {
            return Ok(());
        }
        let snapshot = fetch_all(&self.conn)?;
        self.subscribers
            .retain(|subscriber| subscriber.send(snapshot.clone()).is_ok());
        debug!(
            "event=record_publish module=db status=ok subscribers={} records={}",
            self.subscribers.len(),
            snapshot.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_db_in_memory;

    fn store() -> RecordStore {
        RecordStore::new(open_db_in_memory().unwrap())
    }

    #[test]
    fn insert_rejects_records_that_already_have_an_id() {
        let mut store = store();
        let mut record = Record::new("Ana", "Diaz", "30", "555-1234");
        record.id = Some(4);

        let err = store.insert(&record).unwrap_err();
        assert!(matches!(err, DbError::IdAlreadyAssigned(4)));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn count_tracks_inserted_rows() {
        let mut store = store();
        assert_eq!(store.count().unwrap(), 0);
        for n in 0..3 {
            store
                .insert(&Record::new(format!("Name{n}"), "Diaz", "30", "555"))
                .unwrap();
        }
        assert_eq!(store.count().unwrap(), 3);
    }

    #[test]
    fn failed_snapshot_does_not_fail_a_committed_insert() {
        let mut store = store();
        let feed = store.subscribe().unwrap();
        assert!(feed.try_recv().unwrap().is_empty());

        // A blob in a text column makes every later snapshot read fail.
        store
            .conn
            .execute(
                "INSERT INTO records (first_name, last_name, age, phone_number)
                 VALUES ('Luis', 'Perez', X'00', '555-0000')",
                [],
            )
            .unwrap();

        let id = store
            .insert(&Record::new("Ana", "Diaz", "30", "555-1234"))
            .unwrap();

        assert!(id > 1);
        assert_eq!(store.count().unwrap(), 2);
        assert!(feed.try_recv().is_err());
    }

    #[test]
    fn dropped_subscribers_are_pruned_on_publish() {
        let mut store = store();
        let kept = store.subscribe().unwrap();
        let dropped = store.subscribe().unwrap();
        drop(dropped);
        assert_eq!(store.subscriber_count(), 2);

        store
            .insert(&Record::new("Ana", "Diaz", "30", "555-1234"))
            .unwrap();

        assert_eq!(store.subscriber_count(), 1);
        assert_eq!(kept.try_iter().last().unwrap().len(), 1);
    }
}
