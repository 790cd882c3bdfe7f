//! Durable record store backed by SQLite.
//!
//! The store is append-only: records are inserted and read back, never
//! updated or deleted. It does not check for duplicates; callers run
//! `pipeline::duplicate::is_duplicate` first.

use rusqlite::{params, Connection, Row};
use std::path::Path;

use crate::error::StorageError;
use crate::pipeline::duplicate::RecordSource;
use crate::record::{DuplicateKey, Judgments, StoredRecord, VerifiedRecord};

/// Schema applied on every open. Idempotent.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS records (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    play_date   TEXT NOT NULL,
    level       TEXT NOT NULL,
    song_title  TEXT NOT NULL,
    perfect     INTEGER NOT NULL CHECK (perfect >= 0),
    great       INTEGER NOT NULL CHECK (great >= 0),
    good        INTEGER NOT NULL CHECK (good >= 0),
    bad         INTEGER NOT NULL CHECK (bad >= 0),
    miss        INTEGER NOT NULL CHECK (miss >= 0),
    fast        INTEGER NOT NULL CHECK (fast >= 0),
    late        INTEGER NOT NULL CHECK (late >= 0)
);
";

const SELECT_ALL: &str = "
SELECT id, play_date, level, song_title, perfect, great, good, bad, miss, fast, late
FROM records
ORDER BY id ASC
";

const INSERT: &str = "
INSERT INTO records (play_date, level, song_title, perfect, great, good, bad, miss, fast, late)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
";

const EXISTS_MATCH: &str = "
SELECT EXISTS (
    SELECT 1 FROM records
    WHERE play_date = ?1 AND song_title = ?2
      AND perfect = ?3 AND great = ?4 AND good = ?5 AND bad = ?6 AND miss = ?7
)
";

/// Owner of the single database connection.
///
/// The connection is closed when the store is dropped.
pub struct RecordStore {
    conn: Connection,
}

impl RecordStore {
    /// Opens (creating if needed) the database file and applies the schema.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        // Each commit must reach disk before insert returns
        conn.pragma_update(None, "synchronous", "FULL")?;
        let store = Self { conn };
        store.init()?;
        crate::log(&format!("Record store opened: {}", path.display()));
        Ok(store)
    }

    /// Opens a throwaway in-memory store.
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.init()?;
        Ok(store)
    }

    fn init(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Appends a record and returns it with its new id.
    ///
    /// The row is committed before this returns; on error no row is visible.
    pub fn insert(&mut self, record: VerifiedRecord) -> Result<StoredRecord, StorageError> {
        let tx = self.conn.transaction()?;
        let j = *record.judgments();
        tx.execute(
            INSERT,
            params![
                record.play_date(),
                record.level(),
                record.song_title(),
                j.perfect,
                j.great,
                j.good,
                j.bad,
                j.miss,
                j.fast,
                j.late,
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        crate::log(&format!(
            "Stored record {} ({} / {})",
            id,
            record.song_title(),
            record.play_date()
        ));
        Ok(StoredRecord { id, record })
    }

    /// Every record in insertion order.
    pub fn query_all(&self) -> Result<Vec<StoredRecord>, StorageError> {
        let mut stmt = self.conn.prepare(SELECT_ALL)?;
        let rows = stmt.query_map([], map_row)?;
        let records = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }
}

impl RecordSource for RecordStore {
    fn contains_match(&self, key: &DuplicateKey<'_>) -> Result<bool, StorageError> {
        let exists = self.conn.query_row(
            EXISTS_MATCH,
            params![
                key.play_date,
                key.song_title,
                key.perfect,
                key.great,
                key.good,
                key.bad,
                key.miss,
            ],
            |row| row.get::<_, bool>(0),
        )?;
        Ok(exists)
    }
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<StoredRecord> {
    Ok(StoredRecord {
        id: row.get(0)?,
        record: VerifiedRecord::from_parts(
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            Judgments {
                perfect: row.get(4)?,
                great: row.get(5)?,
                good: row.get(6)?,
                bad: row.get(7)?,
                miss: row.get(8)?,
                fast: row.get(9)?,
                late: row.get(10)?,
            },
        ),
    })
}
