//! Snapshot providers consumed by the reminder job.

use super::birthday_repo::{BirthdayRepository, RecordSnapshot, RepoResult, SqliteBirthdayRepository};
use crate::db::open_db;
use crate::model::record::BirthdayRecord;
use std::path::PathBuf;

/// Supplies one consistent copy of the record set per sweep.
pub trait RecordSource: Send + Sync {
    fn load_records(&self) -> RepoResult<RecordSnapshot>;
}

/// Reads snapshots from the SQLite store, opening a fresh connection each time.
///
/// The connection lives only for the read, so the background task never
/// holds a handle the editor could contend with between sweeps.
#[derive(Debug, Clone)]
pub struct SqliteRecordSource {
    db_path: PathBuf,
}

impl SqliteRecordSource {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }
}

impl RecordSource for SqliteRecordSource {
    fn load_records(&self) -> RepoResult<RecordSnapshot> {
        let mut conn = open_db(&self.db_path)?;
        let tx = conn.transaction()?;
        let snapshot = SqliteBirthdayRepository::new(&tx).snapshot()?;
        tx.commit()?;
        Ok(snapshot)
    }
}

/// Fixed in-memory record set; every snapshot is a copy.
impl RecordSource for Vec<BirthdayRecord> {
    fn load_records(&self) -> RepoResult<RecordSnapshot> {
        Ok(RecordSnapshot {
            records: self.clone(),
            rejected: Vec::new(),
        })
    }
}
