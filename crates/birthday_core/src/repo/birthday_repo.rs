//! Birthday repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `birthdays` table.
//! - Produce point-in-time record snapshots for reminder sweeps.
//!
//! # Invariants
//! - Write paths call `BirthdayRecord::validate()` before SQL mutations.
//! - Strict reads reject invalid persisted rows; snapshots skip them.

use crate::db::DbError;
use crate::model::record::{BirthdayRecord, RecordValidationError};
use log::warn;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const BIRTHDAY_SELECT_SQL: &str = "SELECT
    name,
    date,
    is_lunar,
    priority
FROM birthdays";

const BIRTHDAY_ORDER_SQL: &str = " ORDER BY priority DESC, name ASC";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for birthday persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(RecordValidationError),
    Db(DbError),
    NotFound(String),
    AlreadyExists(String),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(name) => write!(f, "birthday not found: {name}"),
            Self::AlreadyExists(name) => write!(f, "birthday already exists: {name}"),
            Self::InvalidData(message) => write!(f, "invalid persisted birthday data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::AlreadyExists(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<RecordValidationError> for RepoError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// A persisted row that failed validation and was left out of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRow {
    pub name: String,
    pub reason: String,
}

/// Immutable point-in-time copy of the record set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSnapshot {
    pub records: Vec<BirthdayRecord>,
    pub rejected: Vec<RejectedRow>,
}

/// Repository interface for birthday CRUD operations.
pub trait BirthdayRepository {
    fn create_birthday(&self, record: &BirthdayRecord) -> RepoResult<()>;
    fn update_birthday(&self, record: &BirthdayRecord) -> RepoResult<()>;
    /// Inserts or replaces by name; returns `true` when a row was replaced.
    fn upsert_birthday(&self, record: &BirthdayRecord) -> RepoResult<bool>;
    fn get_birthday(&self, name: &str) -> RepoResult<Option<BirthdayRecord>>;
    /// Lists all records, highest priority first, then by name.
    fn list_birthdays(&self) -> RepoResult<Vec<BirthdayRecord>>;
    fn delete_birthday(&self, name: &str) -> RepoResult<()>;
    /// Reads every row in one query; invalid rows are reported, not fatal.
    fn snapshot(&self) -> RepoResult<RecordSnapshot>;
}

/// SQLite-backed birthday repository.
pub struct SqliteBirthdayRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBirthdayRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn exists(&self, name: &str) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM birthdays WHERE name = ?1);",
            [name],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

impl BirthdayRepository for SqliteBirthdayRepository<'_> {
    fn create_birthday(&self, record: &BirthdayRecord) -> RepoResult<()> {
        record.validate()?;
        if self.exists(&record.name)? {
            return Err(RepoError::AlreadyExists(record.name.clone()));
        }

        self.conn.execute(
            "INSERT INTO birthdays (name, date, is_lunar, priority)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                record.name.as_str(),
                record.date_text(),
                bool_to_int(record.is_lunar),
                i64::from(record.priority),
            ],
        )?;
        Ok(())
    }

    fn update_birthday(&self, record: &BirthdayRecord) -> RepoResult<()> {
        record.validate()?;

        let changed = self.conn.execute(
            "UPDATE birthdays
             SET
                date = ?1,
                is_lunar = ?2,
                priority = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE name = ?4;",
            params![
                record.date_text(),
                bool_to_int(record.is_lunar),
                i64::from(record.priority),
                record.name.as_str(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(record.name.clone()));
        }
        Ok(())
    }

    fn upsert_birthday(&self, record: &BirthdayRecord) -> RepoResult<bool> {
        record.validate()?;
        let replaced = self.exists(&record.name)?;

        self.conn.execute(
            "INSERT INTO birthdays (name, date, is_lunar, priority)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(name) DO UPDATE SET
                date = excluded.date,
                is_lunar = excluded.is_lunar,
                priority = excluded.priority,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![
                record.name.as_str(),
                record.date_text(),
                bool_to_int(record.is_lunar),
                i64::from(record.priority),
            ],
        )?;
        Ok(replaced)
    }

    fn get_birthday(&self, name: &str) -> RepoResult<Option<BirthdayRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BIRTHDAY_SELECT_SQL} WHERE name = ?1;"))?;
        let mut rows = stmt.query([name.trim()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_birthday_row(row)?));
        }
        Ok(None)
    }

    fn list_birthdays(&self) -> RepoResult<Vec<BirthdayRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BIRTHDAY_SELECT_SQL}{BIRTHDAY_ORDER_SQL};"))?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_birthday_row(row)?);
        }
        Ok(records)
    }

    fn delete_birthday(&self, name: &str) -> RepoResult<()> {
        let name = name.trim();
        let changed = self
            .conn
            .execute("DELETE FROM birthdays WHERE name = ?1;", [name])?;
        if changed == 0 {
            return Err(RepoError::NotFound(name.to_string()));
        }
        Ok(())
    }

    fn snapshot(&self) -> RepoResult<RecordSnapshot> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BIRTHDAY_SELECT_SQL}{BIRTHDAY_ORDER_SQL};"))?;
        let mut rows = stmt.query([])?;
        let mut snapshot = RecordSnapshot::default();

        while let Some(row) = rows.next()? {
            match parse_birthday_row(row) {
                Ok(record) => snapshot.records.push(record),
                Err(err) => {
                    let name = row
                        .get::<_, Option<String>>("name")
                        .ok()
                        .flatten()
                        .unwrap_or_default();
                    warn!(
                        "event=snapshot_row module=repo status=skip error={}",
                        err
                    );
                    snapshot.rejected.push(RejectedRow {
                        name,
                        reason: err.to_string(),
                    });
                }
            }
        }

        Ok(snapshot)
    }
}

fn parse_birthday_row(row: &Row<'_>) -> RepoResult<BirthdayRecord> {
    let name: String = row.get("name")?;
    let date: String = row.get("date")?;
    let is_lunar = match row.get::<_, i64>("is_lunar")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_lunar value `{other}` in birthdays.is_lunar"
            )));
        }
    };
    let priority: i64 = row.get("priority")?;

    Ok(BirthdayRecord::parse(&name, &date, is_lunar, priority)?)
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
