//! Birthday record domain model.
//!
//! # Responsibility
//! - Define the canonical record shared by the store, the sweep and the CLI.
//! - Validate names, origin dates and priority levels.
//!
//! # Invariants
//! - `name` is trimmed and non-empty.
//! - `date` is a real civil date (no Feb 30).
//! - `priority` stays within `MIN_PRIORITY..=MAX_PRIORITY`.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Lowest importance level.
pub const MIN_PRIORITY: u8 = 1;
/// Highest importance level.
pub const MAX_PRIORITY: u8 = 5;
/// Importance assigned when the caller does not pick one.
pub const DEFAULT_PRIORITY: u8 = 3;

const DATE_FORMAT: &str = "%Y-%m-%d";

static DATE_TEXT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date regex"));

/// Validation errors for record input entering the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    /// Name is empty after trimming.
    EmptyName,
    /// Name carries leading or trailing whitespace, so it would not match
    /// its trimmed form as a key.
    UntrimmedName(String),
    /// Date text is not shaped like `YYYY-MM-DD`.
    InvalidDateFormat(String),
    /// Date text is well-formed but names a day that does not exist.
    NonexistentDate(String),
    /// Priority is outside `1..=5`.
    PriorityOutOfRange(i64),
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name cannot be empty"),
            Self::UntrimmedName(value) => {
                write!(f, "name `{value}` has leading or trailing whitespace")
            }
            Self::InvalidDateFormat(value) => {
                write!(f, "date `{value}` must use the YYYY-MM-DD format")
            }
            Self::NonexistentDate(value) => write!(f, "date `{value}` does not exist"),
            Self::PriorityOutOfRange(value) => write!(
                f,
                "priority {value} is out of range; expected {MIN_PRIORITY}..={MAX_PRIORITY}"
            ),
        }
    }
}

impl Error for RecordValidationError {}

/// One person's birthday as entered by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBirthdayRecord", into = "RawBirthdayRecord")]
pub struct BirthdayRecord {
    /// Unique key within the record set.
    pub name: String,
    /// Civil origin date. For lunar records this is the solar equivalent of
    /// the lunar birthdate.
    pub date: NaiveDate,
    /// Recur on the lunisolar calendar instead of the civil one.
    pub is_lunar: bool,
    /// Importance level in `1..=5`.
    pub priority: u8,
}

impl BirthdayRecord {
    /// Creates a validated record from already-typed values.
    ///
    /// # Errors
    /// - `EmptyName` when `name` is blank.
    /// - `PriorityOutOfRange` when `priority` is outside `1..=5`.
    pub fn new(
        name: impl Into<String>,
        date: NaiveDate,
        is_lunar: bool,
        priority: u8,
    ) -> Result<Self, RecordValidationError> {
        let record = Self {
            name: normalize_name(&name.into())?,
            date,
            is_lunar,
            priority: validate_priority(i64::from(priority))?,
        };
        Ok(record)
    }

    /// Creates a validated record from raw text input (CLI, import, storage).
    pub fn parse(
        name: &str,
        date: &str,
        is_lunar: bool,
        priority: i64,
    ) -> Result<Self, RecordValidationError> {
        Ok(Self {
            name: normalize_name(name)?,
            date: parse_civil_date(date)?,
            is_lunar,
            priority: validate_priority(priority)?,
        })
    }

    /// Re-checks invariants on a record that may have been built by hand.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            return Err(RecordValidationError::EmptyName);
        }
        if trimmed != self.name {
            return Err(RecordValidationError::UntrimmedName(self.name.clone()));
        }
        validate_priority(i64::from(self.priority))?;
        Ok(())
    }

    /// Origin date rendered as `YYYY-MM-DD`.
    pub fn date_text(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}

/// Parses strict `YYYY-MM-DD` civil date text.
pub fn parse_civil_date(value: &str) -> Result<NaiveDate, RecordValidationError> {
    let trimmed = value.trim();
    if !DATE_TEXT_RE.is_match(trimmed) {
        return Err(RecordValidationError::InvalidDateFormat(trimmed.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| RecordValidationError::NonexistentDate(trimmed.to_string()))
}

fn normalize_name(value: &str) -> Result<String, RecordValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RecordValidationError::EmptyName);
    }
    Ok(trimmed.to_string())
}

fn validate_priority(value: i64) -> Result<u8, RecordValidationError> {
    if !(i64::from(MIN_PRIORITY)..=i64::from(MAX_PRIORITY)).contains(&value) {
        return Err(RecordValidationError::PriorityOutOfRange(value));
    }
    u8::try_from(value).map_err(|_| RecordValidationError::PriorityOutOfRange(value))
}

// Wire shape keeps the date as text so serialized records stay readable.
#[derive(Serialize, Deserialize)]
struct RawBirthdayRecord {
    name: String,
    date: String,
    is_lunar: bool,
    priority: i64,
}

impl TryFrom<RawBirthdayRecord> for BirthdayRecord {
    type Error = RecordValidationError;

    fn try_from(raw: RawBirthdayRecord) -> Result<Self, Self::Error> {
        Self::parse(&raw.name, &raw.date, raw.is_lunar, raw.priority)
    }
}

impl From<BirthdayRecord> for RawBirthdayRecord {
    fn from(record: BirthdayRecord) -> Self {
        Self {
            date: record.date_text(),
            name: record.name,
            is_lunar: record.is_lunar,
            priority: i64::from(record.priority),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_name, validate_priority, RecordValidationError};

    #[test]
    fn normalize_name_trims_whitespace() {
        assert_eq!(normalize_name("  Ana ").expect("name should be valid"), "Ana");
        assert_eq!(normalize_name(" \t"), Err(RecordValidationError::EmptyName));
    }

    #[test]
    fn validate_priority_accepts_bounds_only() {
        assert_eq!(validate_priority(1), Ok(1));
        assert_eq!(validate_priority(5), Ok(5));
        assert_eq!(
            validate_priority(0),
            Err(RecordValidationError::PriorityOutOfRange(0))
        );
        assert_eq!(
            validate_priority(6),
            Err(RecordValidationError::PriorityOutOfRange(6))
        );
    }
}
