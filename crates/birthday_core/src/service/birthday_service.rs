//! Birthday use-case service.
//!
//! # Responsibility
//! - Provide the edit surface (add, update, remove, list) over a repository.
//! - Import the legacy flat JSON record file.
//! - Project records into upcoming-birthday rows for display.
//!
//! # Invariants
//! - Service APIs never bypass repository validation.
//! - Import is best-effort per entry: one bad entry never blocks the others.

use crate::calendar::occurrence::days_until;
use crate::model::record::{BirthdayRecord, DEFAULT_PRIORITY};
use crate::repo::birthday_repo::{BirthdayRepository, RepoError, RepoResult};
use chrono::NaiveDate;
use log::{info, warn};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for import use-cases.
#[derive(Debug)]
pub enum BirthdayServiceError {
    /// Import document is not a JSON object of entries.
    InvalidImport(serde_json::Error),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for BirthdayServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidImport(err) => write!(f, "invalid import document: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BirthdayServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidImport(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for BirthdayServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Summary of a legacy import run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub created: usize,
    pub replaced: usize,
    /// `(name, reason)` for entries that failed validation.
    pub rejected: Vec<(String, String)>,
}

/// One row of the upcoming-birthdays listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpcomingBirthday {
    pub record: BirthdayRecord,
    /// `None` when the lunar conversion is out of range.
    pub next: Option<NaiveDate>,
    pub days_left: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct LegacyEntry {
    date: String,
    #[serde(default)]
    lunar: bool,
    #[serde(default = "legacy_default_priority")]
    priority: i64,
}

fn legacy_default_priority() -> i64 {
    i64::from(DEFAULT_PRIORITY)
}

/// Use-case service wrapper for birthday records.
pub struct BirthdayService<R: BirthdayRepository> {
    repo: R,
}

impl<R: BirthdayRepository> BirthdayService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Adds or replaces a record by name; returns `true` when replaced.
    pub fn save_birthday(&self, record: &BirthdayRecord) -> RepoResult<bool> {
        let replaced = self.repo.upsert_birthday(record)?;
        info!(
            "event=birthday_save module=service status=ok replaced={} is_lunar={} priority={}",
            replaced, record.is_lunar, record.priority
        );
        Ok(replaced)
    }

    /// Creates a record; fails with `AlreadyExists` on a name clash.
    pub fn create_birthday(&self, record: &BirthdayRecord) -> RepoResult<()> {
        self.repo.create_birthday(record)
    }

    /// Updates an existing record by name.
    pub fn update_birthday(&self, record: &BirthdayRecord) -> RepoResult<()> {
        self.repo.update_birthday(record)
    }

    pub fn get_birthday(&self, name: &str) -> RepoResult<Option<BirthdayRecord>> {
        self.repo.get_birthday(name)
    }

    /// Lists records, highest priority first.
    pub fn list_birthdays(&self) -> RepoResult<Vec<BirthdayRecord>> {
        self.repo.list_birthdays()
    }

    pub fn remove_birthday(&self, name: &str) -> RepoResult<()> {
        self.repo.delete_birthday(name)?;
        info!("event=birthday_remove module=service status=ok");
        Ok(())
    }

    /// Lists records with their next occurrence relative to `today`.
    ///
    /// Ordered by priority (highest first), then name, like `list_birthdays`.
    pub fn upcoming(&self, today: NaiveDate) -> RepoResult<Vec<UpcomingBirthday>> {
        let rows = self
            .repo
            .list_birthdays()?
            .into_iter()
            .map(|record| {
                let occurrence = days_until(record.date, record.is_lunar, today).ok();
                UpcomingBirthday {
                    next: occurrence.map(|occurrence| occurrence.date),
                    days_left: occurrence.map(|occurrence| occurrence.days_left),
                    record,
                }
            })
            .collect();
        Ok(rows)
    }

    /// Imports the legacy `{ name: { date, lunar, priority } }` JSON document.
    ///
    /// Valid entries are upserted; invalid ones are reported in the result.
    pub fn import_legacy_json(&self, text: &str) -> Result<ImportReport, BirthdayServiceError> {
        let entries: BTreeMap<String, serde_json::Value> =
            serde_json::from_str(text).map_err(BirthdayServiceError::InvalidImport)?;
        let mut report = ImportReport::default();

        for (name, value) in entries {
            let parsed = serde_json::from_value::<LegacyEntry>(value)
                .map_err(|err| err.to_string())
                .and_then(|entry| {
                    BirthdayRecord::parse(&name, &entry.date, entry.lunar, entry.priority)
                        .map_err(|err| err.to_string())
                });

            match parsed {
                Ok(record) => {
                    if self.repo.upsert_birthday(&record)? {
                        report.replaced += 1;
                    } else {
                        report.created += 1;
                    }
                }
                Err(reason) => report.rejected.push((name, reason)),
            }
        }

        if !report.rejected.is_empty() {
            warn!(
                "event=birthday_import module=service status=partial rejected={}",
                report.rejected.len()
            );
        }
        info!(
            "event=birthday_import module=service status=ok created={} replaced={} rejected={}",
            report.created,
            report.replaced,
            report.rejected.len()
        );
        Ok(report)
    }
}
