//! Reminder job: snapshot, sweep, deliver.
//!
//! # Responsibility
//! - Take one point-in-time snapshot from the record source.
//! - Run the sweep and hand every event to the notifier.
//!
//! # Invariants
//! - Delivery failures are logged and counted, never returned.
//! - Only failures not attributable to a single record surface as `SweepError`.

use super::sweep::sweep;
use super::ReminderEvent;
use crate::model::rules::TriggerRuleSet;
use crate::notify::Notifier;
use crate::repo::birthday_repo::RepoError;
use crate::repo::record_source::RecordSource;
use chrono::NaiveDate;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Sweep-level failure not attributable to a single record.
#[derive(Debug)]
pub enum SweepError {
    /// The record snapshot could not be loaded.
    Source(RepoError),
    /// The sweep panicked; the payload summary is kept for logging.
    Panicked(String),
}

impl Display for SweepError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source(err) => write!(f, "failed to load birthday records: {err}"),
            Self::Panicked(payload) => write!(f, "reminder sweep panicked: {payload}"),
        }
    }
}

impl Error for SweepError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Source(err) => Some(err),
            Self::Panicked(_) => None,
        }
    }
}

impl From<RepoError> for SweepError {
    fn from(value: RepoError) -> Self {
        Self::Source(value)
    }
}

/// Outcome counters for one completed sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub today: NaiveDate,
    /// Valid records evaluated.
    pub records: usize,
    /// Persisted rows excluded by validation.
    pub rejected: usize,
    pub reminders: usize,
    pub delivered: usize,
    pub failed_deliveries: usize,
}

/// Binds the sweep to its record source, notifier and rule set.
pub struct ReminderJob<S: RecordSource, N: Notifier> {
    source: S,
    notifier: N,
    rules: TriggerRuleSet,
}

impl<S: RecordSource, N: Notifier> ReminderJob<S, N> {
    pub fn new(source: S, notifier: N, rules: TriggerRuleSet) -> Self {
        Self {
            source,
            notifier,
            rules,
        }
    }

    /// Computes today's reminders without delivering them.
    pub fn preview(&self, today: NaiveDate) -> Result<Vec<ReminderEvent>, SweepError> {
        let snapshot = self.source.load_records()?;
        Ok(sweep(&snapshot.records, today, &self.rules))
    }

    /// Runs one full sweep for `today` and delivers every reminder.
    pub fn run(&self, today: NaiveDate) -> Result<SweepReport, SweepError> {
        let started_at = Instant::now();
        let snapshot = self.source.load_records()?;
        let events = sweep(&snapshot.records, today, &self.rules);

        let mut failed_deliveries = 0;
        for event in &events {
            if let Err(err) = self.notifier.deliver(event) {
                failed_deliveries += 1;
                warn!(
                    "event=reminder_delivery module=reminder status=error days_left={} priority={} error={}",
                    event.days_left, event.priority, err
                );
            }
        }

        let report = SweepReport {
            today,
            records: snapshot.records.len(),
            rejected: snapshot.rejected.len(),
            reminders: events.len(),
            delivered: events.len() - failed_deliveries,
            failed_deliveries,
        };
        info!(
            "event=reminder_sweep module=reminder status=ok today={} records={} rejected={} reminders={} delivered={} failed_deliveries={} duration_ms={}",
            report.today,
            report.records,
            report.rejected,
            report.reminders,
            report.delivered,
            report.failed_deliveries,
            started_at.elapsed().as_millis()
        );
        Ok(report)
    }
}
