//! One complete pass over a record snapshot.
//!
//! # Invariants
//! - Each record is evaluated independently of every other record.
//! - Records whose occurrence cannot be computed are logged and skipped.
//! - Output depends only on `(records, today, rules)`.

use super::policy::should_notify;
use super::ReminderEvent;
use crate::calendar::occurrence::days_until;
use crate::logging::sanitize_message;
use crate::model::record::BirthdayRecord;
use crate::model::rules::TriggerRuleSet;
use chrono::NaiveDate;
use log::{debug, warn};
use std::cmp::Reverse;

const MAX_LOGGED_NAME_CHARS: usize = 64;

/// Evaluates every record against `today` and returns the reminders to send.
///
/// Events are ordered by days left, then priority (highest first), then name.
pub fn sweep(
    records: &[BirthdayRecord],
    today: NaiveDate,
    rules: &TriggerRuleSet,
) -> Vec<ReminderEvent> {
    let mut events = Vec::new();

    for record in records {
        let occurrence = match days_until(record.date, record.is_lunar, today) {
            Ok(occurrence) => occurrence,
            Err(err) => {
                warn!(
                    "event=sweep_record module=reminder status=skip name={} error={}",
                    sanitize_message(&record.name, MAX_LOGGED_NAME_CHARS),
                    err
                );
                continue;
            }
        };

        if should_notify(occurrence.days_left, record.priority, rules) {
            events.push(ReminderEvent {
                name: record.name.clone(),
                days_left: occurrence.days_left,
                priority: record.priority,
                occurrence: occurrence.date,
            });
        }
    }

    events.sort_by(|a, b| {
        (a.days_left, Reverse(a.priority), &a.name).cmp(&(b.days_left, Reverse(b.priority), &b.name))
    });
    debug!(
        "event=sweep module=reminder status=ok today={} records={} reminders={}",
        today,
        records.len(),
        events.len()
    );
    events
}
