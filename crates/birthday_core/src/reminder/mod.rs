//! Reminder decision pipeline.
//!
//! # Responsibility
//! - Decide which records fire today (`policy`, `sweep`).
//! - Bind a sweep to its record source and notifier (`job`).
//! - Render the user-facing reminder text (`message`).
//!
//! # Invariants
//! - Per-record failures never abort a sweep.
//! - Notifier failures never propagate back into the sweep or scheduler.

pub mod job;
pub mod message;
pub mod policy;
pub mod sweep;

use chrono::NaiveDate;
use serde::Serialize;

/// One reminder produced by a sweep and handed to a notifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ReminderEvent {
    pub name: String,
    /// Whole days until the birthday; 0 means today.
    pub days_left: u32,
    pub priority: u8,
    /// Civil date the birthday falls on.
    pub occurrence: NaiveDate,
}
