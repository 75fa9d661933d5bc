//! Core domain logic for the birthday reminder.
//!
//! Computes the next occurrence of solar and lunar birthdays, decides which
//! records fire a reminder today, and drives the once-a-day sweep from a
//! background task. Storage, configuration and delivery live behind the
//! `repo`, `config` and `notify` seams.

pub mod calendar;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod reminder;
pub mod repo;
pub mod schedule;
pub mod service;

pub use calendar::lunar::LunarDate;
pub use calendar::occurrence::{days_until, next_occurrence, Occurrence};
pub use calendar::CalendarConversionError;
pub use config::{AppConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::record::{BirthdayRecord, RecordValidationError};
pub use model::rules::TriggerRuleSet;
pub use notify::{DeliveryError, FanoutNotifier, LogNotifier, Notifier};
pub use reminder::job::{ReminderJob, SweepError, SweepReport};
pub use reminder::message::{render_message, Language};
pub use reminder::policy::should_notify;
pub use reminder::sweep::sweep;
pub use reminder::ReminderEvent;
pub use repo::birthday_repo::{
    BirthdayRepository, RecordSnapshot, RejectedRow, RepoError, RepoResult,
    SqliteBirthdayRepository,
};
pub use repo::record_source::{RecordSource, SqliteRecordSource};
pub use schedule::clock::{Clock, FixedClock, SystemClock};
pub use schedule::scheduler::{run_daily_scheduler, DailyScheduler, PollOutcome, SchedulerState};
pub use service::birthday_service::{
    BirthdayService, BirthdayServiceError, ImportReport, UpcomingBirthday,
};

/// File name of the record database inside the data directory.
pub const DB_FILE_NAME: &str = "birthdays.sqlite3";

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
