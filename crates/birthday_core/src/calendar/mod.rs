//! Calendar conversion and birthday recurrence.
//!
//! # Responsibility
//! - Convert between civil dates and Chinese lunisolar dates.
//! - Resolve the next civil occurrence of a recorded birthday.
//!
//! # Invariants
//! - Everything in this module is pure: no clock reads, no I/O.
//! - Conversion failures are reported per date and never panic.

use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod lunar;
pub mod occurrence;

/// Error raised when a date cannot be expressed in the lunisolar table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarConversionError {
    /// Civil date falls outside the supported lunisolar range.
    SolarOutOfRange(NaiveDate),
    /// Lunar year has no table entry.
    LunarYearOutOfRange(i32),
    /// Month/day/leap combination does not exist in that lunar year.
    InvalidLunarDate {
        year: i32,
        month: u8,
        day: u8,
        is_leap_month: bool,
    },
}

impl Display for CalendarConversionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SolarOutOfRange(date) => {
                write!(f, "civil date {date} is outside the supported lunar range")
            }
            Self::LunarYearOutOfRange(year) => {
                write!(f, "lunar year {year} is outside the supported range")
            }
            Self::InvalidLunarDate {
                year,
                month,
                day,
                is_leap_month,
            } => {
                let leap = if *is_leap_month { " (leap)" } else { "" };
                write!(f, "lunar date {year}-{month}{leap}-{day} does not exist")
            }
        }
    }
}

impl Error for CalendarConversionError {}
