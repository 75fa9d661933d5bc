//! Next-occurrence calculation for solar and lunar birthdays.
//!
//! # Invariants
//! - The returned date is never before `today`.
//! - The returned date is the earliest qualifying one; no year is skipped.
//! - Feb 29 origins land on Feb 28 in non-leap years.
//! - Lunar day 30 lands on day 29 when that month is short in the target year.

use super::lunar::{leap_month, leap_month_days, month_days, LunarDate, MIN_LUNAR_YEAR};
use super::CalendarConversionError;
use chrono::{Datelike, NaiveDate};

/// Resolved next occurrence of a birthday relative to some `today`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence {
    /// Civil date of the birthday.
    pub date: NaiveDate,
    /// Whole days from `today` to `date`; 0 means the birthday is today.
    pub days_left: u32,
}

/// Returns the first civil date on or after `today` on which the birthday falls.
///
/// `origin` is always a civil date. With `is_lunar` set it is read as the
/// solar equivalent of a lunar birthdate and recurs on the lunar calendar.
///
/// # Errors
/// - `CalendarConversionError` when a lunar origin or the lunar years around
///   `today` fall outside the supported table.
pub fn next_occurrence(
    origin: NaiveDate,
    is_lunar: bool,
    today: NaiveDate,
) -> Result<NaiveDate, CalendarConversionError> {
    if is_lunar {
        next_lunar_occurrence(origin, today)
    } else {
        next_solar_occurrence(origin, today)
    }
}

/// Like [`next_occurrence`], also reporting the days left from `today`.
pub fn days_until(
    origin: NaiveDate,
    is_lunar: bool,
    today: NaiveDate,
) -> Result<Occurrence, CalendarConversionError> {
    let date = next_occurrence(origin, is_lunar, today)?;
    let days_left = u32::try_from((date - today).num_days())
        .map_err(|_| CalendarConversionError::SolarOutOfRange(date))?;
    Ok(Occurrence { date, days_left })
}

/// Places the origin's month/day in civil `year`, moving Feb 29 to Feb 28
/// when `year` is not a leap year.
pub fn solar_anniversary(origin: NaiveDate, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, origin.month(), origin.day()).or_else(|| {
        if origin.month() == 2 && origin.day() == 29 {
            NaiveDate::from_ymd_opt(year, 2, 28)
        } else {
            None
        }
    })
}

/// Places a lunar birthday in lunar `year` and converts it to the civil calendar.
///
/// A leap-month birthday uses the leap month only when `year` has the same
/// leap month, otherwise the regular month of that number.
pub fn lunar_anniversary(
    birthday: LunarDate,
    year: i32,
) -> Result<NaiveDate, CalendarConversionError> {
    let use_leap = birthday.is_leap_month && leap_month(year)? == Some(birthday.month);
    let length = if use_leap {
        leap_month_days(year)?
    } else {
        month_days(year, birthday.month)?
    };
    let day = u8::try_from(length)
        .map(|length| birthday.day.min(length))
        .unwrap_or(birthday.day);
    LunarDate::new(year, birthday.month, day, use_leap)?.to_solar()
}

fn next_solar_occurrence(
    origin: NaiveDate,
    today: NaiveDate,
) -> Result<NaiveDate, CalendarConversionError> {
    let this_year = solar_anniversary(origin, today.year())
        .ok_or(CalendarConversionError::SolarOutOfRange(today))?;
    if this_year >= today {
        return Ok(this_year);
    }
    solar_anniversary(origin, today.year() + 1)
        .ok_or(CalendarConversionError::SolarOutOfRange(today))
}

fn next_lunar_occurrence(
    origin: NaiveDate,
    today: NaiveDate,
) -> Result<NaiveDate, CalendarConversionError> {
    let birthday = LunarDate::from_solar(origin)?;

    // Late lunar months of year N land in January/February of civil N+1, so
    // the search starts one lunar year before today's civil year.
    let first_year = (today.year() - 1).max(MIN_LUNAR_YEAR);
    for year in first_year..=today.year() + 1 {
        let candidate = lunar_anniversary(birthday, year)?;
        if candidate >= today {
            return Ok(candidate);
        }
    }

    Err(CalendarConversionError::SolarOutOfRange(today))
}

#[cfg(test)]
mod tests {
    use super::solar_anniversary;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    #[test]
    fn solar_anniversary_keeps_leap_day_in_leap_years() {
        assert_eq!(solar_anniversary(date(2000, 2, 29), 2028), Some(date(2028, 2, 29)));
    }

    #[test]
    fn solar_anniversary_moves_leap_day_to_feb_28() {
        assert_eq!(solar_anniversary(date(2000, 2, 29), 2025), Some(date(2025, 2, 28)));
        assert_eq!(solar_anniversary(date(2000, 2, 29), 2100), Some(date(2100, 2, 28)));
    }
}
