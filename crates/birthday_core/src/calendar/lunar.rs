//! Table-driven Chinese lunisolar calendar.
//!
//! # Responsibility
//! - Map civil dates to lunar `(year, month, day, leap)` tuples and back.
//! - Expose month/year length queries for recurrence resolution.
//!
//! # Invariants
//! - Supported lunar years: `MIN_LUNAR_YEAR..=MAX_LUNAR_YEAR`.
//! - Lunar 1900-01-01 is civil 1900-01-31.
//!
//! Each `LUNAR_YEAR_INFO` entry packs one lunar year:
//! - bits 0..=3: leap month number, 0 when the year has none;
//! - bits 4..=15: month lengths, month 1 at bit 15 down to month 12 at bit 4
//!   (set = 30 days, clear = 29);
//! - bit 16: leap month length (set = 30 days).

use super::CalendarConversionError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// First lunar year covered by the table.
pub const MIN_LUNAR_YEAR: i32 = 1900;
/// Last lunar year covered by the table.
pub const MAX_LUNAR_YEAR: i32 = 2100;

// Civil 1900-01-31 as days from the common era.
const EPOCH_DAYS_FROM_CE: i32 = 693_626;

#[rustfmt::skip]
const LUNAR_YEAR_INFO: [u32; 201] = [
    0x04bd8, 0x04ae0, 0x0a570, 0x054d5, 0x0d260, 0x0d950, 0x16554, 0x056a0, 0x09ad0, 0x055d2, // 1900
    0x04ae0, 0x0a5b6, 0x0a4d0, 0x0d250, 0x1d255, 0x0b540, 0x0d6a0, 0x0ada2, 0x095b0, 0x14977, // 1910
    0x04970, 0x0a4b0, 0x0b4b5, 0x06a50, 0x06d40, 0x1ab54, 0x02b60, 0x09570, 0x052f2, 0x04970, // 1920
    0x06566, 0x0d4a0, 0x0ea50, 0x16a95, 0x05ad0, 0x02b60, 0x186e3, 0x092e0, 0x1c8d7, 0x0c950, // 1930
    0x0d4a0, 0x1d8a6, 0x0b550, 0x056a0, 0x1a5b4, 0x025d0, 0x092d0, 0x0d2b2, 0x0a950, 0x0b557, // 1940
    0x06ca0, 0x0b550, 0x15355, 0x04da0, 0x0a5b0, 0x14573, 0x052b0, 0x0a9a8, 0x0e950, 0x06aa0, // 1950
    0x0aea6, 0x0ab50, 0x04b60, 0x0aae4, 0x0a570, 0x05260, 0x0f263, 0x0d950, 0x05b57, 0x056a0, // 1960
    0x096d0, 0x04dd5, 0x04ad0, 0x0a4d0, 0x0d4d4, 0x0d250, 0x0d558, 0x0b540, 0x0b6a0, 0x195a6, // 1970
    0x095b0, 0x049b0, 0x0a974, 0x0a4b0, 0x0b27a, 0x06a50, 0x06d40, 0x0af46, 0x0ab60, 0x09570, // 1980
    0x04af5, 0x04970, 0x064b0, 0x074a3, 0x0ea50, 0x06b58, 0x05ac0, 0x0ab60, 0x096d5, 0x092e0, // 1990
    0x0c960, 0x0d954, 0x0d4a0, 0x0da50, 0x07552, 0x056a0, 0x0abb7, 0x025d0, 0x092d0, 0x0cab5, // 2000
    0x0a950, 0x0b4a0, 0x0baa4, 0x0ad50, 0x055d9, 0x04ba0, 0x0a5b0, 0x15176, 0x052b0, 0x0a930, // 2010
    0x07954, 0x06aa0, 0x0ad50, 0x05b52, 0x04b60, 0x0a6e6, 0x0a4e0, 0x0d260, 0x0ea65, 0x0d530, // 2020
    0x05aa0, 0x076a3, 0x096d0, 0x04afb, 0x04ad0, 0x0a4d0, 0x1d0b6, 0x0d250, 0x0d520, 0x0dd45, // 2030
    0x0b5a0, 0x056d0, 0x055b2, 0x049b0, 0x0a577, 0x0a4b0, 0x0aa50, 0x1b255, 0x06d20, 0x0ada0, // 2040
    0x14b63, 0x09370, 0x049f8, 0x04970, 0x064b0, 0x168a6, 0x0ea50, 0x06b20, 0x1a6c4, 0x0aae0, // 2050
    0x092e0, 0x0d2e3, 0x0c960, 0x0d557, 0x0d4a0, 0x0da50, 0x05d55, 0x056a0, 0x0a6d0, 0x055d4, // 2060
    0x052d0, 0x0a9b8, 0x0a950, 0x0b4a0, 0x0b6a6, 0x0ad50, 0x055a0, 0x0aba4, 0x0a5b0, 0x052b0, // 2070
    0x0b273, 0x06930, 0x07337, 0x06aa0, 0x0ad50, 0x14b55, 0x04b60, 0x0a570, 0x054e4, 0x0d160, // 2080
    0x0e968, 0x0d520, 0x0daa0, 0x16aa6, 0x056d0, 0x04ae0, 0x0a9d4, 0x0a2d0, 0x0d150, 0x0f252, // 2090
    0x0d520,                                                                                   // 2100
];

/// A date on the Chinese lunisolar calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LunarDate {
    pub year: i32,
    /// Month number `1..=12`. A leap month shares the number of the month it follows.
    pub month: u8,
    pub day: u8,
    pub is_leap_month: bool,
}

impl LunarDate {
    /// Builds a lunar date after checking it exists in the table.
    pub fn new(
        year: i32,
        month: u8,
        day: u8,
        is_leap_month: bool,
    ) -> Result<Self, CalendarConversionError> {
        let date = Self {
            year,
            month,
            day,
            is_leap_month,
        };
        date.validate()?;
        Ok(date)
    }

    /// Converts a civil date into its lunisolar representation.
    ///
    /// # Errors
    /// - `SolarOutOfRange` when `date` precedes lunar 1900-01-01 or follows
    ///   the last day of lunar 2100.
    pub fn from_solar(date: NaiveDate) -> Result<Self, CalendarConversionError> {
        let offset = date.num_days_from_ce() - EPOCH_DAYS_FROM_CE;
        let mut remaining =
            u32::try_from(offset).map_err(|_| CalendarConversionError::SolarOutOfRange(date))?;

        for year in MIN_LUNAR_YEAR..=MAX_LUNAR_YEAR {
            let info = year_info(year)?;
            let days = info_year_days(info);
            if remaining >= days {
                remaining -= days;
                continue;
            }

            let leap = info_leap_month(info);
            for month in 1..=12u8 {
                let regular = info_month_days(info, month);
                if remaining < regular {
                    return Ok(Self::from_offset(year, month, remaining, false));
                }
                remaining -= regular;

                if leap == month {
                    let leap_days = info_leap_month_days(info);
                    if remaining < leap_days {
                        return Ok(Self::from_offset(year, month, remaining, true));
                    }
                    remaining -= leap_days;
                }
            }
        }

        Err(CalendarConversionError::SolarOutOfRange(date))
    }

    /// Converts this lunar date to the civil calendar.
    ///
    /// # Errors
    /// - `LunarYearOutOfRange` when the year has no table entry.
    /// - `InvalidLunarDate` when the month, leap flag or day does not exist.
    pub fn to_solar(&self) -> Result<NaiveDate, CalendarConversionError> {
        self.validate()?;

        let mut offset: u32 = 0;
        for year in MIN_LUNAR_YEAR..self.year {
            offset += info_year_days(year_info(year)?);
        }

        let info = year_info(self.year)?;
        let leap = info_leap_month(info);
        for month in 1..self.month {
            offset += info_month_days(info, month);
            if leap == month {
                offset += info_leap_month_days(info);
            }
        }
        if self.is_leap_month {
            offset += info_month_days(info, self.month);
        }
        offset += u32::from(self.day) - 1;

        i32::try_from(offset)
            .ok()
            .and_then(|offset| NaiveDate::from_num_days_from_ce_opt(EPOCH_DAYS_FROM_CE + offset))
            .ok_or(CalendarConversionError::LunarYearOutOfRange(self.year))
    }

    fn validate(&self) -> Result<(), CalendarConversionError> {
        let info = year_info(self.year)?;
        let invalid = CalendarConversionError::InvalidLunarDate {
            year: self.year,
            month: self.month,
            day: self.day,
            is_leap_month: self.is_leap_month,
        };

        if !(1..=12).contains(&self.month) || self.day == 0 {
            return Err(invalid);
        }
        let length = if self.is_leap_month {
            if info_leap_month(info) != self.month {
                return Err(invalid);
            }
            info_leap_month_days(info)
        } else {
            info_month_days(info, self.month)
        };
        if u32::from(self.day) > length {
            return Err(invalid);
        }
        Ok(())
    }

    fn from_offset(year: i32, month: u8, remaining: u32, is_leap_month: bool) -> Self {
        // `remaining` is always below the month length (at most 30).
        Self {
            year,
            month,
            day: u8::try_from(remaining + 1).unwrap_or(30),
            is_leap_month,
        }
    }
}

impl Display for LunarDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let leap = if self.is_leap_month { "*" } else { "" };
        write!(f, "{:04}-{leap}{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Leap month number of `year`, or `None` when the year has no leap month.
pub fn leap_month(year: i32) -> Result<Option<u8>, CalendarConversionError> {
    let leap = info_leap_month(year_info(year)?);
    Ok((leap != 0).then_some(leap))
}

/// Length of regular month `month` (`1..=12`) in `year`.
pub fn month_days(year: i32, month: u8) -> Result<u32, CalendarConversionError> {
    let info = year_info(year)?;
    if !(1..=12).contains(&month) {
        return Err(CalendarConversionError::InvalidLunarDate {
            year,
            month,
            day: 1,
            is_leap_month: false,
        });
    }
    Ok(info_month_days(info, month))
}

/// Length of the leap month in `year`, or 0 when there is none.
pub fn leap_month_days(year: i32) -> Result<u32, CalendarConversionError> {
    Ok(info_leap_month_days(year_info(year)?))
}

/// Total days in lunar `year`.
pub fn year_days(year: i32) -> Result<u32, CalendarConversionError> {
    Ok(info_year_days(year_info(year)?))
}

fn year_info(year: i32) -> Result<u32, CalendarConversionError> {
    usize::try_from(year - MIN_LUNAR_YEAR)
        .ok()
        .and_then(|index| LUNAR_YEAR_INFO.get(index).copied())
        .ok_or(CalendarConversionError::LunarYearOutOfRange(year))
}

fn info_leap_month(info: u32) -> u8 {
    (info & 0xf) as u8
}

fn info_leap_month_days(info: u32) -> u32 {
    if info_leap_month(info) == 0 {
        0
    } else if info & 0x10000 != 0 {
        30
    } else {
        29
    }
}

fn info_month_days(info: u32, month: u8) -> u32 {
    if info & (0x10000 >> month) != 0 {
        30
    } else {
        29
    }
}

fn info_year_days(info: u32) -> u32 {
    (1..=12u8)
        .map(|month| info_month_days(info, month))
        .sum::<u32>()
        + info_leap_month_days(info)
}

#[cfg(test)]
mod tests {
    use super::{info_leap_month, info_month_days, info_year_days, year_info, LUNAR_YEAR_INFO};

    #[test]
    fn every_table_year_has_plausible_length() {
        for info in LUNAR_YEAR_INFO {
            let days = info_year_days(info);
            assert!((353..=385).contains(&days), "unexpected year length {days}");
            assert!(info_leap_month(info) <= 12);
        }
    }

    #[test]
    fn decodes_known_year_2025() {
        let info = year_info(2025).expect("2025 is in range");
        assert_eq!(info_leap_month(info), 6);
        assert_eq!(info_month_days(info, 12), 29);
        assert_eq!(info_year_days(info), 384);
    }

    #[test]
    fn year_info_rejects_out_of_range() {
        assert!(year_info(1899).is_err());
        assert!(year_info(2101).is_err());
    }
}
