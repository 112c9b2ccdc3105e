//! Date helpers working on wall-clock time at a fixed UTC+8 offset.
//!
//! Every value is a [`NaiveDateTime`]. "Now" is taken from the system clock and shifted to
//! [`DEFAULT_OFFSET_HOURS`], so results do not depend on the host time zone. Functions with a
//! date argument are pure; the `this_*`, `last_*`, `next_*` and `today_*` families read the
//! clock once.

mod bounds;
mod error;
mod pattern;
mod ranges;
mod sign;

pub use crate::bounds::*;
pub use crate::error::{DateError, DateErrorExt};
pub use crate::pattern::{format, format_millis, format_pattern, parse, to_chrono_pattern};
pub use crate::ranges::*;
pub use crate::sign::{Constellation, Zodiac, constellation, zodiac};
pub use chrono::{NaiveDate, NaiveDateTime};

use chrono::{Datelike, Duration, FixedOffset, Months, NaiveTime, Offset, Utc};

pub const DEFAULT_PATTERN: &str = "yyyy-MM-dd HH:mm:ss";
pub const MILLIS_PATTERN: &str = "yyyy-MM-dd HH:mm:ss.SSS";
pub const DATE_PATTERN: &str = "yyyy-MM-dd";
pub const DEFAULT_OFFSET_HOURS: i32 = 8;
pub const MILLIS_PER_DAY: i64 = 86_400_000;

pub(crate) fn offset() -> FixedOffset {
    FixedOffset::east_opt(DEFAULT_OFFSET_HOURS * 3600).unwrap_or_else(|| Utc.fix())
}

/// Current wall-clock time at UTC+8.
#[must_use]
pub fn now() -> NaiveDateTime {
    Utc::now().with_timezone(&offset()).naive_local()
}

#[must_use]
pub fn today() -> NaiveDate {
    now().date()
}

#[must_use]
pub fn current_year() -> i32 {
    now().year()
}

/// `86_400_000 * days`.
#[must_use]
pub const fn millis_of_days(days: i64) -> i64 {
    MILLIS_PER_DAY * days
}

/// Builds a date from calendar fields, `month` counted from 1.
///
/// # Errors
/// [`DateError::InvalidArgument`] when any field is out of range.
pub fn date_of(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
    millis: u32,
) -> Result<NaiveDateTime, DateError> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_milli_opt(hour, minute, second, millis))
        .ok_or_else(|| {
            DateError::invalid(format!(
                "{year}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}.{millis:03} is not a valid date"
            ))
        })
}

/// Today's midnight shifted by `days`.
#[must_use]
pub fn add_day_at_zero(days: i64) -> NaiveDateTime {
    (today() + Duration::days(days)).and_time(NaiveTime::MIN)
}

/// This week's Monday midnight shifted by `weeks`.
#[must_use]
pub fn add_week_at_zero(weeks: i64) -> NaiveDateTime {
    week_begin(now()) + Duration::weeks(weeks)
}

/// The first of this month at midnight shifted by `months`.
#[must_use]
pub fn add_month_at_zero(months: i32) -> NaiveDateTime {
    shift_months(month_begin(now()), months)
}

/// January 1st of this year at midnight shifted by `years`.
#[must_use]
pub fn add_year_at_zero(years: i32) -> NaiveDateTime {
    shift_months(year_begin_of(now()), years.saturating_mul(12))
}

/// Now shifted by `days`.
#[must_use]
pub fn day(days: i64) -> NaiveDateTime {
    now() + Duration::days(days)
}

/// Now shifted by `weeks`.
#[must_use]
pub fn week(weeks: i64) -> NaiveDateTime {
    now() + Duration::weeks(weeks)
}

/// Now shifted by `months`, clamping the day to the target month's length.
#[must_use]
pub fn month(months: i32) -> NaiveDateTime {
    shift_months(now(), months)
}

/// Now shifted by `years`; February 29th becomes February 28th in non-leap years.
#[must_use]
pub fn year(years: i32) -> NaiveDateTime {
    shift_months(now(), years.saturating_mul(12))
}

pub(crate) fn shift_months(date: NaiveDateTime, months: i32) -> NaiveDateTime {
    let delta = Months::new(months.unsigned_abs());
    let shifted =
        if months >= 0 { date.checked_add_months(delta) } else { date.checked_sub_months(delta) };
    shifted.unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Timelike, Weekday};

    #[test]
    fn test_date_of() {
        let date = date_of(2024, 2, 29, 13, 5, 9, 42).unwrap();
        assert_eq!(format_millis(date), "2024-02-29 13:05:09.042");
        assert!(date_of(2023, 2, 29, 0, 0, 0, 0).is_err());
        assert!(date_of(2023, 13, 1, 0, 0, 0, 0).is_err());
    }

    #[test]
    fn test_at_zero_helpers() {
        let day = add_day_at_zero(1);
        assert_eq!(day.time(), NaiveTime::MIN);
        assert_eq!(day.date(), today() + Duration::days(1));

        let week = add_week_at_zero(-1);
        assert_eq!(week.weekday(), Weekday::Mon);
        assert_eq!(week.hour(), 0);

        assert_eq!(add_month_at_zero(2).day(), 1);
        let year = add_year_at_zero(1);
        assert_eq!((year.year(), year.ordinal()), (current_year() + 1, 1));
    }

    #[test]
    fn test_millis_of_days() {
        assert_eq!(millis_of_days(2), 172_800_000);
        assert_eq!(millis_of_days(-1), -86_400_000);
    }

    #[test]
    fn test_shift_months_clamps() {
        let jan31 = date_of(2023, 1, 31, 8, 0, 0, 0).unwrap();
        assert_eq!(shift_months(jan31, 1).date(), NaiveDate::from_ymd_opt(2023, 2, 28).unwrap());
        assert_eq!(shift_months(jan31, -2).date(), NaiveDate::from_ymd_opt(2022, 11, 30).unwrap());
    }
}
