//! Start and end instants of days, weeks, months and years.
//!
//! Begins are at 00:00:00.000, ends at 23:59:59.999. Weeks run Monday to Sunday.

use crate::{DateError, now, shift_months};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

fn last_millisecond_before(next_begin: NaiveDateTime) -> NaiveDateTime {
    next_begin - Duration::milliseconds(1)
}

#[must_use]
pub fn day_begin(date: NaiveDateTime) -> NaiveDateTime {
    date.date().and_time(NaiveTime::MIN)
}

#[must_use]
pub fn day_end(date: NaiveDateTime) -> NaiveDateTime {
    last_millisecond_before(day_begin(date) + Duration::days(1))
}

#[must_use]
pub fn today_begin() -> NaiveDateTime {
    day_begin(now())
}

#[must_use]
pub fn today_end() -> NaiveDateTime {
    day_end(now())
}

#[must_use]
pub fn yesterday_begin() -> NaiveDateTime {
    day_begin(now() - Duration::days(1))
}

#[must_use]
pub fn yesterday_end() -> NaiveDateTime {
    day_end(now() - Duration::days(1))
}

#[must_use]
pub fn tomorrow_begin() -> NaiveDateTime {
    day_begin(now() + Duration::days(1))
}

#[must_use]
pub fn tomorrow_end() -> NaiveDateTime {
    day_end(now() + Duration::days(1))
}

/// Monday 00:00 of the week containing `date`.
#[must_use]
pub fn week_begin(date: NaiveDateTime) -> NaiveDateTime {
    let back = i64::from(date.weekday().num_days_from_monday());
    day_begin(date - Duration::days(back))
}

/// Sunday 23:59:59.999 of the week containing `date`.
#[must_use]
pub fn week_end(date: NaiveDateTime) -> NaiveDateTime {
    last_millisecond_before(week_begin(date) + Duration::weeks(1))
}

#[must_use]
pub fn this_week_begin() -> NaiveDateTime {
    week_begin(now())
}

#[must_use]
pub fn this_week_end() -> NaiveDateTime {
    week_end(now())
}

#[must_use]
pub fn last_week_begin() -> NaiveDateTime {
    week_begin(now() - Duration::weeks(1))
}

#[must_use]
pub fn last_week_end() -> NaiveDateTime {
    week_end(now() - Duration::weeks(1))
}

/// `"<monday>,<sunday>"` as `yyyy-MM-dd` for the week `weeks` away from this one.
#[must_use]
pub fn week_time_interval(weeks: i64) -> String {
    let reference = now() + Duration::weeks(weeks);
    format!("{},{}", week_begin(reference).date(), week_end(reference).date())
}

#[must_use]
pub fn last_week_time_interval() -> String {
    week_time_interval(-1)
}

/// The 1st of the month containing `date`, at midnight.
#[must_use]
pub fn month_begin(date: NaiveDateTime) -> NaiveDateTime {
    date.date().with_day(1).unwrap_or(date.date()).and_time(NaiveTime::MIN)
}

#[must_use]
pub fn month_end(date: NaiveDateTime) -> NaiveDateTime {
    last_millisecond_before(shift_months(month_begin(date), 1))
}

#[must_use]
pub fn this_month_begin() -> NaiveDateTime {
    month_begin(now())
}

#[must_use]
pub fn this_month_end() -> NaiveDateTime {
    month_end(now())
}

#[must_use]
pub fn last_month_begin() -> NaiveDateTime {
    month_begin_of(-1)
}

#[must_use]
pub fn last_month_end() -> NaiveDateTime {
    month_end_of(-1)
}

#[must_use]
pub fn next_month_begin() -> NaiveDateTime {
    month_begin_of(1)
}

#[must_use]
pub fn next_month_end() -> NaiveDateTime {
    month_end_of(1)
}

/// Begin of the month `months` away from the current one.
#[must_use]
pub fn month_begin_of(months: i32) -> NaiveDateTime {
    shift_months(this_month_begin(), months)
}

#[must_use]
pub fn month_end_of(months: i32) -> NaiveDateTime {
    month_end(month_begin_of(months))
}

/// # Errors
/// [`DateError::InvalidArgument`] for a month outside `1..=12` or an unrepresentable year.
pub fn begin_of_month(year: i32, month: u32) -> Result<NaiveDateTime, DateError> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.and_time(NaiveTime::MIN))
        .ok_or_else(|| DateError::invalid(format!("{year}-{month} is not a valid month")))
}

/// # Errors
/// [`DateError::InvalidArgument`] for a month outside `1..=12` or an unrepresentable year.
pub fn end_of_month(year: i32, month: u32) -> Result<NaiveDateTime, DateError> {
    begin_of_month(year, month).map(month_end)
}

/// January 1st of the year containing `date`, at midnight.
#[must_use]
pub fn year_begin_of(date: NaiveDateTime) -> NaiveDateTime {
    date.date().with_ordinal(1).unwrap_or(date.date()).and_time(NaiveTime::MIN)
}

/// # Errors
/// [`DateError::InvalidArgument`] for years chrono cannot represent.
pub fn year_begin(year: i32) -> Result<NaiveDateTime, DateError> {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .map(|d| d.and_time(NaiveTime::MIN))
        .ok_or_else(|| DateError::invalid(format!("year {year} is out of range")))
}

/// # Errors
/// [`DateError::InvalidArgument`] for years chrono cannot represent.
pub fn year_end(year: i32) -> Result<NaiveDateTime, DateError> {
    year_begin(year).map(|begin| last_millisecond_before(shift_months(begin, 12)))
}

#[must_use]
pub fn this_year_begin() -> NaiveDateTime {
    year_begin_of(now())
}

#[must_use]
pub fn this_year_end() -> NaiveDateTime {
    last_millisecond_before(shift_months(this_year_begin(), 12))
}

#[must_use]
pub fn last_year_begin() -> NaiveDateTime {
    shift_months(this_year_begin(), -12)
}

#[must_use]
pub fn last_year_end() -> NaiveDateTime {
    last_millisecond_before(this_year_begin())
}

#[must_use]
pub fn next_year_begin() -> NaiveDateTime {
    shift_months(this_year_begin(), 12)
}

#[must_use]
pub fn next_year_end() -> NaiveDateTime {
    last_millisecond_before(shift_months(this_year_begin(), 24))
}

/// Tomorrow's midnight one year back.
#[must_use]
pub fn one_year_ago() -> NaiveDateTime {
    shift_months(tomorrow_begin(), -12)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{date_of, format_millis};

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        date_of(y, m, d, 15, 30, 45, 500).unwrap()
    }

    #[test]
    fn test_day_bounds() {
        let date = at(2024, 3, 10);
        assert_eq!(format_millis(day_begin(date)), "2024-03-10 00:00:00.000");
        assert_eq!(format_millis(day_end(date)), "2024-03-10 23:59:59.999");
    }

    #[test]
    fn test_week_bounds_monday_to_sunday() {
        // 2024-03-10 is a Sunday
        let sunday = at(2024, 3, 10);
        assert_eq!(format_millis(week_begin(sunday)), "2024-03-04 00:00:00.000");
        assert_eq!(format_millis(week_end(sunday)), "2024-03-10 23:59:59.999");

        let monday = at(2024, 3, 11);
        assert_eq!(format_millis(week_begin(monday)), "2024-03-11 00:00:00.000");
    }

    #[test]
    fn test_month_bounds() {
        let leap = at(2024, 2, 14);
        assert_eq!(format_millis(month_begin(leap)), "2024-02-01 00:00:00.000");
        assert_eq!(format_millis(month_end(leap)), "2024-02-29 23:59:59.999");
        assert_eq!(format_millis(end_of_month(2023, 12).unwrap()), "2023-12-31 23:59:59.999");
        assert!(begin_of_month(2023, 0).is_err());
    }

    #[test]
    fn test_year_bounds() {
        assert_eq!(format_millis(year_begin(2023).unwrap()), "2023-01-01 00:00:00.000");
        assert_eq!(format_millis(year_end(2023).unwrap()), "2023-12-31 23:59:59.999");
        assert_eq!(last_year_end() + Duration::milliseconds(1), this_year_begin());
        assert_eq!(next_year_begin(), shift_months(last_year_begin(), 24));
    }

    #[test]
    fn test_relative_bounds_are_ordered() {
        assert!(yesterday_end() < today_begin());
        assert!(today_end() < tomorrow_begin());
        assert!(last_week_end() < this_week_begin());
        assert!(last_month_end() < this_month_begin());
        assert!(this_month_end() < next_month_begin());
        assert!(next_month_begin() < next_month_end());
        assert!(this_year_end() < next_year_begin());
        assert!(next_year_begin() < next_year_end());
        assert!(one_year_ago() < today_begin());
    }

    #[test]
    fn test_week_interval_shape() {
        let interval = last_week_time_interval();
        let (begin, end) = interval.split_once(',').unwrap();
        assert_eq!(begin.len(), 10);
        assert_eq!(end.len(), 10);
        assert!(begin < end);
    }
}
