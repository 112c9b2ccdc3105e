//! Differences, neighbouring days and stepped date lists.

use crate::{DateError, MILLIS_PER_DAY, begin_of_month, month_end, shift_months};
use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime};

/// Whole days from `begin` to `end`, truncated toward zero.
#[must_use]
pub fn diff_days(begin: NaiveDateTime, end: NaiveDateTime) -> i64 {
    diff_millis(begin, end) / MILLIS_PER_DAY
}

/// Milliseconds from `begin` to `end`.
#[must_use]
pub fn diff_millis(begin: NaiveDateTime, end: NaiveDateTime) -> i64 {
    (end - begin).num_milliseconds()
}

/// The later of two optional dates; a single `Some` wins.
#[must_use]
pub fn max(a: Option<NaiveDateTime>, b: Option<NaiveDateTime>) -> Option<NaiveDateTime> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

/// The earlier of two optional dates; a single `Some` wins.
#[must_use]
pub fn min(a: Option<NaiveDateTime>, b: Option<NaiveDateTime>) -> Option<NaiveDateTime> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

/// Same day and time in the first month of `date`'s quarter, clamped to that month's length.
#[must_use]
pub fn first_season_date(date: NaiveDateTime) -> NaiveDateTime {
    let into_quarter = (date.month0() % 3) as i32;
    shift_months(date, -into_quarter)
}

#[must_use]
pub fn next_day(date: NaiveDateTime, days: i64) -> NaiveDateTime {
    date + Duration::days(days)
}

#[must_use]
pub fn front_day(date: NaiveDateTime, days: i64) -> NaiveDateTime {
    date - Duration::days(days)
}

/// Midnights of `year`-`month` starting on the 1st, every `step` days, plus the last day.
///
/// # Errors
/// [`DateError::InvalidArgument`] for a zero step or an invalid month.
pub fn time_list(year: i32, month: u32, step: u32) -> Result<Vec<NaiveDateTime>, DateError> {
    if step == 0 {
        return Err(DateError::invalid("step must be positive"));
    }
    let first = begin_of_month(year, month)?;
    let last = month_end(first).date().and_time(NaiveTime::MIN);
    let last_day = last.day();

    let mut list = Vec::with_capacity((last_day / step + 1) as usize);
    let mut day = 1;
    while day < last_day {
        list.push(first + Duration::days(i64::from(day - 1)));
        day += step;
    }
    list.push(last);
    Ok(list)
}

/// [`time_list`] for every month from `begin_year`-`begin_month` through
/// `end_year`-`end_month`, both inclusive, one inner list per month.
///
/// # Errors
/// [`DateError::InvalidArgument`] for a zero step, an invalid month or an end before the
/// beginning.
pub fn time_list_range(
    begin_year: i32,
    begin_month: u32,
    end_year: i32,
    end_month: u32,
    step: u32,
) -> Result<Vec<Vec<NaiveDateTime>>, DateError> {
    let begin = begin_of_month(begin_year, begin_month)?;
    let end = begin_of_month(end_year, end_month)?;
    if end < begin {
        return Err(DateError::invalid(format!(
            "{end_year}-{end_month:02} is before {begin_year}-{begin_month:02}"
        )));
    }

    let mut lists = Vec::new();
    let mut month = begin;
    while month <= end {
        lists.push(time_list(month.year(), month.month(), step)?);
        month = shift_months(month, 1);
    }
    Ok(lists)
}

/// Every `step` hours of `date`'s day, starting at midnight.
///
/// # Errors
/// [`DateError::InvalidArgument`] for a zero step.
pub fn time_list_by_hour(date: NaiveDateTime, step: u32) -> Result<Vec<NaiveDateTime>, DateError> {
    if step == 0 {
        return Err(DateError::invalid("step must be positive"));
    }
    let midnight = date.date().and_time(NaiveTime::MIN);
    Ok((0..24).step_by(step as usize).map(|h| midnight + Duration::hours(h)).collect())
}

fn stepped(
    start: NaiveDateTime,
    end: NaiveDateTime,
    step: i64,
    mut advance: impl FnMut(NaiveDateTime) -> NaiveDateTime,
) -> Result<Vec<NaiveDateTime>, DateError> {
    if step <= 0 {
        return Err(DateError::invalid("step must be positive"));
    }
    let mut dates = Vec::new();
    let mut current = start;
    while current < end {
        dates.push(current);
        current = advance(current);
    }
    Ok(dates)
}

/// `start`, `start + step h`, ... strictly before `end`.
///
/// # Errors
/// [`DateError::InvalidArgument`] for a step below 1.
pub fn dates_by_hours(
    start: NaiveDateTime,
    end: NaiveDateTime,
    step: i64,
) -> Result<Vec<NaiveDateTime>, DateError> {
    stepped(start, end, step, |d| d + Duration::hours(step))
}

/// # Errors
/// [`DateError::InvalidArgument`] for a step below 1.
pub fn dates_by_days(
    start: NaiveDateTime,
    end: NaiveDateTime,
    step: i64,
) -> Result<Vec<NaiveDateTime>, DateError> {
    stepped(start, end, step, |d| d + Duration::days(step))
}

/// Month steps clamp the day, so a Jan 31st start continues with Feb 28th/29th.
///
/// # Errors
/// [`DateError::InvalidArgument`] for a step below 1.
pub fn dates_by_months(
    start: NaiveDateTime,
    end: NaiveDateTime,
    step: i32,
) -> Result<Vec<NaiveDateTime>, DateError> {
    let mut offset = 0;
    stepped(start, end, i64::from(step), move |_| {
        offset += step;
        shift_months(start, offset)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{date_of, format, format_pattern};

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        date_of(y, m, d, h, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_diffs() {
        assert_eq!(diff_days(at(2024, 1, 1, 0), at(2024, 1, 3, 23)), 2);
        assert_eq!(diff_days(at(2024, 1, 3, 0), at(2024, 1, 1, 1)), -1);
        assert_eq!(diff_millis(at(2024, 1, 1, 0), at(2024, 1, 1, 1)), 3_600_000);
    }

    #[test]
    fn test_max_min() {
        let (a, b) = (at(2024, 1, 1, 0), at(2024, 6, 1, 0));
        assert_eq!(max(Some(a), Some(b)), Some(b));
        assert_eq!(min(Some(a), Some(b)), Some(a));
        assert_eq!(max(None, Some(a)), Some(a));
        assert_eq!(min(Some(b), None), Some(b));
        assert_eq!(max(None, None), None);
    }

    #[test]
    fn test_neighbours() {
        assert_eq!(format(first_season_date(at(2024, 5, 31, 7))), "2024-04-30 07:00:00");
        assert_eq!(format(first_season_date(at(2024, 12, 2, 0))), "2024-10-02 00:00:00");
        assert_eq!(next_day(at(2024, 2, 28, 0), 2), at(2024, 3, 1, 0));
        assert_eq!(front_day(at(2024, 3, 1, 0), 1), at(2024, 2, 29, 0));
    }

    #[test]
    fn test_time_list() {
        let days: Vec<String> =
            time_list(2023, 2, 10).unwrap().into_iter().map(|d| format_pattern(d, "dd").unwrap()).collect();
        assert_eq!(days, ["01", "11", "21", "28"]);
        assert_eq!(time_list(2024, 2, 1).unwrap().len(), 29);
        assert!(time_list(2024, 2, 0).is_err());
    }

    #[test]
    fn test_time_list_range_spans_years() {
        let lists = time_list_range(2023, 11, 2024, 2, 15).unwrap();
        let firsts: Vec<String> =
            lists.iter().map(|l| format_pattern(l[0], "yyyy-MM").unwrap()).collect();
        assert_eq!(firsts, ["2023-11", "2023-12", "2024-01", "2024-02"]);

        let feb: Vec<u32> = lists[3].iter().map(|d| d.day()).collect();
        assert_eq!(feb, [1, 16, 29]);

        assert_eq!(time_list_range(2024, 3, 2024, 3, 10).unwrap().len(), 1);
        assert!(time_list_range(2024, 3, 2024, 2, 10).is_err());
        assert!(time_list_range(2024, 1, 2024, 13, 10).is_err());
        assert!(time_list_range(2024, 1, 2024, 2, 0).is_err());
    }

    #[test]
    fn test_time_list_by_hour() {
        let hours = time_list_by_hour(at(2024, 1, 1, 15), 6).unwrap();
        let labels: Vec<String> = hours.into_iter().map(|d| format_pattern(d, "HH").unwrap()).collect();
        assert_eq!(labels, ["00", "06", "12", "18"]);
    }

    #[test]
    fn test_stepped_ranges() {
        let hours = dates_by_hours(at(2024, 1, 1, 0), at(2024, 1, 1, 5), 2).unwrap();
        assert_eq!(hours, [at(2024, 1, 1, 0), at(2024, 1, 1, 2), at(2024, 1, 1, 4)]);

        let days = dates_by_days(at(2024, 1, 1, 0), at(2024, 1, 3, 0), 1).unwrap();
        assert_eq!(days.len(), 2);

        let months = dates_by_months(at(2024, 1, 31, 0), at(2024, 5, 1, 0), 1).unwrap();
        let labels: Vec<String> = months.into_iter().map(|d| format_pattern(d, "MM-dd").unwrap()).collect();
        assert_eq!(labels, ["01-31", "02-29", "03-31", "04-30"]);

        assert!(dates_by_days(at(2024, 1, 1, 0), at(2024, 1, 3, 0), 0).is_err());
    }
}
