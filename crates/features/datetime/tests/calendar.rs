use jtool_datetime::{
    Constellation, DateError, Zodiac, constellation, date_of, dates_by_days, diff_days, format,
    month_begin, month_end, parse, week_begin, week_end, zodiac,
};
use proptest::prelude::*;

#[test]
fn parse_then_format_keeps_wall_clock() -> Result<(), DateError> {
    let date = parse("2019/12/31 23:59", "yyyy/MM/dd HH:mm")?;
    assert_eq!(format(date), "2019-12-31 23:59:00");
    Ok(())
}

#[test]
fn signs_for_a_birthday() -> Result<(), DateError> {
    assert_eq!(zodiac(1988), Zodiac::Dragon);
    assert_eq!(constellation(11, 22)?, Constellation::Sagittarius);
    assert_eq!(constellation(11, 21)?, Constellation::Scorpio);
    Ok(())
}

#[test]
fn day_ranges_cover_the_month() -> Result<(), DateError> {
    let begin = date_of(2024, 2, 10, 0, 0, 0, 0)?;
    let days = dates_by_days(month_begin(begin), month_end(begin), 1)?;
    assert_eq!(days.len(), 29);
    Ok(())
}

proptest! {
    #[test]
    fn week_bounds_contain_the_date(days in 0i64..40_000, hour in 0u32..24) {
        let date = date_of(1970, 1, 1, hour, 0, 0, 0).unwrap() + chrono::Duration::days(days);
        let (begin, end) = (week_begin(date), week_end(date));
        prop_assert!(begin <= date && date <= end);
        prop_assert_eq!(diff_days(begin, end), 6);
    }

    #[test]
    fn month_bounds_contain_the_date(days in 0i64..40_000) {
        let date = date_of(1970, 1, 1, 12, 0, 0, 0).unwrap() + chrono::Duration::days(days);
        prop_assert!(month_begin(date) <= date && date <= month_end(date));
    }
}
