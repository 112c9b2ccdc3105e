//! Chinese zodiac animals and western star signs.

use crate::DateError;
use chrono::{Datelike, NaiveDate};
use strum_macros::{AsRefStr, Display, EnumIter, FromRepr};

/// Ordered so that `year % 12` indexes the animal (year 0 is a Monkey year).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter, FromRepr)]
#[repr(u8)]
pub enum Zodiac {
    #[strum(to_string = "猴")]
    Monkey,
    #[strum(to_string = "鸡")]
    Rooster,
    #[strum(to_string = "狗")]
    Dog,
    #[strum(to_string = "猪")]
    Pig,
    #[strum(to_string = "鼠")]
    Rat,
    #[strum(to_string = "牛")]
    Ox,
    #[strum(to_string = "虎")]
    Tiger,
    #[strum(to_string = "兔")]
    Rabbit,
    #[strum(to_string = "龙")]
    Dragon,
    #[strum(to_string = "蛇")]
    Snake,
    #[strum(to_string = "马")]
    Horse,
    #[strum(to_string = "羊")]
    Goat,
}

/// Ordered by the month in which each sign begins, starting with January's Aquarius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter, FromRepr)]
#[repr(u8)]
pub enum Constellation {
    #[strum(to_string = "水瓶座")]
    Aquarius,
    #[strum(to_string = "双鱼座")]
    Pisces,
    #[strum(to_string = "白羊座")]
    Aries,
    #[strum(to_string = "金牛座")]
    Taurus,
    #[strum(to_string = "双子座")]
    Gemini,
    #[strum(to_string = "巨蟹座")]
    Cancer,
    #[strum(to_string = "狮子座")]
    Leo,
    #[strum(to_string = "处女座")]
    Virgo,
    #[strum(to_string = "天秤座")]
    Libra,
    #[strum(to_string = "天蝎座")]
    Scorpio,
    #[strum(to_string = "射手座")]
    Sagittarius,
    #[strum(to_string = "摩羯座")]
    Capricorn,
}

/// First day of each month that already belongs to that month's sign.
const EDGE_DAYS: [u32; 12] = [20, 19, 21, 21, 21, 22, 23, 23, 23, 23, 22, 22];

#[must_use]
pub fn zodiac(year: i32) -> Zodiac {
    Zodiac::from_repr(year.rem_euclid(12) as u8).unwrap_or(Zodiac::Monkey)
}

/// Star sign for a calendar day, `month` counted from 1.
///
/// # Errors
/// [`DateError::InvalidArgument`] when `month`/`day` is not a day of a leap year.
pub fn constellation(month: u32, day: u32) -> Result<Constellation, DateError> {
    if NaiveDate::from_ymd_opt(2000, month, day).is_none() {
        return Err(DateError::invalid(format!("{month}-{day} is not a calendar day")));
    }
    let index = (month - 1) as usize;
    let sign = if day < EDGE_DAYS[index] { index.checked_sub(1).unwrap_or(11) } else { index };
    Ok(Constellation::from_repr(sign as u8).unwrap_or(Constellation::Capricorn))
}

impl Zodiac {
    #[must_use]
    pub fn of<D: Datelike>(date: &D) -> Self {
        zodiac(date.year())
    }
}

impl Constellation {
    #[must_use]
    pub fn of<D: Datelike>(date: &D) -> Self {
        constellation(date.month(), date.day()).unwrap_or(Self::Capricorn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_zodiac() {
        assert_eq!(zodiac(2020), Zodiac::Rat);
        assert_eq!(zodiac(2024).to_string(), "龙");
        assert_eq!(zodiac(-1), Zodiac::Goat);
        assert_eq!(Zodiac::iter().count(), 12);
    }

    #[test]
    fn test_constellation_edges() {
        assert_eq!(constellation(1, 19).unwrap(), Constellation::Capricorn);
        assert_eq!(constellation(1, 20).unwrap(), Constellation::Aquarius);
        assert_eq!(constellation(3, 21).unwrap(), Constellation::Aries);
        assert_eq!(constellation(12, 21).unwrap(), Constellation::Sagittarius);
        assert_eq!(constellation(12, 22).unwrap(), Constellation::Capricorn);
        assert_eq!(constellation(2, 29).unwrap().as_ref(), "双鱼座");
        assert!(constellation(2, 30).is_err());
        assert!(constellation(0, 1).is_err());
    }

    #[test]
    fn test_of_date() {
        let date = NaiveDate::from_ymd_opt(1990, 8, 8).unwrap();
        assert_eq!(Zodiac::of(&date), Zodiac::Horse);
        assert_eq!(Constellation::of(&date), Constellation::Leo);
    }
}
