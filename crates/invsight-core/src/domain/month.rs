use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::macros::format_description;
use time::Date;

use crate::ValidationError;

/// Calendar month (year + month), ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u8,
}

impl YearMonth {
    pub fn new(year: i32, month: u8) -> Result<Self, ValidationError> {
        if !(1..=12).contains(&month) || !(0..=9999).contains(&year) {
            return Err(ValidationError::InvalidMonth {
                value: format!("{year:04}-{month:02}"),
            });
        }
        Ok(Self { year, month })
    }

    /// Truncate a date to its calendar month.
    pub fn from_date(date: Date) -> Self {
        Self {
            year: date.year(),
            month: u8::from(date.month()),
        }
    }

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidMonth {
            value: input.to_owned(),
        };

        let (year, month) = input.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u8>().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }

    pub const fn year(self) -> i32 {
        self.year
    }

    pub const fn month(self) -> u8 {
        self.month
    }
}

impl Display for YearMonth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl Serialize for YearMonth {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

/// Parse the dataset's Date column.
///
/// Accepts ISO dates (`2024-01-31`, optionally followed by a time part
/// separated by a space or `T`) and US spreadsheet exports (`1/31/2024`).
pub fn parse_record_date(input: &str) -> Result<Date, ValidationError> {
    let trimmed = input.trim();
    let date_part = trimmed
        .split([' ', 'T'])
        .next()
        .unwrap_or_default();

    Date::parse(date_part, format_description!("[year]-[month]-[day]"))
        .or_else(|_| {
            Date::parse(
                date_part,
                format_description!("[month padding:none]/[day padding:none]/[year]"),
            )
        })
        .map_err(|_| ValidationError::InvalidDate {
            value: input.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    #[test]
    fn truncates_date_to_month() {
        let date = Date::from_calendar_date(2024, Month::March, 17).expect("valid date");
        assert_eq!(YearMonth::from_date(date).to_string(), "2024-03");
    }

    #[test]
    fn orders_chronologically_across_years() {
        let dec = YearMonth::new(2023, 12).expect("valid");
        let jan = YearMonth::new(2024, 1).expect("valid");
        assert!(dec < jan);
    }

    #[test]
    fn round_trips_through_json_as_string() {
        let month = YearMonth::parse("2024-07").expect("must parse");
        let json = serde_json::to_string(&month).expect("serializes");
        assert_eq!(json, "\"2024-07\"");
    }

    #[test]
    fn rejects_month_out_of_range() {
        let err = YearMonth::parse("2024-13").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidMonth { .. }));
    }

    #[test]
    fn parses_iso_and_datetime_dates() {
        let plain = parse_record_date("2024-02-29").expect("iso date");
        let with_time = parse_record_date("2024-02-29 00:00:00").expect("iso datetime");
        assert_eq!(plain, with_time);
    }

    #[test]
    fn parses_us_spreadsheet_dates() {
        let date = parse_record_date("1/5/2024").expect("us date");
        assert_eq!(date.month(), Month::January);
        assert_eq!(date.day(), 5);
    }

    #[test]
    fn rejects_garbage_dates() {
        let err = parse_record_date("next tuesday").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidDate { .. }));
    }
}
