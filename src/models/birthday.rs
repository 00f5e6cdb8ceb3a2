use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::validation::ValidationError;

/// Input and display format for birth dates.
pub const BIRTHDAY_FORMAT: &str = "%d.%m.%Y";

/// Date of birth.
///
/// `parse` and `new` only accept dates strictly before the reference day.
/// Deserialization skips that check, so a snapshot written on a machine with
/// a skewed clock still loads and the date can be flagged when it is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Birthday(NaiveDate);

impl Birthday {
    /// Parse `dd.mm.YYYY` input against the reference day `today`.
    pub fn parse(input: &str, today: NaiveDate) -> Result<Self, ValidationError> {
        let date = NaiveDate::parse_from_str(input.trim(), BIRTHDAY_FORMAT)
            .map_err(|_| ValidationError::BirthdayFormat)?;
        Self::new(date, today)
    }

    pub fn new(date: NaiveDate, today: NaiveDate) -> Result<Self, ValidationError> {
        if date >= today {
            return Err(ValidationError::BirthdayInFuture);
        }
        Ok(Self(date))
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for Birthday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(BIRTHDAY_FORMAT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_birthday() {
        let b = Birthday::parse("10.05.1990", date(2024, 5, 1)).unwrap();
        assert_eq!(b.date(), date(1990, 5, 10));
        assert_eq!(b.to_string(), "10.05.1990");
    }

    #[test]
    fn test_parse_rejects_impossible_dates() {
        let today = date(2024, 5, 1);
        assert_eq!(
            Birthday::parse("29.02.2001", today),
            Err(ValidationError::BirthdayFormat)
        );
        assert_eq!(
            Birthday::parse("50.20.2000", today),
            Err(ValidationError::BirthdayFormat)
        );
        assert_eq!(
            Birthday::parse("2000-01-01", today),
            Err(ValidationError::BirthdayFormat)
        );
    }

    #[test]
    fn test_leap_day_birthday_is_valid() {
        assert!(Birthday::parse("29.02.1996", date(2024, 5, 1)).is_ok());
    }

    #[test]
    fn test_birthday_must_be_in_the_past() {
        let today = date(2024, 5, 1);
        assert_eq!(
            Birthday::new(today, today),
            Err(ValidationError::BirthdayInFuture)
        );
        assert_eq!(
            Birthday::parse("02.05.2024", today),
            Err(ValidationError::BirthdayInFuture)
        );
        assert!(Birthday::new(date(2024, 4, 30), today).is_ok());
    }
}
