//! Birthday arithmetic on calendar dates.
//!
//! Every function takes the reference day explicitly; nothing here reads the
//! clock.

use chrono::{Datelike, NaiveDate};

/// Ages at or above this many days are flagged as implausible.
pub const IMPLAUSIBLE_AGE_DAYS: i64 = 35_000;

/// The anniversary of `birth` in `year`. Feb 29 falls on Feb 28 in common years.
pub fn anniversary_in(birth: NaiveDate, year: i32) -> NaiveDate {
    birth
        .with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, 2, 28))
        .unwrap_or(birth)
}

/// Days from `today` to the next anniversary of `birth`, on or after `today`.
/// Always in `0..=365`.
pub fn days_until_birthday(birth: NaiveDate, today: NaiveDate) -> u32 {
    (next_anniversary(birth, today) - today).num_days() as u32
}

fn next_anniversary(birth: NaiveDate, today: NaiveDate) -> NaiveDate {
    let this_year = anniversary_in(birth, today.year());
    if this_year >= today {
        this_year
    } else {
        anniversary_in(birth, today.year() + 1)
    }
}

/// Where and when the next birthday falls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextBirthday {
    pub date: NaiveDate,
    pub days_until: u32,
    /// Age reached on `date`.
    pub turning: i32,
}

pub fn next_birthday(birth: NaiveDate, today: NaiveDate) -> NextBirthday {
    let date = next_anniversary(birth, today);
    NextBirthday {
        date,
        days_until: (date - today).num_days() as u32,
        turning: date.year() - birth.year(),
    }
}

/// Days between `birth` and `today`; negative when `birth` is in the future.
pub fn days_alive(birth: NaiveDate, today: NaiveDate) -> i64 {
    (today - birth).num_days()
}

/// Plausibility of a recorded birth date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifespan {
    NotBornYet { days_ahead: i64 },
    Plausible { days: i64 },
    Implausible { days: i64 },
}

pub fn assess_lifespan(birth: NaiveDate, today: NaiveDate) -> Lifespan {
    let days = days_alive(birth, today);
    if days < 0 {
        Lifespan::NotBornYet { days_ahead: -days }
    } else if days >= IMPLAUSIBLE_AGE_DAYS {
        Lifespan::Implausible { days }
    } else {
        Lifespan::Plausible { days }
    }
}
