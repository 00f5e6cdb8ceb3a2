//! Birthday window queries and the sorted listings built on them.
//!
//! All of them are one operation: key each contact (or skip it), group by
//! key in ascending order, order each group by name, flatten.

use chrono::{Datelike, NaiveDate};
use std::cmp::Reverse;
use std::collections::BTreeMap;

use super::anniversary::{days_alive, days_until_birthday};
use crate::models::Contact;

/// Which birthdays a query selects, relative to the reference day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    /// Offsets `0..=N`.
    Upcoming(u32),
    /// From today to the end of this week (weeks start on Monday).
    ThisWeek,
    /// The whole of next week.
    NextWeek,
    /// Birth month is the current month, ordered by day of month.
    ThisMonth,
    /// Birth month is next month (December wraps to January).
    NextMonth,
}

impl Window {
    /// Bucket key of `birth` inside the window, `None` when it falls outside.
    fn key(self, birth: NaiveDate, today: NaiveDate) -> Option<u32> {
        let weekday = today.weekday().num_days_from_monday();
        let days = || days_until_birthday(birth, today);
        match self {
            Window::Upcoming(horizon) => Some(days()).filter(|d| *d <= horizon),
            Window::ThisWeek => Some(days()).filter(|d| *d < 7 - weekday),
            Window::NextWeek => Some(days()).filter(|d| (7 - weekday..14 - weekday).contains(d)),
            Window::ThisMonth => (birth.month() == today.month()).then(|| birth.day()),
            Window::NextMonth => (birth.month() == today.month() % 12 + 1).then(|| birth.day()),
        }
    }

    /// Phrase completing "celebrating their birthday …".
    pub fn describe(self) -> String {
        match self {
            Window::Upcoming(days) => format!("in the next {} days", days),
            Window::ThisWeek => "in the current week".to_string(),
            Window::NextWeek => "in the next week".to_string(),
            Window::ThisMonth => "in the current month".to_string(),
            Window::NextMonth => "in the next month".to_string(),
        }
    }
}

/// Result of a query over the whole book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The book holds no contacts at all.
    BookEmpty,
    /// The book has contacts but none qualified.
    NoMatches,
    Matches(Vec<T>),
}

impl<T> Outcome<T> {
    fn from_hits(total: usize, hits: Vec<T>) -> Self {
        if total == 0 {
            Outcome::BookEmpty
        } else if hits.is_empty() {
            Outcome::NoMatches
        } else {
            Outcome::Matches(hits)
        }
    }
}

/// A contact selected by a birthday window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BirthdayHit<'a> {
    pub contact: &'a Contact,
    pub days_until: u32,
}

/// A contact in the age listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeHit<'a> {
    pub contact: &'a Contact,
    pub days_alive: i64,
}

/// Group contacts by `key`, skipping those it maps to `None`. Groups come out
/// in ascending key order and each group in ascending name order, so the
/// result never depends on the order of `contacts`.
pub fn bucketed<'a, K, T, F>(contacts: &'a [Contact], key: F) -> Vec<T>
where
    K: Ord,
    F: Fn(&'a Contact) -> Option<(K, T)>,
{
    let mut buckets: BTreeMap<K, Vec<(&'a Contact, T)>> = BTreeMap::new();
    for contact in contacts {
        if let Some((k, hit)) = key(contact) {
            buckets.entry(k).or_default().push((contact, hit));
        }
    }
    buckets
        .into_values()
        .flat_map(|mut bucket| {
            bucket.sort_by(|a, b| a.0.name().cmp(b.0.name()));
            bucket.into_iter().map(|(_, hit)| hit)
        })
        .collect()
}

/// Contacts whose birthday falls in `window`.
pub fn birthdays(
    contacts: &[Contact],
    window: Window,
    today: NaiveDate,
) -> Outcome<BirthdayHit<'_>> {
    let hits = bucketed(contacts, |contact| {
        let birth = contact.birthday()?.date();
        let key = window.key(birth, today)?;
        let hit = BirthdayHit {
            contact,
            days_until: days_until_birthday(birth, today),
        };
        Some((key, hit))
    });
    Outcome::from_hits(contacts.len(), hits)
}

/// Contacts with a birthday, oldest first.
pub fn by_age(contacts: &[Contact], today: NaiveDate) -> Outcome<AgeHit<'_>> {
    let hits = bucketed(contacts, |contact| {
        let days = days_alive(contact.birthday()?.date(), today);
        Some((Reverse(days), AgeHit { contact, days_alive: days }))
    });
    Outcome::from_hits(contacts.len(), hits)
}

/// Every contact, ordered by name.
pub fn by_name(contacts: &[Contact]) -> Vec<&Contact> {
    bucketed(contacts, |contact| Some((contact.name(), contact)))
}
