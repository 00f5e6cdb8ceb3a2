//! The address book and every operation the command loop can run on it.
//!
//! Operations are total: each returns a [`Response`] and never an error.
//! Rule violations and unknown names come back as failure messages.

pub mod anniversary;
pub mod query;
mod response;

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{
    AddressPart, Birthday, City, Contact, ContactError, Country, Email, House, Name, Phone,
    Street,
};
use anniversary::{assess_lifespan, next_birthday, Lifespan};
use query::{Outcome, Window};

pub use response::{ContactSummary, Level, Message, Response};

#[derive(Debug, Error)]
pub enum BookError {
    #[error("There is no contact with name {0}")]
    NotFound(Name),
    #[error("Contact {0} already exists in this address book")]
    Exists(Name),
    #[error(transparent)]
    Contact(#[from] ContactError),
}

/// Contacts keyed by name, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredBook")]
pub struct AddressBook {
    contacts: Vec<Contact>,
}

#[derive(Deserialize)]
struct StoredBook {
    contacts: Vec<Contact>,
}

impl TryFrom<StoredBook> for AddressBook {
    type Error = BookError;

    fn try_from(stored: StoredBook) -> Result<Self, Self::Error> {
        let mut book = AddressBook::new();
        for contact in stored.contacts {
            if book.contains(contact.name()) {
                return Err(BookError::Exists(contact.name().clone()));
            }
            book.contacts.push(contact);
        }
        Ok(book)
    }
}

fn respond(result: Result<String, BookError>) -> Response {
    match result {
        Ok(text) => {
            debug!("{}", text);
            Response::success(text)
        }
        Err(e) => {
            debug!("refused: {}", e);
            Response::failure(e.to_string())
        }
    }
}

impl AddressBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn get(&self, name: &str) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.name().as_str() == name)
    }

    pub fn contains(&self, name: &Name) -> bool {
        self.get(name.as_str()).is_some()
    }

    fn position(&self, name: &Name) -> Result<usize, BookError> {
        self.contacts
            .iter()
            .position(|c| c.name() == name)
            .ok_or_else(|| BookError::NotFound(name.clone()))
    }

    /// Run `edit` on the named contact; its `Ok` text becomes the reply.
    fn edit<F>(&mut self, name: &Name, edit: F) -> Response
    where
        F: FnOnce(&mut Contact) -> Result<String, ContactError>,
    {
        let result = self
            .position(name)
            .and_then(|idx| edit(&mut self.contacts[idx]).map_err(BookError::from));
        respond(result)
    }

    /// Read-only variant of [`edit`](Self::edit) for per-contact reports.
    fn inspect<F>(&self, name: &Name, report: F) -> Response
    where
        F: FnOnce(&Contact) -> Response,
    {
        match self.position(name) {
            Ok(idx) => report(&self.contacts[idx]),
            Err(e) => Response::failure(e.to_string()),
        }
    }

    // ==================== CONTACTS ====================

    pub fn add_contact(&mut self, name: Name) -> Response {
        if self.contains(&name) {
            return Response::info(format!(
                "Record for user {} already exists in this address book",
                name
            ));
        }
        let text = format!("Contact {} was added successfully", name);
        self.contacts.push(Contact::new(name));
        respond(Ok(text))
    }

    /// Move a contact to a new key. It goes to the end of the insertion order.
    pub fn rename_contact(&mut self, old: &Name, new: Name) -> Response {
        let result = self.position(old).and_then(|idx| {
            if *old != new && self.contains(&new) {
                return Err(BookError::Exists(new));
            }
            let mut contact = self.contacts.remove(idx);
            let text = format!("Contact with name {} was changed to name {}", old, new);
            contact.rename(new);
            self.contacts.push(contact);
            Ok(text)
        });
        respond(result)
    }

    pub fn delete_contact(&mut self, name: &Name) -> Response {
        let result = self.position(name).map(|idx| {
            self.contacts.remove(idx);
            format!("Contact with name {} was deleted successfully", name)
        });
        respond(result)
    }

    pub fn show_contact(&self, name: &Name) -> Response {
        self.inspect(name, |c| Response::Single(c.into()))
    }

    pub fn show_all(&self) -> Response {
        if self.is_empty() {
            return Response::BookEmpty;
        }
        Response::listing(
            format!("There are {} users in address book", self.len()),
            &self.contacts,
        )
    }

    // ==================== PHONES ====================

    pub fn add_phone(&mut self, name: &Name, phone: Phone) -> Response {
        self.edit(name, |c| {
            let text = format!("Phone {} was added to contact {}", phone, name);
            c.add_phone(phone).map(|_| text)
        })
    }

    pub fn change_phone(&mut self, name: &Name, old: &Phone, new: Phone) -> Response {
        self.edit(name, |c| {
            let text = format!("Old phone {} was changed to new {}", old, new);
            c.change_phone(old, new).map(|_| text)
        })
    }

    pub fn delete_phone(&mut self, name: &Name, phone: &Phone) -> Response {
        self.edit(name, |c| {
            c.delete_phone(phone)?;
            Ok(format!("Phone {} in contact {} was deleted successfully", phone, name))
        })
    }

    // ==================== BIRTHDAY ====================

    pub fn add_birthday(&mut self, name: &Name, birthday: Birthday) -> Response {
        self.edit(name, |c| {
            c.add_birthday(birthday)?;
            Ok(format!("Birthday for user {} was added successfully", name))
        })
    }

    pub fn change_birthday(&mut self, name: &Name, birthday: Birthday) -> Response {
        self.edit(name, |c| {
            c.change_birthday(birthday);
            Ok(format!("Birthday for contact {} was changed successfully", name))
        })
    }

    pub fn delete_birthday(&mut self, name: &Name) -> Response {
        self.edit(name, |c| {
            c.delete_birthday()?;
            Ok(format!("Birthday for contact {} was successfully deleted", name))
        })
    }

    pub fn days_to_birthday(&self, name: &Name, today: NaiveDate) -> Response {
        self.inspect(name, |c| {
            let Some(birthday) = c.birthday() else {
                return Response::info(format!("No data for birthday of user {}", name));
            };
            if birthday.date() > today {
                return Response::advisory(format!(
                    "Wrong data about user {} birthday. The user has not been born yet.",
                    name
                ));
            }
            let next = next_birthday(birthday.date(), today);
            if next.days_until == 0 {
                Response::success(format!(
                    "Today {} turns {}. Don't forget to buy a gift.",
                    name, next.turning
                ))
            } else {
                Response::info(format!(
                    "There are {} days left until {} turns {}",
                    next.days_until, name, next.turning
                ))
            }
        })
    }

    pub fn days_alive(&self, name: &Name, today: NaiveDate) -> Response {
        self.inspect(name, |c| {
            let Some(birthday) = c.birthday() else {
                return Response::info(format!("No data for birthday of user {}", name));
            };
            match assess_lifespan(birthday.date(), today) {
                Lifespan::NotBornYet { .. } => Response::advisory(format!(
                    "Wrong data about user {} birthday. The user has not been born yet.",
                    name
                )),
                Lifespan::Implausible { days } => Response::advisory(format!(
                    "User {} has already lived {} days. Is that birth date right?",
                    name, days
                )),
                Lifespan::Plausible { days } => {
                    Response::info(format!("User {} has already lived {} days", name, days))
                }
            }
        })
    }

    // ==================== EMAIL ====================

    pub fn add_email(&mut self, name: &Name, email: Email) -> Response {
        self.edit(name, |c| {
            c.add_email(email)?;
            Ok(format!("Email for user {} was added successfully", name))
        })
    }

    pub fn change_email(&mut self, name: &Name, email: Email) -> Response {
        self.edit(name, |c| {
            c.change_email(email);
            Ok(format!("Email for contact {} was changed successfully", name))
        })
    }

    pub fn delete_email(&mut self, name: &Name) -> Response {
        self.edit(name, |c| {
            c.delete_email()?;
            Ok(format!("Email for contact {} was deleted successfully", name))
        })
    }

    // ==================== ADDRESS ====================

    pub fn set_address(
        &mut self,
        name: &Name,
        country: Country,
        city: Option<City>,
        street: Option<Street>,
        house: Option<House>,
    ) -> Response {
        self.edit(name, |c| {
            c.set_address(country, city, street, house);
            Ok(format!("Address for user {} was added successfully", name))
        })
    }

    pub fn change_country(&mut self, name: &Name, country: Country) -> Response {
        self.edit(name, |c| {
            c.change_country(country);
            Ok(changed(AddressPart::Country, name))
        })
    }

    pub fn change_city(&mut self, name: &Name, city: City) -> Response {
        self.edit(name, |c| {
            c.change_city(city)?;
            Ok(changed(AddressPart::City, name))
        })
    }

    pub fn change_street(&mut self, name: &Name, street: Street) -> Response {
        self.edit(name, |c| {
            c.change_street(street)?;
            Ok(changed(AddressPart::Street, name))
        })
    }

    pub fn change_house(&mut self, name: &Name, house: House) -> Response {
        self.edit(name, |c| {
            c.change_house(house)?;
            Ok(changed(AddressPart::House, name))
        })
    }

    pub fn delete_address_part(&mut self, name: &Name, part: AddressPart) -> Response {
        self.edit(name, |c| {
            c.delete_address_part(part)?;
            let mut text = format!(
                "{} address for contact {} was deleted successfully",
                capitalized(part),
                name
            );
            if part == AddressPart::Country {
                text.push_str(" along with the rest of the address");
            }
            Ok(text)
        })
    }

    // ==================== QUERIES ====================

    pub fn birthdays(&self, window: Window, today: NaiveDate) -> Response {
        match query::birthdays(&self.contacts, window, today) {
            Outcome::BookEmpty => Response::BookEmpty,
            Outcome::NoMatches => Response::NoMatches(format!(
                "No users are celebrating birthday {}",
                window.describe()
            )),
            Outcome::Matches(hits) => Response::listing(
                format!(
                    "{} users are celebrating their birthday {}:",
                    hits.len(),
                    window.describe()
                ),
                hits.iter().map(|h| h.contact),
            ),
        }
    }

    pub fn sort_by_name(&self) -> Response {
        if self.is_empty() {
            return Response::BookEmpty;
        }
        Response::listing(
            "Your contact book is sorted by the name of users:",
            query::by_name(&self.contacts),
        )
    }

    pub fn sort_by_age(&self, today: NaiveDate) -> Response {
        match query::by_age(&self.contacts, today) {
            Outcome::BookEmpty => Response::BookEmpty,
            Outcome::NoMatches => {
                Response::NoMatches("No data for birthday in all records.".into())
            }
            Outcome::Matches(hits) => Response::listing(
                "Your contact book is sorted by the age of users:",
                hits.iter().map(|h| h.contact),
            ),
        }
    }

    /// Case-sensitive substring search over each contact's summary line.
    pub fn search(&self, needle: &str) -> Response {
        if self.is_empty() {
            return Response::BookEmpty;
        }
        let found: Vec<&Contact> = self
            .contacts
            .iter()
            .filter(|c| c.to_string().contains(needle))
            .collect();
        if found.is_empty() {
            return Response::NoMatches(format!(
                "No matches found for '{}' in the whole address book",
                needle
            ));
        }
        Response::listing(
            format!("We found matches for '{}' in {} contacts:", needle, found.len()),
            found,
        )
    }
}

fn changed(part: AddressPart, name: &Name) -> String {
    format!(
        "{} address for user {} was changed successfully",
        capitalized(part),
        name
    )
}

fn capitalized(part: AddressPart) -> String {
    let label = part.as_str();
    label[..1].to_uppercase() + &label[1..]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2024, 5, 1)
    }

    fn name(s: &str) -> Name {
        Name::parse(s).unwrap()
    }

    fn birthday(s: &str) -> Birthday {
        Birthday::parse(s, today()).unwrap()
    }

    fn book_with(names: &[&str]) -> AddressBook {
        let mut book = AddressBook::new();
        for n in names {
            book.add_contact(name(n));
        }
        book
    }

    fn listed(response: &Response) -> Vec<String> {
        match response {
            Response::Listing { contacts, .. } => contacts.iter().map(|c| c.name.clone()).collect(),
            other => panic!("expected a listing, got {:?}", other),
        }
    }

    #[test]
    fn test_add_contact_twice() {
        let mut book = AddressBook::new();
        assert_eq!(book.add_contact(name("Alice")).level(), Some(Level::Success));
        assert_eq!(book.add_contact(name("Alice")).level(), Some(Level::Info));
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn test_rename_moves_contact_to_end() {
        let mut book = book_with(&["Alice", "Bob"]);
        book.add_phone(&name("Alice"), Phone::parse("+380501234567").unwrap());
        let response = book.rename_contact(&name("Alice"), name("Ann"));
        assert_eq!(response.level(), Some(Level::Success));
        assert!(book.get("Alice").is_none());
        let ann = book.get("Ann").unwrap();
        assert_eq!(ann.phones().len(), 1);
        assert_eq!(listed(&book.show_all()), vec!["Bob", "Ann"]);
    }

    #[test]
    fn test_rename_refuses_existing_name() {
        let mut book = book_with(&["Alice", "Bob"]);
        let response = book.rename_contact(&name("Alice"), name("Bob"));
        assert_eq!(
            response,
            Response::failure("Contact Bob already exists in this address book")
        );
        assert_eq!(book.len(), 2);
    }

    #[test]
    fn test_unknown_contact_is_a_failure_message() {
        let mut book = book_with(&["Alice"]);
        let response = book.add_phone(&name("Ghost"), Phone::parse("+380501234567").unwrap());
        assert_eq!(response, Response::failure("There is no contact with name Ghost"));
        assert_eq!(book.delete_contact(&name("Ghost")).level(), Some(Level::Failure));
        assert_eq!(book.show_contact(&name("Ghost")).level(), Some(Level::Failure));
    }

    #[test]
    fn test_contact_rule_violations_surface_as_failures() {
        let mut book = book_with(&["Alice"]);
        let phone = Phone::parse("+380501234567").unwrap();
        book.add_phone(&name("Alice"), phone.clone());
        let response = book.add_phone(&name("Alice"), phone);
        assert_eq!(
            response,
            Response::failure("Phone +380501234567 is already registered for contact Alice")
        );
        let response = book.change_city(&name("Alice"), City::parse("Kyiv").unwrap());
        assert_eq!(response.level(), Some(Level::Failure));
    }

    #[test]
    fn test_delete_contact() {
        let mut book = book_with(&["Alice", "Bob"]);
        assert_eq!(book.delete_contact(&name("Alice")).level(), Some(Level::Success));
        assert_eq!(listed(&book.show_all()), vec!["Bob"]);
    }

    #[test]
    fn test_show_all_on_empty_book() {
        assert_eq!(AddressBook::new().show_all(), Response::BookEmpty);
        assert_eq!(AddressBook::new().sort_by_name(), Response::BookEmpty);
    }

    #[test]
    fn test_days_to_birthday_messages() {
        let mut book = book_with(&["Alice", "Bob", "Carl"]);
        book.add_birthday(&name("Alice"), birthday("10.05.1990"));
        book.add_birthday(&name("Bob"), birthday("01.05.1990"));

        assert_eq!(
            book.days_to_birthday(&name("Alice"), today()),
            Response::info("There are 9 days left until Alice turns 34")
        );
        assert_eq!(
            book.days_to_birthday(&name("Bob"), today()).level(),
            Some(Level::Success)
        );
        assert_eq!(
            book.days_to_birthday(&name("Carl"), today()),
            Response::info("No data for birthday of user Carl")
        );
    }

    #[test]
    fn test_days_alive_flags_future_and_ancient_dates() {
        let mut book = book_with(&["Alice", "Elder"]);
        book.add_birthday(&name("Alice"), birthday("30.04.2024"));
        book.add_birthday(&name("Elder"), birthday("01.01.1900"));

        assert_eq!(
            book.days_alive(&name("Alice"), today()),
            Response::info("User Alice has already lived 1 days")
        );
        assert_eq!(
            book.days_alive(&name("Elder"), today()).level(),
            Some(Level::Advisory)
        );
        // a stored birthday that is now in the future, e.g. after a clock change
        assert_eq!(
            book.days_alive(&name("Alice"), date(2024, 4, 1)).level(),
            Some(Level::Advisory)
        );
        assert_eq!(
            book.days_to_birthday(&name("Alice"), date(2024, 4, 1)).level(),
            Some(Level::Advisory)
        );
    }

    #[test]
    fn test_born_today_is_not_in_the_future() {
        let mut book = book_with(&["Alice"]);
        book.add_birthday(&name("Alice"), birthday("30.04.2024"));
        let born = date(2024, 4, 30);

        assert_eq!(
            book.days_alive(&name("Alice"), born),
            Response::info("User Alice has already lived 0 days")
        );
        assert_eq!(
            book.days_to_birthday(&name("Alice"), born).level(),
            Some(Level::Success)
        );
    }

    #[test]
    fn test_snapshot_with_duplicate_names_is_refused() {
        let json = r#"{"contacts":[{"name":"Alice"},{"name":"Bob"},{"name":"Alice"}]}"#;
        let err = serde_json::from_str::<AddressBook>(json).unwrap_err();
        assert!(err.to_string().contains("Contact Alice already exists"), "got {err}");

        let book: AddressBook =
            serde_json::from_str(r#"{"contacts":[{"name":"Alice"},{"name":"Bob"}]}"#).unwrap();
        assert_eq!(book.len(), 2);
    }

    #[test]
    fn test_birthday_add_then_change() {
        let mut book = book_with(&["Alice"]);
        book.add_birthday(&name("Alice"), birthday("10.05.1990"));
        let response = book.add_birthday(&name("Alice"), birthday("11.05.1990"));
        assert_eq!(response.level(), Some(Level::Failure));
        book.change_birthday(&name("Alice"), birthday("11.05.1990"));
        assert_eq!(
            book.get("Alice").unwrap().birthday(),
            Some(birthday("11.05.1990"))
        );
        assert_eq!(book.delete_birthday(&name("Alice")).level(), Some(Level::Success));
        assert_eq!(book.delete_birthday(&name("Alice")).level(), Some(Level::Failure));
    }

    #[test]
    fn test_address_operations() {
        let mut book = book_with(&["Alice"]);
        book.set_address(
            &name("Alice"),
            Country::parse("ukraine").unwrap(),
            Some(City::parse("Kyiv").unwrap()),
            None,
            None,
        );
        assert_eq!(
            book.change_street(&name("Alice"), Street::parse("Khreshchatyk").unwrap()),
            Response::success("Street address for user Alice was changed successfully")
        );
        assert_eq!(
            book.delete_address_part(&name("Alice"), AddressPart::Country),
            Response::success(
                "Country address for contact Alice was deleted successfully \
                 along with the rest of the address"
            )
        );
        assert!(book.get("Alice").unwrap().address().is_empty());
    }

    #[test]
    fn test_birthday_windows_from_the_book() {
        let mut book = book_with(&["Alice", "Bob", "Carl"]);
        book.add_birthday(&name("Alice"), birthday("10.05.1990"));
        book.add_birthday(&name("Bob"), birthday("01.06.1985"));

        assert!(matches!(
            book.birthdays(Window::ThisWeek, today()),
            Response::NoMatches(_)
        ));
        assert_eq!(listed(&book.birthdays(Window::NextWeek, today())), vec!["Alice"]);
        assert_eq!(
            listed(&book.birthdays(Window::Upcoming(31), today())),
            vec!["Alice", "Bob"]
        );
        assert_eq!(listed(&book.birthdays(Window::NextMonth, today())), vec!["Bob"]);
        assert_eq!(
            AddressBook::new().birthdays(Window::ThisMonth, today()),
            Response::BookEmpty
        );
    }

    #[test]
    fn test_sorting() {
        let mut book = book_with(&["Carl", "Alice", "Bob"]);
        book.add_birthday(&name("Alice"), birthday("10.05.1990"));
        book.add_birthday(&name("Carl"), birthday("10.05.1960"));

        assert_eq!(listed(&book.sort_by_name()), vec!["Alice", "Bob", "Carl"]);
        assert_eq!(listed(&book.sort_by_age(today())), vec!["Carl", "Alice"]);
        assert!(matches!(
            book_with(&["Bob"]).sort_by_age(today()),
            Response::NoMatches(_)
        ));
    }

    #[test]
    fn test_search() {
        let mut book = book_with(&["Alice", "Bob", "Alina"]);
        book.add_email(&name("Bob"), Email::parse("bob@ali.com").unwrap());

        assert_eq!(listed(&book.search("Ali")), vec!["Alice", "Alina"]);
        assert_eq!(listed(&book.search("ali")), vec!["Bob"]);
        assert!(matches!(book.search("zz"), Response::NoMatches(_)));
        assert_eq!(AddressBook::new().search("zz"), Response::BookEmpty);
    }
}
