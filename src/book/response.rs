use crate::models::{AddressPart, Contact};

/// How a status message should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Info,
    /// The data looks wrong but is kept.
    Advisory,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub level: Level,
    pub text: String,
}

/// Flat, display-neutral view of one contact. Absent values are empty strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSummary {
    pub name: String,
    pub phones: Vec<String>,
    pub birthday: String,
    pub email: String,
    pub country: String,
    pub city: String,
    pub street: String,
    pub house: String,
    /// The contact's one-line form, the same text search matches against.
    pub line: String,
}

impl ContactSummary {
    /// Address parts in country/city/street/house order.
    pub fn address_parts(&self) -> [&str; 4] {
        [&self.country, &self.city, &self.street, &self.house]
    }
}

impl From<&Contact> for ContactSummary {
    fn from(contact: &Contact) -> Self {
        let address = contact.address();
        let part = |p: AddressPart| address.part(p).unwrap_or_default().to_string();
        Self {
            name: contact.name().to_string(),
            phones: contact.phones().iter().map(|p| p.to_string()).collect(),
            birthday: contact.birthday().map(|b| b.to_string()).unwrap_or_default(),
            email: contact.email().map(|e| e.to_string()).unwrap_or_default(),
            country: part(AddressPart::Country),
            city: part(AddressPart::City),
            street: part(AddressPart::Street),
            house: part(AddressPart::House),
            line: contact.to_string(),
        }
    }
}

/// What every book operation hands to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Listing {
        heading: String,
        contacts: Vec<ContactSummary>,
    },
    Single(ContactSummary),
    Message(Message),
    /// The book has contacts but none matched.
    NoMatches(String),
    /// The book holds no contacts.
    BookEmpty,
}

impl Response {
    pub fn message(level: Level, text: impl Into<String>) -> Self {
        Response::Message(Message {
            level,
            text: text.into(),
        })
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::message(Level::Success, text)
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::message(Level::Info, text)
    }

    pub fn advisory(text: impl Into<String>) -> Self {
        Self::message(Level::Advisory, text)
    }

    pub fn failure(text: impl Into<String>) -> Self {
        Self::message(Level::Failure, text)
    }

    pub fn listing<'a>(
        heading: impl Into<String>,
        contacts: impl IntoIterator<Item = &'a Contact>,
    ) -> Self {
        Response::Listing {
            heading: heading.into(),
            contacts: contacts.into_iter().map(ContactSummary::from).collect(),
        }
    }

    /// Level of a plain message, `None` for the other variants.
    pub fn level(&self) -> Option<Level> {
        match self {
            Response::Message(m) => Some(m.level),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{City, Country, Name, Phone};

    #[test]
    fn test_summary_from_contact() {
        let mut contact = Contact::new(Name::parse("Alice").unwrap());
        contact.add_phone(Phone::parse("+380501234567").unwrap()).unwrap();
        contact.set_address(
            Country::parse("Ukraine").unwrap(),
            Some(City::parse("Odesa").unwrap()),
            None,
            None,
        );
        let summary = ContactSummary::from(&contact);
        assert_eq!(summary.name, "Alice");
        assert_eq!(summary.phones, vec!["+380501234567"]);
        assert_eq!(summary.birthday, "");
        assert_eq!(summary.email, "");
        assert_eq!(summary.address_parts(), ["Ukraine", "Odesa", "", ""]);
        assert_eq!(summary.line, contact.to_string());
    }

    #[test]
    fn test_message_levels() {
        assert_eq!(Response::success("ok").level(), Some(Level::Success));
        assert_eq!(Response::failure("no").level(), Some(Level::Failure));
        assert_eq!(Response::BookEmpty.level(), None);
    }
}
