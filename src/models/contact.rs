use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use super::{Address, AddressPart, Birthday, City, Country, Email, House, Name, Phone, Street};

/// Maximum number of phones a contact can hold.
pub const MAX_PHONES: usize = 5;

/// A contact field that can be set or cleared on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Birthday,
    Email,
    Address(AddressPart),
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Birthday => f.write_str("birthday"),
            Self::Email => f.write_str("email"),
            Self::Address(part) => write!(f, "{} address", part),
        }
    }
}

/// A mutation that breaks one of the contact's rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContactError {
    #[error("Phone {phone} is already registered for contact {name}")]
    DuplicatePhone { name: Name, phone: Phone },
    #[error("Contact {name} already has {max} phones, which is the maximum")]
    PhoneLimit { name: Name, max: usize },
    #[error("Phone {phone} is not present in {name}'s phones")]
    UnknownPhone { name: Name, phone: Phone },
    #[error("The {field} for contact {name} already exists. Use command \"change {field}\".")]
    AlreadySet { name: Name, field: ContactField },
    #[error("You haven't included {field} for contact {name} yet")]
    NotSet { name: Name, field: ContactField },
    #[error("Add a country for contact {name} before setting the {part}")]
    CountryRequired { name: Name, part: AddressPart },
}

/// One person's record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredContact")]
pub struct Contact {
    name: Name,
    #[serde(default)]
    phones: Vec<Phone>,
    #[serde(default)]
    birthday: Option<Birthday>,
    #[serde(default)]
    email: Option<Email>,
    #[serde(default)]
    address: Address,
}

/// A contact as read from a snapshot, before the per-contact rules are
/// checked again.
#[derive(Deserialize)]
struct StoredContact {
    name: Name,
    #[serde(default)]
    phones: Vec<Phone>,
    #[serde(default)]
    birthday: Option<Birthday>,
    #[serde(default)]
    email: Option<Email>,
    #[serde(default)]
    address: Address,
}

impl TryFrom<StoredContact> for Contact {
    type Error = ContactError;

    fn try_from(stored: StoredContact) -> Result<Self, Self::Error> {
        let mut contact = Contact::new(stored.name);
        for phone in stored.phones {
            contact.add_phone(phone)?;
        }
        if stored.address.country.is_none() {
            let orphan = AddressPart::ALL
                .into_iter()
                .find(|part| stored.address.part(*part).is_some());
            if let Some(part) = orphan {
                return Err(ContactError::CountryRequired {
                    name: contact.name,
                    part,
                });
            }
        }
        // Birthdays are not re-checked against today; days-alive flags them.
        contact.birthday = stored.birthday;
        contact.email = stored.email;
        contact.address = stored.address;
        Ok(contact)
    }
}

impl Contact {
    pub fn new(name: Name) -> Self {
        Self {
            name,
            phones: Vec::new(),
            birthday: None,
            email: None,
            address: Address::default(),
        }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn phones(&self) -> &[Phone] {
        &self.phones
    }

    pub fn birthday(&self) -> Option<Birthday> {
        self.birthday
    }

    pub fn email(&self) -> Option<&Email> {
        self.email.as_ref()
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Only the book renames, since the name is its key.
    pub(crate) fn rename(&mut self, name: Name) {
        self.name = name;
    }

    // ==================== PHONES ====================

    pub fn add_phone(&mut self, phone: Phone) -> Result<(), ContactError> {
        if self.phones.contains(&phone) {
            return Err(ContactError::DuplicatePhone {
                name: self.name.clone(),
                phone,
            });
        }
        if self.phones.len() >= MAX_PHONES {
            return Err(ContactError::PhoneLimit {
                name: self.name.clone(),
                max: MAX_PHONES,
            });
        }
        self.phones.push(phone);
        Ok(())
    }

    /// Replace `old` in place, keeping its position in the list.
    pub fn change_phone(&mut self, old: &Phone, new: Phone) -> Result<(), ContactError> {
        let idx = self.phone_index(old)?;
        if new != *old && self.phones.contains(&new) {
            return Err(ContactError::DuplicatePhone {
                name: self.name.clone(),
                phone: new,
            });
        }
        self.phones[idx] = new;
        Ok(())
    }

    pub fn delete_phone(&mut self, phone: &Phone) -> Result<(), ContactError> {
        let idx = self.phone_index(phone)?;
        self.phones.remove(idx);
        Ok(())
    }

    fn phone_index(&self, phone: &Phone) -> Result<usize, ContactError> {
        self.phones
            .iter()
            .position(|p| p == phone)
            .ok_or_else(|| ContactError::UnknownPhone {
                name: self.name.clone(),
                phone: phone.clone(),
            })
    }

    // ==================== BIRTHDAY / EMAIL ====================

    pub fn add_birthday(&mut self, birthday: Birthday) -> Result<(), ContactError> {
        if self.birthday.is_some() {
            return Err(self.already_set(ContactField::Birthday));
        }
        self.birthday = Some(birthday);
        Ok(())
    }

    pub fn change_birthday(&mut self, birthday: Birthday) {
        self.birthday = Some(birthday);
    }

    pub fn delete_birthday(&mut self) -> Result<(), ContactError> {
        match self.birthday.take() {
            Some(_) => Ok(()),
            None => Err(self.not_set(ContactField::Birthday)),
        }
    }

    pub fn add_email(&mut self, email: Email) -> Result<(), ContactError> {
        if self.email.is_some() {
            return Err(self.already_set(ContactField::Email));
        }
        self.email = Some(email);
        Ok(())
    }

    pub fn change_email(&mut self, email: Email) {
        self.email = Some(email);
    }

    pub fn delete_email(&mut self) -> Result<(), ContactError> {
        match self.email.take() {
            Some(_) => Ok(()),
            None => Err(self.not_set(ContactField::Email)),
        }
    }

    // ==================== ADDRESS ====================

    /// Replace the whole address.
    pub fn set_address(
        &mut self,
        country: Country,
        city: Option<City>,
        street: Option<Street>,
        house: Option<House>,
    ) {
        self.address = Address {
            country: Some(country),
            city,
            street,
            house,
        };
    }

    pub fn change_country(&mut self, country: Country) {
        self.address.country = Some(country);
    }

    pub fn change_city(&mut self, city: City) -> Result<(), ContactError> {
        self.require_country(AddressPart::City)?;
        self.address.city = Some(city);
        Ok(())
    }

    pub fn change_street(&mut self, street: Street) -> Result<(), ContactError> {
        self.require_country(AddressPart::Street)?;
        self.address.street = Some(street);
        Ok(())
    }

    pub fn change_house(&mut self, house: House) -> Result<(), ContactError> {
        self.require_country(AddressPart::House)?;
        self.address.house = Some(house);
        Ok(())
    }

    /// Remove one address part. Removing the country clears the whole
    /// address, since the other parts mean nothing without it.
    pub fn delete_address_part(&mut self, part: AddressPart) -> Result<(), ContactError> {
        if self.address.part(part).is_none() {
            return Err(self.not_set(ContactField::Address(part)));
        }
        match part {
            AddressPart::Country => self.address = Address::default(),
            AddressPart::City => self.address.city = None,
            AddressPart::Street => self.address.street = None,
            AddressPart::House => self.address.house = None,
        }
        Ok(())
    }

    fn require_country(&self, part: AddressPart) -> Result<(), ContactError> {
        if self.address.country.is_none() {
            return Err(ContactError::CountryRequired {
                name: self.name.clone(),
                part,
            });
        }
        Ok(())
    }

    fn already_set(&self, field: ContactField) -> ContactError {
        ContactError::AlreadySet {
            name: self.name.clone(),
            field,
        }
    }

    fn not_set(&self, field: ContactField) -> ContactError {
        ContactError::NotSet {
            name: self.name.clone(),
            field,
        }
    }
}

/// The one-line summary that search matches against:
/// `User: Alice | phones: +380… | birthday: 10.05.1990 | email: … | address: Ukraine/Kyiv//`
impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phones: Vec<&str> = self.phones.iter().map(Phone::as_str).collect();
        let birthday = self.birthday.map(|b| b.to_string()).unwrap_or_default();
        let email = self.email.as_ref().map(Email::as_str).unwrap_or("");
        let address: Vec<&str> = AddressPart::ALL
            .iter()
            .map(|part| self.address.part(*part).unwrap_or(""))
            .collect();
        write!(
            f,
            "User: {} | phones: {} | birthday: {} | email: {} | address: {}",
            self.name,
            phones.join(", "),
            birthday,
            email,
            address.join("/")
        )
    }
}
