use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

use super::validation::{pattern, text_field, ValidationError};

/// One component of a postal address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressPart {
    Country,
    City,
    Street,
    House,
}

impl AddressPart {
    pub const ALL: [AddressPart; 4] = [
        AddressPart::Country,
        AddressPart::City,
        AddressPart::Street,
        AddressPart::House,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::City => "city",
            Self::Street => "street",
            Self::House => "house",
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            Self::Country => "Use 2-56 letters, spaces, hyphens or apostrophes.",
            Self::City => "Use 2-25 letters, spaces or hyphens.",
            Self::Street => "Use 2-25 letters, digits, spaces or .-():_,/",
            Self::House => "Use 1-15 letters, digits, spaces or -\\/.",
        }
    }
}

impl fmt::Display for AddressPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static COUNTRY_RE: OnceLock<Regex> = OnceLock::new();
static CITY_RE: OnceLock<Regex> = OnceLock::new();
static STREET_RE: OnceLock<Regex> = OnceLock::new();
static HOUSE_RE: OnceLock<Regex> = OnceLock::new();

fn checked(value: &str, re: &Regex, part: AddressPart) -> Result<String, ValidationError> {
    let value = value.trim();
    if re.is_match(value) {
        Ok(value.to_string())
    } else {
        Err(ValidationError::Address { part })
    }
}

/// Country name, stored title-cased ("united kingdom" -> "United Kingdom").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Country(String);

impl Country {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let re = pattern(&COUNTRY_RE, r"^[A-Za-z][A-Za-z '\-]{1,55}$");
        let value = checked(input, re, AddressPart::Country)?;
        Ok(Self(title_case(&value)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct City(String);

impl City {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let re = pattern(&CITY_RE, r"^[A-Za-z][A-Za-z \-]{1,24}$");
        checked(input, re, AddressPart::City).map(Self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Street(String);

impl Street {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let re = pattern(&STREET_RE, r"^[A-Za-z\d.\-():_,/ ]{2,25}$");
        checked(input, re, AddressPart::Street).map(Self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct House(String);

impl House {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let re = pattern(&HOUSE_RE, r"^[A-Za-z\d \-\\/.]{1,15}$");
        checked(input, re, AddressPart::House).map(Self)
    }
}

text_field!(Country);
text_field!(City);
text_field!(Street);
text_field!(House);

fn title_case(value: &str) -> String {
    value
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Postal address. City, street and house only exist alongside a country;
/// `Contact` enforces that when the parts are edited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub(super) country: Option<Country>,
    #[serde(default)]
    pub(super) city: Option<City>,
    #[serde(default)]
    pub(super) street: Option<Street>,
    #[serde(default)]
    pub(super) house: Option<House>,
}

impl Address {
    pub fn country(&self) -> Option<&Country> {
        self.country.as_ref()
    }

    pub fn city(&self) -> Option<&City> {
        self.city.as_ref()
    }

    pub fn street(&self) -> Option<&Street> {
        self.street.as_ref()
    }

    pub fn house(&self) -> Option<&House> {
        self.house.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        AddressPart::ALL.iter().all(|part| self.part(*part).is_none())
    }

    /// The value of `part`, if set.
    pub fn part(&self, part: AddressPart) -> Option<&str> {
        match part {
            AddressPart::Country => self.country.as_ref().map(Country::as_str),
            AddressPart::City => self.city.as_ref().map(City::as_str),
            AddressPart::Street => self.street.as_ref().map(Street::as_str),
            AddressPart::House => self.house.as_ref().map(House::as_str),
        }
    }
}
