use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use super::validation::{pattern, text_field, ValidationError};

static PHONE_RE: OnceLock<Regex> = OnceLock::new();

/// Ukrainian mobile number in international form, `+380` and nine digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Phone(String);

impl Phone {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let value = input.trim();
        if pattern(&PHONE_RE, r"^\+380\d{9}$").is_match(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(ValidationError::Phone)
        }
    }
}

text_field!(Phone);
