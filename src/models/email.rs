use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use super::validation::{pattern, text_field, ValidationError};

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let value = input.trim();
        let re = pattern(&EMAIL_RE, r"^[A-Za-z][\w.]+@[A-Za-z0-9]+\.[A-Za-z]{2,}$");
        if re.is_match(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(ValidationError::Email)
        }
    }
}

text_field!(Email);
