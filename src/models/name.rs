use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use super::validation::{pattern, text_field, ValidationError};

static NAME_RE: OnceLock<Regex> = OnceLock::new();

/// Contact name. Unique key of a contact inside the book.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Name(String);

impl Name {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let value = input.trim();
        if pattern(&NAME_RE, r"^[A-Za-z\d _.()/\\,]{1,20}$").is_match(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(ValidationError::Name)
        }
    }
}

text_field!(Name);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_accepts_typical_values() {
        assert_eq!(Name::parse("Alice").unwrap().as_str(), "Alice");
        assert_eq!(Name::parse("  John Smith ").unwrap().as_str(), "John Smith");
        assert!(Name::parse("J.R.R. (Tolkien)").is_ok());
    }

    #[test]
    fn test_name_rejects_bad_values() {
        assert_eq!(Name::parse(""), Err(ValidationError::Name));
        assert_eq!(Name::parse("   "), Err(ValidationError::Name));
        assert_eq!(Name::parse("a".repeat(21).as_str()), Err(ValidationError::Name));
        assert_eq!(Name::parse("Tom@home"), Err(ValidationError::Name));
    }

    #[test]
    fn test_name_from_str() {
        let name: Name = "Bob".parse().unwrap();
        assert_eq!(name.to_string(), "Bob");
    }
}
