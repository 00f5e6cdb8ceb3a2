use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

use super::address::AddressPart;

/// Rejected field input. Raised by the field constructors, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Wrong format. Name should be 1-20 characters: letters, digits, spaces or _.()/\\,")]
    Name,
    #[error("Wrong format. Phone number should be in the format +380XXXXXXXXX.")]
    Phone,
    #[error("Wrong format. Enter birthday in format dd.mm.YYYY with a real day and month.")]
    BirthdayFormat,
    #[error("The user has not been born yet.")]
    BirthdayInFuture,
    #[error("Wrong format. Email should be in the format xxxxxx@xxx.xx")]
    Email,
    #[error("Wrong {part} format. {}", .part.hint())]
    Address { part: AddressPart },
    #[error("Enter the number of days as a whole number from 0 to 365.")]
    Days,
}

/// Compile a field pattern once and hand out the shared instance.
pub(crate) fn pattern(cell: &'static OnceLock<Regex>, source: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(source).expect("field pattern is a valid regex"))
}

/// Shared accessors for the string-backed field types.
macro_rules! text_field {
    ($ty:ident) => {
        impl $ty {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::str::FromStr for $ty {
            type Err = $crate::models::ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        // Stored values go back through `parse` when a snapshot is read.
        impl TryFrom<String> for $ty {
            type Error = $crate::models::ValidationError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::parse(&s)
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> String {
                value.0
            }
        }
    };
}

pub(crate) use text_field;
