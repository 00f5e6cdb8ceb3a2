mod address;
mod birthday;
mod contact;
mod email;
mod name;
mod phone;
mod validation;

pub use address::{Address, AddressPart, City, Country, House, Street};
pub use birthday::{Birthday, BIRTHDAY_FORMAT};
pub use contact::{Contact, ContactError, ContactField, MAX_PHONES};
pub use email::Email;
pub use name::Name;
pub use phone::Phone;
pub use validation::ValidationError;
