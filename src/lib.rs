pub mod book;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;

pub use book::AddressBook;
pub use db::SnapshotStore;
