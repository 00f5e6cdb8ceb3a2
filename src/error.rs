use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures reading or writing the address book snapshot.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} is not a valid snapshot: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },
    #[error("{} has snapshot version {found}, expected {expected}", .path.display())]
    Version {
        path: PathBuf,
        found: u32,
        expected: u32,
    },
    #[error("could not encode the address book: {0}")]
    Encode(String),
}

/// Failures loading `config.json`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not find a config directory; set CONTACTBOOK_DIR")]
    NoConfigDir,
    #[error("could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} is not valid settings JSON: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
