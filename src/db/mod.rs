//! Whole-book snapshots in a single CBOR file.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::book::AddressBook;
use crate::error::StoreError;

/// Bumped whenever the stored layout changes.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize)]
struct SnapshotOut<'a> {
    version: u32,
    book: &'a AddressBook,
}

#[derive(Deserialize)]
struct SnapshotHeader {
    version: u32,
}

#[derive(Deserialize)]
struct SnapshotIn {
    book: AddressBook,
}

pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the book, falling back to an empty one. A snapshot that cannot
    /// be decoded is moved aside so the next save does not overwrite it.
    pub fn load(&self) -> AddressBook {
        match self.try_load() {
            Ok(Some(book)) => {
                info!("loaded {} contacts from {}", book.len(), self.path.display());
                book
            }
            Ok(None) => {
                info!("no snapshot at {}, starting empty", self.path.display());
                AddressBook::new()
            }
            Err(e @ (StoreError::Corrupt { .. } | StoreError::Version { .. })) => {
                warn!("{}; starting with an empty address book", e);
                self.quarantine();
                AddressBook::new()
            }
            Err(e) => {
                warn!("{}; starting with an empty address book", e);
                AddressBook::new()
            }
        }
    }

    /// Read and decode the snapshot. `Ok(None)` when there is no file yet.
    pub fn try_load(&self) -> Result<Option<AddressBook>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let header: SnapshotHeader =
            ciborium::de::from_reader(bytes.as_slice()).map_err(|e| self.corrupt(e))?;
        if header.version != SNAPSHOT_VERSION {
            return Err(StoreError::Version {
                path: self.path.clone(),
                found: header.version,
                expected: SNAPSHOT_VERSION,
            });
        }

        let snapshot: SnapshotIn =
            ciborium::de::from_reader(bytes.as_slice()).map_err(|e| self.corrupt(e))?;
        Ok(Some(snapshot.book))
    }

    /// Write the whole book. The previous snapshot stays intact until the
    /// new one is fully on disk.
    pub fn save(&self, book: &AddressBook) -> Result<(), StoreError> {
        let mut buf = Vec::new();
        let snapshot = SnapshotOut {
            version: SNAPSHOT_VERSION,
            book,
        };
        ciborium::ser::into_writer(&snapshot, &mut buf)
            .map_err(|e| StoreError::Encode(e.to_string()))?;

        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        let tmp = self.sibling(".tmp");
        let mut file = File::create(&tmp).map_err(write_err)?;
        file.write_all(&buf).map_err(write_err)?;
        file.flush().map_err(write_err)?;
        file.sync_all().map_err(write_err)?;
        drop(file);
        fs::rename(&tmp, &self.path).map_err(write_err)?;

        info!("saved {} contacts to {}", book.len(), self.path.display());
        Ok(())
    }

    fn quarantine(&self) {
        let aside = self.sibling(".corrupt");
        match fs::rename(&self.path, &aside) {
            Ok(()) => warn!("moved unreadable snapshot to {}", aside.display()),
            Err(e) => warn!("could not move {} aside: {}", self.path.display(), e),
        }
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(suffix);
        PathBuf::from(name)
    }

    fn corrupt(&self, e: impl std::fmt::Display) -> StoreError {
        StoreError::Corrupt {
            path: self.path.clone(),
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Birthday, Country, Name, Phone};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> SnapshotStore {
        SnapshotStore::new(dir.path().join("book.bin"))
    }

    fn sample_book() -> AddressBook {
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let alice = Name::parse("Alice").unwrap();
        let mut book = AddressBook::new();
        book.add_contact(alice.clone());
        book.add_contact(Name::parse("Bob").unwrap());
        book.add_phone(&alice, Phone::parse("+380501234567").unwrap());
        book.add_birthday(&alice, Birthday::parse("10.05.1990", today).unwrap());
        book.set_address(&alice, Country::parse("Ukraine").unwrap(), None, None, None);
        book
    }

    #[test]
    fn test_missing_file_is_empty_book() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.try_load().unwrap().is_none());
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let book = sample_book();
        store.save(&book).unwrap();
        assert_eq!(store.load(), book);
        assert!(!store.sibling(".tmp").exists());
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let store = SnapshotStore::new(dir.path().join("nested").join("book.bin"));
        store.save(&sample_book()).unwrap();
        assert_eq!(store.load().len(), 2);
    }

    #[test]
    fn test_corrupt_file_is_moved_aside() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), b"definitely not cbor").unwrap();

        assert!(matches!(store.try_load(), Err(StoreError::Corrupt { .. })));
        assert!(store.load().is_empty());
        assert!(!store.path().exists());
        assert!(store.sibling(".corrupt").exists());
    }

    #[test]
    fn test_unknown_version_is_rejected() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let book = AddressBook::new();
        let mut buf = Vec::new();
        ciborium::ser::into_writer(
            &SnapshotOut {
                version: SNAPSHOT_VERSION + 1,
                book: &book,
            },
            &mut buf,
        )
        .unwrap();
        fs::write(store.path(), buf).unwrap();

        assert!(matches!(
            store.try_load(),
            Err(StoreError::Version { found, .. }) if found == SNAPSHOT_VERSION + 1
        ));
    }

    #[test]
    fn test_stored_future_birthday_still_loads() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let far_future = NaiveDate::from_ymd_opt(2100, 1, 1).unwrap();
        let born = NaiveDate::from_ymd_opt(2090, 1, 1).unwrap();
        let name = Name::parse("Later").unwrap();
        let mut book = AddressBook::new();
        book.add_contact(name.clone());
        book.add_birthday(&name, Birthday::new(born, far_future).unwrap());
        store.save(&book).unwrap();

        let loaded = store.try_load().unwrap().unwrap();
        assert_eq!(loaded.get("Later").unwrap().birthday().unwrap().date(), born);
    }

    #[derive(Serialize)]
    struct RawContact<'a> {
        name: &'a str,
        phones: Vec<&'a str>,
    }

    #[derive(Serialize)]
    struct RawBook<'a> {
        contacts: Vec<RawContact<'a>>,
    }

    fn write_raw(store: &SnapshotStore, contacts: Vec<RawContact<'_>>) {
        #[derive(Serialize)]
        struct Raw<'a> {
            version: u32,
            book: RawBook<'a>,
        }
        let mut buf = Vec::new();
        let raw = Raw {
            version: SNAPSHOT_VERSION,
            book: RawBook { contacts },
        };
        ciborium::ser::into_writer(&raw, &mut buf).unwrap();
        fs::write(store.path(), buf).unwrap();
    }

    #[test]
    fn test_snapshot_breaking_book_rules_is_moved_aside() {
        let alice = |phones: Vec<&'static str>| RawContact {
            name: "Alice",
            phones,
        };
        let cases = vec![
            vec![alice(vec![]), alice(vec![])],
            vec![alice(vec!["+380501234567"; 2])],
            vec![alice(vec![
                "+380000000001",
                "+380000000002",
                "+380000000003",
                "+380000000004",
                "+380000000005",
                "+380000000006",
            ])],
            vec![RawContact {
                name: "not a valid name @@@",
                phones: vec![],
            }],
        ];

        for contacts in cases {
            let dir = TempDir::new().unwrap();
            let store = store_in(&dir);
            write_raw(&store, contacts);

            assert!(matches!(store.try_load(), Err(StoreError::Corrupt { .. })));
            assert!(store.load().is_empty());
            assert!(store.sibling(".corrupt").exists());
        }
    }

    #[test]
    fn test_raw_snapshot_within_rules_loads() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        write_raw(
            &store,
            vec![RawContact {
                name: "Alice",
                phones: vec!["+380501234567"],
            }],
        );
        let book = store.try_load().unwrap().unwrap();
        assert_eq!(book.get("Alice").unwrap().phones().len(), 1);
    }
}
