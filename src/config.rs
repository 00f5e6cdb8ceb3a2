//! Where files live, and the user's saved preferences.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::cli::display::ViewFormat;
use crate::error::ConfigError;

/// Overrides the data directory, mostly for tests and portable installs.
pub const DIR_ENV: &str = "CONTACTBOOK_DIR";

const APP_DIR: &str = "contactbook";
const CONFIG_FILE: &str = "config.json";
const DATA_FILE: &str = "addressbook.bin";
const LOG_FILE: &str = "contactbook.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    dir: PathBuf,
}

impl Paths {
    pub fn resolve() -> Result<Self, ConfigError> {
        if let Some(dir) = std::env::var_os(DIR_ENV).filter(|d| !d.is_empty()) {
            return Ok(Self::at(dir));
        }
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::at(config_dir.join(APP_DIR)))
    }

    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }

    pub fn default_data_file(&self) -> PathBuf {
        self.dir.join(DATA_FILE)
    }

    pub fn log_file(&self) -> PathBuf {
        self.dir.join(LOG_FILE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub view: ViewFormat,
    /// Snapshot location; relative paths are taken from the data directory.
    pub data_file: Option<PathBuf>,
    /// Print the welcome banner when the interactive session starts.
    pub greeting: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            view: ViewFormat::Text,
            data_file: None,
            greeting: true,
        }
    }
}

impl Settings {
    /// A missing file means defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn data_file(&self, paths: &Paths) -> PathBuf {
        match &self.data_file {
            Some(file) if file.is_absolute() => file.clone(),
            Some(file) => paths.dir().join(file),
            None => paths.default_data_file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_is_default() {
        let dir = TempDir::new().unwrap();
        let paths = Paths::at(dir.path());
        let settings = Settings::load(&paths.config_file()).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.data_file(&paths), dir.path().join("addressbook.bin"));
    }

    #[test]
    fn test_partial_config_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        let paths = Paths::at(dir.path());
        fs::write(paths.config_file(), r#"{ "view": "table", "data_file": "mine.bin" }"#).unwrap();

        let settings = Settings::load(&paths.config_file()).unwrap();
        assert_eq!(settings.view, ViewFormat::Table);
        assert!(settings.greeting);
        assert_eq!(settings.data_file(&paths), dir.path().join("mine.bin"));
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let paths = Paths::at(dir.path());
        fs::write(paths.config_file(), "{ not json").unwrap();
        assert!(matches!(
            Settings::load(&paths.config_file()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_file_locations() {
        let paths = Paths::at("/tmp/cb");
        assert_eq!(paths.log_file(), PathBuf::from("/tmp/cb/contactbook.log"));
        assert_eq!(paths.config_file(), PathBuf::from("/tmp/cb/config.json"));
    }
}
