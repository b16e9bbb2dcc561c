//! Application configuration.
//!
//! The configuration file is a JSON object. Values found in the file
//! override the defaults key by key at the top level, so an older file
//! missing a newer key still loads.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::files::write_atomic;
use crate::{Error, Result};

/// Rejection reasons: single-character key to destination folder name.
///
/// Keys are iterated in ascending order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, String>",
    into = "BTreeMap<String, String>"
)]
pub struct ReasonMap(BTreeMap<char, String>);

impl ReasonMap {
    /// Folder name for a reason key.
    #[must_use]
    pub fn folder(&self, key: char) -> Option<&str> {
        self.0.get(&key).map(String::as_str)
    }

    /// Returns true if `key` is a configured reason.
    #[must_use]
    pub fn contains(&self, key: char) -> bool {
        self.0.contains_key(&key)
    }

    /// Iterate `(key, folder)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (char, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Number of reasons.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no reasons are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ReasonMap {
    fn default() -> Self {
        Self(BTreeMap::from([
            ('1', "UnsatisfactoryEducation".to_string()),
            ('2', "UnsatisfactoryExperience".to_string()),
            ('3', "Other".to_string()),
        ]))
    }
}

impl FromIterator<(char, String)> for ReasonMap {
    fn from_iter<I: IntoIterator<Item = (char, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl TryFrom<BTreeMap<String, String>> for ReasonMap {
    type Error = String;

    fn try_from(raw: BTreeMap<String, String>) -> std::result::Result<Self, Self::Error> {
        let mut map = BTreeMap::new();
        for (key, folder) in raw {
            let mut chars = key.chars();
            let (Some(c), None) = (chars.next(), chars.next()) else {
                return Err(format!("reason key {key:?} must be a single character"));
            };
            if folder.trim().is_empty() {
                return Err(format!("reason {key:?} has an empty folder name"));
            }
            map.insert(c, folder);
        }
        Ok(Self(map))
    }
}

impl From<ReasonMap> for BTreeMap<String, String> {
    fn from(map: ReasonMap) -> Self {
        map.0.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }
}

/// Persistent application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Rejection reasons.
    pub reason_map: ReasonMap,
    /// Folder (under the base folder) that held CVs go to.
    pub hold_folder: String,
    /// Persistent tier of the email directory: normalized name to email.
    pub email_map: BTreeMap<String, String>,
    /// Maximum number of undoable operations.
    pub max_undo: usize,
    /// Initial viewer zoom.
    pub default_zoom: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reason_map: ReasonMap::default(),
            hold_folder: "HoldForReview".to_string(),
            email_map: BTreeMap::new(),
            max_undo: 100,
            default_zoom: 1.5,
        }
    }
}

impl Config {
    /// Load the configuration merged over the defaults.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not a JSON object,
    /// or holds invalid values.
    pub fn load(path: &Path) -> Result<Self> {
        let mut merged = serde_json::to_value(Self::default())?;

        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let Value::Object(loaded) = serde_json::from_str::<Value>(&contents)? else {
                return Err(Error::Format(
                    "configuration root must be a JSON object".to_string(),
                ));
            };
            if let Value::Object(base) = &mut merged {
                base.extend(loaded);
            }
        }

        let config: Self =
            serde_json::from_value(merged).map_err(|e| Error::Format(e.to_string()))?;
        if config.hold_folder.trim().is_empty() {
            return Err(Error::Format("hold_folder must not be empty".to_string()));
        }
        Ok(config)
    }

    /// Load the configuration and write the merged result back, creating
    /// the file on first run.
    ///
    /// Failures are logged and never fatal: an unreadable file yields the
    /// defaults and is left untouched so it can be fixed by hand.
    #[must_use]
    pub fn load_or_create(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => {
                if let Err(e) = config.save(path) {
                    warn!("Couldn't save config to {}: {e}", path.display());
                }
                config
            }
            Err(e) => {
                warn!("Error loading config from {}: {e}; using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Write the configuration as pretty JSON, atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;
        write_atomic(path, contents.as_bytes())?;
        info!("Config saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        let config = Config::load_or_create(&path);

        assert_eq!(config, Config::default());
        assert!(path.is_file());
        assert_eq!(Config::load(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_loaded_keys_override_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"max_undo": 5, "reason_map": {"x": "NoVisa"}}"#).unwrap();

        let config = Config::load_or_create(&path);

        assert_eq!(config.max_undo, 5);
        assert_eq!(config.reason_map.folder('x'), Some("NoVisa"));
        assert!(!config.reason_map.contains('1'));
        assert_eq!(config.hold_folder, "HoldForReview");
        assert_eq!(config.default_zoom, 1.5);

        let written: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["hold_folder"], "HoldForReview");
    }

    #[test]
    fn test_invalid_reason_key_is_format_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"reason_map": {"12": "TooLong"}}"#).unwrap();

        assert!(matches!(Config::load(&path), Err(Error::Format(_))));
    }

    #[test]
    fn test_broken_file_falls_back_and_is_kept() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let config = Config::load_or_create(&path);

        assert_eq!(config, Config::default());
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn test_reason_map_serializes_string_keys() {
        let json = serde_json::to_value(ReasonMap::default()).unwrap();
        assert_eq!(json["1"], "UnsatisfactoryEducation");
        assert_eq!(json["3"], "Other");
    }
}
