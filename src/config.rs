//! Reader configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Default cache capacity (number of entries).
pub const DEFAULT_CACHE_CAPACITY: usize = 10_000;

/// Options for opening phone data files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Check once at open time that index keys are strictly ascending.
    pub verify_index: bool,
    /// Whether cached readers keep lookup results.
    pub cache_enabled: bool,
    /// Maximum number of cached keys.
    pub cache_capacity: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            verify_index: false,
            cache_enabled: true,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl ReaderConfig {
    /// Create a new configuration with the specified cache capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cache_capacity: capacity,
            cache_enabled: true,
            ..Self::default()
        }
    }

    /// Create a configuration with caching disabled.
    pub fn no_cache() -> Self {
        Self {
            cache_capacity: 0,
            cache_enabled: false,
            ..Self::default()
        }
    }

    /// Enable index verification at open time.
    pub fn verified(mut self) -> Self {
        self.verify_index = true;
        self
    }

    /// Load configuration from a JSON file.
    ///
    /// Returns the default configuration if the file doesn't exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| Error::Config(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        fs::write(path, content).map_err(|e| Error::Config(e.to_string()))
    }

    pub(crate) fn caching(&self) -> bool {
        self.cache_enabled && self.cache_capacity > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = ReaderConfig::default();
        assert!(!config.verify_index);
        assert!(config.caching());
        assert_eq!(config.cache_capacity, DEFAULT_CACHE_CAPACITY);
        assert!(!ReaderConfig::no_cache().caching());
        assert!(!ReaderConfig::with_capacity(0).caching());
        assert!(ReaderConfig::with_capacity(5).verified().verify_index);
    }

    #[test]
    fn test_load_missing_returns_default() {
        let dir = tempdir().unwrap();
        let config = ReaderConfig::load(dir.path().join("nonexistent.json")).unwrap();
        assert_eq!(config, ReaderConfig::default());
    }

    #[test]
    fn test_load_partial_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reader.json");
        fs::write(&path, r#"{ "verify_index": true }"#).unwrap();

        let config = ReaderConfig::load(&path).unwrap();
        assert!(config.verify_index);
        assert!(config.cache_enabled);
        assert_eq!(config.cache_capacity, DEFAULT_CACHE_CAPACITY);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reader.json");

        let config = ReaderConfig::with_capacity(64).verified();
        config.save(&path).unwrap();
        assert_eq!(ReaderConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reader.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(ReaderConfig::load(&path), Err(Error::Config(_))));
    }
}
