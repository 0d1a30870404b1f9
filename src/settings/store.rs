//! Settings persistence.
//!
//! The settings record is the only state this crate persists. The
//! [`SettingsStore`] trait abstracts over where it lives; [`JsonSettingsStore`]
//! keeps it in a small JSON file written atomically (write-to-temp + rename).
//!
//! # File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "settings": {
//!     "roots": ["/home/me/Documents"],
//!     "excludePatterns": [".*", "node_modules"],
//!     "maxScanDepth": 4,
//!     "maxItemsPerRoot": 5000,
//!     "maxTotalItems": 50000,
//!     "refreshIntervalSecs": 900
//!   }
//! }
//! ```

use super::model::SearchSettings;
use crate::domain::error::{QuickdexError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const FORMAT_VERSION: u32 = 1;

/// Persistence backend for [`SearchSettings`].
pub trait SettingsStore: Send {
    /// Loads the stored record, `Ok(None)` if nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the record exists but cannot be read or parsed.
    fn load(&self) -> Result<Option<SearchSettings>>;

    /// Replaces the stored record.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn save(&mut self, settings: &SearchSettings) -> Result<()>;
}

#[derive(Debug, Serialize, Deserialize)]
struct SettingsFile {
    version: u32,
    settings: SearchSettings,
}

/// JSON file settings store with atomic writes.
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    file_path: PathBuf,
}

impl JsonSettingsStore {
    /// Opens a store at `file_path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created.
    pub fn new(file_path: PathBuf) -> Result<Self> {
        if let Some(parent) = file_path.parent() {
            tracing::debug!(parent = ?parent, "creating settings directory");
            std::fs::create_dir_all(parent)?;
        }
        Ok(Self { file_path })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

impl SettingsStore for JsonSettingsStore {
    fn load(&self) -> Result<Option<SearchSettings>> {
        let _span = tracing::debug_span!("settings_load", path = ?self.file_path).entered();

        if !self.file_path.exists() {
            tracing::debug!("no settings file yet");
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&self.file_path)?;
        let file: SettingsFile = serde_json::from_str(&contents)
            .map_err(|e| QuickdexError::Settings(format!("failed to parse settings: {e}")))?;

        if file.version > FORMAT_VERSION {
            tracing::warn!(version = file.version, "settings written by a newer version");
        }

        tracing::debug!(roots = file.settings.roots.len(), "settings loaded");
        Ok(Some(file.settings))
    }

    fn save(&mut self, settings: &SearchSettings) -> Result<()> {
        let _span = tracing::debug_span!("settings_save", path = ?self.file_path).entered();

        let file = SettingsFile {
            version: FORMAT_VERSION,
            settings: settings.clone(),
        };
        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| QuickdexError::Settings(format!("failed to serialize settings: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        tracing::debug!("settings saved");
        Ok(())
    }
}

/// In-memory store for hosts that persist settings themselves, and for tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore {
    settings: Option<SearchSettings>,
}

impl MemorySettingsStore {
    #[must_use]
    pub const fn new(settings: Option<SearchSettings>) -> Self {
        Self { settings }
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<Option<SearchSettings>> {
        Ok(self.settings.clone())
    }

    fn save(&mut self, settings: &SearchSettings) -> Result<()> {
        self.settings = Some(settings.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonSettingsStore::new(dir.path().join("nested/settings.json")).unwrap();
        assert!(store.load().unwrap().is_none());
        assert!(dir.path().join("nested").is_dir());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonSettingsStore::new(dir.path().join("settings.json")).unwrap();

        let settings = SearchSettings {
            roots: vec![PathBuf::from("/srv/share")],
            max_scan_depth: 2,
            ..SearchSettings::default()
        };
        store.save(&settings).unwrap();

        assert_eq!(store.load().unwrap(), Some(settings));
        assert!(!dir.path().join("settings.tmp").exists());
    }

    #[test]
    fn corrupt_file_is_a_settings_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = JsonSettingsStore::new(path).unwrap();
        assert!(matches!(store.load(), Err(QuickdexError::Settings(_))));
    }
}
