//! Quickdex: the index and ranking engine behind a quick-launch search box.
//!
//! A user types into a single box and gets a ranked list of things to open:
//! built-in commands and settings pages, folders, files, or installed
//! applications. This crate provides:
//! - A bounded catalog built from configured filesystem roots, the built-in
//!   command set and a host-supplied application list
//! - Periodic and on-demand background rebuilds that never block queries
//! - Tiered scoring with cross-language aliases for built-in commands
//! - Persisted, clamped search settings

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  CLI (main.rs) / host application                   │  ← Entry points
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Engine (engine/)                                   │  ← SearchEngine handle
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Search        │   │ Index         │   │ Worker        │
//! │ (search/)     │   │ (index/)      │   │ (worker/)     │
//! │ - Scoring     │   │ - Walk/merge  │   │ - Build slot  │
//! │ - Ranking     │   │ - Snapshots   │   │ - Refresh     │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Catalog, Locale, Settings                          │
//! │  - Built-in commands, application provider          │
//! │  - Locale resolution and aliases                    │
//! │  - Settings record and JSON store                   │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain & Infrastructure                            │
//! │  - Item, Action, Category, errors (domain/)         │
//! │  - Platform paths (infrastructure/)                 │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`catalog`]: built-in command catalog and the application provider seam
//! - [`domain`]: items, actions, categories and errors
//! - [`engine`]: the [`SearchEngine`] handle
//! - [`index`]: builder, snapshots and index status
//! - [`infrastructure`]: platform paths
//! - [`locale`]: locale resolution and aliases
//! - [`observability`]: tracing setup with a rotating log file
//! - [`search`]: scoring and ranking
//! - [`settings`]: search settings and their persistence
//! - [`worker`]: background index worker
//!
//! # Configuration
//!
//! The engine bootstraps from a small TOML file:
//!
//! ```toml
//! data_dir = "/home/me/.local/share/quickdex"
//! trace_level = "debug"
//! settings_file = "/home/me/.config/quickdex/settings.json"
//! preferred_locale = "en-US"
//! ```
//!
//! Search settings (roots, excludes, limits, refresh interval) live in a JSON
//! file managed through [`settings::SettingsStore`].
//!
//! # Example
//!
//! ```no_run
//! use quickdex::catalog::NoApplications;
//! use quickdex::{initialize, Config};
//! use std::sync::Arc;
//!
//! let engine = initialize(&Config::default(), Arc::new(NoApplications))?;
//! engine.wait_until_idle()?;
//! for hit in engine.search("base64", Some("en-US"), 10).items {
//!     println!("{} ({})", hit.item.title, hit.score);
//! }
//! # Ok::<(), quickdex::QuickdexError>(())
//! ```

pub mod catalog;
pub mod domain;
pub mod engine;
pub mod index;
pub mod infrastructure;
pub mod locale;
pub mod observability;
pub mod search;
pub mod settings;
pub mod worker;

pub use domain::{Action, Category, Icon, Item, QuickdexError, Result};
pub use engine::{SearchEngine, SearchPage};
pub use index::{IndexSnapshot, IndexStatus, RebuildOutcome};
pub use search::{match_score, search, ScoredItem};
pub use settings::{SearchSettings, SearchSettingsUpdate, SettingsChange};

use catalog::ApplicationProvider;
use locale::LocaleResolver;
use serde::Deserialize;
use settings::JsonSettingsStore;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// File name of the settings record when `settings_file` is not set.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Engine bootstrap configuration.
///
/// Distinct from [`SearchSettings`]: this says where the engine keeps its
/// files and how it logs, not what it indexes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the log file and, by default, the settings record.
    pub data_dir: PathBuf,

    /// Log level filter. Options: `trace`, `debug`, `info`, `warn`, `error`.
    /// Default: `"info"`
    pub trace_level: Option<String>,

    /// Settings record location. Default: `<data_dir>/settings.json`
    pub settings_file: Option<PathBuf>,

    /// Locale that overrides whatever the host reports.
    pub preferred_locale: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: infrastructure::get_data_dir(),
            trace_level: None,
            settings_file: None,
            preferred_locale: None,
        }
    }
}

impl Config {
    /// Parses configuration from a flat string map.
    ///
    /// Unknown keys are ignored; blank values count as unset.
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use quickdex::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("trace_level".to_string(), "debug".to_string());
    /// map.insert("preferred_locale".to_string(), " ".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.trace_level.as_deref(), Some("debug"));
    /// assert!(config.preferred_locale.is_none());
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let get = |key: &str| {
            map.get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(String::from)
        };

        let defaults = Self::default();
        Self {
            data_dir: get("data_dir")
                .map(|d| infrastructure::expand_tilde(Path::new(&d)))
                .unwrap_or(defaults.data_dir),
            trace_level: get("trace_level"),
            settings_file: get("settings_file").map(|f| infrastructure::expand_tilde(Path::new(&f))),
            preferred_locale: get("preferred_locale"),
        }
    }

    /// Parses a TOML document; missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`QuickdexError::Config`] if the document is not valid TOML
    /// or has wrongly typed values.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(contents)
            .map_err(|e| QuickdexError::Config(format!("invalid config: {e}")))?;
        config.data_dir = infrastructure::expand_tilde(&config.data_dir);
        config.settings_file = config
            .settings_file
            .map(|f| infrastructure::expand_tilde(&f));
        config.preferred_locale = config
            .preferred_locale
            .filter(|l| !l.trim().is_empty());
        Ok(config)
    }

    /// Reads and parses a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| QuickdexError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_toml_str(&contents)
    }

    /// Where the settings record lives.
    #[must_use]
    pub fn settings_path(&self) -> PathBuf {
        self.settings_file
            .clone()
            .unwrap_or_else(|| self.data_dir.join(SETTINGS_FILE_NAME))
    }
}

/// Opens the settings store described by `config` and starts an engine.
///
/// The startup build runs in the background; searches issued before it
/// finishes return an empty page.
///
/// # Errors
///
/// Returns an error if the settings directory cannot be created or the
/// worker thread cannot be started.
pub fn initialize(config: &Config, applications: Arc<dyn ApplicationProvider>) -> Result<SearchEngine> {
    tracing::debug!(data_dir = ?config.data_dir, "initializing quickdex");

    let store = JsonSettingsStore::new(config.settings_path())?;
    let resolver = LocaleResolver::new(config.preferred_locale.clone());
    SearchEngine::start(Box::new(store), applications, resolver)
}
