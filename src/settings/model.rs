//! Search settings record and partial updates.
//!
//! Out-of-range values are clamped to the nearest valid bound instead of
//! rejecting the whole record, so a hand-edited settings file or a sloppy
//! settings form never leaves the launcher without an index.

use crate::infrastructure::paths;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

pub const MIN_SCAN_DEPTH: u32 = 1;
pub const MAX_SCAN_DEPTH: u32 = 16;
pub const DEFAULT_SCAN_DEPTH: u32 = 4;

pub const MIN_ITEMS_PER_ROOT: usize = 1;
pub const MAX_ITEMS_PER_ROOT: usize = 100_000;
pub const DEFAULT_ITEMS_PER_ROOT: usize = 5_000;

pub const MIN_TOTAL_ITEMS: usize = 1;
pub const MAX_TOTAL_ITEMS: usize = 500_000;
pub const DEFAULT_TOTAL_ITEMS: usize = 50_000;

pub const MIN_REFRESH_SECS: u64 = 30;
pub const MAX_REFRESH_SECS: u64 = 86_400;
pub const DEFAULT_REFRESH_SECS: u64 = 900;

/// Patterns excluded when the settings record does not name any.
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &[
    ".*",
    "node_modules",
    "target",
    "__pycache__",
    "$RECYCLE.BIN",
    "System Volume Information",
];

/// Index configuration: what to scan and how far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchSettings {
    /// Filesystem roots, scanned in order.
    pub roots: Vec<PathBuf>,
    /// Glob patterns matched against entry names and full paths.
    pub exclude_patterns: Vec<String>,
    /// Depth below each root; the root itself is depth 0.
    pub max_scan_depth: u32,
    pub max_items_per_root: usize,
    pub max_total_items: usize,
    pub refresh_interval_secs: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            roots: paths::default_roots(),
            exclude_patterns: DEFAULT_EXCLUDE_PATTERNS
                .iter()
                .map(|p| (*p).to_string())
                .collect(),
            max_scan_depth: DEFAULT_SCAN_DEPTH,
            max_items_per_root: DEFAULT_ITEMS_PER_ROOT,
            max_total_items: DEFAULT_TOTAL_ITEMS,
            refresh_interval_secs: DEFAULT_REFRESH_SECS,
        }
    }
}

impl SearchSettings {
    /// Clamps limits, expands `~`, makes roots absolute, drops blank
    /// roots/patterns and collapses duplicates.
    ///
    /// ```
    /// use quickdex::SearchSettings;
    ///
    /// let settings = SearchSettings {
    ///     max_scan_depth: 0,
    ///     refresh_interval_secs: 1,
    ///     ..SearchSettings::default()
    /// }
    /// .normalized();
    /// assert_eq!(settings.max_scan_depth, 1);
    /// assert_eq!(settings.refresh_interval_secs, 30);
    /// ```
    #[must_use]
    pub fn normalized(mut self) -> Self {
        let mut seen = HashSet::new();
        self.roots = self
            .roots
            .into_iter()
            .filter(|root| !root.as_os_str().to_string_lossy().trim().is_empty())
            .map(|root| paths::absolutize(&paths::expand_tilde(&root)))
            .filter(|root| seen.insert(root.clone()))
            .collect();

        let mut seen = HashSet::new();
        self.exclude_patterns = self
            .exclude_patterns
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .filter(|p| seen.insert(p.clone()))
            .collect();

        self.max_scan_depth = self.max_scan_depth.clamp(MIN_SCAN_DEPTH, MAX_SCAN_DEPTH);
        self.max_items_per_root = self
            .max_items_per_root
            .clamp(MIN_ITEMS_PER_ROOT, MAX_ITEMS_PER_ROOT);
        self.max_total_items = self.max_total_items.clamp(MIN_TOTAL_ITEMS, MAX_TOTAL_ITEMS);
        self.refresh_interval_secs = self
            .refresh_interval_secs
            .clamp(MIN_REFRESH_SECS, MAX_REFRESH_SECS);
        self
    }

    #[must_use]
    pub const fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// Applies a partial update; omitted fields stay unchanged.
    ///
    /// The result is normalized before it is compared with the current record.
    pub fn apply(&mut self, update: SearchSettingsUpdate) -> SettingsChange {
        let mut next = self.clone();
        if let Some(roots) = update.roots {
            next.roots = roots;
        }
        if let Some(patterns) = update.exclude_patterns {
            next.exclude_patterns = patterns;
        }
        if let Some(depth) = update.max_scan_depth {
            next.max_scan_depth = depth;
        }
        if let Some(per_root) = update.max_items_per_root {
            next.max_items_per_root = per_root;
        }
        if let Some(total) = update.max_total_items {
            next.max_total_items = total;
        }
        if let Some(secs) = update.refresh_interval_secs {
            next.refresh_interval_secs = secs;
        }
        let next = next.normalized();

        let change = if next == *self {
            SettingsChange::Unchanged
        } else if next.affects_index(self) {
            SettingsChange::Index
        } else {
            SettingsChange::RefreshOnly
        };
        *self = next;
        change
    }

    fn affects_index(&self, other: &Self) -> bool {
        self.roots != other.roots
            || self.exclude_patterns != other.exclude_patterns
            || self.max_scan_depth != other.max_scan_depth
            || self.max_items_per_root != other.max_items_per_root
            || self.max_total_items != other.max_total_items
    }
}

/// Partial settings update; `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchSettingsUpdate {
    pub roots: Option<Vec<PathBuf>>,
    pub exclude_patterns: Option<Vec<String>>,
    pub max_scan_depth: Option<u32>,
    pub max_items_per_root: Option<usize>,
    pub max_total_items: Option<usize>,
    pub refresh_interval_secs: Option<u64>,
}

/// What an update changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsChange {
    Unchanged,
    /// Only the refresh timer changed; the current index stays valid.
    RefreshOnly,
    /// Roots, patterns or limits changed; the index must be rebuilt.
    Index,
}

impl SettingsChange {
    #[must_use]
    pub const fn requires_rebuild(self) -> bool {
        matches!(self, Self::Index)
    }
}
