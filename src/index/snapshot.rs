//! Immutable index snapshots and the build status record.

use crate::domain::Item;
use serde::{Deserialize, Serialize};

/// Provenance of one build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildStats {
    /// Roots that could be opened and were walked.
    pub indexed_roots: usize,
    pub duration_ms: u64,
    /// A per-root or global cap stopped enumeration early.
    pub truncated: bool,
    /// Entries dropped because of per-entry I/O errors or unreadable roots.
    pub skipped_entries: usize,
    /// Unix epoch milliseconds at build completion.
    pub built_at_ms: i64,
}

/// A complete, versioned, point-in-time catalog.
///
/// Never mutated after publication; readers hold an `Arc` to a specific version.
#[derive(Debug, Clone, Default)]
pub struct IndexSnapshot {
    version: u64,
    items: Vec<Item>,
    stats: BuildStats,
}

impl IndexSnapshot {
    /// The never-built snapshot: version 0, no items.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Unpublished snapshot (version 0); the index state stamps the version.
    #[must_use]
    pub fn new(items: Vec<Item>, stats: BuildStats) -> Self {
        Self {
            version: 0,
            items,
            stats,
        }
    }

    #[must_use]
    pub(crate) fn stamped(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    /// Publication version, 0 if never published.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub const fn stats(&self) -> &BuildStats {
        &self.stats
    }

    #[must_use]
    pub const fn truncated(&self) -> bool {
        self.stats.truncated
    }

    #[must_use]
    pub const fn indexed_roots(&self) -> usize {
        self.stats.indexed_roots
    }

    /// Looks an item up by id with a linear scan; meant for tests and tooling.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }
}

/// Build status for display and diagnostics.
///
/// Written only by the index worker (single writer); everyone else gets clones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStatus {
    /// A snapshot has been published and is serving queries.
    pub ready: bool,
    pub building: bool,
    /// Item count of the serving snapshot.
    pub indexed_items: usize,
    pub indexed_roots: usize,
    /// Unix epoch milliseconds of the last finished build attempt.
    pub last_build_ms: Option<i64>,
    pub last_duration_ms: Option<u64>,
    pub last_error: Option<String>,
    pub refresh_interval_secs: u64,
    /// Version of the serving snapshot.
    pub index_version: u64,
    pub truncated: bool,
    pub skipped_entries: usize,
}

impl IndexStatus {
    #[must_use]
    pub fn new(refresh_interval_secs: u64) -> Self {
        Self {
            refresh_interval_secs,
            ..Self::default()
        }
    }

    /// Mirrors the serving snapshot's counters.
    pub(crate) fn describe(&mut self, snapshot: &IndexSnapshot) {
        self.ready = true;
        self.indexed_items = snapshot.len();
        self.indexed_roots = snapshot.indexed_roots();
        self.index_version = snapshot.version();
        self.truncated = snapshot.truncated();
        self.skipped_entries = snapshot.stats().skipped_entries;
    }
}

/// Result of an explicit rebuild, returned synchronously to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebuildOutcome {
    pub success: bool,
    pub duration_ms: u64,
    pub indexed_items: usize,
    pub indexed_roots: usize,
    pub truncated: bool,
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RebuildOutcome {
    /// Outcome as seen through the status record after an attempt.
    #[must_use]
    pub fn from_status(status: &IndexStatus, success: bool, duration_ms: u64) -> Self {
        Self {
            success,
            duration_ms,
            indexed_items: status.indexed_items,
            indexed_roots: status.indexed_roots,
            truncated: status.truncated,
            ready: status.ready,
            error: if success { None } else { status.last_error.clone() },
        }
    }
}
