//! The serving snapshot and its status record.
//!
//! [`IndexState`] is the one owning handle of the current index. Readers call
//! [`IndexState::snapshot`] and keep the returned `Arc` for as long as they
//! need a consistent view; the builder side swaps whole snapshots in through
//! `arc-swap`, so a reader sees either the fully old or the fully new version.
//!
//! All status writes go through [`IndexState::run_build`], which the index
//! worker calls from a single thread.

use super::builder::IndexBuilder;
use super::cancel::CancelToken;
use super::snapshot::{IndexSnapshot, IndexStatus, RebuildOutcome};
use crate::domain::error::QuickdexError;
use crate::settings::SearchSettings;
use arc_swap::ArcSwap;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Instant;

/// Result of one build attempt, as seen by the worker loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildAttempt {
    /// A new snapshot was published.
    Published(RebuildOutcome),
    /// The build failed; the previous snapshot (or a catalog-only fallback) serves.
    Failed(RebuildOutcome),
    /// The build was superseded and published nothing.
    Cancelled,
}

#[derive(Debug)]
pub struct IndexState {
    snapshot: ArcSwap<IndexSnapshot>,
    status: RwLock<IndexStatus>,
}

impl IndexState {
    #[must_use]
    pub fn new(refresh_interval_secs: u64) -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(IndexSnapshot::empty()),
            status: RwLock::new(IndexStatus::new(refresh_interval_secs)),
        }
    }

    /// The most recently published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<IndexSnapshot> {
        self.snapshot.load_full()
    }

    #[must_use]
    pub fn status(&self) -> IndexStatus {
        self.status.read().clone()
    }

    pub(crate) fn set_refresh_interval(&self, secs: u64) {
        self.status.write().refresh_interval_secs = secs;
    }

    pub(crate) fn set_building(&self, building: bool) {
        self.status.write().building = building;
    }

    /// Stamps `snapshot` with the next version and makes it the serving one.
    ///
    /// The status lock is held across the swap so status and snapshot never
    /// describe different versions.
    fn publish(&self, snapshot: IndexSnapshot, error: Option<String>) -> Arc<IndexSnapshot> {
        let mut status = self.status.write();
        let version = status.index_version + 1;
        let snapshot = Arc::new(snapshot.stamped(version));
        self.snapshot.store(Arc::clone(&snapshot));

        status.describe(&snapshot);
        status.last_error = error;
        status.last_build_ms = Some(snapshot.stats().built_at_ms);
        status.last_duration_ms = Some(snapshot.stats().duration_ms);
        snapshot
    }

    /// Runs one build end to end and records its outcome.
    ///
    /// On success the new snapshot is published. On failure `last_error` is
    /// set and the prior snapshot keeps serving; if there is none yet, a
    /// catalog-only snapshot is published so commands and applications stay
    /// searchable. A cancelled build changes nothing but the `building` flag.
    pub fn run_build(
        &self,
        builder: &IndexBuilder,
        settings: &SearchSettings,
        cancel: &CancelToken,
    ) -> BuildAttempt {
        self.set_building(true);
        let started = Instant::now();
        let result = builder.build(settings, cancel);

        let attempt = match result {
            Ok(snapshot) => {
                let duration_ms = snapshot.stats().duration_ms;
                self.publish(snapshot, None);
                let status = self.status.read();
                BuildAttempt::Published(RebuildOutcome::from_status(&status, true, duration_ms))
            }
            Err(QuickdexError::Cancelled) => {
                tracing::debug!("index build cancelled, nothing published");
                BuildAttempt::Cancelled
            }
            Err(e) => {
                tracing::warn!(error = %e, "index build failed");
                let message = e.to_string();
                let never_published = !self.status.read().ready;
                let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

                if never_published {
                    self.publish(builder.catalog_only(), Some(message));
                } else {
                    // timestamp and duration both describe the failed attempt
                    let mut status = self.status.write();
                    status.last_error = Some(message);
                    status.last_build_ms = Some(chrono::Utc::now().timestamp_millis());
                    status.last_duration_ms = Some(duration_ms);
                }
                let status = self.status.read();
                BuildAttempt::Failed(RebuildOutcome::from_status(&status, false, duration_ms))
            }
        };

        self.set_building(false);
        attempt
    }
}

impl Default for IndexState {
    fn default() -> Self {
        Self::new(crate::settings::model::DEFAULT_REFRESH_SECS)
    }
}
