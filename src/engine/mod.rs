//! The in-process engine handle hosts call.
//!
//! [`SearchEngine`] owns the serving index, the settings record with its
//! store, the locale resolver and the background worker. Every operation is
//! safe to call from any thread; `search` and `index_status` never wait on a
//! build.

use crate::catalog::ApplicationProvider;
use crate::domain::error::Result;
use crate::index::{IndexBuilder, IndexSnapshot, IndexState, IndexStatus, RebuildOutcome};
use crate::locale::LocaleResolver;
use crate::search::{Ranker, ScoredItem};
use crate::settings::{SearchSettings, SearchSettingsUpdate, SettingsChange, SettingsStore};
use crate::worker::IndexWorker;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One page of search results, all from the same snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    pub index_version: u64,
    pub items: Vec<ScoredItem>,
}

pub struct SearchEngine {
    state: Arc<IndexState>,
    settings: RwLock<SearchSettings>,
    store: Mutex<Box<dyn SettingsStore>>,
    resolver: LocaleResolver,
    worker: IndexWorker,
}

impl std::fmt::Debug for SearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEngine")
            .field("settings", &*self.settings.read())
            .field("resolver", &self.resolver.preferred())
            .finish_non_exhaustive()
    }
}

impl SearchEngine {
    /// Loads settings from `store`, then starts the worker with a startup build.
    ///
    /// An unreadable settings record is logged and replaced by defaults so
    /// the launcher still comes up.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker thread cannot be started.
    pub fn start(
        store: Box<dyn SettingsStore>,
        applications: Arc<dyn ApplicationProvider>,
        resolver: LocaleResolver,
    ) -> Result<Self> {
        let _span = tracing::info_span!("engine_start").entered();

        let settings = match store.load() {
            Ok(Some(settings)) => settings,
            Ok(None) => SearchSettings::default(),
            Err(e) => {
                tracing::warn!(error = %e, "settings unreadable, using defaults");
                SearchSettings::default()
            }
        }
        .normalized();

        tracing::info!(
            roots = settings.roots.len(),
            max_scan_depth = settings.max_scan_depth,
            refresh_interval_secs = settings.refresh_interval_secs,
            "starting search engine"
        );

        let state = Arc::new(IndexState::new(settings.refresh_interval_secs));
        let worker = IndexWorker::spawn(
            Arc::clone(&state),
            IndexBuilder::new(applications),
            settings.clone(),
        )?;

        Ok(Self {
            state,
            settings: RwLock::new(settings),
            store: Mutex::new(store),
            resolver,
            worker,
        })
    }

    /// Ranks the current snapshot for `query`.
    ///
    /// Never fails and never waits for a build; before the first build
    /// finishes the page is empty.
    #[must_use]
    pub fn search(&self, query: &str, host_locale: Option<&str>, limit: i64) -> SearchPage {
        let snapshot = self.state.snapshot();
        let results = Ranker::new(&self.resolver).search(&snapshot, query, host_locale, limit);
        SearchPage {
            index_version: results.snapshot_version(),
            items: results.collect(),
        }
    }

    #[must_use]
    pub fn index_status(&self) -> IndexStatus {
        self.state.status()
    }

    /// The serving snapshot, for callers that run several queries against one version.
    #[must_use]
    pub fn snapshot(&self) -> Arc<IndexSnapshot> {
        self.state.snapshot()
    }

    #[must_use]
    pub const fn resolver(&self) -> &LocaleResolver {
        &self.resolver
    }

    /// Rebuilds the index and waits for the result.
    ///
    /// Calls made while a build is running share the next build.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine is shutting down.
    pub fn rebuild(&self) -> Result<RebuildOutcome> {
        let _span = tracing::debug_span!("engine_rebuild").entered();
        self.worker.rebuild()
    }

    /// Blocks until all builds requested so far have finished.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine is shutting down.
    pub fn wait_until_idle(&self) -> Result<()> {
        self.worker.wait_idle()
    }

    #[must_use]
    pub fn settings(&self) -> SearchSettings {
        self.settings.read().clone()
    }

    /// Applies a partial settings update, persists it and reindexes if needed.
    ///
    /// Returns what changed. Updates that leave the normalized record as it
    /// was are not persisted and trigger nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be persisted; the in-memory
    /// settings then stay as they were.
    pub fn update_settings(&self, update: SearchSettingsUpdate) -> Result<SettingsChange> {
        let _span = tracing::debug_span!("update_settings").entered();

        let mut store = self.store.lock();
        let mut next = self.settings.read().clone();
        let change = next.apply(update);
        if change == SettingsChange::Unchanged {
            tracing::debug!("settings unchanged");
            return Ok(change);
        }

        store.save(&next)?;
        *self.settings.write() = next.clone();
        self.state.set_refresh_interval(next.refresh_interval_secs);
        self.worker.apply_settings(next, change);

        tracing::info!(change = ?change, "settings updated");
        Ok(change)
    }

    /// Stops the worker. Also runs on drop.
    pub fn shutdown(&mut self) {
        self.worker.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::NoApplications;
    use crate::settings::MemorySettingsStore;
    use std::path::PathBuf;

    fn engine(roots: Vec<PathBuf>) -> SearchEngine {
        let settings = SearchSettings {
            roots,
            exclude_patterns: Vec::new(),
            ..SearchSettings::default()
        };
        SearchEngine::start(
            Box::new(MemorySettingsStore::new(Some(settings))),
            Arc::new(NoApplications),
            LocaleResolver::default(),
        )
        .unwrap()
    }

    #[test]
    fn search_sees_startup_build() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("invoices")).unwrap();
        let engine = engine(vec![dir.path().to_path_buf()]);
        engine.wait_until_idle().unwrap();

        let page = engine.search("invoices", None, 10);
        assert_eq!(page.index_version, engine.index_status().index_version);
        assert_eq!(page.items[0].item.title, "invoices");
    }

    #[test]
    fn unchanged_update_triggers_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(vec![dir.path().to_path_buf()]);
        engine.wait_until_idle().unwrap();
        let version = engine.index_status().index_version;

        let change = engine
            .update_settings(SearchSettingsUpdate {
                max_scan_depth: Some(engine.settings().max_scan_depth),
                ..SearchSettingsUpdate::default()
            })
            .unwrap();
        assert_eq!(change, SettingsChange::Unchanged);
        engine.wait_until_idle().unwrap();
        assert_eq!(engine.index_status().index_version, version);
    }

    #[test]
    fn refresh_only_update_updates_status() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(vec![dir.path().to_path_buf()]);
        engine.wait_until_idle().unwrap();

        let change = engine
            .update_settings(SearchSettingsUpdate {
                refresh_interval_secs: Some(3_600),
                ..SearchSettingsUpdate::default()
            })
            .unwrap();
        assert_eq!(change, SettingsChange::RefreshOnly);
        assert_eq!(engine.index_status().refresh_interval_secs, 3_600);
        assert_eq!(engine.settings().refresh_interval_secs, 3_600);
    }

    #[test]
    fn rebuild_after_shutdown_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = engine(vec![dir.path().to_path_buf()]);
        engine.shutdown();
        assert!(engine.rebuild().is_err());
    }
}
