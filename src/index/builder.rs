//! Index builder: filesystem walk plus catalog merge.
//!
//! A build walks every configured root with `walkdir`, bounded by
//! `max_scan_depth`, `max_items_per_root` and `max_total_items`, pruning
//! excluded entries before descending into them. The host application catalog
//! is enumerated on a scoped thread while the walk runs. Built-in items come
//! first in the resulting snapshot, then applications, then filesystem entries;
//! that order is the final tie-break of the ranking.
//!
//! Per-entry failures (permission denied, entries vanishing mid-walk, I/O
//! faults) are counted and skipped. The build fails as a whole only when roots
//! are configured but none of them can be read, or when it is cancelled.

use super::cancel::CancelToken;
use super::exclude::ExcludeMatcher;
use super::snapshot::{BuildStats, IndexSnapshot};
use crate::catalog::{builtin, ApplicationProvider};
use crate::domain::error::{QuickdexError, Result};
use crate::domain::Item;
use crate::infrastructure::root_label;
use crate::settings::SearchSettings;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use walkdir::WalkDir;

/// Filesystem portion of a build.
#[derive(Debug, Default)]
struct WalkOutput {
    items: Vec<Item>,
    indexed_roots: usize,
    truncated: bool,
    skipped: usize,
}

/// Builds snapshots from settings, the built-in catalog and the host's applications.
#[derive(Clone)]
pub struct IndexBuilder {
    applications: Arc<dyn ApplicationProvider>,
}

impl std::fmt::Debug for IndexBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexBuilder").finish_non_exhaustive()
    }
}

impl IndexBuilder {
    /// Creates a builder that merges the host's applications into every build.
    ///
    /// # Parameters
    ///
    /// * `applications` - Source of installed applications, queried once per build
    #[must_use]
    pub fn new(applications: Arc<dyn ApplicationProvider>) -> Self {
        Self { applications }
    }

    /// Runs a full build.
    ///
    /// # Parameters
    ///
    /// * `settings` - Roots, excludes and caps; expected to be normalized
    /// * `cancel` - Polled between entries
    ///
    /// # Returns
    ///
    /// An unpublished snapshot (version 0).
    ///
    /// # Errors
    ///
    /// - [`QuickdexError::Cancelled`] if `cancel` fired during the build
    /// - [`QuickdexError::Build`] if roots are configured but none is readable
    pub fn build(&self, settings: &SearchSettings, cancel: &CancelToken) -> Result<IndexSnapshot> {
        let _span = tracing::info_span!(
            "index_build",
            roots = settings.roots.len(),
            max_depth = settings.max_scan_depth,
            per_root = settings.max_items_per_root,
            total = settings.max_total_items
        )
        .entered();

        let started = Instant::now();
        let excludes = ExcludeMatcher::new(&settings.exclude_patterns);

        let (walk, applications) = std::thread::scope(|scope| {
            let apps = scope.spawn(|| self.application_items());
            let walk = walk_roots(settings, &excludes, cancel);
            let applications = apps.join().unwrap_or_else(|_| {
                tracing::warn!("application enumeration panicked, continuing without applications");
                Vec::new()
            });
            (walk, applications)
        });
        let walk = walk?;

        if cancel.is_cancelled() {
            return Err(QuickdexError::Cancelled);
        }

        if !settings.roots.is_empty() && walk.indexed_roots == 0 {
            return Err(QuickdexError::Build(format!(
                "none of the {} configured roots is readable",
                settings.roots.len()
            )));
        }

        let items = merge(builtin::items(), applications, walk.items);
        let stats = BuildStats {
            indexed_roots: walk.indexed_roots,
            duration_ms: elapsed_ms(started),
            truncated: walk.truncated,
            skipped_entries: walk.skipped,
            built_at_ms: chrono::Utc::now().timestamp_millis(),
        };

        tracing::info!(
            items = items.len(),
            indexed_roots = stats.indexed_roots,
            truncated = stats.truncated,
            skipped = stats.skipped_entries,
            duration_ms = stats.duration_ms,
            "index build finished"
        );

        Ok(IndexSnapshot::new(items, stats))
    }

    /// Snapshot of the non-filesystem catalog only.
    ///
    /// Published when the very first build fails, so queries still find
    /// commands and applications.
    #[must_use]
    pub fn catalog_only(&self) -> IndexSnapshot {
        let started = Instant::now();
        let items = merge(builtin::items(), self.application_items(), Vec::new());
        let stats = BuildStats {
            duration_ms: elapsed_ms(started),
            built_at_ms: chrono::Utc::now().timestamp_millis(),
            ..BuildStats::default()
        };
        IndexSnapshot::new(items, stats)
    }

    fn application_items(&self) -> Vec<Item> {
        match self.applications.applications() {
            Ok(entries) => {
                tracing::debug!(count = entries.len(), "application catalog loaded");
                entries.iter().filter_map(|entry| entry.to_item()).collect()
            }
            Err(e) => {
                tracing::warn!(error = %e, "application catalog unavailable");
                Vec::new()
            }
        }
    }
}

/// Concatenates item groups in priority order, keeping the first item per id.
fn merge(builtins: Vec<Item>, applications: Vec<Item>, filesystem: Vec<Item>) -> Vec<Item> {
    let mut seen = HashSet::new();
    builtins
        .into_iter()
        .chain(applications)
        .chain(filesystem)
        .filter(|item| seen.insert(item.id.clone()))
        .collect()
}

fn walk_roots(
    settings: &SearchSettings,
    excludes: &ExcludeMatcher,
    cancel: &CancelToken,
) -> Result<WalkOutput> {
    let mut out = WalkOutput::default();
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let max_depth = usize::try_from(settings.max_scan_depth).unwrap_or(usize::MAX);

    for root in &settings.roots {
        if cancel.is_cancelled() {
            return Err(QuickdexError::Cancelled);
        }
        if let Err(e) = check_root(root) {
            tracing::warn!(root = ?root, error = %e, "skipping unreadable root");
            out.skipped += 1;
            continue;
        }
        out.indexed_roots += 1;

        let _span = tracing::debug_span!("walk_root", root = ?root).entered();
        let label = root_label(root);
        let mut per_root = 0usize;

        let walker = WalkDir::new(root)
            .follow_links(false)
            .max_depth(max_depth)
            .into_iter()
            .filter_entry(|entry| !excludes.is_excluded(root, entry.path()));

        for entry in walker {
            if cancel.is_cancelled() {
                return Err(QuickdexError::Cancelled);
            }

            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::trace!(error = %e, "skipping unreadable entry");
                    out.skipped += 1;
                    continue;
                }
            };

            let path = entry.path();
            if seen.contains(path) {
                continue;
            }

            let file_type = entry.file_type();
            if !file_type.is_dir() && !file_type.is_file() {
                continue;
            }

            // caps apply only to a new, indexable entry
            if per_root >= settings.max_items_per_root {
                tracing::debug!(per_root, "per-root cap reached");
                out.truncated = true;
                break;
            }
            if out.items.len() >= settings.max_total_items {
                tracing::debug!(total = out.items.len(), "global cap reached");
                out.truncated = true;
                return Ok(out);
            }

            let item = if file_type.is_dir() {
                Item::directory(path, Some(label.clone()))
            } else {
                Item::file(path, Some(label.clone()))
            };
            seen.insert(path.to_path_buf());
            out.items.push(item);
            per_root += 1;
        }

        tracing::debug!(items = per_root, "root walked");
    }

    Ok(out)
}

/// A root is usable when it is a directory we can list.
fn check_root(root: &Path) -> std::io::Result<()> {
    let metadata = std::fs::metadata(root)?;
    if !metadata.is_dir() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "not a directory",
        ));
    }
    std::fs::read_dir(root).map(drop)
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ApplicationEntry, NoApplications, StaticApplications};
    use crate::domain::Category;
    use std::fs;

    fn settings(roots: Vec<PathBuf>) -> SearchSettings {
        SearchSettings {
            roots,
            exclude_patterns: Vec::new(),
            max_scan_depth: 4,
            max_items_per_root: 1_000,
            max_total_items: 10_000,
            refresh_interval_secs: 600,
        }
    }

    fn builder() -> IndexBuilder {
        IndexBuilder::new(Arc::new(NoApplications))
    }

    fn tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("docs/reports")).unwrap();
        fs::create_dir_all(dir.path().join("node_modules/pkg")).unwrap();
        fs::write(dir.path().join("docs/plan.md"), "x").unwrap();
        fs::write(dir.path().join("docs/reports/q1.xlsx"), "x").unwrap();
        fs::write(dir.path().join("node_modules/pkg/index.js"), "x").unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        dir
    }

    fn filesystem_items(snapshot: &IndexSnapshot) -> Vec<&Item> {
        snapshot
            .items()
            .iter()
            .filter(|i| matches!(i.category, Category::Directory | Category::File))
            .collect()
    }

    #[test]
    fn walks_directories_and_files() {
        let dir = tree();
        let snapshot = builder()
            .build(&settings(vec![dir.path().to_path_buf()]), &CancelToken::new())
            .unwrap();

        let fs_items = filesystem_items(&snapshot);
        // root, docs, docs/reports, node_modules, node_modules/pkg + 4 files
        assert_eq!(fs_items.len(), 9);
        assert_eq!(snapshot.indexed_roots(), 1);
        assert!(!snapshot.truncated());

        let plan = snapshot
            .get(&format!("file:{}", dir.path().join("docs/plan.md").display()))
            .unwrap();
        assert_eq!(plan.category, Category::File);
        assert_eq!(plan.title, "plan.md");
    }

    #[test]
    fn excluded_directories_are_pruned() {
        let dir = tree();
        let mut s = settings(vec![dir.path().to_path_buf()]);
        s.exclude_patterns = vec!["node_modules".to_string(), "*.xlsx".to_string()];

        let snapshot = builder().build(&s, &CancelToken::new()).unwrap();
        assert!(snapshot
            .items()
            .iter()
            .all(|i| !i.subtitle.contains("node_modules") && !i.title.ends_with(".xlsx")));
    }

    #[test]
    fn depth_limit_applies() {
        let dir = tree();
        let mut s = settings(vec![dir.path().to_path_buf()]);
        s.max_scan_depth = 1;

        let snapshot = builder().build(&s, &CancelToken::new()).unwrap();
        // root + docs + node_modules + notes.txt
        assert_eq!(filesystem_items(&snapshot).len(), 4);
    }

    #[test]
    fn per_root_cap_truncates() {
        let dir = tree();
        let mut s = settings(vec![dir.path().to_path_buf()]);
        s.max_items_per_root = 3;

        let snapshot = builder().build(&s, &CancelToken::new()).unwrap();
        assert!(snapshot.truncated());
        assert_eq!(filesystem_items(&snapshot).len(), 3);
    }

    #[test]
    fn global_cap_spans_roots() {
        let a = tree();
        let b = tree();
        let mut s = settings(vec![a.path().to_path_buf(), b.path().to_path_buf()]);
        s.max_total_items = 5;

        let snapshot = builder().build(&s, &CancelToken::new()).unwrap();
        assert!(snapshot.truncated());
        assert_eq!(filesystem_items(&snapshot).len(), 5);
    }

    #[test]
    fn exact_fit_is_not_truncated() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("only.txt"), "x").unwrap();
        let mut s = settings(vec![dir.path().to_path_buf()]);
        s.max_items_per_root = 2;

        let snapshot = builder().build(&s, &CancelToken::new()).unwrap();
        assert!(!snapshot.truncated());
        assert_eq!(filesystem_items(&snapshot).len(), 2);
    }

    #[test]
    fn covered_root_after_exact_cap_is_not_truncated() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("docs/a.txt"), "x").unwrap();
        let mut s = settings(vec![dir.path().to_path_buf(), dir.path().join("docs")]);
        // root, docs, docs/a.txt
        s.max_total_items = 3;

        let snapshot = builder().build(&s, &CancelToken::new()).unwrap();
        assert_eq!(filesystem_items(&snapshot).len(), 3);
        assert!(!snapshot.truncated());
    }

    #[test]
    fn unreadable_root_after_exact_cap_is_not_truncated() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "x").unwrap();
        let mut s = settings(vec![dir.path().to_path_buf(), dir.path().join("missing")]);
        s.max_total_items = 2;

        let snapshot = builder().build(&s, &CancelToken::new()).unwrap();
        assert_eq!(filesystem_items(&snapshot).len(), 2);
        assert!(!snapshot.truncated());
        assert_eq!(snapshot.stats().skipped_entries, 1);
    }

    #[test]
    fn relative_root_with_default_excludes() {
        // created under the working directory so the root path stays relative
        let dir = tempfile::tempdir_in(".").unwrap();
        assert!(dir.path().is_relative());
        fs::create_dir_all(dir.path().join("docs")).unwrap();
        fs::create_dir_all(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join("docs/plan.md"), "x").unwrap();

        let s = SearchSettings {
            roots: vec![dir.path().to_path_buf()],
            ..SearchSettings::default()
        };
        let snapshot = builder().build(&s, &CancelToken::new()).unwrap();

        let mut titles: Vec<_> = filesystem_items(&snapshot)
            .iter()
            .map(|i| i.title.clone())
            .collect();
        titles.sort();
        let root_name = dir.path().file_name().unwrap().to_string_lossy().to_string();
        let mut expected = vec![root_name, "docs".to_string(), "plan.md".to_string()];
        expected.sort();
        assert_eq!(titles, expected);
    }

    #[test]
    fn overlapping_roots_index_paths_once() {
        let dir = tree();
        let s = settings(vec![dir.path().to_path_buf(), dir.path().join("docs")]);

        let snapshot = builder().build(&s, &CancelToken::new()).unwrap();
        let ids: HashSet<_> = snapshot.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids.len(), snapshot.len());
        assert_eq!(snapshot.indexed_roots(), 2);
    }

    #[test]
    fn missing_roots_are_skipped_but_one_readable_root_suffices() {
        let dir = tree();
        let s = settings(vec![dir.path().join("missing"), dir.path().to_path_buf()]);

        let snapshot = builder().build(&s, &CancelToken::new()).unwrap();
        assert_eq!(snapshot.indexed_roots(), 1);
        assert_eq!(snapshot.stats().skipped_entries, 1);
    }

    #[test]
    fn no_readable_root_fails_the_build() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();
        let s = settings(vec![dir.path().join("missing"), file]);

        let err = builder().build(&s, &CancelToken::new()).unwrap_err();
        assert!(matches!(err, QuickdexError::Build(_)));
    }

    #[test]
    fn no_roots_yields_catalog_only() {
        let snapshot = builder().build(&settings(Vec::new()), &CancelToken::new()).unwrap();
        assert_eq!(snapshot.len(), builtin::DEFINITIONS.len());
        assert_eq!(snapshot.indexed_roots(), 0);
    }

    #[test]
    fn cancelled_build_returns_cancelled() {
        let dir = tree();
        let token = CancelToken::new();
        token.cancel();

        let err = builder()
            .build(&settings(vec![dir.path().to_path_buf()]), &token)
            .unwrap_err();
        assert!(matches!(err, QuickdexError::Cancelled));
    }

    #[test]
    fn applications_are_merged_after_builtins() {
        let apps = StaticApplications::new(vec![
            ApplicationEntry::new("Terminal", "/usr/bin/terminal", "linux"),
            ApplicationEntry::new("Terminal again", "/usr/bin/terminal", "linux"),
        ]);
        let builder = IndexBuilder::new(Arc::new(apps));

        let snapshot = builder.build(&settings(Vec::new()), &CancelToken::new()).unwrap();
        let first_app = snapshot
            .items()
            .iter()
            .position(|i| i.category == Category::Application)
            .unwrap();
        assert_eq!(first_app, builtin::DEFINITIONS.len());
        assert_eq!(snapshot.len(), builtin::DEFINITIONS.len() + 1);
        assert_eq!(snapshot.items()[first_app].title, "Terminal");
    }
}
