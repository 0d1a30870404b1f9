//! Exclude-pattern matching for the filesystem walk.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::Path;

/// Compiled exclude patterns.
///
/// A pattern excludes an entry when it matches either the entry's file name
/// (`node_modules`, `*.tmp`, `.*`) or its path relative to the walked root
/// (`build/cache/**`, `**/cache/*.o`). The root's own location never takes
/// part in matching, so `.*` excludes `proj/.git` without excluding
/// everything under `./proj` or `~/.config/proj`.
/// Invalid patterns are dropped with a warning rather than failing the build.
#[derive(Debug, Clone)]
pub struct ExcludeMatcher {
    set: GlobSet,
}

impl ExcludeMatcher {
    /// Compiles `patterns`, case-insensitively on Windows.
    ///
    /// # Parameters
    ///
    /// * `patterns` - Glob patterns; invalid ones are logged and skipped
    #[must_use]
    pub fn new(patterns: &[String]) -> Self {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            match GlobBuilder::new(pattern)
                .case_insensitive(cfg!(windows))
                .build()
            {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(e) => {
                    tracing::warn!(pattern = %pattern, error = %e, "ignoring invalid exclude pattern");
                }
            }
        }

        let set = builder.build().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to compile exclude patterns, excluding nothing");
            GlobSet::empty()
        });
        Self { set }
    }

    /// Whether `path`, found while walking `root`, should be skipped.
    ///
    /// # Parameters
    ///
    /// * `root` - The root being walked, exactly as handed to the walker
    /// * `path` - An entry below `root`
    ///
    /// # Returns
    ///
    /// `true` if the entry's name or its root-relative path matches a pattern.
    /// The root itself is never excluded.
    #[must_use]
    pub fn is_excluded(&self, root: &Path, path: &Path) -> bool {
        if self.set.is_empty() {
            return false;
        }
        let Ok(relative) = path.strip_prefix(root) else {
            return false;
        };
        if relative.as_os_str().is_empty() {
            return false;
        }
        relative
            .file_name()
            .is_some_and(|name| self.set.is_match(Path::new(name)))
            || self.set.is_match(relative)
    }
}
