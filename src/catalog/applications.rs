//! Installed-application catalog supplied by the host.
//!
//! Enumerating installed applications is OS-specific (Start Menu shortcuts,
//! `/Applications` bundles, `.desktop` files) and lives in the host's OS
//! integration layer. This module defines the seam the index builder calls
//! through, plus two small implementations.

use crate::domain::error::Result;
use crate::domain::{Action, Category, Icon, Item};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One installed application as reported by the OS integration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationEntry {
    pub name: String,
    /// Executable, bundle or shortcut path the host launches.
    pub path: PathBuf,
    /// Icon path or encoded image data, passed through untouched.
    #[serde(default)]
    pub icon: Option<String>,
    /// Platform tag (`"windows"`, `"macos"`, `"linux"`).
    pub platform: String,
}

impl ApplicationEntry {
    /// Creates an entry without an icon.
    ///
    /// # Parameters
    ///
    /// * `name` - Display name, used as the item title
    /// * `path` - Executable or bundle path; also the item's identity
    /// * `platform` - Platform tag the host reports
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, platform: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            icon: None,
            platform: platform.into(),
        }
    }

    /// Converts the entry into an `application` item.
    ///
    /// Returns `None` for entries without a usable name.
    #[must_use]
    pub fn to_item(&self) -> Option<Item> {
        let name = self.name.trim();
        if name.is_empty() {
            return None;
        }

        Some(Item {
            id: format!("app:{}", self.path.display()),
            title: name.to_string(),
            subtitle: self.path.display().to_string(),
            category: Category::Application,
            source: Some(self.platform.clone()),
            shortcut: None,
            icon: Icon::Application {
                source: self.icon.clone(),
            },
            action: Action::OpenApplication {
                path: self.path.clone(),
            },
        })
    }
}

/// Source of installed applications.
///
/// Called from the index worker thread once per build, concurrently with the
/// filesystem walk, so implementations must be `Send + Sync`.
pub trait ApplicationProvider: Send + Sync {
    /// Lists the currently installed applications.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read. The build logs it and
    /// continues without applications.
    fn applications(&self) -> Result<Vec<ApplicationEntry>>;
}

/// Provider for hosts without an OS integration layer.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoApplications;

impl ApplicationProvider for NoApplications {
    fn applications(&self) -> Result<Vec<ApplicationEntry>> {
        Ok(Vec::new())
    }
}

/// Provider backed by a list the host pushes in whenever its own scan finishes.
#[derive(Debug, Default)]
pub struct StaticApplications {
    entries: RwLock<Vec<ApplicationEntry>>,
}

impl StaticApplications {
    #[must_use]
    pub fn new(entries: Vec<ApplicationEntry>) -> Self {
        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Replaces the list; takes effect on the next build.
    pub fn replace(&self, entries: Vec<ApplicationEntry>) {
        *self.entries.write() = entries;
    }
}

impl ApplicationProvider for StaticApplications {
    fn applications(&self) -> Result<Vec<ApplicationEntry>> {
        Ok(self.entries.read().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ActionKind;

    #[test]
    fn entry_becomes_application_item() {
        let mut entry = ApplicationEntry::new("Visual Studio Code", "/usr/share/code/code", "linux");
        entry.icon = Some("/usr/share/pixmaps/code.png".to_string());

        let item = entry.to_item().unwrap();
        assert_eq!(item.id, "app:/usr/share/code/code");
        assert_eq!(item.category, Category::Application);
        assert_eq!(item.source.as_deref(), Some("linux"));
        assert_eq!(item.action.kind(), ActionKind::Application);
    }

    #[test]
    fn nameless_entries_are_dropped() {
        let entry = ApplicationEntry::new("  ", "/bin/true", "linux");
        assert!(entry.to_item().is_none());
    }

    #[test]
    fn static_provider_replaces_list() {
        let provider = StaticApplications::default();
        assert!(provider.applications().unwrap().is_empty());

        provider.replace(vec![ApplicationEntry::new("Calculator", "calc.exe", "windows")]);
        assert_eq!(provider.applications().unwrap().len(), 1);
    }
}
