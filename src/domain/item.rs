//! Catalog item model.
//!
//! An [`Item`] is one searchable, actionable entry of the index. Items are built
//! once by the index builder (or the built-in catalog) and never mutated after
//! they land in a snapshot. The [`Action`] carried by an item is a descriptor for
//! the host; this crate never executes it.

use super::category::Category;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// What the host should do when the user picks an item.
///
/// Ranking only looks at the discriminant (see [`Action::kind`]); payloads are
/// opaque to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Action {
    OpenBuiltinRoute { route: String },
    OpenBuiltinTool { tool_id: String },
    OpenBuiltinWindow { window_label: String },
    OpenDirectory { path: PathBuf },
    OpenFile { path: PathBuf },
    OpenApplication { path: PathBuf },
}

/// Payload-free discriminant of an [`Action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    BuiltinRoute,
    BuiltinTool,
    BuiltinWindow,
    Directory,
    File,
    Application,
}

impl Action {
    #[must_use]
    pub const fn kind(&self) -> ActionKind {
        match self {
            Self::OpenBuiltinRoute { .. } => ActionKind::BuiltinRoute,
            Self::OpenBuiltinTool { .. } => ActionKind::BuiltinTool,
            Self::OpenBuiltinWindow { .. } => ActionKind::BuiltinWindow,
            Self::OpenDirectory { .. } => ActionKind::Directory,
            Self::OpenFile { .. } => ActionKind::File,
            Self::OpenApplication { .. } => ActionKind::Application,
        }
    }
}

/// Icon descriptor handed to the host for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Icon {
    /// Named glyph from the host's built-in icon set.
    Builtin { name: String },
    Folder,
    /// Generic file icon, keyed by lowercased extension when there is one.
    File {
        #[serde(skip_serializing_if = "Option::is_none")]
        extension: Option<String>,
    },
    /// Application icon as reported by the OS integration (path or encoded data).
    Application {
        #[serde(skip_serializing_if = "Option::is_none")]
        source: Option<String>,
    },
}

impl Icon {
    #[must_use]
    pub fn builtin(name: &str) -> Self {
        Self::Builtin {
            name: name.to_string(),
        }
    }

    /// File icon derived from the path's extension.
    #[must_use]
    pub fn for_file(path: &Path) -> Self {
        Self::File {
            extension: path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(str::to_ascii_lowercase),
        }
    }
}

/// A single catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique within a snapshot.
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub category: Category,
    /// Where the item came from (root name, platform, "builtin").
    pub source: Option<String>,
    /// Keyboard shortcut hint shown next to the item.
    pub shortcut: Option<String>,
    pub icon: Icon,
    pub action: Action,
}

impl Item {
    /// Directory entry found while walking a root.
    #[must_use]
    pub fn directory(path: &Path, source: Option<String>) -> Self {
        Self {
            id: format!("dir:{}", path.display()),
            title: display_name(path),
            subtitle: path.display().to_string(),
            category: Category::Directory,
            source,
            shortcut: None,
            icon: Icon::Folder,
            action: Action::OpenDirectory {
                path: path.to_path_buf(),
            },
        }
    }

    /// Regular file found while walking a root.
    #[must_use]
    pub fn file(path: &Path, source: Option<String>) -> Self {
        Self {
            id: format!("file:{}", path.display()),
            title: display_name(path),
            subtitle: path.display().to_string(),
            category: Category::File,
            source,
            shortcut: None,
            icon: Icon::for_file(path),
            action: Action::OpenFile {
                path: path.to_path_buf(),
            },
        }
    }

    /// Whether this is a built-in tool launcher (hidden on an empty query).
    #[must_use]
    pub fn is_builtin_tool(&self) -> bool {
        self.category == Category::Builtin && self.action.kind() == ActionKind::BuiltinTool
    }
}

/// Last path component, falling back to the whole path for roots like `/` or `C:\`.
fn display_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}
