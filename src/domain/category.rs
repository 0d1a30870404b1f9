//! Item categories and the static weight/rank policy.
//!
//! Two independent orderings live here:
//!
//! - [`Category::weight`] is the dominant sort key of a result list (higher wins).
//!   Explicit commands outrank applications, which outrank filesystem entries.
//! - [`Category::rank`] only breaks ties that weight and match score leave open
//!   (lower wins).
//!
//! Both are pure lookups over a closed set.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of a catalog entry.
///
/// Unknown category names parse to [`Category::Other`] instead of failing, so a
/// newer host can hand older engines items they do not understand yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Builtin,
    Application,
    Directory,
    File,
    Action,
    #[serde(other)]
    Other,
}

impl Category {
    /// Primary sort key, higher wins.
    #[must_use]
    pub const fn weight(self) -> i64 {
        match self {
            Self::Builtin => 500,
            Self::Action => 450,
            Self::Application => 400,
            Self::Directory => 300,
            Self::File => 200,
            Self::Other => 0,
        }
    }

    /// Tie-break ordering, lower wins.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Builtin => 0,
            Self::Application => 1,
            Self::Directory => 2,
            Self::File => 3,
            Self::Action => 4,
            Self::Other => u8::MAX,
        }
    }

    /// Parses a category name, mapping anything unrecognized to `Other`.
    ///
    /// ```
    /// use quickdex::Category;
    ///
    /// assert_eq!(Category::parse("Directory"), Category::Directory);
    /// assert_eq!(Category::parse("plugin"), Category::Other);
    /// ```
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "builtin" => Self::Builtin,
            "application" | "app" => Self::Application,
            "directory" | "folder" => Self::Directory,
            "file" => Self::File,
            "action" => Self::Action,
            _ => Self::Other,
        }
    }

    /// Wire name, matching the serde representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Builtin => "builtin",
            Self::Application => "application",
            Self::Directory => "directory",
            Self::File => "file",
            Self::Action => "action",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Category; 6] = [
        Category::Builtin,
        Category::Application,
        Category::Directory,
        Category::File,
        Category::Action,
        Category::Other,
    ];

    #[test]
    fn weight_puts_commands_above_filesystem() {
        assert!(Category::Builtin.weight() > Category::Directory.weight());
        assert!(Category::Directory.weight() > Category::File.weight());
    }

    #[test]
    fn rank_orders_application_directory_file() {
        assert!(Category::Application.rank() < Category::Directory.rank());
        assert!(Category::Directory.rank() < Category::File.rank());
    }

    #[test]
    fn other_is_lowest_on_both_axes() {
        for category in ALL.iter().copied().filter(|c| *c != Category::Other) {
            assert!(category.weight() > Category::Other.weight(), "{category}");
            assert!(category.rank() < Category::Other.rank(), "{category}");
        }
    }

    #[test]
    fn lookups_are_stable() {
        for category in ALL {
            assert_eq!(category.weight(), category.weight());
            assert_eq!(category.rank(), category.rank());
            assert_eq!(Category::parse(category.as_str()), category);
        }
    }

    #[test]
    fn unknown_names_deserialize_to_other() {
        let parsed: Category = serde_json::from_str("\"widget\"").unwrap();
        assert_eq!(parsed, Category::Other);
        assert_eq!(Category::parse("  "), Category::Other);
    }
}
