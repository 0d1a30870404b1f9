//! Platform path helpers: data directory, home expansion, default scan roots.

use std::path::{Path, PathBuf};

/// Directory name under the platform data directory.
const APP_DIR_NAME: &str = "quickdex";

/// Home subdirectories indexed when the user has not configured any roots.
const DEFAULT_ROOT_NAMES: &[&str] = &["Desktop", "Documents", "Downloads"];

/// Returns the data directory for settings and logs.
///
/// `~/.local/share/quickdex` on Linux, `~/Library/Application Support/quickdex`
/// on macOS, `%APPDATA%\quickdex` on Windows. Falls back to the system temp
/// directory when the platform reports no data directory.
#[must_use]
pub fn get_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading `~`, and all paths when no home directory is known,
/// are returned unchanged.
///
/// ```
/// use quickdex::infrastructure::expand_tilde;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(expand_tilde(Path::new("/srv/data")), PathBuf::from("/srv/data"));
/// ```
#[must_use]
pub fn expand_tilde(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    dirs::home_dir().map_or_else(|| path.to_path_buf(), |home| home.join(rest))
}

/// Anchors a relative path at the current working directory.
///
/// Absolute paths, and all paths when the working directory is unknown, are
/// returned unchanged. No filesystem access beyond reading the working
/// directory; `..` components are kept as written.
#[must_use]
pub fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
}

/// Existing well-known home subdirectories, or the home directory itself.
#[must_use]
pub fn default_roots() -> Vec<PathBuf> {
    let Some(home) = dirs::home_dir() else {
        return Vec::new();
    };

    let roots: Vec<PathBuf> = DEFAULT_ROOT_NAMES
        .iter()
        .map(|name| home.join(name))
        .filter(|path| path.is_dir())
        .collect();

    if roots.is_empty() {
        vec![home]
    } else {
        roots
    }
}

/// Short label for a scan root, used as the `source` of its items.
#[must_use]
pub fn root_label(root: &Path) -> String {
    root.file_name().map_or_else(
        || root.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tilde_expands_to_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde(Path::new("~/Documents")), home.join("Documents"));
            assert_eq!(expand_tilde(Path::new("~")), home);
        }
    }

    #[test]
    fn non_tilde_paths_are_untouched() {
        assert_eq!(expand_tilde(Path::new("/tmp/x")), PathBuf::from("/tmp/x"));
        assert_eq!(expand_tilde(Path::new("a/~b")), PathBuf::from("a/~b"));
    }

    #[test]
    fn relative_paths_are_anchored_at_cwd() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(absolutize(Path::new("proj")), cwd.join("proj"));
        assert_eq!(absolutize(Path::new("/srv/x")), PathBuf::from("/srv/x"));
    }

    #[test]
    fn data_dir_is_app_specific() {
        assert!(get_data_dir().ends_with(APP_DIR_NAME));
    }

    #[test]
    fn root_label_uses_last_component() {
        assert_eq!(root_label(Path::new("/home/me/Documents")), "Documents");
        assert_eq!(root_label(Path::new("/")), "/");
    }
}
