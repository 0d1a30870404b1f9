//! Effective locale resolution.

use super::aliases::AliasTable;

/// Locale used when neither a preference nor a usable host locale is available.
pub const DEFAULT_LOCALE: &str = "zh-CN";

/// Returns the host locale verbatim when it is present and non-blank, otherwise
/// [`DEFAULT_LOCALE`].
///
/// ```
/// use quickdex::locale::{resolve, DEFAULT_LOCALE};
///
/// assert_eq!(resolve(Some("en-US")), "en-US");
/// assert_eq!(resolve(Some("   ")), DEFAULT_LOCALE);
/// assert_eq!(resolve(None), DEFAULT_LOCALE);
/// ```
#[must_use]
pub fn resolve(host_locale: Option<&str>) -> String {
    match host_locale {
        Some(locale) if !locale.trim().is_empty() => locale.to_string(),
        _ => DEFAULT_LOCALE.to_string(),
    }
}

/// Primary language subtag of a locale tag, lowercased (`"en-US"` → `"en"`).
#[must_use]
pub fn language_of(locale: &str) -> String {
    locale
        .trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

/// Locale state consulted by the ranking path.
///
/// Holds an optional user preference, which wins over the host locale, and the
/// alias table of the built-in catalog.
#[derive(Debug, Clone)]
pub struct LocaleResolver {
    preferred: Option<String>,
    aliases: AliasTable,
}

impl Default for LocaleResolver {
    fn default() -> Self {
        Self::new(None)
    }
}

impl LocaleResolver {
    /// Creates a resolver over the built-in alias table.
    ///
    /// A blank preference is treated as absent.
    #[must_use]
    pub fn new(preferred: Option<String>) -> Self {
        Self {
            preferred: preferred.filter(|p| !p.trim().is_empty()),
            aliases: AliasTable::builtin(),
        }
    }

    #[must_use]
    pub fn with_aliases(mut self, aliases: AliasTable) -> Self {
        self.aliases = aliases;
        self
    }

    /// Preference → host → default.
    #[must_use]
    pub fn resolve(&self, host_locale: Option<&str>) -> String {
        self.preferred
            .clone()
            .unwrap_or_else(|| resolve(host_locale))
    }

    #[must_use]
    pub fn preferred(&self) -> Option<&str> {
        self.preferred.as_deref()
    }

    #[must_use]
    pub const fn aliases(&self) -> &AliasTable {
        &self.aliases
    }
}
