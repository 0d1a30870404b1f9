//! Per-item alias phrases for cross-language matching.

use crate::catalog::builtin;
use std::collections::HashMap;

/// One alternate phrasing of a built-in item, tagged with its language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    /// Primary language subtag (`"en"`, `"zh"`).
    pub lang: String,
    /// Stored lowercased and trimmed.
    pub phrase: String,
}

/// How a query hit an alias, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AliasMatch {
    /// Every whitespace-separated query token occurs in the alias.
    Tokens,
    /// The whole query occurs inside the alias.
    Contains,
    /// The query equals the alias.
    Exact,
}

/// Best alias hit for an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct AliasHit {
    pub kind: AliasMatch,
    /// Alias language equals the resolved locale's language.
    pub in_locale: bool,
}

/// Alias phrases keyed by item id.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: HashMap<String, Vec<Alias>>,
}

impl AliasTable {
    /// Alias table of the static built-in catalog.
    #[must_use]
    pub fn builtin() -> Self {
        let mut table = Self::default();
        for def in builtin::DEFINITIONS {
            for (lang, phrase) in def.aliases {
                table.insert(def.id, lang, phrase);
            }
        }
        table
    }

    /// Adds an alias; blank phrases are ignored.
    pub fn insert(&mut self, id: &str, lang: &str, phrase: &str) {
        let phrase = phrase.trim().to_lowercase();
        if phrase.is_empty() {
            return;
        }
        self.entries.entry(id.to_string()).or_default().push(Alias {
            lang: lang.trim().to_ascii_lowercase(),
            phrase,
        });
    }

    #[must_use]
    pub fn aliases_for(&self, id: &str) -> &[Alias] {
        self.entries.get(id).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Strongest alias hit of `id` for an already trimmed, lowercased query.
    ///
    /// `language` is the primary subtag of the resolved locale.
    #[must_use]
    pub fn best_hit(&self, id: &str, query: &str, language: &str) -> Option<AliasHit> {
        if query.is_empty() {
            return None;
        }

        self.aliases_for(id)
            .iter()
            .filter_map(|alias| {
                let kind = if alias.phrase == query {
                    AliasMatch::Exact
                } else if alias.phrase.contains(query) {
                    AliasMatch::Contains
                } else if query
                    .split_whitespace()
                    .all(|token| alias.phrase.contains(token))
                {
                    AliasMatch::Tokens
                } else {
                    return None;
                };
                Some(AliasHit {
                    kind,
                    in_locale: alias.lang == language,
                })
            })
            .max()
    }
}
