//! Per-item match scoring.
//!
//! Scores are tiered so that a stronger kind of match always beats a weaker
//! one, whatever the item:
//!
//! ```text
//! exact title          1000
//! title prefix          800
//! title substring       600
//! title tokens          500   every query token occurs in the title
//! subtitle substring    400
//! alias                 300..=400   builtin items only, see below
//! fuzzy title           1..=200     skim subsequence match
//! ```
//!
//! Alias hits are graded by kind (exact, substring, tokens) and by whether the
//! alias language equals the resolved locale's language; the best alias hit is
//! worth exactly a subtitle match, never more.

use crate::domain::{Category, Item};
use crate::locale::{language_of, AliasHit, AliasMatch, AliasTable};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

pub const SCORE_EXACT_TITLE: i64 = 1000;
pub const SCORE_TITLE_PREFIX: i64 = 800;
pub const SCORE_TITLE_CONTAINS: i64 = 600;
pub const SCORE_TITLE_TOKENS: i64 = 500;
pub const SCORE_SUBTITLE_CONTAINS: i64 = 400;
pub const SCORE_ALIAS_MAX: i64 = SCORE_SUBTITLE_CONTAINS;
pub const SCORE_FUZZY_MAX: i64 = 200;

/// Title-only score of `query` against `title`, 0 when they do not match.
///
/// Case-insensitive. An exact match always scores higher than a title that
/// merely contains the query.
///
/// ```
/// use quickdex::search::match_score;
///
/// assert!(match_score("Base64 编解码", "base64 编解码") > match_score("Base64 编解码", "base64"));
/// assert_eq!(match_score("Base64", "zzz"), 0);
/// ```
#[must_use]
pub fn match_score(title: &str, query: &str) -> i64 {
    let query = normalize(query);
    if query.is_empty() {
        return 0;
    }
    let tokens = tokenize(&query);
    direct_title_score(&title.to_lowercase(), &query, &tokens)
        .unwrap_or_else(|| fuzzy_score(&SkimMatcherV2::default().ignore_case(), title, &query))
}

/// Trimmed, lowercased query.
#[must_use]
pub fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}

fn tokenize(query: &str) -> Vec<String> {
    query.split_whitespace().map(String::from).collect()
}

fn direct_title_score(title: &str, query: &str, tokens: &[String]) -> Option<i64> {
    if title == query {
        Some(SCORE_EXACT_TITLE)
    } else if title.starts_with(query) {
        Some(SCORE_TITLE_PREFIX)
    } else if title.contains(query) {
        Some(SCORE_TITLE_CONTAINS)
    } else if tokens.len() > 1 && tokens.iter().all(|t| title.contains(t.as_str())) {
        Some(SCORE_TITLE_TOKENS)
    } else {
        None
    }
}

fn fuzzy_score(matcher: &SkimMatcherV2, title: &str, query: &str) -> i64 {
    matcher
        .fuzzy_match(title, query)
        .map_or(0, |raw| raw.clamp(0, SCORE_FUZZY_MAX - 1) + 1)
}

const fn alias_score(hit: AliasHit) -> i64 {
    let base = match hit.kind {
        AliasMatch::Exact => SCORE_ALIAS_MAX,
        AliasMatch::Contains => SCORE_ALIAS_MAX - 40,
        AliasMatch::Tokens => SCORE_ALIAS_MAX - 80,
    };
    if hit.in_locale {
        base
    } else {
        base - 20
    }
}

/// Scores items of one snapshot against one query.
pub struct Scorer<'a> {
    query: String,
    tokens: Vec<String>,
    language: String,
    aliases: &'a AliasTable,
    fuzzy: SkimMatcherV2,
}

impl std::fmt::Debug for Scorer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scorer")
            .field("query", &self.query)
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

impl<'a> Scorer<'a> {
    /// `locale` must already be resolved.
    #[must_use]
    pub fn new(query: &str, locale: &str, aliases: &'a AliasTable) -> Self {
        let query = normalize(query);
        Self {
            tokens: tokenize(&query),
            query,
            language: language_of(locale),
            aliases,
            fuzzy: SkimMatcherV2::default().ignore_case(),
        }
    }

    /// Whether the query is blank (browse mode).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Match score of `item`, 0 when it does not match at all.
    #[must_use]
    pub fn score(&self, item: &Item) -> i64 {
        if self.is_empty() {
            return 0;
        }

        if let Some(score) = direct_title_score(&item.title.to_lowercase(), &self.query, &self.tokens) {
            return score;
        }

        if item.subtitle.to_lowercase().contains(&self.query) {
            return SCORE_SUBTITLE_CONTAINS;
        }

        if item.category == Category::Builtin {
            if let Some(hit) = self.aliases.best_hit(&item.id, &self.query, &self.language) {
                return alias_score(hit);
            }
        }

        fuzzy_score(&self.fuzzy, &item.title, &self.query)
    }

    /// Character ranges of `item.title` that produced its score, end exclusive.
    ///
    /// Follows the same tiers as [`Scorer::score`]: substring and token hits
    /// mark the matched text, a fuzzy hit marks its subsequence, and a hit on
    /// the subtitle or an alias marks nothing in the title.
    #[must_use]
    pub fn highlights(&self, item: &Item) -> Vec<(usize, usize)> {
        if self.is_empty() {
            return Vec::new();
        }

        let title = item.title.to_lowercase();
        if direct_title_score(&title, &self.query, &self.tokens).is_some() {
            let needles = if title.contains(&self.query) {
                std::slice::from_ref(&self.query)
            } else {
                self.tokens.as_slice()
            };
            return substring_ranges(&title, needles);
        }

        let subtitle_hit = item.subtitle.to_lowercase().contains(&self.query);
        let alias_hit = item.category == Category::Builtin
            && self
                .aliases
                .best_hit(&item.id, &self.query, &self.language)
                .is_some();
        if subtitle_hit || alias_hit {
            return Vec::new();
        }

        self.fuzzy
            .fuzzy_indices(&item.title, &self.query)
            .map_or_else(Vec::new, |(_, indices)| coalesce(&indices))
    }
}

/// Character ranges of the first occurrence of each needle in `haystack`.
fn substring_ranges(haystack: &str, needles: &[String]) -> Vec<(usize, usize)> {
    let mut indices: Vec<usize> = needles
        .iter()
        .filter_map(|needle| {
            let byte_start = haystack.find(needle.as_str())?;
            let start = haystack[..byte_start].chars().count();
            Some(start..start + needle.chars().count())
        })
        .flatten()
        .collect();
    indices.sort_unstable();
    indices.dedup();
    coalesce(&indices)
}

/// Turns sorted indices into contiguous `(start, end)` runs.
fn coalesce(indices: &[usize]) -> Vec<(usize, usize)> {
    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for &idx in indices {
        match ranges.last_mut() {
            Some((_, end)) if *end == idx => *end = idx + 1,
            _ => ranges.push((idx, idx + 1)),
        }
    }
    ranges
}
