//! Visibility gating, ordering and truncation of a snapshot against a query.

use super::scoring::Scorer;
use crate::domain::{Category, Item};
use crate::index::IndexSnapshot;
use crate::locale::{AliasTable, LocaleResolver};
use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};
use std::sync::OnceLock;

/// Result page size when the caller passes a non-positive limit.
pub const DEFAULT_LIMIT: usize = 20;

/// Upper bound on a result page.
pub const MAX_LIMIT: usize = 200;

/// An item annotated with its query-scoped score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredItem {
    #[serde(flatten)]
    pub item: Item,
    pub score: i64,
    /// Character ranges of the title matched by the query.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub highlights: Vec<(usize, usize)>,
}

/// Maps a caller-supplied limit onto `1..=MAX_LIMIT`.
#[must_use]
pub fn effective_limit(limit: i64) -> usize {
    if limit <= 0 {
        DEFAULT_LIMIT
    } else {
        usize::try_from(limit).map_or(MAX_LIMIT, |l| l.min(MAX_LIMIT))
    }
}

/// Whether an item may appear for a blank query.
///
/// Browsing shows folders, applications and navigational built-ins; tool
/// launchers and plain files only show up once the user types.
fn visible_when_browsing(item: &Item) -> bool {
    match item.category {
        Category::Directory | Category::Application | Category::Action => true,
        Category::Builtin => !item.is_builtin_tool(),
        Category::File | Category::Other => false,
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    index: usize,
    score: i64,
    weight: i64,
    rank: u8,
}

impl Candidate {
    fn key(&self) -> (Reverse<i64>, Reverse<i64>, u8, usize) {
        (Reverse(self.weight), Reverse(self.score), self.rank, self.index)
    }
}

fn compare(a: &Candidate, b: &Candidate) -> Ordering {
    a.key().cmp(&b.key())
}

/// Lazily yields the ranked page of one query.
///
/// Items are cloned out of the snapshot (and highlighted) only as they are
/// pulled.
#[derive(Debug)]
pub struct SearchResults<'a> {
    snapshot: &'a IndexSnapshot,
    scorer: Scorer<'a>,
    ranked: std::vec::IntoIter<Candidate>,
}

impl SearchResults<'_> {
    /// Version of the snapshot every yielded item comes from.
    #[must_use]
    pub const fn snapshot_version(&self) -> u64 {
        self.snapshot.version()
    }
}

impl Iterator for SearchResults<'_> {
    type Item = ScoredItem;

    fn next(&mut self) -> Option<Self::Item> {
        let candidate = self.ranked.next()?;
        let item = self.snapshot.items().get(candidate.index)?.clone();
        let highlights = self.scorer.highlights(&item);
        Some(ScoredItem {
            item,
            score: candidate.score,
            highlights,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ranked.size_hint()
    }
}

impl ExactSizeIterator for SearchResults<'_> {}

/// Ranks snapshots using a locale resolver's alias table.
#[derive(Debug, Clone, Copy)]
pub struct Ranker<'a> {
    resolver: &'a LocaleResolver,
}

impl<'a> Ranker<'a> {
    #[must_use]
    pub const fn new(resolver: &'a LocaleResolver) -> Self {
        Self { resolver }
    }

    /// Scores, gates, orders and truncates `snapshot` for `query`.
    ///
    /// `host_locale` may be missing or blank; it is resolved through the
    /// ranker's resolver. Never fails: an empty snapshot yields no results.
    pub fn search(
        &self,
        snapshot: &'a IndexSnapshot,
        query: &str,
        host_locale: Option<&str>,
        limit: i64,
    ) -> SearchResults<'a> {
        let locale = self.resolver.resolve(host_locale);
        let aliases: &'a AliasTable = self.resolver.aliases();
        let scorer = Scorer::new(query, &locale, aliases);
        let limit = effective_limit(limit);

        let _span = tracing::debug_span!(
            "search",
            query_len = scorer.query().chars().count(),
            locale = %locale,
            limit,
            snapshot_version = snapshot.version()
        )
        .entered();

        let browsing = scorer.is_empty();
        let mut candidates: Vec<Candidate> = snapshot
            .items()
            .iter()
            .enumerate()
            .filter_map(|(index, item)| {
                let score = if browsing {
                    if !visible_when_browsing(item) {
                        return None;
                    }
                    0
                } else {
                    let score = scorer.score(item);
                    if score <= 0 {
                        return None;
                    }
                    score
                };
                Some(Candidate {
                    index,
                    score,
                    weight: item.category.weight(),
                    rank: item.category.rank(),
                })
            })
            .collect();

        let matched = candidates.len();
        if candidates.len() > limit {
            candidates.select_nth_unstable_by(limit - 1, compare);
            candidates.truncate(limit);
        }
        candidates.sort_unstable_by(compare);

        tracing::debug!(matched, returned = candidates.len(), "search ranked");

        SearchResults {
            snapshot,
            scorer,
            ranked: candidates.into_iter(),
        }
    }
}

fn default_resolver() -> &'static LocaleResolver {
    static RESOLVER: OnceLock<LocaleResolver> = OnceLock::new();
    RESOLVER.get_or_init(LocaleResolver::default)
}

/// Ranks `snapshot` for `query` with the built-in alias table and no locale preference.
///
/// ```
/// use quickdex::index::IndexSnapshot;
/// use quickdex::search::search;
///
/// let snapshot = IndexSnapshot::empty();
/// assert_eq!(search(&snapshot, "anything", None, 10).count(), 0);
/// ```
pub fn search<'a>(
    snapshot: &'a IndexSnapshot,
    query: &str,
    host_locale: Option<&str>,
    limit: i64,
) -> SearchResults<'a> {
    Ranker::new(default_resolver()).search(snapshot, query, host_locale, limit)
}
