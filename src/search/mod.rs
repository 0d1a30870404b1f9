//! Query-time side of the index: scoring and ranking over a snapshot.
//!
//! Searching never touches the filesystem and never blocks on a build in
//! progress; it reads whichever [`IndexSnapshot`](crate::index::IndexSnapshot)
//! the caller hands it.

pub mod ranking;
pub mod scoring;

pub use ranking::{effective_limit, search, Ranker, ScoredItem, SearchResults, DEFAULT_LIMIT, MAX_LIMIT};
pub use scoring::{match_score, Scorer};
