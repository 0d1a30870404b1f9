//! Index layer: building, publishing and describing catalog snapshots.
//!
//! # Modules
//!
//! - `builder`: bounded filesystem walk merged with built-in and application items
//! - `cancel`: cooperative cancellation token for superseded builds
//! - `exclude`: glob-based exclude patterns
//! - `snapshot`: immutable [`IndexSnapshot`], [`IndexStatus`], [`RebuildOutcome`]
//! - `state`: the atomically swapped serving snapshot plus its status record

pub mod builder;
pub mod cancel;
pub mod exclude;
pub mod snapshot;
pub mod state;

pub use builder::IndexBuilder;
pub use cancel::CancelToken;
pub use exclude::ExcludeMatcher;
pub use snapshot::{BuildStats, IndexSnapshot, IndexStatus, RebuildOutcome};
pub use state::{BuildAttempt, IndexState};
