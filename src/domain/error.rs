//! Error types for the quickdex engine.
//!
//! This module defines the centralized error type [`QuickdexError`] and a type alias
//! [`Result`] used throughout the crate. Errors never cross the `search` boundary;
//! they surface through [`crate::index::IndexStatus::last_error`] or a degraded result.

use thiserror::Error;

/// The main error type for index, settings and configuration operations.
///
/// # Examples
///
/// ```
/// use quickdex::QuickdexError;
///
/// fn validate() -> Result<(), QuickdexError> {
///     Err(QuickdexError::Config("missing data_dir".to_string()))
/// }
/// assert!(validate().is_err());
/// ```
#[derive(Debug, Error)]
pub enum QuickdexError {
    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Reading or writing the persisted settings record failed.
    #[error("Settings error: {0}")]
    Settings(String),

    /// Engine bootstrap configuration is invalid or unreadable.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An index build failed as a whole (no root readable, internal fault).
    ///
    /// Per-entry scan errors never produce this variant; they are counted as
    /// skipped entries instead.
    #[error("Index build failed: {0}")]
    Build(String),

    /// The host application catalog could not be enumerated.
    #[error("Application catalog error: {0}")]
    Catalog(String),

    /// A build was superseded before it could publish a snapshot.
    #[error("Index build cancelled")]
    Cancelled,

    /// Communication with the background index worker failed.
    #[error("Worker error: {0}")]
    Worker(String),
}

/// A specialized `Result` type for quickdex operations.
pub type Result<T> = std::result::Result<T, QuickdexError>;
