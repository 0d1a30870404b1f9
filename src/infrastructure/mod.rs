//! Infrastructure layer for filesystem and environment interactions.
//!
//! Platform-specific locations (data directory, home directory, default scan
//! roots) are resolved here so the rest of the crate deals in plain paths.

pub mod paths;

pub use paths::{absolutize, default_roots, expand_tilde, get_data_dir, root_label};
