//! Structured logging to a rotating file.
//!
//! Every layer of the crate logs through `tracing` macros and spans; this
//! module wires them to a `tracing-subscriber` fmt layer.
//!
//! ```text
//! tracing macros → EnvFilter → fmt layer → RollingFile (<data_dir>/quickdex.log)
//! ```
//!
//! Files rotate at 10 MiB and the three newest backups are kept.
//!
//! # Configuration
//!
//! The level is taken from:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `trace_level` in [`Config`](crate::Config)
//! 3. Default: `"info"`

mod file_writer;
mod init;

pub use file_writer::{RollingFile, RollingWriter, MAX_BACKUP_FILES, MAX_FILE_SIZE_BYTES};
pub use init::{init_tracing, LOG_FILE_NAME};
