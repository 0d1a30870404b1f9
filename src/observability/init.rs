//! Tracing subscriber setup.

use super::file_writer::RollingFile;
use crate::Config;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log file name inside the data directory.
pub const LOG_FILE_NAME: &str = "quickdex.log";

/// Installs the global subscriber: an `EnvFilter` plus a plain-text fmt layer
/// writing to a rotating file in `config.data_dir`.
///
/// `RUST_LOG` wins over `config.trace_level`, which defaults to `"info"`.
/// Logging is optional: if the data directory cannot be created nothing is
/// installed. Safe to call more than once; only the first call takes effect.
///
/// ```
/// use quickdex::observability::init_tracing;
/// use quickdex::Config;
///
/// let dir = tempfile::tempdir().unwrap();
/// let config = Config {
///     data_dir: dir.path().to_path_buf(),
///     trace_level: Some("debug".to_string()),
///     ..Config::default()
/// };
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    if std::fs::create_dir_all(&config.data_dir).is_err() {
        return;
    }

    let level = config.trace_level.as_deref().unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let writer = RollingFile::new(config.data_dir.join(LOG_FILE_NAME));
    let layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_thread_names(true)
        .with_writer(writer);

    let _ = tracing_subscriber::registry().with(filter).with(layer).try_init();
}
