//! Command-line front end.
//!
//! Builds the index once in the foreground and prints results as JSON lines,
//! one scored item per line:
//!
//! ```text
//! quickdex [--config FILE] [--locale TAG] [--limit N] QUERY...
//! quickdex --status
//! ```
//!
//! With `--rebuild` the build outcome is printed before the results.

#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use quickdex::catalog::NoApplications;
use quickdex::{initialize, observability, Config, QuickdexError};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "quickdex")]
#[command(about = "Search configured folders and built-in commands from the terminal")]
#[command(version)]
struct Cli {
    /// TOML config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Locale to rank with, e.g. en-US
    #[arg(short = 'L', long, value_name = "TAG")]
    locale: Option<String>,

    /// Maximum number of results
    #[arg(short = 'n', long, default_value_t = 20)]
    limit: i64,

    /// Print the index status instead of searching
    #[arg(long)]
    status: bool,

    /// Force a rebuild and print its outcome first
    #[arg(long)]
    rebuild: bool,

    /// Query words; joined with spaces
    query: Vec<String>,
}

fn run(cli: &Cli) -> quickdex::Result<()> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    observability::init_tracing(&config);
    tracing::info!(config = ?config, "quickdex cli starting");

    let mut engine = initialize(&config, Arc::new(NoApplications))?;
    engine.wait_until_idle()?;

    let mut out = std::io::stdout().lock();

    if cli.rebuild {
        emit(&mut out, &engine.rebuild()?)?;
    }

    if cli.status {
        emit(&mut out, &engine.index_status())?;
    } else {
        let query = cli.query.join(" ");
        let page = engine.search(&query, cli.locale.as_deref(), cli.limit);
        tracing::info!(index_version = page.index_version, hits = page.items.len(), "query served");
        for hit in &page.items {
            emit(&mut out, hit)?;
        }
    }

    engine.shutdown();
    Ok(())
}

/// Writes `value` as one JSON line.
fn emit<T: Serialize>(out: &mut impl Write, value: &T) -> quickdex::Result<()> {
    serde_json::to_writer(&mut *out, value).map_err(std::io::Error::from)?;
    writeln!(out)?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(QuickdexError::Config(message)) => {
            eprintln!("quickdex: {message}");
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("quickdex: {e}");
            ExitCode::FAILURE
        }
    }
}
