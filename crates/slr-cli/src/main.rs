//! `slr` — command-line front end for a systematic literature review.
//!
//! # Usage
//!
//! ```text
//! slr study add "Tutoring with LLMs" --authors "Smith, J." --year 2023
//! slr screen <id> include
//! slr report bibtex --out included.bib
//! slr --store ./review.db export
//! ```
//!
//! The review lives in a SQLite file (`store_path` in `slr.toml`, the
//! `SLR_STORE_PATH` environment variable, or `--store`). Logs go to stderr;
//! set `RUST_LOG` to change the level.

mod commands;
mod config;
mod render;

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use slr_core::ReviewStore;
use slr_store_sqlite::SqliteStorage;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::{
  commands::Command,
  config::{CliConfig, expand_tilde},
};

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "slr", author, version, about = "Systematic literature review manager")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "slr.toml")]
  config: PathBuf,

  /// SQLite file holding the review; overrides the configured path.
  #[arg(long, value_name = "PATH")]
  store: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  let cfg = CliConfig::load(&cli.config)?;
  let store_path = expand_tilde(&cli.store.unwrap_or(cfg.store_path));

  let storage = SqliteStorage::open(&store_path)
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  let mut store = ReviewStore::open(storage);

  commands::run(&mut store, cli.command)
}

#[cfg(test)]
mod tests {
  use clap::CommandFactory as _;

  use super::*;

  #[test]
  fn cli_definition_is_consistent() { Cli::command().debug_assert(); }

  #[test]
  fn store_flag_comes_before_the_subcommand() {
    let cli = Cli::try_parse_from(["slr", "--store", "/tmp/r.db", "screen", "abc", "include"]).unwrap();
    assert_eq!(cli.store, Some(PathBuf::from("/tmp/r.db")));
    assert!(matches!(cli.command, Command::Screen { .. }));
  }

  #[test]
  fn unknown_verdict_is_rejected_by_the_parser() {
    assert!(Cli::try_parse_from(["slr", "screen", "abc", "accept"]).is_err());
  }
}
