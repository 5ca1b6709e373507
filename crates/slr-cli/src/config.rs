//! Layered configuration: built-in defaults, then the TOML file, then `SLR_*`
//! environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

pub const DEFAULT_STORE_PATH: &str = "~/.local/share/slr/review.db";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CliConfig {
  /// SQLite file holding the review document.
  pub store_path: PathBuf,
}

impl CliConfig {
  /// Read `path` (optional) layered under the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .set_default("store_path", DEFAULT_STORE_PATH)
      .context("failed to set config defaults")?
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("SLR"))
      .build()
      .context("failed to read config file")?;

    settings
      .try_deserialize()
      .context("failed to deserialise CliConfig")
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use std::io::Write as _;

  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn missing_file_falls_back_to_default() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = CliConfig::load(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(cfg.store_path, PathBuf::from(DEFAULT_STORE_PATH));
  }

  #[test]
  fn file_overrides_default() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "store_path = \"/srv/review.db\"").unwrap();
    let cfg = CliConfig::load(file.path()).unwrap();
    assert_eq!(cfg.store_path, PathBuf::from("/srv/review.db"));
  }

  #[test]
  fn tilde_is_expanded_only_at_the_start() {
    let Ok(home) = std::env::var("HOME") else { return };
    assert_eq!(expand_tilde(Path::new("~/r.db")), PathBuf::from(home).join("r.db"));
    assert_eq!(expand_tilde(Path::new("/a/~/r.db")), PathBuf::from("/a/~/r.db"));
  }
}
