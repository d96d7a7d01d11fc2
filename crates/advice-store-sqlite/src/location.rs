//! Where the history database lives.
//!
//! The `DATABASE_URL` convention accepts `sqlite://path`, `sqlite:path`, a bare
//! filesystem path, or `:memory:`. Without a URL the store falls back to an
//! embedded `db.sqlite3` file.

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// File name used when no database URL is configured.
pub const DEFAULT_FILE: &str = "db.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
  Memory,
  File(PathBuf),
}

impl Location {
  /// Parse a database URL. Non-SQLite schemes are rejected.
  pub fn parse(url: &str) -> Result<Self> {
    let url = url.trim();
    let path = if let Some(rest) = url.strip_prefix("sqlite://") {
      rest
    } else if let Some(rest) = url.strip_prefix("sqlite:") {
      rest
    } else if url.contains("://") {
      return Err(Error::UnsupportedUrl(url.to_owned()));
    } else {
      url
    };

    match path {
      "" => Err(Error::UnsupportedUrl(url.to_owned())),
      ":memory:" => Ok(Self::Memory),
      path => Ok(Self::File(PathBuf::from(path))),
    }
  }

  /// The embedded default inside `base_dir`.
  pub fn default_file(base_dir: impl AsRef<Path>) -> Self {
    Self::File(base_dir.as_ref().join(DEFAULT_FILE))
  }

  /// Resolve an optional URL: missing or blank means the embedded default.
  pub fn resolve(url: Option<&str>, base_dir: impl AsRef<Path>) -> Result<Self> {
    match url.map(str::trim) {
      None | Some("") => Ok(Self::default_file(base_dir)),
      Some(url) => Self::parse(url),
    }
  }
}
