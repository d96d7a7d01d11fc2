//! HTTP host for the advice-lineage Prisoner's Dilemma.
//!
//! Wires configuration, the random source, and request tracing around the
//! [`advice_api`] router.

use std::path::Path;

use advice_api::ApiState;
use advice_core::store::HistoryStore;
use axum::Router;
use rand::{SeedableRng, rngs::StdRng};
use rand_core::OsRng;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and the
/// environment.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:                String,
  #[serde(default = "default_port")]
  pub port:                u16,
  /// SQLite URL or path; `None` means `db.sqlite3` in the working directory.
  #[serde(default)]
  pub database_url:        Option<String>,
  /// Ancestor session for bootstrap requests that do not name one.
  #[serde(default)]
  pub ancestor_session_id: i64,
  /// Fixes role shuffles and ancestor draws, for reproducible sessions.
  #[serde(default)]
  pub rng_seed:            Option<u64>,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8000 }

/// Layer the optional TOML file, `ADVICE_*` variables, and finally
/// `database_url` (the value of `DATABASE_URL`, if set).
pub fn load_config(
  path: &Path,
  database_url: Option<String>,
) -> Result<ServerConfig, config::ConfigError> {
  config::Config::builder()
    .add_source(config::File::from(path).required(false))
    .add_source(config::Environment::with_prefix("ADVICE").try_parsing(true))
    .set_override_option("database_url", database_url)?
    .build()?
    .try_deserialize()
}

/// Seeded when asked, otherwise from the operating system.
pub fn make_rng(seed: Option<u64>) -> Result<StdRng, rand_core::Error> {
  match seed {
    Some(seed) => Ok(StdRng::seed_from_u64(seed)),
    None => StdRng::from_rng(OsRng),
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The API under `/api`, with per-request tracing.
pub fn router<S>(state: ApiState<S>) -> Router
where
  S: HistoryStore + 'static,
{
  Router::new()
    .nest("/api", advice_api::api_router(state))
    .layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────
