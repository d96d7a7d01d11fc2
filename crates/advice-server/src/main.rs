//! advice-server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! history store named by `DATABASE_URL` (falling back to `db.sqlite3`), and
//! serves the experiment API over HTTP.

use std::{path::PathBuf, sync::Arc};

use advice_api::ApiState;
use advice_server::{load_config, make_rng};
use advice_store_sqlite::{Location, SqliteStore};
use anyhow::Context as _;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Prisoner's Dilemma with ancestor advice")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the stored history of one session as JSON and exit.
  #[arg(long, value_name = "SESSION_ID")]
  dump_history: Option<i64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let server_cfg = load_config(&cli.config, std::env::var("DATABASE_URL").ok())
    .context("failed to load configuration")?;

  // Open SQLite store.
  let base_dir = std::env::current_dir().context("no working directory")?;
  let location = Location::resolve(server_cfg.database_url.as_deref(), &base_dir)
    .context("invalid database url")?;
  tracing::info!(?location, "opening history store");
  let store = SqliteStore::open_location(&location)
    .await
    .with_context(|| format!("failed to open store at {location:?}"))?;

  // Helper mode: print one session's history and exit.
  if let Some(session_id) = cli.dump_history {
    use advice_core::store::HistoryStore as _;
    let records = store
      .fetch_by_session(session_id)
      .await
      .with_context(|| format!("failed to read history of session {session_id}"))?;
    println!("{}", serde_json::to_string_pretty(&records)?);
    return Ok(());
  }

  // Build application state.
  let rng = make_rng(server_cfg.rng_seed).context("failed to seed rng")?;
  let state = ApiState::new(Arc::new(store), rng)
    .with_default_ancestor_session(server_cfg.ancestor_session_id);

  let app = advice_server::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!(
    default_ancestor_session_id = server_cfg.ancestor_session_id,
    "Listening on http://{address}"
  );
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
