//! JSON API for the advice-lineage Prisoner's Dilemma.
//!
//! Exposes an axum [`Router`] backed by any
//! [`advice_core::store::HistoryStore`]. The router owns the registry of live
//! sessions; TLS, auth, and serving are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", advice_api::api_router(state))
//! ```

pub mod error;
pub mod history;
pub mod pages;
pub mod sessions;
pub mod state;

use advice_core::store::HistoryStore;
use axum::{
  Router,
  routing::{get, post},
};

pub use error::ApiError;
pub use state::{ApiState, SessionRegistry};

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: HistoryStore + 'static,
{
  Router::new()
    // Bootstrap
    .route("/sessions", post(sessions::create::<S>))
    .route("/sessions/{session_id}", get(sessions::get_one::<S>))
    // Pages
    .route(
      "/sessions/{session_id}/players/{participant_id}/choice",
      get(pages::choice::<S>).post(pages::submit::<S>),
    )
    .route(
      "/sessions/{session_id}/players/{participant_id}/result",
      get(pages::result::<S>),
    )
    // History
    .route("/history/{session_id}", get(history::by_session::<S>))
    .with_state(state)
}
