//! Core types and logic for the advice-lineage Prisoner's Dilemma.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement [`store::HistoryStore`]; hosts drive the
//! [`flow`] state machine through a [`session::LiveSession`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod ancestry;
pub mod bootstrap;
pub mod error;
pub mod flow;
pub mod payoff;
pub mod record;
pub mod roles;
pub mod session;
pub mod store;

pub use error::{Error, Result};
