//! JSON REST API for the Jamaat genealogy graph.
//!
//! Exposes an axum [`Router`] backed by any
//! [`jamaat_core::store::GenealogyStore`]. Auth, TLS, and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/genealogy", jamaat_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod graph;
pub mod imports;
pub mod persons;
pub mod relationships;
pub mod stats;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post},
};
use jamaat_core::store::GenealogyStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: GenealogyStore + 'static,
{
  Router::new()
    // Persons
    .route("/persons", get(persons::list::<S>).post(persons::create::<S>))
    .route("/persons/{id}", get(persons::get_one::<S>))
    // Relationships
    .route(
      "/persons/{id}/relationships",
      get(relationships::list::<S>).post(relationships::create::<S>),
    )
    .route("/relationships/{handle}", delete(relationships::delete::<S>))
    // Graphs
    .route("/persons/{id}/graph", get(graph::ego::<S>))
    .route("/graph/complete", get(graph::complete::<S>))
    // Import
    .route("/imports/households", post(imports::households::<S>))
    // Statistics
    .route("/stats", get(stats::handler::<S>))
    .with_state(store)
}

// ─── Integration tests ───────────────────────────────────────────────────────
