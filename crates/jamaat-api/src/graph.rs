//! Handlers for graph endpoints.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use jamaat_core::{graph::GenealogyGraph, store::GenealogyStore};
use uuid::Uuid;

use crate::error::ApiError;

/// `GET /persons/:id/graph`
pub async fn ego<S: GenealogyStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<GenealogyGraph>, ApiError> {
  let graph = store.ego_graph(id).await.map_err(ApiError::store)?;
  Ok(Json(graph))
}

/// `GET /graph/complete`
pub async fn complete<S: GenealogyStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<GenealogyGraph>, ApiError> {
  let graph = store.complete_graph().await.map_err(ApiError::store)?;
  Ok(Json(graph))
}
