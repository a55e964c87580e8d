use std::sync::Arc;

use axum::{Json, extract::State};
use jamaat_core::{stats::GenealogyStats, store::GenealogyStore};

use crate::error::ApiError;

/// `GET /stats`
pub async fn handler<S: GenealogyStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<GenealogyStats>, ApiError> {
  let stats = store.statistics().await.map_err(ApiError::store)?;
  Ok(Json(stats))
}
