//! `POST /imports/households`, body: a JSON array of import rows.

use std::sync::Arc;

use axum::{Json, extract::State};
use jamaat_core::{
  household::{ImportReport, ImportRow},
  store::GenealogyStore,
};

use crate::error::ApiError;

pub async fn households<S: GenealogyStore>(
  State(store): State<Arc<S>>,
  Json(rows): Json<Vec<ImportRow>>,
) -> Result<Json<ImportReport>, ApiError> {
  let report = store.import_households(rows).await.map_err(ApiError::store)?;
  Ok(Json(report))
}
