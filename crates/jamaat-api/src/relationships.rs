//! Handlers for relationship endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/persons/:id/relationships` | Parents, spouses and children |
//! | `POST`   | `/persons/:id/relationships` | Body: [`AddBody`]; returns 201 |
//! | `DELETE` | `/relationships/:handle` | `edge:<n>` or `family:<id>`; returns 204 |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use jamaat_core::{
  genealogy::FamilyId,
  relationship::{Relationship, RelationshipHandle, RelationshipKind},
  store::GenealogyStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

/// `GET /persons/:id/relationships`
pub async fn list<S: GenealogyStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<Relationship>>, ApiError> {
  let relationships = store.list_relationships(id).await.map_err(ApiError::store)?;
  Ok(Json(relationships))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddBody {
  pub related_person_id: Uuid,
  /// `FATHER`, `MOTHER`, `SPOUSE` or `CHILD`, case-insensitive.
  pub relationship_type: String,
  /// Which of the person's unions receives a `CHILD`.
  pub family_id:         Option<String>,
}

/// `POST /persons/:id/relationships`
pub async fn create<S: GenealogyStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<AddBody>,
) -> Result<impl IntoResponse, ApiError> {
  let kind = RelationshipKind::parse(&body.relationship_type).map_err(ApiError::store)?;
  let family = body
    .family_id
    .as_deref()
    .map(FamilyId::parse)
    .transpose()
    .map_err(ApiError::store)?;

  let relationship = store
    .add_relationship(id, body.related_person_id, kind, family)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(relationship)))
}

/// `DELETE /relationships/:handle`
///
/// A handle that cannot name any relationship is reported as not found.
pub async fn delete<S: GenealogyStore>(
  State(store): State<Arc<S>>,
  Path(raw): Path<String>,
) -> Result<StatusCode, ApiError> {
  let handle: RelationshipHandle = raw
    .parse()
    .map_err(|_| ApiError::NotFound(format!("relationship {raw:?} not found")))?;
  store.remove_relationship(handle).await.map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}
