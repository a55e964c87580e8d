//! Handlers for `/persons` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/persons` | All persons |
//! | `POST` | `/persons` | Body: [`NewPerson`]; returns 201 + stored person |
//! | `GET`  | `/persons/:id` | 404 if not found |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use jamaat_core::{
  person::{NewPerson, Person},
  store::GenealogyStore,
};
use uuid::Uuid;

use crate::error::ApiError;

/// `GET /persons`
pub async fn list<S: GenealogyStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Person>>, ApiError> {
  let persons = store.list_persons().await.map_err(ApiError::store)?;
  Ok(Json(persons))
}

/// `POST /persons`
pub async fn create<S: GenealogyStore>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewPerson>,
) -> Result<impl IntoResponse, ApiError> {
  if body.first_name.trim().is_empty() {
    return Err(ApiError::BadRequest("first_name must not be blank".into()));
  }
  let person = store.add_person(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(person)))
}

/// `GET /persons/:id`
pub async fn get_one<S: GenealogyStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Person>, ApiError> {
  let person = store
    .get_person(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("person {id} not found")))?;
  Ok(Json(person))
}
