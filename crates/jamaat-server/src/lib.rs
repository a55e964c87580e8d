//! HTTP server wiring for the Jamaat genealogy API.

use std::{path::PathBuf, sync::Arc};

use axum::Router;
use jamaat_core::{household::InferencePolicy, store::GenealogyStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `JAMAAT_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  pub store_path: PathBuf,
  #[serde(default)]
  pub inference:  InferencePolicy,
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 8080 }

// ─── Router ──────────────────────────────────────────────────────────────────

/// The full application: the genealogy API under `/genealogy`, with request
/// tracing.
pub fn router<S>(store: Arc<S>) -> Router
where
  S: GenealogyStore + 'static,
{
  Router::new()
    .nest("/genealogy", jamaat_api::api_router(store))
    .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use jamaat_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  use super::*;

  #[tokio::test]
  async fn api_is_mounted_under_genealogy() {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let app = router(Arc::new(store));

    let req = Request::get("/genealogy/stats").body(Body::empty()).unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let req = Request::get("/stats").body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[test]
  fn config_defaults() {
    let cfg: ServerConfig = config::Config::builder()
      .set_override("store_path", "jamaat.db")
      .unwrap()
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap();
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.inference, InferencePolicy::default());
  }
}
