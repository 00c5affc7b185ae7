//! Liveness probe for the catalog service.
//!
//! The catalog is unusable without PostgreSQL, so the report is `degraded`
//! whenever the pool cannot answer `SELECT 1`. The endpoint itself always
//! answers 200.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` when the tree store is reachable, otherwise `degraded`.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
}

impl HealthResponse {
    fn from_store(db_healthy: bool) -> Self {
        Self {
            status: if db_healthy { "ok" } else { "degraded" },
            version: env!("CARGO_PKG_VERSION"),
            db_healthy,
        }
    }
}

/// GET /health
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = match treeshop_db::health_check(&state.pool).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Tree store unreachable");
            false
        }
    };
    Json(HealthResponse::from_store(db_healthy))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
