use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

#[derive(Serialize)]
struct ReadyStatus {
    status: &'static str,
    storage: &'static str,
}

async fn healthz() -> &'static str {
    "ok"
}

async fn readyz(State(state): State<Arc<AppState>>) -> ApiResult<Json<ReadyStatus>> {
    let Some(pool) = state.pool.as_ref() else {
        return Ok(Json(ReadyStatus {
            status: "ready",
            storage: "memory",
        }));
    };

    ledgerfolio_storage_sqlite::health_check(pool)
        .map_err(|e| ApiError::Unavailable(format!("Store is not reachable: {}", e)))?;
    Ok(Json(ReadyStatus {
        status: "ready",
        storage: "sqlite",
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
}
