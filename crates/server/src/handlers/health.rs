use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use studypoint_common::VERSION;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
pub struct ReadyResponse {
    status: &'static str,
    store: &'static str,
    taxonomy_generation: u64,
}

/// Liveness probe. Always succeeds while the process is up.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "studypoint",
        version: VERSION,
    })
}

/// Readiness probe. Fails with 503 while the store is unreachable.
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    let generation = state.taxonomy.snapshot().await.generation();
    match state.store.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ReadyResponse {
                status: "ready",
                store: "up",
                taxonomy_generation: generation,
            }),
        ),
        Err(err) => {
            tracing::warn!(error = %err, "readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadyResponse {
                    status: "not ready",
                    store: "down",
                    taxonomy_generation: generation,
                }),
            )
        }
    }
}
