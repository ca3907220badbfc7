// handlers/public/system.rs - GET / and GET /health

use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::{json, Value};

use crate::state::AppState;

pub async fn root_get() -> Json<Value> {
    Json(json!({
        "name": "Cloud Notes API",
        "version": env!("CARGO_PKG_VERSION"),
        "message": "Welcome to Cloud Notes API. Visit /healthz to check status.",
        "endpoints": {
            "health": "/health, /healthz (public)",
            "login": "POST /login (public - token acquisition)",
            "notes": "/api/notes[/:id] (protected)",
            "whoami": "/api/whoami (protected)",
        }
    }))
}

/// Liveness plus a store round trip. 503 when the store can't be reached.
pub async fn health_get(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let now = chrono::Utc::now();

    match state.notes.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}
