use super::WaitlistState;
use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    postgres_connected: bool,
    uptime_seconds: u64,
}

pub async fn health_check(State(state): State<Arc<WaitlistState>>) -> Json<HealthResponse> {
    let postgres_connected = state.store.ping().await;

    Json(HealthResponse {
        status: if postgres_connected {
            "healthy".to_string()
        } else {
            "degraded".to_string()
        },
        postgres_connected,
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}
