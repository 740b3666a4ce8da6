use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use service::AppState;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct HealthStatus {
    status: String,
    /// Event streams currently open.
    active_streams: usize,
    /// Distinct subjects those streams listen on.
    subjects: Vec<String>,
}

/// GET liveness and the number of open event streams
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Gateway is up and responding to requests", body = HealthStatus),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn health_check(State(app_state): State<AppState>) -> impl IntoResponse {
    let manager = &app_state.sse_manager;
    let health = HealthStatus {
        status: "healthy".to_string(),
        active_streams: manager.active_sessions(),
        subjects: manager.subjects(),
    };

    (StatusCode::OK, Json(health))
}
