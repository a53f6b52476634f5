use super::models::{HealthCheck, ServiceInfo};
use crate::common::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use utoipa_axum::{router::OpenApiRouter, routes};

pub fn router(state: &AppState) -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(healthz))
        .routes(routes!(get_service_info))
        .with_state(state.clone())
}

#[utoipa::path(
    get,
    path = "/healthz",
    responses(
        (status = OK, description = "Service and database are reachable", body = HealthCheck),
        (status = INTERNAL_SERVER_ERROR, description = "Database ping failed", body = HealthCheck)
    ),
    tag = "health"
)]
pub async fn healthz(State(state): State<AppState>) -> (StatusCode, Json<HealthCheck>) {
    if state.db.ping().await.is_err() {
        tracing::warn!("Health check failed: database ping error");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(HealthCheck {
                status: "error".to_string(),
            }),
        );
    }

    (
        StatusCode::OK,
        Json(HealthCheck {
            status: "ok".to_string(),
        }),
    )
}

#[utoipa::path(
    get,
    path = "/api/config",
    responses(
        (status = OK, description = "Service name, deployment and version", body = ServiceInfo)
    ),
    tag = "health"
)]
pub async fn get_service_info(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo::from_config(&state.config))
}
