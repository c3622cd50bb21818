//! Health, readiness and metrics handlers

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::infra::ComponentHealth;
use crate::server::AppState;

/// Response for the basic health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub service: &'static str,
    pub version: &'static str,
    pub timestamp: String,
}

/// Overall health status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl From<&ComponentHealth> for HealthStatus {
    fn from(health: &ComponentHealth) -> Self {
        match health {
            ComponentHealth::Healthy => HealthStatus::Healthy,
            ComponentHealth::Degraded { .. } => HealthStatus::Degraded,
            ComponentHealth::Unhealthy { .. } => HealthStatus::Unhealthy,
        }
    }
}

/// Basic health check endpoint.
///
/// Performs no deep checks. Use this for liveness probes.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: HealthStatus::Healthy,
        service: "vessel-risk-engine",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Readiness check endpoint.
///
/// Checks database connectivity when a database is configured.
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let Some(database) = state.database.as_ref() else {
        return Ok(Json(serde_json::json!({
            "status": "ready",
            "database": "not_configured",
        })));
    };

    let start = std::time::Instant::now();
    let health = database.check_health().await;
    match &health {
        ComponentHealth::Unhealthy { reason } => Err((
            StatusCode::SERVICE_UNAVAILABLE,
            format!("Database unavailable: {}", reason),
        )),
        _ => Ok(Json(serde_json::json!({
            "status": "ready",
            "database": {
                "status": HealthStatus::from(&health),
                "response_time_ms": start.elapsed().as_millis() as u64,
            },
        }))),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct MetricsQuery {
    pub format: Option<String>,
}

/// Metrics endpoint. JSON by default, `?format=prometheus` for text.
pub async fn metrics(State(state): State<AppState>, Query(query): Query<MetricsQuery>) -> Response {
    match query.format.as_deref() {
        Some("prometheus") => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            state.metrics.to_prometheus().await,
        )
            .into_response(),
        _ => Json(state.metrics.to_json().await).into_response(),
    }
}
