//! REST API routes for the vessel risk engine.

use axum::routing::{get, post};
use axum::Router;

use crate::api::handlers::{assess_vessel, classify_entity, latest_risk, risk_history};
use crate::server::AppState;

/// Build the `/api` router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/vessels/:imo/risk", get(assess_vessel))
        .route("/v1/vessels/:imo/risk/latest", get(latest_risk))
        .route("/v1/vessels/:imo/risk/history", get(risk_history))
        .route("/v1/entities/sanctions", post(classify_entity))
}
