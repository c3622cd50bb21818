//! Entity sanction classification handler.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use chrono::Utc;

use crate::api::error::{missing_field, ApiError, ErrorCode};
use crate::api::types::EntitySanctionRequest;
use crate::domain::EntitySanctionRecord;
use crate::server::AppState;

/// POST /api/v1/entities/sanctions
pub async fn classify_entity(
    State(state): State<AppState>,
    payload: Result<Json<EntitySanctionRequest>, JsonRejection>,
) -> Result<Json<EntitySanctionRecord>, ApiError> {
    let Json(request) =
        payload.map_err(|e| ApiError::new(ErrorCode::InvalidRequestBody, e.body_text()))?;

    let entity_id = request.entity_id.trim();
    if entity_id.is_empty() {
        return Err(missing_field("entity_id"));
    }

    let reference_date = request
        .reference_date
        .unwrap_or_else(|| Utc::now().date_naive());

    let record = state
        .pipeline
        .classify_entity(entity_id, &request.rows, reference_date)
        .await;
    Ok(Json(record))
}
