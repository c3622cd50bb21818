//! Vessel risk handlers: fresh aggregation, latest record and history.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde_json::json;

use crate::api::error::{not_found, validation_error, ApiError, ErrorCode};
use crate::api::types::{HistoryQuery, HistoryResponse, RiskQuery, RiskResponse};
use crate::domain::{AggregateOutcome, DateRange, RiskRecord};
use crate::server::AppState;

/// Up to ten ASCII digits; the IMO check digit is not verified.
pub fn validate_imo(raw: &str) -> Result<String, ApiError> {
    let imo = raw.trim();
    if imo.is_empty() || imo.len() > 10 || !imo.chars().all(|c| c.is_ascii_digit()) {
        return Err(validation_error("imo", format!("Invalid IMO number: {raw:?}")));
    }
    Ok(imo.to_string())
}

/// GET /api/v1/vessels/:imo/risk
pub async fn assess_vessel(
    State(state): State<AppState>,
    Path(imo): Path<String>,
    Query(query): Query<RiskQuery>,
) -> Result<Json<RiskResponse>, ApiError> {
    let imo = validate_imo(&imo)?;
    let range = DateRange::from_optional(query.start_date.as_deref(), query.end_date.as_deref())
        .map_err(|e| validation_error("date_range", e))?;

    match state.pipeline.aggregate(&imo, range).await {
        AggregateOutcome::Completed {
            record,
            database_saved,
        } => Ok(Json(RiskResponse {
            record: *record,
            database_saved,
        })),
        AggregateOutcome::NoData {
            subject_id,
            date_range,
            reason,
        } => Err(ApiError::new(ErrorCode::NoPrimaryData, reason)
            .with_resource_id(subject_id)
            .with_details(json!({ "date_range": date_range }))),
    }
}

/// GET /api/v1/vessels/:imo/risk/latest
pub async fn latest_risk(
    State(state): State<AppState>,
    Path(imo): Path<String>,
) -> Result<Json<RiskRecord>, ApiError> {
    let imo = validate_imo(&imo)?;
    state
        .pipeline
        .store()
        .read_latest(&imo)
        .await?
        .map(Json)
        .ok_or_else(|| not_found("Risk record", &imo))
}

/// GET /api/v1/vessels/:imo/risk/history
pub async fn risk_history(
    State(state): State<AppState>,
    Path(imo): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let imo = validate_imo(&imo)?;
    let (page, page_size) = (query.page(), query.page_size());
    let records = state
        .pipeline
        .store()
        .read_history(&imo, page, page_size)
        .await?;

    Ok(Json(HistoryResponse {
        imo,
        page,
        page_size,
        records,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_imo() {
        assert_eq!(validate_imo(" 9569671 ").unwrap(), "9569671");
        assert!(validate_imo("").is_err());
        assert!(validate_imo("95696X1").is_err());
        assert!(validate_imo("12345678901").is_err());
    }
}
