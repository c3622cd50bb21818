//! Shared request and response types for REST API handlers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{EntitySanctionRow, RiskRecord};

/// Default and maximum page sizes for history listing.
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 200;

// ============================================================================
// Vessel risk types
// ============================================================================

/// Query window for a fresh aggregation. Missing bounds default to one
/// year back from today.
#[derive(Debug, Default, Deserialize)]
pub struct RiskQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Response for a completed aggregation.
#[derive(Debug, Serialize, Deserialize)]
pub struct RiskResponse {
    pub record: RiskRecord,
    pub database_saved: bool,
}

/// Pagination for history listing.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl HistoryQuery {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }
}

/// One page of a vessel's record history, newest first.
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub imo: String,
    pub page: u32,
    pub page_size: u32,
    pub records: Vec<RiskRecord>,
}

// ============================================================================
// Entity sanction types
// ============================================================================

/// Request body for entity sanction classification.
#[derive(Debug, Deserialize)]
pub struct EntitySanctionRequest {
    pub entity_id: String,
    #[serde(default)]
    pub rows: Vec<EntitySanctionRow>,
    /// Date the registration age is measured against; defaults to today.
    #[serde(default)]
    pub reference_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_query_clamps() {
        let q = HistoryQuery {
            page: Some(0),
            page_size: Some(10_000),
        };
        assert_eq!(q.page(), 1);
        assert_eq!(q.page_size(), MAX_PAGE_SIZE);
        assert_eq!(HistoryQuery::default().page_size(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_entity_request_defaults() {
        let req: EntitySanctionRequest =
            serde_json::from_str(r#"{"entity_id": "E1"}"#).unwrap();
        assert!(req.rows.is_empty());
        assert!(req.reference_date.is_none());
    }
}
