//! The persisted risk record and the pipeline outcome.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AggregateVerdict, Category, RiskLevel, Source};

/// Why a provider contributed nothing to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderErrorKind {
    /// Network failure, timeout, 429 or 5xx after retries.
    Unavailable,
    /// 401 or 403.
    Auth,
    /// Body was not a JSON document.
    Malformed,
}

/// Error note attached to a record when one fetch failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderErrorNote {
    pub source: Source,
    /// Endpoint or lookup that failed (e.g. `vesselsanctions_v2`).
    pub operation: String,
    pub kind: ProviderErrorKind,
    pub message: String,
    /// Categories that resolved to none because of this failure.
    pub affected: Vec<Category>,
}

/// Coverage summary: which sources knew about the vessel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VesselStatus {
    pub provider_a_found: bool,
    pub watch_list_listed: bool,
    pub provider_b_found: bool,
}

/// One row of the vessel watch list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchListEntry {
    pub imo: String,
    pub vessel_name: Option<String>,
    pub date_added: Option<String>,
    pub current_flag: Option<String>,
    pub former_flags: Option<String>,
}

/// Human-readable text attached to a `(risk type, level)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionEntry {
    pub description: String,
    pub info: String,
}

/// Identity of the queried vessel, taken from the primary voyage fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectIdentity {
    pub imo: String,
    pub name: Option<String>,
    pub vessel_type: Option<String>,
    pub flag: Option<String>,
}

impl SubjectIdentity {
    /// Name for display and storage, `Vessel_{imo}` when unknown.
    pub fn display_name(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Vessel_{}", self.imo),
        }
    }
}

/// The persisted unit. Created fresh per query and never mutated after
/// it has been written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskRecord {
    pub record_id: Uuid,
    pub subject_id: String,
    pub subject_name: String,
    pub vessel_type: Option<String>,
    pub flag: Option<String>,
    /// Query window, `YYYY-MM-DD - YYYY-MM-DD`.
    pub date_range: String,
    pub verdict: AggregateVerdict,
    pub provider_errors: Vec<ProviderErrorNote>,
    pub vessel_status: VesselStatus,
    pub request_time: DateTime<Utc>,
    pub response_time: DateTime<Utc>,
}

impl RiskRecord {
    pub fn overall_level(&self) -> RiskLevel {
        self.verdict.overall_level
    }

    pub fn has_errors(&self) -> bool {
        !self.provider_errors.is_empty()
    }
}

/// Result of one aggregation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AggregateOutcome {
    /// Best-effort record; `database_saved` is false when persistence failed.
    Completed {
        record: Box<RiskRecord>,
        database_saved: bool,
    },
    /// The primary identity fetch returned nothing.
    NoData {
        subject_id: String,
        date_range: String,
        reason: String,
    },
}

impl AggregateOutcome {
    pub fn record(&self) -> Option<&RiskRecord> {
        match self {
            AggregateOutcome::Completed { record, .. } => Some(record),
            AggregateOutcome::NoData { .. } => None,
        }
    }

    pub fn database_saved(&self) -> bool {
        matches!(
            self,
            AggregateOutcome::Completed {
                database_saved: true,
                ..
            }
        )
    }
}
