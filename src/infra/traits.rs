//! Trait definitions for the risk engine's external collaborators

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::domain::{DateRange, DescriptionEntry, RiskLevel, RiskRecord, WatchListEntry};

use super::Result;

/// Persistence gateway for risk records.
///
/// Invariant: append-only. A record is never updated or replaced once
/// written; repeated queries for one subject accumulate as history.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RiskStore: Send + Sync {
    /// Append a finished record
    async fn write(&self, record: &RiskRecord) -> Result<()>;

    /// Most recent record for a subject
    async fn read_latest(&self, subject_id: &str) -> Result<Option<RiskRecord>>;

    /// Records for a subject, newest first. `page` is 1-based.
    async fn read_history(
        &self,
        subject_id: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<RiskRecord>>;
}

/// Maritime-intelligence data source (provider A).
///
/// Every method returns the provider's raw JSON document. A document with
/// a false success flag or no items is "no data", not an error.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MaritimeIntelSource: Send + Sync {
    /// Voyage events; also the source of vessel identity
    async fn voyage_events(&self, imo: &str, range: &DateRange) -> Result<serde_json::Value>;

    /// Vessel sanction list entries
    async fn sanctions(&self, imo: &str) -> Result<serde_json::Value>;

    /// Compliance risk scores and sanctioned owners
    async fn risk_score(&self, imo: &str, range: &DateRange) -> Result<serde_json::Value>;

    /// Advanced compliance risks (AIS manipulation tiers)
    async fn advanced_compliance(&self, imo: &str) -> Result<serde_json::Value>;

    /// Ship-to-ship pairings
    async fn sts_pairings(&self, imo: &str, range: &DateRange) -> Result<serde_json::Value>;
}

/// Commodity-tracking data source (provider B).
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CommodityTrackerSource: Send + Sync {
    /// Batch risk lookup; returns a JSON array with one element per vessel
    async fn vessel_risks(&self, imos: &[String], range: &DateRange) -> Result<serde_json::Value>;
}

/// Static vessel watch list.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WatchList: Send + Sync {
    async fn lookup(&self, imo: &str) -> Result<Option<WatchListEntry>>;
}

/// One tier of the description lookup.
///
/// Returns `Ok(None)` when the pair is unknown; errors mean the tier itself
/// is unreachable.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DescriptionSource: Send + Sync {
    async fn describe(&self, risk_type: &str, level: RiskLevel)
        -> Result<Option<DescriptionEntry>>;

    /// Short name for logs
    fn name(&self) -> &'static str;
}

/// Individual component health
#[derive(Debug, Clone)]
pub enum ComponentHealth {
    Healthy,
    Degraded { reason: String },
    Unhealthy { reason: String },
}

impl ComponentHealth {
    pub fn is_healthy(&self) -> bool {
        matches!(self, ComponentHealth::Healthy)
    }

    pub fn is_unhealthy(&self) -> bool {
        matches!(self, ComponentHealth::Unhealthy { .. })
    }
}

/// Health check for components that own a connection
#[cfg_attr(test, automock)]
#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn check_health(&self) -> ComponentHealth;
}
