//! Vessel Risk Engine Library
//!
//! Normalizes vessel-compliance risk signals from a maritime-intelligence
//! provider, a commodity-tracking provider and a static watch list into one
//! taxonomy, aggregates them into a per-vessel verdict and keeps every
//! result as append-only history.
//!
//! ## Modules
//!
//! - [`domain`] - Risk levels, categories, observations, verdicts, records
//! - [`normalize`] - Provider JSON to observations
//! - [`classify`] - Observations to per-category verdicts
//! - [`aggregate`] - Category verdicts to the grouped aggregate
//! - [`builder`] - Description enrichment and record assembly
//! - [`pipeline`] - The `aggregate(subject, range)` entry point
//! - [`providers`] - HTTP clients for the two providers
//! - [`infra`] - Storage, watch list, retry and caching
//! - [`metrics`] - Observability and metrics
//! - [`api`] - REST API routes

pub mod aggregate;
pub mod api;
pub mod builder;
pub mod classify;
pub mod domain;
pub mod infra;
pub mod metrics;
pub mod migrations;
pub mod normalize;
pub mod pipeline;
pub mod providers;
pub mod server;

// Re-export commonly used types
pub use domain::{
    AggregateOutcome, AggregateVerdict, Category, CategoryVerdict, DateRange, DisplayGroup,
    EntitySanctionRecord, Observation, RiskLevel, RiskRecord,
};

pub use infra::{Result, RiskError, RiskStore};
pub use pipeline::RiskPipeline;
