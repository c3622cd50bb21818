//! Error types for the vessel risk engine

use thiserror::Error;

use crate::domain::{ProviderErrorKind, Source};

/// Errors that can occur while fetching, aggregating or persisting risk data
#[derive(Error, Debug)]
pub enum RiskError {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Provider unreachable, timed out, rate limited or returned 5xx
    #[error("{provider} unavailable: {reason}")]
    ProviderUnavailable { provider: Source, reason: String },

    /// Provider rejected our credentials (401/403)
    #[error("{provider} rejected credentials with status {status}")]
    ProviderAuth { provider: Source, status: u16 },

    /// Provider body was not a JSON document
    #[error("{provider} returned a malformed response: {reason}")]
    MalformedResponse { provider: Source, reason: String },

    /// The identity-establishing fetch returned nothing
    #[error("no primary data for subject {0}")]
    PrimaryDataMissing(String),

    /// Persistence gateway failure
    #[error("persistence failure: {0}")]
    Persistence(String),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl RiskError {
    /// Note kind for provider failures, `None` for everything else.
    pub fn provider_kind(&self) -> Option<ProviderErrorKind> {
        match self {
            RiskError::ProviderUnavailable { .. } => Some(ProviderErrorKind::Unavailable),
            RiskError::ProviderAuth { .. } => Some(ProviderErrorKind::Auth),
            RiskError::MalformedResponse { .. } => Some(ProviderErrorKind::Malformed),
            _ => None,
        }
    }

    /// Whether a provider call failing with this error is worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RiskError::ProviderUnavailable { .. })
    }
}

/// Result type for risk engine operations
pub type Result<T> = std::result::Result<T, RiskError>;
