//! HTTP clients for the two risk data providers.
//!
//! Both clients share one response policy:
//! - 401/403 → [`RiskError::ProviderAuth`], never retried
//! - 429/5xx and transport failures → [`RiskError::ProviderUnavailable`], retried
//! - a body that is not JSON → [`RiskError::MalformedResponse`]

mod kpler;
mod lloyds;

pub use kpler::{KplerClient, KplerConfig};
pub use lloyds::{LloydsClient, LloydsConfig};

use serde_json::Value;
use std::time::Duration;

use crate::domain::Source;
use crate::infra::{classify_transport_error, is_retryable_status, Result, RiskError};

/// Turn a provider response into its JSON document.
pub(crate) async fn read_json(
    provider: Source,
    operation: &str,
    response: reqwest::Response,
) -> Result<Value> {
    let status = response.status();

    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(RiskError::ProviderAuth {
            provider,
            status: status.as_u16(),
        });
    }
    if is_retryable_status(status.as_u16()) {
        return Err(RiskError::ProviderUnavailable {
            provider,
            reason: format!("{operation} returned {status}"),
        });
    }
    if !status.is_success() {
        return Err(RiskError::MalformedResponse {
            provider,
            reason: format!("{operation} returned unexpected status {status}"),
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| classify_transport_error(provider, &e))?;
    serde_json::from_slice(&body).map_err(|e| RiskError::MalformedResponse {
        provider,
        reason: format!("{operation} body is not JSON: {e}"),
    })
}

pub(crate) fn build_http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| RiskError::Configuration(format!("cannot build HTTP client: {e}")))
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
