//! Maritime-intelligence (provider A) REST client.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::{build_http_client, env_parse, env_string, read_json};
use crate::domain::{DateRange, Source};
use crate::infra::{
    classify_transport_error, retry_provider_call, MaritimeIntelSource, Result, RetryConfig,
};

pub const DEFAULT_BASE_URL: &str = "https://api.lloydslistintelligence.com/v1";

const VOYAGE_EVENTS: &str = "vesselvoyageevents";
const SANCTIONS: &str = "vesselsanctions_v2";
const RISK_SCORE: &str = "vesselriskscore";
const ADVANCED_COMPLIANCE: &str = "vesseladvancedcompliancerisk_v3";
const STS_PAIRINGS: &str = "vesselstspairings_v2";

/// Provider A client configuration.
#[derive(Debug, Clone)]
pub struct LloydsConfig {
    pub base_url: String,
    /// Sent verbatim as the `Authorization` header.
    pub api_token: String,
    pub timeout: Duration,
    pub retry: RetryConfig,
}

impl LloydsConfig {
    /// Load from `LLOYDS_BASE_URL`, `LLOYDS_API_TOKEN`, `LLOYDS_TIMEOUT_SECS`
    /// and `LLOYDS_MAX_RETRIES`.
    pub fn from_env() -> Self {
        Self {
            base_url: env_string("LLOYDS_BASE_URL", DEFAULT_BASE_URL),
            api_token: env_string("LLOYDS_API_TOKEN", ""),
            timeout: Duration::from_secs(env_parse("LLOYDS_TIMEOUT_SECS", 120)),
            retry: RetryConfig::default().with_max_retries(env_parse("LLOYDS_MAX_RETRIES", 3)),
        }
    }
}

pub struct LloydsClient {
    config: LloydsConfig,
    http: reqwest::Client,
}

impl LloydsClient {
    pub fn new(config: LloydsConfig) -> Result<Self> {
        let http = build_http_client(config.timeout)?;
        Ok(Self { config, http })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), endpoint)
    }

    async fn fetch_once(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Value> {
        let response = self
            .http
            .get(self.url(endpoint))
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, &self.config.api_token)
            .query(params)
            .send()
            .await
            .map_err(|e| classify_transport_error(Source::ProviderA, &e))?;

        read_json(Source::ProviderA, endpoint, response).await
    }

    async fn fetch(&self, endpoint: &str, params: Vec<(&str, String)>) -> Result<Value> {
        let outcome = retry_provider_call(&self.config.retry, endpoint, || {
            self.fetch_once(endpoint, &params)
        })
        .await;
        debug!(endpoint, attempts = outcome.attempts, ok = outcome.result.is_ok(), "Provider A call finished");
        outcome.result
    }
}

fn imo_param(imo: &str) -> (&'static str, String) {
    ("vesselImo", imo.trim().to_string())
}

fn range_param(range: &DateRange) -> (&'static str, String) {
    ("voyageDateRange", range.provider_a_param())
}

#[async_trait]
impl MaritimeIntelSource for LloydsClient {
    async fn voyage_events(&self, imo: &str, range: &DateRange) -> Result<Value> {
        self.fetch(VOYAGE_EVENTS, vec![imo_param(imo), range_param(range)])
            .await
    }

    async fn sanctions(&self, imo: &str) -> Result<Value> {
        self.fetch(SANCTIONS, vec![imo_param(imo)]).await
    }

    async fn risk_score(&self, imo: &str, range: &DateRange) -> Result<Value> {
        self.fetch(RISK_SCORE, vec![imo_param(imo), range_param(range)])
            .await
    }

    async fn advanced_compliance(&self, imo: &str) -> Result<Value> {
        self.fetch(ADVANCED_COMPLIANCE, vec![imo_param(imo)]).await
    }

    async fn sts_pairings(&self, imo: &str, range: &DateRange) -> Result<Value> {
        self.fetch(STS_PAIRINGS, vec![imo_param(imo), range_param(range)])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = LloydsClient::new(LloydsConfig {
            base_url: "http://localhost:9/v1/".into(),
            api_token: "token".into(),
            timeout: Duration::from_secs(1),
            retry: RetryConfig::none(),
        })
        .unwrap();
        assert_eq!(client.url(SANCTIONS), "http://localhost:9/v1/vesselsanctions_v2");
    }
}
