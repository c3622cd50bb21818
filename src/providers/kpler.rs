//! Commodity-tracker (provider B) REST client.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::{build_http_client, env_parse, env_string, read_json};
use crate::domain::{DateRange, Source};
use crate::infra::{
    classify_transport_error, retry_provider_call, CommodityTrackerSource, Result, RetryConfig,
};

pub const DEFAULT_BASE_URL: &str = "https://api.kpler.com/v2";

const VESSEL_RISKS: &str = "compliance/vessel-risks-v2";

/// Provider B client configuration.
#[derive(Debug, Clone)]
pub struct KplerConfig {
    pub base_url: String,
    /// Sent verbatim as the `Authorization` header (e.g. `Basic ...`).
    pub api_token: String,
    pub timeout: Duration,
    pub retry: RetryConfig,
}

impl KplerConfig {
    /// Load from `KPLER_BASE_URL`, `KPLER_API_TOKEN`, `KPLER_TIMEOUT_SECS`
    /// and `KPLER_MAX_RETRIES`.
    pub fn from_env() -> Self {
        Self {
            base_url: env_string("KPLER_BASE_URL", DEFAULT_BASE_URL),
            api_token: env_string("KPLER_API_TOKEN", ""),
            timeout: Duration::from_secs(env_parse("KPLER_TIMEOUT_SECS", 60)),
            retry: RetryConfig::default().with_max_retries(env_parse("KPLER_MAX_RETRIES", 3)),
        }
    }
}

pub struct KplerClient {
    config: KplerConfig,
    http: reqwest::Client,
}

impl KplerClient {
    pub fn new(config: KplerConfig) -> Result<Self> {
        let http = build_http_client(config.timeout)?;
        Ok(Self { config, http })
    }

    fn url(&self) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), VESSEL_RISKS)
    }

    async fn fetch_once(&self, body: &Value, range: &DateRange) -> Result<Value> {
        let response = self
            .http
            .post(self.url())
            .header(ACCEPT, "application/json")
            .header(AUTHORIZATION, &self.config.api_token)
            .query(&[
                ("startDate", range.start.to_string()),
                ("endDate", range.end.to_string()),
            ])
            .json(body)
            .send()
            .await
            .map_err(|e| classify_transport_error(Source::ProviderB, &e))?;

        read_json(Source::ProviderB, VESSEL_RISKS, response).await
    }
}

/// Request body: the IMO list, numeric where the IMO is numeric.
pub fn request_body(imos: &[String]) -> Value {
    Value::Array(
        imos.iter()
            .map(|imo| {
                imo.trim()
                    .parse::<u64>()
                    .map(Value::from)
                    .unwrap_or_else(|_| Value::from(imo.trim()))
            })
            .collect(),
    )
}

#[async_trait]
impl CommodityTrackerSource for KplerClient {
    async fn vessel_risks(&self, imos: &[String], range: &DateRange) -> Result<Value> {
        let body = request_body(imos);
        let outcome = retry_provider_call(&self.config.retry, VESSEL_RISKS, || {
            self.fetch_once(&body, range)
        })
        .await;
        debug!(
            vessels = imos.len(),
            attempts = outcome.attempts,
            ok = outcome.result.is_ok(),
            "Provider B call finished"
        );
        outcome.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body_numeric_imos() {
        let body = request_body(&["9569671".into(), " 1234567 ".into(), "X1".into()]);
        assert_eq!(body, json!([9569671, 1234567, "X1"]));
    }
}
