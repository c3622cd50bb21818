//! Description lookup for `(risk type, level)` pairs.
//!
//! Lookups go through an ordered list of [`DescriptionSource`] tiers; the
//! first tier with an answer wins and a fixed default covers the rest.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::domain::{DescriptionEntry, RiskLevel};
use crate::infra::{DescriptionSource, LruCache, Result, RiskError};

/// Description lookup configuration.
#[derive(Debug, Clone)]
pub struct DescriptionConfig {
    /// Fallback CSV file; skipped when unset or missing.
    pub csv_path: Option<PathBuf>,
    pub cache_ttl: Duration,
    pub cache_capacity: usize,
}

impl Default for DescriptionConfig {
    fn default() -> Self {
        Self {
            csv_path: None,
            cache_ttl: Duration::from_secs(600),
            cache_capacity: 512,
        }
    }
}

impl DescriptionConfig {
    /// Load from `DESCRIPTION_CSV_PATH` and `DESCRIPTION_CACHE_TTL_SECS`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let csv_path = std::env::var("DESCRIPTION_CSV_PATH")
            .ok()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);
        let cache_ttl = std::env::var("DESCRIPTION_CACHE_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.cache_ttl);

        Self {
            csv_path,
            cache_ttl,
            ..defaults
        }
    }
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "risk_desc")]
    risk_type: String,
    risk_level: String,
    risk_desc_info: String,
    #[serde(default)]
    info: String,
}

/// Descriptions loaded once from a CSV file with the header
/// `risk_type,risk_level,risk_desc_info,info`.
pub struct CsvDescriptionFile {
    entries: HashMap<(String, RiskLevel), DescriptionEntry>,
}

impl CsvDescriptionFile {
    pub fn load(path: &Path) -> Result<Self> {
        let reader = csv::Reader::from_path(path).map_err(|e| {
            RiskError::Configuration(format!("cannot open {}: {e}", path.display()))
        })?;
        let file = Self::from_reader(reader)?;
        info!(path = %path.display(), entries = file.len(), "Loaded description file");
        Ok(file)
    }

    pub fn from_reader<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Self> {
        let mut entries = HashMap::new();
        for row in reader.deserialize::<CsvRow>() {
            let row = row.map_err(|e| RiskError::Configuration(format!("bad description row: {e}")))?;
            let Ok(level) = row.risk_level.parse::<RiskLevel>() else {
                warn!(risk_type = %row.risk_type, level = %row.risk_level, "Skipping row with unknown level");
                continue;
            };
            entries.insert(
                (row.risk_type.trim().to_string(), level),
                DescriptionEntry {
                    description: row.risk_desc_info,
                    info: row.info,
                },
            );
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl DescriptionSource for CsvDescriptionFile {
    async fn describe(&self, risk_type: &str, level: RiskLevel) -> Result<Option<DescriptionEntry>> {
        Ok(self.entries.get(&(risk_type.to_string(), level)).cloned())
    }

    fn name(&self) -> &'static str {
        "csv"
    }
}

/// Text used when no tier knows the pair.
pub fn default_description(risk_type: &str, level: RiskLevel) -> DescriptionEntry {
    DescriptionEntry {
        description: format!("risk type: {risk_type}, level: {level}"),
        info: format!("risk level: {level}"),
    }
}

/// Ordered description tiers with a shared result cache.
pub struct TieredDescriptions {
    tiers: Vec<Arc<dyn DescriptionSource>>,
    cache: LruCache<(String, RiskLevel), DescriptionEntry>,
}

impl TieredDescriptions {
    pub fn new(tiers: Vec<Arc<dyn DescriptionSource>>, config: &DescriptionConfig) -> Self {
        Self {
            tiers,
            cache: LruCache::new(config.cache_capacity, config.cache_ttl),
        }
    }

    /// `primary` first, then the configured CSV file when it loads.
    pub fn from_config(
        primary: Option<Arc<dyn DescriptionSource>>,
        config: &DescriptionConfig,
    ) -> Self {
        let mut tiers: Vec<Arc<dyn DescriptionSource>> = primary.into_iter().collect();

        if let Some(path) = &config.csv_path {
            match CsvDescriptionFile::load(path) {
                Ok(file) => tiers.push(Arc::new(file)),
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping description CSV"),
            }
        }

        Self::new(tiers, config)
    }

    /// No tiers at all; every lookup yields the default text.
    pub fn defaults_only() -> Self {
        Self::new(Vec::new(), &DescriptionConfig::default())
    }

    /// Description for a pair. Tier errors are logged and skipped.
    pub async fn describe(&self, risk_type: &str, level: RiskLevel) -> DescriptionEntry {
        let key = (risk_type.to_string(), level);
        if let Some(hit) = self.cache.get(&key).await {
            return hit;
        }

        for tier in &self.tiers {
            match tier.describe(risk_type, level).await {
                Ok(Some(entry)) => {
                    self.cache.insert(key, entry.clone()).await;
                    return entry;
                }
                Ok(None) => {
                    debug!(tier = tier.name(), risk_type, %level, "Description not found in tier");
                }
                Err(e) => {
                    warn!(tier = tier.name(), risk_type, %level, error = %e, "Description tier failed");
                }
            }
        }

        default_description(risk_type, level)
    }

    pub fn cache(&self) -> &LruCache<(String, RiskLevel), DescriptionEntry> {
        &self.cache
    }
}
