//! Severity levels.
//!
//! Levels are ordered so that aggregation is a plain `max()`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Risk level for a vessel category or an aggregate.
///
/// Declaration order is severity order: `None < Medium < High`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    None,
    Medium,
    High,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::High, RiskLevel::Medium, RiskLevel::None];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::None => "none",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }

    /// Bucket key used by the grouped record layout.
    pub fn bucket_name(&self) -> &'static str {
        match self {
            RiskLevel::High => "high_risk",
            RiskLevel::Medium => "mid_risk",
            RiskLevel::None => "no_risk",
        }
    }

    /// Highest level in `levels`, `None` for an empty iterator.
    pub fn max_of<I: IntoIterator<Item = RiskLevel>>(levels: I) -> RiskLevel {
        levels.into_iter().max().unwrap_or_default()
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "no_risk" => Ok(RiskLevel::None),
            "medium" | "mid_risk" => Ok(RiskLevel::Medium),
            "high" | "high_risk" => Ok(RiskLevel::High),
            other => Err(format!("unknown risk level: {other}")),
        }
    }
}

/// Risk level for one entity-sanction flag.
///
/// `Undetermined` means the source data was insufficient to classify. It
/// ranks below `Medium` but is reported on its own and never folds into
/// `None`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum EntityRiskLevel {
    #[default]
    None,
    Undetermined,
    Medium,
    High,
}

impl EntityRiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityRiskLevel::None => "none",
            EntityRiskLevel::Undetermined => "undetermined",
            EntityRiskLevel::Medium => "medium",
            EntityRiskLevel::High => "high",
        }
    }

    /// The vessel-scale level this flag contributes to a roll-up.
    ///
    /// `Undetermined` contributes nothing.
    pub fn as_risk_level(&self) -> RiskLevel {
        match self {
            EntityRiskLevel::High => RiskLevel::High,
            EntityRiskLevel::Medium => RiskLevel::Medium,
            EntityRiskLevel::None | EntityRiskLevel::Undetermined => RiskLevel::None,
        }
    }
}

impl fmt::Display for EntityRiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<RiskLevel> for EntityRiskLevel {
    fn from(level: RiskLevel) -> Self {
        match level {
            RiskLevel::None => EntityRiskLevel::None,
            RiskLevel::Medium => EntityRiskLevel::Medium,
            RiskLevel::High => EntityRiskLevel::High,
        }
    }
}
