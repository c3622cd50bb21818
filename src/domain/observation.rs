//! Observations and query windows.

use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Category, Source};

/// Provider compliance tier attached to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComplianceTier {
    Low,
    Medium,
    High,
}

impl ComplianceTier {
    /// Parse a provider tier string. Unknown or blank values yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "High" => Some(ComplianceTier::High),
            "Medium" => Some(ComplianceTier::Medium),
            "Low" => Some(ComplianceTier::Low),
            _ => None,
        }
    }
}

/// What an observation asserts, beyond its mere presence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Signal {
    /// The event happened.
    Presence,
    /// A numeric compliance score.
    Score(f64),
    /// A provider tier; `None` when the provider left it blank.
    Tier(Option<ComplianceTier>),
    /// Synthetic marker: the provider explicitly reported no findings.
    NoFindings,
}

/// One detected event from a provider, tagged with exactly one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub category: Category,
    /// Vessel this observation concerns. For STS counterparts this is the
    /// other vessel, never the queried one.
    pub subject_imo: String,
    pub occurred_start: Option<String>,
    /// `None` means ongoing / current.
    pub occurred_end: Option<String>,
    /// Display payload (place names, counterparts, indicator tags).
    pub detail: serde_json::Value,
    pub source: Source,
    pub signal: Signal,
    /// Set when the detail names an EEZ; `true` if that EEZ is sanctioned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sanctioned_eez: Option<bool>,
}

impl Observation {
    /// Presence observation for `category` with the category's own source.
    pub fn new(category: Category, subject_imo: impl Into<String>, detail: serde_json::Value) -> Self {
        Self {
            category,
            subject_imo: subject_imo.into(),
            occurred_start: None,
            occurred_end: None,
            detail,
            source: category.source(),
            signal: Signal::Presence,
            sanctioned_eez: None,
        }
    }

    pub fn with_window(mut self, start: Option<String>, end: Option<String>) -> Self {
        self.occurred_start = start.filter(|s| !s.trim().is_empty());
        self.occurred_end = end.filter(|s| !s.trim().is_empty());
        self
    }

    pub fn with_signal(mut self, signal: Signal) -> Self {
        self.signal = signal;
        self
    }

    pub fn with_sanctioned_eez(mut self, flag: Option<bool>) -> Self {
        self.sanctioned_eez = flag;
        self
    }

    pub fn is_marker(&self) -> bool {
        matches!(self.signal, Signal::NoFindings)
    }
}

/// Inclusive query window in calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// One year back from `today`, inclusive of today.
    pub fn lookback_from(today: NaiveDate) -> Self {
        Self {
            start: today - Duration::days(365),
            end: today,
        }
    }

    /// One year back from the current UTC date.
    pub fn default_lookback() -> Self {
        Self::lookback_from(Utc::now().date_naive())
    }

    /// Build from optional `YYYY-MM-DD` strings, defaulting missing ends.
    pub fn from_optional(start: Option<&str>, end: Option<&str>) -> Result<Self, String> {
        let parse = |s: &str| {
            NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .map_err(|e| format!("invalid date {s:?}: {e}"))
        };
        let end = match end.filter(|s| !s.trim().is_empty()) {
            Some(s) => parse(s)?,
            None => Utc::now().date_naive(),
        };
        let start = match start.filter(|s| !s.trim().is_empty()) {
            Some(s) => parse(s)?,
            None => end - Duration::days(365),
        };
        if start > end {
            return Err(format!("start date {start} is after end date {end}"));
        }
        Ok(Self { start, end })
    }

    /// Provider-A query format: `YYYY-MM-DD-YYYY-MM-DD`.
    pub fn provider_a_param(&self) -> String {
        format!("{}-{}", self.start, self.end)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_lookback_spans_a_year() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let range = DateRange::lookback_from(today);
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(range.to_string(), "2024-03-01 - 2025-03-01");
        assert_eq!(range.provider_a_param(), "2024-03-01-2025-03-01");
    }

    #[test]
    fn test_from_optional_rejects_inverted_range() {
        assert!(DateRange::from_optional(Some("2025-01-02"), Some("2025-01-01")).is_err());
        assert!(DateRange::from_optional(Some("not a date"), None).is_err());
        let range = DateRange::from_optional(Some("2024-01-01"), Some("2024-12-31")).unwrap();
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }

    #[test]
    fn test_blank_window_bounds_become_none() {
        let obs = Observation::new(Category::AisGap, "9569671", json!({}))
            .with_window(Some("2024-05-01 10:00:00".into()), Some("  ".into()));
        assert_eq!(obs.occurred_start.as_deref(), Some("2024-05-01 10:00:00"));
        assert!(obs.occurred_end.is_none());
        assert_eq!(obs.source, Source::ProviderB);
    }

    #[test]
    fn test_tier_parse() {
        assert_eq!(ComplianceTier::parse("High"), Some(ComplianceTier::High));
        assert_eq!(ComplianceTier::parse(""), None);
        assert_eq!(ComplianceTier::parse("Severe"), None);
    }
}
