//! Common test utilities and fixtures for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use vessel_risk_engine::builder::TieredDescriptions;
use vessel_risk_engine::domain::{DateRange, Source, WatchListEntry};
use vessel_risk_engine::infra::{
    CommodityTrackerSource, MaritimeIntelSource, MemoryRiskStore, Result, RiskError,
    StaticWatchList,
};
use vessel_risk_engine::RiskPipeline;

pub const TEST_IMO: &str = "9569671";
pub const COUNTERPART_IMO: &str = "9000001";

/// Fixed window so fixtures stay deterministic.
pub fn test_range() -> DateRange {
    DateRange::new(
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
    )
}

/// Provider-A success envelope around `items`.
pub fn envelope(items: Value) -> Value {
    json!({"IsSuccess": true, "Data": {"Items": items}})
}

/// Voyage document with identity only and no risky voyages.
pub fn quiet_voyages(imo: &str) -> Value {
    envelope(json!([{
        "VesselImo": imo,
        "VesselName": "OCEAN STAR",
        "VesselType": "Crude Oil Tanker",
        "Flag": "Panama",
        "Voyages": [{"RiskTypes": []}]
    }]))
}

/// Voyage document with a high-risk port call, a suspicious gap in a
/// sanctioned EEZ and an STS with a sanctioned counterpart.
pub fn risky_voyages(imo: &str) -> Value {
    envelope(json!([{
        "VesselImo": imo,
        "VesselName": "DARK HORSE",
        "VesselType": "Crude Oil Tanker",
        "Flag": "Cameroon",
        "Voyages": [{
            "VoyageId": "V-1",
            "VoyageStartTime": "2024-02-01T00:00:00.000Z",
            "VoyageEndTime": "2024-02-20T12:00:00Z",
            "RiskTypes": ["High Risk Port Calling", "Suspicious AIS Gap", "STS With a Sanctioned Vessel"],
            "VoyageEndPlace": {"Name": "Bandar Abbas", "CountryName": "Iran", "IsHighRiskPort": true},
            "VoyageEvents": {
                "AisGap": [{
                    "RiskTypes": ["Suspicious AIS Gap"],
                    "AisGapStartDateTime": "2024-02-05T00:00:00Z",
                    "AisGapEndDateTime": "2024-02-07T00:00:00Z",
                    "AisGapStartEezName": "Iranian Exclusive Economic Zone"
                }],
                "ShipToShipTransfer": [{
                    "StsType": "Crude",
                    "StartDateTime": "2024-02-10T00:00:00Z",
                    "CounterpartVessel": {"VesselImo": COUNTERPART_IMO, "VesselName": "SHADOW", "IsVesselSanctioned": true}
                }]
            }
        }]
    }]))
}

pub fn no_data() -> Value {
    json!({"IsSuccess": false, "Data": null})
}

pub fn empty_items() -> Value {
    envelope(json!([]))
}

/// Provider-B array element for `imo` with the given compliance block.
pub fn tracker_doc(imo: &str, compliance: Value) -> Value {
    json!([{"vessel": {"imo": imo, "name": "OCEAN STAR"}, "compliance": compliance}])
}

/// How a stubbed endpoint should fail.
#[derive(Debug, Clone, Copy)]
pub enum Failure {
    Unavailable,
    Auth,
    Malformed,
}

impl Failure {
    fn to_error(self, provider: Source) -> RiskError {
        match self {
            Failure::Unavailable => RiskError::ProviderUnavailable {
                provider,
                reason: "HTTP 503".into(),
            },
            Failure::Auth => RiskError::ProviderAuth {
                provider,
                status: 401,
            },
            Failure::Malformed => RiskError::MalformedResponse {
                provider,
                reason: "expected JSON".into(),
            },
        }
    }
}

/// Provider A stub serving canned documents per endpoint.
#[derive(Debug, Clone)]
pub struct FixtureMaritime {
    pub voyage: Value,
    pub sanctions: Value,
    pub score: Value,
    pub advanced: Value,
    pub pairings: Value,
    pub failing: Vec<(&'static str, Failure)>,
}

impl FixtureMaritime {
    /// Identity present, nothing else found.
    pub fn quiet(imo: &str) -> Self {
        Self {
            voyage: quiet_voyages(imo),
            sanctions: json!({"IsSuccess": true, "Data": {"items": []}}),
            score: empty_items(),
            advanced: empty_items(),
            pairings: empty_items(),
            failing: Vec::new(),
        }
    }

    pub fn failing(mut self, endpoint: &'static str, failure: Failure) -> Self {
        self.failing.push((endpoint, failure));
        self
    }

    fn serve(&self, endpoint: &str, doc: &Value) -> Result<Value> {
        match self.failing.iter().find(|(e, _)| *e == endpoint) {
            Some((_, failure)) => Err(failure.to_error(Source::ProviderA)),
            None => Ok(doc.clone()),
        }
    }
}

#[async_trait]
impl MaritimeIntelSource for FixtureMaritime {
    async fn voyage_events(&self, _imo: &str, _range: &DateRange) -> Result<Value> {
        self.serve("vesselvoyageevents", &self.voyage)
    }

    async fn sanctions(&self, _imo: &str) -> Result<Value> {
        self.serve("vesselsanctions_v2", &self.sanctions)
    }

    async fn risk_score(&self, _imo: &str, _range: &DateRange) -> Result<Value> {
        self.serve("vesselriskscore", &self.score)
    }

    async fn advanced_compliance(&self, _imo: &str) -> Result<Value> {
        self.serve("vesseladvancedcompliancerisk_v3", &self.advanced)
    }

    async fn sts_pairings(&self, _imo: &str, _range: &DateRange) -> Result<Value> {
        self.serve("vesselstspairings_v2", &self.pairings)
    }
}

/// Provider B stub; counts calls so tests can assert on batching.
#[derive(Debug)]
pub struct FixtureTracker {
    pub doc: Value,
    pub failure: Option<Failure>,
    pub calls: AtomicUsize,
}

impl FixtureTracker {
    pub fn new(doc: Value) -> Self {
        Self {
            doc,
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn quiet(imo: &str) -> Self {
        Self::new(tracker_doc(imo, json!({})))
    }

    pub fn failing(failure: Failure) -> Self {
        Self {
            doc: Value::Null,
            failure: Some(failure),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CommodityTrackerSource for FixtureTracker {
    async fn vessel_risks(&self, imos: &[String], _range: &DateRange) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let unique: HashSet<&String> = imos.iter().collect();
        assert_eq!(unique.len(), imos.len(), "duplicate IMOs in one batch");
        match self.failure {
            Some(failure) => Err(failure.to_error(Source::ProviderB)),
            None => Ok(self.doc.clone()),
        }
    }
}

pub fn uani_entry(imo: &str) -> WatchListEntry {
    WatchListEntry {
        imo: imo.to_string(),
        vessel_name: Some("DARK HORSE".into()),
        date_added: Some("2023-06-01T00:00:00Z".into()),
        current_flag: Some("Cameroon".into()),
        former_flags: Some("Panama".into()),
    }
}

/// Collaborators for one pipeline under test.
pub struct Harness {
    pub pipeline: Arc<RiskPipeline>,
    pub store: Arc<MemoryRiskStore>,
    pub tracker: Arc<FixtureTracker>,
}

pub fn harness(
    maritime: FixtureMaritime,
    tracker: FixtureTracker,
    watch_list: StaticWatchList,
) -> Harness {
    let store = Arc::new(MemoryRiskStore::new());
    let tracker = Arc::new(tracker);
    let pipeline = RiskPipeline::new(
        Arc::new(maritime),
        tracker.clone(),
        Arc::new(watch_list),
        store.clone(),
        Arc::new(TieredDescriptions::defaults_only()),
    );
    Harness {
        pipeline: Arc::new(pipeline),
        store,
        tracker,
    }
}

/// Clean vessel: identity only, empty provider B element, not listed.
pub fn quiet_harness(imo: &str) -> Harness {
    harness(
        FixtureMaritime::quiet(imo),
        FixtureTracker::quiet(imo),
        StaticWatchList::default(),
    )
}
