//! The aggregation entry point.
//!
//! One call fetches every source concurrently, normalizes, classifies,
//! aggregates, enriches and appends a record:
//!
//! ```text
//! FETCH (join) → NORMALIZE → CLASSIFY → AGGREGATE → ENRICH → PERSIST
//! ```
//!
//! A failing provider only blanks its own categories. A missing primary
//! voyage document ends the request with [`AggregateOutcome::NoData`].

use chrono::{NaiveDate, Utc};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::aggregate::aggregate;
use crate::builder::{RecordBuilder, RecordContext, TieredDescriptions};
use crate::classify::{classify_all, classify_entity};
use crate::domain::{
    AggregateOutcome, Category, DateRange, EntitySanctionRecord, EntitySanctionRow, Observation,
    ProviderErrorKind, ProviderErrorNote, Source, VesselStatus, WatchListEntry,
};
use crate::infra::{
    CommodityTrackerSource, MaritimeIntelSource, Result, RiskError, RiskStore, WatchList,
};
use crate::metrics::{metric_names, timed, MetricsRegistry};
use crate::normalize::{kpler, lloyds, timestamp};

const VOYAGE_EVENTS: &str = "vesselvoyageevents";
const SANCTIONS: &str = "vesselsanctions_v2";
const RISK_SCORE: &str = "vesselriskscore";
const ADVANCED_COMPLIANCE: &str = "vesseladvancedcompliancerisk_v3";
const STS_PAIRINGS: &str = "vesselstspairings_v2";
const VESSEL_RISKS: &str = "vessel-risks-v2";
const WATCH_LIST_LOOKUP: &str = "uani_list";

/// Wires the providers, the watch list, the builder and the store together.
pub struct RiskPipeline {
    maritime: Arc<dyn MaritimeIntelSource>,
    tracker: Arc<dyn CommodityTrackerSource>,
    watch_list: Arc<dyn WatchList>,
    store: Arc<dyn RiskStore>,
    builder: RecordBuilder,
    metrics: Arc<MetricsRegistry>,
}

impl RiskPipeline {
    pub fn new(
        maritime: Arc<dyn MaritimeIntelSource>,
        tracker: Arc<dyn CommodityTrackerSource>,
        watch_list: Arc<dyn WatchList>,
        store: Arc<dyn RiskStore>,
        descriptions: Arc<TieredDescriptions>,
    ) -> Self {
        Self {
            maritime,
            tracker,
            watch_list,
            store,
            builder: RecordBuilder::new(descriptions),
            metrics: Arc::new(MetricsRegistry::new()),
        }
    }

    /// Share an existing registry instead of a private one.
    pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn store(&self) -> &Arc<dyn RiskStore> {
        &self.store
    }

    pub fn metrics(&self) -> &Arc<MetricsRegistry> {
        &self.metrics
    }

    /// Aggregate every source for one vessel and append the record.
    #[instrument(skip(self, range), fields(range = %range))]
    pub async fn aggregate(&self, subject_id: &str, range: DateRange) -> AggregateOutcome {
        timed(
            &self.metrics,
            metric_names::AGGREGATE_LATENCY,
            self.run(subject_id.trim(), range),
        )
        .await
    }

    async fn run(&self, imo: &str, range: DateRange) -> AggregateOutcome {
        let request_time = Utc::now();
        let imos = vec![imo.to_string()];

        let (voyage, sanctions, score, advanced, pairings, tracker, listed) = tokio::join!(
            self.maritime.voyage_events(imo, &range),
            self.maritime.sanctions(imo),
            self.maritime.risk_score(imo, &range),
            self.maritime.advanced_compliance(imo),
            self.maritime.sts_pairings(imo, &range),
            self.tracker.vessel_risks(&imos, &range),
            self.watch_list.lookup(imo),
        );

        let voyage = match voyage {
            Ok(doc) => doc,
            Err(e) => {
                log_provider_error(Source::ProviderA, VOYAGE_EVENTS, &e);
                return self.no_data(imo, &range, e.to_string()).await;
            }
        };
        let Some(identity) = lloyds::identity(&voyage, imo) else {
            let e = RiskError::PrimaryDataMissing(imo.to_string());
            return self.no_data(imo, &range, e.to_string()).await;
        };

        let mut notes = Vec::new();
        let mut observations = lloyds::voyage_observations(&voyage, imo);

        if let Some(doc) = settle(sanctions, Source::ProviderA, SANCTIONS, &mut notes) {
            observations.extend(lloyds::sanction_observations(&doc, imo));
        }
        if let Some(doc) = settle(score, Source::ProviderA, RISK_SCORE, &mut notes) {
            observations.extend(lloyds::compliance_observations(&doc, imo));
        }
        if let Some(doc) = settle(advanced, Source::ProviderA, ADVANCED_COMPLIANCE, &mut notes) {
            observations.extend(lloyds::ais_manipulation_observations(&doc, imo));
        }
        if let Some(doc) = settle(pairings, Source::ProviderA, STS_PAIRINGS, &mut notes) {
            observations.extend(lloyds::sts_pairing_observations(&doc, imo));
        }

        let tracker = settle(tracker, Source::ProviderB, VESSEL_RISKS, &mut notes);
        if let Some(doc) = &tracker {
            observations.extend(kpler::observations(doc, imo));
        }

        let entry = settle(listed, Source::WatchList, WATCH_LIST_LOOKUP, &mut notes).flatten();
        if let Some(entry) = &entry {
            observations.push(watch_list_observation(imo, entry));
        }

        let vessel_status = VesselStatus {
            provider_a_found: true,
            watch_list_listed: entry.is_some(),
            provider_b_found: tracker
                .as_ref()
                .is_some_and(|doc| kpler::vessel_found(doc, imo)),
        };

        let verdicts = classify_all(&observations);
        let verdict = aggregate(imo, &verdicts);

        if !notes.is_empty() {
            self.metrics
                .add_counter(metric_names::PROVIDER_ERRORS, notes.len() as u64)
                .await;
            let auth = notes
                .iter()
                .filter(|n| n.kind == ProviderErrorKind::Auth)
                .count();
            if auth > 0 {
                self.metrics
                    .add_counter(metric_names::PROVIDER_AUTH_ERRORS, auth as u64)
                    .await;
            }
        }

        let record = self
            .builder
            .build(
                verdict,
                RecordContext {
                    identity,
                    date_range: range,
                    provider_errors: notes,
                    vessel_status,
                    request_time,
                },
            )
            .await;

        let database_saved = match self.store.write(&record).await {
            Ok(()) => true,
            Err(e) => {
                error!(imo = %imo, record_id = %record.record_id, error = %e, "Failed to persist risk record");
                self.metrics
                    .inc_counter(metric_names::PERSISTENCE_FAILURES)
                    .await;
                false
            }
        };
        self.metrics.inc_counter(metric_names::AGGREGATIONS).await;

        info!(
            imo = %imo,
            overall = %record.overall_level(),
            errors = record.provider_errors.len(),
            database_saved,
            "Aggregation complete"
        );

        AggregateOutcome::Completed {
            record: Box::new(record),
            database_saved,
        }
    }

    async fn no_data(&self, imo: &str, range: &DateRange, reason: String) -> AggregateOutcome {
        warn!(imo = %imo, reason = %reason, "No primary voyage data, skipping aggregation");
        self.metrics
            .inc_counter(metric_names::AGGREGATIONS_NO_DATA)
            .await;
        AggregateOutcome::NoData {
            subject_id: imo.to_string(),
            date_range: range.to_string(),
            reason,
        }
    }

    /// Classify an entity from its sanction rows and describe every flag.
    pub async fn classify_entity(
        &self,
        entity_id: &str,
        rows: &[EntitySanctionRow],
        reference_date: NaiveDate,
    ) -> EntitySanctionRecord {
        let mut record = classify_entity(entity_id, rows, reference_date);
        self.builder.enrich_entity(&mut record).await;
        self.metrics
            .inc_counter(metric_names::ENTITY_CLASSIFICATIONS)
            .await;
        record
    }
}

/// Categories that resolve to none when `operation` fails.
pub fn affected_categories(operation: &str) -> Vec<Category> {
    match operation {
        VOYAGE_EVENTS => vec![
            Category::HighRiskPort,
            Category::SanctionedSts,
            Category::DarkSts,
            Category::SuspiciousAisGap,
            Category::DarkPort,
            Category::Loitering,
        ],
        SANCTIONS => vec![
            Category::SanctionedVesselCurrent,
            Category::SanctionedVesselHistorical,
        ],
        RISK_SCORE => vec![Category::StakeholderCompliance],
        ADVANCED_COMPLIANCE => vec![Category::AisManipulation],
        STS_PAIRINGS => vec![Category::StsPairing],
        VESSEL_RISKS => Category::from_source(Source::ProviderB).collect(),
        WATCH_LIST_LOOKUP => vec![Category::UaniListed],
        _ => Vec::new(),
    }
}

/// Keep a successful fetch, or record a note and drop it.
fn settle<T>(
    result: Result<T>,
    source: Source,
    operation: &str,
    notes: &mut Vec<ProviderErrorNote>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            log_provider_error(source, operation, &e);
            notes.push(ProviderErrorNote {
                source,
                operation: operation.to_string(),
                kind: e.provider_kind().unwrap_or(ProviderErrorKind::Unavailable),
                message: e.to_string(),
                affected: affected_categories(operation),
            });
            None
        }
    }
}

fn log_provider_error(source: Source, operation: &str, e: &RiskError) {
    match e {
        RiskError::ProviderAuth { .. } => {
            error!(provider = %source, operation, error = %e, "Provider rejected credentials")
        }
        _ => warn!(provider = %source, operation, error = %e, "Provider fetch failed"),
    }
}

fn watch_list_observation(imo: &str, entry: &WatchListEntry) -> Observation {
    let mut detail = serde_json::to_value(entry).unwrap_or(Value::Null);
    timestamp::normalize_tree(&mut detail);
    Observation::new(Category::UaniListed, imo, detail)
        .with_window(entry.date_added.as_deref().map(timestamp::normalize_str), None)
}
