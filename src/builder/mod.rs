//! Risk record assembly.
//!
//! Attaches descriptions to every verdict and wraps the aggregate in a
//! fresh, immutable [`RiskRecord`].

mod descriptions;

pub use descriptions::{
    default_description, CsvDescriptionFile, DescriptionConfig, TieredDescriptions,
};

use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    AggregateVerdict, DateRange, EntitySanctionRecord, ProviderErrorNote, RiskRecord,
    SubjectIdentity, VesselStatus,
};

/// Everything the builder needs besides the verdict.
#[derive(Debug, Clone)]
pub struct RecordContext {
    pub identity: SubjectIdentity,
    pub date_range: DateRange,
    pub provider_errors: Vec<ProviderErrorNote>,
    pub vessel_status: VesselStatus,
    pub request_time: DateTime<Utc>,
}

pub struct RecordBuilder {
    descriptions: Arc<TieredDescriptions>,
}

impl RecordBuilder {
    pub fn new(descriptions: Arc<TieredDescriptions>) -> Self {
        Self { descriptions }
    }

    /// Fill `description`/`info` on every group and category verdict.
    pub async fn enrich(&self, verdict: &mut AggregateVerdict) {
        let groups = verdict
            .by_level
            .iter_mut()
            .chain(verdict.stakeholder.iter_mut());
        for group in groups {
            let entry = self
                .descriptions
                .describe(group.group.as_str(), group.level)
                .await;
            group.description = Some(entry.description);
            group.info = Some(entry.info);

            for item in group.items.iter_mut() {
                let entry = self
                    .descriptions
                    .describe(item.category.as_str(), item.level)
                    .await;
                item.description = Some(entry.description);
                item.info = Some(entry.info);
            }
        }
    }

    /// Describe every flag of an entity record.
    pub async fn enrich_entity(&self, record: &mut EntitySanctionRecord) {
        for flag in record.flags.iter_mut() {
            let entry = self
                .descriptions
                .describe(flag.kind.as_str(), flag.level.as_risk_level())
                .await;
            flag.description = Some(entry.description);
        }
    }

    /// Enrich the verdict and stamp a new record.
    pub async fn build(&self, mut verdict: AggregateVerdict, ctx: RecordContext) -> RiskRecord {
        self.enrich(&mut verdict).await;

        RiskRecord {
            record_id: Uuid::new_v4(),
            subject_id: ctx.identity.imo.clone(),
            subject_name: ctx.identity.display_name(),
            vessel_type: ctx.identity.vessel_type,
            flag: ctx.identity.flag,
            date_range: ctx.date_range.to_string(),
            verdict,
            provider_errors: ctx.provider_errors,
            vessel_status: ctx.vessel_status,
            request_time: ctx.request_time,
            response_time: Utc::now(),
        }
    }
}
