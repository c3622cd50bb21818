//! Commodity-tracker (provider B) adapter.
//!
//! The vessel-risks endpoint returns an array with one element per
//! requested vessel, each carrying `compliance.sanctionRisks` and
//! `compliance.operationalRisks` lists.

use serde_json::Value;

use super::path::{array_at, str_at, text_at};
use super::timestamp::{normalize_tree, timestamp_at as time_at};
use crate::domain::{Category, Observation};

/// List path and category for each provider-B risk list.
const RISK_LISTS: [(&str, Category); 9] = [
    ("compliance.sanctionRisks.sanctionedCargo", Category::SanctionedCargo),
    ("compliance.sanctionRisks.sanctionedTrades", Category::SanctionedTrade),
    ("compliance.sanctionRisks.sanctionedFlag", Category::SanctionedFlag),
    ("compliance.sanctionRisks.sanctionedCompanies", Category::SanctionedCompany),
    ("compliance.operationalRisks.portCalls", Category::PortCall),
    ("compliance.operationalRisks.stsEvents", Category::StsEvent),
    ("compliance.operationalRisks.aisGaps", Category::AisGap),
    ("compliance.operationalRisks.aisSpoofs", Category::AisSpoof),
    ("compliance.operationalRisks.darkStsEvents", Category::DarkStsEvent),
];

/// The element describing `imo`. Elements for other vessels are never used.
pub fn vessel_entry<'a>(doc: &'a Value, imo: &str) -> Option<&'a Value> {
    let entries = match doc {
        Value::Array(items) => items.as_slice(),
        other => array_at(other, "data"),
    };
    entries
        .iter()
        .find(|e| str_at(e, "vessel.imo").as_deref().map(str::trim) == Some(imo.trim()))
}

/// Whether the response carried an element for the vessel at all.
pub fn vessel_found(doc: &Value, imo: &str) -> bool {
    vessel_entry(doc, imo).is_some()
}

pub fn observations(doc: &Value, imo: &str) -> Vec<Observation> {
    let Some(entry) = vessel_entry(doc, imo) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for (path, category) in RISK_LISTS {
        for item in array_at(entry, path) {
            if category == Category::SanctionedCompany && text_at(item, "name").is_none() {
                continue;
            }
            let (start, end) = window(item);
            let mut detail = item.clone();
            normalize_tree(&mut detail);
            out.push(Observation::new(category, imo, detail).with_window(start, end));
        }
    }
    out
}

fn window(item: &Value) -> (Option<String>, Option<String>) {
    let start = time_at(item, "startDate")
        .or_else(|| time_at(item, "vesselFlagStartDate"))
        .or_else(|| time_at(item, "date"))
        .or_else(|| time_at(item, "source.startDate"));
    let end = time_at(item, "endDate")
        .or_else(|| time_at(item, "vesselFlagEndDate"))
        .or_else(|| time_at(item, "source.endDate"));
    (start, end)
}
