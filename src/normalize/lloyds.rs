//! Maritime-intelligence (provider A) adapters.
//!
//! Every provider-A document has the envelope
//! `{"IsSuccess": bool, "Data": {"Items": [...]}}`. A false or missing
//! success flag, or an empty item list, is "no data" and yields nothing.

use serde_json::{json, Value};

use super::path::{array_at, bool_at, f64_at, get_path, one_or_many, strings_at, text_at};
use super::timestamp::{normalize_tree, normalize_value, timestamp_at as time_at};
use super::vocabulary::{is_sanctioned_eez, RiskTypeTag, TagSet};
use crate::domain::{Category, ComplianceTier, Observation, Signal, SubjectIdentity};

/// Item list of a successful provider-A document.
pub fn items(doc: &Value) -> &[Value] {
    if !bool_at(doc, "IsSuccess") {
        return &[];
    }
    let upper = array_at(doc, "Data.Items");
    if upper.is_empty() {
        array_at(doc, "Data.items")
    } else {
        upper
    }
}

/// Vessel identity from the first voyage-events item.
///
/// `None` when the document carries no data; the pipeline treats that as
/// a missing primary fetch.
pub fn identity(doc: &Value, imo: &str) -> Option<SubjectIdentity> {
    let item = items(doc).first()?;
    Some(SubjectIdentity {
        imo: imo.to_string(),
        name: text_at(item, "VesselName"),
        vessel_type: text_at(item, "VesselType"),
        flag: text_at(item, "Flag"),
    })
}

/// Observations from the voyage-events document.
///
/// Emits a single `NoFindings` marker for `high_risk_port` when the vessel
/// has voyages but none of them called at a high-risk port.
pub fn voyage_observations(doc: &Value, imo: &str) -> Vec<Observation> {
    let Some(item) = items(doc).first() else {
        return Vec::new();
    };

    let mut out = Vec::new();
    let mut saw_high_risk_port = false;

    for voyage in array_at(item, "Voyages") {
        let tags = TagSet::of(voyage);
        let start = time_at(voyage, "VoyageStartTime");
        let end = time_at(voyage, "VoyageEndTime");

        if tags.contains(RiskTypeTag::HighRiskPortCalling) {
            saw_high_risk_port = true;
            out.push(
                observe(
                    Category::HighRiskPort,
                    imo,
                    json!({
                        "VoyageId": voyage.get("VoyageId").cloned().unwrap_or(Value::Null),
                        "VoyageRiskRating": voyage.get("VoyageRiskRating").cloned().unwrap_or(Value::Null),
                        "StartPlace": place(get_path(voyage, "VoyageStartPlace")),
                        "EndPlace": place(get_path(voyage, "VoyageEndPlace")),
                        "RiskTypes": strings_at(voyage, "RiskTypes"),
                    }),
                )
                .with_window(start.clone(), end.clone()),
            );
        }

        for gap in array_at(voyage, "VoyageEvents.AisGap") {
            out.extend(gap_observations(imo, &tags, gap));
        }

        if tags.contains(RiskTypeTag::StsWithSanctionedVessel) {
            for sts in array_at(voyage, "VoyageEvents.ShipToShipTransfer") {
                let counterparts: Vec<Value> = one_or_many(sts, "CounterpartVessel")
                    .into_iter()
                    .filter(|v| !same_imo(text_at(v, "VesselImo").as_deref(), imo))
                    .map(counterpart_detail)
                    .collect();
                // A transfer with no identifiable other vessel is not a sanctioned STS.
                let Some(subject) = counterparts.iter().find_map(|c| text_at(c, "VesselImo")) else {
                    continue;
                };
                out.push(
                    observe(
                        Category::SanctionedSts,
                        &subject,
                        json!({
                            "StsType": text_at(sts, "StsType"),
                            "VoyageStartTime": start,
                            "VoyageEndTime": end,
                            "CounterpartVessels": counterparts,
                        }),
                    )
                    .with_window(time_at(sts, "StartDateTime"), time_at(sts, "EndDateTime")),
                );
            }
        }

        if tags.any(RiskTypeTag::is_loitering) {
            for event in array_at(voyage, "VoyageEvents.Loitering") {
                if !TagSet::of(event).any(RiskTypeTag::is_loitering) {
                    continue;
                }
                out.push(
                    observe(
                        Category::Loitering,
                        imo,
                        json!({
                            "RiskTypes": strings_at(event, "RiskTypes"),
                            "DarkSTS": one_way_dark_sts(event),
                        }),
                    )
                    .with_window(time_at(event, "LoiteringStart"), time_at(event, "LoiteringEnd")),
                );
            }
        }
    }

    if !saw_high_risk_port {
        out.push(
            Observation::new(
                Category::HighRiskPort,
                imo,
                json!({"message": "no high-risk port voyages found"}),
            )
            .with_signal(Signal::NoFindings),
        );
    }

    out
}

fn gap_observations(imo: &str, voyage_tags: &TagSet, gap: &Value) -> Vec<Observation> {
    let gap_tags = TagSet::of(gap);
    let eez = text_at(gap, "AisGapStartEezName");
    let sanctioned_eez = eez.as_deref().map(is_sanctioned_eez);
    let start = time_at(gap, "AisGapStartDateTime");
    let end = time_at(gap, "AisGapEndDateTime");
    let mut out = Vec::new();

    let build = |category: Category, detail: Value| {
        observe(category, imo, detail)
            .with_window(start.clone(), end.clone())
            .with_sanctioned_eez(sanctioned_eez)
    };

    if gap_tags.contains(RiskTypeTag::PossibleDarkPortCalling) {
        let calls: Vec<Value> = array_at(gap, "ProbableHighRiskDarkPortCalls")
            .iter()
            .map(|call| place(get_path(call, "Port")))
            .collect();
        out.push(build(
            Category::DarkPort,
            json!({
                "RiskTypes": strings_at(gap, "RiskTypes"),
                "EezName": eez,
                "IsSanctionedEez": sanctioned_eez.unwrap_or(false),
                "DarkPortCalls": calls,
            }),
        ));
    }

    if voyage_tags.contains(RiskTypeTag::SuspiciousAisGap)
        && gap_tags.contains(RiskTypeTag::SuspiciousAisGap)
    {
        out.push(build(
            Category::SuspiciousAisGap,
            json!({
                "RiskTypes": strings_at(gap, "RiskTypes"),
                "EezName": eez,
                "IsSanctionedEez": sanctioned_eez.unwrap_or(false),
            }),
        ));
    }

    if voyage_tags.any(RiskTypeTag::is_dark_sts) && gap_tags.any(RiskTypeTag::is_dark_sts) {
        out.push(build(
            Category::DarkSts,
            json!({
                "RiskTypes": strings_at(gap, "RiskTypes"),
                "EezName": eez,
                "IsSanctionedEez": sanctioned_eez.unwrap_or(false),
                "OneWayDarkSts": one_way_dark_sts(gap),
                "TwoWayDarkSts": two_way_dark_sts(gap),
            }),
        ));
    }

    out
}

/// Current and historical vessel sanction entries (`vesselsanctions_v2`).
///
/// An entry whose `endDate` is blank, `"None"` or null is current. Entries
/// without a vessel or sanction name are dropped.
pub fn sanction_observations(doc: &Value, imo: &str) -> Vec<Observation> {
    items(doc)
        .iter()
        .filter_map(|item| {
            let row = get_path(item, "vesselSanctions")?;
            text_at(row, "vesselName").or_else(|| text_at(row, "name"))?;

            let end = time_at(row, "endDate");
            let category = if end.is_some() {
                Category::SanctionedVesselHistorical
            } else {
                Category::SanctionedVesselCurrent
            };
            Some(
                observe(
                    category,
                    text_at(row, "vesselImo").as_deref().unwrap_or(imo),
                    json!({
                        "SanctionId": row.get("sanctionId").cloned().unwrap_or(Value::Null),
                        "Source": text_at(row, "source"),
                        "Type": text_at(row, "type"),
                        "Program": text_at(row, "program"),
                        "Name": text_at(row, "name"),
                        "VesselName": text_at(row, "vesselName"),
                        "FirstPublished": time_field(row, "firstPublished"),
                        "LastPublished": time_field(row, "lastPublished"),
                        "StartDate": row.get("startDate").cloned().unwrap_or(Value::Null),
                        "EndDate": end,
                    }),
                )
                .with_window(time_at(row, "startDate"), end),
            )
        })
        .collect()
}

/// The 12-month stakeholder compliance score (`vesselriskscore`).
pub fn compliance_observations(doc: &Value, imo: &str) -> Vec<Observation> {
    let Some(item) = items(doc).first() else {
        return Vec::new();
    };

    let score = one_or_many(item, "RiskScores")
        .into_iter()
        .find(|s| f64_at(s, "RiskPeriodInMonths") == Some(12.0))
        .and_then(|s| f64_at(s, "TotalRiskScore"));
    let Some(score) = score else {
        return Vec::new();
    };

    let owners: Vec<Value> = array_at(item, "SanctionedOwners")
        .iter()
        .filter(|o| text_at(o, "CompanyName").is_some())
        .map(|o| {
            json!({
                "CompanyName": text_at(o, "CompanyName"),
                "CompanyImo": text_at(o, "CompanyImo"),
                "OwnershipTypes": strings_at(o, "OwnershipTypes"),
                "Country": text_at(o, "HeadOffice.Country").or_else(|| text_at(o, "Country")),
                "OwnershipStartDate": o.get("OwnershipStart").cloned().unwrap_or(Value::Null),
            })
        })
        .collect();

    vec![observe(
        Category::StakeholderCompliance,
        imo,
        json!({
            "RiskPeriodInMonths": 12,
            "TotalRiskScore": score,
            "VesselOwnershipContainsLinksToSanctionedEntities":
                bool_at(item, "VesselOwnershipContainsLinksToSanctionedEntities"),
            "SanctionedOwners": owners,
        }),
    )
    .with_signal(Signal::Score(score))]
}

/// AIS-manipulation risks (`vesseladvancedcompliancerisk_v3`), one per
/// `VesselAisManipulation` entry, each carrying its tier.
pub fn ais_manipulation_observations(doc: &Value, imo: &str) -> Vec<Observation> {
    let mut out = Vec::new();
    for item in items(doc) {
        for risk in array_at(item, "ComplianceRisks") {
            if text_at(risk, "ComplianceRiskType.Description").as_deref()
                != Some("VesselAisManipulation")
            {
                continue;
            }
            let tier_raw = text_at(risk, "ComplianceRiskScore");
            let details = array_at(risk, "Details");
            let indicators: Vec<String> = details
                .iter()
                .flat_map(|d| array_at(d, "RiskIndicators"))
                .filter_map(|ind| text_at(ind, "Description"))
                .collect();
            let places: Vec<Value> = details
                .iter()
                .filter_map(|d| get_path(d, "Place").cloned())
                .collect();

            out.push(
                observe(
                    Category::AisManipulation,
                    imo,
                    json!({
                        "ComplianceRiskScore": tier_raw,
                        "RiskIndicators": indicators,
                        "Places": places,
                    }),
                )
                .with_signal(Signal::Tier(
                    tier_raw.as_deref().and_then(ComplianceTier::parse),
                )),
            );
        }
    }
    out
}

/// Ship-to-ship counterparts (`vesselstspairings_v2`).
///
/// Each item lists the vessels in one STS activity. When the queried
/// vessel is listed first, every other listed vessel is a counterpart;
/// otherwise the first listed vessel is. The queried vessel itself is
/// never emitted.
pub fn sts_pairing_observations(doc: &Value, imo: &str) -> Vec<Observation> {
    let mut out = Vec::new();
    for item in items(doc) {
        let pairings = array_at(item, "VesselPairings");
        let Some(first) = pairings.first() else {
            continue;
        };

        let counterparts: &[Value] = if same_imo(text_at(first, "Imo").as_deref(), imo) {
            &pairings[1..]
        } else {
            &pairings[..1]
        };

        for vessel in counterparts {
            let Some(counterpart_imo) = text_at(vessel, "Imo") else {
                continue;
            };
            if same_imo(Some(&counterpart_imo), imo) {
                continue;
            }
            out.push(
                observe(
                    Category::StsPairing,
                    &counterpart_imo,
                    json!({
                        "VesselName": text_at(vessel, "VesselName"),
                        "RiskRating": vessel.get("RiskRating").cloned().unwrap_or(Value::Null),
                        "Flag": text_at(vessel, "Flag"),
                        "DwtTonnage": vessel.get("DwtTonnage").cloned().unwrap_or(Value::Null),
                        "VesselType": text_at(vessel, "VesselType"),
                        "StsType": text_at(vessel, "StsType"),
                        "DraftStart": vessel.get("DraftStart").cloned().unwrap_or(Value::Null),
                        "DraftEnd": vessel.get("DraftEnd").cloned().unwrap_or(Value::Null),
                        "SogStart": vessel.get("SogStart").cloned().unwrap_or(Value::Null),
                        "SogEnd": vessel.get("SogEnd").cloned().unwrap_or(Value::Null),
                        "ActivityAreaName": text_at(item, "ActivityAreaName"),
                        "ComplianceRiskScore": get_path(item, "ActivityRiskRating.ComplianceRiskScore").cloned().unwrap_or(Value::Null),
                        "ComplianceRiskReason": text_at(item, "ActivityRiskRating.ComplianceRiskReason"),
                        "NearestPlaceName": text_at(item, "NearestPlace.name"),
                        "NearestPlaceCountry": text_at(item, "NearestPlace.countryName"),
                    }),
                )
                .with_window(
                    time_at(item, "ActivityStartDate"),
                    time_at(item, "ActivityEndDate"),
                ),
            );
        }
    }
    out
}

fn observe(category: Category, subject_imo: &str, mut detail: Value) -> Observation {
    normalize_tree(&mut detail);
    Observation::new(category, subject_imo, detail)
}

/// Timestamp copied out of `node[key]` for a detail key the tree pass
/// would not recognise.
fn time_field(node: &Value, key: &str) -> Value {
    node.get(key).map(normalize_value).unwrap_or(Value::Null)
}

fn same_imo(candidate: Option<&str>, imo: &str) -> bool {
    candidate.map(str::trim) == Some(imo.trim())
}

fn place(node: Option<&Value>) -> Value {
    match node {
        Some(p) if p.is_object() => json!({
            "Name": text_at(p, "Name"),
            "CountryName": text_at(p, "CountryName"),
            "IsHighRiskPort": bool_at(p, "IsHighRiskPort"),
        }),
        _ => json!({"Name": null, "CountryName": null, "IsHighRiskPort": false}),
    }
}

fn one_way_dark_sts(node: &Value) -> Vec<Value> {
    array_at(node, "Probable1WDarkSts")
        .iter()
        .map(|sts| {
            json!({
                "Start": time_field(sts, "LoiteringStart"),
                "End": time_field(sts, "LoiteringEnd"),
                "VesselImo": text_at(sts, "VesselImo"),
                "VesselName": text_at(sts, "VesselName"),
                "VesselType": text_at(sts, "VesselType"),
                "RiskIndicators": sts.get("RiskIndicators").cloned().unwrap_or_else(|| json!([])),
                "RiskScore": sts.get("RiskScore").cloned().unwrap_or(Value::Null),
            })
        })
        .collect()
}

fn two_way_dark_sts(node: &Value) -> Vec<Value> {
    array_at(node, "Probable2WDarkSts")
        .iter()
        .map(|sts| {
            json!({
                "Start": time_field(sts, "GapStart"),
                "End": time_field(sts, "GapEnd"),
                "VesselImo": text_at(sts, "VesselImo"),
                "VesselName": text_at(sts, "VesselName"),
                "VesselType": text_at(sts, "VesselType"),
                "RiskIndicators": sts.get("RiskIndicators").cloned().unwrap_or_else(|| json!([])),
                "RiskScore": sts.get("RiskScore").cloned().unwrap_or(Value::Null),
            })
        })
        .collect()
}

fn counterpart_detail(vessel: &Value) -> Value {
    let sanctions: Vec<Value> = array_at(vessel, "VesselSanctions")
        .iter()
        .map(|s| {
            json!({
                "Source": text_at(s, "SanctionSource"),
                "Program": text_at(s, "SanctionProgram"),
                "StartDate": s.get("SanctionStartDate").cloned().unwrap_or(Value::Null),
                "EndDate": s.get("SanctionEndDate").cloned().unwrap_or(Value::Null),
            })
        })
        .collect();
    let owners: Vec<Value> = array_at(vessel, "SanctionedOwners")
        .iter()
        .filter(|o| text_at(o, "CompanyName").is_some())
        .map(|o| {
            json!({
                "CompanyName": text_at(o, "CompanyName"),
                "OwnershipTypes": strings_at(o, "OwnershipTypes"),
                "StartDate": o.get("OwnershipStart").cloned().unwrap_or(Value::Null),
                "HeadOffice": text_at(o, "HeadOfficeTown"),
            })
        })
        .collect();

    json!({
        "VesselImo": text_at(vessel, "VesselImo"),
        "VesselName": text_at(vessel, "VesselName"),
        "VesselType": text_at(vessel, "VesselType"),
        "IsVesselSanctioned": bool_at(vessel, "IsVesselSanctioned"),
        "IsVesselOwnershipLinkedToSanctionedEntities":
            bool_at(vessel, "IsVesselOwnershipLinkedToSanctionedEntities"),
        "RiskIndicators": vessel.get("RiskIndicators").cloned().unwrap_or_else(|| json!([])),
        "RiskScore": vessel.get("RiskScore").cloned().unwrap_or(Value::Null),
        "VesselSanctions": sanctions,
        "SanctionedOwners": owners,
    })
}
