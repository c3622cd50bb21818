//! Category risk classification.
//!
//! Pure functions from observations to verdicts. The same input always
//! yields the same verdict; nothing here touches I/O or globals.

use chrono::NaiveDate;
use serde_json::json;

use crate::domain::{
    Category, CategoryVerdict, ComplianceTier, EntityFlag, EntityFlagKind, EntityRiskLevel,
    EntitySanctionRecord, EntitySanctionRow, Observation, RiskLevel, Rule, Signal,
};
use crate::normalize::entity::{
    entity_name, listing_evidence, listing_tag, parse_registration_date, present, ListingTag,
};
use crate::normalize::vocabulary::is_sanctioned_country;

/// Scores strictly above this are high.
pub const SCORE_HIGH_ABOVE: f64 = 80.0;
/// Scores at or above this (and not high) are medium.
pub const SCORE_MEDIUM_FROM: f64 = 60.0;

/// Registrations younger than this many days raise `is_one_year`.
pub const RECENT_REGISTRATION_DAYS: i64 = 365;

/// Map a compliance score to a level: `> 80` high, `60..=80` medium.
pub fn score_level(score: f64) -> RiskLevel {
    if score > SCORE_HIGH_ABOVE {
        RiskLevel::High
    } else if score >= SCORE_MEDIUM_FROM {
        RiskLevel::Medium
    } else {
        RiskLevel::None
    }
}

fn tier_level(tier: Option<ComplianceTier>) -> RiskLevel {
    match tier {
        Some(ComplianceTier::High) => RiskLevel::High,
        Some(ComplianceTier::Medium) => RiskLevel::Medium,
        Some(ComplianceTier::Low) | None => RiskLevel::None,
    }
}

/// Level a single observation contributes under `rule`.
fn observation_level(rule: Rule, obs: &Observation) -> RiskLevel {
    if obs.is_marker() {
        return RiskLevel::None;
    }
    match (rule, obs.signal) {
        (Rule::PresenceHigh | Rule::PresenceHighWithMarker, _) => RiskLevel::High,
        (Rule::PresenceMedium, _) => RiskLevel::Medium,
        (Rule::Scored, Signal::Score(score)) => score_level(score),
        (Rule::Tiered, Signal::Tier(tier)) => tier_level(tier),
        (Rule::Scored | Rule::Tiered, _) => RiskLevel::None,
    }
}

/// Classify one category from the observations collected for a subject.
///
/// Observations tagged with other categories are ignored. Evidence holds
/// every observation that contributed a non-none level.
pub fn classify(category: Category, observations: &[Observation]) -> CategoryVerdict {
    let rule = category.rule();
    let mut level = RiskLevel::None;
    let mut evidence = Vec::new();

    for obs in observations.iter().filter(|o| o.category == category) {
        let contributed = observation_level(rule, obs);
        if contributed > RiskLevel::None {
            level = level.max(contributed);
            evidence.push(obs.clone());
        }
    }

    CategoryVerdict::new(category, level, evidence)
}

/// Classify every category, in canonical order.
pub fn classify_all(observations: &[Observation]) -> Vec<CategoryVerdict> {
    Category::ALL
        .iter()
        .map(|&category| classify(category, observations))
        .collect()
}

/// Classify an entity from its sanction rows against `reference_date`.
pub fn classify_entity(
    entity_id: &str,
    rows: &[EntitySanctionRow],
    reference_date: NaiveDate,
) -> EntitySanctionRecord {
    let tagged: Vec<(ListingTag, &EntitySanctionRow)> = rows
        .iter()
        .filter_map(|row| listing_tag(row).map(|tag| (tag, row)))
        .collect();
    let rows_with = |tag: ListingTag| -> Vec<&EntitySanctionRow> {
        tagged
            .iter()
            .filter(|(t, _)| *t == tag)
            .map(|(_, r)| *r)
            .collect()
    };

    let san = rows_with(ListingTag::San);
    let sco_high = rows_with(ListingTag::ScoHigh);
    let sco_medium = rows_with(ListingTag::ScoMedium);
    let ool = rows_with(ListingTag::Ool);

    let mut flags = vec![
        listing_flag(EntityFlagKind::IsSan, EntityRiskLevel::High, &san),
        if sco_high.is_empty() {
            listing_flag(EntityFlagKind::IsSco, EntityRiskLevel::Medium, &sco_medium)
        } else {
            listing_flag(EntityFlagKind::IsSco, EntityRiskLevel::High, &sco_high)
        },
        listing_flag(EntityFlagKind::IsOol, EntityRiskLevel::Medium, &ool),
    ];
    flags.push(registration_age_flag(rows, reference_date));
    flags.push(registration_country_flag(rows));

    let level = RiskLevel::max_of(flags.iter().map(|f| f.level.as_risk_level()));
    let undetermined = flags
        .iter()
        .filter(|f| f.level == EntityRiskLevel::Undetermined)
        .map(|f| f.kind)
        .collect();

    EntitySanctionRecord {
        entity_id: entity_id.to_string(),
        name: entity_name(rows).unwrap_or_else(|| entity_id.to_string()),
        flags,
        level,
        undetermined,
    }
}

fn listing_flag(
    kind: EntityFlagKind,
    level_when_listed: EntityRiskLevel,
    rows: &[&EntitySanctionRow],
) -> EntityFlag {
    let mut evidence: Vec<serde_json::Value> = Vec::new();
    for row in rows {
        let entry = listing_evidence(row);
        if !evidence.contains(&entry) {
            evidence.push(entry);
        }
    }
    let level = if evidence.is_empty() {
        EntityRiskLevel::None
    } else {
        level_when_listed
    };
    EntityFlag {
        kind,
        level,
        evidence,
        description: None,
    }
}

fn registration_age_flag(rows: &[EntitySanctionRow], reference_date: NaiveDate) -> EntityFlag {
    let raw = rows.iter().find_map(|r| present(&r.registration_date));
    let (level, evidence) = match raw.map(|s| (s, parse_registration_date(s))) {
        None => (EntityRiskLevel::Undetermined, Vec::new()),
        Some((s, None)) => (
            EntityRiskLevel::Undetermined,
            vec![json!({"registration_date": s})],
        ),
        Some((s, Some(date))) => {
            if (reference_date - date).num_days() <= RECENT_REGISTRATION_DAYS {
                (
                    EntityRiskLevel::Medium,
                    vec![json!({"registration_date": s})],
                )
            } else {
                (EntityRiskLevel::None, Vec::new())
            }
        }
    };
    EntityFlag {
        kind: EntityFlagKind::IsOneYear,
        level,
        evidence,
        description: None,
    }
}

fn registration_country_flag(rows: &[EntitySanctionRow]) -> EntityFlag {
    let country = rows.iter().find_map(|r| present(&r.registration_country));
    let (level, evidence) = match country {
        None => (EntityRiskLevel::Undetermined, Vec::new()),
        Some(c) if is_sanctioned_country(c) => (
            EntityRiskLevel::Medium,
            vec![json!({"registration_country": c})],
        ),
        Some(_) => (EntityRiskLevel::None, Vec::new()),
    };
    EntityFlag {
        kind: EntityFlagKind::IsSanctionedCountries,
        level,
        evidence,
        description: None,
    }
}
