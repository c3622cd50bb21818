//! Property-based tests using proptest.
//!
//! These tests verify invariants that should hold for any valid input.

use proptest::prelude::*;
use serde_json::json;

use vessel_risk_engine::aggregate::aggregate;
use vessel_risk_engine::classify::{classify, classify_all, score_level};
use vessel_risk_engine::domain::{
    Category, ComplianceTier, DisplayGroup, EntityRiskLevel, EntitySanctionRow, Observation, RiskLevel, Rule,
    Signal,
};
use vessel_risk_engine::normalize::{lloyds, timestamp};

// ============================================================================
// Custom Strategies
// ============================================================================

fn arb_category() -> impl Strategy<Value = Category> {
    prop::sample::select(Category::ALL.to_vec())
}

fn arb_level() -> impl Strategy<Value = RiskLevel> {
    prop::sample::select(RiskLevel::ALL.to_vec())
}

fn arb_tier() -> impl Strategy<Value = Option<ComplianceTier>> {
    prop_oneof![
        Just(None),
        Just(Some(ComplianceTier::Low)),
        Just(Some(ComplianceTier::Medium)),
        Just(Some(ComplianceTier::High)),
    ]
}

fn arb_signal() -> impl Strategy<Value = Signal> {
    prop_oneof![
        3 => Just(Signal::Presence),
        1 => Just(Signal::NoFindings),
        2 => (0.0f64..100.0).prop_map(Signal::Score),
        2 => arb_tier().prop_map(Signal::Tier),
    ]
}

fn arb_observation() -> impl Strategy<Value = Observation> {
    (arb_category(), arb_signal(), "[0-9]{7}").prop_map(|(category, signal, imo)| {
        Observation::new(category, imo, json!({})).with_signal(signal)
    })
}

fn arb_observations() -> impl Strategy<Value = Vec<Observation>> {
    prop::collection::vec(arb_observation(), 0..40)
}

/// Sanction names: real names, blanks and the provider's null spellings.
fn arb_name() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        Just(Some("   ".to_string())),
        Just(Some("null".to_string())),
        Just(Some("None".to_string())),
        "[A-Z][A-Z ]{2,20}".prop_map(Some),
    ]
}

fn is_real_name(name: &Option<String>) -> bool {
    name.as_deref()
        .map(str::trim)
        .is_some_and(|n| !n.is_empty() && n != "null" && n != "None")
}

// ============================================================================
// Classification
// ============================================================================

proptest! {
    /// Evidence is empty exactly when the level is none.
    #[test]
    fn prop_evidence_empty_iff_none(observations in arb_observations()) {
        for verdict in classify_all(&observations) {
            prop_assert_eq!(verdict.level == RiskLevel::None, verdict.evidence.is_empty());
            prop_assert!(verdict.evidence.iter().all(|o| o.category == verdict.category));
            prop_assert!(verdict.evidence.iter().all(|o| !o.is_marker()));
        }
    }

    /// Same input, same verdicts.
    #[test]
    fn prop_classification_is_deterministic(observations in arb_observations()) {
        prop_assert_eq!(classify_all(&observations), classify_all(&observations));
    }

    /// Adding evidence never lowers a category's level.
    #[test]
    fn prop_level_is_monotonic(
        observations in arb_observations(),
        extra in arb_observation(),
    ) {
        let before = classify(extra.category, &observations).level;
        let mut more = observations.clone();
        more.push(extra.clone());
        let after = classify(extra.category, &more).level;
        prop_assert!(after >= before);
    }

    /// Presence categories ignore the signal payload.
    #[test]
    fn prop_presence_rules_fixed_level(observation in arb_observation()) {
        let verdict = classify(observation.category, std::slice::from_ref(&observation));
        let expected = match (observation.category.rule(), observation.is_marker()) {
            (_, true) => Some(RiskLevel::None),
            (Rule::PresenceHigh | Rule::PresenceHighWithMarker, false) => Some(RiskLevel::High),
            (Rule::PresenceMedium, false) => Some(RiskLevel::Medium),
            (Rule::Scored | Rule::Tiered, false) => None,
        };
        if let Some(expected) = expected {
            prop_assert_eq!(verdict.level, expected);
        }
    }

    /// Score thresholds: above 80 high, 60 through 80 medium.
    #[test]
    fn prop_score_boundaries(score in -10.0f64..150.0) {
        let level = score_level(score);
        if score > 80.0 {
            prop_assert_eq!(level, RiskLevel::High);
        } else if score >= 60.0 {
            prop_assert_eq!(level, RiskLevel::Medium);
        } else {
            prop_assert_eq!(level, RiskLevel::None);
        }
    }

    /// Low and blank tiers are never evidence.
    #[test]
    fn prop_low_tiers_are_not_evidence(tiers in prop::collection::vec(arb_tier(), 0..10)) {
        let observations: Vec<Observation> = tiers
            .iter()
            .map(|t| {
                Observation::new(Category::AisManipulation, "1", json!({}))
                    .with_signal(Signal::Tier(*t))
            })
            .collect();
        let verdict = classify(Category::AisManipulation, &observations);

        let expected = RiskLevel::max_of(tiers.iter().map(|t| match t {
            Some(ComplianceTier::High) => RiskLevel::High,
            Some(ComplianceTier::Medium) => RiskLevel::Medium,
            _ => RiskLevel::None,
        }));
        prop_assert_eq!(verdict.level, expected);
        for obs in &verdict.evidence {
            prop_assert!(matches!(
                obs.signal,
                Signal::Tier(Some(ComplianceTier::Medium | ComplianceTier::High))
            ));
        }
    }
}

// ============================================================================
// Aggregation
// ============================================================================

proptest! {
    /// The overall level is the maximum category level.
    #[test]
    fn prop_overall_is_max(observations in arb_observations()) {
        let verdicts = classify_all(&observations);
        let aggregate = aggregate("1234567", &verdicts);
        let max = RiskLevel::max_of(verdicts.iter().map(|v| v.level));
        prop_assert_eq!(aggregate.overall_level, max);
    }

    /// Every category lands in exactly one group, in the bucket of its group's level.
    #[test]
    fn prop_groups_partition_categories(observations in arb_observations()) {
        let aggregate = aggregate("1234567", &classify_all(&observations));

        let mut seen: Vec<Category> = aggregate.category_verdicts().map(|v| v.category).collect();
        seen.sort();
        prop_assert_eq!(seen, Category::ALL.to_vec());

        for level in RiskLevel::ALL {
            for group in aggregate.by_level.get(level) {
                prop_assert_eq!(group.level, level);
                if group.group != DisplayGroup::SanctionsList {
                    prop_assert_eq!(group.level, RiskLevel::max_of(group.items.iter().map(|v| v.level)));
                }
            }
        }
    }

    /// `max_of` agrees with the derived ordering.
    #[test]
    fn prop_max_of_matches_ord(levels in prop::collection::vec(arb_level(), 0..8)) {
        let expected = levels.iter().copied().max().unwrap_or(RiskLevel::None);
        prop_assert_eq!(RiskLevel::max_of(levels), expected);
    }
}

// ============================================================================
// Normalization
// ============================================================================

proptest! {
    /// Sanction entries without a vessel or sanction name never become observations.
    #[test]
    fn prop_nameless_sanctions_dropped(
        names in prop::collection::vec((arb_name(), arb_name()), 0..12),
    ) {
        let items: Vec<_> = names
            .iter()
            .map(|(vessel_name, name)| json!({"vesselSanctions": {
                "vesselName": vessel_name, "name": name, "endDate": null
            }}))
            .collect();
        let doc = json!({"IsSuccess": true, "Data": {"items": items}});

        let expected = names
            .iter()
            .filter(|(v, n)| is_real_name(v) || is_real_name(n))
            .count();
        prop_assert_eq!(lloyds::sanction_observations(&doc, "1").len(), expected);
    }

    /// Normalized timestamps are stable under a second pass.
    #[test]
    fn prop_timestamp_normalization_idempotent(
        y in 1990i32..2100, mo in 1u32..=12, d in 1u32..=28,
        h in 0u32..24, mi in 0u32..60, s in 0u32..60,
        frac in prop::option::of(0u32..1000),
        zulu in any::<bool>(),
    ) {
        let mut raw = format!("{y:04}-{mo:02}-{d:02}T{h:02}:{mi:02}:{s:02}");
        if let Some(frac) = frac {
            raw.push_str(&format!(".{frac:03}"));
        }
        if zulu {
            raw.push('Z');
        }
        let once = timestamp::normalize_str(&raw);
        prop_assert_eq!(&once, &format!("{y:04}-{mo:02}-{d:02} {h:02}:{mi:02}:{s:02}"));
        prop_assert_eq!(timestamp::normalize_str(&once), once);
    }
}

// ============================================================================
// Entity classification
// ============================================================================

fn arb_row() -> impl Strategy<Value = EntitySanctionRow> {
    (
        prop_oneof![
            Just(None),
            Just(Some("SAN".to_string())),
            Just(Some("SCO-high".to_string())),
            Just(Some("SCO-medium".to_string())),
            Just(Some("OOL".to_string())),
            Just(Some("OTHER".to_string())),
        ],
        arb_name(),
        prop_oneof![
            Just(None),
            Just(Some("2024-05-01".to_string())),
            Just(Some("2010-Jan-05".to_string())),
            Just(Some("garbage".to_string())),
        ],
        prop_oneof![
            Just(None),
            Just(Some("Iran".to_string())),
            Just(Some("Panama".to_string())),
        ],
    )
        .prop_map(|(level_tag, sanctions_name, registration_date, registration_country)| {
            EntitySanctionRow {
                entity_id: "E1".into(),
                level_tag,
                sanctions_name,
                registration_date,
                registration_country,
                ..Default::default()
            }
        })
}

proptest! {
    /// The entity level is the max over flags; undetermined flags never raise it.
    #[test]
    fn prop_entity_level_is_max_of_flags(rows in prop::collection::vec(arb_row(), 0..8)) {
        let today = chrono::NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let record = vessel_risk_engine::classify::classify_entity("E1", &rows, today);

        prop_assert_eq!(record.flags.len(), 5);
        let expected = RiskLevel::max_of(record.flags.iter().map(|f| f.level.as_risk_level()));
        prop_assert_eq!(record.level, expected);

        for flag in &record.flags {
            let undetermined = flag.level == EntityRiskLevel::Undetermined;
            prop_assert_eq!(undetermined, record.undetermined.contains(&flag.kind));
        }
    }
}
