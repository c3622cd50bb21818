//! Cross-category aggregation.
//!
//! Folds category verdicts into display groups, buckets the groups by
//! level and computes the overall level as the plain maximum.

use crate::domain::{
    AggregateVerdict, Category, CategoryVerdict, DisplayGroup, DisplayGroupVerdict, LevelBuckets,
    RiskLevel,
};

/// Level of a display group from its member verdicts.
pub fn group_level(group: DisplayGroup, items: &[CategoryVerdict]) -> RiskLevel {
    let level_of = |category: Category| {
        items
            .iter()
            .find(|v| v.category == category)
            .map(|v| v.level)
            .unwrap_or_default()
    };

    match group {
        // Any current listing is high, otherwise any historical one is medium.
        DisplayGroup::SanctionsList => {
            if level_of(Category::SanctionedVesselCurrent) == RiskLevel::High {
                RiskLevel::High
            } else if level_of(Category::SanctionedVesselHistorical) > RiskLevel::None {
                RiskLevel::Medium
            } else {
                RiskLevel::None
            }
        }
        _ => RiskLevel::max_of(items.iter().map(|v| v.level)),
    }
}

/// Build the display group for `group` from a full verdict list.
pub fn build_group(group: DisplayGroup, verdicts: &[CategoryVerdict]) -> DisplayGroupVerdict {
    let items: Vec<CategoryVerdict> = group
        .members()
        .map(|category| {
            verdicts
                .iter()
                .find(|v| v.category == category)
                .cloned()
                .unwrap_or_else(|| CategoryVerdict::none(category))
        })
        .collect();

    DisplayGroupVerdict {
        group,
        title: group.title().to_string(),
        level: group_level(group, &items),
        items,
        description: None,
        info: None,
    }
}

/// Aggregate category verdicts for one subject.
///
/// Categories missing from `verdicts` count as none. The overall level is
/// the maximum over all categories, the relocated stakeholder group
/// included.
pub fn aggregate(subject_id: &str, verdicts: &[CategoryVerdict]) -> AggregateVerdict {
    let overall_level = RiskLevel::max_of(verdicts.iter().map(|v| v.level));

    let mut by_level = LevelBuckets::default();
    let mut stakeholder = None;

    for group in DisplayGroup::ALL {
        let built = build_group(group, verdicts);
        if group == DisplayGroup::StakeholderSanctions {
            stakeholder = Some(built);
        } else {
            by_level.get_mut(built.level).push(built);
        }
    }

    AggregateVerdict {
        subject_id: subject_id.to_string(),
        overall_level,
        by_level,
        stakeholder,
    }
}
