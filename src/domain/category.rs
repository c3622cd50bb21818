//! Risk taxonomy: categories, display groups and data sources.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which upstream produced an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Maritime-intelligence API (voyages, sanctions, compliance scores).
    ProviderA,
    /// Commodity-tracking API (cargo, trades, operational risks).
    ProviderB,
    /// Static vessel watch list.
    WatchList,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::ProviderA => "provider_a",
            Source::ProviderB => "provider_b",
            Source::WatchList => "watch_list",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a category turns its evidence into a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Any evidence → `high`.
    PresenceHigh,
    /// Any evidence → `medium`.
    PresenceMedium,
    /// Numeric score thresholds.
    Scored,
    /// Provider tier strings (`High`/`Medium`/`Low`).
    Tiered,
    /// Presence → `high`, with a "no findings" marker that classifies as none.
    PresenceHighWithMarker,
}

/// One risk check item.
///
/// Variant order is the canonical display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    StakeholderCompliance,
    SanctionedCompany,
    SanctionedVesselCurrent,
    SanctionedVesselHistorical,
    UaniListed,
    SanctionedCargo,
    SanctionedTrade,
    SanctionedFlag,
    HighRiskPort,
    PortCall,
    SanctionedSts,
    StsPairing,
    StsEvent,
    DarkSts,
    DarkStsEvent,
    SuspiciousAisGap,
    AisGap,
    AisManipulation,
    AisSpoof,
    DarkPort,
    Loitering,
}

impl Category {
    pub const ALL: [Category; 21] = [
        Category::StakeholderCompliance,
        Category::SanctionedCompany,
        Category::SanctionedVesselCurrent,
        Category::SanctionedVesselHistorical,
        Category::UaniListed,
        Category::SanctionedCargo,
        Category::SanctionedTrade,
        Category::SanctionedFlag,
        Category::HighRiskPort,
        Category::PortCall,
        Category::SanctionedSts,
        Category::StsPairing,
        Category::StsEvent,
        Category::DarkSts,
        Category::DarkStsEvent,
        Category::SuspiciousAisGap,
        Category::AisGap,
        Category::AisManipulation,
        Category::AisSpoof,
        Category::DarkPort,
        Category::Loitering,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::StakeholderCompliance => "stakeholder_compliance",
            Category::SanctionedCompany => "sanctioned_company",
            Category::SanctionedVesselCurrent => "sanctioned_vessel_current",
            Category::SanctionedVesselHistorical => "sanctioned_vessel_historical",
            Category::UaniListed => "uani_listed",
            Category::SanctionedCargo => "sanctioned_cargo",
            Category::SanctionedTrade => "sanctioned_trade",
            Category::SanctionedFlag => "sanctioned_flag",
            Category::HighRiskPort => "high_risk_port",
            Category::PortCall => "port_call",
            Category::SanctionedSts => "sanctioned_sts",
            Category::StsPairing => "sts_pairing",
            Category::StsEvent => "sts_event",
            Category::DarkSts => "dark_sts",
            Category::DarkStsEvent => "dark_sts_event",
            Category::SuspiciousAisGap => "suspicious_ais_gap",
            Category::AisGap => "ais_gap",
            Category::AisManipulation => "ais_manipulation",
            Category::AisSpoof => "ais_spoof",
            Category::DarkPort => "dark_port",
            Category::Loitering => "loitering",
        }
    }

    pub fn source(&self) -> Source {
        match self {
            Category::SanctionedCompany
            | Category::SanctionedCargo
            | Category::SanctionedTrade
            | Category::SanctionedFlag
            | Category::PortCall
            | Category::StsEvent
            | Category::DarkStsEvent
            | Category::AisGap
            | Category::AisSpoof => Source::ProviderB,
            Category::UaniListed => Source::WatchList,
            _ => Source::ProviderA,
        }
    }

    pub fn rule(&self) -> Rule {
        match self {
            Category::StakeholderCompliance => Rule::Scored,
            Category::AisManipulation => Rule::Tiered,
            Category::HighRiskPort => Rule::PresenceHighWithMarker,
            Category::SanctionedCompany
            | Category::SanctionedVesselCurrent
            | Category::UaniListed
            | Category::SanctionedCargo
            | Category::SanctionedTrade
            | Category::SanctionedFlag
            | Category::PortCall
            | Category::SanctionedSts => Rule::PresenceHigh,
            Category::SanctionedVesselHistorical
            | Category::StsPairing
            | Category::StsEvent
            | Category::DarkSts
            | Category::DarkStsEvent
            | Category::SuspiciousAisGap
            | Category::AisGap
            | Category::AisSpoof
            | Category::DarkPort
            | Category::Loitering => Rule::PresenceMedium,
        }
    }

    pub fn group(&self) -> DisplayGroup {
        match self {
            Category::StakeholderCompliance | Category::SanctionedCompany => {
                DisplayGroup::StakeholderSanctions
            }
            Category::SanctionedVesselCurrent | Category::SanctionedVesselHistorical => {
                DisplayGroup::SanctionsList
            }
            Category::UaniListed => DisplayGroup::WatchList,
            Category::SanctionedCargo => DisplayGroup::SanctionedCargo,
            Category::SanctionedTrade => DisplayGroup::SanctionedTrade,
            Category::SanctionedFlag => DisplayGroup::SanctionedFlag,
            Category::HighRiskPort | Category::PortCall => DisplayGroup::PortCalls,
            Category::SanctionedSts | Category::StsPairing | Category::StsEvent => {
                DisplayGroup::StsTransfer
            }
            Category::DarkSts | Category::DarkStsEvent => DisplayGroup::DarkSts,
            Category::SuspiciousAisGap | Category::AisGap => DisplayGroup::AisGap,
            Category::AisManipulation | Category::AisSpoof => DisplayGroup::AisSpoofing,
            Category::DarkPort => DisplayGroup::DarkPort,
            Category::Loitering => DisplayGroup::Loitering,
        }
    }

    /// Categories fed by a given source.
    pub fn from_source(source: Source) -> impl Iterator<Item = Category> {
        Category::ALL
            .into_iter()
            .filter(move |c| c.source() == source)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A presentation group that merges related categories from both providers.
///
/// Variant order is the canonical display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayGroup {
    StakeholderSanctions,
    SanctionsList,
    WatchList,
    SanctionedCargo,
    SanctionedTrade,
    SanctionedFlag,
    PortCalls,
    StsTransfer,
    DarkSts,
    AisGap,
    AisSpoofing,
    DarkPort,
    Loitering,
}

impl DisplayGroup {
    pub const ALL: [DisplayGroup; 13] = [
        DisplayGroup::StakeholderSanctions,
        DisplayGroup::SanctionsList,
        DisplayGroup::WatchList,
        DisplayGroup::SanctionedCargo,
        DisplayGroup::SanctionedTrade,
        DisplayGroup::SanctionedFlag,
        DisplayGroup::PortCalls,
        DisplayGroup::StsTransfer,
        DisplayGroup::DarkSts,
        DisplayGroup::AisGap,
        DisplayGroup::AisSpoofing,
        DisplayGroup::DarkPort,
        DisplayGroup::Loitering,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayGroup::StakeholderSanctions => "stakeholder_sanctions",
            DisplayGroup::SanctionsList => "sanctions_list",
            DisplayGroup::WatchList => "watch_list",
            DisplayGroup::SanctionedCargo => "sanctioned_cargo",
            DisplayGroup::SanctionedTrade => "sanctioned_trade",
            DisplayGroup::SanctionedFlag => "sanctioned_flag",
            DisplayGroup::PortCalls => "port_calls",
            DisplayGroup::StsTransfer => "sts_transfer",
            DisplayGroup::DarkSts => "dark_sts",
            DisplayGroup::AisGap => "ais_gap",
            DisplayGroup::AisSpoofing => "ais_spoofing",
            DisplayGroup::DarkPort => "dark_port",
            DisplayGroup::Loitering => "loitering",
        }
    }

    /// Human-readable title used in grouped output.
    pub fn title(&self) -> &'static str {
        match self {
            DisplayGroup::StakeholderSanctions => "Vessel stakeholder sanctions",
            DisplayGroup::SanctionsList => "Vessel on sanctions lists",
            DisplayGroup::WatchList => "Vessel on UANI watch list",
            DisplayGroup::SanctionedCargo => "Sanctioned cargo carried",
            DisplayGroup::SanctionedTrade => "Sanctioned trade involvement",
            DisplayGroup::SanctionedFlag => "Sanctioned flag",
            DisplayGroup::PortCalls => "High-risk port calls",
            DisplayGroup::StsTransfer => "Non-compliant STS transfers",
            DisplayGroup::DarkSts => "Dark STS events",
            DisplayGroup::AisGap => "AIS signal gaps",
            DisplayGroup::AisSpoofing => "AIS spoofing and manipulation",
            DisplayGroup::DarkPort => "Dark port calls",
            DisplayGroup::Loitering => "Suspicious loitering",
        }
    }

    /// Member categories in canonical order.
    pub fn members(&self) -> impl Iterator<Item = Category> + '_ {
        Category::ALL.into_iter().filter(move |c| c.group() == *self)
    }
}

impl fmt::Display for DisplayGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_in_display_order() {
        let mut sorted = Category::ALL;
        sorted.sort();
        assert_eq!(sorted, Category::ALL);
    }

    #[test]
    fn test_every_group_has_members() {
        for group in DisplayGroup::ALL {
            assert!(group.members().count() > 0, "{group} has no members");
        }
        let mut sorted = DisplayGroup::ALL;
        sorted.sort();
        assert_eq!(sorted, DisplayGroup::ALL);
    }

    #[test]
    fn test_stakeholder_group_spans_both_providers() {
        let sources: Vec<_> = DisplayGroup::StakeholderSanctions
            .members()
            .map(|c| c.source())
            .collect();
        assert!(sources.contains(&Source::ProviderA));
        assert!(sources.contains(&Source::ProviderB));
    }

    #[test]
    fn test_category_serde_matches_as_str() {
        for category in Category::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
    }
}
