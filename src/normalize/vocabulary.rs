//! Controlled vocabularies for provider risk-type tags and geofences.
//!
//! Raw provider strings are matched here and nowhere else.

use serde_json::Value;

/// Risk-type tags that the maritime-intelligence provider attaches to
/// voyages and voyage sub-events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiskTypeTag {
    HighRiskPortCalling,
    PossibleDarkPortCalling,
    SuspiciousAisGap,
    OneWayDarkStsAsDarkParty,
    TwoWayDarkStsAsDarkParty,
    StsWithSanctionedVessel,
    SuspiciousLoitering,
    OneWayDarkStsAsNonDarkParty,
}

impl RiskTypeTag {
    /// Match a literal provider tag. Unknown tags yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "High Risk Port Calling" => Some(RiskTypeTag::HighRiskPortCalling),
            // The provider has shipped both spellings.
            "Possible Dark Port Calling" | "probable Dark Port Callin" => {
                Some(RiskTypeTag::PossibleDarkPortCalling)
            }
            "Suspicious AIS Gap" => Some(RiskTypeTag::SuspiciousAisGap),
            "Possible 1-way Dark STS (as dark party)" => {
                Some(RiskTypeTag::OneWayDarkStsAsDarkParty)
            }
            "Possible 2-way Dark STS (as dark party)" => {
                Some(RiskTypeTag::TwoWayDarkStsAsDarkParty)
            }
            "STS With a Sanctioned Vessel" => Some(RiskTypeTag::StsWithSanctionedVessel),
            "Suspicious Loitering Behaviour" => Some(RiskTypeTag::SuspiciousLoitering),
            "Possible 1-Way Dark STS (as non-dark party)" => {
                Some(RiskTypeTag::OneWayDarkStsAsNonDarkParty)
            }
            _ => None,
        }
    }

    pub fn is_dark_sts(&self) -> bool {
        matches!(
            self,
            RiskTypeTag::OneWayDarkStsAsDarkParty | RiskTypeTag::TwoWayDarkStsAsDarkParty
        )
    }

    pub fn is_loitering(&self) -> bool {
        matches!(
            self,
            RiskTypeTag::SuspiciousLoitering | RiskTypeTag::OneWayDarkStsAsNonDarkParty
        )
    }
}

/// Parsed tag set of one `RiskTypes` array.
#[derive(Debug, Clone, Default)]
pub struct TagSet(Vec<RiskTypeTag>);

impl TagSet {
    /// Parse the `RiskTypes` string array of a node; unknown tags are dropped.
    pub fn of(node: &Value) -> Self {
        Self(
            super::path::array_at(node, "RiskTypes")
                .iter()
                .filter_map(Value::as_str)
                .filter_map(RiskTypeTag::parse)
                .collect(),
        )
    }

    pub fn contains(&self, tag: RiskTypeTag) -> bool {
        self.0.contains(&tag)
    }

    pub fn any(&self, pred: impl Fn(&RiskTypeTag) -> bool) -> bool {
        self.0.iter().any(pred)
    }
}

/// Exclusive Economic Zones treated as sanctioned.
pub const SANCTIONED_EEZ: [&str; 7] = [
    "Cuban Exclusive Economic Zone",
    "Iranian Exclusive Economic Zone",
    "Syrian Exclusive Economic Zone",
    "Overlapping claim Ukrainian Exclusive Economic Zone",
    "North Korean Exclusive Economic Zone",
    "Venezuelan Exclusive Economic Zone",
    "Russian Exclusive Economic Zone",
];

pub fn is_sanctioned_eez(name: &str) -> bool {
    SANCTIONED_EEZ.contains(&name.trim())
}

/// Registration countries that raise the entity country flag.
pub const SANCTIONED_COUNTRIES: [&str; 7] = [
    "Cuba",
    "Iran",
    "Syria",
    "North Korea",
    "Venezuela",
    "Russia",
    "Belarus",
];

pub fn is_sanctioned_country(name: &str) -> bool {
    let name = name.trim();
    SANCTIONED_COUNTRIES
        .iter()
        .any(|c| c.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tag_parsing_is_exact() {
        assert_eq!(
            RiskTypeTag::parse("High Risk Port Calling"),
            Some(RiskTypeTag::HighRiskPortCalling)
        );
        assert_eq!(
            RiskTypeTag::parse("probable Dark Port Callin"),
            Some(RiskTypeTag::PossibleDarkPortCalling)
        );
        assert_eq!(RiskTypeTag::parse("high risk port calling"), None);
        assert_eq!(RiskTypeTag::parse("Something else"), None);
    }

    #[test]
    fn test_tag_set_of_node() {
        let node = json!({"RiskTypes": ["Suspicious AIS Gap", "unknown", 42]});
        let tags = TagSet::of(&node);
        assert!(tags.contains(RiskTypeTag::SuspiciousAisGap));
        assert!(!tags.any(|t| t.is_dark_sts()));
        assert!(!TagSet::of(&json!({})).contains(RiskTypeTag::SuspiciousAisGap));
    }

    #[test]
    fn test_sanctioned_eez() {
        assert!(is_sanctioned_eez("Iranian Exclusive Economic Zone"));
        assert!(!is_sanctioned_eez("Omani Exclusive Economic Zone"));
        assert!(!is_sanctioned_eez(""));
    }

    #[test]
    fn test_sanctioned_country_case_insensitive() {
        assert!(is_sanctioned_country(" iran "));
        assert!(!is_sanctioned_country("Singapore"));
    }
}
