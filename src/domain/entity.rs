//! Entity (company / party) sanction model.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{EntityRiskLevel, RiskLevel};

/// The five independent entity risk flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityFlagKind {
    /// Listed on a sanctions list.
    IsSan,
    /// Sanctions control and ownership linkage.
    IsSco,
    /// Listed on another official list.
    IsOol,
    /// Registered within the last year.
    IsOneYear,
    /// Registered in a sanctioned country.
    IsSanctionedCountries,
}

impl EntityFlagKind {
    pub const ALL: [EntityFlagKind; 5] = [
        EntityFlagKind::IsSan,
        EntityFlagKind::IsSco,
        EntityFlagKind::IsOol,
        EntityFlagKind::IsOneYear,
        EntityFlagKind::IsSanctionedCountries,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityFlagKind::IsSan => "is_san",
            EntityFlagKind::IsSco => "is_sco",
            EntityFlagKind::IsOol => "is_ool",
            EntityFlagKind::IsOneYear => "is_one_year",
            EntityFlagKind::IsSanctionedCountries => "is_sanctioned_countries",
        }
    }
}

impl fmt::Display for EntityFlagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One raw sanction row for an entity, as exported by the screening source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntitySanctionRow {
    pub entity_id: String,
    #[serde(default)]
    pub entity_name: Option<String>,
    /// `SAN`, `SCO-high`, `SCO-medium`, `OOL`, or anything else.
    #[serde(default)]
    pub level_tag: Option<String>,
    #[serde(default)]
    pub sanctions_name: Option<String>,
    #[serde(default)]
    pub sanction_type: Option<String>,
    #[serde(default)]
    pub entity_kind: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    /// Registration date, `YYYY-MM-DD` or `YYYY-Mon-DD`.
    #[serde(default)]
    pub registration_date: Option<String>,
    #[serde(default)]
    pub registration_country: Option<String>,
}

/// One flag with its level and supporting rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityFlag {
    pub kind: EntityFlagKind,
    pub level: EntityRiskLevel,
    pub evidence: Vec<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Per-entity verdict across the five flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySanctionRecord {
    pub entity_id: String,
    pub name: String,
    /// All five flags, in [`EntityFlagKind::ALL`] order.
    pub flags: Vec<EntityFlag>,
    /// high > medium > none over the flags; undetermined flags do not count.
    pub level: RiskLevel,
    /// Flags that could not be classified.
    pub undetermined: Vec<EntityFlagKind>,
}

impl EntitySanctionRecord {
    pub fn flag(&self, kind: EntityFlagKind) -> Option<&EntityFlag> {
        self.flags.iter().find(|f| f.kind == kind)
    }
}
