//! Entity sanction row helpers.

use chrono::NaiveDate;
use serde_json::{json, Value};

use super::path::is_blank;
use super::timestamp::normalize_tree;
use crate::domain::EntitySanctionRow;

/// Listing tag carried on each row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingTag {
    San,
    ScoHigh,
    ScoMedium,
    Ool,
}

impl ListingTag {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "SAN" => Some(ListingTag::San),
            "SCO-high" => Some(ListingTag::ScoHigh),
            "SCO-medium" => Some(ListingTag::ScoMedium),
            "OOL" => Some(ListingTag::Ool),
            _ => None,
        }
    }

    /// SAN and OOL listings are meaningless without a sanctions name.
    pub fn requires_name(&self) -> bool {
        matches!(self, ListingTag::San | ListingTag::Ool)
    }
}

pub fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !is_blank(s))
}

/// Tag of a row, or `None` when the row should not count as a listing.
pub fn listing_tag(row: &EntitySanctionRow) -> Option<ListingTag> {
    let tag = ListingTag::parse(present(&row.level_tag)?)?;
    if tag.requires_name() && present(&row.sanctions_name).is_none() {
        return None;
    }
    Some(tag)
}

const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%Y-%b-%d", "%d-%b-%Y", "%Y%m%d"];

/// Parse a registration date. A trailing time part is ignored.
pub fn parse_registration_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date_part = raw.split([' ', 'T']).next().unwrap_or(raw);
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

/// Evidence entry for a listing row.
pub fn listing_evidence(row: &EntitySanctionRow) -> Value {
    let mut detail = json!({
        "start_time": row.start_time,
        "end_time": row.end_time,
        "sanctions_name": present(&row.sanctions_name),
        "sanction_type": present(&row.sanction_type),
    });
    normalize_tree(&mut detail);
    detail
}

/// First non-blank entity name across the rows.
pub fn entity_name(rows: &[EntitySanctionRow]) -> Option<String> {
    rows.iter()
        .find_map(|r| present(&r.entity_name))
        .map(str::to_string)
}
