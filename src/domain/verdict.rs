//! Classifier and aggregator outputs.

use serde::{Deserialize, Serialize};

use super::{Category, DisplayGroup, Observation, RiskLevel};

/// Classifier output for one (subject, category) pair.
///
/// Built through [`CategoryVerdict::new`], which keeps the invariant
/// `level == None ⇒ evidence.is_empty()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryVerdict {
    pub category: Category,
    pub level: RiskLevel,
    pub evidence: Vec<Observation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
}

impl CategoryVerdict {
    pub fn new(category: Category, level: RiskLevel, evidence: Vec<Observation>) -> Self {
        let evidence = if level == RiskLevel::None {
            Vec::new()
        } else {
            evidence
        };
        Self {
            category,
            level,
            evidence,
            description: None,
            info: None,
        }
    }

    pub fn none(category: Category) -> Self {
        Self::new(category, RiskLevel::None, Vec::new())
    }
}

/// Composite verdict for one display group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayGroupVerdict {
    pub group: DisplayGroup,
    pub title: String,
    pub level: RiskLevel,
    /// Member verdicts in canonical category order.
    pub items: Vec<CategoryVerdict>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
}

/// Display groups bucketed by their level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelBuckets {
    pub high_risk: Vec<DisplayGroupVerdict>,
    pub mid_risk: Vec<DisplayGroupVerdict>,
    pub no_risk: Vec<DisplayGroupVerdict>,
}

impl LevelBuckets {
    pub fn get(&self, level: RiskLevel) -> &Vec<DisplayGroupVerdict> {
        match level {
            RiskLevel::High => &self.high_risk,
            RiskLevel::Medium => &self.mid_risk,
            RiskLevel::None => &self.no_risk,
        }
    }

    pub fn get_mut(&mut self, level: RiskLevel) -> &mut Vec<DisplayGroupVerdict> {
        match level {
            RiskLevel::High => &mut self.high_risk,
            RiskLevel::Medium => &mut self.mid_risk,
            RiskLevel::None => &mut self.no_risk,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &DisplayGroupVerdict> {
        self.high_risk
            .iter()
            .chain(self.mid_risk.iter())
            .chain(self.no_risk.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut DisplayGroupVerdict> {
        self.high_risk
            .iter_mut()
            .chain(self.mid_risk.iter_mut())
            .chain(self.no_risk.iter_mut())
    }

    pub fn find(&self, group: DisplayGroup) -> Option<&DisplayGroupVerdict> {
        self.iter().find(|g| g.group == group)
    }
}

/// Per-subject overall result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateVerdict {
    pub subject_id: String,
    pub overall_level: RiskLevel,
    pub by_level: LevelBuckets,
    /// Stakeholder-sanction composite, relocated out of `by_level`.
    pub stakeholder: Option<DisplayGroupVerdict>,
}

impl AggregateVerdict {
    /// Every category verdict, including the relocated stakeholder group.
    pub fn category_verdicts(&self) -> impl Iterator<Item = &CategoryVerdict> {
        self.by_level
            .iter()
            .chain(self.stakeholder.iter())
            .flat_map(|g| g.items.iter())
    }

    pub fn category(&self, category: Category) -> Option<&CategoryVerdict> {
        self.category_verdicts().find(|v| v.category == category)
    }

    pub fn group(&self, group: DisplayGroup) -> Option<&DisplayGroupVerdict> {
        match &self.stakeholder {
            Some(s) if s.group == group => Some(s),
            _ => self.by_level.find(group),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_none_verdict_drops_evidence() {
        let obs = Observation::new(Category::AisGap, "1234567", json!({"zone": "x"}));
        let verdict = CategoryVerdict::new(Category::AisGap, RiskLevel::None, vec![obs.clone()]);
        assert!(verdict.evidence.is_empty());

        let verdict = CategoryVerdict::new(Category::AisGap, RiskLevel::Medium, vec![obs]);
        assert_eq!(verdict.evidence.len(), 1);
    }

    #[test]
    fn test_level_buckets_get_mut() {
        let mut buckets = LevelBuckets::default();
        buckets.get_mut(RiskLevel::Medium).push(DisplayGroupVerdict {
            group: DisplayGroup::AisGap,
            title: DisplayGroup::AisGap.title().to_string(),
            level: RiskLevel::Medium,
            items: vec![],
            description: None,
            info: None,
        });
        assert_eq!(buckets.get(RiskLevel::Medium).len(), 1);
        assert!(buckets.find(DisplayGroup::AisGap).is_some());
        assert!(buckets.find(DisplayGroup::DarkPort).is_none());
    }
}
