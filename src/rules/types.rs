// src/rules/types.rs — Persisted rule records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::detector::Category;

/// Schema version written with every rule collection.
pub const RULESET_VERSION: u32 = 1;

/// A rule the user accepted. Owned by the rule store; the detector and the
/// prioritizer only read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bad_example: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub good_example: Option<String>,
    pub confidence: f32,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub hit_count: u32,
}

/// Ordered rule collection plus its schema version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    pub version: u32,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            version: RULESET_VERSION,
            rules: Vec::new(),
        }
    }
}

impl RuleSet {
    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Rule> {
        self.rules.iter_mut().find(|r| r.id == id)
    }

    /// Rule names in storage order, oldest first.
    pub fn names(&self) -> Vec<String> {
        self.rules.iter().map(|r| r.name.clone()).collect()
    }

    /// Slugified `name`, suffixed with -2, -3, ... until unique in this set.
    pub fn unique_id(&self, name: &str) -> String {
        let mut base = slug::slugify(name);
        if base.is_empty() {
            base = "rule".into();
        }
        if self.get(&base).is_none() {
            return base;
        }
        (2..)
            .map(|n| format!("{base}-{n}"))
            .find(|candidate| self.get(candidate).is_none())
            .unwrap_or(base)
    }
}
