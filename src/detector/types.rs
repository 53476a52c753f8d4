// src/detector/types.rs — Detector type definitions

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::infra::errors::RulecatchError;

/// Advisory classification of the domain a rule belongs to.
///
/// This is a closed set shared with the rule store and the directive text;
/// adding a variant means updating `all()`, `as_str()` and `FromStr` together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Naming,
    ErrorHandling,
    Architecture,
    Testing,
    Style,
    Imports,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Naming => "naming",
            Self::ErrorHandling => "error-handling",
            Self::Architecture => "architecture",
            Self::Testing => "testing",
            Self::Style => "style",
            Self::Imports => "imports",
            Self::Other => "other",
        }
    }

    pub fn all() -> &'static [Category] {
        &[
            Category::Naming,
            Category::ErrorHandling,
            Category::Architecture,
            Category::Testing,
            Category::Style,
            Category::Imports,
            Category::Other,
        ]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Category {
    type Err = RulecatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        Category::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| RulecatchError::InvalidCategory {
                value: s.to_string(),
            })
    }
}

/// Outcome of scoring one message. Produced fresh per message.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    pub is_correction: bool,
    pub confidence: f32,
    pub category_hints: BTreeSet<Category>,
    pub skip_learning: bool,
    pub bad_example: Option<String>,
    pub has_context: bool,
}

impl DetectionResult {
    /// Too short or otherwise unscorable.
    pub fn no_signal() -> Self {
        Self::default()
    }

    /// The message disclaimed itself as a one-off.
    pub fn skipped() -> Self {
        Self {
            skip_learning: true,
            ..Self::default()
        }
    }
}

/// Coarse confidence bucket shown to the downstream agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceLabel {
    High,
    Medium,
    Low,
}

impl ConfidenceLabel {
    pub fn from_confidence(confidence: f32) -> Self {
        if confidence >= 0.8 {
            Self::High
        } else if confidence >= 0.6 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}
