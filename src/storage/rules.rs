// src/storage/rules.rs — Rule collection file (rules.json)

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

use super::write_json_atomic;
use crate::detector::Category;
use crate::infra::errors::RulecatchError;
use crate::rules::{Rule, RuleSet};

/// Fields supplied when the user accepts a new rule.
#[derive(Debug, Clone)]
pub struct NewRule {
    pub name: String,
    pub description: String,
    pub category: Category,
    pub bad_example: Option<String>,
    pub good_example: Option<String>,
    pub confidence: f32,
}

/// What `RuleStore::add` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Created(String),
    /// A rule with a near-identical name existed; its hit count was bumped instead.
    Reinforced(String),
}

/// Read-modify-write access to one project's `rules.json`.
pub struct RuleStore {
    path: PathBuf,
}

impl RuleStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the collection. A missing file is an empty collection; a corrupt
    /// one is an error so that writers never clobber it.
    pub fn load(&self) -> Result<RuleSet, RulecatchError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(RuleSet::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Load for read-only callers: any failure degrades to an empty collection.
    pub fn load_or_empty(&self) -> RuleSet {
        self.load().unwrap_or_else(|e| {
            tracing::warn!("Ignoring unreadable rule file {}: {}", self.path.display(), e);
            RuleSet::default()
        })
    }

    pub fn save(&self, set: &RuleSet) -> Result<(), RulecatchError> {
        write_json_atomic(&self.path, set)
    }

    /// Add a rule, or reinforce an existing one whose name is at least
    /// `dedup_similarity` similar (normalized Levenshtein, case-insensitive).
    pub fn add(
        &self,
        new: NewRule,
        now: DateTime<Utc>,
        dedup_similarity: f64,
    ) -> Result<AddOutcome, RulecatchError> {
        if !(0.0..=1.0).contains(&new.confidence) {
            return Err(RulecatchError::InvalidConfidence {
                value: new.confidence,
            });
        }

        let mut set = self.load()?;

        let wanted = new.name.trim().to_lowercase();
        if let Some(existing) = set
            .rules
            .iter_mut()
            .find(|r| strsim::normalized_levenshtein(&r.name.to_lowercase(), &wanted) >= dedup_similarity)
        {
            existing.hit_count = existing.hit_count.saturating_add(1);
            let id = existing.id.clone();
            tracing::info!("Reinforced existing rule '{}' instead of adding a duplicate", id);
            self.save(&set)?;
            return Ok(AddOutcome::Reinforced(id));
        }

        let id = set.unique_id(&new.name);
        set.rules.push(Rule {
            id: id.clone(),
            name: new.name.trim().to_string(),
            description: new.description,
            category: new.category,
            bad_example: new.bad_example,
            good_example: new.good_example,
            confidence: new.confidence,
            created_at: now,
            hit_count: 0,
        });
        self.save(&set)?;
        tracing::info!("Added rule '{}'", id);
        Ok(AddOutcome::Created(id))
    }

    /// Count one application of a rule. Returns the new hit count.
    pub fn record_hit(&self, id: &str) -> Result<u32, RulecatchError> {
        let mut set = self.load()?;
        let rule = set
            .get_mut(id)
            .ok_or_else(|| RulecatchError::RuleNotFound { id: id.to_string() })?;
        rule.hit_count = rule.hit_count.saturating_add(1);
        let hits = rule.hit_count;
        self.save(&set)?;
        Ok(hits)
    }

    pub fn remove(&self, id: &str) -> Result<Rule, RulecatchError> {
        let mut set = self.load()?;
        let pos = set
            .rules
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| RulecatchError::RuleNotFound { id: id.to_string() })?;
        let removed = set.rules.remove(pos);
        self.save(&set)?;
        Ok(removed)
    }
}
