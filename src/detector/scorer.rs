// src/detector/scorer.rs — Multi-signal correction scoring
//
// confidence = clamp(
//     (max + min((total - max) * 0.3, 0.2)) * code_multiplier
//     + min(context_boost, 0.25),
//   0, 1)
//
// The strongest signal dominates; corroborating signals add at most 0.2 and
// the prior turn adds at most 0.25. Neither cap is configurable.

use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

use super::context::PriorTurnRecord;
use super::extract::extract_bad_example;
use super::signals::SignalTable;
use super::skip::is_skip;
use super::types::{Category, DetectionResult};
use crate::infra::config::DetectionConfig;

const CORROBORATION_FACTOR: f32 = 0.3;
const CORROBORATION_CAP: f32 = 0.2;
const CONTEXT_BOOST_CAP: f32 = 0.25;
const IDENTIFIER_OVERLAP_BOOST: f32 = 0.1;

const FENCED_BLOCK_MULTIPLIER: f32 = 1.3;
const INLINE_CODE_MULTIPLIER: f32 = 1.15;
const CODE_PUNCTUATION_MULTIPLIER: f32 = 1.05;
const CODE_PUNCTUATION_MIN_LEN: usize = 30;

static FENCED_RE: OnceLock<Regex> = OnceLock::new();
static INLINE_RE: OnceLock<Regex> = OnceLock::new();
static PUNCT_RE: OnceLock<Regex> = OnceLock::new();
static QUOTED_RE: OnceLock<Regex> = OnceLock::new();

/// Thresholds the scorer applies; mirrors `[detection]` in config.toml.
#[derive(Debug, Clone, Copy)]
pub struct Thresholds {
    pub min_message_len: usize,
    pub min_confidence: f32,
    pub staleness: Duration,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::from(&DetectionConfig::default())
    }
}

impl From<&DetectionConfig> for Thresholds {
    fn from(c: &DetectionConfig) -> Self {
        Self {
            min_message_len: c.min_message_len,
            min_confidence: c.min_confidence,
            staleness: c.staleness(),
        }
    }
}

/// Scores messages against an injected signal table. Stateless between calls.
#[derive(Debug, Clone)]
pub struct Scorer {
    table: SignalTable,
    thresholds: Thresholds,
}

/// Running totals while signals are evaluated.
#[derive(Debug, Default)]
struct Accumulator {
    total: f32,
    max: f32,
    context_boost: f32,
    hints: BTreeSet<Category>,
    matched: usize,
}

impl Accumulator {
    fn add(&mut self, weight: f32, hint: Option<Category>) {
        self.total += weight;
        self.max = self.max.max(weight);
        self.matched += 1;
        if let Some(c) = hint {
            self.hints.insert(c);
        }
    }

    fn base_confidence(&self) -> f32 {
        self.max + ((self.total - self.max) * CORROBORATION_FACTOR).min(CORROBORATION_CAP)
    }
}

impl Scorer {
    pub fn new(table: SignalTable, thresholds: Thresholds) -> Self {
        Self { table, thresholds }
    }

    pub fn table(&self) -> &SignalTable {
        &self.table
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Score `message` as of now.
    pub fn score(&self, message: &str, record: Option<&PriorTurnRecord>) -> DetectionResult {
        self.score_at(message, record, Utc::now())
    }

    /// Score `message`, judging the record's freshness at `now`.
    pub fn score_at(
        &self,
        message: &str,
        record: Option<&PriorTurnRecord>,
        now: DateTime<Utc>,
    ) -> DetectionResult {
        let message = message.trim();
        if message.chars().count() < self.thresholds.min_message_len {
            return DetectionResult::no_signal();
        }

        if is_skip(message, &self.table) {
            tracing::debug!("skip trigger matched, not learning");
            return DetectionResult::skipped();
        }

        let mut acc = Accumulator::default();

        for signal in self.table.signals() {
            if signal.trigger.is_match(message) {
                tracing::debug!(signal = %signal.label, weight = signal.weight, "signal matched");
                acc.add(signal.weight, signal.category_hint);
            }
        }

        let record = record.filter(|r| {
            let fresh = r.is_fresh(now, self.thresholds.staleness);
            if !fresh {
                tracing::debug!(captured_at = %r.captured_at, "prior turn is stale, ignoring");
            }
            fresh
        });

        if let Some(r) = record {
            for signal in self.table.context_signals() {
                if let Some(caps) = signal.trigger.captures(message) {
                    let (weight, validated) = signal.resolve(&caps, r);
                    tracing::debug!(
                        signal = %signal.label,
                        weight,
                        validated,
                        "context signal matched"
                    );
                    acc.add(weight, signal.category_hint);
                    if validated {
                        acc.context_boost += signal.context_weight - signal.base_weight;
                    }
                }
            }

            if quotes_prior_identifier(message, r) {
                acc.context_boost += IDENTIFIER_OVERLAP_BOOST;
            }
        }

        if acc.matched > 0 {
            for cue in self.table.category_cues() {
                if cue.trigger.is_match(message) {
                    acc.hints.insert(cue.category);
                }
            }
        }

        let bad_example = extract_bad_example(message, record);

        // With no signal the base is zero, so only the context boost remains.
        let confidence = (acc.base_confidence() * code_multiplier(message)
            + acc.context_boost.min(CONTEXT_BOOST_CAP))
        .clamp(0.0, 1.0);

        DetectionResult {
            is_correction: confidence >= self.thresholds.min_confidence,
            confidence,
            category_hints: acc.hints,
            skip_learning: false,
            bad_example,
            has_context: record.is_some(),
        }
    }
}

/// Corrections that carry code are strong evidence of a concrete rule.
pub fn code_multiplier(message: &str) -> f32 {
    let fenced = FENCED_RE.get_or_init(|| Regex::new(r"(?s)```[^\n]*\n.*?```").unwrap());
    let inline = INLINE_RE.get_or_init(|| Regex::new(r"`[^`\n]+`").unwrap());
    let punct = PUNCT_RE.get_or_init(|| Regex::new(r"[{}()\[\];=<>]|=>|->|::").unwrap());

    if fenced.is_match(message) {
        FENCED_BLOCK_MULTIPLIER
    } else if inline.is_match(message) {
        INLINE_CODE_MULTIPLIER
    } else if message.chars().count() > CODE_PUNCTUATION_MIN_LEN && punct.is_match(message) {
        CODE_PUNCTUATION_MULTIPLIER
    } else {
        1.0
    }
}

/// Whether the message quotes (backticks, or whitespace-free '…' / "…") an
/// identifier that appears in the previous turn's code.
fn quotes_prior_identifier(message: &str, record: &PriorTurnRecord) -> bool {
    if !record.has_code() {
        return false;
    }
    let quoted = QUOTED_RE.get_or_init(|| {
        Regex::new(r#"`([^`\n]+)`|'([^'\s]+)'|"([^"\s]+)""#).unwrap()
    });
    let known = record.identifiers();
    if known.is_empty() {
        return false;
    }
    quoted.captures_iter(message).any(|caps| {
        let inner = caps
            .get(1)
            .or_else(|| caps.get(2))
            .or_else(|| caps.get(3))
            .map_or("", |m| m.as_str());
        super::context::extract_identifiers(inner)
            .iter()
            .any(|id| known.contains(id))
    })
}
