// src/detector/signals.rs — Weighted trigger registry
//
// Weight tiers:
//   0.80-0.95  explicit convention ("we always", "our convention")
//   0.50-0.70  preference / correction ("instead of", "prefer X over Y")
//   0.20-0.40  weak fix language ("fix this", "try again")
// A single tier-1 match clears the 0.4 threshold on its own; tier-3 matches
// need corroboration.

use regex::{Captures, Regex};

use super::context::PriorTurnRecord;
use super::types::Category;
use crate::infra::errors::RulecatchError;

/// Decides whether a context-aware match is backed by the previous turn.
pub type Validator = fn(&Captures<'_>, &PriorTurnRecord) -> bool;

/// A plain trigger evaluated against the message alone.
#[derive(Debug, Clone)]
pub struct Signal {
    pub label: String,
    pub trigger: Regex,
    pub weight: f32,
    pub category_hint: Option<Category>,
}

impl Signal {
    pub fn new(
        label: &str,
        pattern: &str,
        weight: f32,
        category_hint: Option<Category>,
    ) -> Result<Self, RulecatchError> {
        check_weight(label, weight)?;
        Ok(Self {
            label: label.to_string(),
            trigger: Regex::new(pattern)?,
            weight,
            category_hint,
        })
    }
}

/// A trigger whose weight depends on what the previous turn did.
#[derive(Debug, Clone)]
pub struct ContextSignal {
    pub label: String,
    pub trigger: Regex,
    pub base_weight: f32,
    pub context_weight: f32,
    pub category_hint: Option<Category>,
    pub validator: Option<Validator>,
}

impl ContextSignal {
    pub fn new(
        label: &str,
        pattern: &str,
        base_weight: f32,
        context_weight: f32,
        validator: Option<Validator>,
    ) -> Result<Self, RulecatchError> {
        check_weight(label, base_weight)?;
        check_weight(label, context_weight)?;
        if context_weight < base_weight {
            return Err(RulecatchError::InvalidSignal {
                label: label.to_string(),
                reason: format!(
                    "context weight {context_weight} is below base weight {base_weight}"
                ),
            });
        }
        Ok(Self {
            label: label.to_string(),
            trigger: Regex::new(pattern)?,
            base_weight,
            context_weight,
            category_hint: None,
            validator,
        })
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category_hint = Some(category);
        self
    }

    /// Weight for one match and whether the record validated it.
    pub fn resolve(&self, caps: &Captures<'_>, record: &PriorTurnRecord) -> (f32, bool) {
        let validated = self.validator.map_or(true, |v| v(caps, record));
        if validated {
            (self.context_weight, true)
        } else {
            (self.base_weight, false)
        }
    }
}

/// Zero-weight keyword pattern that only contributes a category hint.
#[derive(Debug, Clone)]
pub struct CategoryCue {
    pub category: Category,
    pub trigger: Regex,
}

impl CategoryCue {
    pub fn new(category: Category, pattern: &str) -> Result<Self, RulecatchError> {
        Ok(Self {
            category,
            trigger: Regex::new(pattern)?,
        })
    }
}

fn check_weight(label: &str, weight: f32) -> Result<(), RulecatchError> {
    if weight > 0.0 && weight <= 1.0 {
        Ok(())
    } else {
        Err(RulecatchError::InvalidSignal {
            label: label.to_string(),
            reason: format!("weight {weight} is outside (0, 1]"),
        })
    }
}

/// Immutable, versioned set of triggers handed to the scorer at construction.
#[derive(Debug, Clone)]
pub struct SignalTable {
    version: u32,
    signals: Vec<Signal>,
    context_signals: Vec<ContextSignal>,
    skip_triggers: Vec<Regex>,
    category_cues: Vec<CategoryCue>,
}

impl SignalTable {
    pub fn empty(version: u32) -> Self {
        Self {
            version,
            signals: Vec::new(),
            context_signals: Vec::new(),
            skip_triggers: Vec::new(),
            category_cues: Vec::new(),
        }
    }

    pub fn with_signal(mut self, signal: Signal) -> Self {
        self.signals.push(signal);
        self
    }

    pub fn with_context_signal(mut self, signal: ContextSignal) -> Self {
        self.context_signals.push(signal);
        self
    }

    pub fn with_skip_trigger(mut self, pattern: &str) -> Result<Self, RulecatchError> {
        self.skip_triggers.push(Regex::new(pattern)?);
        Ok(self)
    }

    pub fn with_category_cue(mut self, cue: CategoryCue) -> Self {
        self.category_cues.push(cue);
        self
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    pub fn context_signals(&self) -> &[ContextSignal] {
        &self.context_signals
    }

    pub fn skip_triggers(&self) -> &[Regex] {
        &self.skip_triggers
    }

    pub fn category_cues(&self) -> &[CategoryCue] {
        &self.category_cues
    }

    /// The built-in English table.
    pub fn builtin() -> Result<Self, RulecatchError> {
        let mut table = Self::empty(BUILTIN_VERSION);

        for &(label, pattern, weight, hint) in PLAIN_SIGNALS {
            table = table.with_signal(Signal::new(label, pattern, weight, hint)?);
        }
        for &(label, pattern, base, ctx, validator) in CONTEXT_SIGNALS {
            table = table.with_context_signal(ContextSignal::new(label, pattern, base, ctx, validator)?);
        }
        for pattern in SKIP_TRIGGERS {
            table = table.with_skip_trigger(pattern)?;
        }
        for &(category, pattern) in CATEGORY_CUES {
            table = table.with_category_cue(CategoryCue::new(category, pattern)?);
        }
        Ok(table)
    }
}

const BUILTIN_VERSION: u32 = 3;

// Apostrophes: users type both ' and ’.
const PLAIN_SIGNALS: &[(&str, &str, f32, Option<Category>)] = &[
    // Tier 1: explicit convention
    ("we-always-never", r"(?i)\bwe\s+(?:always|never)\b", 0.95, None),
    (
        "our-convention",
        r"(?i)\bour\s+(?:convention|standard|style(?:\s+guide)?|rule|practice)s?\b",
        0.9,
        None,
    ),
    (
        "convention-is",
        r"(?i)\bthe\s+(?:convention|standard|rule)\s+(?:here\s+)?is\b",
        0.85,
        None,
    ),
    (
        "always-never-verb",
        r"(?i)\b(?:always|never)\s+(?:use|do|write|put|name|call|import|add|return|throw|catch|test|mock|prefix)\b",
        0.85,
        None,
    ),
    (
        "in-this-codebase",
        r"(?i)\bin\s+this\s+(?:codebase|project|repo(?:sitory)?)\b",
        0.8,
        None,
    ),
    ("remember-to", r"(?i)\b(?:remember|keep\s+in\s+mind)\s+(?:to|that)\b", 0.8, None),
    // Tier 2: preference / correction
    ("instead-of", r"(?i)\binstead\s+of\b", 0.7, None),
    ("prefer-over", r"(?i)\bprefer\b.{1,60}?\b(?:over|to)\b", 0.7, None),
    ("rather-than", r"(?i)\brather\s+than\b", 0.65, None),
    (
        "dont-use",
        r"(?i)\b(?:don['’]?t|do\s+not|stop)\s+(?:use|using)\b",
        0.65,
        None,
    ),
    ("i-prefer", r"(?i)\b(?:i|we)\s+prefer\b", 0.6, None),
    ("please-use", r"(?i)\bplease\s+use\b", 0.55, None),
    (
        "should-be",
        r"(?i)\bshould\s+(?:be|use|have\s+been|always)\b",
        0.5,
        None,
    ),
    ("change-to", r"(?i)\bchange\b.{1,60}?\bto\b", 0.5, None),
    // Tier 3: weak fix language
    ("rename", r"(?i)\brename\b", 0.4, Some(Category::Naming)),
    ("actually", r"(?i)(?:^\s*actually\b|\bactually,)", 0.35, None),
    ("fix-this", r"(?i)\bfix\s+(?:this|that|it)\b", 0.3, None),
    ("not-quite", r"(?i)\bnot\s+quite\b", 0.3, None),
    ("try-again", r"(?i)\btry\s+again\b", 0.25, None),
];

const CONTEXT_SIGNALS: &[(&str, &str, f32, f32, Option<Validator>)] = &[
    (
        "thats-wrong",
        r"(?i)\b(?:that['’]?s|this\s+is|it['’]?s)\s+(?:wrong|incorrect|not\s+right)\b",
        0.4,
        0.8,
        Some(turn_produced_code),
    ),
    (
        "instead-of-term",
        r#"(?i)\binstead\s+of\s+[`'"]?(?P<term>[A-Za-z_$][\w.$-]*)"#,
        0.5,
        0.85,
        Some(term_in_prior_turn),
    ),
    (
        "dont-do-it-like-that",
        r"(?i)\b(?:don['’]?t|do\s+not)\s+(?:do|write)\s+(?:it|that|this)\s+(?:like\s+(?:that|this)|that\s+way)\b",
        0.35,
        0.7,
        Some(turn_modified_files),
    ),
    (
        "you-did",
        r"(?i)\byou\s+(?:used|wrote|added|named|called|put|created)\b",
        0.4,
        0.75,
        Some(turn_produced_code),
    ),
    ("why-did-you", r"(?i)\bwhy\s+did\s+you\b", 0.3, 0.6, Some(turn_used_tools)),
    ("not-like-that", r"(?i)\bnot\s+like\s+(?:that|this)\b", 0.3, 0.6, None),
    (
        "refers-to-artifact",
        r"(?i)\b(?:this|that)\s+(?:function|variable|method|file|import|test|class|component)\b",
        0.2,
        0.5,
        Some(turn_modified_files),
    ),
];

const SKIP_TRIGGERS: &[&str] = &[
    r"(?i)\bjust\s+this\s+(?:once|time)\b",
    r"(?i)\b(?:this\s+time\s+only|only\s+this\s+(?:once|time))\b",
    r"(?i)\b(?:don['’]?t|do\s+not)\s+(?:remember|learn|save|memori[sz]e|store)\s+(?:this|that|it)\b",
    // "an exception" counts at the start of a clause or after a framing word;
    // "throw an exception" stays an ordinary correction.
    r"(?i)(?:^\s*|[,;:]\s*|\b(?:as|make|is|be|this|just)\s+|['’]s\s+)an\s+exception\b",
    r"(?i)\bone\s+exception\b",
    r"(?i)\bexception\s+(?:to\s+the\s+rule|here|for\s+(?:this|that|now|once))\b",
    r"(?i)\bone[-\s]?off\b",
    r"(?i)\b(?:only|just|is|be|it['’]?s)\s+temporary\b",
    r"(?i)\btemporar(?:ily|y\s+(?:fix|change|workaround|hack|solution|patch))\b",
    r"(?i)\bfor\s+now\b",
];

const CATEGORY_CUES: &[(Category, &str)] = &[
    (
        Category::Naming,
        r"(?i)\b(?:naming|named?|renamed?|camel\s?case|snake_case|pascal\s?case|kebab-case|prefix(?:ed)?|suffix(?:ed)?|variable\s+names?)\b",
    ),
    (
        Category::ErrorHandling,
        r"(?i)\b(?:errors?|exceptions?|try/catch|try-catch|throws?|unwrap|panics?|error\s+handling)\b",
    ),
    (
        Category::Architecture,
        r"(?i)\b(?:architecture|layers?|modules?|services?|dependency\s+injection|coupling|separation\s+of\s+concerns|singletons?|abstractions?)\b",
    ),
    (
        Category::Testing,
        r"(?i)\b(?:tests?|testing|mocks?|mocking|fixtures?|assertions?|asserts?)\b",
    ),
    (
        Category::Style,
        r"(?i)\b(?:early\s+returns?|nested\s+ifs?|indent(?:ation)?|formatting|semicolons?|quotes|line\s+length|const|var|let|arrow\s+functions?|ternar(?:y|ies)|style|braces)\b",
    ),
    (
        Category::Imports,
        r"(?i)\b(?:imports?|require|exports?|barrel\s+files?|relative\s+paths?|absolute\s+paths?)\b",
    ),
];

fn turn_produced_code(_: &Captures<'_>, record: &PriorTurnRecord) -> bool {
    record.has_code() || !record.files_modified.is_empty()
}

fn turn_modified_files(_: &Captures<'_>, record: &PriorTurnRecord) -> bool {
    record.used_file_modifying_tool() || !record.files_modified.is_empty()
}

fn turn_used_tools(_: &Captures<'_>, record: &PriorTurnRecord) -> bool {
    !record.tools_used.is_empty()
}

fn term_in_prior_turn(caps: &Captures<'_>, record: &PriorTurnRecord) -> bool {
    caps.name("term")
        .map(|m| record.mentions(m.as_str().trim_end_matches(['.', '-'])))
        .unwrap_or(false)
}
