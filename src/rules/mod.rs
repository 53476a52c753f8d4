// src/rules/mod.rs — Accepted rules and their session-start ranking

pub mod prioritizer;
pub mod types;

pub use prioritizer::{prioritize, render_injection, rule_score};
pub use types::{Rule, RuleSet, RULESET_VERSION};
