// src/detector/directive.rs — Directive text for the downstream agent
//
// The text itself is free-form; the one hard contract is that it always carries
// the numeric confidence and the category hints, because the agent decides
// whether to persist a rule from them.

use std::fmt::Write;

use super::context::PriorTurnRecord;
use super::types::{ConfidenceLabel, DetectionResult};
use crate::infra::config::DirectiveConfig;
use crate::util::basename;

/// Render the instruction block for a detected correction.
///
/// `existing_names` is in storage order (oldest first); only the most recent
/// `max_existing_names` are listed.
pub fn render_directive(
    result: &DetectionResult,
    existing_names: &[String],
    record: Option<&PriorTurnRecord>,
    config: &DirectiveConfig,
) -> String {
    let mut out = String::new();
    let label = ConfidenceLabel::from_confidence(result.confidence);

    let _ = writeln!(out, "<rulecatch-correction>");
    let _ = writeln!(
        out,
        "The user's message looks like a correction that may encode a reusable project rule."
    );
    let _ = writeln!(
        out,
        "Confidence: {} ({:.2})",
        label.as_str(),
        result.confidence
    );

    let hints = if result.category_hints.is_empty() {
        "none (use `other` if nothing fits)".to_string()
    } else {
        result
            .category_hints
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    let _ = writeln!(out, "Category hints: {hints}");

    let context_line = match (result.has_context, record) {
        (true, Some(r)) => {
            let tools = r.tools_used.iter().cloned().collect::<Vec<_>>().join(", ");
            if tools.is_empty() {
                "yes (previous turn used no tools)".to_string()
            } else {
                format!("yes (previous turn used: {tools})")
            }
        }
        _ => "no".to_string(),
    };
    let _ = writeln!(out, "Prior turn context: {context_line}");

    if let Some(bad) = &result.bad_example {
        let _ = writeln!(out, "Pattern to avoid: {bad}");
    } else {
        let _ = writeln!(
            out,
            "Pattern to avoid: not extracted (ask the user for an example, do not invent one)"
        );
    }

    if let Some(r) = record.filter(|_| result.has_context) {
        let files = file_basenames(r, config.max_files);
        if !files.is_empty() {
            let _ = writeln!(out, "Recently modified: {}", files.join(", "));
        }
    }

    let start = existing_names.len().saturating_sub(config.max_existing_names);
    let recent = &existing_names[start..];
    if recent.is_empty() {
        let _ = writeln!(out, "Existing rules: none");
    } else {
        let _ = writeln!(out, "Existing rules: {}", recent.join(", "));
    }

    out.push('\n');
    out.push_str(CRITERIA);
    let _ = writeln!(out, "</rulecatch-correction>");
    out
}

const CRITERIA: &str = "\
Treat it as a reusable rule only if ALL of these hold:
- it states a convention or preference that applies beyond this one change
- it could be written as \"do X\" / \"avoid Y\" with a concrete example
- it is not already covered by an existing rule listed above
Do NOT record it if:
- it fixes a one-time mistake, typo or misunderstanding of the task
- it is about this specific file or value only
- the user said it is temporary or an exception
If it qualifies, first finish the user's request, then ask once whether to save it
as a rule (proposed name, category, bad example, good example).
";

/// Basenames of files the previous turn touched, sorted, capped at `max`.
fn file_basenames(record: &PriorTurnRecord, max: usize) -> Vec<String> {
    record
        .files_modified
        .iter()
        .take(max)
        .map(|f| basename(f))
        .collect()
}
