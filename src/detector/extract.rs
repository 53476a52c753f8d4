// src/detector/extract.rs — Best-effort "what to avoid" extraction
//
// Rules are tried in the order of EXTRACTION_RULES and the first hit wins.
// The order is part of the contract: "use A instead of B" must be tried before
// the bare "instead of B" form, otherwise B would swallow the trailing clause.
// Each rule captures a single term: a quoted span, or else the first token.

use regex::Regex;
use std::sync::OnceLock;

use super::context::PriorTurnRecord;
use crate::util::truncate_str;

/// Longest fragment we hand back, in bytes.
const MAX_FRAGMENT_LEN: usize = 120;

/// A quoted span or one bare token, after an optional article.
macro_rules! term {
    () => {
        r#"(?:(?:the|a|an)\s+)?(?P<bad>`[^`\n]+`|'[^'\n]+'|"[^"\n]+"|[^\s,;!?`'"]+)"#
    };
}

/// One ordered extraction rule: the capture group named `bad` is the result.
struct ExtractionRule {
    name: &'static str,
    pattern: &'static str,
}

const EXTRACTION_RULES: &[ExtractionRule] = &[
    ExtractionRule {
        name: "use-instead-of",
        pattern: concat!(r"(?i)\buse\s+(?P<good>.+?)\s+instead\s+of\s+", term!()),
    },
    ExtractionRule {
        name: "instead-of",
        pattern: concat!(r"(?i)\binstead\s+of\s+", term!()),
    },
    ExtractionRule {
        name: "dont-use",
        pattern: concat!(r"(?i)\b(?:don['’]?t|do\s+not|never)\s+use\s+", term!()),
    },
    ExtractionRule {
        name: "change-to",
        pattern: concat!(r"(?i)\bchange\s+", term!(), r"\s+to\b"),
    },
];

static COMPILED: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
static DISAGREEMENT_RE: OnceLock<Regex> = OnceLock::new();

fn compiled_rules() -> &'static [(&'static str, Regex)] {
    COMPILED.get_or_init(|| {
        EXTRACTION_RULES
            .iter()
            .map(|r| (r.name, Regex::new(r.pattern).unwrap()))
            .collect()
    })
}

/// Extract the fragment the user wants avoided, if any rule applies.
///
/// `record` must already be checked for freshness by the caller.
pub fn extract_bad_example(message: &str, record: Option<&PriorTurnRecord>) -> Option<String> {
    for (name, re) in compiled_rules() {
        if let Some(caps) = re.captures(message) {
            // A bare token may carry the sentence's full stop.
            let term = caps.name("bad").map(|m| m.as_str().trim_end_matches('.'));
            if let Some(fragment) = term.and_then(clean_fragment) {
                tracing::debug!(rule = *name, fragment = %fragment, "extracted bad example");
                return Some(fragment);
            }
        }
    }

    // Plain disagreement after a turn that edited files: the first line of
    // the code it wrote is the best guess at what was wrong.
    let disagreement = DISAGREEMENT_RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:that['’]?s|this\s+is|it['’]?s)\s+(?:wrong|incorrect|not\s+right)\b")
            .unwrap()
    });
    if disagreement.is_match(message) {
        if let Some(r) = record.filter(|r| r.used_file_modifying_tool()) {
            return r.first_code_line().and_then(clean_fragment);
        }
    }

    None
}

/// Trim whitespace and wrapping quotes/backticks; reject empty results.
fn clean_fragment(raw: &str) -> Option<String> {
    let trimmed = raw
        .trim()
        .trim_matches(|c: char| c == '`' || c == '"' || c == '\'' || c.is_whitespace());
    if trimmed.is_empty() {
        return None;
    }
    Some(truncate_str(trimmed, MAX_FRAGMENT_LEN).trim_end().to_string())
}
