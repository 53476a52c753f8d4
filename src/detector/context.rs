// src/detector/context.rs — Prior-turn record and identifier extraction

use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::sync::OnceLock;

/// Tools whose use means the previous turn changed files on disk.
pub const FILE_MODIFYING_TOOLS: &[&str] = &["Edit", "Write", "MultiEdit", "NotebookEdit"];

/// Language keywords and filler words that never count as identifiers.
const IDENTIFIER_STOPWORDS: &[&str] = &[
    "const", "let", "var", "function", "return", "if", "else", "for", "while", "import",
    "export", "from", "class", "new", "this", "true", "false", "null", "undefined", "async",
    "await", "def", "self", "pub", "impl", "struct", "enum", "use", "mut", "type", "interface",
    "try", "catch", "throw", "default", "string", "number", "the", "and",
];

static IDENT_RE: OnceLock<Regex> = OnceLock::new();

/// Snapshot of the previous automated turn.
///
/// Read-only for detection. Freshness is a property of the read, not the record:
/// call [`PriorTurnRecord::is_fresh`] every time it is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriorTurnRecord {
    pub session_id: String,
    #[serde(default)]
    pub response_text: String,
    #[serde(default)]
    pub tools_used: BTreeSet<String>,
    #[serde(default)]
    pub files_modified: BTreeSet<String>,
    #[serde(default)]
    pub code_fragments: String,
    pub captured_at: DateTime<Utc>,
}

impl PriorTurnRecord {
    pub fn new(session_id: impl Into<String>, captured_at: DateTime<Utc>) -> Self {
        Self {
            session_id: session_id.into(),
            response_text: String::new(),
            tools_used: BTreeSet::new(),
            files_modified: BTreeSet::new(),
            code_fragments: String::new(),
            captured_at,
        }
    }

    /// True while `now - captured_at` is within `window` (inclusive).
    /// A record from the future is treated as fresh.
    pub fn is_fresh(&self, now: DateTime<Utc>, window: Duration) -> bool {
        now - self.captured_at <= window
    }

    pub fn used_file_modifying_tool(&self) -> bool {
        self.tools_used
            .iter()
            .any(|t| FILE_MODIFYING_TOOLS.contains(&t.as_str()))
    }

    pub fn has_code(&self) -> bool {
        !self.code_fragments.trim().is_empty()
    }

    /// First non-empty line of the code the turn produced.
    pub fn first_code_line(&self) -> Option<&str> {
        self.code_fragments
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
    }

    /// Whether `term` occurs in the code or the response text of this turn.
    pub fn mentions(&self, term: &str) -> bool {
        let term = term.trim();
        !term.is_empty() && (self.code_fragments.contains(term) || self.response_text.contains(term))
    }

    /// Identifier-shaped tokens from the code fragments, minus stopwords.
    pub fn identifiers(&self) -> HashSet<String> {
        extract_identifiers(&self.code_fragments)
    }
}

/// Runs of `[A-Za-z_][A-Za-z0-9_]*` with length >= 3 that are not keywords.
pub fn extract_identifiers(code: &str) -> HashSet<String> {
    let re = IDENT_RE.get_or_init(|| Regex::new(r"[A-Za-z_][A-Za-z0-9_]{2,}").unwrap());
    re.find_iter(code)
        .map(|m| m.as_str())
        .filter(|tok| !IDENTIFIER_STOPWORDS.contains(&tok.to_lowercase().as_str()))
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_at(minutes_ago: i64, now: DateTime<Utc>) -> PriorTurnRecord {
        PriorTurnRecord::new("s1", now - Duration::minutes(minutes_ago))
    }

    #[test]
    fn test_freshness_boundary() {
        let now = Utc::now();
        let window = Duration::minutes(5);
        assert!(record_at(0, now).is_fresh(now, window));
        assert!(record_at(5, now).is_fresh(now, window));
        assert!(!record_at(6, now).is_fresh(now, window));
    }

    #[test]
    fn test_freshness_is_evaluated_per_read() {
        let captured = Utc::now();
        let record = PriorTurnRecord::new("s1", captured);
        let window = Duration::minutes(5);
        assert!(record.is_fresh(captured + Duration::minutes(1), window));
        assert!(!record.is_fresh(captured + Duration::minutes(7), window));
    }

    #[test]
    fn test_file_modifying_tool() {
        let mut r = PriorTurnRecord::new("s1", Utc::now());
        r.tools_used.insert("Read".into());
        assert!(!r.used_file_modifying_tool());
        r.tools_used.insert("MultiEdit".into());
        assert!(r.used_file_modifying_tool());
    }

    #[test]
    fn test_first_code_line_skips_blank() {
        let mut r = PriorTurnRecord::new("s1", Utc::now());
        r.code_fragments = "\n   \n  var x = 1;\nvar y = 2;".into();
        assert_eq!(r.first_code_line(), Some("var x = 1;"));
        r.code_fragments.clear();
        assert_eq!(r.first_code_line(), None);
    }

    #[test]
    fn test_extract_identifiers_drops_keywords_and_short_tokens() {
        let ids = extract_identifiers("const userName = getUser(id); if (ok) return fetch_all;");
        assert!(ids.contains("userName"));
        assert!(ids.contains("getUser"));
        assert!(ids.contains("fetch_all"));
        assert!(!ids.contains("const"));
        assert!(!ids.contains("return"));
        assert!(!ids.contains("id"));
        assert!(!ids.contains("ok"));
    }

    #[test]
    fn test_mentions() {
        let mut r = PriorTurnRecord::new("s1", Utc::now());
        r.code_fragments = "let data = loadData();".into();
        r.response_text = "I added a helper called parseRow.".into();
        assert!(r.mentions("loadData"));
        assert!(r.mentions("parseRow"));
        assert!(!r.mentions("missing"));
        assert!(!r.mentions("  "));
    }

    #[test]
    fn test_deserialize_with_missing_optional_fields() {
        let json = r#"{"sessionId":"abc","capturedAt":"2026-01-01T00:00:00Z"}"#;
        let r: PriorTurnRecord = serde_json::from_str(json).unwrap();
        assert_eq!(r.session_id, "abc");
        assert!(r.tools_used.is_empty());
        assert!(!r.has_code());
    }
}
