// src/transcript.rs — Build a prior-turn record from a JSONL session transcript
//
// Each line is one entry: {"type": "user" | "assistant", "message": {"content": ...}}.
// The turn is everything the assistant emitted after the last real user prompt
// (entries that only carry tool results do not start a new turn).

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::detector::context::FILE_MODIFYING_TOOLS;
use crate::detector::PriorTurnRecord;
use crate::util::truncate_str;

const MAX_RESPONSE_LEN: usize = 4000;
const MAX_CODE_LEN: usize = 4000;

/// Input fields that carry code written by a file-modifying tool.
const CODE_FIELDS: &[&str] = &["new_string", "content", "new_source"];

/// Parse a transcript and summarize its last automated turn.
/// Returns `None` when the transcript has no assistant output after the last prompt.
pub fn record_from_transcript(
    transcript: &str,
    session_id: &str,
    captured_at: DateTime<Utc>,
) -> Option<PriorTurnRecord> {
    let entries: Vec<Value> = transcript
        .lines()
        .filter(|l| !l.trim().is_empty())
        .filter_map(|l| serde_json::from_str(l).ok())
        .collect();

    let turn_start = entries
        .iter()
        .rposition(is_user_prompt)
        .map(|i| i + 1)
        .unwrap_or(0);

    let assistant: Vec<&Value> = entries[turn_start..]
        .iter()
        .filter(|e| e["type"] == "assistant")
        .collect();
    if assistant.is_empty() {
        return None;
    }

    let mut record = PriorTurnRecord::new(session_id, captured_at);
    let mut response = String::new();
    let mut code = String::new();

    for entry in assistant {
        let blocks = match entry["message"]["content"].as_array() {
            Some(b) => b,
            None => {
                if let Some(text) = entry["message"]["content"].as_str() {
                    push_line(&mut response, text);
                }
                continue;
            }
        };

        for block in blocks {
            match block["type"].as_str() {
                Some("text") => {
                    if let Some(text) = block["text"].as_str() {
                        push_line(&mut response, text);
                    }
                }
                Some("tool_use") => {
                    let name = block["name"].as_str().unwrap_or("");
                    if name.is_empty() {
                        continue;
                    }
                    record.tools_used.insert(name.to_string());
                    if FILE_MODIFYING_TOOLS.contains(&name) {
                        collect_file_edit(&block["input"], &mut record, &mut code);
                    }
                }
                _ => {}
            }
        }
    }

    record.response_text = truncate_str(&response, MAX_RESPONSE_LEN).to_string();
    record.code_fragments = truncate_str(&code, MAX_CODE_LEN).to_string();
    Some(record)
}

/// A user entry with typed text, as opposed to one that only returns tool results.
fn is_user_prompt(entry: &Value) -> bool {
    if entry["type"] != "user" {
        return false;
    }
    match &entry["message"]["content"] {
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(blocks) => blocks.iter().any(|b| b["type"] == "text"),
        _ => false,
    }
}

fn collect_file_edit(input: &Value, record: &mut PriorTurnRecord, code: &mut String) {
    if let Some(path) = input["file_path"]
        .as_str()
        .or_else(|| input["notebook_path"].as_str())
    {
        record.files_modified.insert(path.to_string());
    }
    for field in CODE_FIELDS {
        if let Some(text) = input[*field].as_str() {
            push_line(code, text);
        }
    }
    if let Some(edits) = input["edits"].as_array() {
        for edit in edits {
            if let Some(text) = edit["new_string"].as_str() {
                push_line(code, text);
            }
        }
    }
}

fn push_line(buf: &mut String, text: &str) {
    let text = text.trim_end();
    if text.is_empty() {
        return;
    }
    if !buf.is_empty() {
        buf.push('\n');
    }
    buf.push_str(text);
}
