// src/cli/detect.rs — Prompt-submit hook: score the message, emit a directive

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

use super::hook::read_hook_input;
use super::{resolve_project_root, AppContext};
use crate::detector::{render_directive, DetectionResult, Scorer, SignalTable, Thresholds};
use crate::storage::{RuleStore, TurnStore};

/// Outcome of one detection pass.
pub struct Detection {
    pub result: DetectionResult,
    /// Present only when the message is a correction.
    pub directive: Option<String>,
}

/// Handle `rulecatch detect`. Never fails the hook: errors are logged and
/// the command stays silent.
pub async fn run_detect(
    ctx: &AppContext,
    message: Option<String>,
    cwd: Option<PathBuf>,
    json: bool,
) -> anyhow::Result<()> {
    let hook = read_hook_input().await;
    let Some(message) = message.or(hook.prompt.clone()) else {
        tracing::debug!("No message to score");
        return Ok(());
    };

    let project_root = match resolve_project_root(cwd, hook.cwd.as_deref()) {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!("Cannot resolve project directory: {}", e);
            return Ok(());
        }
    };

    match detect_message(ctx, &message, &project_root, Utc::now()) {
        Ok(detection) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&detection.result)?);
            } else if let Some(directive) = detection.directive {
                print!("{directive}");
            }
        }
        Err(e) => tracing::warn!("Detection failed: {}", e),
    }
    Ok(())
}

/// Score `message` against the project's stored prior turn at `now`.
pub fn detect_message(
    ctx: &AppContext,
    message: &str,
    project_root: &Path,
    now: DateTime<Utc>,
) -> anyhow::Result<Detection> {
    let thresholds = Thresholds::from(&ctx.config.detection);
    let scorer = Scorer::new(SignalTable::builtin()?, thresholds);

    let turns = TurnStore::new(ctx.layout.last_turn_path(project_root));
    let record = turns.load_fresh(now, thresholds.staleness);

    let result = scorer.score_at(message, record.as_ref(), now);
    tracing::debug!(
        "Scored message: correction={} confidence={:.2} context={}",
        result.is_correction,
        result.confidence,
        result.has_context
    );

    let directive = if result.is_correction {
        let rules = RuleStore::new(ctx.layout.rules_path(project_root)).load_or_empty();
        Some(render_directive(
            &result,
            &rules.names(),
            record.as_ref(),
            &ctx.config.directive,
        ))
    } else {
        None
    };

    Ok(Detection { result, directive })
}
