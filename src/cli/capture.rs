// src/cli/capture.rs — End-of-turn hook: store the prior-turn record

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

use super::hook::read_hook_input;
use super::{resolve_project_root, AppContext};
use crate::storage::TurnStore;
use crate::transcript::record_from_transcript;

/// Handle `rulecatch capture`. Errors are logged, never surfaced to the hook.
pub async fn run_capture(
    ctx: &AppContext,
    transcript: Option<PathBuf>,
    cwd: Option<PathBuf>,
) -> anyhow::Result<()> {
    let hook = read_hook_input().await;
    let Some(transcript) = transcript.or_else(|| hook.transcript_path.as_ref().map(PathBuf::from))
    else {
        tracing::debug!("No transcript to capture");
        return Ok(());
    };

    let result = match resolve_project_root(cwd, hook.cwd.as_deref()) {
        Ok(root) => capture_turn(ctx, &transcript, &root, hook.session_id(), Utc::now()).await,
        Err(e) => Err(e),
    };
    if let Err(e) = result {
        tracing::warn!("Capture failed for {}: {}", transcript.display(), e);
    }
    Ok(())
}

/// Parse `transcript` and replace the project's prior-turn record.
/// Returns whether a record was written.
pub async fn capture_turn(
    ctx: &AppContext,
    transcript: &Path,
    project_root: &Path,
    session_id: &str,
    now: DateTime<Utc>,
) -> anyhow::Result<bool> {
    let content = tokio::fs::read_to_string(transcript).await?;
    let Some(record) = record_from_transcript(&content, session_id, now) else {
        tracing::debug!("Transcript has no assistant turn to record");
        return Ok(false);
    };

    // The store creates the project directory on first write.
    TurnStore::new(ctx.layout.last_turn_path(project_root)).save(&record)?;
    tracing::debug!(
        "Captured turn: {} tools, {} files",
        record.tools_used.len(),
        record.files_modified.len()
    );
    Ok(true)
}
