// src/cli/hook.rs — Hook payload read from stdin
//
// Agent hooks pipe a JSON object to the command. Every field is optional; an
// interactive terminal, empty input or unparsable input all yield the default.

use serde::Deserialize;
use std::io::IsTerminal;
use tokio::io::AsyncReadExt;

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct HookInput {
    pub session_id: Option<String>,
    pub transcript_path: Option<String>,
    pub cwd: Option<String>,
    pub prompt: Option<String>,
}

impl HookInput {
    pub fn parse(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return Self::default();
        }
        serde_json::from_str(raw).unwrap_or_else(|e| {
            tracing::debug!("Ignoring unparsable hook payload: {}", e);
            Self::default()
        })
    }

    pub fn session_id(&self) -> &str {
        self.session_id.as_deref().unwrap_or("unknown")
    }
}

/// Read the payload if stdin is piped.
pub async fn read_hook_input() -> HookInput {
    if std::io::stdin().is_terminal() {
        return HookInput::default();
    }
    let mut raw = String::new();
    if let Err(e) = tokio::io::stdin().read_to_string(&mut raw).await {
        tracing::debug!("Could not read hook payload: {}", e);
        return HookInput::default();
    }
    HookInput::parse(&raw)
}
