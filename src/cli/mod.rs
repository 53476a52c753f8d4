// src/cli/mod.rs — CLI definition (clap derive)

pub mod capture;
pub mod cleanup;
pub mod detect;
pub mod hook;
pub mod inject;
pub mod rules;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::detector::Category;
use crate::infra::config::Config;
use crate::infra::paths::StorageLayout;

#[derive(Parser)]
#[command(
    name = "rulecatch",
    about = "Notice corrections in chat and turn them into project rules",
    version
)]
pub struct Cli {
    /// Storage root (defaults to the platform data directory)
    #[arg(long, env = "RULECATCH_HOME", global = true)]
    pub home: Option<PathBuf>,

    /// Config file path (defaults to <home>/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score a user message; prints a directive when it looks like a correction
    Detect {
        /// Message to score (defaults to the hook payload's prompt)
        #[arg(long)]
        message: Option<String>,
        /// Project directory (defaults to the hook payload's cwd)
        #[arg(long)]
        cwd: Option<PathBuf>,
        /// Print the raw detection result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Record the last automated turn from a session transcript
    Capture {
        /// JSONL transcript (defaults to the hook payload's transcript_path)
        #[arg(long)]
        transcript: Option<PathBuf>,
        #[arg(long)]
        cwd: Option<PathBuf>,
    },
    /// Print the ranked rules for a new session
    Inject {
        #[arg(long)]
        cwd: Option<PathBuf>,
    },
    /// Manage the project's rule collection
    Rules {
        #[arg(long, global = true)]
        cwd: Option<PathBuf>,
        #[command(subcommand)]
        action: RulesAction,
    },
    /// Delete stale prior-turn records across all projects
    Cleanup,
}

#[derive(Subcommand, Clone)]
pub enum RulesAction {
    /// List rules in injection order
    List {
        /// Print the stored collection as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a rule (near-duplicate names reinforce the existing rule)
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        /// naming, error-handling, architecture, testing, style, imports or other
        #[arg(long, default_value = "other")]
        category: Category,
        /// Pattern to avoid
        #[arg(long)]
        bad: Option<String>,
        /// Pattern to use instead
        #[arg(long)]
        good: Option<String>,
        #[arg(long, default_value = "0.8")]
        confidence: f32,
    },
    /// Count one application of a rule
    Hit { id: String },
    /// Delete a rule
    Remove { id: String },
}

/// What every handler needs: where state lives and how to behave.
pub struct AppContext {
    pub layout: StorageLayout,
    pub config: Config,
}

impl AppContext {
    pub fn new(layout: StorageLayout, config: Config) -> Self {
        Self { layout, config }
    }
}

/// Project directory from the flag, then the hook payload, then the process cwd.
pub fn resolve_project_root(flag: Option<PathBuf>, hook_cwd: Option<&str>) -> anyhow::Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    if let Some(dir) = hook_cwd.filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    Ok(std::env::current_dir()?)
}
