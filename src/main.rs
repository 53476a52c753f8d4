// src/main.rs — rulecatch entry point

use clap::Parser;

use rulecatch::cli::{AppContext, Cli, Commands};
use rulecatch::infra::config::Config;
use rulecatch::infra::logger;
use rulecatch::infra::paths::{self, StorageLayout};

#[tokio::main]
async fn main() {
    // Logs go to stderr (respects RUST_LOG / RULECATCH_LOG)
    logger::init_logging("warn");

    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let home = cli
        .home
        .clone()
        .or_else(paths::default_home)
        .ok_or_else(|| anyhow::anyhow!("No home directory found; pass --home or set RULECATCH_HOME"))?;
    let layout = StorageLayout::new(home);

    let loaded = match cli.config {
        Some(ref path) => Config::load_from(path),
        None => Config::load(&layout),
    };
    let config = match loaded {
        Ok(c) => c,
        // Hooks must not break the agent session over a bad config file
        Err(e) if is_hook(&cli.command) => {
            tracing::warn!("Using default config: {}", e);
            Config::default()
        }
        Err(e) => return Err(e.into()),
    };

    let ctx = AppContext::new(layout, config);

    match cli.command {
        Commands::Detect { message, cwd, json } => {
            rulecatch::cli::detect::run_detect(&ctx, message, cwd, json).await
        }
        Commands::Capture { transcript, cwd } => {
            rulecatch::cli::capture::run_capture(&ctx, transcript, cwd).await
        }
        Commands::Inject { cwd } => rulecatch::cli::inject::run_inject(&ctx, cwd).await,
        Commands::Rules { cwd, action } => rulecatch::cli::rules::run_rules(&ctx, cwd, action).await,
        Commands::Cleanup => rulecatch::cli::cleanup::run_cleanup(&ctx).await,
    }
}

fn is_hook(command: &Commands) -> bool {
    !matches!(command, Commands::Rules { .. })
}
