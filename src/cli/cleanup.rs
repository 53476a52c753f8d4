// src/cli/cleanup.rs — Remove stale prior-turn records

use chrono::{DateTime, Utc};

use super::AppContext;
use crate::storage::TurnStore;

/// Handle `rulecatch cleanup`.
pub async fn run_cleanup(ctx: &AppContext) -> anyhow::Result<()> {
    let removed = cleanup_stale(ctx, Utc::now());
    if removed > 0 {
        println!("Removed {removed} stale turn record(s)");
    }
    Ok(())
}

/// Delete every record older than the cleanup window (or unreadable).
/// Per-file failures are logged and skipped. Returns how many were removed.
pub fn cleanup_stale(ctx: &AppContext, now: DateTime<Utc>) -> usize {
    let window = ctx.config.cleanup.staleness();
    let mut removed = 0;
    for path in ctx.layout.all_last_turn_paths() {
        match TurnStore::new(&path).remove_if_stale(now, window) {
            Ok(true) => {
                tracing::debug!("Removed stale record {}", path.display());
                removed += 1;
            }
            Ok(false) => {}
            Err(e) => tracing::warn!("Could not clean {}: {}", path.display(), e),
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::PriorTurnRecord;
    use crate::infra::config::Config;
    use crate::infra::paths::StorageLayout;
    use chrono::Duration;
    use std::path::Path;
    use tempfile::TempDir;

    #[test]
    fn test_cleanup_only_removes_stale() {
        let dir = TempDir::new().unwrap();
        let ctx = AppContext::new(StorageLayout::new(dir.path()), Config::default());
        let now = Utc::now();

        let fresh = Path::new("/w/fresh");
        let stale = Path::new("/w/stale");
        TurnStore::new(ctx.layout.last_turn_path(fresh))
            .save(&PriorTurnRecord::new("a", now - Duration::minutes(10)))
            .unwrap();
        TurnStore::new(ctx.layout.last_turn_path(stale))
            .save(&PriorTurnRecord::new("b", now - Duration::minutes(45)))
            .unwrap();

        assert_eq!(cleanup_stale(&ctx, now), 1);
        assert!(ctx.layout.last_turn_path(fresh).exists());
        assert!(!ctx.layout.last_turn_path(stale).exists());
        assert_eq!(cleanup_stale(&ctx, now), 0);
    }

    #[test]
    fn test_oversized_window_keeps_default() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.cleanup.staleness_secs = 10_000_000_000_000_000;
        let ctx = AppContext::new(StorageLayout::new(dir.path()), config);
        let now = Utc::now();

        let stale = Path::new("/w/stale");
        TurnStore::new(ctx.layout.last_turn_path(stale))
            .save(&PriorTurnRecord::new("b", now - Duration::minutes(45)))
            .unwrap();
        assert_eq!(cleanup_stale(&ctx, now), 1);
    }

    #[test]
    fn test_cleanup_without_projects_dir() {
        let dir = TempDir::new().unwrap();
        let ctx = AppContext::new(StorageLayout::new(dir.path().join("missing")), Config::default());
        assert_eq!(cleanup_stale(&ctx, Utc::now()), 0);
    }
}
