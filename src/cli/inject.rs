// src/cli/inject.rs — Session-start hook: print the ranked rule payload

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

use super::hook::read_hook_input;
use super::{resolve_project_root, AppContext};
use crate::rules::{prioritize, render_injection};
use crate::storage::RuleStore;

/// Handle `rulecatch inject`. Prints nothing when there are no rules.
pub async fn run_inject(ctx: &AppContext, cwd: Option<PathBuf>) -> anyhow::Result<()> {
    let hook = read_hook_input().await;
    match resolve_project_root(cwd, hook.cwd.as_deref()) {
        Ok(root) => print!("{}", injection_payload(ctx, &root, Utc::now())),
        Err(e) => tracing::warn!("Cannot resolve project directory: {}", e),
    }
    Ok(())
}

pub fn injection_payload(ctx: &AppContext, project_root: &Path, now: DateTime<Utc>) -> String {
    let set = RuleStore::new(ctx.layout.rules_path(project_root)).load_or_empty();
    let ranked = prioritize(&set.rules, now, &ctx.config.injection);
    tracing::debug!("Injecting {} of {} rules", ranked.len(), set.rules.len());
    render_injection(&ranked, set.rules.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::Category;
    use crate::infra::config::Config;
    use crate::infra::paths::StorageLayout;
    use crate::storage::NewRule;
    use tempfile::TempDir;

    #[test]
    fn test_empty_collection_prints_nothing() {
        let dir = TempDir::new().unwrap();
        let ctx = AppContext::new(StorageLayout::new(dir.path()), Config::default());
        assert_eq!(injection_payload(&ctx, Path::new("/w"), Utc::now()), "");
    }

    #[test]
    fn test_payload_lists_stored_rules() {
        let dir = TempDir::new().unwrap();
        let ctx = AppContext::new(StorageLayout::new(dir.path()), Config::default());
        let root = Path::new("/w");
        RuleStore::new(ctx.layout.rules_path(root))
            .add(
                NewRule {
                    name: "Prefer const".into(),
                    description: "Use const for bindings that never change".into(),
                    category: Category::Style,
                    bad_example: Some("var".into()),
                    good_example: Some("const".into()),
                    confidence: 0.9,
                },
                Utc::now(),
                0.85,
            )
            .unwrap();

        let payload = injection_payload(&ctx, root, Utc::now());
        assert!(payload.contains("**Prefer const** [style]"));
        assert!(payload.contains("avoid: `var`"));
    }
}
