// src/cli/rules.rs — Rule collection management

use chrono::Utc;
use std::path::PathBuf;

use super::{resolve_project_root, AppContext, RulesAction};
use crate::infra::errors::RulecatchError;
use crate::rules::{prioritize, rule_score};
use crate::storage::{AddOutcome, NewRule, RuleStore};

/// Handle `rulecatch rules`. Unlike the hook commands, failures here are
/// reported and exit non-zero.
pub async fn run_rules(ctx: &AppContext, cwd: Option<PathBuf>, action: RulesAction) -> anyhow::Result<()> {
    let root = resolve_project_root(cwd, None)?;
    let store = RuleStore::new(ctx.layout.rules_path(&root));

    match action {
        RulesAction::List { json } => list_rules(ctx, &store, json)?,
        RulesAction::Add {
            name,
            description,
            category,
            bad,
            good,
            confidence,
        } => {
            let outcome = store.add(
                NewRule {
                    name,
                    description,
                    category,
                    bad_example: bad,
                    good_example: good,
                    confidence,
                },
                Utc::now(),
                ctx.config.rules.dedup_similarity,
            )
            .map_err(|e| storage_error(&store, e))?;
            match outcome {
                AddOutcome::Created(id) => println!("Added rule {id}"),
                AddOutcome::Reinforced(id) => {
                    println!("Similar rule {id} already exists; counted as a hit")
                }
            }
        }
        RulesAction::Hit { id } => {
            let hits = store.record_hit(&id).map_err(|e| storage_error(&store, e))?;
            println!("{id}: {hits} hits");
        }
        RulesAction::Remove { id } => {
            let removed = store.remove(&id).map_err(|e| storage_error(&store, e))?;
            println!("Removed rule {} ({})", removed.id, removed.name);
        }
    }
    Ok(())
}

/// Point at the rule file when the failure came from reading or writing it.
fn storage_error(store: &RuleStore, e: RulecatchError) -> anyhow::Error {
    if e.is_storage() {
        anyhow::anyhow!("{} ({})", e, store.path().display())
    } else {
        e.into()
    }
}

fn list_rules(ctx: &AppContext, store: &RuleStore, json: bool) -> anyhow::Result<()> {
    let set = store.load().map_err(|e| storage_error(store, e))?;
    if json {
        println!("{}", serde_json::to_string_pretty(&set)?);
        return Ok(());
    }
    if set.rules.is_empty() {
        println!("No rules stored for this project.");
        return Ok(());
    }

    let now = Utc::now();
    let mut all = ctx.config.injection.clone();
    all.max_rules = set.rules.len();
    println!("{:<32} {:<15} {:>5} {:>6}  name", "id", "category", "hits", "score");
    for rule in prioritize(&set.rules, now, &all) {
        println!(
            "{:<32} {:<15} {:>5} {:>6}  {}",
            rule.id,
            rule.category,
            rule.hit_count,
            rule_score(rule, now, ctx.config.injection.recent_days),
            rule.name,
        );
    }
    Ok(())
}
