// src/rules/prioritizer.rs — Session-start rule ranking
//
// score = hit_count * 2 + (created within the recency window ? 1 : 0)
// Sorted descending with a stable sort, so ties keep storage order.

use chrono::{DateTime, Duration, Utc};
use std::fmt::Write;

use super::types::Rule;
use crate::infra::config::InjectionConfig;

/// Ranking key for one rule at `now`.
pub fn rule_score(rule: &Rule, now: DateTime<Utc>, recent_days: i64) -> u64 {
    let recent = match Duration::try_days(recent_days) {
        Some(window) => now - rule.created_at <= window,
        // Out of range: every rule is recent, or none is.
        None => recent_days > 0,
    };
    u64::from(rule.hit_count) * 2 + u64::from(recent)
}

/// Rank `rules` for injection and keep at most `max_rules`. Never mutates.
pub fn prioritize<'a>(
    rules: &'a [Rule],
    now: DateTime<Utc>,
    config: &InjectionConfig,
) -> Vec<&'a Rule> {
    let mut ranked: Vec<(u64, &Rule)> = rules
        .iter()
        .map(|r| (rule_score(r, now, config.recent_days), r))
        .collect();
    // sort_by is stable
    ranked.sort_by(|a, b| b.0.cmp(&a.0));
    ranked.truncate(config.max_rules);
    ranked.into_iter().map(|(_, r)| r).collect()
}

/// Markdown block injected at session start. Empty when there is nothing to say.
pub fn render_injection(ranked: &[&Rule], total: usize) -> String {
    if ranked.is_empty() {
        return String::new();
    }

    let mut out = String::new();
    let _ = writeln!(out, "## Project rules learned from earlier corrections");
    let _ = writeln!(out);
    for rule in ranked {
        let _ = writeln!(
            out,
            "- **{}** [{}]: {}",
            rule.name, rule.category, rule.description
        );
        if let Some(bad) = &rule.bad_example {
            let _ = writeln!(out, "  - avoid: `{bad}`");
        }
        if let Some(good) = &rule.good_example {
            let _ = writeln!(out, "  - prefer: `{good}`");
        }
    }
    if total > ranked.len() {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "({} more rules stored; showing the {} most used and most recent)",
            total - ranked.len(),
            ranked.len()
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::Category;

    fn rule(id: &str, hits: u32, age_days: i64, now: DateTime<Utc>) -> Rule {
        Rule {
            id: id.into(),
            name: id.into(),
            description: format!("{id} description"),
            category: Category::Style,
            bad_example: None,
            good_example: None,
            confidence: 0.9,
            created_at: now - Duration::days(age_days),
            hit_count: hits,
        }
    }

    fn ids(ranked: &[&Rule]) -> Vec<String> {
        ranked.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn test_score() {
        let now = Utc::now();
        assert_eq!(rule_score(&rule("a", 3, 1, now), now, 7), 7);
        assert_eq!(rule_score(&rule("a", 3, 30, now), now, 7), 6);
        assert_eq!(rule_score(&rule("a", 0, 30, now), now, 7), 0);
    }

    #[test]
    fn test_score_with_extreme_window() {
        let now = Utc::now();
        assert_eq!(rule_score(&rule("a", 0, 30, now), now, i64::MAX), 1);
        assert_eq!(rule_score(&rule("a", 0, 1, now), now, i64::MIN), 0);
    }

    #[test]
    fn test_hits_outrank_recency() {
        let now = Utc::now();
        let rules = vec![rule("new", 0, 1, now), rule("used", 1, 60, now)];
        let ranked = prioritize(&rules, now, &InjectionConfig::default());
        assert_eq!(ids(&ranked), vec!["used", "new"]);
    }

    #[test]
    fn test_ties_keep_storage_order() {
        let now = Utc::now();
        let rules = vec![
            rule("first", 2, 40, now),
            rule("second", 2, 50, now),
            rule("third", 2, 60, now),
        ];
        let ranked = prioritize(&rules, now, &InjectionConfig::default());
        assert_eq!(ids(&ranked), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_truncates_to_cap() {
        let now = Utc::now();
        let rules: Vec<Rule> = (0..30).map(|i| rule(&format!("r{i}"), i, 30, now)).collect();
        let ranked = prioritize(&rules, now, &InjectionConfig::default());
        assert_eq!(ranked.len(), 20);
        assert_eq!(ranked[0].id, "r29");
        assert_eq!(ranked[19].id, "r10");
    }

    #[test]
    fn test_input_untouched() {
        let now = Utc::now();
        let rules = vec![rule("a", 0, 30, now), rule("b", 5, 30, now)];
        let before = rules.clone();
        let _ = prioritize(&rules, now, &InjectionConfig::default());
        assert_eq!(rules, before);
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_injection(&[], 0), "");
    }

    #[test]
    fn test_render_lists_examples_and_overflow() {
        let now = Utc::now();
        let mut r = rule("no-var", 1, 1, now);
        r.bad_example = Some("var x".into());
        r.good_example = Some("const x".into());
        let text = render_injection(&[&r], 25);
        assert!(text.contains("- **no-var** [style]: no-var description"));
        assert!(text.contains("  - avoid: `var x`"));
        assert!(text.contains("  - prefer: `const x`"));
        assert!(text.contains("(24 more rules stored"));
    }
}
