//! Entity-coverage evaluation harness.
//!
//! Splits a transcript into prefix and suffix, compacts the prefix with the
//! configured method and budget, then measures how much of the entity mass
//! referenced later in the conversation survives in the kept turns. Used
//! both offline (`--evaluate`) and by tests; no model calls anywhere.

use crate::extract::extract_entities;
use crate::pipeline::Pipeline;
use serde::Serialize;
use supercompact_rollout::parse_str;
use supercompact_types::{Entity, EntitySet, EntityType, Error, PassReport, Result};

#[derive(Debug, Clone, Serialize)]
pub struct TypeCoverage {
    pub etype: EntityType,
    pub covered: usize,
    pub total: usize,
    pub weight: f64,
}

#[derive(Debug, Serialize)]
pub struct EvalReport {
    pub method: String,
    pub budget: u32,
    pub split_ratio: f64,

    pub prefix_turns: usize,
    pub suffix_turns: usize,

    /// Weighted share of suffix-referenced entities present in the kept
    /// prefix, in [0, 1].
    pub coverage: f64,
    pub per_type: Vec<TypeCoverage>,
    /// Entities present in the original prefix but absent from the kept set.
    pub unrecoverable: usize,

    pub suffix_entity_count: usize,
    pub kept_entity_count: usize,

    pub pass: PassReport,
}

/// Run the harness over raw rollout content.
pub fn evaluate(pipeline: &Pipeline, content: &str, split_ratio: f64) -> Result<EvalReport> {
    if !(0.0..1.0).contains(&split_ratio) || split_ratio == 0.0 {
        return Err(Error::InvalidArgument {
            name: "split-ratio".to_string(),
            reason: format!("must be in (0, 1), got {}", split_ratio),
        });
    }

    let mut full = parse_str(content)?;
    pipeline.count_tokens_for_eval(&mut full);

    // Split by turn index, advancing to the next user-turn boundary so the
    // prefix never ends mid-exchange.
    let total = full.turns.len();
    let mut split_idx = (total as f64 * split_ratio) as usize;
    while split_idx < total && !full.turns[split_idx].is_user() {
        split_idx += 1;
    }
    if split_idx == 0 || split_idx >= total {
        return Err(Error::InvalidArgument {
            name: "split-ratio".to_string(),
            reason: format!(
                "split at {}/{} produced an empty prefix or suffix",
                split_idx, total
            ),
        });
    }

    // Re-run the normal parser path over the prefix record slice so turn
    // grouping and indexing start fresh.
    let boundary_record = full.turns[split_idx].span_start();
    let prefix_content: String = full.records[..boundary_record]
        .iter()
        .map(|r| r.raw.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    let mut prefix = parse_str(&prefix_content)?;
    let outcome = pipeline.run(&mut prefix);

    // Entities a resuming agent will reference later.
    let config = pipeline.config();
    let mut future = EntitySet::new();
    for turn in &full.turns[split_idx..] {
        if !turn.is_user() && !turn.is_compaction_marker && turn.tokens > config.short_threshold {
            future.extend(extract_entities(&turn.text));
        }
    }

    let mut kept = EntitySet::new();
    for &idx in &outcome.selection.kept {
        kept.extend(extract_entities(&prefix.turns[idx].text));
    }

    let mut prefix_all = EntitySet::new();
    for turn in &prefix.turns {
        prefix_all.extend(extract_entities(&turn.text));
    }

    let coverage = weighted_coverage(&future, &kept);
    let per_type = type_breakdown(&future, &kept);
    let unrecoverable = prefix_all.difference(&kept).count();

    Ok(EvalReport {
        method: outcome.report.method.clone(),
        budget: outcome.report.budget,
        split_ratio,
        prefix_turns: prefix.turns.len(),
        suffix_turns: total - split_idx,
        coverage,
        per_type,
        unrecoverable,
        suffix_entity_count: future.len(),
        kept_entity_count: kept.len(),
        pass: outcome.report,
    })
}

fn weighted_coverage(future: &EntitySet, kept: &EntitySet) -> f64 {
    let total: f64 = future.iter().map(Entity::weight).sum();
    if total == 0.0 {
        return 1.0;
    }
    let covered: f64 = future.iter().filter(|e| kept.contains(*e)).map(|e| e.weight()).sum();
    covered / total
}

fn type_breakdown(future: &EntitySet, kept: &EntitySet) -> Vec<TypeCoverage> {
    EntityType::ALL
        .iter()
        .filter_map(|&etype| {
            let of_type: Vec<&Entity> = future.iter().filter(|e| e.etype == etype).collect();
            if of_type.is_empty() {
                return None;
            }
            let covered = of_type.iter().filter(|e| kept.contains(**e)).count();
            Some(TypeCoverage {
                etype,
                covered,
                total: of_type.len(),
                weight: etype.weight(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use supercompact_testing::{RolloutBuilder, long_text};
    use supercompact_types::{CompactConfig, Method};

    fn fixture_content() -> String {
        // Ten exchanges; the suffix re-references the config path from the
        // middle of the conversation.
        let mut builder = RolloutBuilder::new().session_meta("s1", "0.48.0");
        for i in 0..7 {
            builder = builder.user(&format!("step {}", i)).assistant(&long_text(
                &format!("work on /srv/app/module_{}.rs with care", i),
                400,
            ));
        }
        builder = builder
            .user("final stretch")
            .assistant(&long_text("revisit /srv/app/module_2.rs and port :9443", 400))
            .user("wrap up")
            .assistant(&long_text("close out /srv/app/module_2.rs cleanly", 400));
        builder.build()
    }

    #[test]
    fn test_full_budget_gives_full_coverage_of_prefix_entities() {
        let pipeline = Pipeline::new(CompactConfig {
            method: Method::Eitf,
            budget: 1_000_000,
            ..CompactConfig::default()
        });
        let report = evaluate(&pipeline, &fixture_content(), 0.7).unwrap();

        assert!(report.prefix_turns > 0);
        assert!(report.suffix_turns > 0);
        // Everything in the prefix was kept, so any suffix entity that
        // exists in the prefix is covered.
        assert_eq!(report.unrecoverable, 0);
        let module2 = report
            .per_type
            .iter()
            .find(|t| t.etype == EntityType::FilePath)
            .unwrap();
        assert!(module2.covered >= 1);
    }

    #[test]
    fn test_invalid_split_ratio_is_rejected() {
        let pipeline = Pipeline::new(CompactConfig::default());
        assert!(evaluate(&pipeline, &fixture_content(), 0.0).is_err());
        assert!(evaluate(&pipeline, &fixture_content(), 1.0).is_err());
    }

    #[test]
    fn test_tight_budget_lowers_coverage() {
        let generous = Pipeline::new(CompactConfig {
            budget: 1_000_000,
            ..CompactConfig::default()
        });
        let tight = Pipeline::new(CompactConfig {
            budget: 1_500,
            ..CompactConfig::default()
        });

        let content = fixture_content();
        let full = evaluate(&generous, &content, 0.7).unwrap();
        let small = evaluate(&tight, &content, 0.7).unwrap();
        assert!(small.coverage <= full.coverage);
        assert!(small.pass.kept_tokens <= full.pass.kept_tokens);
    }
}
