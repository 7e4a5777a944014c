//! Scorer family: one shared capability, a static registry of methods.
//!
//! Every scorer maps the scorable turns (system role, above the short
//! threshold) to a relevance score in [0, 1]. Scores for pinned or short
//! turns are never produced; the selector's pinning rules cover those.

mod dedup;
mod dry_run;
mod eitf;
mod setcover;

pub use dedup::DedupScorer;
pub use dry_run::DryRunScorer;
pub use eitf::EitfScorer;
pub use setcover::SetCoverScorer;

use std::collections::BTreeMap;
use supercompact_rollout::Turn;
use supercompact_types::{CompactConfig, EntityIndex, EntitySet, Method, Warning};

/// Read-only inputs shared by every scorer run.
pub struct ScoreContext<'a> {
    /// All turns, in order; `entities[i]` is turn i's entity set.
    pub turns: &'a [Turn],
    /// Indices of scorable turns, ascending.
    pub scorable: &'a [usize],
    pub entities: &'a [EntitySet],
    pub index: &'a EntityIndex,
    pub config: &'a CompactConfig,
}

#[derive(Debug, Default)]
pub struct ScoreOutput {
    /// Turn index -> score in [0, 1]; one entry per scorable turn.
    pub scores: BTreeMap<usize, f64>,
    pub warnings: Vec<Warning>,
}

pub trait Scorer: Send + Sync {
    fn name(&self) -> &'static str;

    fn score(&self, ctx: &ScoreContext) -> ScoreOutput;
}

/// Resolve a method name to its scorer.
pub fn scorer_for(method: Method) -> Box<dyn Scorer> {
    match method {
        Method::Eitf => Box::new(EitfScorer),
        Method::SetCover => Box::new(SetCoverScorer),
        Method::Dedup => Box::new(DedupScorer),
        Method::DryRun => Box::new(DryRunScorer),
    }
}

/// Min-max normalize into [0, 1]. When every value is equal the scores are
/// all 1.0 (if positive) or all 0.0, so tie-breaks fall through to recency.
pub(crate) fn min_max_normalize(values: &mut [f64]) {
    let Some(&first) = values.first() else {
        return;
    };

    let mut min = first;
    let mut max = first;
    for &v in values.iter() {
        min = min.min(v);
        max = max.max(v);
    }

    if max > min {
        for v in values.iter_mut() {
            *v = (*v - min) / (max - min);
        }
    } else {
        let fill = if max > 0.0 { 1.0 } else { 0.0 };
        for v in values.iter_mut() {
            *v = fill;
        }
    }
}

pub(crate) fn to_output(scorable: &[usize], scores: Vec<f64>, warnings: Vec<Warning>) -> ScoreOutput {
    debug_assert_eq!(scorable.len(), scores.len());
    ScoreOutput {
        scores: scorable.iter().copied().zip(scores).collect(),
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_max_spreads_range() {
        let mut values = vec![2.0, 4.0, 3.0];
        min_max_normalize(&mut values);
        assert_eq!(values, vec![0.0, 1.0, 0.5]);
    }

    #[test]
    fn test_degenerate_positive_values_become_one() {
        let mut values = vec![0.7, 0.7];
        min_max_normalize(&mut values);
        assert_eq!(values, vec![1.0, 1.0]);
    }

    #[test]
    fn test_degenerate_zero_values_stay_zero() {
        let mut values = vec![0.0, 0.0];
        min_max_normalize(&mut values);
        assert_eq!(values, vec![0.0, 0.0]);
    }

    #[test]
    fn test_registry_names() {
        for method in Method::ALL {
            assert_eq!(scorer_for(method).name(), method.as_str());
        }
    }
}
