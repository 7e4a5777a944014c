//! Entity-frequency x Inverse-Turn-Frequency scoring.
//!
//! Adapts TF-IDF to entity space: turns carrying many rare, high-weight
//! entities contain information that cannot be recovered from elsewhere in
//! the transcript, so they score highest. No model, sub-second anywhere.

use super::{ScoreContext, ScoreOutput, Scorer, min_max_normalize, to_output};

const K1: f64 = 1.5;
const B: f64 = 0.75;

pub struct EitfScorer;

impl Scorer for EitfScorer {
    fn name(&self) -> &'static str {
        "eitf"
    }

    fn score(&self, ctx: &ScoreContext) -> ScoreOutput {
        let mut scores = raw_scores(ctx);
        min_max_normalize(&mut scores);
        to_output(ctx.scorable, scores, Vec::new())
    }
}

/// Pre-normalization EITF scores, aligned with `ctx.scorable`.
///
///   raw(t) = sum over entities of weight(e) * ln(1 + N / df(e)), divided
///   by the BM25-style length norm L(t) = k1*(1 - b + b*tokens/avg) + 1.
pub(super) fn raw_scores(ctx: &ScoreContext) -> Vec<f64> {
    let n = ctx.scorable.len() as f64;
    let avg_tokens = average_tokens(ctx);

    ctx.scorable
        .iter()
        .map(|&t| {
            let mut sum = 0.0;
            for entity in &ctx.entities[t] {
                let df = ctx.index.df(entity) as f64;
                if df > 0.0 {
                    sum += entity.weight() * (1.0 + n / df).ln();
                }
            }
            sum / length_norm(ctx.turns[t].tokens, avg_tokens)
        })
        .collect()
}

fn average_tokens(ctx: &ScoreContext) -> f64 {
    if ctx.scorable.is_empty() {
        return 1.0;
    }
    let total: u64 = ctx.scorable.iter().map(|&t| ctx.turns[t].tokens as u64).sum();
    (total as f64 / ctx.scorable.len() as f64).max(1.0)
}

fn length_norm(tokens: u32, avg_tokens: f64) -> f64 {
    K1 * (1.0 - B + B * tokens as f64 / avg_tokens) + 1.0
}
