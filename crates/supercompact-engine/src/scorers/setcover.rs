//! EITF with an exclusivity bonus.
//!
//! Entities appearing in at most two turns are effectively unrecoverable if
//! their turns are dropped, so every turn carrying one gets an additive
//! bonus before re-normalization. The bonus is capped at twice the EITF
//! baseline so entity-poor turns cannot ride the bonus alone.

use super::{ScoreContext, ScoreOutput, Scorer, eitf, min_max_normalize, to_output};

const EXCLUSIVE_DF: usize = 2;

pub struct SetCoverScorer;

impl Scorer for SetCoverScorer {
    fn name(&self) -> &'static str {
        "setcover"
    }

    fn score(&self, ctx: &ScoreContext) -> ScoreOutput {
        let baseline = eitf::raw_scores(ctx);

        let mut scores: Vec<f64> = ctx
            .scorable
            .iter()
            .zip(&baseline)
            .map(|(&t, &base)| {
                let bonus: f64 = ctx.entities[t]
                    .iter()
                    .filter(|e| ctx.index.df(e) <= EXCLUSIVE_DF)
                    .map(|e| ctx.config.exclusivity_bonus * e.weight())
                    .sum();
                (base + bonus).min(2.0 * base)
            })
            .collect();

        min_max_normalize(&mut scores);
        to_output(ctx.scorable, scores, Vec::new())
    }
}
