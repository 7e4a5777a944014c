//! Linear orchestration of one compaction pass:
//! tokenize -> extract -> score -> select.
//!
//! Parsing and emission live in the rollout crate; the pipeline consumes a
//! parsed transcript, fills in token counts and returns the selection plus
//! a structured report. Single-threaded, synchronous, no shared state.

use crate::extract::extract_all;
use crate::scorers::{ScoreContext, scorer_for};
use crate::selector::{Selection, scorable_turns, select};
use crate::tokenizer::{ByteEstimator, HeuristicTokenizer, Tokenizer};
use std::collections::BTreeMap;
use std::time::Instant;
use supercompact_rollout::{Transcript, dialect_warning};
use supercompact_types::{CompactConfig, PassReport, Warning};

pub struct Pipeline {
    config: CompactConfig,
    tokenizer: Box<dyn Tokenizer>,
}

#[derive(Debug)]
pub struct PassOutcome {
    pub selection: Selection,
    /// Turn index -> normalized score, for scorable turns only.
    pub scores: BTreeMap<usize, f64>,
    pub report: PassReport,
}

impl Pipeline {
    pub fn new(config: CompactConfig) -> Self {
        Self::with_tokenizer(config, Box::new(HeuristicTokenizer))
    }

    /// Swap the token counter, e.g. for a cheap estimator in tests or a
    /// consumer-calibrated BPE implementation.
    pub fn with_tokenizer(config: CompactConfig, tokenizer: Box<dyn Tokenizer>) -> Self {
        Self { config, tokenizer }
    }

    pub fn config(&self) -> &CompactConfig {
        &self.config
    }

    /// Run one pass over a parsed transcript.
    pub fn run(&self, transcript: &mut Transcript) -> PassOutcome {
        let started = Instant::now();
        let mut warnings: Vec<Warning> = Vec::new();

        if let Some(warning) = dialect_warning(transcript) {
            warnings.push(warning);
        }

        self.count_tokens(transcript, &mut warnings);

        let (entities, index) = extract_all(&transcript.turns);
        let scorable = scorable_turns(&transcript.turns, &self.config);

        let scorer = scorer_for(self.config.method);
        let ctx = ScoreContext {
            turns: &transcript.turns,
            scorable: &scorable,
            entities: &entities,
            index: &index,
            config: &self.config,
        };
        let mut score_output = scorer.score(&ctx);
        warnings.append(&mut score_output.warnings);

        let selection = select(&transcript.turns, &score_output.scores, &self.config);
        if selection.over_budget {
            warnings.push(Warning::BudgetTooSmall {
                required_pinned: selection.kept_tokens(),
                budget: self.config.budget,
            });
        }

        let report = PassReport {
            method: scorer.name().to_string(),
            budget: self.config.budget,
            total_turns: transcript.turns.len(),
            kept_turns: selection.kept.len(),
            dropped_scorable: selection.dropped_scorable.len(),
            total_tokens: selection.total_input_tokens,
            kept_tokens: selection.kept_tokens(),
            user_tokens: selection.user_tokens,
            short_system_tokens: selection.short_system_tokens,
            scored_kept_tokens: selection.scored_kept_tokens,
            scored_dropped_tokens: selection.scored_dropped_tokens,
            over_budget: selection.over_budget,
            elapsed_ms: started.elapsed().as_millis() as u64,
            warnings,
        };

        PassOutcome {
            selection,
            scores: score_output.scores,
            report,
        }
    }

    pub(crate) fn count_tokens_for_eval(&self, transcript: &mut Transcript) {
        let mut warnings = Vec::new();
        self.count_tokens(transcript, &mut warnings);
    }

    /// Fill in per-turn token counts. A tokenizer failure switches every
    /// turn to the byte estimator so all counts come from one measurement.
    fn count_tokens(&self, transcript: &mut Transcript, warnings: &mut Vec<Warning>) {
        let mut counts: Vec<u32> = Vec::with_capacity(transcript.turns.len());
        let mut failed: Option<String> = None;

        for turn in &transcript.turns {
            match self.tokenizer.count(&turn.text) {
                Ok(count) => counts.push(count),
                Err(err) => {
                    failed = Some(err.to_string());
                    break;
                }
            }
        }

        if let Some(reason) = failed {
            tracing::warn!(reason = %reason, "tokenizer failed, falling back to byte estimator");
            warnings.push(Warning::TokenizerFallback { reason });
            let estimator = ByteEstimator;
            counts = transcript
                .turns
                .iter()
                .map(|t| estimator.count(&t.text).expect("byte estimator is total"))
                .collect();
        }

        for (turn, count) in transcript.turns.iter_mut().zip(counts) {
            turn.tokens = count;
        }
    }
}
