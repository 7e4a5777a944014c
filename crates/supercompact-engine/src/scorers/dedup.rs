//! Unique-content scoring via suffix automaton.
//!
//! Each scorable turn is matched against the automaton of all earlier
//! scorable turns, so its score is the fraction of characters it is first
//! to introduce. Repeats shorter than `min_repeat_len` do not count as
//! seen. The automaton is linear in total characters, which makes it the
//! pipeline's largest memory consumer; a size gate returns zero scores
//! instead of building it for pathological inputs.

use super::{ScoreContext, ScoreOutput, Scorer, min_max_normalize, to_output};
use crate::automaton::SuffixAutomaton;
use supercompact_types::Warning;

const SENTINEL: char = '\u{0}';

pub struct DedupScorer;

impl Scorer for DedupScorer {
    fn name(&self) -> &'static str {
        "dedup"
    }

    fn score(&self, ctx: &ScoreContext) -> ScoreOutput {
        let total_chars: usize = ctx
            .scorable
            .iter()
            .map(|&t| ctx.turns[t].text.chars().count())
            .sum();

        if total_chars > ctx.config.dedup_max_chars {
            tracing::warn!(
                chars = total_chars,
                max_chars = ctx.config.dedup_max_chars,
                "dedup input exceeds size gate, returning zero scores"
            );
            let zeros = vec![0.0; ctx.scorable.len()];
            return to_output(
                ctx.scorable,
                zeros,
                vec![Warning::DedupInputTooLarge {
                    chars: total_chars,
                    max_chars: ctx.config.dedup_max_chars,
                }],
            );
        }

        let mut sa = SuffixAutomaton::new();
        let mut scores = Vec::with_capacity(ctx.scorable.len());

        for &t in ctx.scorable {
            let text = &ctx.turns[t].text;
            scores.push(unique_ratio(&sa, text, ctx.config.min_repeat_len));
            sa.extend_str(text);
            sa.extend(SENTINEL);
        }

        tracing::debug!(states = sa.state_count(), chars = total_chars, "dedup automaton built");

        min_max_normalize(&mut scores);
        to_output(ctx.scorable, scores, Vec::new())
    }
}

/// Fraction of `text` not covered by a repeat of length >= `min_repeat_len`
/// against the automaton of earlier turns.
fn unique_ratio(sa: &SuffixAutomaton, text: &str, min_repeat_len: usize) -> f64 {
    let total = text.chars().count();
    if total == 0 {
        return 1.0;
    }

    let match_lens = sa.match_lengths(text);
    let mut duplicated = 0usize;

    // Greedy sweep: a match of length L ending at i covers [i-L+1, i].
    let mut covered_until: isize = -1;
    for (i, &len) in match_lens.iter().enumerate() {
        if len < min_repeat_len {
            continue;
        }
        let i = i as isize;
        let start = i - len as isize + 1;
        if start > covered_until {
            duplicated += len;
        } else if i > covered_until {
            duplicated += (i - covered_until) as usize;
        }
        covered_until = covered_until.max(i);
    }

    (total - duplicated) as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_all;
    use supercompact_rollout::parse_str;
    use supercompact_testing::{RolloutBuilder, long_text};
    use supercompact_types::CompactConfig;

    fn score_transcript(content: &str, scorable: Vec<usize>, config: CompactConfig) -> ScoreOutput {
        let mut transcript = parse_str(content).unwrap();
        for turn in &mut transcript.turns {
            turn.tokens = 400;
        }
        let (entities, index) = extract_all(&transcript.turns);
        let ctx = ScoreContext {
            turns: &transcript.turns,
            scorable: &scorable,
            entities: &entities,
            index: &index,
            config: &config,
        };
        DedupScorer.score(&ctx)
    }

    #[test]
    fn test_identical_turns_leave_one_nonzero_score() {
        let body = long_text("the very same diagnostic output repeated verbatim", 400);
        let content = RolloutBuilder::new()
            .user("a")
            .assistant(&body)
            .user("b")
            .assistant(&body)
            .user("c")
            .assistant(&body)
            .build();

        let output = score_transcript(&content, vec![1, 3, 5], CompactConfig::default());
        assert_eq!(output.scores[&1], 1.0);
        assert_eq!(output.scores[&3], 0.0);
        assert_eq!(output.scores[&5], 0.0);
    }

    #[test]
    fn test_scores_stay_in_unit_interval() {
        let content = RolloutBuilder::new()
            .user("a")
            .assistant(&long_text("first block of genuinely novel content", 400))
            .user("b")
            .assistant(&long_text("second block sharing nothing with one", 400))
            .build();

        let output = score_transcript(&content, vec![1, 3], CompactConfig::default());
        for score in output.scores.values() {
            assert!((0.0..=1.0).contains(score));
        }
    }

    #[test]
    fn test_short_repeats_do_not_count_as_seen() {
        let body = long_text("tiny", 400);
        let other = long_text("tiny", 400);
        let config = CompactConfig {
            min_repeat_len: 100_000,
            ..CompactConfig::default()
        };
        let content = RolloutBuilder::new()
            .user("a")
            .assistant(&body)
            .user("b")
            .assistant(&other)
            .build();

        // With an unreachable repeat threshold everything counts as unique.
        let output = score_transcript(&content, vec![1, 3], config);
        assert_eq!(output.scores[&1], 1.0);
        assert_eq!(output.scores[&3], 1.0);
    }

    #[test]
    fn test_size_gate_returns_zeros_with_warning() {
        let config = CompactConfig {
            dedup_max_chars: 10,
            ..CompactConfig::default()
        };
        let content = RolloutBuilder::new()
            .user("a")
            .assistant(&long_text("well beyond ten characters", 400))
            .build();

        let output = score_transcript(&content, vec![1], config);
        assert_eq!(output.scores[&1], 0.0);
        assert!(matches!(
            output.warnings.as_slice(),
            [Warning::DedupInputTooLarge { .. }]
        ));
    }
}
