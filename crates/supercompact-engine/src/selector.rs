//! Budget-constrained turn selection.
//!
//! Three tiers: user turns and short system turns are always kept, along
//! with prior compaction markers; long system turns compete for the rest of
//! the budget by recency-adjusted score. Selection is a pure function of
//! its inputs; every tie-break is total.

use std::collections::{BTreeMap, BTreeSet};
use supercompact_rollout::Turn;
use supercompact_types::CompactConfig;

#[derive(Debug, Default)]
pub struct Selection {
    /// Kept turn indices in original turn order.
    pub kept: Vec<usize>,
    /// Scorable turns that did not make the budget, ascending.
    pub dropped_scorable: Vec<usize>,

    pub user_tokens: u64,
    pub short_system_tokens: u64,
    pub scored_kept_tokens: u64,
    pub scored_dropped_tokens: u64,
    pub total_input_tokens: u64,

    /// True when the pinned set alone exceeded the budget; only pinned
    /// turns are kept in that case.
    pub over_budget: bool,
}

impl Selection {
    pub fn kept_tokens(&self) -> u64 {
        self.user_tokens + self.short_system_tokens + self.scored_kept_tokens
    }

    pub fn contains(&self, turn_index: usize) -> bool {
        self.kept.binary_search(&turn_index).is_ok()
    }
}

/// Indices of scorable turns: system role, above the short threshold, not a
/// compaction marker.
pub fn scorable_turns(turns: &[Turn], config: &CompactConfig) -> Vec<usize> {
    turns
        .iter()
        .filter(|t| !t.is_user() && !t.is_compaction_marker && t.tokens > config.short_threshold)
        .map(|t| t.index)
        .collect()
}

/// Select turns to keep within the token budget.
///
/// `scores` must hold one entry per scorable turn.
pub fn select(turns: &[Turn], scores: &BTreeMap<usize, f64>, config: &CompactConfig) -> Selection {
    let mut selection = Selection::default();
    let total_turns = turns.len();

    let mut kept: BTreeSet<usize> = BTreeSet::new();
    let mut pinned_tokens: u64 = 0;

    let scorable = scorable_turns(turns, config);

    for turn in turns {
        let tokens = turn.tokens as u64;
        selection.total_input_tokens += tokens;

        if turn.is_user() {
            selection.user_tokens += tokens;
            pinned_tokens += tokens;
            kept.insert(turn.index);
        } else if turn.is_compaction_marker || turn.tokens <= config.short_threshold {
            selection.short_system_tokens += tokens;
            pinned_tokens += tokens;
            kept.insert(turn.index);
        }
    }

    // Pinning wins over the budget: emit the pinned set even when it does
    // not fit, but keep nothing else and flag the overrun.
    if pinned_tokens > config.budget as u64 {
        selection.over_budget = true;
        selection.dropped_scorable = scorable.clone();
        selection.scored_dropped_tokens = scorable.iter().map(|&t| turns[t].tokens as u64).sum();
        selection.kept = kept.into_iter().collect();
        return selection;
    }

    let mut remaining = config.budget as u64 - pinned_tokens;
    let mut dropped: BTreeSet<usize> = BTreeSet::new();

    // The most recent scorable turn is taken ahead of the score-ordered
    // walk, budget permitting.
    let recency_pin = scorable.last().copied();
    if let Some(last) = recency_pin {
        let tokens = turns[last].tokens as u64;
        if tokens <= remaining {
            kept.insert(last);
            selection.scored_kept_tokens += tokens;
            remaining -= tokens;
        } else {
            dropped.insert(last);
        }
    }

    // Recency-adjusted scores, sorted descending; ties break toward the
    // higher turn index.
    let mut candidates: Vec<(f64, usize)> = scorable
        .iter()
        .filter(|&&t| !kept.contains(&t) && !dropped.contains(&t))
        .map(|&t| {
            let recency = if total_turns > 1 {
                t as f64 / (total_turns - 1) as f64
            } else {
                0.0
            };
            let score = scores.get(&t).copied().unwrap_or(0.0);
            (score + config.recency_bonus * recency, t)
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(b.1.cmp(&a.1))
    });

    // Strict descending greedy: stop at the first candidate that does not
    // fit instead of hunting for a smaller one.
    let mut walk = candidates.iter();
    for &(_, t) in walk.by_ref() {
        let tokens = turns[t].tokens as u64;
        if tokens <= remaining {
            kept.insert(t);
            selection.scored_kept_tokens += tokens;
            remaining -= tokens;
        } else {
            dropped.insert(t);
            break;
        }
    }
    for &(_, t) in walk {
        dropped.insert(t);
    }

    selection.scored_dropped_tokens = dropped.iter().map(|&t| turns[t].tokens as u64).sum();
    selection.dropped_scorable = dropped.into_iter().collect();
    selection.kept = kept.into_iter().collect();
    selection
}

#[cfg(test)]
mod tests {
    use super::*;
    use supercompact_rollout::{Role, Turn};

    fn turn(index: usize, role: Role, tokens: u32) -> Turn {
        Turn {
            index,
            role,
            records: vec![index],
            text: String::new(),
            tokens,
            is_compaction_marker: false,
        }
    }

    fn alternating(token_counts: &[(Role, u32)]) -> Vec<Turn> {
        token_counts
            .iter()
            .enumerate()
            .map(|(i, &(role, tokens))| turn(i, role, tokens))
            .collect()
    }

    fn config(budget: u32) -> CompactConfig {
        CompactConfig {
            budget,
            ..CompactConfig::default()
        }
    }

    #[test]
    fn test_user_turns_always_kept() {
        let turns = alternating(&[
            (Role::User, 200),
            (Role::System, 800),
            (Role::User, 200),
            (Role::System, 800),
        ]);
        let mut scores = BTreeMap::new();
        scores.insert(1, 0.9);
        scores.insert(3, 0.1);

        let selection = select(&turns, &scores, &config(100_000));
        assert!(selection.contains(0));
        assert!(selection.contains(2));
    }

    #[test]
    fn test_pin_only_fit_drops_scorable() {
        // 3 user turns at 200 tokens, one scorable at 600, budget 1000:
        // pinned = 600, adding the scorable would reach 1200.
        let turns = alternating(&[
            (Role::User, 200),
            (Role::System, 600),
            (Role::User, 200),
            (Role::User, 200),
        ]);
        let mut scores = BTreeMap::new();
        scores.insert(1, 1.0);

        let selection = select(&turns, &scores, &config(1000));
        assert!(!selection.over_budget);
        assert_eq!(selection.kept, vec![0, 2, 3]);
        assert_eq!(selection.dropped_scorable, vec![1]);
        assert_eq!(selection.kept_tokens(), 600);
    }

    #[test]
    fn test_over_budget_pinning_wins() {
        let turns: Vec<Turn> = (0..10).map(|i| turn(i, Role::User, 400)).collect();
        let selection = select(&turns, &BTreeMap::new(), &config(1000));
        assert!(selection.over_budget);
        assert_eq!(selection.kept.len(), 10);
        assert_eq!(selection.kept_tokens(), 4000);
    }

    #[test]
    fn test_recency_wins_ties() {
        // Two scorable turns with identical scores and tokens; budget fits
        // exactly one beyond the recency pin... so make three, where the
        // last is the recency pin and the first two tie.
        let turns = alternating(&[
            (Role::User, 10),
            (Role::System, 500),
            (Role::User, 10),
            (Role::System, 500),
            (Role::User, 10),
            (Role::System, 400),
        ]);
        let mut scores = BTreeMap::new();
        scores.insert(1, 0.5);
        scores.insert(3, 0.5);
        scores.insert(5, 0.1);

        // Budget: pinned 30 + recency pin 400 + one 500-token turn.
        let selection = select(&turns, &scores, &config(930));
        assert!(selection.contains(3));
        assert!(!selection.contains(1));
    }

    #[test]
    fn test_strict_descending_stops_at_first_nonfit() {
        let turns = alternating(&[
            (Role::User, 10),
            (Role::System, 900),
            (Role::User, 10),
            (Role::System, 350),
            (Role::User, 10),
            (Role::System, 400),
        ]);
        let mut scores = BTreeMap::new();
        scores.insert(1, 0.9); // best score, too big
        scores.insert(3, 0.5); // would fit, but the walk already stopped
        scores.insert(5, 0.0);

        // pinned 30, recency pin takes turn 5 (400), remaining 470.
        let selection = select(&turns, &scores, &config(900));
        assert!(selection.contains(5));
        assert!(!selection.contains(1));
        assert!(!selection.contains(3));
        assert_eq!(selection.dropped_scorable, vec![1, 3]);
    }

    #[test]
    fn test_recency_pin_yields_when_it_does_not_fit() {
        let turns = alternating(&[
            (Role::User, 10),
            (Role::System, 350),
            (Role::User, 10),
            (Role::System, 800),
        ]);
        let mut scores = BTreeMap::new();
        scores.insert(1, 0.2);
        scores.insert(3, 0.9);

        // pinned 20, remaining 480: turn 3 (the recency pin) cannot fit,
        // turn 1 still can.
        let selection = select(&turns, &scores, &config(500));
        assert!(!selection.contains(3));
        assert!(selection.contains(1));
        assert_eq!(selection.dropped_scorable, vec![3]);
    }

    #[test]
    fn test_markers_are_pinned_regardless_of_size() {
        let mut turns = alternating(&[(Role::User, 10), (Role::System, 350)]);
        let mut marker = turn(2, Role::System, 2000);
        marker.is_compaction_marker = true;
        turns.push(marker);

        let mut scores = BTreeMap::new();
        scores.insert(1, 0.5);

        let selection = select(&turns, &scores, &config(3000));
        assert!(selection.contains(2));
    }

    #[test]
    fn test_selection_is_deterministic() {
        let turns = alternating(&[
            (Role::User, 10),
            (Role::System, 400),
            (Role::User, 10),
            (Role::System, 400),
            (Role::User, 10),
            (Role::System, 400),
        ]);
        let mut scores = BTreeMap::new();
        scores.insert(1, 0.3);
        scores.insert(3, 0.3);
        scores.insert(5, 0.3);

        let a = select(&turns, &scores, &config(850));
        let b = select(&turns, &scores, &config(850));
        assert_eq!(a.kept, b.kept);
        assert_eq!(a.dropped_scorable, b.dropped_scorable);
    }
}
