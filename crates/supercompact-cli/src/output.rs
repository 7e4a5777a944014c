//! Console reporting and the scores CSV.
//!
//! Human-facing chatter goes to stderr so stdout stays reserved for the
//! emitted log when no --output path is given.

use owo_colors::OwoColorize;
use std::collections::BTreeMap;
use supercompact_engine::{EvalReport, PassOutcome};
use supercompact_rollout::Transcript;
use supercompact_types::{Warning, preview};

pub fn print_progress(message: &str) {
    eprintln!("{}", message);
}

/// Selection statistics after a pass.
pub fn print_stats(outcome: &PassOutcome) {
    let report = &outcome.report;

    eprintln!();
    eprintln!("{}", "Turn budget allocation".bold());
    eprintln!(
        "  {:<26} {:>10}   {}",
        "user turns",
        report.user_tokens,
        "always kept".bright_black()
    );
    eprintln!(
        "  {:<26} {:>10}   {}",
        "short system turns",
        report.short_system_tokens,
        "always kept".bright_black()
    );
    eprintln!(
        "  {:<26} {:>10}   {}",
        "scored system (kept)",
        report.scored_kept_tokens,
        "selected by score".bright_black()
    );
    eprintln!(
        "  {:<26} {:>10}   {}",
        "scored system (dropped)",
        report.scored_dropped_tokens,
        "below cutoff".bright_black()
    );
    eprintln!(
        "  {:<26} {:>10}   budget: {}",
        "total kept".bold(),
        report.kept_tokens,
        report.budget
    );

    if report.total_tokens > 0 {
        let ratio = report.compression();
        eprintln!(
            "\nCompression: {} -> {} tokens ({:.1}% kept)",
            report.total_tokens,
            report.kept_tokens,
            ratio * 100.0
        );
    }

    eprintln!(
        "Method: {} | wall time: {} ms",
        report.method, report.elapsed_ms
    );
}

/// Detailed per-turn breakdown for --verbose.
pub fn print_score_details(transcript: &Transcript, outcome: &PassOutcome) {
    let mut kept: Vec<(usize, f64)> = Vec::new();
    let mut dropped: Vec<(usize, f64)> = Vec::new();

    for (&idx, &score) in &outcome.scores {
        if outcome.selection.contains(idx) {
            kept.push((idx, score));
        } else {
            dropped.push((idx, score));
        }
    }
    let by_score_desc = |a: &(usize, f64), b: &(usize, f64)| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(b.0.cmp(&a.0))
    };
    kept.sort_by(by_score_desc);
    dropped.sort_by(by_score_desc);

    eprintln!("\n{}", "Kept scored turns".bold());
    for (idx, score) in &kept {
        print_turn_row(transcript, *idx, *score);
    }

    if !dropped.is_empty() {
        eprintln!("\n{}", "Dropped turns".bold());
        for (idx, score) in dropped.iter().take(20) {
            print_turn_row(transcript, *idx, *score);
        }
        if dropped.len() > 20 {
            eprintln!("  ... ({} more)", dropped.len() - 20);
        }
    }
}

fn print_turn_row(transcript: &Transcript, idx: usize, score: f64) {
    let turn = &transcript.turns[idx];
    eprintln!(
        "  {:>4} {:>7.3} {:>8}  {}",
        idx.yellow(),
        score,
        turn.tokens,
        preview(&turn.text, 80).bright_black()
    );
}

pub fn print_warnings(warnings: &[Warning]) {
    for warning in warnings {
        let text = match warning {
            Warning::UnknownDialectVersion { version } => {
                format!("unknown dialect version {}", version)
            }
            Warning::TokenizerFallback { reason } => {
                format!("tokenizer fell back to byte estimate: {}", reason)
            }
            Warning::DedupInputTooLarge { chars, max_chars } => {
                format!("dedup skipped: {} chars exceeds gate of {}", chars, max_chars)
            }
            Warning::BudgetTooSmall {
                required_pinned,
                budget,
            } => format!(
                "pinned turns need {} tokens but the budget is {}",
                required_pinned, budget
            ),
        };
        eprintln!("{} {}", "warning:".yellow().bold(), text);
    }
}

/// One row per turn: `turn_index,role,tokens,score,kept`.
pub fn scores_csv(transcript: &Transcript, scores: &BTreeMap<usize, f64>, kept: &[usize]) -> String {
    let mut out = String::from("turn_index,role,tokens,score,kept\n");
    for turn in &transcript.turns {
        let score = scores
            .get(&turn.index)
            .map(|s| format!("{:.4}", s))
            .unwrap_or_default();
        let kept = kept.binary_search(&turn.index).is_ok();
        out.push_str(&format!(
            "{},{},{},{},{}\n",
            turn.index, turn.role, turn.tokens, score, kept
        ));
    }
    out
}

/// Entity-coverage report for --evaluate. This is the command's payload, so
/// it prints to stdout.
pub fn print_eval(report: &EvalReport) {
    println!("{}", "Entity coverage".bold());
    println!(
        "  method {} | budget {} | split {:.2}",
        report.method, report.budget, report.split_ratio
    );
    println!(
        "  prefix {} turns | suffix {} turns",
        report.prefix_turns, report.suffix_turns
    );
    println!(
        "  kept {} of {} tokens",
        report.pass.kept_tokens, report.pass.total_tokens
    );
    println!();
    println!("  coverage: {:.4}", report.coverage);
    println!(
        "  suffix entities: {} | kept entities: {} | unrecoverable: {}",
        report.suffix_entity_count, report.kept_entity_count, report.unrecoverable
    );

    if !report.per_type.is_empty() {
        println!();
        for t in &report.per_type {
            println!(
                "  {:<12} {:>3}/{:<3}  weight {:.2}",
                t.etype.to_string(),
                t.covered,
                t.total,
                t.weight
            );
        }
    }
}
