use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use supercompact_types::Method;

#[derive(Parser)]
#[command(name = "compact")]
#[command(about = "Compact an agent rollout transcript within a token budget")]
#[command(
    long_about = "Compact an agent rollout transcript within a token budget.

Every surviving turn is kept verbatim: turns are scored by the technical
entities they carry (file paths, errors, commands, URLs, ...), then selected
greedily under the budget. User turns, short system turns and prior
compaction markers are always kept.",
    after_long_help = "EXAMPLES:
  # Compact the most recent session to 80k tokens
  compact

  # Compact a specific rollout with the dedup scorer
  compact session.jsonl --method dedup --budget 40000 --output compacted.jsonl

  # Prompt-ready text block instead of a rollout log
  compact session.jsonl --format summary

  # Measure how well the method preserves later-referenced entities
  compact session.jsonl --evaluate --split-ratio 0.7"
)]
#[command(version)]
pub struct Cli {
    #[arg(help = "Path to the rollout JSONL file (default: latest session)")]
    pub input: Option<PathBuf>,

    #[arg(
        long,
        value_enum,
        default_value = "eitf",
        env = "SUPERCOMPACT_METHOD",
        help = "Scoring method"
    )]
    pub method: MethodArg,

    #[arg(
        long,
        default_value_t = 80_000,
        env = "SUPERCOMPACT_BUDGET",
        help = "Target token budget"
    )]
    pub budget: u32,

    #[arg(long, help = "Write output to this file (stdout if absent)")]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "rollout", help = "Output dialect")]
    pub format: FormatArg,

    #[arg(
        long,
        default_value_t = 300,
        help = "System turns at or below this token count are always kept"
    )]
    pub short_threshold: u32,

    #[arg(
        long,
        default_value_t = 64,
        help = "Minimum repeated-substring length for the dedup scorer"
    )]
    pub min_repeat_len: usize,

    #[arg(long, help = "Write per-turn scores as CSV to this file")]
    pub scores_file: Option<PathBuf>,

    #[arg(long, help = "Show detailed score breakdown")]
    pub verbose: bool,

    #[arg(
        long,
        help = "Run the entity-coverage harness instead of writing output"
    )]
    pub evaluate: bool,

    #[arg(
        long,
        default_value_t = 0.70,
        help = "Prefix/suffix split for --evaluate"
    )]
    pub split_ratio: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MethodArg {
    Eitf,
    Setcover,
    Dedup,
    DryRun,
}

impl From<MethodArg> for Method {
    fn from(value: MethodArg) -> Method {
        match value {
            MethodArg::Eitf => Method::Eitf,
            MethodArg::Setcover => Method::SetCover,
            MethodArg::Dedup => Method::Dedup,
            MethodArg::DryRun => Method::DryRun,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Rollout,
    Summary,
}
