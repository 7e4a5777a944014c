use crate::record::Record;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    /// Assistant text, reasoning and tool I/O alike.
    System,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => f.write_str("user"),
            Role::System => f.write_str("system"),
        }
    }
}

/// A contiguous run of records belonging to one logical speaker.
///
/// `records` holds indices into the owning [`Transcript`]'s record vector,
/// in input order, including any `turn_context` attached forward and any
/// opaque records that fell inside the span.
#[derive(Debug, Clone)]
pub struct Turn {
    pub index: usize,
    pub role: Role,
    pub records: Vec<usize>,
    /// Concatenated plain text used for scoring.
    pub text: String,
    /// Filled in by the token-counting stage; the selector trusts this
    /// number exclusively.
    pub tokens: u32,
    /// True for the standalone turn wrapping a pre-existing `compacted`
    /// record. Marker turns are always kept.
    pub is_compaction_marker: bool,
}

impl Turn {
    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    /// First record index of the turn's span.
    pub fn span_start(&self) -> usize {
        self.records.first().copied().unwrap_or(usize::MAX)
    }
}

/// The parsed rollout: ordered records plus the turns grouped over them.
///
/// Built once by the parser, token counts filled in once, read-only after
/// that.
#[derive(Debug, Default)]
pub struct Transcript {
    pub records: Vec<Record>,
    pub turns: Vec<Turn>,
    /// Index of the first `session_meta` record, if any.
    pub session_meta: Option<usize>,
    /// Dialect version declared by the session header (`cli_version`).
    pub dialect_version: Option<String>,
}

impl Transcript {
    pub fn total_tokens(&self) -> u64 {
        self.turns.iter().map(|t| t.tokens as u64).sum()
    }

    pub fn user_turns(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter().filter(|t| t.is_user())
    }

    pub fn system_turns(&self) -> impl Iterator<Item = &Turn> {
        self.turns.iter().filter(|t| !t.is_user())
    }
}
