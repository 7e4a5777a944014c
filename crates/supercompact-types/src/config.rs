use std::fmt;
use std::str::FromStr;

/// Scoring method used to rank scorable system turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Eitf,
    SetCover,
    Dedup,
    DryRun,
}

impl Method {
    pub const ALL: [Method; 4] = [Method::Eitf, Method::SetCover, Method::Dedup, Method::DryRun];

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Eitf => "eitf",
            Method::SetCover => "setcover",
            Method::Dedup => "dedup",
            Method::DryRun => "dry-run",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "eitf" => Ok(Method::Eitf),
            "setcover" => Ok(Method::SetCover),
            "dedup" => Ok(Method::Dedup),
            "dry-run" | "dryrun" => Ok(Method::DryRun),
            other => Err(crate::Error::InvalidArgument {
                name: "method".to_string(),
                reason: format!("unknown method '{}'", other),
            }),
        }
    }
}

/// Configuration for one compaction pass.
///
/// Flows by explicit value through every stage; there is no global state.
#[derive(Debug, Clone)]
pub struct CompactConfig {
    pub method: Method,
    /// Token ceiling for the compacted output.
    pub budget: u32,
    /// System turns at or below this token count are always kept.
    pub short_threshold: u32,
    /// Minimum repeated-substring length the dedup scorer treats as "seen".
    pub min_repeat_len: usize,
    /// Additive recency bonus applied by the selector.
    pub recency_bonus: f64,
    /// Additive bonus for rare (df <= 2) entities in the setcover scorer.
    pub exclusivity_bonus: f64,
    /// Total character count above which the dedup scorer refuses to build
    /// its automaton and returns zero scores with a warning.
    pub dedup_max_chars: usize,
}

impl Default for CompactConfig {
    fn default() -> Self {
        Self {
            method: Method::Eitf,
            budget: 80_000,
            short_threshold: 300,
            min_repeat_len: 64,
            recency_bonus: 0.15,
            exclusivity_bonus: 0.20,
            dedup_max_chars: 8_000_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_round_trips_through_str() {
        for method in Method::ALL {
            assert_eq!(method.as_str().parse::<Method>().unwrap(), method);
        }
    }

    #[test]
    fn test_unknown_method_is_invalid_argument() {
        let err = "embed".parse::<Method>().unwrap_err();
        assert!(matches!(err, crate::Error::InvalidArgument { .. }));
    }
}
