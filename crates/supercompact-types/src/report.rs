use serde::Serialize;

/// Non-fatal conditions raised during a pass.
///
/// Warnings are structured values carried on the pass report so callers can
/// inspect them; they are never written to stderr by the pipeline itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// The session header declared a dialect version this build does not know.
    UnknownDialectVersion { version: String },

    /// The configured tokenizer failed; token counts come from the byte
    /// estimator (1 token per 4 bytes).
    TokenizerFallback { reason: String },

    /// The dedup scorer's input exceeded its size gate; all dedup scores
    /// were reported as zero.
    DedupInputTooLarge { chars: usize, max_chars: usize },

    /// The pinned set alone exceeds the budget; only pinned turns were kept.
    BudgetTooSmall { required_pinned: u64, budget: u32 },
}

/// Outcome summary of one compaction pass.
#[derive(Debug, Clone, Serialize)]
pub struct PassReport {
    pub method: String,
    pub budget: u32,

    pub total_turns: usize,
    pub kept_turns: usize,
    pub dropped_scorable: usize,

    pub total_tokens: u64,
    pub kept_tokens: u64,
    pub user_tokens: u64,
    pub short_system_tokens: u64,
    pub scored_kept_tokens: u64,
    pub scored_dropped_tokens: u64,

    pub over_budget: bool,
    pub elapsed_ms: u64,
    pub warnings: Vec<Warning>,
}

impl PassReport {
    /// Fraction of input tokens that survived, in [0, 1].
    pub fn compression(&self) -> f64 {
        if self.total_tokens == 0 {
            return 0.0;
        }
        self.kept_tokens as f64 / self.total_tokens as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_serializes_with_kind_tag() {
        let w = Warning::BudgetTooSmall {
            required_pinned: 4000,
            budget: 1000,
        };
        let json = serde_json::to_string(&w).unwrap();
        assert!(json.contains("\"kind\":\"budget_too_small\""));
        assert!(json.contains("\"required_pinned\":4000"));
    }
}
