//! Deterministic token counting for budget accounting.
//!
//! The selector trusts these numbers exclusively, so counting must be a pure
//! function of the input text: repeated calls on the same input return the
//! same count. Implementations should err on the high side relative to the
//! consumer agent's own accounting.

use supercompact_types::{Error, Result};

pub trait Tokenizer: Send + Sync {
    fn name(&self) -> &'static str;

    fn count(&self, text: &str) -> Result<u32>;
}

/// Default counter: subword-style estimate without a model file.
///
/// Splits on whitespace and charges one token per four characters of each
/// word (rounded up), which tracks BPE vocabularies closely enough for
/// budget math on mixed prose and code.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicTokenizer;

impl Tokenizer for HeuristicTokenizer {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn count(&self, text: &str) -> Result<u32> {
        let mut total: u64 = 0;
        for word in text.split_whitespace() {
            let chars = word.chars().count() as u64;
            total += chars.div_ceil(4).max(1);
        }
        Ok(clamp_count(total))
    }
}

/// Fallback estimator used when the configured tokenizer fails:
/// one token per four bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct ByteEstimator;

impl Tokenizer for ByteEstimator {
    fn name(&self) -> &'static str {
        "byte-estimator"
    }

    fn count(&self, text: &str) -> Result<u32> {
        Ok(clamp_count((text.len() as u64).div_ceil(4)))
    }
}

fn clamp_count(total: u64) -> u32 {
    total.min(u32::MAX as u64) as u32
}

/// Test-only tokenizer that always fails, for exercising the fallback path.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingTokenizer;

impl Tokenizer for FailingTokenizer {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn count(&self, _text: &str) -> Result<u32> {
        Err(Error::Tokenizer {
            reason: "tokenizer unavailable".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counting_is_deterministic() {
        let tok = HeuristicTokenizer;
        let text = "fix the race in src/watcher.rs before release";
        assert_eq!(tok.count(text).unwrap(), tok.count(text).unwrap());
    }

    #[test]
    fn test_short_words_cost_one_token() {
        let tok = HeuristicTokenizer;
        assert_eq!(tok.count("a bb ccc dddd").unwrap(), 4);
        assert_eq!(tok.count("").unwrap(), 0);
    }

    #[test]
    fn test_long_words_cost_more() {
        let tok = HeuristicTokenizer;
        // 8 chars -> 2 subword chunks
        assert_eq!(tok.count("deadbeef").unwrap(), 2);
    }

    #[test]
    fn test_byte_estimator_rounds_up() {
        let tok = ByteEstimator;
        assert_eq!(tok.count("12345").unwrap(), 2);
        assert_eq!(tok.count("1234").unwrap(), 1);
    }
}
