//! Fixtures for building rollout JSONL content in tests.
//!
//! Every builder method appends one record line in the dialect the parser
//! consumes, so integration tests can assemble transcripts without
//! hand-writing JSON.

mod fixtures;

pub use fixtures::{RolloutBuilder, long_text};
