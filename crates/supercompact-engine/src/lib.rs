mod automaton;
pub mod eval;
pub mod extract;
pub mod pipeline;
pub mod scorers;
pub mod selector;
pub mod tokenizer;

pub use eval::{EvalReport, TypeCoverage, evaluate};
pub use extract::{extract_all, extract_entities};
pub use pipeline::{PassOutcome, Pipeline};
pub use scorers::{ScoreContext, ScoreOutput, Scorer, scorer_for};
pub use selector::{Selection, scorable_turns, select};
pub use tokenizer::{ByteEstimator, HeuristicTokenizer, Tokenizer};
