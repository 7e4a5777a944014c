pub mod discover;
pub mod emitter;
pub mod parser;
pub mod record;
pub mod schema;
pub mod text;
mod turns;
pub mod transcript;

pub use discover::{find_latest_session, find_latest_session_in};
pub use emitter::{MarkerInfo, emit_rollout, emit_summary};
pub use parser::{dialect_warning, parse_path, parse_str};
pub use record::{Record, RecordKind};
pub use transcript::{Role, Transcript, Turn};
