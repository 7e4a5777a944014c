pub mod args;
mod handlers;
mod output;

pub use args::Cli;
use supercompact_types::Error;

/// Dispatch the parsed command line. Returns the process exit code on
/// success paths (0, or 5 when the pinned set overran the budget but output
/// was still written).
pub fn run(cli: Cli) -> supercompact_types::Result<i32> {
    if cli.evaluate {
        handlers::evaluate::handle(&cli)
    } else {
        handlers::compact::handle(&cli)
    }
}

/// Exit-code mapping for terminal errors: 2 parse, 3 I/O, 4 invalid
/// arguments.
pub fn exit_code(err: &Error) -> i32 {
    match err {
        Error::Parse { .. } => 2,
        Error::Io { .. } => 3,
        Error::InvalidArgument { .. } => 4,
        Error::BudgetTooSmall { .. } => 5,
        Error::Tokenizer { .. } | Error::Extractor { .. } => 1,
    }
}
