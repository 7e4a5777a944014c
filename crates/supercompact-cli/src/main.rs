use clap::Parser;
use clap::error::ErrorKind;
use supercompact_cli::{Cli, exit_code, run};

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{}", e);
            std::process::exit(0);
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(4);
        }
    };

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            // One line to stderr naming the error kind and its fields; the
            // output file is left absent.
            eprintln!("{}: {}", err.kind(), err);
            std::process::exit(exit_code(&err));
        }
    }
}
