use crate::args::Cli;
use crate::handlers::compact::{build_config, resolve_input};
use crate::output;
use supercompact_engine::{Pipeline, evaluate};
use supercompact_types::{Error, Result};

pub fn handle(args: &Cli) -> Result<i32> {
    let input = resolve_input(args)?;
    let config = build_config(args)?;

    output::print_progress(&format!("Evaluating {}...", input.display()));
    let content = std::fs::read_to_string(&input)
        .map_err(|e| Error::io(input.display().to_string(), e))?;

    let pipeline = Pipeline::new(config);
    let report = evaluate(&pipeline, &content, args.split_ratio)?;

    output::print_eval(&report);
    output::print_warnings(&report.pass.warnings);

    Ok(0)
}
