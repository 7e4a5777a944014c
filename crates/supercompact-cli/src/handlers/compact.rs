use crate::args::{Cli, FormatArg};
use crate::output;
use std::path::PathBuf;
use supercompact_engine::Pipeline;
use supercompact_rollout::{MarkerInfo, emit_rollout, emit_summary, parse_path};
use supercompact_types::{CompactConfig, Error, Result};

pub fn handle(args: &Cli) -> Result<i32> {
    let input = resolve_input(args)?;
    let config = build_config(args)?;

    output::print_progress(&format!("Parsing {}...", input.display()));
    let mut transcript = parse_path(&input)?;

    let user_count = transcript.user_turns().count();
    let system_count = transcript.system_turns().count();
    output::print_progress(&format!(
        "  {} turns total: {} user, {} system",
        transcript.turns.len(),
        user_count,
        system_count
    ));

    if args.verbose {
        print_session_header(&transcript);
    }

    let pipeline = Pipeline::new(config);
    let outcome = pipeline.run(&mut transcript);

    output::print_progress(&format!("  {} tokens total", outcome.report.total_tokens));

    let marker = MarkerInfo {
        method: outcome.report.method.clone(),
        budget: outcome.report.budget,
        kept_turns: outcome.report.kept_turns,
        dropped_turns: outcome.report.dropped_scorable,
    };

    let rendered = match args.format {
        FormatArg::Rollout => emit_rollout(&transcript, &outcome.selection.kept, &marker),
        FormatArg::Summary => emit_summary(&transcript, &outcome.selection.kept, &outcome.scores),
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered).map_err(|e| Error::io(path.display().to_string(), e))?;
            output::print_progress(&format!("Wrote compacted output to {}", path.display()));
        }
        None => print!("{}", rendered),
    }

    if let Some(path) = &args.scores_file {
        let csv = output::scores_csv(&transcript, &outcome.scores, &outcome.selection.kept);
        std::fs::write(path, csv).map_err(|e| Error::io(path.display().to_string(), e))?;
        output::print_progress(&format!("Wrote scores CSV to {}", path.display()));
    }

    output::print_stats(&outcome);
    if args.verbose {
        output::print_score_details(&transcript, &outcome);
    }
    output::print_warnings(&outcome.report.warnings);

    Ok(if outcome.report.over_budget { 5 } else { 0 })
}

pub(crate) fn resolve_input(args: &Cli) -> Result<PathBuf> {
    if let Some(input) = &args.input {
        return Ok(input.clone());
    }
    supercompact_rollout::find_latest_session().ok_or_else(|| Error::InvalidArgument {
        name: "input".to_string(),
        reason: "no rollout sessions found; pass a file path".to_string(),
    })
}

pub(crate) fn build_config(args: &Cli) -> Result<CompactConfig> {
    if args.budget == 0 {
        return Err(Error::InvalidArgument {
            name: "budget".to_string(),
            reason: "must be at least 1 token".to_string(),
        });
    }
    Ok(CompactConfig {
        method: args.method.into(),
        budget: args.budget,
        short_threshold: args.short_threshold,
        min_repeat_len: args.min_repeat_len,
        ..CompactConfig::default()
    })
}

fn print_session_header(transcript: &supercompact_rollout::Transcript) {
    let Some(meta_idx) = transcript.session_meta else {
        return;
    };
    let supercompact_rollout::RecordKind::SessionMeta(meta) = &transcript.records[meta_idx].kind
    else {
        return;
    };

    let id = meta.payload.id.as_deref().unwrap_or("unknown");
    let started = meta
        .payload
        .timestamp
        .as_deref()
        .or(meta.timestamp.as_deref())
        .and_then(|ts| chrono::DateTime::parse_from_rfc3339(ts).ok())
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S %Z").to_string())
        .unwrap_or_else(|| "unknown".to_string());

    output::print_progress(&format!("  session {} started {}", id, started));
}
