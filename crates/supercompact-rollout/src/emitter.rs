//! Output emission.
//!
//! Two dialects: `rollout` replays retained input lines byte-for-byte and
//! inserts a single freshly serialized `compacted` marker; `summary` renders
//! kept turns as a prompt-ready text block.
//!
//! Emission is a pure function of the transcript and the selection, so
//! running it twice over the same selection yields byte-identical output.

use crate::record::RecordKind;
use crate::transcript::Transcript;
use serde::Serialize;
use std::collections::BTreeSet;
use std::collections::BTreeMap;
use uuid::Uuid;

const EPOCH_TIMESTAMP: &str = "1970-01-01T00:00:00Z";

/// What the pass's own `compacted` marker documents.
///
/// Wall-clock data stays off the marker so reruns produce identical bytes;
/// elapsed time is reported on the pass report instead.
#[derive(Debug, Clone)]
pub struct MarkerInfo {
    pub method: String,
    pub budget: u32,
    pub kept_turns: usize,
    pub dropped_turns: usize,
}

#[derive(Serialize)]
struct MarkerRecord<'a> {
    timestamp: &'a str,
    #[serde(rename = "type")]
    record_type: &'static str,
    payload: MarkerPayload,
}

#[derive(Serialize)]
struct MarkerPayload {
    message: String,
}

#[derive(Serialize)]
struct SynthesizedMeta<'a> {
    timestamp: &'a str,
    #[serde(rename = "type")]
    record_type: &'static str,
    payload: SynthesizedMetaPayload<'a>,
}

#[derive(Serialize)]
struct SynthesizedMetaPayload<'a> {
    id: String,
    timestamp: &'a str,
    cwd: &'static str,
    originator: &'static str,
    cli_version: &'static str,
}

/// Re-serialize the log, keeping only records that belong to kept turns
/// plus the session header, in original record order.
pub fn emit_rollout(transcript: &Transcript, kept_turns: &[usize], marker: &MarkerInfo) -> String {
    let kept_records: BTreeSet<usize> = kept_turns
        .iter()
        .flat_map(|&t| transcript.turns[t].records.iter().copied())
        .collect();

    // The marker goes after the last pre-existing compacted record that
    // survives, otherwise directly after the session header.
    let insert_after: Option<usize> = kept_records
        .iter()
        .rev()
        .find(|&&idx| matches!(transcript.records[idx].kind, RecordKind::Compacted(_)))
        .copied();

    let marker_line = marker_line(transcript, marker);
    let synthesized_meta: String;

    let mut lines: Vec<&str> = Vec::with_capacity(kept_records.len() + 2);

    match transcript.session_meta {
        Some(meta_idx) => lines.push(&transcript.records[meta_idx].raw),
        None => {
            synthesized_meta = synthesize_meta(transcript);
            lines.push(&synthesized_meta);
        }
    }

    if insert_after.is_none() {
        lines.push(&marker_line);
    }

    for (idx, record) in transcript.records.iter().enumerate() {
        if kept_records.contains(&idx) && Some(idx) != transcript.session_meta {
            lines.push(&record.raw);
        }
        if insert_after == Some(idx) {
            lines.push(&marker_line);
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Render kept turns as a plain-text context block.
pub fn emit_summary(
    transcript: &Transcript,
    kept_turns: &[usize],
    scores: &BTreeMap<usize, f64>,
) -> String {
    let mut blocks: Vec<String> = Vec::with_capacity(kept_turns.len());

    for &idx in kept_turns {
        let turn = &transcript.turns[idx];
        let score = match scores.get(&idx) {
            Some(s) => format!("{:.3}", s),
            None => "-".to_string(),
        };
        blocks.push(format!(
            "[turn {} | score {} | tokens {}]\n{}",
            turn.index, score, turn.tokens, turn.text
        ));
    }

    let mut out = blocks.join("\n\n");
    out.push('\n');
    out
}

fn marker_line(transcript: &Transcript, marker: &MarkerInfo) -> String {
    let timestamp = last_timestamp(transcript).unwrap_or(EPOCH_TIMESTAMP);
    let record = MarkerRecord {
        timestamp,
        record_type: "compacted",
        payload: MarkerPayload {
            message: format!(
                "History compacted: method={} budget={} kept_turns={} dropped_turns={}",
                marker.method, marker.budget, marker.kept_turns, marker.dropped_turns
            ),
        },
    };
    serde_json::to_string(&record).expect("marker serialization cannot fail")
}

fn synthesize_meta(transcript: &Transcript) -> String {
    let timestamp = first_timestamp(transcript).unwrap_or(EPOCH_TIMESTAMP);
    let seed = transcript
        .records
        .first()
        .map(|r| r.raw.as_bytes())
        .unwrap_or(b"supercompact");
    let id = Uuid::new_v5(&Uuid::NAMESPACE_OID, seed).to_string();

    let meta = SynthesizedMeta {
        timestamp,
        record_type: "session_meta",
        payload: SynthesizedMetaPayload {
            id,
            timestamp,
            cwd: "",
            originator: "supercompact",
            cli_version: env!("CARGO_PKG_VERSION"),
        },
    };
    serde_json::to_string(&meta).expect("meta serialization cannot fail")
}

fn first_timestamp(transcript: &Transcript) -> Option<&str> {
    transcript.records.iter().find_map(|r| r.kind.timestamp())
}

fn last_timestamp(transcript: &Transcript) -> Option<&str> {
    transcript
        .records
        .iter()
        .rev()
        .find_map(|r| r.kind.timestamp())
}
