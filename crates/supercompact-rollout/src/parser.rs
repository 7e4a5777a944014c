//! Record-by-record rollout parsing.
//!
//! Each line is one self-describing JSON object whose discriminator lives
//! under the `type` field. Unknown discriminators are retained as opaque
//! records; unparseable framing fails the pass, because the emitter must be
//! able to round-trip the file.

use crate::record::{Record, RecordKind};
use crate::schema;
use crate::turns;
use crate::transcript::Transcript;
use std::path::Path;
use supercompact_types::{Error, Result, Warning};

/// Dialect major version this build was written against.
const SUPPORTED_MAJOR: u64 = 0;

/// Parse a rollout file into a [`Transcript`].
pub fn parse_path(path: &Path) -> Result<Transcript> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::io(path.display().to_string(), e))?;
    parse_str(&content)
}

/// Parse rollout content into a [`Transcript`].
pub fn parse_str(content: &str) -> Result<Transcript> {
    let mut records: Vec<Record> = Vec::new();
    let mut session_meta: Option<usize> = None;
    let mut dialect_version: Option<String> = None;

    let mut offset: u64 = 0;
    for (line_idx, segment) in content.split('\n').enumerate() {
        let line_no = line_idx + 1;
        let line_offset = offset;
        offset += segment.len() as u64 + 1;

        if segment.trim().is_empty() {
            continue;
        }

        let kind = parse_line(segment, line_no, line_offset)?;

        if session_meta.is_none()
            && let RecordKind::SessionMeta(meta) = &kind
        {
            session_meta = Some(records.len());
            dialect_version = meta.payload.cli_version.clone();
        }

        records.push(Record {
            line_no,
            offset: line_offset,
            raw: segment.to_string(),
            kind,
        });
    }

    let turns = turns::group(&records);

    Ok(Transcript {
        records,
        turns,
        session_meta,
        dialect_version,
    })
}

fn parse_line(segment: &str, line_no: usize, line_offset: u64) -> Result<RecordKind> {
    let parse_err = |reason: String| Error::Parse {
        line: line_no,
        offset: line_offset,
        reason,
    };

    let value: serde_json::Value =
        serde_json::from_str(segment).map_err(|e| parse_err(e.to_string()))?;

    let Some(obj) = value.as_object() else {
        return Err(parse_err("record is not a JSON object".to_string()));
    };

    // No discriminator at all: opaque, but structurally a record.
    let Some(discriminator) = obj.get("type").and_then(|t| t.as_str()) else {
        return Ok(RecordKind::Other);
    };

    let structural = |e: serde_json::Error| {
        parse_err(format!("malformed '{}' record: {}", discriminator, e))
    };

    let kind = match discriminator {
        "session_meta" => RecordKind::SessionMeta(
            serde_json::from_value::<schema::SessionMetaRecord>(value.clone())
                .map_err(structural)?,
        ),
        "turn_context" => RecordKind::TurnContext(
            serde_json::from_value::<schema::TurnContextRecord>(value.clone())
                .map_err(structural)?,
        ),
        "response_item" => RecordKind::ResponseItem(
            serde_json::from_value::<schema::ResponseItemRecord>(value.clone())
                .map_err(structural)?,
        ),
        "compacted" => RecordKind::Compacted(
            serde_json::from_value::<schema::CompactedRecord>(value.clone())
                .map_err(structural)?,
        ),
        "event_msg" => RecordKind::EventMsg(
            serde_json::from_value::<schema::EventMsgRecord>(value.clone())
                .map_err(structural)?,
        ),
        _ => RecordKind::Other,
    };

    Ok(kind)
}

/// Check the declared dialect version against what this build understands.
///
/// Unknown versions are a warning, never a failure: the record framing is
/// version-stable and retained byte-for-byte anyway.
pub fn dialect_warning(transcript: &Transcript) -> Option<Warning> {
    let version = transcript.dialect_version.as_deref()?;
    let major = version
        .split('.')
        .next()
        .and_then(|m| m.parse::<u64>().ok());

    match major {
        Some(m) if m == SUPPORTED_MAJOR => None,
        _ => Some(Warning::UnknownDialectVersion {
            version: version.to_string(),
        }),
    }
}
