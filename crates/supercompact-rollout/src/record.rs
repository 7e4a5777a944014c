use crate::schema;

/// Parsed structural view of one rollout line.
#[derive(Debug, Clone)]
pub enum RecordKind {
    SessionMeta(schema::SessionMetaRecord),
    TurnContext(schema::TurnContextRecord),
    ResponseItem(schema::ResponseItemRecord),
    Compacted(schema::CompactedRecord),
    EventMsg(schema::EventMsgRecord),
    /// Unknown discriminator (or object with no `type` field). Retained
    /// opaque and emitted unchanged when inside a kept turn's span.
    Other,
}

impl RecordKind {
    pub fn discriminator(&self) -> &'static str {
        match self {
            RecordKind::SessionMeta(_) => "session_meta",
            RecordKind::TurnContext(_) => "turn_context",
            RecordKind::ResponseItem(_) => "response_item",
            RecordKind::Compacted(_) => "compacted",
            RecordKind::EventMsg(_) => "event_msg",
            RecordKind::Other => "other",
        }
    }

    pub fn timestamp(&self) -> Option<&str> {
        match self {
            RecordKind::SessionMeta(r) => r.timestamp.as_deref(),
            RecordKind::TurnContext(r) => r.timestamp.as_deref(),
            RecordKind::ResponseItem(r) => r.timestamp.as_deref(),
            RecordKind::Compacted(r) => r.timestamp.as_deref(),
            RecordKind::EventMsg(r) => r.timestamp.as_deref(),
            RecordKind::Other => None,
        }
    }
}

/// One line of the rollout log: the exact input bytes plus a parsed view.
///
/// `raw` is what the emitter writes back for retained records; it is never
/// re-encoded.
#[derive(Debug, Clone)]
pub struct Record {
    /// 1-based line number in the source file.
    pub line_no: usize,
    /// Byte offset of the line start in the source file.
    pub offset: u64,
    pub raw: String,
    pub kind: RecordKind,
}
