//! Serde views of rollout records.
//!
//! Rollout format (one JSON object per line):
//!   {"timestamp": "...", "type": "<variant>", "payload": {...}}
//!
//! The views here are deliberately lenient: every field the pipeline does
//! not read is either defaulted or swallowed by an `Unknown` fallback, and
//! the original line bytes are retained elsewhere for emission, so nothing
//! is lost by modeling only what scoring needs.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize, Clone)]
pub struct SessionMetaRecord {
    #[serde(default)]
    pub timestamp: Option<String>,
    pub payload: SessionMetaPayload,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionMetaPayload {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub cwd: Option<String>,
    #[serde(default)]
    pub originator: Option<String>,
    #[serde(default)]
    pub cli_version: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TurnContextRecord {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub payload: TurnContextPayload,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TurnContextPayload {
    #[serde(default)]
    pub cwd: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub user_instructions: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ResponseItemRecord {
    #[serde(default)]
    pub timestamp: Option<String>,
    pub payload: ResponseItemPayload,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
pub enum ResponseItemPayload {
    Message(MessagePayload),
    Reasoning(ReasoningPayload),
    FunctionCall(FunctionCallPayload),
    FunctionCallOutput(FunctionCallOutputPayload),
    CustomToolCall(CustomToolCallPayload),
    CustomToolCallOutput(CustomToolCallOutputPayload),
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MessagePayload {
    pub role: String,
    #[serde(default)]
    pub content: Vec<MessageContent>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
pub enum MessageContent {
    InputText { text: String },
    OutputText { text: String },
    Text { text: String },
    Refusal { refusal: String },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReasoningPayload {
    #[serde(default)]
    pub summary: Vec<SummaryText>,
    #[serde(default)]
    pub content: Option<Value>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
pub enum SummaryText {
    SummaryText { text: String },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FunctionCallPayload {
    pub name: String,
    #[serde(default)]
    pub arguments: String,
    #[serde(default)]
    pub call_id: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FunctionCallOutputPayload {
    #[serde(default)]
    pub call_id: Option<String>,
    #[serde(default)]
    pub output: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CustomToolCallPayload {
    pub name: String,
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub call_id: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CustomToolCallOutputPayload {
    #[serde(default)]
    pub call_id: Option<String>,
    #[serde(default)]
    pub output: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CompactedRecord {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub payload: CompactedPayload,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CompactedPayload {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EventMsgRecord {
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_payload_type_falls_back() {
        let json = r#"{"timestamp":"t","payload":{"type":"ghost_snapshot","ghost_commit":{}}}"#;
        let record: ResponseItemRecord = serde_json::from_str(json).unwrap();
        assert!(matches!(record.payload, ResponseItemPayload::Unknown));
    }

    #[test]
    fn test_message_content_variants() {
        let json = r#"{"timestamp":"t","payload":{"type":"message","role":"user",
            "content":[{"type":"input_text","text":"hi"},{"type":"image","url":"x"}]}}"#;
        let record: ResponseItemRecord = serde_json::from_str(json).unwrap();
        let ResponseItemPayload::Message(msg) = record.payload else {
            panic!("expected message payload");
        };
        assert_eq!(msg.role, "user");
        assert_eq!(msg.content.len(), 2);
        assert!(matches!(msg.content[1], MessageContent::Unknown));
    }
}
