//! Plain-text extraction for scoring and display.

use crate::record::RecordKind;
use crate::schema::{
    MessageContent, ReasoningPayload, ResponseItemPayload, SummaryText,
};

const MAX_ARGUMENT_CHARS: usize = 500;
const MAX_OUTPUT_CHARS: usize = 1000;

/// Extract the human-readable text of one record.
///
/// Returns `None` for records that carry no scorable text (session header,
/// UI events, opaque records).
pub fn record_text(kind: &RecordKind) -> Option<String> {
    match kind {
        RecordKind::Compacted(record) => record.payload.message.clone(),
        RecordKind::TurnContext(record) => record.payload.user_instructions.clone(),
        RecordKind::ResponseItem(record) => response_item_text(&record.payload),
        RecordKind::SessionMeta(_) | RecordKind::EventMsg(_) | RecordKind::Other => None,
    }
}

fn response_item_text(payload: &ResponseItemPayload) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();

    match payload {
        ResponseItemPayload::Message(msg) => {
            for block in &msg.content {
                match block {
                    MessageContent::InputText { text }
                    | MessageContent::OutputText { text }
                    | MessageContent::Text { text } => {
                        if !text.is_empty() {
                            parts.push(text.clone());
                        }
                    }
                    MessageContent::Refusal { refusal } => {
                        if !refusal.is_empty() {
                            parts.push(refusal.clone());
                        }
                    }
                    MessageContent::Unknown => {}
                }
            }
        }

        ResponseItemPayload::Reasoning(reasoning) => {
            parts.extend(reasoning_text(reasoning));
        }

        ResponseItemPayload::FunctionCall(call) => {
            parts.push(format!("[function_call: {}]", call.name));
            if !call.arguments.is_empty() {
                parts.push(clip(&call.arguments, MAX_ARGUMENT_CHARS));
            }
        }

        ResponseItemPayload::CustomToolCall(call) => {
            parts.push(format!("[function_call: {}]", call.name));
            if !call.input.is_empty() {
                parts.push(clip(&call.input, MAX_ARGUMENT_CHARS));
            }
        }

        ResponseItemPayload::FunctionCallOutput(output) => {
            if !output.output.is_empty() {
                parts.push(clip(&output.output, MAX_OUTPUT_CHARS));
            }
        }

        ResponseItemPayload::CustomToolCallOutput(output) => {
            if !output.output.is_empty() {
                parts.push(clip(&output.output, MAX_OUTPUT_CHARS));
            }
        }

        ResponseItemPayload::Unknown => {}
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n"))
    }
}

fn reasoning_text(reasoning: &ReasoningPayload) -> Vec<String> {
    let mut parts = Vec::new();

    if let Some(content) = &reasoning.content {
        // Reasoning content is either a plain string or a list of
        // {"type":"reasoning_text","text":...} blocks depending on the
        // producing CLI version.
        match content {
            serde_json::Value::String(s) if !s.is_empty() => parts.push(s.clone()),
            serde_json::Value::Array(blocks) => {
                for block in blocks {
                    if let Some(text) = block.get("text").and_then(|t| t.as_str())
                        && !text.is_empty()
                    {
                        parts.push(text.to_string());
                    }
                }
            }
            _ => {}
        }
    }

    for item in &reasoning.summary {
        if let SummaryText::SummaryText { text } = item
            && !text.is_empty()
        {
            parts.push(text.clone());
        }
    }

    parts
}

fn clip(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let cut: String = s.chars().take(max_chars).collect();
    format!("{}...", cut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ResponseItemRecord;

    fn item(json: &str) -> RecordKind {
        RecordKind::ResponseItem(serde_json::from_str::<ResponseItemRecord>(json).unwrap())
    }

    #[test]
    fn test_message_text_concatenates_blocks() {
        let kind = item(
            r#"{"timestamp":"t","payload":{"type":"message","role":"assistant",
                "content":[{"type":"output_text","text":"Hello"},{"type":"output_text","text":"World"}]}}"#,
        );
        assert_eq!(record_text(&kind).unwrap(), "Hello\nWorld");
    }

    #[test]
    fn test_function_call_names_the_tool() {
        let kind = item(
            r#"{"timestamp":"t","payload":{"type":"function_call","name":"shell",
                "arguments":"{\"command\":\"ls\"}","call_id":"c1"}}"#,
        );
        let text = record_text(&kind).unwrap();
        assert!(text.starts_with("[function_call: shell]"));
        assert!(text.contains("ls"));
    }

    #[test]
    fn test_long_output_is_clipped() {
        let long = "x".repeat(2000);
        let json = format!(
            r#"{{"timestamp":"t","payload":{{"type":"function_call_output","call_id":"c1","output":"{}"}}}}"#,
            long
        );
        let kind = item(&json);
        let text = record_text(&kind).unwrap();
        assert_eq!(text.chars().count(), MAX_OUTPUT_CHARS + 3);
        assert!(text.ends_with("..."));
    }

    #[test]
    fn test_reasoning_prefers_content_and_summary() {
        let kind = item(
            r#"{"timestamp":"t","payload":{"type":"reasoning",
                "summary":[{"type":"summary_text","text":"sum"}],
                "content":[{"type":"reasoning_text","text":"deep"}]}}"#,
        );
        assert_eq!(record_text(&kind).unwrap(), "deep\nsum");
    }

    #[test]
    fn test_session_meta_has_no_text() {
        let kind = RecordKind::Other;
        assert!(record_text(&kind).is_none());
    }
}
