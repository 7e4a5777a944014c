use serde_json::json;

/// Builds rollout JSONL content line by line.
#[derive(Debug, Default)]
pub struct RolloutBuilder {
    lines: Vec<String>,
}

impl RolloutBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw_line(mut self, line: &str) -> Self {
        self.lines.push(line.to_string());
        self
    }

    pub fn session_meta(self, id: &str, cli_version: &str) -> Self {
        let line = json!({
            "timestamp": "2025-01-01T00:00:00Z",
            "type": "session_meta",
            "payload": {
                "id": id,
                "timestamp": "2025-01-01T00:00:00Z",
                "cwd": "/workspace",
                "originator": "cli",
                "cli_version": cli_version,
            }
        });
        self.raw_line(&line.to_string())
    }

    pub fn user(self, text: &str) -> Self {
        self.message("user", "input_text", text)
    }

    pub fn assistant(self, text: &str) -> Self {
        self.message("assistant", "output_text", text)
    }

    fn message(self, role: &str, block_type: &str, text: &str) -> Self {
        let line = json!({
            "timestamp": "2025-01-01T00:00:01Z",
            "type": "response_item",
            "payload": {
                "type": "message",
                "role": role,
                "content": [{"type": block_type, "text": text}],
            }
        });
        self.raw_line(&line.to_string())
    }

    pub fn function_call(self, name: &str, arguments: &str) -> Self {
        let line = json!({
            "timestamp": "2025-01-01T00:00:02Z",
            "type": "response_item",
            "payload": {
                "type": "function_call",
                "name": name,
                "arguments": arguments,
                "call_id": format!("call-{}", self.lines.len()),
            }
        });
        self.raw_line(&line.to_string())
    }

    pub fn function_call_output(self, output: &str) -> Self {
        let line = json!({
            "timestamp": "2025-01-01T00:00:03Z",
            "type": "response_item",
            "payload": {
                "type": "function_call_output",
                "call_id": format!("call-{}", self.lines.len()),
                "output": output,
            }
        });
        self.raw_line(&line.to_string())
    }

    pub fn turn_context(self, model: &str) -> Self {
        let line = json!({
            "timestamp": "2025-01-01T00:00:04Z",
            "type": "turn_context",
            "payload": {"cwd": "/workspace", "model": model},
        });
        self.raw_line(&line.to_string())
    }

    pub fn compacted(self, message: &str) -> Self {
        let line = json!({
            "timestamp": "2025-01-01T00:00:05Z",
            "type": "compacted",
            "payload": {"message": message},
        });
        self.raw_line(&line.to_string())
    }

    pub fn event_msg(self) -> Self {
        let line = json!({
            "timestamp": "2025-01-01T00:00:06Z",
            "type": "event_msg",
            "payload": {"type": "token_count"},
        });
        self.raw_line(&line.to_string())
    }

    pub fn unknown(self, discriminator: &str) -> Self {
        let line = json!({
            "timestamp": "2025-01-01T00:00:07Z",
            "type": discriminator,
            "payload": {},
        });
        self.raw_line(&line.to_string())
    }

    pub fn build(self) -> String {
        let mut content = self.lines.join("\n");
        content.push('\n');
        content
    }
}

/// Repeat a seed phrase until the text is roughly `words` words long.
///
/// Identical seeds produce identical text; different seeds share nothing,
/// which keeps dedup fixtures honest.
pub fn long_text(seed: &str, words: usize) -> String {
    let seed_words: Vec<&str> = seed.split_whitespace().collect();
    assert!(!seed_words.is_empty(), "seed must contain at least one word");

    let mut out: Vec<&str> = Vec::with_capacity(words);
    for i in 0..words {
        out.push(seed_words[i % seed_words.len()]);
    }
    out.join(" ")
}
