use futures_util::StreamExt;
use serde::{Deserialize, Serialize};

use crate::{Agent, AgentError, Prompt, RetryPolicy};

pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.2-vision:11b";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
    #[serde(skip_serializing_if = "no_images")]
    images: &'a [String],
}

fn no_images(images: &&[String]) -> bool {
    images.is_empty()
}

#[derive(Debug, Deserialize)]
struct ChatChunk {
    #[serde(default)]
    message: Option<ChunkMessage>,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChunkMessage {
    #[serde(default)]
    content: String,
}

/// Chat model served by a local Ollama instance
pub struct OllamaAgent {
    client: reqwest::Client,
    host: String,
    model: String,
    stream: bool,
    retry: RetryPolicy,
}

impl OllamaAgent {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            host: DEFAULT_OLLAMA_HOST.to_string(),
            model: model.into(),
            stream: false,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into().trim_end_matches('/').to_string();
        self
    }

    /// Stream the reply chunk by chunk, logging each at debug level
    pub fn streaming(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.host)
    }

    async fn request(&self, prompt: &Prompt) -> Result<String, AgentError> {
        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: &prompt.text,
                images: &prompt.images,
            }],
            stream: self.stream,
        };

        let response = self.client.post(self.chat_url()).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AgentError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        if !self.stream {
            let text = response.text().await?;
            let mut assembler = ChunkAssembler::default();
            assembler.push_line(&text)?;
            return Ok(assembler.finish());
        }

        let mut assembler = ChunkAssembler::default();
        let mut bytes = response.bytes_stream();
        while let Some(chunk) = bytes.next().await {
            assembler.push_bytes(&chunk?)?;
            if assembler.done {
                break;
            }
        }
        assembler.flush()?;
        Ok(assembler.finish())
    }
}

impl Agent for OllamaAgent {
    async fn respond(&self, prompt: &Prompt) -> Result<Option<String>, AgentError> {
        let url = self.chat_url();
        let content = self.retry.run(&url, || self.request(prompt)).await?;
        let content = content.trim().to_lowercase();

        if content.is_empty() {
            return Ok(None);
        }
        Ok(Some(content))
    }
}

/// Reassembles newline-delimited JSON chunks into one reply, in arrival order
#[derive(Debug, Default)]
struct ChunkAssembler {
    pending: Vec<u8>,
    content: String,
    done: bool,
}

impl ChunkAssembler {
    fn push_bytes(&mut self, bytes: &[u8]) -> Result<(), AgentError> {
        self.pending.extend_from_slice(bytes);

        while let Some(newline) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=newline).collect();
            let line = String::from_utf8_lossy(&line);
            self.push_line(&line)?;
        }
        Ok(())
    }

    /// Parse whatever is left after the last newline
    fn flush(&mut self) -> Result<(), AgentError> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let rest = std::mem::take(&mut self.pending);
        self.push_line(&String::from_utf8_lossy(&rest))
    }

    fn push_line(&mut self, line: &str) -> Result<(), AgentError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }

        let chunk: ChatChunk =
            serde_json::from_str(line).map_err(|e| AgentError::Decode(e.to_string()))?;
        if let Some(error) = chunk.error {
            return Err(AgentError::Remote(error));
        }
        if let Some(message) = chunk.message {
            tracing::debug!(chunk = %message.content, "Ollama chunk");
            self.content.push_str(&message.content);
        }
        self.done |= chunk.done;
        Ok(())
    }

    fn finish(self) -> String {
        self.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assembler_joins_chunks_in_order() {
        let mut assembler = ChunkAssembler::default();
        let stream = concat!(
            "{\"message\":{\"role\":\"assistant\",\"content\":\"<answer>\"},\"done\":false}\n",
            "{\"message\":{\"role\":\"assistant\",\"content\":\"le\"},\"done\":false}\n{\"mess",
            "age\":{\"role\":\"assistant\",\"content\":\"ft</answer>\"},\"done\":false}\n",
            "{\"done\":true}\n",
        );

        for piece in stream.as_bytes().chunks(17) {
            assembler.push_bytes(piece).unwrap();
        }
        assembler.flush().unwrap();

        assert!(assembler.done);
        assert_eq!(assembler.finish(), "<answer>left</answer>");
    }

    #[test]
    fn test_assembler_single_body() {
        let mut assembler = ChunkAssembler::default();
        assembler
            .push_line(r#"{"message":{"role":"assistant","content":"Down"},"done":true}"#)
            .unwrap();

        assert_eq!(assembler.finish(), "Down");
    }

    #[test]
    fn test_assembler_reports_server_error() {
        let mut assembler = ChunkAssembler::default();
        let result = assembler.push_line(r#"{"error":"model not found"}"#);

        assert!(matches!(result, Err(AgentError::Remote(msg)) if msg == "model not found"));
    }

    #[test]
    fn test_request_body_shape() {
        let images = vec!["aGk=".to_string()];
        let body = ChatRequest {
            model: DEFAULT_OLLAMA_MODEL,
            messages: [ChatMessage {
                role: "user",
                content: "pick",
                images: &images,
            }],
            stream: false,
        };
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["model"], "llama3.2-vision:11b");
        assert_eq!(json["messages"][0]["images"][0], "aGk=");

        let empty: Vec<String> = Vec::new();
        let body = ChatRequest {
            model: "m",
            messages: [ChatMessage {
                role: "user",
                content: "pick",
                images: &empty,
            }],
            stream: true,
        };
        let json = serde_json::to_value(&body).unwrap();

        assert!(json["messages"][0].get("images").is_none());
    }
}
