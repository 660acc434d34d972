use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;

use crate::{Agent, AgentError, Prompt};

/// A human at the terminal: prints the prompt, reads one line
pub struct StdinAgent {
    input: Mutex<BufReader<tokio::io::Stdin>>,
}

impl StdinAgent {
    pub fn new() -> Self {
        Self {
            input: Mutex::new(BufReader::new(tokio::io::stdin())),
        }
    }
}

impl Default for StdinAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for StdinAgent {
    async fn respond(&self, prompt: &Prompt) -> Result<Option<String>, AgentError> {
        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(format!("\n{}\n> ", prompt.text).as_bytes())
            .await?;
        stdout.flush().await?;

        let mut line = String::new();
        let read = self.input.lock().await.read_line(&mut line).await?;
        if read == 0 {
            tracing::info!("stdin closed, no answer");
            return Ok(None);
        }

        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        Ok(Some(line.to_string()))
    }
}
