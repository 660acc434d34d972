use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{Agent, AgentError, Prompt};

/// Replays a fixed list of replies. `None` entries mean "no answer".
pub struct ScriptedAgent {
    replies: Vec<Option<String>>,
    cycle: bool,
    cursor: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedAgent {
    pub fn new(replies: Vec<Option<String>>) -> Self {
        Self {
            replies,
            cycle: false,
            cursor: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Convenience for scripts without gaps
    pub fn from_texts<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(replies.into_iter().map(|r| Some(r.into())).collect())
    }

    /// Start over after the last reply instead of failing
    pub fn cycling(mut self) -> Self {
        self.cycle = true;
        self
    }

    /// Prompts received so far, oldest first
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }

    fn next_reply(&self) -> Result<Option<String>, AgentError> {
        let index = self.cursor.fetch_add(1, Ordering::SeqCst);
        let index = match (self.cycle, self.replies.len()) {
            (_, 0) => return Err(AgentError::Exhausted),
            (true, len) => index % len,
            (false, len) if index < len => index,
            (false, _) => return Err(AgentError::Exhausted),
        };
        Ok(self.replies[index].clone())
    }
}

impl Agent for ScriptedAgent {
    async fn respond(&self, prompt: &Prompt) -> Result<Option<String>, AgentError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.text.clone());
        }
        self.next_reply()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replays_in_order_then_exhausts() {
        let agent = ScriptedAgent::new(vec![Some("up".to_string()), None]);
        let prompt = Prompt::text("go");

        assert_eq!(agent.respond(&prompt).await.unwrap().as_deref(), Some("up"));
        assert_eq!(agent.respond(&prompt).await.unwrap(), None);
        assert!(matches!(
            agent.respond(&prompt).await,
            Err(AgentError::Exhausted)
        ));
        assert_eq!(agent.prompts(), vec!["go", "go", "go"]);
    }

    #[tokio::test]
    async fn test_cycling_wraps_around() {
        let agent = ScriptedAgent::from_texts(["left", "right"]).cycling();
        let prompt = Prompt::text("go");

        let mut replies = Vec::new();
        for _ in 0..5 {
            replies.push(agent.respond(&prompt).await.unwrap().unwrap_or_default());
        }

        assert_eq!(replies, vec!["left", "right", "left", "right", "left"]);
    }

    #[tokio::test]
    async fn test_empty_script_is_exhausted() {
        let agent = ScriptedAgent::new(Vec::new()).cycling();

        assert!(matches!(
            agent.respond(&Prompt::text("go")).await,
            Err(AgentError::Exhausted)
        ));
    }
}
