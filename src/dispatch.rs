//! Prompt dispatch
//!
//! Sends one prompt turn to a resolved session and pulls the reply text out
//! of the response. No retries, no streaming.

use crate::client::{Part, PromptRequest, SessionDirectory};
use crate::config::ModelSelector;
use crate::error::{PromptcastError, Result};

/// Submits prompts through a [`SessionDirectory`]
pub struct Dispatcher<'a> {
    directory: &'a dyn SessionDirectory,
}

impl<'a> Dispatcher<'a> {
    /// Dispatcher over `directory`
    pub fn new(directory: &'a dyn SessionDirectory) -> Self {
        Self { directory }
    }

    /// Sends `text` to `session_id` and returns the reply text
    ///
    /// # Returns
    ///
    /// The first text block of the reply, or `None` when the reply carries
    /// no text (tool-only turns, empty answers).
    ///
    /// # Errors
    ///
    /// Returns [`PromptcastError::SessionNotFound`] if the session vanished,
    /// and any transport failure as-is.
    pub async fn send(
        &self,
        session_id: &str,
        text: &str,
        model: &ModelSelector,
    ) -> Result<Option<String>> {
        let request = PromptRequest::text(&model.provider_id, &model.model_id, text);
        let response = self
            .directory
            .send_prompt(session_id, &request)
            .await
            .into_result(|| PromptcastError::SessionNotFound(session_id.to_string()))?;

        let reply = extract_reply(&response.parts);
        if reply.is_none() {
            tracing::debug!(session = %session_id, parts = response.parts.len(), "Reply has no text part");
        }
        Ok(reply)
    }
}

/// First text block among `parts`
pub fn extract_reply(parts: &[Part]) -> Option<String> {
    parts.iter().find_map(|part| part.as_text().map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{session, FakeDirectory};

    fn model() -> ModelSelector {
        ModelSelector {
            provider_id: "anthropic".to_string(),
            model_id: "claude-sonnet-4-20250514".to_string(),
        }
    }

    #[test]
    fn test_extract_reply_first_text_part() {
        let parts = vec![Part::Other, Part::text("first"), Part::text("second")];
        assert_eq!(extract_reply(&parts).as_deref(), Some("first"));
    }

    #[test]
    fn test_extract_reply_none_without_text() {
        assert_eq!(extract_reply(&[Part::Other]), None);
        assert_eq!(extract_reply(&[]), None);
    }

    #[tokio::test]
    async fn test_send_passes_model_and_text() {
        let directory = FakeDirectory::new()
            .with_sessions(vec![session("ses_1", 1)])
            .with_reply(vec![Part::Other, Part::text("pong")]);

        let reply = Dispatcher::new(&directory)
            .send("ses_1", "ping", &model())
            .await
            .unwrap();

        assert_eq!(reply.as_deref(), Some("pong"));
        let prompts = directory.prompts();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0].0, "ses_1");
        assert_eq!(prompts[0].1, PromptRequest::text("anthropic", "claude-sonnet-4-20250514", "ping"));
    }

    #[tokio::test]
    async fn test_send_without_text_reply() {
        let directory = FakeDirectory::new()
            .with_sessions(vec![session("ses_1", 1)])
            .with_reply(vec![Part::Other]);

        let reply = Dispatcher::new(&directory)
            .send("ses_1", "run the tool", &model())
            .await
            .unwrap();
        assert_eq!(reply, None);
    }

    #[tokio::test]
    async fn test_send_to_missing_session() {
        let directory = FakeDirectory::new();
        let err = Dispatcher::new(&directory)
            .send("ses_gone", "hello", &model())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("ses_gone"));
    }
}
