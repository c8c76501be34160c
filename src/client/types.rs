use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A conversation owned by the assistant server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque server-assigned identifier
    pub id: String,
    /// Human-readable label
    #[serde(default)]
    pub title: String,
    /// Creation and last-activity timestamps
    #[serde(default)]
    pub time: SessionTime,
}

/// Session timestamps in milliseconds since the Unix epoch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTime {
    /// When the session was created
    #[serde(default)]
    pub created: i64,
    /// When the session last saw activity
    #[serde(default)]
    pub updated: i64,
}

impl Session {
    /// Last activity as a UTC timestamp
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.time.updated)
    }

    /// Creation time as a UTC timestamp
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.time.created)
    }
}

/// One content block of a message
///
/// Only text blocks are interpreted; tool calls, files, reasoning and any
/// future block kinds are kept as [`Part::Other`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Part {
    /// Plain text
    Text {
        /// The text content
        text: String,
    },
    /// Any non-text block
    #[serde(other)]
    Other,
}

impl Part {
    /// Builds a text part
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    /// Text content, if this is a text part
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text { text } => Some(text),
            Part::Other => None,
        }
    }
}

/// Metadata of a stored message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageInfo {
    /// Message identifier
    #[serde(default)]
    pub id: String,
    /// `user` or `assistant`
    #[serde(default)]
    pub role: String,
}

/// A message as returned by the message listing endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageEnvelope {
    /// Message metadata
    pub info: MessageInfo,
    /// Ordered content blocks
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// Body of a prompt submission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptRequest {
    /// Provider to route the prompt to
    #[serde(rename = "providerID")]
    pub provider_id: String,
    /// Model to use
    #[serde(rename = "modelID")]
    pub model_id: String,
    /// Prompt content
    pub parts: Vec<Part>,
}

impl PromptRequest {
    /// A single-text-part prompt
    pub fn text(provider_id: &str, model_id: &str, text: &str) -> Self {
        Self {
            provider_id: provider_id.to_string(),
            model_id: model_id.to_string(),
            parts: vec![Part::text(text)],
        }
    }
}

/// Reply to a prompt submission
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct PromptResponse {
    /// Metadata of the assistant message
    #[serde(default)]
    pub info: Option<MessageInfo>,
    /// Ordered content blocks of the reply
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// Body of a create-session request
#[derive(Debug, Clone, Serialize, Default)]
pub(crate) struct CreateSessionRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'a str>,
}

/// Body of a rename request
#[derive(Debug, Clone, Serialize)]
pub(crate) struct UpdateSessionRequest<'a> {
    pub title: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_session_deserializes_server_shape() {
        let value = json!({
            "id": "ses_abc123",
            "title": "Refactor parser",
            "version": "0.5.0",
            "time": { "created": 1_700_000_000_000i64, "updated": 1_700_000_360_000i64 }
        });
        let session: Session = serde_json::from_value(value).unwrap();
        assert_eq!(session.id, "ses_abc123");
        assert_eq!(session.time.updated, 1_700_000_360_000);
        assert!(session.updated_at().unwrap() > session.created_at().unwrap());
    }

    #[test]
    fn test_session_missing_optional_fields() {
        let session: Session = serde_json::from_value(json!({ "id": "ses_1" })).unwrap();
        assert_eq!(session.title, "");
        assert_eq!(session.time, SessionTime::default());
    }

    #[test]
    fn test_unknown_part_types_become_other() {
        let parts: Vec<Part> = serde_json::from_value(json!([
            { "type": "step-start", "id": "prt_1" },
            { "type": "tool", "tool": "bash", "state": {} },
            { "type": "text", "text": "hello", "id": "prt_2" }
        ]))
        .unwrap();
        assert_eq!(parts[0], Part::Other);
        assert_eq!(parts[1], Part::Other);
        assert_eq!(parts[2].as_text(), Some("hello"));
    }

    #[test]
    fn test_prompt_request_wire_names() {
        let request = PromptRequest::text("anthropic", "claude", "hi");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "providerID": "anthropic",
                "modelID": "claude",
                "parts": [{ "type": "text", "text": "hi" }]
            })
        );
    }

    #[test]
    fn test_create_request_omits_missing_title() {
        let body = serde_json::to_value(CreateSessionRequest::default()).unwrap();
        assert_eq!(body, json!({}));
        let body = serde_json::to_value(CreateSessionRequest { title: Some("x") }).unwrap();
        assert_eq!(body, json!({ "title": "x" }));
    }

    #[test]
    fn test_prompt_response_without_parts() {
        let response: PromptResponse = serde_json::from_value(json!({})).unwrap();
        assert!(response.parts.is_empty());
        assert!(response.info.is_none());
    }
}
