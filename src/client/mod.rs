//! Client for the assistant server's session API
//!
//! The server owns sessions and their messages. This module exposes the
//! small request/response surface Promptcast relies on as the
//! [`SessionDirectory`] trait, plus the HTTP implementation used in
//! production.

pub mod http;
pub mod types;

pub use http::HttpSessionDirectory;
pub use types::{MessageEnvelope, MessageInfo, Part, PromptRequest, PromptResponse, Session};

use crate::error::RemoteResult;
use async_trait::async_trait;

/// Remote directory of sessions
///
/// Every call reports its outcome as a [`RemoteResult`]; implementations
/// never retry.
///
/// # Examples
///
/// ```no_run
/// use promptcast::client::{HttpSessionDirectory, SessionDirectory};
/// use promptcast::endpoint::Endpoint;
///
/// # async fn example() -> promptcast::error::Result<()> {
/// let directory = HttpSessionDirectory::new(&Endpoint::new("127.0.0.1", 4096))?;
/// let sessions = directory.list_sessions().await;
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait SessionDirectory: Send + Sync {
    /// All sessions known to the server, in no particular order
    async fn list_sessions(&self) -> RemoteResult<Vec<Session>>;

    /// One session by id
    async fn get_session(&self, id: &str) -> RemoteResult<Session>;

    /// Creates a session, optionally titled
    async fn create_session(&self, title: Option<&str>) -> RemoteResult<Session>;

    /// Deletes a session
    async fn delete_session(&self, id: &str) -> RemoteResult<bool>;

    /// Changes a session's title
    async fn rename_session(&self, id: &str, title: &str) -> RemoteResult<Session>;

    /// Messages of a session in conversation order
    async fn list_messages(&self, id: &str) -> RemoteResult<Vec<MessageEnvelope>>;

    /// Submits one prompt turn and waits for the full reply
    async fn send_prompt(&self, id: &str, request: &PromptRequest) -> RemoteResult<PromptResponse>;
}
