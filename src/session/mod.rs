//! Session resolution
//!
//! Decides which conversation the next prompt goes to. Two resolvers exist,
//! and each invocation uses exactly one of them:
//!
//! - [`Resolver`] asks the server directly (explicit id, most recent, or new).
//! - [`CachedResolver`] reuses the session recorded locally for the endpoint,
//!   validating it against the server and replacing it when it has gone stale.

pub mod cached;
pub mod resolver;

pub use cached::CachedResolver;
pub use resolver::Resolver;

use crate::client::{Session, SessionDirectory};
use crate::error::{PromptcastError, Result};

/// What the caller asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionSelector {
    /// A specific session, which must exist
    Explicit(String),
    /// Whatever session the server updated last
    MostRecent,
    /// A brand-new session
    New,
}

impl SessionSelector {
    /// Builds a selector from command-line flags
    ///
    /// `new` wins over everything, then an explicit id, otherwise the most
    /// recent session.
    pub fn from_flags(session: Option<&str>, new: bool) -> Self {
        if new {
            SessionSelector::New
        } else if let Some(id) = session {
            SessionSelector::Explicit(id.to_string())
        } else {
            SessionSelector::MostRecent
        }
    }
}

/// Creates a session and checks the server returned a usable id
pub(crate) async fn create_session(
    directory: &dyn SessionDirectory,
    title: Option<&str>,
) -> Result<Session> {
    let session = directory.create_session(title).await.into_result(|| {
        PromptcastError::SessionCreationFailed("server reported the collection missing".into())
    })?;

    if session.id.trim().is_empty() {
        return Err(PromptcastError::SessionCreationFailed(
            "server returned a session without an id".to_string(),
        )
        .into());
    }

    tracing::info!(session = %session.id, "Created session");
    Ok(session)
}
