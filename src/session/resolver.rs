use super::{create_session, SessionSelector};
use crate::client::{Session, SessionDirectory};
use crate::error::{PromptcastError, Result};

/// Resolves sessions against the server's live directory
///
/// Nothing is persisted locally. Remote failures propagate unchanged.
pub struct Resolver<'a> {
    directory: &'a dyn SessionDirectory,
}

impl<'a> Resolver<'a> {
    /// Resolver over `directory`
    pub fn new(directory: &'a dyn SessionDirectory) -> Self {
        Self { directory }
    }

    /// Picks the session for the next prompt
    ///
    /// 1. [`SessionSelector::New`] creates a session without any lookup.
    /// 2. [`SessionSelector::Explicit`] fetches the id; a missing session is a
    ///    [`PromptcastError::SessionNotFound`] error, never a fallback.
    /// 3. [`SessionSelector::MostRecent`] returns the session with the latest
    ///    update time, or creates one if the server has none.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use promptcast::client::HttpSessionDirectory;
    /// use promptcast::endpoint::Endpoint;
    /// use promptcast::session::{Resolver, SessionSelector};
    ///
    /// # tokio_test::block_on(async {
    /// let directory = HttpSessionDirectory::new(&Endpoint::new("127.0.0.1", 4096)).unwrap();
    /// let session = Resolver::new(&directory)
    ///     .resolve(&SessionSelector::MostRecent)
    ///     .await
    ///     .unwrap();
    /// println!("{}", session.id);
    /// # });
    /// ```
    pub async fn resolve(&self, selector: &SessionSelector) -> Result<Session> {
        match selector {
            SessionSelector::New => create_session(self.directory, None).await,
            SessionSelector::Explicit(id) => {
                let session = self
                    .directory
                    .get_session(id)
                    .await
                    .into_result(|| PromptcastError::SessionNotFound(id.clone()))?;
                tracing::debug!(session = %session.id, "Using requested session");
                Ok(session)
            }
            SessionSelector::MostRecent => {
                let sessions = self
                    .directory
                    .list_sessions()
                    .await
                    .into_result(|| PromptcastError::Remote("session list unavailable".into()))?;

                match most_recent(sessions) {
                    Some(session) => {
                        tracing::debug!(session = %session.id, "Using most recent session");
                        Ok(session)
                    }
                    None => {
                        tracing::debug!("Server has no sessions, creating one");
                        create_session(self.directory, None).await
                    }
                }
            }
        }
    }
}

/// The session with the greatest update time; ties go to whichever sorts first
pub fn most_recent(mut sessions: Vec<Session>) -> Option<Session> {
    sort_by_recency(&mut sessions);
    sessions.into_iter().next()
}

/// Sorts sessions by update time, newest first
pub fn sort_by_recency(sessions: &mut [Session]) {
    sessions.sort_by(|a, b| b.time.updated.cmp(&a.time.updated));
}
