use super::create_session;
use crate::cache::SessionCache;
use crate::client::SessionDirectory;
use crate::endpoint::Endpoint;
use crate::error::{RemoteResult, Result};

/// Resolves sessions through the local endpoint cache
///
/// The cache is a hint. A recorded id is used only after the server confirms
/// it still exists; otherwise a replacement session is created and recorded.
pub struct CachedResolver<'a> {
    directory: &'a dyn SessionDirectory,
    cache: &'a SessionCache,
}

impl<'a> CachedResolver<'a> {
    /// Resolver over `directory`, remembering choices in `cache`
    pub fn new(directory: &'a dyn SessionDirectory, cache: &'a SessionCache) -> Self {
        Self { directory, cache }
    }

    /// Returns a session id valid at the time of the call
    ///
    /// - `force_new` skips the cache, creates a session and records it.
    /// - A recorded id the server still knows is returned without writing.
    /// - A recorded id that fails validation (missing or any server error)
    ///   is replaced: a new session is created and overwrites the record.
    /// - No record, or a record that cannot be read: a new session is created
    ///   and recorded.
    pub async fn resolve(&self, endpoint: &Endpoint, force_new: bool) -> Result<String> {
        if force_new {
            tracing::debug!(endpoint = %endpoint, "Fresh session requested");
            return self.create_and_record(endpoint).await;
        }

        let recorded = match self.cache.session_for(endpoint) {
            Ok(recorded) => recorded,
            Err(e) => {
                tracing::warn!(endpoint = %endpoint, "Ignoring unreadable cache record: {:#}", e);
                None
            }
        };

        if let Some(cached) = recorded {
            match self.directory.get_session(&cached).await {
                RemoteResult::Ok(session) => {
                    tracing::debug!(endpoint = %endpoint, session = %session.id, "Reusing cached session");
                    return Ok(cached);
                }
                RemoteResult::NotFound => {
                    tracing::info!(endpoint = %endpoint, session = %cached, "Cached session no longer exists");
                }
                RemoteResult::TransportError(failure) => {
                    tracing::info!(
                        endpoint = %endpoint,
                        session = %cached,
                        "Could not validate cached session: {}",
                        failure
                    );
                }
            }
        }

        self.create_and_record(endpoint).await
    }

    async fn create_and_record(&self, endpoint: &Endpoint) -> Result<String> {
        let session = create_session(self.directory, None).await?;
        self.cache.record(endpoint, &session.id)?;
        Ok(session.id)
    }
}
