//! HTTP implementation of [`SessionDirectory`]
//!
//! Talks JSON over plain HTTP to the assistant server. No timeout is set on
//! the client, so calls block until the server answers or the OS gives up.

use crate::client::types::{CreateSessionRequest, UpdateSessionRequest};
use crate::client::{MessageEnvelope, PromptRequest, PromptResponse, Session, SessionDirectory};
use crate::endpoint::Endpoint;
use crate::error::{PromptcastError, RemoteResult, Result, TransportFailure};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

/// Session directory backed by the server's REST API
#[derive(Debug, Clone)]
pub struct HttpSessionDirectory {
    client: Client,
    base_url: Url,
    endpoint: Endpoint,
}

impl HttpSessionDirectory {
    /// Creates a directory client for the given endpoint
    ///
    /// # Errors
    ///
    /// Returns error if the endpoint does not form a valid URL or the HTTP
    /// client cannot be built
    ///
    /// # Examples
    ///
    /// ```
    /// use promptcast::client::HttpSessionDirectory;
    /// use promptcast::endpoint::Endpoint;
    ///
    /// let directory = HttpSessionDirectory::new(&Endpoint::new("127.0.0.1", 4096));
    /// assert!(directory.is_ok());
    /// ```
    pub fn new(endpoint: &Endpoint) -> Result<Self> {
        let base = Url::parse(&endpoint.base_url()).map_err(|e| {
            PromptcastError::Config(format!("Invalid server address {}: {}", endpoint, e))
        })?;
        if base.cannot_be_a_base() {
            return Err(
                PromptcastError::Config(format!("Invalid server address {}", endpoint)).into(),
            );
        }

        let client = Client::builder()
            .user_agent(concat!("promptcast/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PromptcastError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base,
            endpoint: endpoint.clone(),
        })
    }

    /// Creates a directory client for an explicit base URL
    ///
    /// Used by tests to point at a mock server.
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let url = Url::parse(base_url)
            .map_err(|e| PromptcastError::Config(format!("Invalid base URL {}: {}", base_url, e)))?;
        let host = url.host_str().unwrap_or("localhost").to_string();
        let port = url.port_or_known_default().unwrap_or(80);

        if url.cannot_be_a_base() {
            return Err(PromptcastError::Config(format!("Invalid base URL {}", base_url)).into());
        }

        let mut directory = Self::new(&Endpoint::new(host, port))?;
        directory.base_url = url;
        Ok(directory)
    }

    /// Endpoint this client talks to
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Base URL extended with `segments`, each percent-encoded as one segment
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// URL of a session resource, or `None` for ids no session can have
    ///
    /// Empty and dot-segment ids would collapse onto another route.
    fn session_url(&self, id: &str, rest: &[&str]) -> Option<Url> {
        if id.is_empty() || id == "." || id == ".." {
            return None;
        }
        let mut segments = vec!["session", id];
        segments.extend_from_slice(rest);
        Some(self.url(&segments))
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> RemoteResult<T> {
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return RemoteResult::TransportError(self.classify(e)),
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return RemoteResult::NotFound;
        }

        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => return RemoteResult::TransportError(self.classify(e)),
        };

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), body = %text, "Server returned an error");
            return RemoteResult::TransportError(TransportFailure::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        match serde_json::from_str(&text) {
            Ok(value) => RemoteResult::Ok(value),
            Err(e) => RemoteResult::TransportError(TransportFailure::Decode(format!(
                "{} (body: {})",
                e, text
            ))),
        }
    }

    fn classify(&self, error: reqwest::Error) -> TransportFailure {
        if error.is_connect() && connection_refused(&error) {
            TransportFailure::ConnectionRefused(self.endpoint.to_string())
        } else if error.is_connect() {
            TransportFailure::Other(format!(
                "could not connect to {}: {:#}",
                self.endpoint,
                anyhow::Error::from(error)
            ))
        } else {
            TransportFailure::Other(error.to_string())
        }
    }
}

#[async_trait]
impl SessionDirectory for HttpSessionDirectory {
    async fn list_sessions(&self) -> RemoteResult<Vec<Session>> {
        self.execute(self.client.get(self.url(&["session"]))).await
    }

    async fn get_session(&self, id: &str) -> RemoteResult<Session> {
        let Some(url) = self.session_url(id, &[]) else {
            return RemoteResult::NotFound;
        };
        self.execute(self.client.get(url)).await
    }

    async fn create_session(&self, title: Option<&str>) -> RemoteResult<Session> {
        let body = CreateSessionRequest { title };
        self.execute(self.client.post(self.url(&["session"])).json(&body))
            .await
    }

    async fn delete_session(&self, id: &str) -> RemoteResult<bool> {
        let Some(url) = self.session_url(id, &[]) else {
            return RemoteResult::NotFound;
        };
        self.execute(self.client.delete(url)).await
    }

    async fn rename_session(&self, id: &str, title: &str) -> RemoteResult<Session> {
        let Some(url) = self.session_url(id, &[]) else {
            return RemoteResult::NotFound;
        };
        let body = UpdateSessionRequest { title };
        self.execute(self.client.patch(url).json(&body)).await
    }

    async fn list_messages(&self, id: &str) -> RemoteResult<Vec<MessageEnvelope>> {
        let Some(url) = self.session_url(id, &["message"]) else {
            return RemoteResult::NotFound;
        };
        self.execute(self.client.get(url)).await
    }

    async fn send_prompt(&self, id: &str, request: &PromptRequest) -> RemoteResult<PromptResponse> {
        let Some(url) = self.session_url(id, &["message"]) else {
            return RemoteResult::NotFound;
        };
        tracing::debug!(session = %id, model = %request.model_id, "Submitting prompt");
        self.execute(self.client.post(url).json(request)).await
    }
}

/// Whether the OS refused the TCP connection somewhere in the error chain
fn connection_refused(error: &(dyn std::error::Error + 'static)) -> bool {
    let mut source = Some(error);
    while let Some(err) = source {
        if let Some(io) = err.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::ConnectionRefused {
                return true;
            }
        }
        source = err.source();
    }
    false
}
