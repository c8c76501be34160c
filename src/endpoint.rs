//! Endpoint identity
//!
//! One running assistant server is identified by its `(host, port)` pair.
//! The pair is also the key under which the local cache remembers the last
//! session used against that server.

use crate::error::{PromptcastError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A `(host, port)` pair naming one server instance
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    /// Host name or IP address
    pub host: String,
    /// TCP port
    pub port: u16,
}

impl Endpoint {
    /// Creates an endpoint, normalizing the host
    ///
    /// # Examples
    ///
    /// ```
    /// use promptcast::endpoint::Endpoint;
    ///
    /// let endpoint = Endpoint::new(" LocalHost ", 4096);
    /// assert_eq!(endpoint.cache_key(), "localhost:4096");
    /// ```
    pub fn new(host: impl AsRef<str>, port: u16) -> Self {
        Self {
            host: normalize_host(host.as_ref()),
            port,
        }
    }

    /// Key used by the session cache (`host:port`)
    pub fn cache_key(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Parses a key produced by [`Endpoint::cache_key`]
    ///
    /// The split happens at the last `:` so IPv6 hosts survive the round trip.
    pub fn from_cache_key(key: &str) -> Result<Self> {
        let (host, port) = key
            .rsplit_once(':')
            .ok_or_else(|| PromptcastError::Storage(format!("Malformed cache key: {}", key)))?;

        if host.trim().is_empty() {
            return Err(PromptcastError::Storage(format!("Cache key has no host: {}", key)).into());
        }

        let port: u16 = port
            .parse()
            .map_err(|_| PromptcastError::Storage(format!("Cache key has bad port: {}", key)))?;

        Ok(Self::new(host, port))
    }

    /// Base URL of the server, e.g. `http://127.0.0.1:4096`
    pub fn base_url(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("http://[{}]:{}", self.host, self.port)
        } else {
            format!("http://{}:{}", self.host, self.port)
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

fn normalize_host(host: &str) -> String {
    host.trim().to_ascii_lowercase()
}
