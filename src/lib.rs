//! Promptcast - command-line client for a local AI assistant server
//!
//! This library provides the pieces behind the `promptcast` binary: a client
//! for the server's session API, a local cache remembering which session
//! belongs to which server, and the resolution logic that decides where the
//! next prompt goes.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `client`: Session API types and the HTTP [`client::SessionDirectory`]
//! - `cache`: Endpoint-to-session cache over pluggable key-value stores
//! - `session`: Server-side and cache-backed session resolution
//! - `dispatch`: Prompt submission and reply extraction
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use promptcast::cache::SessionCache;
//! use promptcast::client::HttpSessionDirectory;
//! use promptcast::session::CachedResolver;
//! use promptcast::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let directory = HttpSessionDirectory::new(&config.endpoint())?;
//!     let cache = SessionCache::open(&config.cache)?;
//!
//!     let session_id = CachedResolver::new(&directory, &cache)
//!         .resolve(&config.endpoint(), false)
//!         .await?;
//!     println!("continuing {}", session_id);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod dispatch;
pub mod endpoint;
pub mod error;
pub mod session;

// Re-export commonly used types
pub use cache::SessionCache;
pub use client::{HttpSessionDirectory, SessionDirectory};
pub use config::Config;
pub use endpoint::Endpoint;
pub use error::{PromptcastError, RemoteResult, Result};
pub use session::{CachedResolver, Resolver, SessionSelector};

#[cfg(test)]
pub mod test_utils;
