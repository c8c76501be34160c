//! Command-line interface definition for Promptcast
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for sending prompts, managing server-side sessions,
//! and inspecting the local session cache.

use clap::{Parser, Subcommand};

/// Promptcast - talk to a local AI assistant server
///
/// Sends prompts to the server and remembers which conversation belongs to
/// which server, so repeated invocations continue the same session.
#[derive(Parser, Debug, Clone)]
#[command(name = "promptcast")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "PROMPTCAST_CONFIG")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Assistant server host (overrides config)
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Assistant server port (overrides config)
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Promptcast
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Send a prompt and print the assistant's reply
    Send {
        /// Prompt text; multiple words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,

        /// Always start a fresh session
        #[arg(short, long, conflicts_with_all = ["session", "latest"])]
        new: bool,

        /// Use this session ID (must exist on the server)
        #[arg(short, long, conflicts_with = "latest")]
        session: Option<String>,

        /// Use the server's most recently updated session
        #[arg(short, long)]
        latest: bool,

        /// Override the provider from config
        #[arg(long)]
        provider: Option<String>,

        /// Override the model from config
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Manage sessions on the server
    Session {
        /// Session management subcommand
        #[command(subcommand)]
        command: SessionCommand,
    },

    /// Inspect the local endpoint-to-session cache
    Cache {
        /// Cache management subcommand
        #[command(subcommand)]
        command: CacheCommand,
    },
}

/// Server-side session subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SessionCommand {
    /// List sessions, most recently updated first
    List,

    /// Show one session
    Show {
        /// Session ID
        id: String,
    },

    /// Create a new session
    Create {
        /// Optional title
        #[arg(short, long)]
        title: Option<String>,
    },

    /// Delete a session
    Delete {
        /// Session ID
        id: String,
    },

    /// Rename a session
    Rename {
        /// Session ID
        id: String,
        /// New title
        title: String,
    },

    /// Print the messages of a session
    Messages {
        /// Session ID
        id: String,
    },
}

/// Local cache subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum CacheCommand {
    /// List every recorded endpoint and its session
    List,

    /// Forget the session recorded for the target endpoint (--host/--port)
    Delete,

    /// Forget every recorded session
    Clear,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
