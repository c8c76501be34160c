/*!
Command handlers for the CLI

This module provides the handlers invoked by the CLI entrypoint:

- `send`: Resolve a session and submit one prompt
- `sessions`: List, inspect, create, rename and delete server sessions
- `cache`: List and prune the local endpoint-to-session cache

Each handler has a thin `handle_*`/`run_*` entry that builds the HTTP client
and cache from configuration, and an inner function over trait objects that
the tests drive directly.
*/

pub mod cache;
pub mod send;
pub mod sessions;

use crate::error::TransportFailure;
use colored::Colorize;

/// Prints a user-facing message for a failed auxiliary server call
pub(crate) fn report_failure(action: &str, id: &str, failure: Option<TransportFailure>) {
    match failure {
        None => eprintln!(
            "{}",
            format!("Could not {} session {}: not found", action, id).yellow()
        ),
        Some(failure) => {
            eprintln!(
                "{}",
                format!("Could not {} session {}: {}", action, id, failure.into_error()).red()
            );
        }
    }
}
