use crate::cache::{CacheEntry, SessionCache};
use crate::cli::CacheCommand;
use crate::config::Config;
use crate::endpoint::Endpoint;
use crate::error::Result;
use colored::Colorize;
use prettytable::{format, Table};

/// Handle cache commands
///
/// Purely local: no request reaches the server.
pub fn handle_cache(config: &Config, command: CacheCommand) -> Result<()> {
    let cache = SessionCache::open(&config.cache)?;

    match command {
        CacheCommand::List => {
            let entries = cache.entries()?;
            print_entries(&entries);
        }
        CacheCommand::Delete => {
            forget_endpoint(&cache, &config.endpoint())?;
        }
        CacheCommand::Clear => {
            clear_cache(&cache)?;
        }
    }

    Ok(())
}

/// Drops the record for `endpoint`, reporting whether it existed
pub fn forget_endpoint(cache: &SessionCache, endpoint: &Endpoint) -> Result<bool> {
    let existed = cache.forget(endpoint)?;
    if existed {
        println!("{}", format!("Forgot the session recorded for {}", endpoint).green());
    } else {
        println!("{}", format!("No session recorded for {}", endpoint).yellow());
    }
    Ok(existed)
}

/// Drops every record, reporting how many went away
pub fn clear_cache(cache: &SessionCache) -> Result<usize> {
    let removed = cache.clear()?;
    println!(
        "{}",
        format!(
            "Removed {} cached session{}",
            removed,
            if removed == 1 { "" } else { "s" }
        )
        .green()
    );
    Ok(removed)
}

fn print_entries(entries: &[CacheEntry]) {
    if entries.is_empty() {
        println!("{}", "No cached sessions.".yellow());
        return;
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(prettytable::row!["Host".bold(), "Port".bold(), "Session".bold()]);

    for entry in entries {
        table.add_row(prettytable::row![
            entry.endpoint.host,
            entry.endpoint.port,
            entry.session_id.cyan()
        ]);
    }

    println!("\nCached sessions:");
    table.printstd();
    println!();
}
