use crate::cli::SessionCommand;
use crate::client::{HttpSessionDirectory, MessageEnvelope, Session, SessionDirectory};
use crate::config::Config;
use crate::error::{PromptcastError, RemoteResult, Result};
use crate::session::resolver::sort_by_recency;
use colored::Colorize;
use prettytable::{format, Table};

use super::report_failure;

/// Handle session commands against the configured server
pub async fn handle_session(config: &Config, command: SessionCommand) -> Result<()> {
    let directory = HttpSessionDirectory::new(&config.endpoint())?;

    match command {
        SessionCommand::List => {
            let sessions = list_sessions(&directory).await?;
            print_sessions(&sessions);
        }
        SessionCommand::Show { id } => {
            let session = show_session(&directory, &id).await?;
            print_session(&session);
        }
        SessionCommand::Create { title } => {
            let session = crate::session::create_session(&directory, title.as_deref()).await?;
            println!("{}", format!("Created session {}", session.id).green());
        }
        SessionCommand::Delete { id } => {
            delete_session(&directory, &id).await;
        }
        SessionCommand::Rename { id, title } => {
            rename_session(&directory, &id, &title).await;
        }
        SessionCommand::Messages { id } => {
            if let Some(messages) = session_messages(&directory, &id).await {
                print_messages(&messages);
            }
        }
    }

    Ok(())
}

/// All sessions, most recently updated first
pub async fn list_sessions(directory: &dyn SessionDirectory) -> Result<Vec<Session>> {
    let mut sessions = directory
        .list_sessions()
        .await
        .into_result(|| PromptcastError::Remote("session list unavailable".into()))?;
    sort_by_recency(&mut sessions);
    Ok(sessions)
}

/// One session, failing if it does not exist
pub async fn show_session(directory: &dyn SessionDirectory, id: &str) -> Result<Session> {
    directory
        .get_session(id)
        .await
        .into_result(|| PromptcastError::SessionNotFound(id.to_string()))
}

/// Deletes a session; failures are reported and yield `false`
pub async fn delete_session(directory: &dyn SessionDirectory, id: &str) -> bool {
    match directory.delete_session(id).await {
        RemoteResult::Ok(true) => {
            println!("{}", format!("Deleted session {}", id).green());
            true
        }
        RemoteResult::Ok(false) => {
            eprintln!("{}", format!("Server refused to delete session {}", id).yellow());
            false
        }
        RemoteResult::NotFound => {
            report_failure("delete", id, None);
            false
        }
        RemoteResult::TransportError(failure) => {
            report_failure("delete", id, Some(failure));
            false
        }
    }
}

/// Renames a session; failures are reported and yield `None`
pub async fn rename_session(
    directory: &dyn SessionDirectory,
    id: &str,
    title: &str,
) -> Option<Session> {
    match directory.rename_session(id, title).await {
        RemoteResult::Ok(session) => {
            println!(
                "{}",
                format!("Renamed session {} to \"{}\"", session.id, session.title).green()
            );
            Some(session)
        }
        RemoteResult::NotFound => {
            report_failure("rename", id, None);
            None
        }
        RemoteResult::TransportError(failure) => {
            report_failure("rename", id, Some(failure));
            None
        }
    }
}

/// Messages of a session; failures are reported and yield `None`
pub async fn session_messages(
    directory: &dyn SessionDirectory,
    id: &str,
) -> Option<Vec<MessageEnvelope>> {
    match directory.list_messages(id).await {
        RemoteResult::Ok(messages) => Some(messages),
        RemoteResult::NotFound => {
            report_failure("read messages of", id, None);
            None
        }
        RemoteResult::TransportError(failure) => {
            report_failure("read messages of", id, Some(failure));
            None
        }
    }
}

fn format_time(session: &Session) -> String {
    session
        .updated_at()
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn print_sessions(sessions: &[Session]) {
    if sessions.is_empty() {
        println!("{}", "No sessions on this server.".yellow());
        return;
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

    table.add_row(prettytable::row![
        "ID".bold(),
        "Title".bold(),
        "Last Updated".bold()
    ]);

    for session in sessions {
        let title = if session.title.chars().count() > 50 {
            format!("{}...", session.title.chars().take(47).collect::<String>())
        } else {
            session.title.clone()
        };
        table.add_row(prettytable::row![session.id.cyan(), title, format_time(session)]);
    }

    println!("\nSessions:");
    table.printstd();
    println!();
    println!(
        "Use {} to continue one.",
        "promptcast send --session <ID> <MESSAGE>".cyan()
    );
    println!();
}

fn print_session(session: &Session) {
    println!("{} {}", "ID:".bold(), session.id.cyan());
    println!("{} {}", "Title:".bold(), session.title);
    if let Some(created) = session.created_at() {
        println!("{} {}", "Created:".bold(), created.format("%Y-%m-%d %H:%M"));
    }
    println!("{} {}", "Updated:".bold(), format_time(session));
}

fn print_messages(messages: &[MessageEnvelope]) {
    if messages.is_empty() {
        println!("{}", "No messages in this session.".yellow());
        return;
    }

    for message in messages {
        let role = match message.info.role.as_str() {
            "user" => "user".green().bold(),
            "assistant" => "assistant".blue().bold(),
            other => other.normal().bold(),
        };
        println!("{}", role);
        let texts: Vec<&str> = message.parts.iter().filter_map(|p| p.as_text()).collect();
        if texts.is_empty() {
            println!("  {}", "(no text)".dimmed());
        }
        for text in texts {
            for line in text.lines() {
                println!("  {}", line);
            }
        }
        println!();
    }
}
