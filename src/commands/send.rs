use crate::cache::SessionCache;
use crate::client::{HttpSessionDirectory, SessionDirectory};
use crate::config::{Config, SessionStrategy};
use crate::dispatch::Dispatcher;
use crate::error::{PromptcastError, Result};
use crate::session::{CachedResolver, Resolver, SessionSelector};
use colored::Colorize;

/// Arguments of the `send` command
#[derive(Debug, Clone, Default)]
pub struct SendArgs {
    /// Prompt words, joined with spaces
    pub message: Vec<String>,
    /// Start a fresh session
    pub new: bool,
    /// Explicit session id
    pub session: Option<String>,
    /// Use the server's most recent session
    pub latest: bool,
    /// Provider override
    pub provider: Option<String>,
    /// Model override
    pub model: Option<String>,
}

/// Which resolver handles this invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Local cache, validated against the server
    Cached {
        /// Skip the cache and start over
        force_new: bool,
    },
    /// The server's live session list
    Server(SessionSelector),
}

impl Resolution {
    /// Chooses the resolver for `args`
    ///
    /// An explicit id or `--latest` always asks the server and leaves the
    /// cache alone. Otherwise the configured strategy decides.
    pub fn for_args(args: &SendArgs, strategy: SessionStrategy) -> Self {
        if let Some(id) = &args.session {
            return Resolution::Server(SessionSelector::Explicit(id.clone()));
        }
        if args.latest {
            return Resolution::Server(SessionSelector::MostRecent);
        }
        match strategy {
            SessionStrategy::Cached => Resolution::Cached {
                force_new: args.new,
            },
            SessionStrategy::Server => {
                Resolution::Server(SessionSelector::from_flags(None, args.new))
            }
        }
    }
}

/// Result of one `send`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOutcome {
    /// Session the prompt went to
    pub session_id: String,
    /// Reply text, if the reply had any
    pub reply: Option<String>,
}

/// Run the `send` command against the configured server
pub async fn run_send(config: &Config, args: SendArgs) -> Result<()> {
    let directory = HttpSessionDirectory::new(&config.endpoint())?;
    let cache = SessionCache::open(&config.cache)?;

    let outcome = send_prompt(config, &directory, &cache, &args).await?;

    match &outcome.reply {
        Some(text) => println!("{}", text),
        None => eprintln!("{}", "(the reply contained no text)".yellow()),
    }
    eprintln!("{}", format!("session: {}", outcome.session_id).dimmed());

    Ok(())
}

/// Resolves a session and submits the prompt
///
/// # Errors
///
/// Returns error if the prompt is blank, resolution fails, or the server
/// rejects the prompt
pub async fn send_prompt(
    config: &Config,
    directory: &dyn SessionDirectory,
    cache: &SessionCache,
    args: &SendArgs,
) -> Result<SendOutcome> {
    let text = args.message.join(" ");
    if text.trim().is_empty() {
        return Err(PromptcastError::Config("Prompt text cannot be empty".to_string()).into());
    }

    let endpoint = config.endpoint();
    let session_id = match Resolution::for_args(args, config.session.strategy) {
        Resolution::Cached { force_new } => {
            CachedResolver::new(directory, cache)
                .resolve(&endpoint, force_new)
                .await?
        }
        Resolution::Server(selector) => Resolver::new(directory).resolve(&selector).await?.id,
    };
    tracing::info!(endpoint = %endpoint, session = %session_id, "Sending prompt");

    let model = config.model_selector(args.provider.as_deref(), args.model.as_deref());
    let reply = Dispatcher::new(directory)
        .send(&session_id, &text, &model)
        .await?;

    Ok(SendOutcome { session_id, reply })
}
