mod cli;
mod repl;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use parley_ai::{InvocationError, OpenAiCompatClient, OpenAiCompatConfig, Session};
use parley_common::ConfigError;
use parley_config::{Credentials, ParleyConfig};
use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_DIRECTIVE: &str = "parley=info";

fn init_logging(directive: Option<&str>) {
    let directive = directive.unwrap_or(DEFAULT_LOG_DIRECTIVE);
    let directive: Directive = directive.parse().unwrap_or_else(|_| {
        eprintln!("invalid log directive {directive:?}, falling back to info");
        LevelFilter::INFO.into()
    });
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &cli::Args) -> ParleyConfig {
    let path = args.config.as_deref().map(std::path::Path::new);
    if let Some(path) = path {
        tracing::info!("Using config override: {}", path.display());
    }
    let mut config = parley_config::load_config(path).unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        ParleyConfig::default()
    });

    if let Some(ref model) = args.model {
        config.model.name = model.clone();
    }
    if args.stream {
        config.chat.stream = true;
    }
    config
}

fn client_config(config: &ParleyConfig, credentials: &Credentials) -> OpenAiCompatConfig {
    let model = &config.model;
    OpenAiCompatConfig::new(credentials.api_key())
        .with_base_url(&model.base_url)
        .with_model(&model.name)
        .with_instructions(&config.agent.instructions)
        .with_temperature(model.temperature)
        .with_max_tokens(model.max_tokens)
        .with_timeouts(
            Duration::from_secs(model.connect_timeout_secs.into()),
            Duration::from_secs(model.request_timeout_secs.into()),
        )
}

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Client(#[from] InvocationError),
}

/// Resolve the credential through `lookup`, then build the client and the
/// session. A missing credential fails before anything else is built.
fn build_session(
    config: &ParleyConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Session, StartupError> {
    let credentials = Credentials::from_lookup(&config.model, lookup)?;
    let client = OpenAiCompatClient::new(client_config(config, &credentials))?;
    tracing::info!(model = %config.model.name, stream = config.chat.stream, "client ready");

    let mut session = Session::new(Arc::new(client)).with_turn_logging(config.chat.log_turns);
    if let (Some(greeting), true) = (&config.agent.greeting, config.agent.remember_greeting) {
        session = session.with_greeting(greeting.clone());
    }
    Ok(session)
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env before anything reads the environment
    let dotenv = parley_config::load_dotenv();

    let args = cli::parse();
    init_logging(args.log_level.as_deref());

    tracing::info!("Parley v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(path) = dotenv {
        tracing::debug!("environment loaded from {}", path.display());
    }

    let config = load_config(&args);

    let mut session = match build_session(&config, |name| std::env::var(name).ok()) {
        Ok(session) => session,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let stdout = std::io::stdout();
    let result = repl::run(&mut session, &config, stdin, stdout.lock()).await;

    tracing::info!(
        session = %session.id().short(),
        tokens = session.tracker().total_tokens(),
        "Shutdown complete"
    );
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
