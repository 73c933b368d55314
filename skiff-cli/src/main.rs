use clap::{ArgAction, Parser, ValueEnum};
use skiff::{AnsiRenderer, ConfigError, LineInput, Session, SessionError, SkiffConfig};
use skiff_core::GatewayError;
use skiff_gateway::{AnthropicGateway, GatewayConfig};
use skiff_tools::{Dispatcher, EditPolicy, InMemoryToolRegistry, ToolsConfig};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "skiff", version)]
#[command(about = "Chat with Claude while it reads, lists and edits files in the current directory")]
struct Cli {
    /// Anthropic API key
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model identifier
    #[arg(long)]
    model: Option<String>,

    /// Maximum output tokens per reply
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    max_tokens: Option<u32>,

    /// API base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Request timeout, e.g. "30s" or "2m"
    #[arg(long, value_parser = parse_timeout)]
    timeout: Option<Duration>,

    /// Consecutive tool turns allowed before asking the human again
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    max_chain: Option<u64>,

    /// How edit_file treats multiple matches
    #[arg(long, value_enum)]
    edit_policy: Option<EditPolicyArg>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip the start-up banner
    #[arg(long)]
    no_greeting: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Log output format (written to stderr)
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EditPolicyArg {
    ReplaceAll,
    RequireUnique,
}

impl From<EditPolicyArg> for EditPolicy {
    fn from(arg: EditPolicyArg) -> Self {
        match arg {
            EditPolicyArg::ReplaceAll => EditPolicy::ReplaceAll,
            EditPolicyArg::RequireUnique => EditPolicy::RequireUnique,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("failed to start runtime: {0}")]
    Runtime(std::io::Error),
}

fn parse_timeout(value: &str) -> Result<Duration, String> {
    skiff::config::parse_timeout(value).map_err(|e| e.to_string())
}

/// Everything needed to start a session, after merging flags over the file.
#[derive(Debug)]
struct Settings {
    gateway: GatewayConfig,
    tools: ToolsConfig,
    session: skiff::SessionProfile,
}

impl Cli {
    fn settings(&self) -> Result<Settings, CliError> {
        let file = match &self.config {
            Some(path) => SkiffConfig::load(path)?,
            None => SkiffConfig::default(),
        };

        let mut gateway = file.gateway_config(self.api_key.clone().unwrap_or_default())?;
        if let Some(model) = &self.model {
            gateway.model = model.clone();
        }
        if let Some(max_tokens) = self.max_tokens {
            gateway.max_tokens = max_tokens;
        }
        if let Some(base_url) = &self.base_url {
            gateway.base_url = base_url.clone();
        }
        if let Some(timeout) = self.timeout {
            gateway.timeout = Some(timeout);
        }

        let mut tools = file.tools;
        if let Some(policy) = self.edit_policy {
            tools.edit_policy = policy.into();
        }

        let mut session = file.session;
        if let Some(limit) = self.max_chain {
            session.max_chain_length = Some(usize::try_from(limit).unwrap_or(usize::MAX));
        }
        if self.no_greeting {
            session.greeting = false;
        }

        Ok(Settings {
            gateway,
            tools,
            session,
        })
    }

    fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

fn init_logging(cli: &Cli) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_directive()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    let _ = match cli.log_format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let settings = cli.settings()?;
    tracing::debug!(?settings, "Resolved settings");

    let gateway = AnthropicGateway::new(settings.gateway)?;
    let dispatcher = Dispatcher::new(InMemoryToolRegistry::standard(&settings.tools));
    let color = !cli.no_color && std::io::stdout().is_terminal();

    let mut session = Session::new(
        gateway,
        dispatcher,
        LineInput::stdin(),
        AnsiRenderer::stdout(color),
    )
    .with_profile(settings.session);

    session.run().await?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    let result = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)
        .and_then(|runtime| runtime.block_on(run(cli)));

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
