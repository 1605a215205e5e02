use std::sync::Arc;

use clap::{Parser, ValueEnum};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use edgee_mcp_runtime::client::{ApiConfig, DEFAULT_API_URL};
use edgee_mcp_runtime::credentials::{CredentialProvider, EnvToken, StaticToken, TOKEN_ENV};
use edgee_mcp_runtime::{McpCommands, run as run_mcp};

#[derive(Parser)]
#[command(
    name = "edgee-mcp",
    version,
    about = "Edgee MCP server: exposes the Edgee management API as MCP tools over stdio"
)]
struct Cli {
    /// API base URL
    #[arg(long, env = "EDGEE_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,

    /// API token (defaults to the EDGEE_TOKEN environment variable)
    #[arg(long)]
    token: Option<String>,

    /// Log output format (logs go to stderr)
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: McpCommands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "edgee_mcp=info,edgee_mcp_runtime=info".into());
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let config = match ApiConfig::new(&cli.api_url) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = %err, "invalid configuration");
            std::process::exit(1);
        }
    };

    let credentials: Arc<dyn CredentialProvider> = match cli.token {
        Some(token) => Arc::new(StaticToken::new(token)),
        None => Arc::new(EnvToken::default()),
    };
    if credentials.bearer_token().is_none() {
        tracing::error!(
            expected_from = %credentials.source(),
            "no Edgee API token; set {TOKEN_ENV} or pass --token"
        );
        std::process::exit(1);
    }

    let code = run_mcp(config, credentials, cli.command).await;
    std::process::exit(code);
}
