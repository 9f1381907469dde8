use clap::{Parser, Subcommand};

mod commands;
mod util;

use commands::manage::ManageCommands;
use commands::notion::NotionCommands;
use commands::zoom::ZoomCommands;

#[derive(Parser)]
#[command(
    name = "composio",
    version,
    about = "Composio bridge CLI — manage integrations and drive Notion/Zoom through Composio"
)]
struct Cli {
    /// Composio API key (falls back to the credential store when unset)
    #[arg(long, env = "COMPOSIO_API_KEY", global = true, hide_env_values = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Toolkits, auth configs, connected accounts, raw action execution
    Manage {
        #[command(subcommand)]
        command: ManageCommands,
    },
    /// Notion pages, databases, comments, and users
    Notion {
        #[command(subcommand)]
        command: NotionCommands,
    },
    /// Zoom meetings, recordings, and summaries
    Zoom {
        #[command(subcommand)]
        command: ZoomCommands,
    },
    /// Run the MCP stdio tool server on this terminal
    Mcp,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let api_key = cli.api_key.as_deref();

    let code = match cli.command {
        Commands::Manage { command } => commands::manage::run(api_key, command).await,
        Commands::Notion { command } => commands::notion::run(api_key, command).await,
        Commands::Zoom { command } => commands::zoom::run(api_key, command).await,
        Commands::Mcp => composio_mcp_runtime::serve_stdio(api_key.map(str::to_string)).await,
    };
    std::process::exit(code);
}
