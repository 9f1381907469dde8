use clap::Parser;

#[derive(Parser)]
#[command(
    name = "composio-mcp",
    version,
    about = "Composio bridge MCP server — tool surface over stdio"
)]
struct Cli {
    /// Composio API key (falls back to the credential store when unset)
    #[arg(long, env = "COMPOSIO_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let code = composio_mcp_runtime::serve_stdio(cli.api_key).await;
    std::process::exit(code);
}
