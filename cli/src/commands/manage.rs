use clap::Subcommand;
use composio_core::Error;
use composio_client::{ComposioClient, ConnectionFilter, CreateAuthConfig};
use serde_json::Value;

use crate::util::{manage_client, parse_json_arg, report_error};

#[derive(Subcommand)]
pub enum ManageCommands {
    /// List available toolkits (apps)
    Toolkits {
        /// Filter by search term
        #[arg(long)]
        search: Option<String>,
    },
    /// List actions available for a toolkit
    Tools {
        /// Toolkit slug (e.g. "notion")
        toolkit: String,
    },
    /// List auth configs
    AuthConfigs {
        /// Filter by toolkit slug
        #[arg(long)]
        toolkit: Option<String>,
    },
    /// Get one auth config
    AuthConfig {
        auth_config_id: String,
    },
    /// Create an auth config for a toolkit
    CreateAuthConfig {
        /// Toolkit slug (e.g. "instagram")
        toolkit: String,
        /// Auth method: OAUTH2, API_KEY, BEARER_TOKEN, or BASIC
        #[arg(long, default_value = "OAUTH2")]
        scheme: String,
        /// Display name
        #[arg(long)]
        name: Option<String>,
        /// Supply your own OAuth app instead of Composio's managed one
        #[arg(long)]
        custom_auth: bool,
        /// Custom credentials as JSON (client_id, client_secret)
        #[arg(long)]
        credentials: Option<String>,
        /// OAuth scope, repeatable
        #[arg(long)]
        scope: Vec<String>,
    },
    /// Delete an auth config
    DeleteAuthConfig {
        auth_config_id: String,
    },
    /// List connected accounts
    Connections {
        #[arg(long)]
        toolkit: Option<String>,
        /// ACTIVE, INACTIVE, PENDING, EXPIRED, or FAILED
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        user: Option<String>,
    },
    /// Get one connected account
    Connection {
        connection_id: String,
    },
    /// Start an auth flow for a user
    Connect {
        auth_config_id: String,
        #[arg(long, default_value = "default")]
        user: String,
        /// Redirect target after OAuth completes
        #[arg(long)]
        callback: Option<String>,
        /// Extra connection config as JSON (subdomain, scheme overrides)
        #[arg(long)]
        config: Option<String>,
    },
    /// Create a Composio-hosted auth link
    ConnectLink {
        auth_config_id: String,
        #[arg(long, default_value = "default")]
        user: String,
        #[arg(long)]
        callback: Option<String>,
    },
    /// Delete a connected account
    DeleteConnection {
        connection_id: String,
    },
    /// Refresh authentication for a connected account
    Refresh {
        connection_id: String,
    },
    /// Execute a raw action against a connected account
    Execute {
        /// Action name (e.g. "NOTION_GET_ABOUT_ME")
        action: String,
        /// Connected account id (ca_* or legacy UUID)
        account: String,
        /// Action input as JSON
        #[arg(long, default_value = "{}")]
        params: String,
    },
}

pub async fn run(api_key: Option<&str>, command: ManageCommands) -> i32 {
    let client = match manage_client(api_key) {
        Ok(client) => client,
        Err(e) => return report_error(&e),
    };
    let result = match command {
        ManageCommands::Toolkits { search } => toolkits(&client, search.as_deref()).await,
        ManageCommands::Tools { toolkit } => tools(&client, &toolkit).await,
        ManageCommands::AuthConfigs { toolkit } => auth_configs(&client, toolkit.as_deref()).await,
        ManageCommands::AuthConfig { auth_config_id } => {
            auth_config(&client, &auth_config_id).await
        }
        ManageCommands::CreateAuthConfig {
            toolkit,
            scheme,
            name,
            custom_auth,
            credentials,
            scope,
        } => {
            create_auth_config(
                &client,
                &toolkit,
                &scheme,
                name,
                custom_auth,
                credentials.as_deref(),
                scope,
            )
            .await
        }
        ManageCommands::DeleteAuthConfig { auth_config_id } => {
            delete_auth_config(&client, &auth_config_id).await
        }
        ManageCommands::Connections {
            toolkit,
            status,
            user,
        } => connections(&client, toolkit, status, user).await,
        ManageCommands::Connection { connection_id } => connection(&client, &connection_id).await,
        ManageCommands::Connect {
            auth_config_id,
            user,
            callback,
            config,
        } => {
            connect(
                &client,
                &auth_config_id,
                &user,
                callback.as_deref(),
                config.as_deref(),
            )
            .await
        }
        ManageCommands::ConnectLink {
            auth_config_id,
            user,
            callback,
        } => connect_link(&client, &auth_config_id, &user, callback.as_deref()).await,
        ManageCommands::DeleteConnection { connection_id } => {
            delete_connection(&client, &connection_id).await
        }
        ManageCommands::Refresh { connection_id } => refresh(&client, &connection_id).await,
        ManageCommands::Execute {
            action,
            account,
            params,
        } => execute(&client, &action, &account, &params).await,
    };
    match result {
        Ok(()) => 0,
        Err(e) => report_error(&e),
    }
}

async fn toolkits(client: &ComposioClient, search: Option<&str>) -> Result<(), Error> {
    let toolkits = client.list_toolkits(search).await?;
    if toolkits.is_empty() {
        println!("No toolkits found.");
        return Ok(());
    }
    for toolkit in toolkits {
        let schemes = toolkit.auth_schemes.join(", ");
        println!("  {} ({})", toolkit.name, toolkit.slug);
        if !schemes.is_empty() {
            println!("    Auth: {schemes}");
        }
    }
    Ok(())
}

async fn tools(client: &ComposioClient, toolkit: &str) -> Result<(), Error> {
    let tools = client.get_toolkit_tools(toolkit).await?;
    if tools.is_empty() {
        println!("No tools found for {toolkit}.");
        return Ok(());
    }
    for tool in tools {
        println!("  {}", tool.action);
        if let Some(description) = tool.description {
            println!("    {description}");
        }
    }
    Ok(())
}

async fn auth_configs(client: &ComposioClient, toolkit: Option<&str>) -> Result<(), Error> {
    let configs = client.list_auth_configs(toolkit).await?;
    if configs.is_empty() {
        println!("No auth configs found.");
        return Ok(());
    }
    for config in configs {
        println!(
            "  {} [{}] - {}",
            config.name.as_deref().unwrap_or("unnamed"),
            config.auth_scheme.as_deref().unwrap_or("?"),
            config.id
        );
        if let Some(slug) = config.toolkit_slug {
            println!("    Toolkit: {slug}");
        }
    }
    Ok(())
}

async fn auth_config(client: &ComposioClient, auth_config_id: &str) -> Result<(), Error> {
    let config = client.get_auth_config(auth_config_id).await?;
    println!("Auth config: {}", config.id);
    if let Some(name) = config.name {
        println!("  Name:    {name}");
    }
    if let Some(slug) = config.toolkit_slug {
        println!("  Toolkit: {slug}");
    }
    if let Some(scheme) = config.auth_scheme {
        println!("  Scheme:  {scheme}");
    }
    if let Some(created_at) = config.created_at {
        println!("  Created: {created_at}");
    }
    if !config.expected_input_fields.is_empty() {
        println!("  Expected input fields:");
        for field in config.expected_input_fields {
            let name = field
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or("unknown");
            println!("    - {name}");
        }
    }
    Ok(())
}

async fn create_auth_config(
    client: &ComposioClient,
    toolkit: &str,
    scheme: &str,
    name: Option<String>,
    custom_auth: bool,
    credentials: Option<&str>,
    scopes: Vec<String>,
) -> Result<(), Error> {
    let mut input = CreateAuthConfig::new(toolkit);
    input.auth_scheme = scheme.to_string();
    input.name = name;
    input.use_composio_auth = !custom_auth;
    if let Some(raw) = credentials {
        input.credentials = Some(parse_json_arg("--credentials", raw)?);
    }
    if !scopes.is_empty() {
        input.scopes = Some(scopes);
    }
    let config = client.create_auth_config(&input).await?;
    println!("Auth config created: {}", config.id);
    if let Some(slug) = config.toolkit_slug {
        println!("  Toolkit: {slug}");
    }
    if let Some(scheme) = config.auth_scheme {
        println!("  Scheme:  {scheme}");
    }
    Ok(())
}

async fn delete_auth_config(client: &ComposioClient, auth_config_id: &str) -> Result<(), Error> {
    client.delete_auth_config(auth_config_id).await?;
    println!("Auth config {auth_config_id} deleted.");
    Ok(())
}

async fn connections(
    client: &ComposioClient,
    toolkit: Option<String>,
    status: Option<String>,
    user: Option<String>,
) -> Result<(), Error> {
    let filter = ConnectionFilter {
        toolkit_slug: toolkit,
        status,
        user_id: user,
    };
    let accounts = client.list_connections(&filter).await?;
    if accounts.is_empty() {
        println!("No connected accounts found.");
        return Ok(());
    }
    for account in accounts {
        println!(
            "  {} [{}] - {}",
            account.toolkit_slug.as_deref().unwrap_or("?"),
            account.status.as_str(),
            account.id
        );
        if let Some(user_id) = account.user_id {
            println!("    User: {user_id}");
        }
    }
    Ok(())
}

async fn connection(client: &ComposioClient, connection_id: &str) -> Result<(), Error> {
    let account = client.get_connection(connection_id).await?;
    println!("Connected account: {}", account.id);
    println!("  Status:  {}", account.status.as_str());
    if let Some(slug) = account.toolkit_slug {
        println!("  Toolkit: {slug}");
    }
    if let Some(auth_config_id) = account.auth_config_id {
        println!("  Auth config: {auth_config_id}");
    }
    if let Some(user_id) = account.user_id {
        println!("  User:    {user_id}");
    }
    if let Some(uuid) = account.deprecated_uuid {
        println!("  Legacy UUID: {uuid}");
    }
    if let Some(created_at) = account.created_at {
        println!("  Created: {created_at}");
    }
    Ok(())
}

async fn connect(
    client: &ComposioClient,
    auth_config_id: &str,
    user: &str,
    callback: Option<&str>,
    config: Option<&str>,
) -> Result<(), Error> {
    let config = config
        .map(|raw| parse_json_arg("--config", raw))
        .transpose()?;
    let request = client
        .initiate_connection(auth_config_id, user, callback, config.as_ref())
        .await?;
    println!("Connection initiated: {}", request.id);
    println!("  Status: {}", request.status);
    if let Some(url) = request.redirect_url {
        println!("  Open this URL to authorize:");
        println!("    {url}");
    }
    Ok(())
}

async fn connect_link(
    client: &ComposioClient,
    auth_config_id: &str,
    user: &str,
    callback: Option<&str>,
) -> Result<(), Error> {
    let request = client
        .initiate_connection_link(auth_config_id, user, callback)
        .await?;
    println!("Auth link created: {}", request.id);
    println!("  Status: {}", request.status);
    if let Some(url) = request.redirect_url {
        println!("  Share this URL with the user:");
        println!("    {url}");
    }
    Ok(())
}

async fn delete_connection(client: &ComposioClient, connection_id: &str) -> Result<(), Error> {
    client.delete_connection(connection_id).await?;
    println!("Connected account {connection_id} deleted.");
    Ok(())
}

async fn refresh(client: &ComposioClient, connection_id: &str) -> Result<(), Error> {
    let account = client.refresh_connection(connection_id).await?;
    println!(
        "Connection {} refreshed: {}",
        account.id,
        account.status.as_str()
    );
    Ok(())
}

async fn execute(
    client: &ComposioClient,
    action: &str,
    account: &str,
    params: &str,
) -> Result<(), Error> {
    let params = parse_json_arg("--params", params)?;
    let result = client.execute_action(action, account, params).await?;
    println!("{}", serde_json::to_string_pretty(&result).unwrap_or_default());
    Ok(())
}
