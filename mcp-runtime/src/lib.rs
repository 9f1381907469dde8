//! MCP stdio server exposing the Composio bridge as a tool surface.
//!
//! Speaks JSON-RPC 2.0 with Content-Length framing on stdin/stdout. Tool
//! errors never abort the session: they come back as `isError` tool-call
//! responses with a structured error envelope, so an agent can read the
//! failure and retry with corrected arguments.

use composio_client::credentials::{resolve_api_key, resolve_notion_account, resolve_zoom_account};
use composio_client::{ComposioClient, ConnectionFilter, CreateAuthConfig, NotionClient, ZoomClient};
use composio_core::Error;
use composio_core::notion::{BlockUpdate, DatabaseQuery, DatabaseSchemaUpdate, PageUpdate};
use composio_core::zoom::{MeetingCreate, MeetingUpdate};
use serde_json::{Map, Value, json};
use tokio::io::{
    self, AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};

mod tools;

use tools::tool_definitions;

const MCP_PROTOCOL_VERSION: &str = "2024-11-05";
const MCP_SERVER_NAME: &str = "composio-mcp";

/// Serve MCP over stdio until the client closes stdin. Returns a process
/// exit code; transport failures are reported on stderr.
pub async fn serve_stdio(api_key: Option<String>) -> i32 {
    let mut server = McpServer::new(api_key);
    server.emit_startup_status();
    match server.run().await {
        Ok(()) => 0,
        Err(message) => {
            eprintln!("{message}");
            1
        }
    }
}

/// Lazily-built clients shared by all tool calls in one session. Nothing
/// touches the credential store until the first tool that needs it, so
/// `initialize` and `tools/list` work without any configuration.
struct ToolContext {
    api_key: Option<String>,
    manage: Option<ComposioClient>,
    notion: Option<NotionClient>,
    zoom: Option<ZoomClient>,
}

impl ToolContext {
    fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            manage: None,
            notion: None,
            zoom: None,
        }
    }

    fn resolve_key(&self) -> Result<String, Error> {
        match &self.api_key {
            Some(key) => Ok(key.clone()),
            None => resolve_api_key(),
        }
    }

    fn manage(&mut self) -> Result<&ComposioClient, Error> {
        let client = match self.manage.take() {
            Some(client) => client,
            None => ComposioClient::new(self.resolve_key()?)?,
        };
        Ok(self.manage.insert(client))
    }

    fn notion(&mut self) -> Result<&NotionClient, Error> {
        let client = match self.notion.take() {
            Some(client) => client,
            None => {
                let manage = ComposioClient::new(self.resolve_key()?)?;
                NotionClient::new(manage, resolve_notion_account()?)
            }
        };
        Ok(self.notion.insert(client))
    }

    fn zoom(&mut self) -> Result<&ZoomClient, Error> {
        let client = match self.zoom.take() {
            Some(client) => client,
            None => {
                let manage = ComposioClient::new(self.resolve_key()?)?;
                ZoomClient::new(manage, resolve_zoom_account()?)
            }
        };
        Ok(self.zoom.insert(client))
    }
}

struct McpServer {
    context: ToolContext,
}

impl McpServer {
    fn new(api_key: Option<String>) -> Self {
        Self {
            context: ToolContext::new(api_key),
        }
    }

    async fn run(&mut self) -> Result<(), String> {
        let stdin = io::stdin();
        let mut reader = BufReader::new(stdin);
        let mut stdout = io::stdout();

        loop {
            let incoming = read_framed_json(&mut reader)
                .await
                .map_err(|e| format!("Failed to read MCP message: {e}"))?;
            let Some(incoming) = incoming else {
                break;
            };

            let responses = self.handle_incoming_message(incoming).await;
            for response in responses {
                write_framed_json(&mut stdout, &response)
                    .await
                    .map_err(|e| format!("Failed to write MCP response: {e}"))?;
            }
        }

        Ok(())
    }

    fn emit_startup_status(&self) {
        let payload = json!({
            "event": "mcp_server_start",
            "server": MCP_SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION"),
            "protocol": MCP_PROTOCOL_VERSION,
            "tools": tool_definitions().len(),
        });
        eprintln!("{}", to_pretty_json(&payload));
    }

    async fn handle_incoming_message(&mut self, incoming: Value) -> Vec<Value> {
        let mut responses = Vec::new();

        if let Some(batch) = incoming.as_array() {
            if batch.is_empty() {
                responses.push(error_response(
                    Value::Null,
                    RpcError::invalid_request("Batch request must not be empty"),
                ));
                return responses;
            }
            for item in batch {
                if let Some(response) = self.handle_single_message(item.clone()).await {
                    responses.push(response);
                }
            }
            return responses;
        }

        if let Some(response) = self.handle_single_message(incoming).await {
            responses.push(response);
        }
        responses
    }

    async fn handle_single_message(&mut self, incoming: Value) -> Option<Value> {
        let Some(obj) = incoming.as_object() else {
            return Some(error_response(
                Value::Null,
                RpcError::invalid_request("Request must be a JSON object"),
            ));
        };

        if obj.get("jsonrpc").and_then(Value::as_str) != Some("2.0") {
            let id = obj.get("id").cloned().unwrap_or(Value::Null);
            return Some(error_response(
                id,
                RpcError::invalid_request("jsonrpc must be '2.0'"),
            ));
        }

        let Some(method) = obj.get("method").and_then(Value::as_str) else {
            // Most likely a client response; this server issues no
            // outbound requests.
            return None;
        };

        let params = obj.get("params").cloned().unwrap_or(Value::Null);
        if let Some(id) = obj.get("id").cloned() {
            let result = self.handle_request(method, params).await;
            Some(match result {
                Ok(payload) => success_response(id, payload),
                Err(err) => error_response(id, err),
            })
        } else {
            self.handle_notification(method, params);
            None
        }
    }

    fn handle_notification(&self, method: &str, _params: Value) {
        if matches!(
            method,
            "notifications/initialized" | "notifications/cancelled"
        ) {
            return;
        }
        // Unknown notifications are intentionally ignored.
    }

    async fn handle_request(&mut self, method: &str, params: Value) -> Result<Value, RpcError> {
        match method {
            "initialize" => Ok(self.initialize_payload()),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(self.tools_list_payload()),
            "tools/call" => self.handle_tools_call(params).await,
            "prompts/list" => Ok(json!({ "prompts": [] })),
            _ => Err(RpcError::method_not_found(method)),
        }
    }

    fn initialize_payload(&self) -> Value {
        json!({
            "protocolVersion": MCP_PROTOCOL_VERSION,
            "capabilities": {
                "tools": {
                    "listChanged": false
                },
                "prompts": {
                    "listChanged": false
                }
            },
            "serverInfo": {
                "name": MCP_SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION")
            },
            "instructions": "Composio bridge: composio_* tools manage toolkits, auth configs, and connected accounts; notion_* and zoom_* tools act through the connected Notion and Zoom accounts. Connected-account ids accept both ca_* ids and legacy UUIDs."
        })
    }

    fn tools_list_payload(&self) -> Value {
        let tools: Vec<Value> = tool_definitions()
            .into_iter()
            .map(|tool| {
                json!({
                    "name": tool.name,
                    "description": tool.description,
                    "inputSchema": tool.input_schema,
                })
            })
            .collect();
        json!({ "tools": tools })
    }

    async fn handle_tools_call(&mut self, params: Value) -> Result<Value, RpcError> {
        let params = params
            .as_object()
            .ok_or_else(|| RpcError::invalid_params("tools/call params must be an object"))?;

        let name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| RpcError::invalid_params("tools/call requires string field 'name'"))?;

        let args = match params.get("arguments") {
            Some(Value::Object(map)) => map.clone(),
            Some(Value::Null) | None => Map::new(),
            Some(_) => {
                return Err(RpcError::invalid_params(
                    "tools/call 'arguments' must be an object",
                ));
            }
        };

        if !tool_definitions().iter().any(|tool| tool.name == name) {
            return Err(RpcError::invalid_params(format!("Unknown tool: {name}")));
        }

        Ok(match dispatch_tool(&mut self.context, name, &args).await {
            Ok(envelope) => build_tool_call_response(envelope, false),
            Err(err) => build_tool_call_response(err.to_value(), true),
        })
    }
}

async fn dispatch_tool(
    context: &mut ToolContext,
    name: &str,
    args: &Map<String, Value>,
) -> Result<Value, ToolError> {
    if name.starts_with("composio_") {
        let client = context.manage().map_err(tool_error)?;
        dispatch_manage(client, name, args).await
    } else if name.starts_with("notion_") {
        let client = context.notion().map_err(tool_error)?;
        dispatch_notion(client, name, args).await
    } else if name.starts_with("zoom_") {
        let client = context.zoom().map_err(tool_error)?;
        dispatch_zoom(client, name, args).await
    } else {
        Err(ToolError::new(
            "unknown_tool",
            format!("No tool named '{name}'"),
        ))
    }
}

async fn dispatch_manage(
    client: &ComposioClient,
    name: &str,
    args: &Map<String, Value>,
) -> Result<Value, ToolError> {
    match name {
        "composio_list_toolkits" => {
            let search = optional_str(args, "search");
            let toolkits = client
                .list_toolkits(search.as_deref())
                .await
                .map_err(tool_error)?;
            Ok(json!({ "toolkits": to_envelope(&toolkits)? }))
        }
        "composio_get_toolkit_tools" => {
            let slug = require_str(args, "toolkit_slug")?;
            let tools = client.get_toolkit_tools(&slug).await.map_err(tool_error)?;
            Ok(json!({ "toolkit": slug, "tools": to_envelope(&tools)? }))
        }
        "composio_list_auth_configs" => {
            let slug = optional_str(args, "toolkit_slug");
            let configs = client
                .list_auth_configs(slug.as_deref())
                .await
                .map_err(tool_error)?;
            Ok(json!({ "auth_configs": to_envelope(&configs)? }))
        }
        "composio_get_auth_config" => {
            let id = require_str(args, "auth_config_id")?;
            to_envelope(&client.get_auth_config(&id).await.map_err(tool_error)?)
        }
        "composio_create_auth_config" => {
            let mut input = CreateAuthConfig::new(require_str(args, "toolkit_slug")?);
            if let Some(scheme) = optional_str(args, "auth_scheme") {
                input.auth_scheme = scheme;
            }
            input.name = optional_str(args, "name");
            if let Some(use_managed) = optional_bool(args, "use_composio_auth") {
                input.use_composio_auth = use_managed;
            }
            input.credentials = json_arg(args, "credentials")?;
            if let Some(scopes) = optional_str(args, "scopes") {
                let scopes: Vec<String> = scopes
                    .split(',')
                    .map(str::trim)
                    .filter(|scope| !scope.is_empty())
                    .map(str::to_string)
                    .collect();
                if !scopes.is_empty() {
                    input.scopes = Some(scopes);
                }
            }
            to_envelope(&client.create_auth_config(&input).await.map_err(tool_error)?)
        }
        "composio_delete_auth_config" => {
            let id = require_str(args, "auth_config_id")?;
            let result = client.delete_auth_config(&id).await.map_err(tool_error)?;
            Ok(deletion_envelope(&id, result))
        }
        "composio_list_connections" => {
            let filter = ConnectionFilter {
                toolkit_slug: optional_str(args, "toolkit_slug"),
                status: optional_str(args, "status"),
                user_id: optional_str(args, "user_id"),
            };
            let accounts = client.list_connections(&filter).await.map_err(tool_error)?;
            Ok(json!({ "connected_accounts": to_envelope(&accounts)? }))
        }
        "composio_get_connection" => {
            let id = require_str(args, "connection_id")?;
            to_envelope(&client.get_connection(&id).await.map_err(tool_error)?)
        }
        "composio_initiate_connection" => {
            let auth_config_id = require_str(args, "auth_config_id")?;
            let user_id =
                optional_str(args, "user_id").unwrap_or_else(|| "default".to_string());
            let callback_url = optional_str(args, "callback_url");
            let config = json_arg(args, "config")?;
            let request = client
                .initiate_connection(
                    &auth_config_id,
                    &user_id,
                    callback_url.as_deref(),
                    config.as_ref(),
                )
                .await
                .map_err(tool_error)?;
            to_envelope(&request)
        }
        "composio_initiate_connection_link" => {
            let auth_config_id = require_str(args, "auth_config_id")?;
            let user_id =
                optional_str(args, "user_id").unwrap_or_else(|| "default".to_string());
            let callback_url = optional_str(args, "callback_url");
            let request = client
                .initiate_connection_link(&auth_config_id, &user_id, callback_url.as_deref())
                .await
                .map_err(tool_error)?;
            to_envelope(&request)
        }
        "composio_delete_connection" => {
            let id = require_str(args, "connection_id")?;
            let result = client.delete_connection(&id).await.map_err(tool_error)?;
            Ok(deletion_envelope(&id, result))
        }
        "composio_refresh_connection" => {
            let id = require_str(args, "connection_id")?;
            to_envelope(&client.refresh_connection(&id).await.map_err(tool_error)?)
        }
        "composio_execute_action" => {
            let action = require_str(args, "action")?;
            let account = require_str(args, "connected_account_id")?;
            let params = json_arg(args, "params")?.unwrap_or_else(|| json!({}));
            let result = client
                .execute_action(&action, &account, params)
                .await
                .map_err(tool_error)?;
            Ok(object_envelope(result))
        }
        _ => Err(ToolError::new(
            "unknown_tool",
            format!("No tool named '{name}'"),
        )),
    }
}

async fn dispatch_notion(
    client: &NotionClient,
    name: &str,
    args: &Map<String, Value>,
) -> Result<Value, ToolError> {
    match name {
        "notion_get_current_user" => {
            to_envelope(&client.get_current_user().await.map_err(tool_error)?)
        }
        "notion_get_user" => {
            let user_id = require_str(args, "user_id")?;
            to_envelope(&client.get_user(&user_id).await.map_err(tool_error)?)
        }
        "notion_list_users" => {
            let users = client.list_users().await.map_err(tool_error)?;
            Ok(json!({ "users": to_envelope(&users)? }))
        }
        "notion_search_workspace" => {
            let query = optional_str(args, "query").unwrap_or_default();
            let filter_type = optional_str(args, "filter_type");
            let page_size = optional_u32(args, "page_size")?.unwrap_or(20);
            let results = client
                .search_workspace(&query, filter_type.as_deref(), page_size)
                .await
                .map_err(tool_error)?;
            Ok(json!({ "results": to_envelope(&results)? }))
        }
        "notion_search_pages" => {
            let query = optional_str(args, "query").unwrap_or_default();
            let pages = client.search_pages(&query).await.map_err(tool_error)?;
            Ok(json!({ "pages": to_envelope(&pages)? }))
        }
        "notion_get_page" => {
            let page_id = require_str(args, "page_id")?;
            to_envelope(&client.get_page(&page_id).await.map_err(tool_error)?)
        }
        "notion_create_page" => {
            let parent_id = require_str(args, "parent_id")?;
            let title = require_str(args, "title")?;
            let parent_type =
                optional_str(args, "parent_type").unwrap_or_else(|| "page_id".to_string());
            let icon = optional_str(args, "icon");
            let cover = optional_str(args, "cover");
            let page = client
                .create_page(
                    &parent_id,
                    &title,
                    &parent_type,
                    icon.as_deref(),
                    cover.as_deref(),
                )
                .await
                .map_err(tool_error)?;
            to_envelope(&page)
        }
        "notion_update_page" => {
            let page_id = require_str(args, "page_id")?;
            let update = PageUpdate {
                title: optional_str(args, "title"),
                icon: optional_str(args, "icon"),
                cover: optional_str(args, "cover"),
                archived: optional_bool(args, "archived"),
                properties: json_arg(args, "properties")?,
            };
            to_envelope(&client.update_page(&page_id, &update).await.map_err(tool_error)?)
        }
        "notion_archive_page" => {
            let page_id = require_str(args, "page_id")?;
            let archived = optional_bool(args, "archived").unwrap_or(true);
            to_envelope(&client.archive_page(&page_id, archived).await.map_err(tool_error)?)
        }
        "notion_duplicate_page" => {
            let page_id = require_str(args, "page_id")?;
            to_envelope(&client.duplicate_page(&page_id).await.map_err(tool_error)?)
        }
        "notion_get_page_property" => {
            let page_id = require_str(args, "page_id")?;
            let property_id = require_str(args, "property_id")?;
            let result = client
                .get_page_property(&page_id, &property_id)
                .await
                .map_err(tool_error)?;
            Ok(object_envelope(result))
        }
        "notion_add_content_blocks" => {
            let page_id = require_str(args, "page_id")?;
            let blocks = array_arg(args, "blocks")?;
            let result = client
                .add_content_blocks(&page_id, blocks)
                .await
                .map_err(tool_error)?;
            Ok(object_envelope(result))
        }
        "notion_append_blocks" => {
            let block_id = require_str(args, "block_id")?;
            let children = array_arg(args, "children")?;
            let result = client
                .append_blocks(&block_id, children)
                .await
                .map_err(tool_error)?;
            Ok(object_envelope(result))
        }
        "notion_get_block" => {
            let block_id = require_str(args, "block_id")?;
            to_envelope(&client.get_block(&block_id).await.map_err(tool_error)?)
        }
        "notion_get_block_children" => {
            let block_id = require_str(args, "block_id")?;
            let start_cursor = optional_str(args, "start_cursor");
            let page_size = optional_u32(args, "page_size")?.unwrap_or(100);
            let blocks = client
                .get_block_children(&block_id, start_cursor.as_deref(), page_size)
                .await
                .map_err(tool_error)?;
            Ok(json!({ "blocks": to_envelope(&blocks)? }))
        }
        "notion_update_block" => {
            let block_id = require_str(args, "block_id")?;
            let updates = block_updates(args)?;
            to_envelope(&client.update_block(&block_id, &updates).await.map_err(tool_error)?)
        }
        "notion_delete_block" => {
            let block_id = require_str(args, "block_id")?;
            let result = client.delete_block(&block_id).await.map_err(tool_error)?;
            Ok(deletion_envelope(&block_id, result))
        }
        "notion_create_database" => {
            let parent_id = require_str(args, "parent_id")?;
            let title = require_str(args, "title")?;
            let properties = json_arg(args, "properties")?.ok_or_else(|| missing_argument("properties"))?;
            let database = client
                .create_database(&parent_id, &title, properties)
                .await
                .map_err(tool_error)?;
            to_envelope(&database)
        }
        "notion_get_database" => {
            let database_id = require_str(args, "database_id")?;
            to_envelope(&client.get_database(&database_id).await.map_err(tool_error)?)
        }
        "notion_query_database" => {
            let database_id = require_str(args, "database_id")?;
            let query = DatabaseQuery {
                filter: json_arg(args, "filter")?,
                sorts: json_arg(args, "sorts")?,
                page_size: optional_u32(args, "page_size")?
                    .unwrap_or_else(|| DatabaseQuery::default().page_size),
                start_cursor: optional_str(args, "start_cursor"),
            };
            let rows = client
                .query_database(&database_id, &query)
                .await
                .map_err(tool_error)?;
            Ok(json!({ "rows": to_envelope(&rows)? }))
        }
        "notion_create_database_row" => {
            let database_id = require_str(args, "database_id")?;
            let properties = json_arg(args, "properties")?.ok_or_else(|| missing_argument("properties"))?;
            let row = client
                .create_database_row(&database_id, properties)
                .await
                .map_err(tool_error)?;
            to_envelope(&row)
        }
        "notion_get_database_row" => {
            let row_id = require_str(args, "row_id")?;
            to_envelope(&client.get_database_row(&row_id).await.map_err(tool_error)?)
        }
        "notion_update_database_row" => {
            let row_id = require_str(args, "row_id")?;
            let properties = json_arg(args, "properties")?;
            let archived = optional_bool(args, "archived");
            let row = client
                .update_database_row(&row_id, properties, archived)
                .await
                .map_err(tool_error)?;
            to_envelope(&row)
        }
        "notion_update_database_schema" => {
            let database_id = require_str(args, "database_id")?;
            let update = DatabaseSchemaUpdate {
                title: optional_str(args, "title"),
                description: optional_str(args, "description"),
                properties: json_arg(args, "properties")?,
            };
            let database = client
                .update_database_schema(&database_id, &update)
                .await
                .map_err(tool_error)?;
            to_envelope(&database)
        }
        "notion_get_database_property" => {
            let database_id = require_str(args, "database_id")?;
            let property_id = require_str(args, "property_id")?;
            let result = client
                .get_database_property(&database_id, &property_id)
                .await
                .map_err(tool_error)?;
            Ok(object_envelope(result))
        }
        "notion_create_comment" => {
            let rich_text = require_str(args, "rich_text")?;
            let discussion_id = optional_str(args, "discussion_id");
            let parent_id = match (&discussion_id, optional_str(args, "parent_id")) {
                (_, Some(parent_id)) => parent_id,
                (Some(_), None) => String::new(),
                (None, None) => return Err(missing_argument("parent_id")),
            };
            let comment = client
                .create_comment(&parent_id, &rich_text, discussion_id.as_deref())
                .await
                .map_err(tool_error)?;
            to_envelope(&comment)
        }
        "notion_get_comments" => {
            let block_id = require_str(args, "block_id")?;
            let comments = client.get_comments(&block_id).await.map_err(tool_error)?;
            Ok(json!({ "comments": to_envelope(&comments)? }))
        }
        "notion_get_comment" => {
            let comment_id = require_str(args, "comment_id")?;
            to_envelope(&client.get_comment(&comment_id).await.map_err(tool_error)?)
        }
        _ => Err(ToolError::new(
            "unknown_tool",
            format!("No tool named '{name}'"),
        )),
    }
}

async fn dispatch_zoom(
    client: &ZoomClient,
    name: &str,
    args: &Map<String, Value>,
) -> Result<Value, ToolError> {
    match name {
        "zoom_list_meetings" => {
            let meeting_type =
                optional_str(args, "meeting_type").unwrap_or_else(|| "upcoming".to_string());
            let meetings = client.list_meetings(&meeting_type).await.map_err(tool_error)?;
            Ok(json!({ "meetings": to_envelope(&meetings)? }))
        }
        "zoom_create_meeting" => {
            let topic = require_str(args, "topic")?;
            let start_time = require_str(args, "start_time")?;
            let mut input = MeetingCreate::new(topic, start_time);
            if let Some(duration) = optional_i64(args, "duration")? {
                input.duration = duration;
            }
            if let Some(timezone) = optional_str(args, "timezone") {
                input.timezone = timezone;
            }
            input.agenda = optional_str(args, "agenda");
            if let Some(waiting_room) = optional_bool(args, "waiting_room") {
                input.waiting_room = waiting_room;
            }
            if let Some(auto_recording) = optional_str(args, "auto_recording") {
                input.auto_recording = auto_recording;
            }
            to_envelope(&client.create_meeting(&input).await.map_err(tool_error)?)
        }
        "zoom_get_meeting" => {
            let meeting_id = require_i64(args, "meeting_id")?;
            to_envelope(&client.get_meeting(meeting_id).await.map_err(tool_error)?)
        }
        "zoom_update_meeting" => {
            let meeting_id = require_i64(args, "meeting_id")?;
            let update = MeetingUpdate {
                topic: optional_str(args, "topic"),
                start_time: optional_str(args, "start_time"),
                duration: optional_i64(args, "duration")?,
                agenda: optional_str(args, "agenda"),
            };
            client
                .update_meeting(meeting_id, &update)
                .await
                .map_err(tool_error)?;
            Ok(json!({ "status": "updated", "meeting_id": meeting_id }))
        }
        "zoom_delete_meeting" => {
            let meeting_id = require_i64(args, "meeting_id")?;
            client.delete_meeting(meeting_id).await.map_err(tool_error)?;
            Ok(json!({ "status": "deleted", "meeting_id": meeting_id }))
        }
        "zoom_add_registrant" => {
            let meeting_id = require_i64(args, "meeting_id")?;
            let email = require_str(args, "email")?;
            let first_name = require_str(args, "first_name")?;
            let last_name = optional_str(args, "last_name").unwrap_or_default();
            let registrant = client
                .add_registrant(meeting_id, &email, &first_name, &last_name)
                .await
                .map_err(tool_error)?;
            to_envelope(&registrant)
        }
        "zoom_list_recordings" => {
            let from_date = require_str(args, "from_date")?;
            let to_date = optional_str(args, "to_date");
            let recordings = client
                .list_recordings(&from_date, to_date.as_deref())
                .await
                .map_err(tool_error)?;
            Ok(json!({ "recordings": to_envelope(&recordings)? }))
        }
        "zoom_get_recording" => {
            let meeting_id = require_i64(args, "meeting_id")?;
            to_envelope(&client.get_recording(meeting_id).await.map_err(tool_error)?)
        }
        "zoom_get_participants" => {
            let meeting_id = require_i64(args, "meeting_id")?;
            let participants = client
                .get_participants(meeting_id)
                .await
                .map_err(tool_error)?;
            Ok(json!({ "participants": to_envelope(&participants)? }))
        }
        "zoom_get_meeting_summary" => {
            let meeting_id = require_i64(args, "meeting_id")?;
            to_envelope(&client.get_meeting_summary(meeting_id).await.map_err(tool_error)?)
        }
        _ => Err(ToolError::new(
            "unknown_tool",
            format!("No tool named '{name}'"),
        )),
    }
}

fn build_tool_call_response(envelope: Value, is_error: bool) -> Value {
    // The full envelope is inlined as text: many agents only read the text
    // content block, never structuredContent.
    let text = to_pretty_json(&envelope);

    if is_error {
        json!({
            "isError": true,
            "content": [{ "type": "text", "text": text }],
            "structuredContent": envelope
        })
    } else {
        json!({
            "content": [{ "type": "text", "text": text }],
            "structuredContent": envelope
        })
    }
}

#[derive(Debug)]
struct RpcError {
    code: i64,
    message: String,
    data: Option<Value>,
}

impl RpcError {
    fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            code: -32600,
            message: message.into(),
            data: None,
        }
    }

    fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: format!("Method not found: {method}"),
            data: None,
        }
    }

    fn invalid_params(message: impl Into<String>) -> Self {
        Self {
            code: -32602,
            message: message.into(),
            data: None,
        }
    }
}

/// Structured failure for one tool call. Serialized into the error
/// envelope so agents can match on `error` and fix `field`.
#[derive(Debug, Clone)]
struct ToolError {
    code: String,
    message: String,
    field: Option<String>,
    docs_hint: Option<String>,
    details: Option<Value>,
}

impl ToolError {
    fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            field: None,
            docs_hint: None,
            details: None,
        }
    }

    fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    fn with_docs_hint(mut self, docs_hint: impl Into<String>) -> Self {
        self.docs_hint = Some(docs_hint.into());
        self
    }

    fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    fn to_value(&self) -> Value {
        let mut payload = json!({
            "error": self.code,
            "message": self.message
        });
        if let Some(field) = &self.field {
            payload["field"] = Value::String(field.clone());
        }
        if let Some(docs_hint) = &self.docs_hint {
            payload["docs_hint"] = Value::String(docs_hint.clone());
        }
        if let Some(details) = &self.details {
            payload["details"] = details.clone();
        }
        payload
    }
}

fn tool_error(err: Error) -> ToolError {
    match err {
        Error::Http { status, body } => {
            ToolError::new("api_error", format!("Composio API returned HTTP {status}"))
                .with_details(json!({ "status": status, "body": body }))
        }
        Error::Transport(message) => ToolError::new("transport_error", message),
        Error::UnresolvableIdentifier { id } => ToolError::new(
            "unresolvable_identifier",
            format!("connected account '{id}' has no legacy execution id"),
        )
        .with_field("connected_account_id")
        .with_docs_hint(
            "Pass the account's legacy UUID directly, or reconnect the account so the deprecated id is populated.",
        ),
        Error::MalformedInput(message) => ToolError::new("invalid_argument", message),
        Error::MissingField { entity, field } => ToolError::new(
            "malformed_response",
            format!("{entity} response is missing required field '{field}'"),
        ),
        Error::MissingCredential { name } => {
            ToolError::new("missing_credential", format!("missing credential {name}"))
                .with_field(name)
                .with_docs_hint(
                    "Set the environment variable, or store the value in the credentials file under the user config directory.",
                )
        }
    }
}

fn to_envelope<T: serde::Serialize>(value: &T) -> Result<Value, ToolError> {
    serde_json::to_value(value)
        .map_err(|e| ToolError::new("serialization_error", e.to_string()))
}

fn object_envelope(result: Value) -> Value {
    if result.is_object() {
        result
    } else {
        json!({ "result": result })
    }
}

fn deletion_envelope(id: &str, result: Value) -> Value {
    let mut payload = Map::new();
    payload.insert("status".to_string(), json!("deleted"));
    payload.insert("id".to_string(), json!(id));
    if let Value::Object(extra) = result {
        for (key, value) in extra {
            payload.entry(key).or_insert(value);
        }
    }
    Value::Object(payload)
}

fn missing_argument(key: &str) -> ToolError {
    ToolError::new(
        "missing_argument",
        format!("required argument '{key}' was not provided"),
    )
    .with_field(key)
}

fn invalid_argument(key: &str, expected: &str) -> ToolError {
    ToolError::new("invalid_argument", format!("'{key}' must be {expected}")).with_field(key)
}

fn optional_str(args: &Map<String, Value>, key: &str) -> Option<String> {
    args.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(str::to_string)
}

fn require_str(args: &Map<String, Value>, key: &str) -> Result<String, ToolError> {
    optional_str(args, key).ok_or_else(|| missing_argument(key))
}

/// Integer argument, tolerating numeric strings. Zoom meeting ids exceed
/// 2^53 in the wild, so some clients send them as strings.
fn require_i64(args: &Map<String, Value>, key: &str) -> Result<i64, ToolError> {
    match args.get(key) {
        Some(Value::Number(number)) => number
            .as_i64()
            .ok_or_else(|| invalid_argument(key, "an integer")),
        Some(Value::String(raw)) => raw
            .trim()
            .parse()
            .map_err(|_| invalid_argument(key, "an integer")),
        Some(_) => Err(invalid_argument(key, "an integer")),
        None => Err(missing_argument(key)),
    }
}

fn optional_i64(args: &Map<String, Value>, key: &str) -> Result<Option<i64>, ToolError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        _ => require_i64(args, key).map(Some),
    }
}

fn optional_u32(args: &Map<String, Value>, key: &str) -> Result<Option<u32>, ToolError> {
    match optional_i64(args, key)? {
        Some(value) => u32::try_from(value)
            .map(Some)
            .map_err(|_| invalid_argument(key, "a non-negative 32-bit integer")),
        None => Ok(None),
    }
}

fn optional_bool(args: &Map<String, Value>, key: &str) -> Option<bool> {
    args.get(key).and_then(Value::as_bool)
}

/// Structured argument that may arrive either as a JSON value or as a
/// JSON-encoded string (some MCP clients stringify nested parameters).
fn json_arg(args: &Map<String, Value>, key: &str) -> Result<Option<Value>, ToolError> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(raw)) => {
            if raw.trim().is_empty() {
                return Ok(None);
            }
            serde_json::from_str(raw)
                .map(Some)
                .map_err(|e| invalid_argument(key, &format!("valid JSON: {e}")))
        }
        Some(value) => Ok(Some(value.clone())),
    }
}

fn array_arg(args: &Map<String, Value>, key: &str) -> Result<Vec<Value>, ToolError> {
    match json_arg(args, key)? {
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(invalid_argument(key, "a JSON array")),
        None => Err(missing_argument(key)),
    }
}

/// Parse the `updates` argument of `notion_update_block`: an array of
/// `{"type": kind, "value": payload}` entries.
fn block_updates(args: &Map<String, Value>) -> Result<Vec<BlockUpdate>, ToolError> {
    let items = array_arg(args, "updates")?;
    if items.is_empty() {
        return Err(invalid_argument("updates", "a non-empty array"));
    }
    items
        .iter()
        .map(|item| {
            let kind = item
                .get("type")
                .and_then(Value::as_str)
                .ok_or_else(|| invalid_argument("updates", "entries with a string 'type'"))?;
            let payload = item.get("value").cloned().unwrap_or(Value::Null);
            BlockUpdate::from_parts(kind, payload).map_err(tool_error)
        })
        .collect()
}

fn success_response(id: Value, result: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result
    })
}

fn error_response(id: Value, error: RpcError) -> Value {
    let mut payload = json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {
            "code": error.code,
            "message": error.message
        }
    });
    if let Some(data) = error.data {
        payload["error"]["data"] = data;
    }
    payload
}

async fn read_framed_json<R>(reader: &mut R) -> Result<Option<Value>, std::io::Error>
where
    R: AsyncBufRead + Unpin,
{
    let mut content_length: Option<usize> = None;

    loop {
        let mut line = String::new();
        let bytes_read = reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            if content_length.is_none() {
                return Ok(None);
            }
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "Unexpected EOF while reading MCP headers",
            ));
        }

        if line == "\r\n" {
            break;
        }

        let line = line.trim_end_matches(['\r', '\n']);
        if line.to_ascii_lowercase().starts_with("content-length:") {
            let raw_len = line
                .split_once(':')
                .map(|(_, right)| right.trim())
                .unwrap_or_default();
            let parsed = raw_len.parse::<usize>().map_err(|_| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "Invalid Content-Length header",
                )
            })?;
            content_length = Some(parsed);
        }
    }

    let content_length = content_length.ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "Missing Content-Length header",
        )
    })?;
    let mut payload = vec![0_u8; content_length];
    reader.read_exact(&mut payload).await?;

    let json: Value = serde_json::from_slice(&payload).map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Invalid JSON payload: {e}"),
        )
    })?;
    Ok(Some(json))
}

async fn write_framed_json<W>(writer: &mut W, value: &Value) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    let body = serde_json::to_vec(value).map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Failed to serialize JSON: {e}"),
        )
    })?;
    let header = format!(
        "Content-Length: {}\r\nContent-Type: application/json\r\n\r\n",
        body.len()
    );
    writer.write_all(header.as_bytes()).await?;
    writer.write_all(&body).await?;
    writer.flush().await?;
    Ok(())
}

fn to_pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tool_definitions_are_unique_and_prefixed() {
        let definitions = tool_definitions();
        let mut names: Vec<&str> = definitions.iter().map(|tool| tool.name).collect();
        names.sort_unstable();
        let before = names.len();
        names.dedup();
        assert_eq!(before, names.len(), "duplicate tool name");
        for name in names {
            assert!(
                name.starts_with("composio_")
                    || name.starts_with("notion_")
                    || name.starts_with("zoom_"),
                "unroutable tool name: {name}"
            );
        }
    }

    #[test]
    fn tool_definitions_cover_all_three_surfaces() {
        let definitions = tool_definitions();
        let count = |prefix: &str| {
            definitions
                .iter()
                .filter(|tool| tool.name.starts_with(prefix))
                .count()
        };
        assert_eq!(count("composio_"), 13);
        assert_eq!(count("notion_"), 28);
        assert_eq!(count("zoom_"), 10);
    }

    #[test]
    fn tool_schemas_are_objects() {
        for tool in tool_definitions() {
            assert_eq!(
                tool.input_schema.get("type").and_then(Value::as_str),
                Some("object"),
                "{} schema is not an object",
                tool.name
            );
            assert!(!tool.description.is_empty());
        }
    }

    #[tokio::test]
    async fn initialize_reports_protocol_and_server_info() {
        let mut server = McpServer::new(None);
        let payload = server.handle_request("initialize", Value::Null).await.unwrap();
        assert_eq!(payload["protocolVersion"], json!(MCP_PROTOCOL_VERSION));
        assert_eq!(payload["serverInfo"]["name"], json!(MCP_SERVER_NAME));
        assert_eq!(payload["capabilities"]["tools"]["listChanged"], json!(false));
    }

    #[tokio::test]
    async fn tools_list_entries_carry_name_description_schema() {
        let mut server = McpServer::new(None);
        let payload = server.handle_request("tools/list", Value::Null).await.unwrap();
        let tools = payload["tools"].as_array().unwrap();
        assert_eq!(tools.len(), tool_definitions().len());
        for tool in tools {
            assert!(tool["name"].is_string());
            assert!(tool["description"].is_string());
            assert!(tool["inputSchema"].is_object());
        }
    }

    #[tokio::test]
    async fn unknown_method_is_method_not_found() {
        let mut server = McpServer::new(None);
        let err = server
            .handle_request("resources/list", Value::Null)
            .await
            .unwrap_err();
        assert_eq!(err.code, -32601);
    }

    #[tokio::test]
    async fn unknown_tool_is_invalid_params() {
        let mut server = McpServer::new(None);
        let err = server
            .handle_request("tools/call", json!({"name": "composio_launch_rockets"}))
            .await
            .unwrap_err();
        assert_eq!(err.code, -32602);
    }

    #[tokio::test]
    async fn wrong_jsonrpc_version_is_rejected() {
        let mut server = McpServer::new(None);
        let response = server
            .handle_single_message(json!({"jsonrpc": "1.0", "id": 1, "method": "ping"}))
            .await
            .unwrap();
        assert_eq!(response["error"]["code"], json!(-32600));
        assert_eq!(response["id"], json!(1));
    }

    #[tokio::test]
    async fn message_without_method_is_treated_as_client_response() {
        let mut server = McpServer::new(None);
        let response = server
            .handle_single_message(json!({"jsonrpc": "2.0", "id": 7, "result": {}}))
            .await;
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn empty_batch_is_invalid_request() {
        let mut server = McpServer::new(None);
        let responses = server.handle_incoming_message(json!([])).await;
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0]["error"]["code"], json!(-32600));
    }

    #[tokio::test]
    async fn batch_dispatches_each_request() {
        let mut server = McpServer::new(None);
        let responses = server
            .handle_incoming_message(json!([
                {"jsonrpc": "2.0", "id": 1, "method": "ping"},
                {"jsonrpc": "2.0", "id": 2, "method": "ping"}
            ]))
            .await;
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["id"], json!(1));
        assert_eq!(responses[1]["id"], json!(2));
    }

    #[tokio::test]
    async fn notification_produces_no_response() {
        let mut server = McpServer::new(None);
        let response = server
            .handle_single_message(
                json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
            )
            .await;
        assert!(response.is_none());
    }

    #[test]
    fn require_i64_accepts_numeric_strings() {
        let mut args = Map::new();
        args.insert("meeting_id".to_string(), json!("85746065112"));
        assert_eq!(require_i64(&args, "meeting_id").unwrap(), 85746065112);
        args.insert("meeting_id".to_string(), json!(42));
        assert_eq!(require_i64(&args, "meeting_id").unwrap(), 42);
        args.insert("meeting_id".to_string(), json!("not-a-number"));
        assert!(require_i64(&args, "meeting_id").is_err());
    }

    #[test]
    fn json_arg_accepts_both_values_and_encoded_strings() {
        let mut args = Map::new();
        args.insert("filter".to_string(), json!({"property": "Status"}));
        assert_eq!(
            json_arg(&args, "filter").unwrap(),
            Some(json!({"property": "Status"}))
        );
        args.insert("filter".to_string(), json!("{\"property\": \"Status\"}"));
        assert_eq!(
            json_arg(&args, "filter").unwrap(),
            Some(json!({"property": "Status"}))
        );
        args.insert("filter".to_string(), json!("{broken"));
        assert!(json_arg(&args, "filter").is_err());
        assert_eq!(json_arg(&args, "absent").unwrap(), None);
    }

    #[test]
    fn block_updates_require_typed_entries() {
        let mut args = Map::new();
        args.insert(
            "updates".to_string(),
            json!([{"type": "archived", "value": true}]),
        );
        let updates = block_updates(&args).unwrap();
        assert_eq!(updates, vec![BlockUpdate::Archived(true)]);

        args.insert("updates".to_string(), json!([{"value": true}]));
        assert!(block_updates(&args).is_err());

        args.insert(
            "updates".to_string(),
            json!([{"type": "hologram", "value": {}}]),
        );
        assert!(block_updates(&args).is_err());
    }

    #[test]
    fn deletion_envelope_merges_backend_fields_without_clobbering() {
        let payload = deletion_envelope("ac_1", json!({"deleted": true, "status": "gone"}));
        assert_eq!(payload["status"], json!("deleted"));
        assert_eq!(payload["id"], json!("ac_1"));
        assert_eq!(payload["deleted"], json!(true));
    }

    #[test]
    fn tool_error_envelope_carries_field_and_hint() {
        let err = tool_error(Error::UnresolvableIdentifier {
            id: "ca_9".to_string(),
        });
        let payload = err.to_value();
        assert_eq!(payload["error"], json!("unresolvable_identifier"));
        assert_eq!(payload["field"], json!("connected_account_id"));
        assert!(payload["docs_hint"].is_string());
    }

    #[tokio::test]
    async fn framed_messages_round_trip() {
        let message = json!({"jsonrpc": "2.0", "id": 1, "method": "ping"});
        let mut buffer: Vec<u8> = Vec::new();
        write_framed_json(&mut buffer, &message).await.unwrap();

        let framed = String::from_utf8(buffer.clone()).unwrap();
        assert!(framed.starts_with("Content-Length: "));
        assert!(framed.contains("\r\n\r\n"));

        let mut reader = BufReader::new(buffer.as_slice());
        let decoded = read_framed_json(&mut reader).await.unwrap();
        assert_eq!(decoded, Some(message));
        // Stream exhausted: a clean EOF reads as end-of-session.
        assert_eq!(read_framed_json(&mut reader).await.unwrap(), None);
    }

    #[tokio::test]
    async fn framed_read_requires_content_length() {
        let raw: &[u8] = b"Content-Type: application/json\r\n\r\n{}";
        let mut reader = BufReader::new(raw);
        let err = read_framed_json(&mut reader).await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }

    #[tokio::test]
    async fn framed_read_rejects_unparsable_content_length() {
        let raw: &[u8] = b"Content-Length: twelve\r\n\r\n{}";
        let mut reader = BufReader::new(raw);
        let err = read_framed_json(&mut reader).await.unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
    }

    #[tokio::test]
    async fn framed_read_reports_truncated_body() {
        let raw: &[u8] = b"Content-Length: 99\r\n\r\n{}";
        let mut reader = BufReader::new(raw);
        assert!(read_framed_json(&mut reader).await.is_err());
    }

    #[test]
    fn tool_context_caches_the_management_client() {
        let mut context = ToolContext::new(Some("test-key".to_string()));
        assert!(context.manage().is_ok());
        // Second call must reuse the stored client, not rebuild it.
        assert!(context.manage().is_ok());
    }

    #[test]
    fn error_tool_call_response_sets_is_error_flag() {
        let envelope = json!({"error": "api_error", "message": "HTTP 500"});
        let response = build_tool_call_response(envelope.clone(), true);
        assert_eq!(response["isError"], json!(true));
        assert_eq!(response["structuredContent"], envelope);
        let text = response["content"][0]["text"].as_str().unwrap();
        assert!(text.contains("api_error"));

        let ok = build_tool_call_response(json!({"users": []}), false);
        assert!(ok.get("isError").is_none());
    }
}
