//! Tool surface: names, descriptions, and JSON schemas for every tool the
//! server advertises. Dispatch lives in `lib.rs` and must stay in sync with
//! the names here.

use serde_json::{Value, json};

#[derive(Debug)]
pub(crate) struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

pub(crate) fn tool_definitions() -> Vec<ToolDefinition> {
    let mut tools = manage_tool_definitions();
    tools.extend(notion_tool_definitions());
    tools.extend(zoom_tool_definitions());
    tools
}

fn manage_tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "composio_list_toolkits",
            description: "List Composio toolkits (integratable apps), optionally filtered by a search term.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "search": { "type": "string", "description": "Filter toolkits by name" }
                },
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "composio_get_toolkit_tools",
            description: "List the actions a toolkit exposes (e.g. everything under the 'notion' toolkit).",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "toolkit_slug": { "type": "string", "description": "Toolkit slug like 'notion' or 'zoom'" }
                },
                "required": ["toolkit_slug"],
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "composio_list_auth_configs",
            description: "List auth configs, optionally restricted to one toolkit.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "toolkit_slug": { "type": "string" }
                },
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "composio_get_auth_config",
            description: "Get one auth config, including its expected input fields.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "auth_config_id": { "type": "string" }
                },
                "required": ["auth_config_id"],
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "composio_create_auth_config",
            description: "Create an auth config for a toolkit. Defaults to Composio-managed OAUTH2; pass use_composio_auth=false with credentials for a custom OAuth app.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "toolkit_slug": { "type": "string" },
                    "auth_scheme": { "type": "string", "enum": ["OAUTH2", "API_KEY", "BEARER_TOKEN", "BASIC"], "default": "OAUTH2" },
                    "name": { "type": "string", "description": "Display name" },
                    "use_composio_auth": { "type": "boolean", "default": true },
                    "credentials": {
                        "description": "Custom OAuth credentials (client_id, client_secret) as an object or JSON string.",
                        "oneOf": [{ "type": "object" }, { "type": "string" }]
                    },
                    "scopes": { "type": "string", "description": "Comma-separated OAuth scopes" }
                },
                "required": ["toolkit_slug"],
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "composio_delete_auth_config",
            description: "Delete an auth config.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "auth_config_id": { "type": "string" }
                },
                "required": ["auth_config_id"],
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "composio_list_connections",
            description: "List connected accounts, optionally filtered by toolkit, status, or user.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "toolkit_slug": { "type": "string" },
                    "status": { "type": "string", "enum": ["ACTIVE", "INACTIVE", "PENDING", "EXPIRED", "FAILED"] },
                    "user_id": { "type": "string" }
                },
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "composio_get_connection",
            description: "Get one connected account, including its legacy execution UUID when present.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "connection_id": { "type": "string" }
                },
                "required": ["connection_id"],
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "composio_initiate_connection",
            description: "Start an auth flow for a user against an auth config. OAuth toolkits return a redirect_url the user must open; poll composio_get_connection for completion.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "auth_config_id": { "type": "string" },
                    "user_id": { "type": "string", "default": "default" },
                    "callback_url": { "type": "string" },
                    "config": {
                        "description": "Extra connection fields (subdomain, scheme overrides) as an object or JSON string.",
                        "oneOf": [{ "type": "object" }, { "type": "string" }]
                    }
                },
                "required": ["auth_config_id"],
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "composio_initiate_connection_link",
            description: "Create a Composio-hosted auth link to share with a user instead of a raw OAuth redirect.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "auth_config_id": { "type": "string" },
                    "user_id": { "type": "string", "default": "default" },
                    "callback_url": { "type": "string" }
                },
                "required": ["auth_config_id"],
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "composio_delete_connection",
            description: "Delete a connected account.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "connection_id": { "type": "string" }
                },
                "required": ["connection_id"],
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "composio_refresh_connection",
            description: "Refresh authentication for a connected account.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "connection_id": { "type": "string" }
                },
                "required": ["connection_id"],
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "composio_execute_action",
            description: "Execute a raw Composio action against a connected account. Accepts both ca_* ids and legacy UUIDs.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "action": { "type": "string", "description": "Action name like NOTION_GET_ABOUT_ME" },
                    "connected_account_id": { "type": "string" },
                    "params": {
                        "description": "Action input as an object or JSON string.",
                        "oneOf": [{ "type": "object" }, { "type": "string" }]
                    }
                },
                "required": ["action", "connected_account_id"],
                "additionalProperties": false
            }),
        },
    ]
}

fn notion_tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "notion_get_current_user",
            description: "Get the bot user behind the connected Notion integration.",
            input_schema: json!({
                "type": "object",
                "properties": {},
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "notion_get_user",
            description: "Get a Notion user by id.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "user_id": { "type": "string" }
                },
                "required": ["user_id"],
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "notion_list_users",
            description: "List the users in the connected Notion workspace.",
            input_schema: json!({
                "type": "object",
                "properties": {},
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "notion_search_workspace",
            description: "Search the whole workspace for pages and databases. Omit filter_type to get both.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string" },
                    "filter_type": { "type": "string", "enum": ["page", "database"] },
                    "page_size": { "type": "integer", "default": 20 }
                },
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "notion_search_pages",
            description: "Search pages by title. An empty query lists everything the integration can see.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": { "type": "string" }
                },
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "notion_get_page",
            description: "Get a page with its title, parent, icon, cover, and property bag flattened.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "page_id": { "type": "string" }
                },
                "required": ["page_id"],
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "notion_create_page",
            description: "Create a page under a parent page or database.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "parent_id": { "type": "string" },
                    "title": { "type": "string" },
                    "parent_type": { "type": "string", "enum": ["page_id", "database_id"], "default": "page_id" },
                    "icon": { "type": "string", "description": "Emoji icon" },
                    "cover": { "type": "string", "description": "External cover image URL" }
                },
                "required": ["parent_id", "title"],
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "notion_update_page",
            description: "Update a page's title, icon, cover, archived flag, or properties. Omitted fields are left untouched.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "page_id": { "type": "string" },
                    "title": { "type": "string" },
                    "icon": { "type": "string" },
                    "cover": { "type": "string" },
                    "archived": { "type": "boolean" },
                    "properties": {
                        "description": "Property values keyed by property name, as an object or JSON string.",
                        "oneOf": [{ "type": "object" }, { "type": "string" }]
                    }
                },
                "required": ["page_id"],
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "notion_archive_page",
            description: "Archive a page (move to trash), or restore it with archived=false.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "page_id": { "type": "string" },
                    "archived": { "type": "boolean", "default": true }
                },
                "required": ["page_id"],
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "notion_duplicate_page",
            description: "Duplicate a page under the same parent.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "page_id": { "type": "string" }
                },
                "required": ["page_id"],
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "notion_get_page_property",
            description: "Get one property item of a page by property id.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "page_id": { "type": "string" },
                    "property_id": { "type": "string" }
                },
                "required": ["page_id", "property_id"],
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "notion_add_content_blocks",
            description: "Append content blocks to a page in the simplified form: an array of {type, text} entries like {\"type\": \"paragraph\", \"text\": \"...\"}.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "page_id": { "type": "string" },
                    "blocks": {
                        "description": "Array of simplified block entries, or a JSON string encoding one.",
                        "oneOf": [{ "type": "array", "items": { "type": "object" } }, { "type": "string" }]
                    }
                },
                "required": ["page_id", "blocks"],
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "notion_append_blocks",
            description: "Append children to a block using full Notion block structures.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "block_id": { "type": "string" },
                    "children": {
                        "description": "Array of Notion block objects, or a JSON string encoding one.",
                        "oneOf": [{ "type": "array", "items": { "type": "object" } }, { "type": "string" }]
                    }
                },
                "required": ["block_id", "children"],
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "notion_get_block",
            description: "Get a block's metadata, including its type-specific content payload.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "block_id": { "type": "string" }
                },
                "required": ["block_id"],
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "notion_get_block_children",
            description: "List the direct children of a block or page.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "block_id": { "type": "string" },
                    "start_cursor": { "type": "string" },
                    "page_size": { "type": "integer", "default": 100 }
                },
                "required": ["block_id"],
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "notion_update_block",
            description: "Update a block. Each update entry is {type, value} where type is a block kind like 'paragraph' or the literal 'archived' with a boolean value.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "block_id": { "type": "string" },
                    "updates": {
                        "description": "Array of {type, value} entries, or a JSON string encoding one.",
                        "oneOf": [
                            {
                                "type": "array",
                                "items": {
                                    "type": "object",
                                    "properties": {
                                        "type": { "type": "string" },
                                        "value": {}
                                    },
                                    "required": ["type"],
                                    "additionalProperties": false
                                }
                            },
                            { "type": "string" }
                        ]
                    }
                },
                "required": ["block_id", "updates"],
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "notion_delete_block",
            description: "Delete (archive) a block.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "block_id": { "type": "string" }
                },
                "required": ["block_id"],
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "notion_create_database",
            description: "Create a database under a parent page with a property schema.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "parent_id": { "type": "string" },
                    "title": { "type": "string" },
                    "properties": {
                        "description": "Property schema keyed by property name, as an object or JSON string.",
                        "oneOf": [{ "type": "object" }, { "type": "string" }]
                    }
                },
                "required": ["parent_id", "title", "properties"],
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "notion_get_database",
            description: "Get a database with its title, description, and property schema.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "database_id": { "type": "string" }
                },
                "required": ["database_id"],
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "notion_query_database",
            description: "Query database rows with optional filter, sorts, and cursor pagination.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "database_id": { "type": "string" },
                    "filter": {
                        "description": "Notion filter object, or a JSON string encoding one.",
                        "oneOf": [{ "type": "object" }, { "type": "string" }]
                    },
                    "sorts": {
                        "description": "Notion sorts array, or a JSON string encoding one.",
                        "oneOf": [{ "type": "array" }, { "type": "string" }]
                    },
                    "page_size": { "type": "integer", "default": 100 },
                    "start_cursor": { "type": "string" }
                },
                "required": ["database_id"],
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "notion_create_database_row",
            description: "Insert a row into a database.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "database_id": { "type": "string" },
                    "properties": {
                        "description": "Property values keyed by property name, as an object or JSON string.",
                        "oneOf": [{ "type": "object" }, { "type": "string" }]
                    }
                },
                "required": ["database_id", "properties"],
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "notion_get_database_row",
            description: "Get one database row by id.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "row_id": { "type": "string" }
                },
                "required": ["row_id"],
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "notion_update_database_row",
            description: "Update a database row's property values or archived flag.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "row_id": { "type": "string" },
                    "properties": {
                        "description": "Property values keyed by property name, as an object or JSON string.",
                        "oneOf": [{ "type": "object" }, { "type": "string" }]
                    },
                    "archived": { "type": "boolean" }
                },
                "required": ["row_id"],
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "notion_update_database_schema",
            description: "Update a database's title, description, or property schema.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "database_id": { "type": "string" },
                    "title": { "type": "string" },
                    "description": { "type": "string" },
                    "properties": {
                        "description": "Property schema changes keyed by property name, as an object or JSON string.",
                        "oneOf": [{ "type": "object" }, { "type": "string" }]
                    }
                },
                "required": ["database_id"],
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "notion_get_database_property",
            description: "Get one property definition of a database.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "database_id": { "type": "string" },
                    "property_id": { "type": "string" }
                },
                "required": ["database_id", "property_id"],
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "notion_create_comment",
            description: "Comment on a page, or reply within a discussion thread when discussion_id is given.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "parent_id": { "type": "string", "description": "Page to comment on; required unless discussion_id is given" },
                    "rich_text": { "type": "string", "description": "Comment text" },
                    "discussion_id": { "type": "string" }
                },
                "required": ["rich_text"],
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "notion_get_comments",
            description: "List comments on a page or block.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "block_id": { "type": "string" }
                },
                "required": ["block_id"],
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "notion_get_comment",
            description: "Get one comment by id.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "comment_id": { "type": "string" }
                },
                "required": ["comment_id"],
                "additionalProperties": false
            }),
        },
    ]
}

fn zoom_tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "zoom_list_meetings",
            description: "List the connected user's meetings by type: upcoming, scheduled, live, or pending.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "meeting_type": { "type": "string", "enum": ["upcoming", "scheduled", "live", "pending"], "default": "upcoming" }
                },
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "zoom_create_meeting",
            description: "Create a scheduled meeting. start_time is ISO-8601 local time interpreted in the given timezone.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "topic": { "type": "string" },
                    "start_time": { "type": "string", "description": "e.g. 2026-02-15T10:00:00" },
                    "duration": { "type": "integer", "default": 45, "description": "Minutes" },
                    "timezone": { "type": "string", "default": "America/New_York" },
                    "agenda": { "type": "string" },
                    "waiting_room": { "type": "boolean", "default": true },
                    "auto_recording": { "type": "string", "enum": ["cloud", "local", "none"], "default": "cloud" }
                },
                "required": ["topic", "start_time"],
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "zoom_get_meeting",
            description: "Get a meeting's details.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "meeting_id": { "type": ["integer", "string"] }
                },
                "required": ["meeting_id"],
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "zoom_update_meeting",
            description: "Update a meeting's topic, start time, duration, or agenda. Omitted fields are left untouched.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "meeting_id": { "type": ["integer", "string"] },
                    "topic": { "type": "string" },
                    "start_time": { "type": "string" },
                    "duration": { "type": "integer" },
                    "agenda": { "type": "string" }
                },
                "required": ["meeting_id"],
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "zoom_delete_meeting",
            description: "Delete a meeting.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "meeting_id": { "type": ["integer", "string"] }
                },
                "required": ["meeting_id"],
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "zoom_add_registrant",
            description: "Register someone for a meeting that has registration enabled.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "meeting_id": { "type": ["integer", "string"] },
                    "email": { "type": "string" },
                    "first_name": { "type": "string" },
                    "last_name": { "type": "string" }
                },
                "required": ["meeting_id", "email", "first_name"],
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "zoom_list_recordings",
            description: "List cloud recordings in a date range. Listings carry no files; call zoom_get_recording per meeting for download URLs.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "from_date": { "type": "string", "description": "YYYY-MM-DD" },
                    "to_date": { "type": "string", "description": "YYYY-MM-DD" }
                },
                "required": ["from_date"],
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "zoom_get_recording",
            description: "Get a meeting's cloud recording, including its files and download URLs.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "meeting_id": { "type": ["integer", "string"] }
                },
                "required": ["meeting_id"],
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "zoom_get_participants",
            description: "List the participants of a past meeting.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "meeting_id": { "type": ["integer", "string"] }
                },
                "required": ["meeting_id"],
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "zoom_get_meeting_summary",
            description: "Get the AI-generated summary of a past meeting: overview, next steps, and topics.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "meeting_id": { "type": ["integer", "string"] }
                },
                "required": ["meeting_id"],
                "additionalProperties": false
            }),
        },
    ]
}
