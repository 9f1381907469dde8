//! Management-plane records: toolkits, auth configs, connected accounts.
//!
//! The v3 API returns these resources with nested objects (`toolkit.slug`,
//! `auth_config.id`, `deprecated.uuid`) while older records and the v2 API
//! use flat legacy keys (`toolkit_slug`, `app_name`, `entity_id`). Each
//! normalizer applies a fixed precedence chain per attribute: new-scheme key
//! first, then legacy names, then a default. All normalizers are total —
//! missing optional fields never fail a parse.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::extract::{nested_str, str_at, string_list};

/// A Composio toolkit (app integration). Identity = slug.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toolkit {
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub logo: Option<String>,
    pub auth_schemes: Vec<String>,
    pub categories: Vec<String>,
}

impl Toolkit {
    pub fn from_raw(raw: &Value) -> Self {
        Self {
            slug: str_at(raw, &["slug", "key"]).unwrap_or_default(),
            name: str_at(raw, &["name", "display_name"]).unwrap_or_default(),
            description: str_at(raw, &["description"]),
            logo: str_at(raw, &["logo"]),
            auth_schemes: string_list(raw, "auth_schemes"),
            categories: string_list(raw, "categories"),
        }
    }
}

/// A tool/action within a toolkit, as listed by the v2 actions endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolkitTool {
    pub action: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub parameters: Option<Value>,
}

impl ToolkitTool {
    pub fn from_raw(raw: &Value) -> Self {
        Self {
            action: str_at(raw, &["name", "action"]).unwrap_or_default(),
            display_name: str_at(raw, &["display_name", "displayName"]),
            description: str_at(raw, &["description"]),
            parameters: raw.get("parameters").filter(|p| !p.is_null()).cloned(),
        }
    }
}

/// An auth config: a reusable authentication blueprint for a toolkit.
/// Holds no secrets itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    pub id: String,
    pub toolkit_slug: Option<String>,
    pub auth_scheme: Option<String>,
    pub name: Option<String>,
    pub created_at: Option<String>,
    pub expected_input_fields: Vec<Value>,
}

impl AuthConfig {
    pub fn from_raw(raw: &Value) -> Self {
        Self {
            id: str_at(raw, &["id"]).unwrap_or_default(),
            toolkit_slug: str_at(raw, &["toolkit_slug", "app_name"]),
            auth_scheme: str_at(raw, &["auth_scheme"]),
            name: str_at(raw, &["name"]),
            created_at: str_at(raw, &["created_at"]),
            expected_input_fields: raw
                .get("expected_input_fields")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
        }
    }

    /// The create response nests the real record under `auth_config`, while
    /// the top level repeats the toolkit as `toolkit.slug`. The outer slug
    /// wins when present.
    pub fn from_create_response(raw: &Value) -> Self {
        let inner = raw.get("auth_config").unwrap_or(raw);
        let mut config = Self::from_raw(inner);
        if let Some(outer_slug) = nested_str(raw, &["toolkit", "slug"]) {
            config.toolkit_slug = Some(outer_slug);
        }
        config
    }
}

/// Connected-account lifecycle status. Anything the backend invents later
/// maps to `Unknown` rather than failing the parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    Active,
    Inactive,
    Pending,
    Expired,
    Failed,
    Unknown,
}

impl AccountStatus {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("ACTIVE") => AccountStatus::Active,
            Some("INACTIVE") => AccountStatus::Inactive,
            Some("PENDING") => AccountStatus::Pending,
            Some("EXPIRED") => AccountStatus::Expired,
            Some("FAILED") => AccountStatus::Failed,
            _ => AccountStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "ACTIVE",
            AccountStatus::Inactive => "INACTIVE",
            AccountStatus::Pending => "PENDING",
            AccountStatus::Expired => "EXPIRED",
            AccountStatus::Failed => "FAILED",
            AccountStatus::Unknown => "UNKNOWN",
        }
    }
}

/// An authorized instance of a toolkit's credentials for one end user.
///
/// `deprecated_uuid` is the legacy identifier co-issued by the backend for
/// the same logical account; only that form is accepted by the v2 execute
/// endpoint. Absence means the account cannot execute via that path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectedAccount {
    pub id: String,
    pub status: AccountStatus,
    pub toolkit_slug: Option<String>,
    pub auth_config_id: Option<String>,
    pub user_id: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub deprecated_uuid: Option<String>,
}

impl ConnectedAccount {
    pub fn from_raw(raw: &Value) -> Self {
        Self {
            id: str_at(raw, &["id"]).unwrap_or_default(),
            status: AccountStatus::parse(str_at(raw, &["status"]).as_deref()),
            toolkit_slug: nested_str(raw, &["toolkit", "slug"])
                .or_else(|| str_at(raw, &["toolkit_slug", "app_name"])),
            auth_config_id: nested_str(raw, &["auth_config", "id"])
                .or_else(|| str_at(raw, &["auth_config_id"])),
            user_id: str_at(raw, &["user_id", "entity_id"]),
            created_at: str_at(raw, &["created_at"]),
            updated_at: str_at(raw, &["updated_at"]),
            deprecated_uuid: nested_str(raw, &["deprecated", "uuid"]),
        }
    }
}

/// Ephemeral outcome of starting an auth flow. `redirect_url`, when present,
/// must be opened by a human; completion is observed by polling the
/// connected account by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionRequest {
    pub id: String,
    pub status: String,
    pub redirect_url: Option<String>,
}

impl ConnectionRequest {
    pub fn from_raw(raw: &Value) -> Self {
        Self {
            id: str_at(raw, &["id", "connectedAccountId", "link_token"]).unwrap_or_default(),
            status: str_at(raw, &["status"]).unwrap_or_else(|| "INITIATED".to_string()),
            redirect_url: str_at(raw, &["redirect_url", "redirectUrl"]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn toolkit_legacy_and_new_keys_normalize_identically() {
        let new_scheme = json!({
            "slug": "notion",
            "name": "Notion",
            "auth_schemes": ["OAUTH2"],
            "categories": ["productivity"]
        });
        let legacy = json!({
            "key": "notion",
            "display_name": "Notion",
            "auth_schemes": ["OAUTH2"],
            "categories": ["productivity"]
        });
        assert_eq!(Toolkit::from_raw(&new_scheme), Toolkit::from_raw(&legacy));
    }

    #[test]
    fn connected_account_legacy_and_new_keys_normalize_identically() {
        let new_scheme = json!({
            "id": "ca_1",
            "status": "ACTIVE",
            "toolkit": {"slug": "github"},
            "auth_config": {"id": "ac_1"},
            "user_id": "u1"
        });
        let legacy = json!({
            "id": "ca_1",
            "status": "ACTIVE",
            "app_name": "github",
            "auth_config_id": "ac_1",
            "entity_id": "u1"
        });
        assert_eq!(
            ConnectedAccount::from_raw(&new_scheme),
            ConnectedAccount::from_raw(&legacy)
        );
    }

    #[test]
    fn connected_account_nested_keys_win_over_flat() {
        let raw = json!({
            "id": "ca_1",
            "toolkit": {"slug": "github"},
            "toolkit_slug": "stale",
            "app_name": "staler"
        });
        let account = ConnectedAccount::from_raw(&raw);
        assert_eq!(account.toolkit_slug.as_deref(), Some("github"));
    }

    #[test]
    fn connected_account_defaults_are_total() {
        let account = ConnectedAccount::from_raw(&json!({}));
        assert_eq!(account.id, "");
        assert_eq!(account.status, AccountStatus::Unknown);
        assert_eq!(account.deprecated_uuid, None);
    }

    #[test]
    fn connected_account_reads_deprecated_uuid_only_from_object() {
        let raw = json!({"id": "ca_1", "deprecated": {"uuid": "legacy-1"}});
        assert_eq!(
            ConnectedAccount::from_raw(&raw).deprecated_uuid.as_deref(),
            Some("legacy-1")
        );
        let raw = json!({"id": "ca_1", "deprecated": "legacy-1"});
        assert_eq!(ConnectedAccount::from_raw(&raw).deprecated_uuid, None);
    }

    #[test]
    fn account_status_parses_known_values_and_defaults_unknown() {
        assert_eq!(AccountStatus::parse(Some("ACTIVE")), AccountStatus::Active);
        assert_eq!(AccountStatus::parse(Some("EXPIRED")), AccountStatus::Expired);
        assert_eq!(AccountStatus::parse(Some("weird")), AccountStatus::Unknown);
        assert_eq!(AccountStatus::parse(None), AccountStatus::Unknown);
    }

    #[test]
    fn auth_config_create_response_prefers_outer_toolkit_slug() {
        let raw = json!({
            "toolkit": {"slug": "instagram"},
            "auth_config": {
                "id": "ac_9",
                "toolkit_slug": "inner-stale",
                "auth_scheme": "OAUTH2"
            }
        });
        let config = AuthConfig::from_create_response(&raw);
        assert_eq!(config.id, "ac_9");
        assert_eq!(config.toolkit_slug.as_deref(), Some("instagram"));
        assert_eq!(config.auth_scheme.as_deref(), Some("OAUTH2"));
    }

    #[test]
    fn auth_config_create_response_without_envelope_reads_top_level() {
        let raw = json!({"id": "ac_2", "toolkit_slug": "slack"});
        let config = AuthConfig::from_create_response(&raw);
        assert_eq!(config.id, "ac_2");
        assert_eq!(config.toolkit_slug.as_deref(), Some("slack"));
    }

    #[test]
    fn connection_request_accepts_all_id_spellings() {
        let initiated = json!({"connectedAccountId": "ca_5", "redirectUrl": "https://x"});
        let req = ConnectionRequest::from_raw(&initiated);
        assert_eq!(req.id, "ca_5");
        assert_eq!(req.status, "INITIATED");
        assert_eq!(req.redirect_url.as_deref(), Some("https://x"));

        let link = json!({"link_token": "lt_1", "status": "PENDING"});
        let req = ConnectionRequest::from_raw(&link);
        assert_eq!(req.id, "lt_1");
        assert_eq!(req.status, "PENDING");
    }

    #[test]
    fn toolkit_tool_accepts_both_name_spellings() {
        let raw = json!({"name": "GITHUB_CREATE_ISSUE", "displayName": "Create Issue"});
        let tool = ToolkitTool::from_raw(&raw);
        assert_eq!(tool.action, "GITHUB_CREATE_ISSUE");
        assert_eq!(tool.display_name.as_deref(), Some("Create Issue"));
    }
}
