//! Management client: toolkits, auth configs, connected accounts, and the
//! generic action-execution path with its legacy-id bridge.

use composio_core::Error;
use composio_core::extract::value_list;
use composio_core::manage::{
    AuthConfig, ConnectedAccount, ConnectionRequest, Toolkit, ToolkitTool,
};
use reqwest::Method;
use serde_json::{Value, json};

use crate::credentials::resolve_api_key;
use crate::transport::{ApiVersion, Transport, V2_BASE_URL, V3_BASE_URL};

/// Connected-account ids issued under the new scheme carry this prefix; the
/// v2 execute endpoint rejects them and wants the co-issued legacy UUID.
pub const NEW_ID_PREFIX: &str = "ca_";

/// Input for creating an auth config. `new` fills the backend defaults;
/// callers override fields directly.
#[derive(Debug, Clone)]
pub struct CreateAuthConfig {
    pub toolkit_slug: String,
    /// "OAUTH2", "API_KEY", "BEARER_TOKEN", or "BASIC".
    pub auth_scheme: String,
    pub name: Option<String>,
    /// Use Composio's managed OAuth app rather than custom credentials.
    pub use_composio_auth: bool,
    /// Custom OAuth credentials (client_id, client_secret) when not managed.
    pub credentials: Option<Value>,
    pub scopes: Option<Vec<String>>,
}

impl CreateAuthConfig {
    pub fn new(toolkit_slug: impl Into<String>) -> Self {
        Self {
            toolkit_slug: toolkit_slug.into(),
            auth_scheme: "OAUTH2".to_string(),
            name: None,
            use_composio_auth: true,
            credentials: None,
            scopes: None,
        }
    }

    /// Request body: toolkit identity plus an `options` object whose `type`
    /// selects managed vs custom auth. Scopes ride inside `credentials`.
    fn to_body(&self) -> Value {
        let mut options = json!({
            "type": if self.use_composio_auth {
                "use_composio_managed_auth"
            } else {
                "use_custom_auth"
            },
            "auth_scheme": self.auth_scheme,
        });
        if let Some(name) = &self.name {
            options["name"] = json!(name);
        }
        if let Some(credentials) = &self.credentials {
            options["credentials"] = credentials.clone();
        }
        if let Some(scopes) = &self.scopes {
            if options.get("credentials").is_none() {
                options["credentials"] = json!({});
            }
            options["credentials"]["scopes"] = json!(scopes);
        }
        json!({
            "toolkit": {"slug": self.toolkit_slug},
            "options": options,
        })
    }
}

/// Optional filters for listing connected accounts.
#[derive(Debug, Clone, Default)]
pub struct ConnectionFilter {
    pub toolkit_slug: Option<String>,
    /// "ACTIVE", "INACTIVE", "PENDING", "EXPIRED", or "FAILED".
    pub status: Option<String>,
    pub user_id: Option<String>,
}

/// Composio management API client. One instance owns one connection pool.
pub struct ComposioClient {
    transport: Transport,
}

impl ComposioClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, Error> {
        Self::with_hosts(api_key, V3_BASE_URL, V2_BASE_URL)
    }

    /// Same client pointed at different hosts. Tests use this to target a
    /// mock backend.
    pub fn with_hosts(
        api_key: impl Into<String>,
        v3_base: impl Into<String>,
        v2_base: impl Into<String>,
    ) -> Result<Self, Error> {
        Ok(Self {
            transport: Transport::new(api_key.into(), v3_base, v2_base)?,
        })
    }

    /// Build from `COMPOSIO_API_KEY` or the credential store.
    pub fn from_env() -> Result<Self, Error> {
        Self::new(resolve_api_key()?)
    }

    // ----- toolkits -----

    pub async fn list_toolkits(&self, search: Option<&str>) -> Result<Vec<Toolkit>, Error> {
        let mut query = Vec::new();
        if let Some(search) = search {
            query.push(("search", search.to_string()));
        }
        let data = self
            .transport
            .request(Method::GET, ApiVersion::V3, "/toolkits", &query, None)
            .await?;
        Ok(value_list(&data, &["items", "toolkits"])
            .iter()
            .map(Toolkit::from_raw)
            .collect())
    }

    /// The v3 API has no per-toolkit tool listing; the v2 actions endpoint
    /// filtered by app covers it.
    pub async fn get_toolkit_tools(&self, toolkit_slug: &str) -> Result<Vec<ToolkitTool>, Error> {
        let query = [
            ("apps", toolkit_slug.to_string()),
            ("limit", "100".to_string()),
        ];
        let data = self
            .transport
            .request(Method::GET, ApiVersion::V2, "/actions", &query, None)
            .await?;
        Ok(value_list(&data, &["items", "tools"])
            .iter()
            .map(ToolkitTool::from_raw)
            .collect())
    }

    // ----- auth configs -----

    pub async fn list_auth_configs(
        &self,
        toolkit_slug: Option<&str>,
    ) -> Result<Vec<AuthConfig>, Error> {
        let mut query = Vec::new();
        if let Some(slug) = toolkit_slug {
            query.push(("toolkit_slug", slug.to_string()));
        }
        let data = self
            .transport
            .request(Method::GET, ApiVersion::V3, "/auth_configs", &query, None)
            .await?;
        Ok(value_list(&data, &["items", "auth_configs"])
            .iter()
            .map(AuthConfig::from_raw)
            .collect())
    }

    pub async fn get_auth_config(&self, auth_config_id: &str) -> Result<AuthConfig, Error> {
        let path = format!("/auth_configs/{auth_config_id}");
        let data = self
            .transport
            .request(Method::GET, ApiVersion::V3, &path, &[], None)
            .await?;
        let mut config = AuthConfig::from_raw(&data);
        if config.id.is_empty() {
            config.id = auth_config_id.to_string();
        }
        Ok(config)
    }

    pub async fn create_auth_config(&self, input: &CreateAuthConfig) -> Result<AuthConfig, Error> {
        let data = self
            .transport
            .request(
                Method::POST,
                ApiVersion::V3,
                "/auth_configs",
                &[],
                Some(&input.to_body()),
            )
            .await?;
        let mut config = AuthConfig::from_create_response(&data);
        if config.toolkit_slug.is_none() {
            config.toolkit_slug = Some(input.toolkit_slug.clone());
        }
        if config.auth_scheme.is_none() {
            config.auth_scheme = Some(input.auth_scheme.clone());
        }
        if config.name.is_none() {
            config.name = input.name.clone();
        }
        Ok(config)
    }

    pub async fn delete_auth_config(&self, auth_config_id: &str) -> Result<Value, Error> {
        let path = format!("/auth_configs/{auth_config_id}");
        self.transport
            .request(Method::DELETE, ApiVersion::V3, &path, &[], None)
            .await
    }

    // ----- connected accounts -----

    pub async fn list_connections(
        &self,
        filter: &ConnectionFilter,
    ) -> Result<Vec<ConnectedAccount>, Error> {
        let mut query = Vec::new();
        if let Some(slug) = &filter.toolkit_slug {
            query.push(("toolkit_slug", slug.clone()));
        }
        if let Some(status) = &filter.status {
            query.push(("status", status.clone()));
        }
        if let Some(user_id) = &filter.user_id {
            query.push(("user_id", user_id.clone()));
        }
        let data = self
            .transport
            .request(
                Method::GET,
                ApiVersion::V3,
                "/connected_accounts",
                &query,
                None,
            )
            .await?;
        Ok(value_list(&data, &["items", "connected_accounts"])
            .iter()
            .map(ConnectedAccount::from_raw)
            .collect())
    }

    pub async fn get_connection(&self, connection_id: &str) -> Result<ConnectedAccount, Error> {
        let path = format!("/connected_accounts/{connection_id}");
        let data = self
            .transport
            .request(Method::GET, ApiVersion::V3, &path, &[], None)
            .await?;
        let mut account = ConnectedAccount::from_raw(&data);
        if account.id.is_empty() {
            account.id = connection_id.to_string();
        }
        Ok(account)
    }

    /// Start an auth flow. OAuth toolkits return a `redirect_url` the user
    /// must open; completion is observed by polling `get_connection`.
    pub async fn initiate_connection(
        &self,
        auth_config_id: &str,
        user_id: &str,
        callback_url: Option<&str>,
        config: Option<&Value>,
    ) -> Result<ConnectionRequest, Error> {
        let mut connection = json!({"user_id": user_id});
        if let Some(callback_url) = callback_url {
            connection["callback_url"] = json!(callback_url);
        }
        if let Some(Value::Object(extra)) = config {
            for (key, value) in extra {
                connection[key.as_str()] = value.clone();
            }
        }
        let body = json!({
            "auth_config": {"id": auth_config_id},
            "connection": connection,
        });
        let data = self
            .transport
            .request(
                Method::POST,
                ApiVersion::V3,
                "/connected_accounts",
                &[],
                Some(&body),
            )
            .await?;
        Ok(ConnectionRequest::from_raw(&data))
    }

    /// Composio-hosted auth link instead of a raw OAuth redirect.
    pub async fn initiate_connection_link(
        &self,
        auth_config_id: &str,
        user_id: &str,
        callback_url: Option<&str>,
    ) -> Result<ConnectionRequest, Error> {
        let mut connection = json!({"user_id": user_id});
        if let Some(callback_url) = callback_url {
            connection["callback_url"] = json!(callback_url);
        }
        let body = json!({
            "auth_config": {"id": auth_config_id},
            "connection": connection,
        });
        let data = self
            .transport
            .request(
                Method::POST,
                ApiVersion::V3,
                "/connected_accounts/link",
                &[],
                Some(&body),
            )
            .await?;
        Ok(ConnectionRequest::from_raw(&data))
    }

    pub async fn delete_connection(&self, connection_id: &str) -> Result<Value, Error> {
        let path = format!("/connected_accounts/{connection_id}");
        self.transport
            .request(Method::DELETE, ApiVersion::V3, &path, &[], None)
            .await
    }

    pub async fn refresh_connection(&self, connection_id: &str) -> Result<ConnectedAccount, Error> {
        let path = format!("/connected_accounts/{connection_id}/refresh");
        let data = self
            .transport
            .request(Method::POST, ApiVersion::V3, &path, &[], None)
            .await?;
        let mut account = ConnectedAccount::from_raw(&data);
        if account.id.is_empty() {
            account.id = connection_id.to_string();
        }
        Ok(account)
    }

    // ----- action execution -----

    /// Map an account id to the form the v2 execute endpoint accepts.
    /// Legacy UUIDs pass through with no network call; `ca_*` ids cost one
    /// `get_connection` round trip.
    pub async fn resolve_for_execution(&self, account_id: &str) -> Result<String, Error> {
        if !account_id.starts_with(NEW_ID_PREFIX) {
            return Ok(account_id.to_string());
        }
        let account = self.get_connection(account_id).await?;
        legacy_execution_id(account_id, &account)
    }

    /// Execute an action against a connected account. Returns the raw
    /// response body; normalization belongs to the domain adapters.
    pub async fn execute_action(
        &self,
        action: &str,
        connected_account_id: &str,
        params: Value,
    ) -> Result<Value, Error> {
        let account_id = self.resolve_for_execution(connected_account_id).await?;
        let path = format!("/actions/{action}/execute");
        self.transport
            .request(
                Method::POST,
                ApiVersion::V2,
                &path,
                &[],
                Some(&execution_body(&account_id, params)),
            )
            .await
    }
}

/// Record-level half of the id bridge: the legacy UUID of an
/// already-fetched account, or [`Error::UnresolvableIdentifier`] when the
/// record carries none.
pub fn legacy_execution_id(
    requested_id: &str,
    account: &ConnectedAccount,
) -> Result<String, Error> {
    account
        .deprecated_uuid
        .clone()
        .ok_or_else(|| Error::UnresolvableIdentifier {
            id: requested_id.to_string(),
        })
}

fn execution_body(account_id: &str, params: Value) -> Value {
    json!({
        "connectedAccountId": account_id,
        "input": params,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use composio_core::manage::ConnectedAccount;
    use serde_json::json;

    #[test]
    fn legacy_id_comes_from_deprecated_uuid() {
        let account = ConnectedAccount::from_raw(&json!({
            "id": "ca_123",
            "deprecated": {"uuid": "legacy-1"}
        }));
        assert_eq!(legacy_execution_id("ca_123", &account).unwrap(), "legacy-1");
    }

    #[test]
    fn missing_uuid_is_unresolvable() {
        let account = ConnectedAccount::from_raw(&json!({"id": "ca_123"}));
        match legacy_execution_id("ca_123", &account) {
            Err(Error::UnresolvableIdentifier { id }) => assert_eq!(id, "ca_123"),
            other => panic!("expected UnresolvableIdentifier, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_prefixed_ids_pass_through_without_network() {
        // Hosts point nowhere; an attempted request would fail loudly.
        let client =
            ComposioClient::with_hosts("test-key", "http://127.0.0.1:9", "http://127.0.0.1:9")
                .unwrap();
        let resolved = client.resolve_for_execution("legacy-uuid-7").await.unwrap();
        assert_eq!(resolved, "legacy-uuid-7");
    }

    #[test]
    fn execution_body_uses_camel_case_account_key() {
        let body = execution_body("legacy-1", json!({"block_id": "b1"}));
        assert_eq!(body["connectedAccountId"], json!("legacy-1"));
        assert_eq!(body["input"], json!({"block_id": "b1"}));
    }

    #[test]
    fn create_auth_config_body_managed_with_scopes() {
        let mut input = CreateAuthConfig::new("instagram");
        input.scopes = Some(vec!["user_profile".to_string()]);
        let body = input.to_body();
        assert_eq!(body["toolkit"]["slug"], json!("instagram"));
        assert_eq!(body["options"]["type"], json!("use_composio_managed_auth"));
        assert_eq!(body["options"]["auth_scheme"], json!("OAUTH2"));
        assert_eq!(
            body["options"]["credentials"]["scopes"],
            json!(["user_profile"])
        );
    }

    #[test]
    fn create_auth_config_body_custom_credentials() {
        let mut input = CreateAuthConfig::new("github");
        input.use_composio_auth = false;
        input.credentials = Some(json!({"client_id": "c", "client_secret": "s"}));
        input.scopes = Some(vec!["repo".to_string()]);
        let body = input.to_body();
        assert_eq!(body["options"]["type"], json!("use_custom_auth"));
        assert_eq!(body["options"]["credentials"]["client_id"], json!("c"));
        assert_eq!(body["options"]["credentials"]["scopes"], json!(["repo"]));
    }
}
