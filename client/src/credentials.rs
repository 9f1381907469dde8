//! Credential sourcing: environment first, then the on-disk store.

use std::path::PathBuf;

use composio_core::Error;
use serde::{Deserialize, Serialize};

pub const API_KEY_ENV: &str = "COMPOSIO_API_KEY";
pub const NOTION_ACCOUNT_ENV: &str = "NOTION_CONNECTED_ACCOUNT_ID";
pub const ZOOM_ACCOUNT_ENV: &str = "ZOOM_CONNECTED_ACCOUNT_ID";

/// Stored credentials for the bridge. All fields optional; a partial file
/// still contributes whatever it holds.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StoredCredentials {
    pub api_key: Option<String>,
    pub notion_connected_account_id: Option<String>,
    pub zoom_connected_account_id: Option<String>,
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("composio-bridge")
        .join("credentials.json")
}

/// A missing, unreadable, or malformed store reads as absent — the caller
/// falls through to the next source.
pub fn load_credentials() -> Option<StoredCredentials> {
    let data = std::fs::read_to_string(config_path()).ok()?;
    serde_json::from_str(&data).ok()
}

fn resolve(env_var: &'static str, stored: Option<String>) -> Result<String, Error> {
    if let Ok(value) = std::env::var(env_var) {
        if !value.is_empty() {
            return Ok(value);
        }
    }
    stored
        .filter(|value| !value.is_empty())
        .ok_or(Error::MissingCredential { name: env_var })
}

/// Resolve the API key: `COMPOSIO_API_KEY` env var, then the credential
/// store, then a fatal [`Error::MissingCredential`].
pub fn resolve_api_key() -> Result<String, Error> {
    resolve(
        API_KEY_ENV,
        load_credentials().and_then(|creds| creds.api_key),
    )
}

/// Resolve the Notion connected-account id, same source order as the key.
pub fn resolve_notion_account() -> Result<String, Error> {
    resolve(
        NOTION_ACCOUNT_ENV,
        load_credentials().and_then(|creds| creds.notion_connected_account_id),
    )
}

/// Resolve the Zoom connected-account id, same source order as the key.
pub fn resolve_zoom_account() -> Result<String, Error> {
    resolve(
        ZOOM_ACCOUNT_ENV,
        load_credentials().and_then(|creds| creds.zoom_connected_account_id),
    )
}
