//! HTTP clients for the Composio bridge.
//!
//! [`ComposioClient`] talks to the management API (toolkits, auth configs,
//! connected accounts, action execution). [`NotionClient`] and [`ZoomClient`]
//! layer domain operations on top of generic action execution, each bound to
//! one connected account.
//!
//! ```no_run
//! # async fn demo() -> Result<(), composio_core::Error> {
//! use composio_client::ComposioClient;
//!
//! let client = ComposioClient::from_env()?;
//! let toolkits = client.list_toolkits(Some("notion")).await?;
//! # Ok(())
//! # }
//! ```

pub mod credentials;
mod envelope;
pub mod manage;
pub mod notion;
pub mod zoom;

mod transport;

pub use manage::{ComposioClient, ConnectionFilter, CreateAuthConfig};
pub use notion::NotionClient;
pub use zoom::ZoomClient;
