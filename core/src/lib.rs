//! Shared records and response normalizers for the Composio bridge.
//!
//! The Composio backend answers the same logical question in several
//! historical JSON shapes (v3 nested objects, v2 flat keys, legacy key
//! names). Everything in this crate is a pure translation from those raw
//! `serde_json::Value` payloads into fixed-shape records. No I/O happens
//! here; the `composio-client` crate owns the wire.

pub mod error;
pub mod extract;
pub mod manage;
pub mod notion;
pub mod zoom;

pub use error::Error;
