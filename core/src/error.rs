use thiserror::Error;

/// Error taxonomy for the bridge. Nothing here is retried automatically —
/// every failure surfaces to the immediate caller.
#[derive(Debug, Error)]
pub enum Error {
    /// Non-2xx response from the Composio backend. Carries the status and the
    /// raw response body so callers can report exactly what the API said.
    #[error("composio api returned {status}: {body}")]
    Http { status: u16, body: String },

    /// Connection-level failure before any status was received.
    #[error("request failed: {0}")]
    Transport(String),

    /// A `ca_*` account id whose record carries no legacy UUID. Terminal:
    /// the v2 execute path is unavailable for accounts created entirely
    /// under the new id scheme.
    #[error(
        "cannot resolve {id} to a legacy account id for execution; \
         the connected account has no deprecated UUID"
    )]
    UnresolvableIdentifier { id: String },

    /// Caller-supplied JSON (filters, properties, params) failed to parse,
    /// or an argument value was out of range. Reported before any remote
    /// call is attempted.
    #[error("invalid input: {0}")]
    MalformedInput(String),

    /// A field the record genuinely cannot exist without was absent from a
    /// backend response (e.g. a meeting with no `id`).
    #[error("{entity} record is missing required field '{field}'")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    /// A required credential (API key or connected-account id) was found in
    /// neither the environment nor the credential store. Startup-only.
    #[error(
        "missing credential {name}: set the env var or store it in the \
         credentials file at <config_dir>/composio-bridge/credentials.json"
    )]
    MissingCredential { name: &'static str },
}

impl Error {
    pub fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedInput(message.into())
    }
}
