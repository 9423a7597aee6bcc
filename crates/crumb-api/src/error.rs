use thiserror::Error;

/// Errors returned by the storefront API clients.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or TLS failure, or a 5xx response, from the underlying HTTP
    /// client. Transient — the read endpoints retry these.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend rejected the request and sent a human-readable `message`.
    #[error("backend error: {0}")]
    Backend(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A protected action was attempted without a session token. Carries the
    /// destination the user was heading for, so sign-in can resume there.
    #[error("not signed in; sign in to continue to {destination}")]
    Unauthenticated { destination: String },

    /// Request payload failed local validation; nothing was sent.
    #[error(transparent)]
    Validation(#[from] crumb_core::ValidationError),

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
