use thiserror::Error;

/// Errors returned by the upstream retail-operations API client and the
/// normalization layer built on top of it.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The upstream responded with a non-success HTTP status.
    #[error("upstream returned HTTP status {status} for {endpoint}")]
    Status { status: u16, endpoint: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The response parsed as JSON but a field did not have the expected shape.
    #[error("unexpected payload shape at {path}")]
    Format { path: String },

    /// The token boundary could not supply a currently valid bearer token.
    #[error("token provider failure: {0}")]
    Token(String),
}
