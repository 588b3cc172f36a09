//! Connection error types

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, ConnError>;

/// Errors raised while constructing a client
#[derive(Error, Debug)]
pub enum ConnError {
    /// HTTP client construction or request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Host/port pair or endpoint URL does not parse
    #[error("Invalid endpoint '{endpoint}': {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    /// Invalid construction parameters
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request could not be signed
    #[error("Signing error: {0}")]
    Signing(String),
}

impl ConnError {
    pub(crate) fn invalid_endpoint(endpoint: impl Into<String>, source: url::ParseError) -> Self {
        Self::InvalidEndpoint {
            endpoint: endpoint.into(),
            source,
        }
    }

    /// Check if this is a malformed endpoint error
    pub fn is_invalid_endpoint(&self) -> bool {
        matches!(self, Self::InvalidEndpoint { .. })
    }
}
