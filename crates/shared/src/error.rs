//! Error taxonomy for the completion request cycle.

use thiserror::Error;

/// Failure of a single completion request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// Network or deserialization failure before a usable response.
    #[error("request failed: {0}")]
    Transport(String),

    /// Error object reported by the endpoint body.
    #[error("endpoint error {code}: {message}")]
    Api { code: i64, message: String },

    /// Endpoint succeeded but returned no candidates.
    #[error("empty response")]
    Empty,
}

impl RequestError {
    /// Whether this failure points at a bad or missing API key.
    ///
    /// Match rules: an endpoint error with code 400, any message mentioning
    /// "API key" (case-insensitive), or transport text carrying a 400
    /// status. Everything else is a generic failure.
    pub fn is_auth_error(&self) -> bool {
        match self {
            RequestError::Api { code, message } => *code == 400 || mentions_api_key(message),
            RequestError::Transport(message) => {
                message.contains("400") || mentions_api_key(message)
            }
            RequestError::Empty => false,
        }
    }
}

fn mentions_api_key(message: &str) -> bool {
    message.to_lowercase().contains("api key")
}
