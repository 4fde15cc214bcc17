//! Errors reported by the Bitbucket client.

use thiserror::Error;

/// Failure of a single API call
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection, TLS, timeout)
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a status the call does not accept
    #[error("unexpected status {status} from {url} (expected {expected}): {body}")]
    UnexpectedStatus {
        url: String,
        status: u16,
        expected: u16,
        body: String,
    },

    /// The response body does not match the expected model
    #[error("could not parse response from {url}: {source}")]
    ResponseShape {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// HTTP status of the response, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::UnexpectedStatus { status, .. } => Some(*status),
            ApiError::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            ApiError::ResponseShape { .. } => None,
        }
    }
}
