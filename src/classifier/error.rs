// ABOUTME: Error types for the panic classifier boundary

use thiserror::Error;

/// Why a classification did not produce a verdict
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// The scene is not a base64 data URI
    #[error("Invalid scene: {0}")]
    InvalidScene(String),

    /// Transport failure or timeout
    #[error("Classifier request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-success HTTP status, with the response body
    #[error("Classifier returned status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// Response body did not match the verdict schema
    #[error("Malformed classifier response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    /// Backend could not run at all
    #[error("Classifier unavailable: {0}")]
    Unavailable(String),
}
