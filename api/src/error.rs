use thiserror::Error;

/// Failure classes for a comparison cycle. Everything funnels through one
/// of these before it reaches the frontend.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    Validation(String),
    #[error("failed to fetch from {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request failed with status {status}: {message}")]
    HttpStatus { status: u16, message: String },
    #[error("response body is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("assistant call failed: {0}")]
    AiService(String),
}
