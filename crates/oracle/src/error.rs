use thiserror::Error;

pub type Result<T> = std::result::Result<T, OracleError>;

/// Errors surfaced by an oracle call. None of them are retried.
#[derive(Error, Debug)]
pub enum OracleError {
    #[error("API key missing: environment variable {0} is not set")]
    MissingApiKey(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Oracle returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Oracle returned no content")]
    EmptyResponse,

    #[error("Oracle refused the request: {0}")]
    Refusal(String),

    #[error("Failed to decode oracle response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Scripted oracle: {0}")]
    Scripted(String),
}
