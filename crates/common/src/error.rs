use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed bar event: {0}")]
    Decode(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
