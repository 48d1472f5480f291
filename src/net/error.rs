use thiserror::Error;

/// Errors surfaced by network primitives to their callers.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(String),

    #[error("Invalid request method: {0}")]
    InvalidMethod(String),

    #[error("Invalid state: {0}")]
    InvalidState(&'static str),

    #[error("Connection closed")]
    Closed,
}

impl From<tokio_tungstenite::tungstenite::Error> for TransportError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        TransportError::WebSocket(err.to_string())
    }
}
