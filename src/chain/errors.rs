// Chain data collaborator error types
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ChainError {
    /// Request never produced an HTTP response. The URL is stripped so the API key cannot leak.
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("RPC endpoint returned HTTP {status}")]
    HttpStatus { status: u16 },

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("RPC response for {method} had no result")]
    MissingResult { method: String },

    #[error("Failed to decode {method} response: {message}")]
    Decode { method: String, message: String },

    #[error("Account not found: {address}")]
    AccountNotFound { address: String },

    #[error("Invalid chain data: {0}")]
    InvalidData(String),

    #[error("Client configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for ChainError {
    fn from(err: reqwest::Error) -> Self {
        ChainError::Transport(err.without_url().to_string())
    }
}

impl From<url::ParseError> for ChainError {
    fn from(err: url::ParseError) -> Self {
        ChainError::Configuration(format!("invalid RPC URL: {}", err))
    }
}
