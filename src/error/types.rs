use thiserror::Error;

use crate::chain::ChainError;
use crate::config::ValidationError;

/// Startup and process-level failures. Evaluation faults never surface here.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error("Chain client error: {0}")]
    Chain(#[from] ChainError),

    #[error("Logging error: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
