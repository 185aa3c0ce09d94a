// Verdict engine error types
use thiserror::Error;

use crate::chain::ChainError;
use crate::models::{ContractViolation, SignalField};

/// A single collector's fault. Never crosses into the merger.
#[derive(Error, Debug)]
pub enum CollectorError {
    #[error("Chain data unavailable: {0}")]
    Chain(#[from] ChainError),

    #[error("Invalid data for {field}: {message}")]
    InvalidData { field: SignalField, message: String },
}

/// Faults that escalate the whole evaluation to the fail-closed contract.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("No collector produced a signal ({attempted} attempted)")]
    NoSignals { attempted: usize },

    #[error("Contract invariant violated: {0}")]
    ContractInvariant(#[from] ContractViolation),
}
