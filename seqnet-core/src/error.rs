//! Structured error types for the seqnet ecosystem.

use thiserror::Error;

/// Unified error type for all seqnet operations.
#[derive(Debug, Error)]
pub enum SeqnetError {
    /// Invalid input (bad arguments, out-of-range values, too little data)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Network model construction failure (degenerate sequence data)
    #[error("model error: {0}")]
    Model(String),

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the seqnet ecosystem.
pub type Result<T> = std::result::Result<T, SeqnetError>;
