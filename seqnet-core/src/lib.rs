//! Shared primitives and traits for the seqnet transition-network analysis
//! ecosystem.
//!
//! `seqnet-core` provides the foundation the other seqnet crates build on:
//!
//! - **Error types** — [`SeqnetError`] and [`Result`] for structured error handling
//! - **Traits** — [`Scored`] and [`Summarizable`] implemented by result records

pub mod error;
pub mod traits;

pub use error::{Result, SeqnetError};
pub use traits::*;
