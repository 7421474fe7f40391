//! Error types for solver operations.
//!
//! Failure to converge is NOT an error: it comes back as a result field so
//! the caller decides acceptance.

use hn_core::HnError;
use hn_network::NetworkError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Numeric error: {0}")]
    Numeric(#[from] HnError),
}

pub type SolverResult<T> = Result<T, SolverError>;
