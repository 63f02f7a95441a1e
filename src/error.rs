//! Error types for factoria-optimization
//!
//! These cover only programming-contract violations caught before or during
//! problem construction. Domain infeasibility and unboundedness are not
//! errors — they are ordinary tagged variants of the solvers' own result
//! types (see [`crate::lp::LpStatus`], [`crate::belts::BeltsResult`],
//! [`crate::factory::FactoryResult`]).

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while validating or constructing a problem
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Input referenced an identifier that was never declared
    #[error("unknown identifier: {0}")]
    UnknownIdentifier(String),

    /// Invalid input data (empty collections, inconsistent bounds, etc.)
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Dimension mismatch between constructed matrices/vectors (internal bug)
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension
        got: usize,
    },
}

impl Error {
    /// Create an unknown-identifier error
    pub fn unknown_identifier(msg: impl Into<String>) -> Self {
        Self::UnknownIdentifier(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a dimension mismatch error
    pub fn dimension_mismatch(expected: usize, got: usize) -> Self {
        Self::DimensionMismatch { expected, got }
    }
}
