//! Domain error model.

use thiserror::Error;

/// Failure to interpret a value as a domain type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An identifier was not a UUID.
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}
