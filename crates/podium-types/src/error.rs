use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown placement: {0}")]
    UnknownPlacement(String),

    #[error("invalid identifier: {0}")]
    InvalidId(String),
}
