//! Top-level error type for parsing shared values.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid transaction hash: {0}")]
    InvalidHash(String),

    #[error("invalid candidate id: {0}")]
    InvalidCandidateId(String),

    #[error("unknown network: {0}")]
    UnknownNetwork(String),
}
