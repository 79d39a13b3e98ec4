use thiserror::Error;

/// JSON-RPC error code a wallet returns when the user declines a request.
pub const USER_REJECTED_CODE: i64 = 4001;

/// JSON-RPC error code used by nodes for `execution reverted`.
pub const EXECUTION_REVERTED_CODE: i64 = 3;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("no wallet provider available: {0}")]
    Unavailable(String),

    #[error("request rejected by user")]
    UserRejected,

    #[error("wallet returned no accounts")]
    NoAccounts,

    #[error("provider error {code}: {message}")]
    Rpc {
        code: i64,
        message: String,
        /// Hex-encoded revert or error payload, when the node supplies one.
        data: Option<String>,
    },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid provider response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Whether this error is the ledger refusing to execute a call.
    pub fn is_revert(&self) -> bool {
        match self {
            Self::Rpc { code, message, .. } => {
                *code == EXECUTION_REVERTED_CODE || message.to_lowercase().contains("revert")
            }
            _ => false,
        }
    }
}
