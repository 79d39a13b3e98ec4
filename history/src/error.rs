use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history request failed: {0}")]
    RequestFailed(String),

    #[error("history API unreachable: {0}")]
    Unreachable(String),

    #[error("history API rejected the query: {0}")]
    Rejected(String),

    #[error("invalid history response: {0}")]
    InvalidResponse(String),
}
