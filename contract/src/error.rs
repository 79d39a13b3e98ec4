use alloy_primitives::hex;
use alloy_sol_types::{Panic, Revert, SolError};
use nexus_provider::ProviderError;
use nexus_types::TxHash;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContractError {
    /// The ledger refused the call; the reason is the contract's own message.
    #[error("{0}")]
    Revert(String),

    #[error("transaction {0} was dropped before inclusion")]
    TransactionDropped(TxHash),

    #[error("transaction signature rejected by user")]
    UserRejected,

    #[error("failed to decode contract data: {0}")]
    Decode(String),

    #[error(transparent)]
    Provider(ProviderError),
}

impl From<ProviderError> for ContractError {
    fn from(e: ProviderError) -> Self {
        if e.is_revert() {
            if let ProviderError::Rpc { message, data, .. } = &e {
                return Self::Revert(revert_reason(message, data.as_deref()));
            }
        }
        match e {
            ProviderError::UserRejected => Self::UserRejected,
            other => Self::Provider(other),
        }
    }
}

/// Extract the human-readable reason from a node's revert error.
///
/// Prefers the ABI-encoded `Error(string)` payload; falls back to the node's
/// message with its `execution reverted` prefix removed.
pub fn revert_reason(message: &str, data: Option<&str>) -> String {
    if let Some(bytes) = data.and_then(|d| hex::decode(d).ok()) {
        if let Ok(revert) = Revert::abi_decode(&bytes, true) {
            return revert.reason;
        }
        if let Ok(panic) = Panic::abi_decode(&bytes, true) {
            return format!("panic code {}", panic.code);
        }
    }
    let lower = message.to_lowercase();
    match lower.find("execution reverted") {
        Some(pos) => {
            let rest = message
                .get(pos + "execution reverted".len()..)
                .unwrap_or_default()
                .trim_start_matches(':')
                .trim();
            if rest.is_empty() {
                "execution reverted".to_string()
            } else {
                rest.to_string()
            }
        }
        None => message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded_revert(reason: &str) -> String {
        hex::encode_prefixed(
            Revert {
                reason: reason.to_string(),
            }
            .abi_encode(),
        )
    }

    #[test]
    fn reason_from_revert_data() {
        let data = encoded_revert("Already voted");
        assert_eq!(revert_reason("execution reverted", Some(&data)), "Already voted");
    }

    #[test]
    fn reason_from_message_when_no_data() {
        assert_eq!(
            revert_reason("execution reverted: Invalid candidate", None),
            "Invalid candidate"
        );
        assert_eq!(
            revert_reason("Error: VM Exception: execution reverted:Already voted", None),
            "Already voted"
        );
    }

    #[test]
    fn bare_revert_message() {
        assert_eq!(revert_reason("execution reverted", None), "execution reverted");
    }

    #[test]
    fn garbage_data_falls_back_to_message() {
        assert_eq!(
            revert_reason("execution reverted: nope", Some("0xzz")),
            "nope"
        );
    }

    #[test]
    fn provider_errors_are_classified() {
        assert_eq!(
            ContractError::from(ProviderError::UserRejected),
            ContractError::UserRejected
        );
        let revert = ProviderError::Rpc {
            code: 3,
            message: "execution reverted".into(),
            data: Some(encoded_revert("Already voted")),
        };
        assert_eq!(
            ContractError::from(revert),
            ContractError::Revert("Already voted".into())
        );
        let other = ProviderError::Transport("boom".into());
        assert_eq!(
            ContractError::from(other.clone()),
            ContractError::Provider(other)
        );
    }
}
