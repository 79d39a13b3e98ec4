use nexus_contract::ContractError;
use nexus_provider::ProviderError;
use nexus_types::Address;
use thiserror::Error;

/// Failures surfaced by the session controller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("no wallet detected, install a browser wallet to vote ({0})")]
    ProviderUnavailable(String),

    #[error("request declined in wallet")]
    UserRejected,

    /// The contract's reason, verbatim.
    #[error("{0}")]
    ContractRevert(String),

    #[error("transaction was dropped before confirmation")]
    TransactionDropped,

    #[error("not connected to the voting contract")]
    NotBound,

    #[error("a vote is already being submitted")]
    VoteInFlight,

    #[error("a wallet connection is already in progress")]
    ConnectInFlight,

    #[error("wallet switched from {expected} to {actual}")]
    AccountMismatch { expected: Address, actual: Address },

    #[error("session changed while the operation was in flight")]
    Superseded,

    #[error("wallet provider error: {0}")]
    Provider(String),

    #[error("contract error: {0}")]
    Contract(String),
}

impl From<ProviderError> for SessionError {
    fn from(e: ProviderError) -> Self {
        match e {
            ProviderError::Unavailable(detail) => Self::ProviderUnavailable(detail),
            ProviderError::UserRejected => Self::UserRejected,
            other => Self::Provider(other.to_string()),
        }
    }
}

impl From<ContractError> for SessionError {
    fn from(e: ContractError) -> Self {
        match e {
            ContractError::Revert(reason) => Self::ContractRevert(reason),
            ContractError::TransactionDropped(_) => Self::TransactionDropped,
            ContractError::UserRejected => Self::UserRejected,
            ContractError::Decode(detail) => Self::Contract(detail),
            ContractError::Provider(inner) => inner.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(String),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid config value: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexus_types::TxHash;

    #[test]
    fn revert_reason_is_verbatim() {
        let err = SessionError::from(ContractError::Revert("Already voted".into()));
        assert_eq!(err.to_string(), "Already voted");
    }

    #[test]
    fn provider_errors_nest_through_contract_errors() {
        let err = SessionError::from(ContractError::Provider(ProviderError::Unavailable(
            "offline".into(),
        )));
        assert_eq!(err, SessionError::ProviderUnavailable("offline".into()));
    }

    #[test]
    fn dropped_maps_to_dropped() {
        let err = SessionError::from(ContractError::TransactionDropped(TxHash::ZERO));
        assert_eq!(err, SessionError::TransactionDropped);
    }
}
