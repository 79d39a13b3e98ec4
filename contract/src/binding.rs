//! Typed proxy over the deployed voting contract.

use alloy_primitives::{hex, Bytes, U256};
use alloy_sol_types::SolCall;
use nexus_provider::{Eip1193, SignerHandle};
use nexus_types::{Address, Candidate, CandidateId, TxHash};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use crate::abi::{getAllCandidatesCall, voteCall, CandidateEntry};
use crate::error::ContractError;
use crate::pending::PendingTransaction;

/// Default interval between receipt polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Handle through which reads and writes to one deployed contract are issued,
/// on behalf of one signer. Built once per session.
pub struct ContractBinding<P> {
    signer: SignerHandle<P>,
    address: Address,
    poll_interval: Duration,
}

impl<P: Eip1193> ContractBinding<P> {
    pub fn bind(signer: SignerHandle<P>, address: Address) -> Self {
        tracing::debug!(contract = %address, account = %signer.address(), "contract bound");
        Self {
            signer,
            address,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override how often [`PendingTransaction::await_confirmation`] polls.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn signer(&self) -> &SignerHandle<P> {
        &self.signer
    }

    fn provider(&self) -> &Arc<P> {
        self.signer.provider()
    }

    /// Read every candidate, in the contract's own iteration order.
    pub async fn list_candidates(&self) -> Result<Vec<Candidate>, ContractError> {
        let call = json!([
            {
                "from": self.signer.address(),
                "to": self.address,
                "data": hex::encode_prefixed(getAllCandidatesCall {}.abi_encode()),
            },
            "latest",
        ]);
        let result = self.provider().request("eth_call", call).await?;
        let bytes = decode_bytes(result)?;
        let decoded = getAllCandidatesCall::abi_decode_returns(&bytes, true)
            .map_err(|e| ContractError::Decode(format!("getAllCandidates: {e}")))?;
        decoded._0.into_iter().map(to_candidate).collect()
    }

    /// Submit a vote for `id`.
    ///
    /// Gas is estimated first, which is where the node reports most business
    /// rule rejections (double vote, unknown candidate) with their reason.
    /// Returns once the transaction is accepted by the network.
    pub async fn vote(&self, id: CandidateId) -> Result<PendingTransaction<P>, ContractError> {
        let data = hex::encode_prefixed(
            voteCall {
                candidateId: U256::from(id.get()),
            }
            .abi_encode(),
        );
        let mut tx = json!({
            "from": self.signer.address(),
            "to": self.address,
            "data": data,
        });

        let gas = self
            .provider()
            .request("eth_estimateGas", json!([tx.clone()]))
            .await?;
        tx["gas"] = gas;

        let result = self
            .provider()
            .request("eth_sendTransaction", json!([tx]))
            .await?;
        let hash: TxHash = serde_json::from_value(result)
            .map_err(|e| ContractError::Decode(format!("transaction hash: {e}")))?;

        tracing::info!(candidate = %id, tx = %hash, "vote broadcast");
        Ok(PendingTransaction::new(
            hash,
            Arc::clone(self.provider()),
            self.poll_interval,
        ))
    }
}

fn decode_bytes(value: Value) -> Result<Bytes, ContractError> {
    serde_json::from_value(value).map_err(|e| ContractError::Decode(format!("call result: {e}")))
}

fn to_candidate(entry: CandidateEntry) -> Result<Candidate, ContractError> {
    let raw_id: u64 = entry
        .id
        .try_into()
        .map_err(|_| ContractError::Decode(format!("candidate id {} out of range", entry.id)))?;
    let id = CandidateId::new(raw_id).map_err(|e| ContractError::Decode(e.to_string()))?;
    let vote_count: u64 = entry.voteCount.try_into().map_err(|_| {
        ContractError::Decode(format!("vote count {} out of range", entry.voteCount))
    })?;
    Ok(Candidate {
        id,
        name: entry.name,
        vote_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_conversion() {
        let candidate = to_candidate(CandidateEntry {
            id: U256::from(2u64),
            name: "Calon B".into(),
            voteCount: U256::from(5u64),
        })
        .unwrap();
        assert_eq!(candidate.id.get(), 2);
        assert_eq!(candidate.name, "Calon B");
        assert_eq!(candidate.vote_count, 5);
    }

    #[test]
    fn zero_id_is_rejected() {
        let err = to_candidate(CandidateEntry {
            id: U256::ZERO,
            name: "ghost".into(),
            voteCount: U256::ZERO,
        })
        .unwrap_err();
        assert!(matches!(err, ContractError::Decode(_)));
    }

    #[test]
    fn oversized_count_is_rejected() {
        let err = to_candidate(CandidateEntry {
            id: U256::from(1u64),
            name: "whale".into(),
            voteCount: U256::MAX,
        })
        .unwrap_err();
        assert!(matches!(err, ContractError::Decode(_)));
    }

    #[test]
    fn call_result_must_be_hex() {
        assert!(decode_bytes(json!("0x")).unwrap().is_empty());
        assert!(decode_bytes(json!(42)).is_err());
    }
}
