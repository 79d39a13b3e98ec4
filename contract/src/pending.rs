//! Broadcast transactions awaiting inclusion.

use nexus_provider::{Eip1193, ProviderError};
use nexus_types::TxHash;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use crate::error::ContractError;

/// Consecutive polls on which the node must not know the transaction before
/// it is declared dropped. Freshly broadcast transactions can be briefly
/// invisible to `eth_getTransactionByHash` on load-balanced endpoints.
const DROP_THRESHOLD: u32 = 3;

/// Inclusion proof for a mined transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receipt {
    pub transaction_hash: TxHash,
    pub block_number: u64,
    pub gas_used: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReceiptResponse {
    transaction_hash: TxHash,
    #[serde(default)]
    block_number: Option<String>,
    #[serde(default)]
    gas_used: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

/// A transaction accepted by the network but not yet confirmed.
pub struct PendingTransaction<P> {
    hash: TxHash,
    provider: Arc<P>,
    poll_interval: Duration,
}

impl<P> std::fmt::Debug for PendingTransaction<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingTransaction")
            .field("hash", &self.hash)
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

impl<P: Eip1193> PendingTransaction<P> {
    pub fn new(hash: TxHash, provider: Arc<P>, poll_interval: Duration) -> Self {
        Self {
            hash,
            provider,
            poll_interval,
        }
    }

    pub fn hash(&self) -> TxHash {
        self.hash
    }

    /// Wait until the transaction is mined.
    ///
    /// There is no timeout: the future stays pending for as long as the node
    /// keeps reporting the transaction as known but unmined. Dropping the
    /// future abandons the wait.
    pub async fn await_confirmation(self) -> Result<Receipt, ContractError> {
        let mut unknown_polls = 0u32;
        loop {
            match self.poll().await {
                Ok(Some(receipt)) => return Ok(receipt),
                Ok(None) => {}
                Err(ContractError::Provider(
                    e @ (ProviderError::Transport(_) | ProviderError::Unavailable(_)),
                )) => {
                    tracing::warn!(tx = %self.hash, error = %e, "receipt poll failed, retrying");
                }
                Err(ContractError::TransactionDropped(_)) => {
                    unknown_polls += 1;
                    if unknown_polls >= DROP_THRESHOLD {
                        tracing::warn!(tx = %self.hash, "transaction dropped");
                        return Err(ContractError::TransactionDropped(self.hash));
                    }
                }
                Err(e) => return Err(e),
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// One poll: `Some(receipt)` once mined, `None` while pending, and
    /// `TransactionDropped` when the node no longer knows the transaction.
    async fn poll(&self) -> Result<Option<Receipt>, ContractError> {
        let receipt = self
            .provider
            .request("eth_getTransactionReceipt", json!([self.hash]))
            .await?;
        if !receipt.is_null() {
            return parse_receipt(receipt);
        }

        let tx = self
            .provider
            .request("eth_getTransactionByHash", json!([self.hash]))
            .await?;
        if tx.is_null() {
            return Err(ContractError::TransactionDropped(self.hash));
        }
        Ok(None)
    }
}

fn parse_receipt(value: Value) -> Result<Option<Receipt>, ContractError> {
    let raw: ReceiptResponse = serde_json::from_value(value)
        .map_err(|e| ContractError::Decode(format!("invalid receipt: {e}")))?;

    // Some nodes hand out receipts for pending transactions with a null block.
    let Some(block) = raw.block_number else {
        return Ok(None);
    };

    if raw.status.as_deref() == Some("0x0") {
        return Err(ContractError::Revert("transaction reverted on-chain".into()));
    }

    Ok(Some(Receipt {
        transaction_hash: raw.transaction_hash,
        block_number: parse_hex_u64(&block)?,
        gas_used: raw.gas_used.as_deref().map(parse_hex_u64).transpose()?.unwrap_or(0),
    }))
}

fn parse_hex_u64(raw: &str) -> Result<u64, ContractError> {
    let digits = raw.strip_prefix("0x").unwrap_or(raw);
    u64::from_str_radix(digits, 16)
        .map_err(|e| ContractError::Decode(format!("bad quantity {raw}: {e}")))
}
