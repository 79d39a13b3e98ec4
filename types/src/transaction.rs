//! Transaction records shown in the activity feed.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::{Address, TxHash, U256};

/// Block time of a transaction, in Unix seconds as the explorer reports it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn new(secs: u64) -> Self {
        Self(secs)
    }

    /// Wall-clock time; a clock set before 1970 reads as zero.
    pub fn now() -> Self {
        Self(
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default(),
        )
    }

    /// Seconds from `self` until `now`, zero if `self` is in the future.
    pub fn elapsed_since(&self, now: Timestamp) -> u64 {
        now.0.saturating_sub(self.0)
    }
}

/// One historical transaction touching an account.
///
/// Purely informational: nothing in the voting flow depends on these.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub hash: TxHash,
    pub from: Address,
    /// `None` for contract-creation transactions.
    pub to: Option<Address>,
    /// Transferred value in wei.
    pub value: U256,
    pub timestamp: Timestamp,
}
