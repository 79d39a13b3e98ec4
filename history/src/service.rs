//! Best-effort history lookups.

use nexus_types::{Address, TransactionRecord};
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::source::HistorySource;

/// Wraps a [`HistorySource`] so that lookups never fail.
///
/// Each successful result is cached per address; on failure the last cached
/// result for that address is returned, or an empty list if there is none.
pub struct HistoryService<S> {
    source: S,
    cache: Mutex<HashMap<Address, Vec<TransactionRecord>>>,
}

impl<S: HistorySource> HistoryService<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Recent transactions for `address`, newest first, at most `limit`.
    pub async fn fetch_recent(&self, address: Address, limit: usize) -> Vec<TransactionRecord> {
        match self.source.fetch_recent(address, limit).await {
            Ok(records) => {
                tracing::debug!(account = %address, count = records.len(), "history fetched");
                self.cache.lock().await.insert(address, records.clone());
                records
            }
            Err(e) => {
                tracing::warn!(account = %address, error = %e, "history query failed, serving cache");
                self.cached(address).await
            }
        }
    }

    /// Last successfully fetched records for `address`.
    pub async fn cached(&self, address: Address) -> Vec<TransactionRecord> {
        self.cache
            .lock()
            .await
            .get(&address)
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HistoryError;
    use nexus_types::{Timestamp, TxHash, U256};
    use std::sync::atomic::{AtomicBool, Ordering};

    struct Flaky {
        fail: AtomicBool,
    }

    impl HistorySource for Flaky {
        async fn fetch_recent(
            &self,
            address: Address,
            _limit: usize,
        ) -> Result<Vec<TransactionRecord>, HistoryError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(HistoryError::Unreachable("offline".into()));
            }
            Ok(vec![TransactionRecord {
                hash: TxHash::new([7; 32]),
                from: address,
                to: None,
                value: U256::ZERO,
                timestamp: Timestamp::new(1),
            }])
        }
    }

    #[tokio::test]
    async fn failure_without_cache_is_empty() {
        let service = HistoryService::new(Flaky {
            fail: AtomicBool::new(true),
        });
        assert!(service.fetch_recent(Address::ZERO, 5).await.is_empty());
    }

    #[tokio::test]
    async fn failure_serves_previous_result() {
        let service = HistoryService::new(Flaky {
            fail: AtomicBool::new(false),
        });
        let first = service.fetch_recent(Address::ZERO, 5).await;
        assert_eq!(first.len(), 1);

        service.source().fail.store(true, Ordering::SeqCst);
        let second = service.fetch_recent(Address::ZERO, 5).await;
        assert_eq!(second, first);
    }

    #[tokio::test]
    async fn cache_is_per_address() {
        let service = HistoryService::new(Flaky {
            fail: AtomicBool::new(false),
        });
        service.fetch_recent(Address::ZERO, 5).await;
        assert!(service.cached(Address::repeat_byte(1)).await.is_empty());
    }
}
