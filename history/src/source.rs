use nexus_types::{Address, TransactionRecord};
use std::future::Future;

use crate::error::HistoryError;

/// Anything that can list recent transactions for an address, newest first.
pub trait HistorySource: Send + Sync {
    fn fetch_recent(
        &self,
        address: Address,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<TransactionRecord>, HistoryError>> + Send;
}

impl<T: HistorySource> HistorySource for std::sync::Arc<T> {
    fn fetch_recent(
        &self,
        address: Address,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<TransactionRecord>, HistoryError>> + Send {
        (**self).fetch_recent(address, limit)
    }
}
