//! Nullable history — canned transaction lists without HTTP.

use nexus_history::{HistoryError, HistorySource};
use nexus_types::{Address, TransactionRecord};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// A history source serving pre-loaded records per address.
pub struct NullHistory {
    records: Mutex<HashMap<Address, Vec<TransactionRecord>>>,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl NullHistory {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            failing: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
        }
    }

    /// Serve `records` for `address`, newest first.
    pub fn insert(&self, address: Address, records: Vec<TransactionRecord>) {
        self.records.lock().unwrap().insert(address, records);
    }

    /// Make every subsequent query fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of queries served so far, failed ones included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for NullHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl HistorySource for NullHistory {
    async fn fetch_recent(
        &self,
        address: Address,
        limit: usize,
    ) -> Result<Vec<TransactionRecord>, HistoryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(HistoryError::Rejected("Max rate limit reached".into()));
        }
        let records = self.records.lock().unwrap();
        Ok(records
            .get(&address)
            .map(|r| r.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }
}
