//! Transaction history for the activity feed.
//!
//! [`EtherscanClient`] talks to an explorer's `txlist` API; [`HistoryService`]
//! wraps any [`HistorySource`] so that failures degrade to cached or empty
//! results instead of reaching the voting flow.

pub mod error;
pub mod etherscan;
pub mod service;
pub mod source;

pub use error::HistoryError;
pub use etherscan::EtherscanClient;
pub use service::HistoryService;
pub use source::HistorySource;
