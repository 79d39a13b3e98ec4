//! Fundamental types for the Nexus voting client.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! addresses, transaction hashes, candidates, transaction records, networks and
//! timestamps.

pub mod address;
pub mod candidate;
pub mod error;
pub mod hash;
pub mod network;
pub mod transaction;

pub use address::{parse_address, short_address, Address};
pub use alloy_primitives::U256;
pub use candidate::{Candidate, CandidateId};
pub use error::TypesError;
pub use hash::TxHash;
pub use network::NetworkId;
pub use transaction::{Timestamp, TransactionRecord};
