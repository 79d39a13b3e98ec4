//! Nullable infrastructure for deterministic testing.
//!
//! Inspired by the "A-frame architecture" pattern from RsNano.
//! Every external dependency of the session (wallet provider, ledger, history
//! API) sits behind a trait. This crate provides in-memory implementations that:
//! - Return deterministic values
//! - Can be steered programmatically (reject, revert, drop, hold)
//! - Never touch the network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod history;
pub mod ledger;

pub use history::NullHistory;
pub use ledger::NullLedger;
