//! Ledger client adapter.
//!
//! Wraps an EIP-1193 style wallet provider and exposes the two things the
//! session needs from it: account discovery ([`LedgerClient::connect`]) and a
//! signing capability for the connected account ([`LedgerClient::get_signer`]).
//! The adapter keeps no cached identity of its own.

pub mod client;
pub mod eip1193;
pub mod error;
pub mod http;

pub use client::{LedgerClient, SignerHandle};
pub use eip1193::Eip1193;
pub use error::ProviderError;
pub use http::HttpProvider;
