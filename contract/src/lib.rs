//! Contract binding for the voting contract.
//!
//! - [`abi`] declares the two contract methods the client consumes.
//! - [`ContractBinding`] issues reads (`getAllCandidates`) and writes (`vote`)
//!   through the signer's provider.
//! - [`PendingTransaction`] tracks a broadcast vote until it is mined.

pub mod abi;
pub mod binding;
pub mod error;
pub mod pending;

pub use binding::ContractBinding;
pub use error::ContractError;
pub use pending::{PendingTransaction, Receipt};
