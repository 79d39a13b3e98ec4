//! Session controller for the Nexus voting client.
//!
//! Orchestrates `connect → bind → query → vote → refresh` and owns the
//! observable UI state. State changes are pure transitions on
//! [`SessionState`] (see [`state`]); [`SessionController`] runs the async
//! steps between them and publishes every new state on a watch channel.

pub mod backoff;
pub mod config;
pub mod controller;
pub mod error;
pub mod state;

pub use config::{CandidateMeta, ClientConfig, SessionSettings};
pub use controller::SessionController;
pub use error::{ConfigError, SessionError};
pub use state::{BindingState, Phase, SessionState, UiStatus, VoteIntent};
