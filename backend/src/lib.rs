//! A minimal HTTP backend for the voting client.
//!
//! The only route is `GET /`, which answers with a fixed liveness message.
//! CORS is wide open so browser front ends on any origin can probe it.

pub mod error;
pub mod server;

pub use error::BackendError;
pub use server::{router, BackendServer, HEALTH_MESSAGE};
