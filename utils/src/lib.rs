//! Shared utilities for the Nexus voting client.

pub mod logging;
pub mod time;
pub mod units;

pub use logging::{init_logging, LogFormat};
pub use time::{format_duration, format_relative};
pub use units::format_ether;
