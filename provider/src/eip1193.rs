//! The wallet provider boundary.

use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

use crate::error::ProviderError;

/// An EIP-1193 style provider: a single `request(method, params)` entry point.
///
/// Any transport (HTTP bridge, injected browser object, in-memory test ledger)
/// sits behind this trait; callers only see JSON values.
pub trait Eip1193: Send + Sync {
    /// Issue one request and return its `result` value.
    ///
    /// A JSON `null` result is returned as [`Value::Null`], not as an error.
    fn request(
        &self,
        method: &str,
        params: Value,
    ) -> impl Future<Output = Result<Value, ProviderError>> + Send;
}

impl<T: Eip1193> Eip1193 for Arc<T> {
    fn request(
        &self,
        method: &str,
        params: Value,
    ) -> impl Future<Output = Result<Value, ProviderError>> + Send {
        (**self).request(method, params)
    }
}
