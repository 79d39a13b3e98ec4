//! JSON-RPC 2.0 over HTTP provider.
//!
//! Talks to a wallet bridge or node endpoint that accepts the same methods a
//! browser-injected provider would (`eth_requestAccounts`, `eth_sendTransaction`,
//! ...). Signing happens on the far side; this client never sees keys.

use serde::Deserialize;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::eip1193::Eip1193;
use crate::error::{ProviderError, USER_REJECTED_CODE};

/// Default timeout for provider requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP-backed [`Eip1193`] provider.
pub struct HttpProvider {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

/// Raw JSON-RPC response envelope.
#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

impl HttpProvider {
    /// Create a provider targeting the given JSON-RPC URL.
    pub fn new(url: impl Into<String>) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .map_err(|e| ProviderError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            url: url.into(),
            next_id: AtomicU64::new(1),
        })
    }

    /// The configured endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Eip1193 for HttpProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        tracing::trace!(method, id, "provider request");

        let response = self
            .http
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    ProviderError::Unavailable(format!("{}: {e}", self.url))
                } else {
                    ProviderError::Transport(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(ProviderError::Transport(format!(
                "provider returned HTTP {}",
                response.status()
            )));
        }

        let envelope: RpcResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("invalid JSON-RPC body: {e}")))?;

        into_result(envelope)
    }
}

fn into_result(envelope: RpcResponse) -> Result<Value, ProviderError> {
    if let Some(err) = envelope.error {
        return Err(map_rpc_error(err));
    }
    Ok(envelope.result.unwrap_or(Value::Null))
}

fn map_rpc_error(err: RpcErrorObject) -> ProviderError {
    if err.code == USER_REJECTED_CODE {
        return ProviderError::UserRejected;
    }
    // Nodes disagree on where revert bytes live: either `data: "0x.."` or
    // `data: { data: "0x.." }`.
    let data = match err.data {
        Some(Value::String(s)) => Some(s),
        Some(Value::Object(map)) => map.get("data").and_then(|d| d.as_str()).map(String::from),
        _ => None,
    };
    ProviderError::Rpc {
        code: err.code,
        message: err.message,
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<Value, ProviderError> {
        into_result(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn result_is_returned() {
        let value = parse(r#"{"jsonrpc":"2.0","id":1,"result":["0xabc"]}"#).unwrap();
        assert_eq!(value, serde_json::json!(["0xabc"]));
    }

    #[test]
    fn null_result_is_not_an_error() {
        let value = parse(r#"{"jsonrpc":"2.0","id":1,"result":null}"#).unwrap();
        assert!(value.is_null());
    }

    #[test]
    fn user_rejection_mapped() {
        let err = parse(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":4001,"message":"User rejected the request."}}"#,
        )
        .unwrap_err();
        assert_eq!(err, ProviderError::UserRejected);
    }

    #[test]
    fn revert_data_string() {
        let err = parse(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":3,"message":"execution reverted","data":"0x08c379a0"}}"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ProviderError::Rpc {
                code: 3,
                message: "execution reverted".into(),
                data: Some("0x08c379a0".into()),
            }
        );
    }

    #[test]
    fn revert_data_nested_object() {
        let err = parse(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32603,"message":"Internal error","data":{"data":"0xdead","message":"reverted"}}}"#,
        )
        .unwrap_err();
        match err {
            ProviderError::Rpc { data, .. } => assert_eq!(data.as_deref(), Some("0xdead")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn provider_creation() {
        let provider = HttpProvider::new("http://127.0.0.1:8545").unwrap();
        assert_eq!(provider.url(), "http://127.0.0.1:8545");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_unavailable() {
        // Port 9 (discard) is closed on test machines; the connect fails fast.
        let provider = HttpProvider::new("http://127.0.0.1:9").unwrap();
        let err = provider
            .request("eth_requestAccounts", serde_json::json!([]))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Unavailable(_)), "{err:?}");
    }
}
