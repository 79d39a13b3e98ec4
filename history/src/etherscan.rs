//! HTTP client for an Etherscan-compatible `txlist` endpoint.

use nexus_types::{parse_address, Address, Timestamp, TransactionRecord, TxHash, U256};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::error::HistoryError;
use crate::source::HistorySource;

/// Default timeout for history requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// `message` the API returns alongside `status: "0"` for an account with no
/// transactions. Not an error.
const NO_TRANSACTIONS: &str = "No transactions found";

/// Client for `GET {api_url}?module=account&action=txlist&address=...`.
pub struct EtherscanClient {
    http_client: reqwest::Client,
    api_url: String,
    api_key: String,
}

/// Raw JSON envelope: `{"status": "1"|"0", "message": "...", "result": ...}`.
///
/// `result` is a list on success and a plain string on failure.
#[derive(Debug, Deserialize)]
struct TxListResponse {
    status: String,
    #[serde(default)]
    message: String,
    result: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTransaction {
    hash: String,
    from: String,
    #[serde(default)]
    to: String,
    value: String,
    time_stamp: String,
}

impl EtherscanClient {
    /// Create a client for the given API base URL and key.
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http_client,
            api_url: api_url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

impl HistorySource for EtherscanClient {
    async fn fetch_recent(
        &self,
        address: Address,
        limit: usize,
    ) -> Result<Vec<TransactionRecord>, HistoryError> {
        let address = address.to_string();
        let offset = limit.to_string();
        let response = self
            .http_client
            .get(&self.api_url)
            .query(&[
                ("module", "account"),
                ("action", "txlist"),
                ("address", address.as_str()),
                ("startblock", "0"),
                ("endblock", "99999999"),
                ("page", "1"),
                ("offset", offset.as_str()),
                ("sort", "desc"),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    HistoryError::Unreachable(format!("request timed out: {e}"))
                } else if e.is_connect() {
                    HistoryError::Unreachable(format!("connection failed: {e}"))
                } else {
                    HistoryError::RequestFailed(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(HistoryError::RequestFailed(format!(
                "HTTP status {}",
                response.status()
            )));
        }

        let body: TxListResponse = response.json().await.map_err(|e| {
            HistoryError::InvalidResponse(format!("failed to parse txlist response: {e}"))
        })?;

        parse_response(body, limit)
    }
}

fn parse_response(body: TxListResponse, limit: usize) -> Result<Vec<TransactionRecord>, HistoryError> {
    if body.status != "1" {
        if body.message == NO_TRANSACTIONS {
            return Ok(Vec::new());
        }
        let detail = body.result.as_str().unwrap_or(&body.message).to_string();
        return Err(HistoryError::Rejected(detail));
    }

    let raw: Vec<RawTransaction> = serde_json::from_value(body.result)
        .map_err(|e| HistoryError::InvalidResponse(format!("result is not a transaction list: {e}")))?;

    raw.into_iter().take(limit).map(to_record).collect()
}

fn to_record(raw: RawTransaction) -> Result<TransactionRecord, HistoryError> {
    let invalid = |field: &str, value: &str| {
        HistoryError::InvalidResponse(format!("bad {field} in transaction: {value}"))
    };
    let hash: TxHash = raw.hash.parse().map_err(|_| invalid("hash", &raw.hash))?;
    let from = parse_address(&raw.from).map_err(|_| invalid("from", &raw.from))?;
    let to = if raw.to.is_empty() {
        None
    } else {
        Some(parse_address(&raw.to).map_err(|_| invalid("to", &raw.to))?)
    };
    let value = U256::from_str_radix(&raw.value, 10).map_err(|_| invalid("value", &raw.value))?;
    let secs: u64 = raw
        .time_stamp
        .parse()
        .map_err(|_| invalid("timeStamp", &raw.time_stamp))?;

    Ok(TransactionRecord {
        hash,
        from,
        to,
        value,
        timestamp: Timestamp::new(secs),
    })
}
