//! Account discovery and signer acquisition.

use nexus_types::{parse_address, Address};
use serde_json::Value;
use std::sync::Arc;

use crate::eip1193::Eip1193;
use crate::error::ProviderError;

/// Entry point to the wallet provider.
///
/// Holds the provider if one was injected; a client built with
/// [`LedgerClient::without_provider`] fails every call with
/// [`ProviderError::Unavailable`].
pub struct LedgerClient<P> {
    provider: Option<Arc<P>>,
}

/// Capability to authorize transactions as one account on one chain.
///
/// Obtained fresh per binding: the provider may have rotated its account or
/// network since the last one was handed out.
pub struct SignerHandle<P> {
    address: Address,
    chain_id: u64,
    provider: Arc<P>,
}

impl<P> Clone for SignerHandle<P> {
    fn clone(&self) -> Self {
        Self {
            address: self.address,
            chain_id: self.chain_id,
            provider: Arc::clone(&self.provider),
        }
    }
}

impl<P> SignerHandle<P> {
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }
}

impl<P: Eip1193> LedgerClient<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// A client for an environment with no wallet installed.
    pub fn without_provider() -> Self {
        Self { provider: None }
    }

    fn provider(&self) -> Result<&Arc<P>, ProviderError> {
        self.provider
            .as_ref()
            .ok_or_else(|| ProviderError::Unavailable("no wallet provider configured".into()))
    }

    /// Ask the wallet for account access and return the selected account.
    pub async fn connect(&self) -> Result<Address, ProviderError> {
        let provider = self.provider()?;
        let result = provider
            .request("eth_requestAccounts", Value::Array(vec![]))
            .await?;
        let account = first_account(result)?;
        tracing::info!(account = %account, "wallet connected");
        Ok(account)
    }

    /// Obtain a signer for the account the provider currently exposes.
    pub async fn get_signer(&self) -> Result<SignerHandle<P>, ProviderError> {
        let provider = self.provider()?;
        let address = first_account(provider.request("eth_accounts", Value::Array(vec![])).await?)?;
        let chain_id = parse_quantity(&provider.request("eth_chainId", Value::Array(vec![])).await?)?;
        tracing::debug!(account = %address, chain_id, "signer acquired");
        Ok(SignerHandle {
            address,
            chain_id,
            provider: Arc::clone(provider),
        })
    }
}

fn first_account(value: Value) -> Result<Address, ProviderError> {
    let accounts = value
        .as_array()
        .ok_or_else(|| ProviderError::InvalidResponse(format!("expected account list, got {value}")))?;
    let first = accounts.first().ok_or(ProviderError::NoAccounts)?;
    let raw = first
        .as_str()
        .ok_or_else(|| ProviderError::InvalidResponse(format!("account is not a string: {first}")))?;
    parse_address(raw).map_err(|e| ProviderError::InvalidResponse(e.to_string()))
}

/// Parse a `0x`-prefixed hex quantity such as a chain id.
pub fn parse_quantity(value: &Value) -> Result<u64, ProviderError> {
    let raw = value
        .as_str()
        .ok_or_else(|| ProviderError::InvalidResponse(format!("expected hex quantity, got {value}")))?;
    let digits = raw
        .strip_prefix("0x")
        .ok_or_else(|| ProviderError::InvalidResponse(format!("quantity missing 0x prefix: {raw}")))?;
    u64::from_str_radix(digits, 16)
        .map_err(|e| ProviderError::InvalidResponse(format!("bad quantity {raw}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    /// Replays canned responses keyed by method name.
    struct Canned {
        responses: Mutex<Vec<(&'static str, Result<Value, ProviderError>)>>,
    }

    impl Canned {
        fn new(responses: Vec<(&'static str, Result<Value, ProviderError>)>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses),
            })
        }
    }

    impl Eip1193 for Canned {
        async fn request(&self, method: &str, _params: Value) -> Result<Value, ProviderError> {
            let mut responses = self.responses.lock().unwrap();
            let idx = responses
                .iter()
                .position(|(m, _)| *m == method)
                .unwrap_or_else(|| panic!("unexpected method {method}"));
            responses.remove(idx).1
        }
    }

    const ACCOUNT: &str = "0x00000000000000000000000000000000000000aa";

    #[tokio::test]
    async fn connect_returns_first_account() {
        let provider = Canned::new(vec![(
            "eth_requestAccounts",
            Ok(json!([ACCOUNT, "0x00000000000000000000000000000000000000bb"])),
        )]);
        let client = LedgerClient::new(provider);
        let account = client.connect().await.unwrap();
        assert_eq!(account, parse_address(ACCOUNT).unwrap());
    }

    #[tokio::test]
    async fn connect_without_provider() {
        let client = LedgerClient::<Canned>::without_provider();
        let err = client.connect().await.unwrap_err();
        assert!(matches!(err, ProviderError::Unavailable(_)));
    }

    #[tokio::test]
    async fn connect_rejected_by_user() {
        let provider = Canned::new(vec![("eth_requestAccounts", Err(ProviderError::UserRejected))]);
        let err = LedgerClient::new(provider).connect().await.unwrap_err();
        assert_eq!(err, ProviderError::UserRejected);
    }

    #[tokio::test]
    async fn connect_with_empty_account_list() {
        let provider = Canned::new(vec![("eth_requestAccounts", Ok(json!([])))]);
        let err = LedgerClient::new(provider).connect().await.unwrap_err();
        assert_eq!(err, ProviderError::NoAccounts);
    }

    #[tokio::test]
    async fn signer_reads_account_and_chain() {
        let provider = Canned::new(vec![
            ("eth_accounts", Ok(json!([ACCOUNT]))),
            ("eth_chainId", Ok(json!("0xaa36a7"))),
        ]);
        let signer = LedgerClient::new(provider).get_signer().await.unwrap();
        assert_eq!(signer.address(), parse_address(ACCOUNT).unwrap());
        assert_eq!(signer.chain_id(), 11_155_111);
    }

    #[test]
    fn quantity_parsing() {
        assert_eq!(parse_quantity(&json!("0x1")).unwrap(), 1);
        assert!(parse_quantity(&json!("1")).is_err());
        assert!(parse_quantity(&json!(1)).is_err());
    }
}
