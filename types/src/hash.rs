//! Transaction hash type.

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TypesError;

/// A 32-byte transaction hash as returned by the ledger.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(B256);

impl TxHash {
    pub const ZERO: Self = Self(B256::ZERO);

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(B256::new(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0 .0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == B256::ZERO
    }

    /// First eight hex characters after the prefix, for compact listings.
    pub fn short(&self) -> String {
        let full = self.to_string();
        format!("{}...", &full[..10])
    }
}

impl From<B256> for TxHash {
    fn from(value: B256) -> Self {
        Self(value)
    }
}

impl FromStr for TxHash {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        B256::from_str(s.trim())
            .map(Self)
            .map_err(|_| TypesError::InvalidHash(s.to_string()))
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxHash({})", self.short())
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_prefixed_lowercase_hex() {
        let hash = TxHash::new([0xab; 32]);
        let s = hash.to_string();
        assert!(s.starts_with("0xabab"));
        assert_eq!(s.len(), 66);
    }

    #[test]
    fn short_form() {
        let hash = TxHash::new([0x01; 32]);
        assert_eq!(hash.short(), "0x01010101...");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("0x1234".parse::<TxHash>().is_err());
    }

    #[test]
    fn serde_uses_hex_string() {
        let hash = TxHash::new([0x02; 32]);
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, format!("\"{hash}\""));
        let back: TxHash = serde_json::from_str(&json).unwrap();
        assert_eq!(back, hash);
    }
}
