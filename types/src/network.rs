//! Network identifier.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TypesError;

/// Which EVM network the client talks to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkId {
    /// Ethereum mainnet.
    Mainnet,
    /// The Sepolia test network.
    Sepolia,
    /// The Holesky test network.
    Holesky,
}

impl NetworkId {
    /// EIP-155 chain id.
    pub fn chain_id(&self) -> u64 {
        match self {
            Self::Mainnet => 1,
            Self::Sepolia => 11_155_111,
            Self::Holesky => 17_000,
        }
    }

    /// Human-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Sepolia => "sepolia",
            Self::Holesky => "holesky",
        }
    }

    /// Base URL of the block explorer's transaction-list API.
    pub fn history_api_url(&self) -> &'static str {
        match self {
            Self::Mainnet => "https://api.etherscan.io/api",
            Self::Sepolia => "https://api-sepolia.etherscan.io/api",
            Self::Holesky => "https://api-holesky.etherscan.io/api",
        }
    }

    /// Base URL of the block explorer's web front end.
    pub fn explorer_url(&self) -> &'static str {
        match self {
            Self::Mainnet => "https://etherscan.io",
            Self::Sepolia => "https://sepolia.etherscan.io",
            Self::Holesky => "https://holesky.etherscan.io",
        }
    }

    /// Look a network up by chain id.
    pub fn from_chain_id(chain_id: u64) -> Option<Self> {
        [Self::Mainnet, Self::Sepolia, Self::Holesky]
            .into_iter()
            .find(|n| n.chain_id() == chain_id)
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NetworkId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mainnet" | "main" => Ok(Self::Mainnet),
            "sepolia" => Ok(Self::Sepolia),
            "holesky" => Ok(Self::Holesky),
            other => Err(TypesError::UnknownNetwork(other.to_string())),
        }
    }
}
