//! Client configuration with TOML file support.

use nexus_types::{parse_address, Address, CandidateId, NetworkId};
use nexus_utils::LogFormat;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;

/// Configuration for the voting client.
///
/// Can be loaded from a TOML file via [`ClientConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Which network the contract is deployed on.
    #[serde(default = "default_network")]
    pub network: NetworkId,

    /// JSON-RPC endpoint of the wallet provider. `None` means no wallet is
    /// installed.
    #[serde(default)]
    pub provider_url: Option<String>,

    /// Address of the deployed voting contract.
    #[serde(default)]
    pub contract_address: String,

    /// Transaction-list API; defaults to the network's explorer API.
    #[serde(default)]
    pub history_api_url: Option<String>,

    /// API key for the history service.
    #[serde(default)]
    pub history_api_key: String,

    /// How many transactions the activity feed shows.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Interval between confirmation polls, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Attempts at re-reading candidates after a confirmed vote.
    #[serde(default = "default_refresh_attempts")]
    pub refresh_attempts: u32,

    /// How long the "confirmed" status stays up, in seconds.
    #[serde(default = "default_confirmed_status_hold_secs")]
    pub confirmed_status_hold_secs: u64,

    /// Port of the static backend health endpoint.
    #[serde(default = "default_backend_port")]
    pub backend_port: u16,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Display metadata keyed by candidate id (`[candidates.1]`).
    #[serde(default)]
    pub candidates: BTreeMap<String, CandidateMeta>,
}

/// Presentation-only decoration for a candidate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateMeta {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
}

/// Runtime knobs the controller needs, derived from [`ClientConfig`].
#[derive(Clone, Debug)]
pub struct SessionSettings {
    pub contract_address: Address,
    pub network: NetworkId,
    pub history_limit: usize,
    pub poll_interval: Duration,
    pub refresh_attempts: u32,
    pub refresh_backoff: Duration,
    pub confirmed_status_hold: Duration,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_network() -> NetworkId {
    NetworkId::Sepolia
}

fn default_history_limit() -> usize {
    5
}

fn default_poll_interval_ms() -> u64 {
    2_000
}

fn default_refresh_attempts() -> u32 {
    3
}

fn default_confirmed_status_hold_secs() -> u64 {
    5
}

fn default_backend_port() -> u16 {
    3001
}

fn default_log_level() -> String {
    "info".to_string()
}

/// First delay between post-vote refresh attempts.
const DEFAULT_REFRESH_BACKOFF: Duration = Duration::from_millis(500);

// ── Impl ───────────────────────────────────────────────────────────────

impl ClientConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// History API base URL, falling back to the network's explorer.
    pub fn history_api_url(&self) -> &str {
        self.history_api_url
            .as_deref()
            .unwrap_or_else(|| self.network.history_api_url())
    }

    /// Display metadata for a candidate, if configured.
    pub fn candidate_meta(&self, id: CandidateId) -> Option<&CandidateMeta> {
        self.candidates.get(&id.get().to_string())
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        parse_address(&self.contract_address)
            .map_err(|e| ConfigError::Invalid(format!("contract_address: {e}")))?;
        if self.history_limit == 0 {
            return Err(ConfigError::Invalid("history_limit must be at least 1".into()));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid("poll_interval_ms must be positive".into()));
        }
        if self.refresh_attempts == 0 {
            return Err(ConfigError::Invalid("refresh_attempts must be at least 1".into()));
        }
        for key in self.candidates.keys() {
            key.parse::<CandidateId>()
                .map_err(|e| ConfigError::Invalid(format!("candidates.{key}: {e}")))?;
        }
        Ok(())
    }

    /// Controller settings, validating the config on the way.
    pub fn session_settings(&self) -> Result<SessionSettings, ConfigError> {
        self.validate()?;
        let contract_address = parse_address(&self.contract_address)
            .map_err(|e| ConfigError::Invalid(format!("contract_address: {e}")))?;
        Ok(SessionSettings {
            contract_address,
            network: self.network,
            history_limit: self.history_limit,
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            refresh_attempts: self.refresh_attempts,
            refresh_backoff: DEFAULT_REFRESH_BACKOFF,
            confirmed_status_hold: Duration::from_secs(self.confirmed_status_hold_secs),
        })
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
            provider_url: None,
            contract_address: String::new(),
            history_api_url: None,
            history_api_key: String::new(),
            history_limit: default_history_limit(),
            poll_interval_ms: default_poll_interval_ms(),
            refresh_attempts: default_refresh_attempts(),
            confirmed_status_hold_secs: default_confirmed_status_hold_secs(),
            backend_port: default_backend_port(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            candidates: BTreeMap::new(),
        }
    }
}

impl SessionSettings {
    /// Settings for `contract_address` with every other value at its default.
    pub fn for_contract(contract_address: Address) -> Self {
        Self {
            contract_address,
            network: default_network(),
            history_limit: default_history_limit(),
            poll_interval: Duration::from_millis(default_poll_interval_ms()),
            refresh_attempts: default_refresh_attempts(),
            refresh_backoff: DEFAULT_REFRESH_BACKOFF,
            confirmed_status_hold: Duration::from_secs(default_confirmed_status_hold_secs()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

    #[test]
    fn defaults_match_deployed_client() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.network, NetworkId::Sepolia);
        assert_eq!(cfg.history_limit, 5);
        assert_eq!(cfg.confirmed_status_hold_secs, 5);
        assert_eq!(cfg.backend_port, 3001);
        assert_eq!(cfg.history_api_url(), "https://api-sepolia.etherscan.io/api");
    }

    #[test]
    fn parse_full_file() {
        let toml = format!(
            r#"
network = "mainnet"
provider_url = "http://127.0.0.1:8545"
contract_address = "{CONTRACT}"
history_api_key = "KEY"
history_limit = 10
log_format = "json"

[candidates.1]
role = "AI OVERLORD"
image = "https://example.org/felix.svg"
description = "Replaces lecturers with AI."
"#
        );
        let cfg = ClientConfig::from_toml_str(&toml).unwrap();
        assert_eq!(cfg.network, NetworkId::Mainnet);
        assert_eq!(cfg.provider_url.as_deref(), Some("http://127.0.0.1:8545"));
        assert_eq!(cfg.history_limit, 10);
        assert_eq!(cfg.log_format, LogFormat::Json);
        let meta = cfg.candidate_meta(CandidateId::new(1).unwrap()).unwrap();
        assert_eq!(meta.role, "AI OVERLORD");
        assert!(cfg.candidate_meta(CandidateId::new(2).unwrap()).is_none());
        cfg.validate().unwrap();
    }

    #[test]
    fn missing_contract_fails_validation() {
        let cfg = ClientConfig::default();
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn bad_candidate_key_fails_validation() {
        let toml = format!(
            "contract_address = \"{CONTRACT}\"\n[candidates.zero]\nrole = \"x\"\n"
        );
        let cfg = ClientConfig::from_toml_str(&toml).unwrap();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn settings_derivation() {
        let cfg = ClientConfig {
            contract_address: CONTRACT.to_string(),
            poll_interval_ms: 250,
            ..Default::default()
        };
        let settings = cfg.session_settings().unwrap();
        assert_eq!(settings.poll_interval, Duration::from_millis(250));
        assert_eq!(settings.confirmed_status_hold, Duration::from_secs(5));
        assert_eq!(settings.contract_address, parse_address(CONTRACT).unwrap());
    }

    #[test]
    fn toml_roundtrip() {
        let cfg = ClientConfig {
            contract_address: CONTRACT.to_string(),
            ..Default::default()
        };
        let text = cfg.to_toml_string().unwrap();
        let back = ClientConfig::from_toml_str(&text).unwrap();
        assert_eq!(back.contract_address, CONTRACT);
        assert_eq!(back.history_limit, cfg.history_limit);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "contract_address = \"{CONTRACT}\"").unwrap();
        let cfg = ClientConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(cfg.contract_address, CONTRACT);
    }

    #[test]
    fn missing_file() {
        let err = ClientConfig::from_toml_file("/nonexistent/nexus.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
