//! `wlink.toml` configuration.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use wlink::transfer::{Commitment, PollConfig};
use wlink::vault::VaultConfig;

/// Everything the CLI reads from its config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the sealed wallet lists.
    pub data_dir: PathBuf,
    /// Solana endpoint.
    pub solana: SolanaConfig,
    /// Ethereum endpoint.
    pub ethereum: EthereumConfig,
    /// Shared RPC settings.
    pub rpc: RpcConfig,
    /// Vault sealing options.
    pub vault: VaultConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolanaConfig {
    pub rpc_url: String,
    pub commitment: Commitment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EthereumConfig {
    pub rpc_url: String,
    pub chain_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RpcConfig {
    /// Appended to each `rpc_url` that ends in `/`, as Alchemy-style
    /// `.../v2/` endpoints expect.
    pub api_key: String,
    pub timeout_secs: u64,
    pub confirm_timeout_secs: u64,
    pub poll_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./wlink-data"),
            solana: SolanaConfig::default(),
            ethereum: EthereumConfig::default(),
            rpc: RpcConfig::default(),
            vault: VaultConfig::default(),
        }
    }
}

impl Default for SolanaConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://api.devnet.solana.com".to_string(),
            commitment: Commitment::Confirmed,
        }
    }
}

impl Default for EthereumConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://eth-sepolia.g.alchemy.com/v2/".to_string(),
            chain_id: 11_155_111,
        }
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            timeout_secs: 30,
            confirm_timeout_secs: 60,
            poll_interval_ms: 1500,
        }
    }
}

impl Config {
    /// Load from `path`, writing the defaults there first if it is missing.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save(path)?;
            tracing::info!(path = %path.display(), "wrote default config");
            return Ok(config);
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Write as TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).context("failed to create config directory")?;
        }
        let contents = toml::to_string_pretty(self).context("failed to serialize config")?;
        fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
    }

    /// `rpc_url` with the API key appended when it takes one.
    pub fn endpoint(&self, rpc_url: &str) -> String {
        if rpc_url.ends_with('/') {
            format!("{rpc_url}{}", self.rpc.api_key)
        } else {
            rpc_url.to_owned()
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc.timeout_secs)
    }

    pub fn poll(&self) -> PollConfig {
        PollConfig {
            timeout: Duration::from_secs(self.rpc.confirm_timeout_secs),
            interval: Duration::from_millis(self.rpc.poll_interval_ms),
        }
    }
}
