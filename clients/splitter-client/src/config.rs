use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

use crate::{
    constants::{DEFAULT_PROGRAM_ID, DEFAULT_RECIPIENT_FUNDING_LAMPORTS},
    errors::{Result, SplitterError},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cluster {
    MainnetBeta,
    Testnet,
    Devnet,
    Localnet,
}

impl Cluster {
    /// Guess the cluster from an RPC url; unknown hosts count as mainnet
    pub fn from_rpc_url(rpc_url: &str) -> Self {
        let url = rpc_url.to_lowercase();
        if url.contains("devnet") {
            Cluster::Devnet
        } else if url.contains("testnet") {
            Cluster::Testnet
        } else if url.contains("localhost") || url.contains("127.0.0.1") {
            Cluster::Localnet
        } else {
            Cluster::MainnetBeta
        }
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Cluster::MainnetBeta => "mainnet-beta",
            Cluster::Testnet => "testnet",
            Cluster::Devnet => "devnet",
            Cluster::Localnet => "localnet",
        };
        f.write_str(name)
    }
}

/// Client settings, usually loaded from the host application's JSON config
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Base58 program id
    #[serde(default = "default_program_id")]
    pub program_id: String,
    #[serde(default)]
    pub network: Option<Cluster>,
    /// Only used to infer the cluster; the connection is owned by the host
    #[serde(default)]
    pub rpc_url: Option<String>,
    /// Lamports sent to bring a missing recipient wallet into existence
    #[serde(default = "default_recipient_funding")]
    pub recipient_funding_lamports: u64,
}

fn default_program_id() -> String {
    DEFAULT_PROGRAM_ID.to_string()
}

fn default_recipient_funding() -> u64 {
    DEFAULT_RECIPIENT_FUNDING_LAMPORTS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            program_id: default_program_id(),
            network: None,
            rpc_url: None,
            recipient_funding_lamports: default_recipient_funding(),
        }
    }
}

impl ClientConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| SplitterError::Config(e.to_string()))?;
        config.program_id()?;
        Ok(config)
    }

    pub fn program_id(&self) -> Result<Pubkey> {
        Pubkey::from_str(self.program_id.trim()).map_err(|_| {
            SplitterError::Config(format!("program id {:?} is not a valid key", self.program_id))
        })
    }

    /// Explicit network, else inferred from the RPC url
    pub fn cluster(&self) -> Option<Cluster> {
        self.network
            .or_else(|| self.rpc_url.as_deref().map(Cluster::from_rpc_url))
    }
}
