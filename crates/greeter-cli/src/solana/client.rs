use std::time::Duration;

use anyhow::{anyhow, Result};
use greeter_core::config::{Commitment, GreeterConfig};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;

/// Expand a cluster moniker to its public RPC URL. Anything else must already be a URL.
pub fn resolve_cluster_url(s: &str) -> Result<String> {
    let s = s.trim();
    if s.is_empty() {
        return Err(anyhow!("cluster must not be empty"));
    }
    let url = match s {
        "localnet" | "localhost" => "http://127.0.0.1:8899",
        "devnet" => "https://api.devnet.solana.com",
        "testnet" => "https://api.testnet.solana.com",
        "mainnet-beta" => "https://api.mainnet-beta.solana.com",
        other if other.starts_with("http://") || other.starts_with("https://") => other,
        other => {
            return Err(anyhow!(
                "unknown cluster {other:?}: expected a URL or one of localnet, devnet, testnet, mainnet-beta"
            ))
        }
    };
    Ok(url.to_string())
}

pub fn commitment_config(commitment: Commitment) -> CommitmentConfig {
    match commitment {
        Commitment::Processed => CommitmentConfig::processed(),
        Commitment::Confirmed => CommitmentConfig::confirmed(),
        Commitment::Finalized => CommitmentConfig::finalized(),
    }
}

#[derive(Debug, Clone)]
pub struct SolanaClient {
    pub url: String,
    pub commitment: Commitment,
    pub timeout: Duration,
}

impl SolanaClient {
    pub fn new(cfg: &GreeterConfig) -> Result<Self> {
        Ok(Self {
            url: resolve_cluster_url(&cfg.rpc_url)?,
            commitment: cfg.commitment,
            timeout: Duration::from_millis(cfg.limits.timeout_ms),
        })
    }

    pub fn connect(&self) -> RpcClient {
        RpcClient::new_with_timeout_and_commitment(
            self.url.clone(),
            self.timeout,
            commitment_config(self.commitment),
        )
    }
}
