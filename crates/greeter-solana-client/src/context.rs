//! Explicit run context.
//!
//! A [`GreeterContext`] owns the RPC connection, the funding identity and the
//! deadlines. It is passed by reference into every step; there is no ambient
//! connection or payer.

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use greeter_core::config::GreeterConfig;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{read_keypair_file, Keypair, Signature, Signer};
use solana_sdk::transaction::Transaction;
use tracing::debug;

use crate::error::{ConfigurationError, GreeterError, Result};
use crate::rpc::{RpcGateway, RpcResult};

pub struct GreeterContext<R> {
    rpc: R,
    rpc_url: String,
    payer: Keypair,
    timeout: Duration,
    poll_interval: Duration,
    fee_signature_budget: u64,
}

impl<R: RpcGateway> GreeterContext<R> {
    pub fn new(rpc: R, rpc_url: impl Into<String>, payer: Keypair) -> Self {
        let limits = GreeterConfig::default().limits;
        Self {
            rpc,
            rpc_url: rpc_url.into(),
            payer,
            timeout: Duration::from_millis(limits.timeout_ms),
            poll_interval: Duration::from_millis(limits.confirm_poll_ms),
            fee_signature_budget: limits.fee_signature_budget,
        }
    }

    /// Build a context from config, loading the payer from `cfg.keypair_path`.
    pub fn from_config(rpc: R, cfg: &GreeterConfig) -> Result<Self> {
        greeter_core::config::validate_config(cfg)
            .map_err(|e| ConfigurationError::Invalid(e.to_string()))?;
        let payer = load_keypair(&cfg.keypair_path)?;
        Ok(Self::new(rpc, cfg.rpc_url.clone(), payer)
            .with_timeout(Duration::from_millis(cfg.limits.timeout_ms))
            .with_poll_interval(Duration::from_millis(cfg.limits.confirm_poll_ms))
            .with_fee_signature_budget(cfg.limits.fee_signature_budget))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_fee_signature_budget(mut self, signatures: u64) -> Self {
        self.fee_signature_budget = signatures;
        self
    }

    pub fn rpc(&self) -> &R {
        &self.rpc
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    pub fn payer(&self) -> &Keypair {
        &self.payer
    }

    pub fn payer_pubkey(&self) -> Pubkey {
        self.payer.pubkey()
    }

    pub fn fee_signature_budget(&self) -> u64 {
        self.fee_signature_budget
    }

    /// Run `fut` under the context deadline.
    pub async fn deadline<F: Future>(&self, operation: &'static str, fut: F) -> Result<F::Output> {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| GreeterError::Timeout { operation, timeout: self.timeout })
    }

    /// Run a read-only query under the deadline, mapping transport failures to `Rpc`.
    pub async fn query<T, F>(&self, operation: &'static str, fut: F) -> Result<T>
    where
        F: Future<Output = RpcResult<T>>,
    {
        self.deadline(operation, fut).await?.map_err(|e| GreeterError::Rpc {
            operation,
            message: e.to_string(),
        })
    }

    /// Poll until `signature` is confirmed or the deadline passes.
    pub async fn await_confirmation(
        &self,
        operation: &'static str,
        signature: &Signature,
    ) -> Result<RpcResult<()>> {
        self.deadline(operation, async {
            loop {
                match self.rpc.confirm_transaction(signature).await {
                    Ok(true) => return Ok(()),
                    Ok(false) => {
                        debug!(%signature, "awaiting confirmation");
                        tokio::time::sleep(self.poll_interval).await;
                    }
                    Err(e) => return Err(e),
                }
            }
        })
        .await
    }

    /// Sign `instructions` with the payer and submit them as one transaction.
    ///
    /// The outer `Result` carries timeouts; the inner one the node's verdict,
    /// which callers map to their own failure class.
    pub async fn submit(
        &self,
        operation: &'static str,
        instructions: &[Instruction],
    ) -> Result<RpcResult<Signature>> {
        self.deadline(operation, async {
            let blockhash = self.rpc.get_latest_blockhash().await?;
            let tx = Transaction::new_signed_with_payer(
                instructions,
                Some(&self.payer.pubkey()),
                &[&self.payer],
                blockhash,
            );
            self.rpc.send_and_confirm_transaction(&tx).await
        })
        .await
    }
}

/// Load a keypair file (JSON array of 64 bytes, as written by `solana-keygen`).
pub fn load_keypair(path: &Path) -> Result<Keypair> {
    read_keypair_file(path).map_err(|e| {
        ConfigurationError::KeypairNotFound {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
        .into()
    })
}
