//! Configuration structures for greeter.
//!
//! This module defines explicit, serializable configuration objects that the
//! client context and the CLI are built from.
//!
//! The core crate itself does not read environment variables. Layering of
//! flags, environment and config files is done by the caller; the result is a
//! plain [`GreeterConfig`] value that is passed down explicitly.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{CoreError, CoreResult};

pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8899";
pub const DEFAULT_PROGRAM_DIR: &str = "dist/program";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GreeterConfig {
    pub rpc_url: String,
    /// Funding identity keypair file.
    pub keypair_path: PathBuf,
    /// Directory holding program keypairs and shared objects.
    pub program_dir: PathBuf,
    pub commitment: Commitment,
    pub programs: ProgramPaths,
    pub limits: LimitsConfig,
}

impl Default for GreeterConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            keypair_path: PathBuf::from("id.json"),
            program_dir: PathBuf::from(DEFAULT_PROGRAM_DIR),
            commitment: Commitment::Confirmed,
            programs: ProgramPaths::default(),
            limits: LimitsConfig::default(),
        }
    }
}

impl GreeterConfig {
    /// Load a JSON config file. Missing fields fall back to defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| CoreError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| CoreError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Keypair and shared-object file names of one on-chain program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramFiles {
    pub keypair: String,
    pub artifact: String,
}

impl ProgramFiles {
    fn named(stem: &str) -> Self {
        Self {
            keypair: format!("{stem}-keypair.json"),
            artifact: format!("{stem}.so"),
        }
    }
}

/// File names of every program the greeter talks to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgramPaths {
    pub hello: ProgramFiles,
    pub invoker: ProgramFiles,
    pub invoker1: ProgramFiles,
}

impl Default for ProgramPaths {
    fn default() -> Self {
        Self {
            hello: ProgramFiles::named("helloworld"),
            invoker: ProgramFiles::named("invoker"),
            invoker1: ProgramFiles::named("invoker1"),
        }
    }
}

/// Timeouts and fee budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Deadline applied to every network suspension point.
    pub timeout_ms: u64,
    /// Interval between confirmation polls.
    pub confirm_poll_ms: u64,
    /// Number of signatures the payer must be able to afford on top of rent.
    pub fee_signature_budget: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 60_000,
            confirm_poll_ms: 500,
            fee_signature_budget: 100,
        }
    }
}

/// Commitment level used for queries and confirmations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    Confirmed,
    Finalized,
}

impl Commitment {
    pub fn parse(s: &str) -> CoreResult<Self> {
        match s {
            "processed" => Ok(Self::Processed),
            "confirmed" => Ok(Self::Confirmed),
            "finalized" => Ok(Self::Finalized),
            _ => Err(CoreError::invalid_argument(format!("unsupported commitment: {s}"))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processed => "processed",
            Self::Confirmed => "confirmed",
            Self::Finalized => "finalized",
        }
    }
}

/// Validate a full configuration object.
pub fn validate_config(cfg: &GreeterConfig) -> CoreResult<()> {
    if cfg.rpc_url.trim().is_empty() {
        return Err(CoreError::invalid_argument("rpc_url must not be empty"));
    }

    if cfg.keypair_path.as_os_str().is_empty() {
        return Err(CoreError::invalid_argument("keypair_path must not be empty"));
    }

    if cfg.limits.timeout_ms == 0 {
        return Err(CoreError::invalid_argument("timeout_ms must be greater than zero"));
    }

    if cfg.limits.confirm_poll_ms == 0 {
        return Err(CoreError::invalid_argument(
            "confirm_poll_ms must be greater than zero",
        ));
    }

    if cfg.limits.confirm_poll_ms > cfg.limits.timeout_ms {
        return Err(CoreError::invalid_argument(
            "confirm_poll_ms must not exceed timeout_ms",
        ));
    }

    Ok(())
}
