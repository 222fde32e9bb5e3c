//! Configuration resolution for the CLI.
//!
//! Highest wins: flags and `GREETER_*` environment (both parsed by clap),
//! then `--config`, then the Solana CLI config, then built-in defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use greeter_core::config::{validate_config, Commitment, GreeterConfig};
use serde::Deserialize;
use tracing::debug;

use crate::args::Cli;
use crate::io::input::{merge_json, read_json_file, read_yaml_file};
use crate::solana::client::resolve_cluster_url;

/// Values taken from the command line or the `GREETER_*` environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub url: Option<String>,
    pub keypair: Option<PathBuf>,
    pub program_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub timeout_ms: Option<u64>,
}

impl From<&Cli> for Overrides {
    fn from(cli: &Cli) -> Self {
        Self {
            url: cli.url.clone(),
            keypair: cli.keypair.clone(),
            program_dir: cli.program_dir.clone(),
            config: cli.config.clone(),
            timeout_ms: cli.timeout_ms,
        }
    }
}

/// The subset of `~/.config/solana/cli/config.yml` the greeter reads.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SolanaCliConfig {
    pub json_rpc_url: Option<String>,
    pub keypair_path: Option<String>,
    pub commitment: Option<String>,
}

impl SolanaCliConfig {
    pub fn default_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".config/solana/cli/config.yml"))
    }

    pub fn load(path: &Path) -> Result<Option<Self>> {
        read_yaml_file(path)
    }
}

/// Resolve the effective configuration for this invocation.
pub fn resolve(cli: &Cli) -> Result<GreeterConfig> {
    let solana_cli = match SolanaCliConfig::default_path() {
        Some(path) => SolanaCliConfig::load(&path)?,
        None => None,
    };
    resolve_with(&Overrides::from(cli), solana_cli.as_ref())
}

pub fn resolve_with(
    overrides: &Overrides,
    solana_cli: Option<&SolanaCliConfig>,
) -> Result<GreeterConfig> {
    let mut cfg = GreeterConfig {
        keypair_path: default_keypair_path(),
        ..GreeterConfig::default()
    };

    if let Some(sc) = solana_cli {
        if let Some(url) = &sc.json_rpc_url {
            cfg.rpc_url = url.clone();
        }
        if let Some(path) = &sc.keypair_path {
            cfg.keypair_path = expand_tilde(Path::new(path));
        }
        if let Some(c) = &sc.commitment {
            // Solana CLI also knows legacy levels such as "recent"; keep ours then.
            if let Ok(c) = Commitment::parse(c) {
                cfg.commitment = c;
            }
        }
    }

    if let Some(path) = &overrides.config {
        let mut merged = serde_json::to_value(&cfg)?;
        merge_json(&mut merged, read_json_file(path)?);
        cfg = serde_json::from_value(merged)
            .with_context(|| format!("invalid config file {}", path.display()))?;
    }

    if let Some(url) = &overrides.url {
        cfg.rpc_url = url.clone();
    }
    if let Some(path) = &overrides.keypair {
        cfg.keypair_path = path.clone();
    }
    if let Some(dir) = &overrides.program_dir {
        cfg.program_dir = dir.clone();
    }
    if let Some(ms) = overrides.timeout_ms {
        cfg.limits.timeout_ms = ms;
    }

    cfg.rpc_url = resolve_cluster_url(&cfg.rpc_url)?;
    cfg.keypair_path = expand_tilde(&cfg.keypair_path);
    cfg.program_dir = expand_tilde(&cfg.program_dir);
    validate_config(&cfg)?;

    debug!(url = %cfg.rpc_url, commitment = cfg.commitment.as_str(), keypair = %cfg.keypair_path.display(), program_dir = %cfg.program_dir.display(), "resolved configuration");
    Ok(cfg)
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}

fn default_keypair_path() -> PathBuf {
    match home_dir() {
        Some(home) => home.join(".config/solana/id.json"),
        None => PathBuf::from("id.json"),
    }
}

fn expand_tilde(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
