//! Program resolution and deployment checks.
//!
//! A program id is the public key of the keypair `solana program deploy`
//! used. Resolution reads that file; verification asks the cluster whether an
//! executable account lives at the id.

use std::path::{Path, PathBuf};

use greeter_core::config::{GreeterConfig, ProgramFiles};
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signer;
use tracing::{debug, info};

use crate::context::{load_keypair, GreeterContext};
use crate::error::{DeploymentError, GreeterError, Result};
use crate::rpc::RpcGateway;

/// The on-chain programs the greeter knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgramKind {
    Hello,
    Invoker,
    Invoker1,
}

impl ProgramKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hello => "hello",
            Self::Invoker => "invoker",
            Self::Invoker1 => "invoker1",
        }
    }
}

/// A resolved, not necessarily deployed, program.
#[derive(Debug, Clone, Serialize)]
pub struct ProgramHandle {
    pub kind: ProgramKind,
    #[serde(serialize_with = "crate::report::serialize_display")]
    pub id: Pubkey,
    pub keypair_path: PathBuf,
    /// Shared object that `solana program deploy` expects.
    pub artifact_path: PathBuf,
}

impl ProgramHandle {
    /// Resolve a program id from its keypair file.
    pub fn resolve(kind: ProgramKind, keypair_path: &Path, artifact_path: &Path) -> Result<Self> {
        let keypair = load_keypair(keypair_path)?;
        let id = keypair.pubkey();
        debug!(program = kind.as_str(), %id, path = %keypair_path.display(), "resolved program id");
        Ok(Self {
            kind,
            id,
            keypair_path: keypair_path.to_path_buf(),
            artifact_path: artifact_path.to_path_buf(),
        })
    }

    fn deploy_hint(&self) -> String {
        if self.artifact_path.exists() {
            format!(
                "deploy it with `solana program deploy {}`",
                self.artifact_path.display()
            )
        } else {
            format!(
                "build it and deploy {} with `solana program deploy`",
                self.artifact_path.display()
            )
        }
    }
}

/// Resolves programs from the configured program directory.
#[derive(Debug, Clone)]
pub struct ProgramRegistry {
    program_dir: PathBuf,
    hello: ProgramFiles,
    invoker: ProgramFiles,
    invoker1: ProgramFiles,
}

impl ProgramRegistry {
    pub fn new(cfg: &GreeterConfig) -> Self {
        Self {
            program_dir: cfg.program_dir.clone(),
            hello: cfg.programs.hello.clone(),
            invoker: cfg.programs.invoker.clone(),
            invoker1: cfg.programs.invoker1.clone(),
        }
    }

    pub fn files(&self, kind: ProgramKind) -> (PathBuf, PathBuf) {
        let files = match kind {
            ProgramKind::Hello => &self.hello,
            ProgramKind::Invoker => &self.invoker,
            ProgramKind::Invoker1 => &self.invoker1,
        };
        (
            self.program_dir.join(&files.keypair),
            self.program_dir.join(&files.artifact),
        )
    }

    pub fn resolve(&self, kind: ProgramKind) -> Result<ProgramHandle> {
        let (keypair, artifact) = self.files(kind);
        ProgramHandle::resolve(kind, &keypair, &artifact)
    }
}

/// Confirm that `handle` is deployed and executable. Read-only.
pub async fn verify_deployed<R: RpcGateway>(
    ctx: &GreeterContext<R>,
    handle: &ProgramHandle,
) -> Result<()> {
    let account = ctx
        .query("getAccountInfo", ctx.rpc().get_account(&handle.id))
        .await?;

    match account {
        None => Err(GreeterError::from(DeploymentError::ProgramNotDeployed {
            name: handle.kind.as_str().to_string(),
            program: handle.id,
            hint: handle.deploy_hint(),
        })),
        Some(acc) if !acc.executable => Err(DeploymentError::ProgramNotExecutable {
            name: handle.kind.as_str().to_string(),
            program: handle.id,
        }
        .into()),
        Some(_) => {
            info!(program = handle.kind.as_str(), id = %handle.id, "using program");
            Ok(())
        }
    }
}
