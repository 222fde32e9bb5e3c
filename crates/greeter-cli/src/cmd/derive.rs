use anyhow::Result;
use greeter_core::config::GreeterConfig;
use greeter_solana_client::context::load_keypair;
use greeter_solana_client::pda::{derive_all, GreeterAddresses};
use greeter_solana_client::registry::{ProgramKind, ProgramRegistry};
use serde::Serialize;
use solana_sdk::signature::Signer;

use crate::output;

#[derive(Debug, Serialize)]
pub struct DeriveOut {
    pub payer: String,
    pub hello: String,
    pub invoker: String,
    #[serde(flatten)]
    pub addresses: GreeterAddresses,
}

/// Derive from local keypair files only; no RPC call is made.
pub async fn run(cfg: &GreeterConfig) -> Result<()> {
    let payer = load_keypair(&cfg.keypair_path)?.pubkey();
    let registry = ProgramRegistry::new(cfg);
    let hello = registry.resolve(ProgramKind::Hello)?.id;
    let invoker = registry.resolve(ProgramKind::Invoker)?.id;

    let addresses = derive_all(&payer, &hello, &invoker)?;
    output::print(&DeriveOut {
        payer: payer.to_string(),
        hello: hello.to_string(),
        invoker: invoker.to_string(),
        addresses,
    })?;
    Ok(())
}
