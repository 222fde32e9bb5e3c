use anyhow::Result;
use greeter_core::config::GreeterConfig;
use greeter_solana_client::registry::ProgramRegistry;
use greeter_solana_client::{GreeterContext, Orchestrator};
use solana_client::nonblocking::rpc_client::RpcClient;

use crate::args::{Cli, Command};
use crate::settings;
use crate::solana::client::SolanaClient;

mod derive;
mod doctor;
mod report;
mod run;

pub async fn dispatch(cli: Cli) -> Result<()> {
    match &cli.command {
        Command::Run { route, dry_run } => run::run(&settings::resolve(&cli)?, *route, *dry_run).await,
        Command::Derive => derive::run(&settings::resolve(&cli)?).await,
        Command::Report { route } => report::run(&settings::resolve(&cli)?, *route).await,
        Command::Doctor { offline } => doctor::run(&cli, *offline).await,
    }
}

/// Orchestrator over a live RPC connection.
fn orchestrator(cfg: &GreeterConfig) -> Result<Orchestrator<RpcClient>> {
    let client = SolanaClient::new(cfg)?;
    let ctx = GreeterContext::from_config(client.connect(), cfg)?;
    Ok(Orchestrator::new(ctx, ProgramRegistry::new(cfg)))
}
