use anyhow::Result;
use greeter_core::config::GreeterConfig;
use greeter_solana_client::Route;
use tracing::info;

use crate::output;
use crate::solana::tx::TxPlan;

pub async fn run(cfg: &GreeterConfig, route: Route, dry_run: bool) -> Result<()> {
    let orchestrator = super::orchestrator(cfg)?;

    if dry_run {
        orchestrator.establish_connection().await?;
        let plan = orchestrator.prepare(route).await?;
        let tx = TxPlan::from_route_plan(&plan);
        info!(route = route.as_str(), plan = %tx.describe(), "dry run, nothing submitted");
        return output::print(&tx);
    }

    let pb = output::spinner()?;
    pb.set_message(format!("greeting via {} on {}", route.as_str(), cfg.rpc_url));
    let result = orchestrator.run(route).await;
    pb.finish_and_clear();

    let report = result?;
    output::print(&report)?;
    Ok(())
}
