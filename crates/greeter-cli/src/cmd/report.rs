use anyhow::Result;
use greeter_core::config::GreeterConfig;
use greeter_solana_client::Route;
use serde::Serialize;

use crate::output;

#[derive(Debug, Serialize)]
pub struct ReportOut {
    pub route: Route,
    pub greeting: String,
    pub counter: u32,
}

pub async fn run(cfg: &GreeterConfig, route: Route) -> Result<()> {
    let orchestrator = super::orchestrator(cfg)?;
    let (greeting, counter) = orchestrator.report(route).await?;

    output::print(&ReportOut {
        route,
        greeting: greeting.to_string(),
        counter,
    })?;
    Ok(())
}
