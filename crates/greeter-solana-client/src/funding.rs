//! Payer funding.
//!
//! The payer must cover rent exemption for the greeting account plus a fee
//! budget. When it is short, the deficit is requested from the cluster faucet.
//! Clusters without a faucet end the run.

use greeter_core::state::GREETING_SIZE;
use serde::Serialize;
use tracing::{info, warn};

use crate::constants::LAMPORTS_PER_SOL;
use crate::context::GreeterContext;
use crate::error::{FundingError, GreeterError, Result};
use crate::rpc::RpcGateway;

#[derive(Debug, Clone, Serialize)]
pub struct FundingReport {
    pub balance: u64,
    pub required: u64,
    /// Lamports requested from the faucet, if any.
    pub topped_up: Option<u64>,
}

/// Rent for one greeting account plus `fee_signature_budget` signatures.
pub async fn estimate_cost<R: RpcGateway>(ctx: &GreeterContext<R>) -> Result<u64> {
    let payer = ctx.payer_pubkey();
    let (rent, per_signature) = tokio::try_join!(
        ctx.query(
            "getMinimumBalanceForRentExemption",
            ctx.rpc().get_minimum_balance_for_rent_exemption(GREETING_SIZE),
        ),
        ctx.query("getFeeForMessage", ctx.rpc().get_lamports_per_signature(&payer)),
    )?;
    Ok(rent.saturating_add(per_signature.saturating_mul(ctx.fee_signature_budget())))
}

/// Make sure the payer holds at least `estimated` lamports.
///
/// A sufficiently funded payer costs one balance read and nothing else.
pub async fn ensure_funded<R: RpcGateway>(
    ctx: &GreeterContext<R>,
    estimated: u64,
) -> Result<FundingReport> {
    let payer = ctx.payer_pubkey();
    let balance = ctx.query("getBalance", ctx.rpc().get_balance(&payer)).await?;

    if balance >= estimated {
        log_balance(ctx, balance);
        return Ok(FundingReport { balance, required: estimated, topped_up: None });
    }

    let deficit = estimated - balance;
    warn!(%payer, balance, required = estimated, deficit, "payer underfunded, requesting airdrop");

    let unavailable = |reason: String| -> GreeterError {
        FundingError::TopUpUnavailable { payer, deficit, reason }.into()
    };

    let signature = ctx
        .deadline("requestAirdrop", ctx.rpc().request_airdrop(&payer, deficit))
        .await?
        .map_err(|e| unavailable(e.to_string()))?;

    // The faucet accepted the request; a failure from here on is transport, not funding.
    ctx.await_confirmation("confirmTransaction", &signature)
        .await?
        .map_err(|e| GreeterError::Rpc {
            operation: "confirmTransaction",
            message: e.to_string(),
        })?;

    let balance = ctx.query("getBalance", ctx.rpc().get_balance(&payer)).await?;
    if balance < estimated {
        return Err(FundingError::StillShort { payer, balance, required: estimated }.into());
    }

    log_balance(ctx, balance);
    Ok(FundingReport { balance, required: estimated, topped_up: Some(deficit) })
}

fn log_balance<R: RpcGateway>(ctx: &GreeterContext<R>, balance: u64) {
    info!(
        payer = %ctx.payer_pubkey(),
        sol = balance as f64 / LAMPORTS_PER_SOL as f64,
        "using account to pay for fees"
    );
}
