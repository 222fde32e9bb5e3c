//! Greeting account provisioning.
//!
//! The greeting account lives at a seed-derived address, so creation goes
//! through `create_account_with_seed`; the runtime rejects the instruction if
//! the seed inputs do not reproduce the address. An existing account is left
//! untouched.

use serde::Serialize;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::system_instruction;
use tracing::info;

use crate::context::GreeterContext;
use crate::error::{ProvisioningError, Result};
use crate::pda::derive_seeded;
use crate::rpc::RpcGateway;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Provisioned {
    Created {
        #[serde(serialize_with = "crate::report::serialize_display")]
        signature: Signature,
        lamports: u64,
    },
    Existing,
}

impl Provisioned {
    pub fn created(&self) -> bool {
        matches!(self, Self::Created { .. })
    }
}

/// Make sure a `size`-byte account owned by `owner` exists at `address`.
///
/// `address` must equal `derive_seeded(payer, seed, owner)`.
pub async fn ensure_account<R: RpcGateway>(
    ctx: &GreeterContext<R>,
    address: &Pubkey,
    seed: &str,
    owner: &Pubkey,
    size: usize,
) -> Result<Provisioned> {
    let payer = ctx.payer_pubkey();
    let expected = derive_seeded(&payer, seed, owner)?;
    if expected != *address {
        return Err(ProvisioningError::AddressMismatch { address: *address, expected }.into());
    }

    if let Some(existing) = ctx
        .query("getAccountInfo", ctx.rpc().get_account(address))
        .await?
    {
        if existing.owner != *owner || existing.data.len() != size {
            return Err(ProvisioningError::Mismatch {
                address: *address,
                expected_owner: *owner,
                actual_owner: existing.owner,
                expected_size: size,
                actual_size: existing.data.len(),
            }
            .into());
        }
        return Ok(Provisioned::Existing);
    }

    info!(%address, "creating account to say hello to");
    let lamports = ctx
        .query(
            "getMinimumBalanceForRentExemption",
            ctx.rpc().get_minimum_balance_for_rent_exemption(size),
        )
        .await?;

    let ix = system_instruction::create_account_with_seed(
        &payer,
        address,
        &payer,
        seed,
        lamports,
        size as u64,
        owner,
    );

    let signature = ctx
        .submit("createAccountWithSeed", &[ix])
        .await?
        .map_err(|e| ProvisioningError::AccountCreation {
            address: *address,
            reason: e.to_string(),
        })?;

    info!(%address, %signature, lamports, size, "account created");
    Ok(Provisioned::Created { signature, lamports })
}
