//! Greeting state readback.

use std::fmt::Display;

use greeter_core::state::GreetingAccount;
use serde::Serializer;
use solana_sdk::pubkey::Pubkey;
use tracing::info;

use crate::context::GreeterContext;
use crate::error::{GreeterError, Result};
use crate::rpc::RpcGateway;

/// Fetch and decode the greeting account at `address`.
pub async fn read_greeting<R: RpcGateway>(
    ctx: &GreeterContext<R>,
    address: &Pubkey,
) -> Result<GreetingAccount> {
    let account = ctx
        .query("getAccountInfo", ctx.rpc().get_account(address))
        .await?
        .ok_or(GreeterError::AccountNotFound(*address))?;
    GreetingAccount::from_bytes(&account.data).map_err(GreeterError::Decoding)
}

/// Number of times `address` has been greeted.
pub async fn read_counter<R: RpcGateway>(ctx: &GreeterContext<R>, address: &Pubkey) -> Result<u32> {
    let greeting = read_greeting(ctx, address).await?;
    info!(%address, counter = greeting.counter, "has been greeted");
    Ok(greeting.counter)
}

pub(crate) fn serialize_display<T: Display, S: Serializer>(
    value: &T,
    s: S,
) -> std::result::Result<S::Ok, S::Error> {
    s.collect_str(value)
}

pub(crate) fn serialize_display_opt<T: Display, S: Serializer>(
    value: &Option<T>,
    s: S,
) -> std::result::Result<S::Ok, S::Error> {
    match value {
        Some(v) => s.collect_str(v),
        None => s.serialize_none(),
    }
}
