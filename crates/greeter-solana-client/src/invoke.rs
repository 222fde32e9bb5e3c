//! Instruction construction and submission.
//!
//! None of the programs read instruction data: every instruction carries an
//! empty payload and the programs dispatch on the shape of the account list.
//! A misordered list is not caught here; the cluster rejects it with a
//! program error. The builders below are the single source of the orderings.
//!
//! Orderings:
//! - hello, called directly: `[hello (ro), greeting (w)]`
//! - invoker, which forwards to hello: `[hello (ro), greeting (w), authority (ro)]`

use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use tracing::info;

use crate::context::GreeterContext;
use crate::error::{Result, SubmissionError};
use crate::rpc::RpcGateway;

/// Accounts for a direct hello instruction.
pub fn hello_accounts(hello: &Pubkey, greeting: &Pubkey) -> Vec<AccountMeta> {
    vec![
        AccountMeta::new_readonly(*hello, false),
        AccountMeta::new(*greeting, false),
    ]
}

/// Accounts for an invoker instruction. The invoker passes the first two on to
/// hello and signs for `authority` itself.
pub fn invoker_accounts(hello: &Pubkey, greeting: &Pubkey, authority: &Pubkey) -> Vec<AccountMeta> {
    let mut accounts = hello_accounts(hello, greeting);
    accounts.push(AccountMeta::new_readonly(*authority, false));
    accounts
}

/// Build an instruction with an empty payload.
pub fn build_instruction(program_id: &Pubkey, accounts: Vec<AccountMeta>) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts,
        data: Vec::new(),
    }
}

/// Submit one instruction to `target` and wait for confirmation.
pub async fn invoke_direct<R: RpcGateway>(
    ctx: &GreeterContext<R>,
    target: &Pubkey,
    accounts: Vec<AccountMeta>,
) -> Result<Signature> {
    info!(program = %target, "saying hello");
    submit_one(ctx, target, accounts).await
}

/// Submit one instruction to an intermediary that re-dispatches to another
/// program using `forwarded`.
pub async fn invoke_chained<R: RpcGateway>(
    ctx: &GreeterContext<R>,
    entry: &Pubkey,
    forwarded: Vec<AccountMeta>,
) -> Result<Signature> {
    info!(program = %entry, accounts = forwarded.len(), "saying hello through invoker");
    submit_one(ctx, entry, forwarded).await
}

async fn submit_one<R: RpcGateway>(
    ctx: &GreeterContext<R>,
    program: &Pubkey,
    accounts: Vec<AccountMeta>,
) -> Result<Signature> {
    let ix = build_instruction(program, accounts);
    let signature = ctx
        .submit("sendAndConfirmTransaction", &[ix])
        .await?
        .map_err(|e| SubmissionError::Rejected {
            program: *program,
            reason: e.to_string(),
        })?;
    info!(%signature, "confirmed");
    Ok(signature)
}
