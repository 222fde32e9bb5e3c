//! RPC seam.
//!
//! Every network interaction goes through [`RpcGateway`]. The production
//! implementation is the nonblocking Solana RPC client; tests plug in an
//! in-memory ledger.

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::account::Account;
use solana_sdk::hash::Hash;
use solana_sdk::message::Message;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;

pub type RpcError = Box<dyn std::error::Error + Send + Sync>;

pub type RpcResult<T> = std::result::Result<T, RpcError>;

#[async_trait]
pub trait RpcGateway: Send + Sync {
    /// Node software version.
    async fn get_version(&self) -> RpcResult<String>;

    async fn get_balance(&self, pubkey: &Pubkey) -> RpcResult<u64>;

    /// `None` when no account exists at `pubkey`.
    async fn get_account(&self, pubkey: &Pubkey) -> RpcResult<Option<Account>>;

    async fn get_minimum_balance_for_rent_exemption(&self, data_len: usize) -> RpcResult<u64>;

    /// Fee charged for one signature paid by `payer`.
    async fn get_lamports_per_signature(&self, payer: &Pubkey) -> RpcResult<u64>;

    async fn get_latest_blockhash(&self) -> RpcResult<Hash>;

    /// Ask the faucet for `lamports`. Fails on clusters without one.
    async fn request_airdrop(&self, pubkey: &Pubkey, lamports: u64) -> RpcResult<Signature>;

    /// `true` once `signature` reached the configured commitment.
    async fn confirm_transaction(&self, signature: &Signature) -> RpcResult<bool>;

    async fn send_and_confirm_transaction(&self, tx: &Transaction) -> RpcResult<Signature>;
}

#[async_trait]
impl RpcGateway for RpcClient {
    async fn get_version(&self) -> RpcResult<String> {
        let version = RpcClient::get_version(self).await?;
        Ok(version.solana_core)
    }

    async fn get_balance(&self, pubkey: &Pubkey) -> RpcResult<u64> {
        Ok(RpcClient::get_balance(self, pubkey).await?)
    }

    async fn get_account(&self, pubkey: &Pubkey) -> RpcResult<Option<Account>> {
        let response = self
            .get_account_with_commitment(pubkey, self.commitment())
            .await?;
        Ok(response.value)
    }

    async fn get_minimum_balance_for_rent_exemption(&self, data_len: usize) -> RpcResult<u64> {
        Ok(RpcClient::get_minimum_balance_for_rent_exemption(self, data_len).await?)
    }

    async fn get_lamports_per_signature(&self, payer: &Pubkey) -> RpcResult<u64> {
        // A payer-only message costs exactly one signature.
        let mut message = Message::new(&[], Some(payer));
        message.recent_blockhash = RpcClient::get_latest_blockhash(self).await?;
        Ok(self.get_fee_for_message(&message).await?)
    }

    async fn get_latest_blockhash(&self) -> RpcResult<Hash> {
        Ok(RpcClient::get_latest_blockhash(self).await?)
    }

    async fn request_airdrop(&self, pubkey: &Pubkey, lamports: u64) -> RpcResult<Signature> {
        Ok(RpcClient::request_airdrop(self, pubkey, lamports).await?)
    }

    async fn confirm_transaction(&self, signature: &Signature) -> RpcResult<bool> {
        Ok(RpcClient::confirm_transaction(self, signature).await?)
    }

    async fn send_and_confirm_transaction(&self, tx: &Transaction) -> RpcResult<Signature> {
        Ok(RpcClient::send_and_confirm_transaction(self, tx).await?)
    }
}
