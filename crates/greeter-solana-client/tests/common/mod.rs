//! In-memory ledger used by the integration tests.
//!
//! It simulates just enough of a cluster for the greeter flows:
//! - the system program's `CreateAccountWithSeed`
//! - the hello program (`[hello, greeting (w)]`, increments the counter)
//! - the invoker program (`[hello, greeting (w), authority]`, forwards to hello)
//! - a faucet, signature fees and rent
//!
//! Transactions are atomic: state is only committed if every instruction succeeds.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use greeter_core::config::GreeterConfig;
use greeter_core::state::{encode, GREETING_SIZE};
use greeter_solana_client::context::GreeterContext;
use greeter_solana_client::pda::{derive_invoker_authority, derive_pda_greeting};
use greeter_solana_client::registry::{ProgramKind, ProgramRegistry};
use greeter_solana_client::rpc::{RpcGateway, RpcResult};
use greeter_solana_client::Orchestrator;
use solana_sdk::account::Account;
use solana_sdk::hash::Hash;
use solana_sdk::message::Message;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{write_keypair_file, Keypair, Signature, Signer};
use solana_sdk::system_instruction::SystemInstruction;
use solana_sdk::system_program;
use solana_sdk::transaction::Transaction;

pub const LAMPORTS_PER_SIGNATURE: u64 = 5_000;

pub fn rent_for(len: usize) -> u64 {
    (128 + len as u64) * 3_480 * 2
}

#[derive(Default)]
struct LedgerState {
    accounts: HashMap<Pubkey, Account>,
    hello: Pubkey,
    invoker: Pubkey,
    faucet: bool,
    /// Polls answered `false` before an airdrop confirms.
    confirm_delay: u32,
    pending_polls: u32,
    stall_version: bool,
    /// Lamports the faucet keeps back from every airdrop.
    airdrop_shortfall: u64,
    /// Make `confirmTransaction` fail at the transport level.
    confirm_fails: bool,
    /// Commit the next transaction, then never answer.
    stall_next_submit: bool,
    airdrops: Vec<(Pubkey, u64)>,
    sent: Vec<Transaction>,
    creations: usize,
}

#[derive(Clone)]
pub struct MockLedger {
    state: Arc<Mutex<LedgerState>>,
}

impl MockLedger {
    pub fn new(hello: Pubkey, invoker: Pubkey) -> Self {
        Self {
            state: Arc::new(Mutex::new(LedgerState {
                hello,
                invoker,
                faucet: true,
                ..LedgerState::default()
            })),
        }
    }

    pub fn set_faucet(&self, enabled: bool) {
        self.state.lock().unwrap().faucet = enabled;
    }

    pub fn set_confirm_delay(&self, polls: u32) {
        self.state.lock().unwrap().confirm_delay = polls;
    }

    pub fn set_airdrop_shortfall(&self, lamports: u64) {
        self.state.lock().unwrap().airdrop_shortfall = lamports;
    }

    pub fn fail_confirmations(&self) {
        self.state.lock().unwrap().confirm_fails = true;
    }

    pub fn stall_next_submit(&self) {
        self.state.lock().unwrap().stall_next_submit = true;
    }

    pub fn stall_version(&self) {
        self.state.lock().unwrap().stall_version = true;
    }

    pub fn deploy(&self, program: Pubkey) {
        self.put(program, Account {
            lamports: 1,
            data: vec![],
            owner: solana_sdk::bpf_loader_upgradeable::id(),
            executable: true,
            rent_epoch: 0,
        });
    }

    pub fn put(&self, address: Pubkey, account: Account) {
        self.state.lock().unwrap().accounts.insert(address, account);
    }

    pub fn put_greeting(&self, address: Pubkey, owner: Pubkey, counter: u32) {
        self.put(address, Account {
            lamports: rent_for(GREETING_SIZE),
            data: encode(counter),
            owner,
            executable: false,
            rent_epoch: 0,
        });
    }

    pub fn fund(&self, address: Pubkey, lamports: u64) {
        let mut st = self.state.lock().unwrap();
        let entry = st.accounts.entry(address).or_insert_with(|| Account {
            lamports: 0,
            data: vec![],
            owner: system_program::id(),
            executable: false,
            rent_epoch: 0,
        });
        entry.lamports += lamports;
    }

    pub fn account(&self, address: &Pubkey) -> Option<Account> {
        self.state.lock().unwrap().accounts.get(address).cloned()
    }

    pub fn balance(&self, address: &Pubkey) -> u64 {
        self.account(address).map(|a| a.lamports).unwrap_or(0)
    }

    pub fn airdrops(&self) -> Vec<(Pubkey, u64)> {
        self.state.lock().unwrap().airdrops.clone()
    }

    pub fn sent(&self) -> usize {
        self.state.lock().unwrap().sent.len()
    }

    pub fn creations(&self) -> usize {
        self.state.lock().unwrap().creations
    }
}

fn is_writable(message: &Message, i: usize) -> bool {
    let h = &message.header;
    let signed = h.num_required_signatures as usize;
    let total = message.account_keys.len();
    if i < signed {
        i < signed - h.num_readonly_signed_accounts as usize
    } else {
        i < total - h.num_readonly_unsigned_accounts as usize
    }
}

struct Meta {
    key: Pubkey,
    writable: bool,
}

fn execute(st: &mut LedgerState, tx: &Transaction) -> Result<(), String> {
    tx.verify().map_err(|e| format!("signature verification failed: {e}"))?;
    let message = &tx.message;
    let payer = message.account_keys[0];

    let fee = LAMPORTS_PER_SIGNATURE * message.header.num_required_signatures as u64;
    let mut accounts = st.accounts.clone();
    let mut creations = 0;
    {
        let payer_account = accounts
            .get_mut(&payer)
            .ok_or("attempt to debit an account but found no record of a prior credit")?;
        if payer_account.lamports < fee {
            return Err("insufficient funds for fee".into());
        }
        payer_account.lamports -= fee;
    }

    for ix in &message.instructions {
        let program = message.account_keys[ix.program_id_index as usize];
        let metas: Vec<Meta> = ix
            .accounts
            .iter()
            .map(|&i| Meta {
                key: message.account_keys[i as usize],
                writable: is_writable(message, i as usize),
            })
            .collect();

        if program == system_program::id() {
            create_with_seed(&mut accounts, &metas, &ix.data)?;
            creations += 1;
        } else if program == st.hello {
            hello(&mut accounts, st.hello, &metas)?;
        } else if program == st.invoker {
            if metas.len() != 3 {
                return Err("invoker: expected 3 accounts".into());
            }
            let authority = derive_invoker_authority(&st.invoker).map_err(|e| e.to_string())?;
            if metas[2].key != authority {
                return Err("invoker: custom program error: 0x1 (bad authority)".into());
            }
            if metas[0].key != st.hello {
                return Err("invoker: custom program error: 0x2 (callee is not hello)".into());
            }
            hello(&mut accounts, st.hello, &metas[..2])?;
        } else {
            return Err(format!("program {program} not found"));
        }
    }

    st.accounts = accounts;
    st.creations += creations;
    Ok(())
}

fn create_with_seed(
    accounts: &mut HashMap<Pubkey, Account>,
    metas: &[Meta],
    data: &[u8],
) -> Result<(), String> {
    let ix: SystemInstruction = bincode::deserialize(data).map_err(|e| e.to_string())?;
    let SystemInstruction::CreateAccountWithSeed { base, seed, lamports, space, owner } = ix else {
        return Err("unsupported system instruction".into());
    };
    let (from, to) = (metas[0].key, metas[1].key);
    let expected = Pubkey::create_with_seed(&base, &seed, &owner).map_err(|e| e.to_string())?;
    if expected != to {
        return Err(format!("create: address {to} does not match derived address {expected}"));
    }
    if accounts.contains_key(&to) {
        return Err(format!("create: account {to} already in use"));
    }
    let from_account = accounts.get_mut(&from).ok_or("create: no funding account")?;
    if from_account.lamports < lamports {
        return Err("create: insufficient lamports".into());
    }
    from_account.lamports -= lamports;
    accounts.insert(to, Account {
        lamports,
        data: vec![0; space as usize],
        owner,
        executable: false,
        rent_epoch: 0,
    });
    Ok(())
}

fn hello(accounts: &mut HashMap<Pubkey, Account>, hello: Pubkey, metas: &[Meta]) -> Result<(), String> {
    if metas.len() != 2 || metas[0].key != hello {
        return Err("hello: custom program error: 0x3 (bad account list)".into());
    }
    let greeting = &metas[1];
    if !greeting.writable {
        return Err("hello: greeting account is not writable".into());
    }
    let account = accounts
        .get_mut(&greeting.key)
        .ok_or("hello: greeting account not found")?;
    if account.owner != hello {
        return Err("hello: IncorrectProgramId".into());
    }
    let counter = greeter_core::state::decode(&account.data).map_err(|e| e.to_string())?;
    account.data = encode(counter + 1);
    Ok(())
}

#[async_trait]
impl RpcGateway for MockLedger {
    async fn get_version(&self) -> RpcResult<String> {
        let stall = self.state.lock().unwrap().stall_version;
        if stall {
            std::future::pending::<()>().await;
        }
        Ok("2.0.14".to_string())
    }

    async fn get_balance(&self, pubkey: &Pubkey) -> RpcResult<u64> {
        Ok(self.balance(pubkey))
    }

    async fn get_account(&self, pubkey: &Pubkey) -> RpcResult<Option<Account>> {
        Ok(self.account(pubkey))
    }

    async fn get_minimum_balance_for_rent_exemption(&self, data_len: usize) -> RpcResult<u64> {
        Ok(rent_for(data_len))
    }

    async fn get_lamports_per_signature(&self, _payer: &Pubkey) -> RpcResult<u64> {
        Ok(LAMPORTS_PER_SIGNATURE)
    }

    async fn get_latest_blockhash(&self) -> RpcResult<Hash> {
        Ok(Hash::new_unique())
    }

    async fn request_airdrop(&self, pubkey: &Pubkey, lamports: u64) -> RpcResult<Signature> {
        let mut st = self.state.lock().unwrap();
        if !st.faucet {
            return Err("airdrop request failed: faucet unavailable on this cluster".into());
        }
        st.airdrops.push((*pubkey, lamports));
        st.pending_polls = st.confirm_delay;
        let credited = lamports.saturating_sub(st.airdrop_shortfall);
        drop(st);
        self.fund(*pubkey, credited);
        Ok(Signature::new_unique())
    }

    async fn confirm_transaction(&self, _signature: &Signature) -> RpcResult<bool> {
        let mut st = self.state.lock().unwrap();
        if st.confirm_fails {
            return Err("connection reset by peer".into());
        }
        if st.pending_polls > 0 {
            st.pending_polls -= 1;
            return Ok(false);
        }
        Ok(true)
    }

    async fn send_and_confirm_transaction(&self, tx: &Transaction) -> RpcResult<Signature> {
        let stall = {
            let mut st = self.state.lock().unwrap();
            st.sent.push(tx.clone());
            execute(&mut st, tx)?;
            std::mem::take(&mut st.stall_next_submit)
        };
        if stall {
            std::future::pending::<()>().await;
        }
        Ok(tx.signatures[0])
    }
}

/// Program keypairs on disk plus a ledger that knows their ids.
pub struct Fixture {
    pub dir: tempfile::TempDir,
    pub config: GreeterConfig,
    pub ledger: MockLedger,
    pub hello: Pubkey,
    pub invoker: Pubkey,
    pub invoker1: Pubkey,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let hello = Keypair::new();
        let invoker1 = Keypair::new();
        // Both invoker addresses must be off-curve for the routes to derive.
        let invoker = std::iter::repeat_with(Keypair::new)
            .find(|k| {
                derive_invoker_authority(&k.pubkey()).is_ok()
                    && derive_pda_greeting(&k.pubkey()).is_ok()
            })
            .unwrap();

        let config = GreeterConfig {
            rpc_url: "http://mock.invalid".to_string(),
            keypair_path: dir.path().join("id.json"),
            program_dir: dir.path().to_path_buf(),
            ..GreeterConfig::default()
        };
        write_keypair_file(&Keypair::new(), &config.keypair_path).unwrap();
        for (kind, kp) in [
            (ProgramKind::Hello, &hello),
            (ProgramKind::Invoker, &invoker),
            (ProgramKind::Invoker1, &invoker1),
        ] {
            let (path, _) = ProgramRegistry::new(&config).files(kind);
            write_keypair_file(kp, path).unwrap();
        }

        let ledger = MockLedger::new(hello.pubkey(), invoker.pubkey());
        Self {
            dir,
            config,
            ledger,
            hello: hello.pubkey(),
            invoker: invoker.pubkey(),
            invoker1: invoker1.pubkey(),
        }
    }

    pub fn deploy_all(&self) {
        self.ledger.deploy(self.hello);
        self.ledger.deploy(self.invoker);
        self.ledger.deploy(self.invoker1);
    }

    pub fn context(&self) -> GreeterContext<MockLedger> {
        GreeterContext::from_config(self.ledger.clone(), &self.config)
            .unwrap()
            .with_poll_interval(Duration::from_millis(1))
    }

    pub fn orchestrator(&self) -> Orchestrator<MockLedger> {
        Orchestrator::new(self.context(), ProgramRegistry::new(&self.config))
    }

    pub fn artifact(&self, kind: ProgramKind) -> PathBuf {
        ProgramRegistry::new(&self.config).files(kind).1
    }
}
