use std::path::PathBuf;
use std::time::Duration;

use greeter_core::CoreError;
use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

/// Errors surfaced by every greeter step.
///
/// Each variant is one failure class. Callers never see a retried or
/// swallowed network error; the first failing step ends the run.
#[derive(Debug, Error)]
pub enum GreeterError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("deployment error: {0}")]
    Deployment(#[from] DeploymentError),

    #[error("funding error: {0}")]
    Funding(#[from] FundingError),

    #[error("derivation error: {0}")]
    Derivation(#[from] DerivationError),

    #[error("provisioning error: {0}")]
    Provisioning(#[from] ProvisioningError),

    #[error("submission error: {0}")]
    Submission(#[from] SubmissionError),

    /// Only built from [`CoreError::MalformedState`]; see `report::read_greeting`.
    #[error("decoding error: {0}")]
    Decoding(CoreError),

    #[error("account not found: {0}")]
    AccountNotFound(Pubkey),

    #[error("{operation} timed out after {}ms", timeout.as_millis())]
    Timeout { operation: &'static str, timeout: Duration },

    /// A read-only query failed at the transport or node level.
    #[error("rpc {operation} failed: {message}")]
    Rpc { operation: &'static str, message: String },
}

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("failed to read keypair at '{}': {reason}", path.display())]
    KeypairNotFound { path: PathBuf, reason: String },

    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum DeploymentError {
    #[error("program {name} ({program}) is not deployed; {hint}")]
    ProgramNotDeployed {
        name: String,
        program: Pubkey,
        hint: String,
    },

    #[error("program {name} ({program}) is not executable")]
    ProgramNotExecutable { name: String, program: Pubkey },
}

#[derive(Debug, Error)]
pub enum FundingError {
    #[error("top-up of {deficit} lamports for {payer} unavailable: {reason}")]
    TopUpUnavailable {
        payer: Pubkey,
        deficit: u64,
        reason: String,
    },

    #[error("payer {payer} holds {balance} lamports after top-up, needs {required}")]
    StillShort {
        payer: Pubkey,
        balance: u64,
        required: u64,
    },
}

#[derive(Debug, Error)]
pub enum DerivationError {
    #[error("invalid seed {seed:?}: {reason}")]
    InvalidSeed { seed: String, reason: String },

    #[error("seeds {seeds:?} with program {program} land on the ed25519 curve; pick a different seed")]
    InvalidProgramAddress { seeds: Vec<String>, program: Pubkey },

    #[error("owner {owner} is not a valid owner for seed-based derivation")]
    IllegalOwner { owner: Pubkey },
}

#[derive(Debug, Error)]
pub enum ProvisioningError {
    #[error("failed to create account {address}: {reason}")]
    AccountCreation { address: Pubkey, reason: String },

    #[error("address {address} does not match seed derivation {expected}")]
    AddressMismatch { address: Pubkey, expected: Pubkey },

    #[error("account {address} exists with owner {actual_owner} and {actual_size} bytes; expected owner {expected_owner} and {expected_size} bytes")]
    Mismatch {
        address: Pubkey,
        expected_owner: Pubkey,
        actual_owner: Pubkey,
        expected_size: usize,
        actual_size: usize,
    },
}

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("transaction to {program} rejected: {reason}")]
    Rejected { program: Pubkey, reason: String },
}

pub type Result<T> = std::result::Result<T, GreeterError>;
