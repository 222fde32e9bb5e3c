//! Address derivation for the greeter programs.
//!
//! Two schemes are used and both are pure functions of their inputs:
//! - seed-based: `sha256(base || seed || owner)`, used for the greeting account
//!   so it can be recomputed from the payer without an on-chain lookup
//! - program-derived: `sha256(seeds.. || program || "ProgramDerivedAddress")`,
//!   accepted only if the digest is not a valid ed25519 point
//!
//! Program-derived addresses are computed in a single attempt with no bump
//! search. An on-curve candidate is an error and the caller must change seeds.

use serde::Serialize;
use solana_sdk::pubkey::{Pubkey, PubkeyError, MAX_SEEDS, MAX_SEED_LEN};

use crate::constants::{GREETING_SEED, SEED_AUTHORITY, SEED_PDA_GREETING};
use crate::error::DerivationError;

/// Outcome of one program-derived address attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Derived {
    Address(String),
    Error(String),
}

impl From<Result<Pubkey, DerivationError>> for Derived {
    fn from(r: Result<Pubkey, DerivationError>) -> Self {
        match r {
            Ok(address) => Self::Address(address.to_string()),
            Err(e) => Self::Error(e.to_string()),
        }
    }
}

/// Every address the greeter flows touch, for a given payer and program pair.
#[derive(Debug, Clone, Serialize)]
pub struct GreeterAddresses {
    /// Seed-based greeting account owned by hello.
    pub greeting: String,
    /// Invoker signing authority (`"hello"`).
    pub authority: Derived,
    /// Program-derived greeting account (`"hello002"`).
    pub pda_greeting: Derived,
}

/// Derive an address from a base key, a seed string and an owning program.
pub fn derive_seeded(
    base: &Pubkey,
    seed: &str,
    owner: &Pubkey,
) -> Result<Pubkey, DerivationError> {
    if seed.len() > MAX_SEED_LEN {
        return Err(DerivationError::InvalidSeed {
            seed: seed.to_string(),
            reason: format!("{} bytes exceeds the {MAX_SEED_LEN}-byte limit", seed.len()),
        });
    }
    Pubkey::create_with_seed(base, seed, owner).map_err(|e| match e {
        PubkeyError::IllegalOwner => DerivationError::IllegalOwner { owner: *owner },
        other => DerivationError::InvalidSeed {
            seed: seed.to_string(),
            reason: other.to_string(),
        },
    })
}

/// Derive a program address from `seeds` without a bump search.
pub fn derive_program_address(
    seeds: &[&[u8]],
    program_id: &Pubkey,
) -> Result<Pubkey, DerivationError> {
    if seeds.len() > MAX_SEEDS {
        return Err(DerivationError::InvalidSeed {
            seed: describe_seeds(seeds).join(","),
            reason: format!("{} seeds exceeds the {MAX_SEEDS}-seed limit", seeds.len()),
        });
    }
    if let Some(long) = seeds.iter().find(|s| s.len() > MAX_SEED_LEN) {
        return Err(DerivationError::InvalidSeed {
            seed: String::from_utf8_lossy(long).into_owned(),
            reason: format!("{} bytes exceeds the {MAX_SEED_LEN}-byte limit", long.len()),
        });
    }
    Pubkey::create_program_address(seeds, program_id).map_err(|e| match e {
        PubkeyError::InvalidSeeds => DerivationError::InvalidProgramAddress {
            seeds: describe_seeds(seeds),
            program: *program_id,
        },
        other => DerivationError::InvalidSeed {
            seed: describe_seeds(seeds).join(","),
            reason: other.to_string(),
        },
    })
}

/// Greeting account address for `payer`, owned by the hello program.
pub fn derive_greeting_account(payer: &Pubkey, hello: &Pubkey) -> Result<Pubkey, DerivationError> {
    derive_seeded(payer, GREETING_SEED, hello)
}

/// Signing authority the invoker uses when it forwards to hello.
pub fn derive_invoker_authority(invoker: &Pubkey) -> Result<Pubkey, DerivationError> {
    derive_program_address(&[SEED_AUTHORITY], invoker)
}

/// Program-derived greeting account used by the alternate route.
pub fn derive_pda_greeting(invoker: &Pubkey) -> Result<Pubkey, DerivationError> {
    derive_program_address(&[SEED_PDA_GREETING], invoker)
}

/// Derive every address at once. Program-derived failures are reported per field.
pub fn derive_all(
    payer: &Pubkey,
    hello: &Pubkey,
    invoker: &Pubkey,
) -> Result<GreeterAddresses, DerivationError> {
    Ok(GreeterAddresses {
        greeting: derive_greeting_account(payer, hello)?.to_string(),
        authority: derive_invoker_authority(invoker).into(),
        pda_greeting: derive_pda_greeting(invoker).into(),
    })
}

fn describe_seeds(seeds: &[&[u8]]) -> Vec<String> {
    seeds
        .iter()
        .map(|s| String::from_utf8_lossy(s).into_owned())
        .collect()
}
