//! Constants shared between the on-chain programs and this client.
//!
//! Keep these stable because they affect address derivation.

/// Seed string for the seed-based greeting account (`create_with_seed`).
pub const GREETING_SEED: &str = "hello";

/// PDA seed for the invoker's signing authority.
pub const SEED_AUTHORITY: &[u8] = b"hello";

/// PDA seed for the alternate, program-derived greeting account.
pub const SEED_PDA_GREETING: &[u8] = b"hello002";

pub use solana_sdk::native_token::LAMPORTS_PER_SOL;
