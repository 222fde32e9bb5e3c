//! Greeting account layout.
//!
//! The account holds exactly one field:
//!
//! ```text
//! [0..4] counter: u32 (little-endian)
//! ```
//!
//! There is no discriminant byte and no padding. The account size is fixed at
//! creation and equals [`GREETING_SIZE`].

use serde::Serialize;

use crate::errors::{CoreError, CoreResult};

/// Serialized size of [`GreetingAccount`].
pub const GREETING_SIZE: usize = std::mem::size_of::<u32>();

/// Decoded greeting account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GreetingAccount {
    pub counter: u32,
}

impl GreetingAccount {
    pub fn new(counter: u32) -> Self {
        Self { counter }
    }

    pub fn to_bytes(&self) -> [u8; GREETING_SIZE] {
        self.counter.to_le_bytes()
    }

    /// Decode account data. The slice must be exactly [`GREETING_SIZE`] bytes.
    pub fn from_bytes(data: &[u8]) -> CoreResult<Self> {
        let raw: [u8; GREETING_SIZE] = data
            .try_into()
            .map_err(|_| CoreError::malformed_state(GREETING_SIZE, data.len()))?;
        Ok(Self { counter: u32::from_le_bytes(raw) })
    }
}

/// Encode a counter into account data.
pub fn encode(counter: u32) -> Vec<u8> {
    GreetingAccount::new(counter).to_bytes().to_vec()
}

/// Decode a counter from account data.
pub fn decode(data: &[u8]) -> CoreResult<u32> {
    GreetingAccount::from_bytes(data).map(|g| g.counter)
}
