//! greeter-core
//!
//! Core primitives for greeter:
//! - the greeting account layout (a single little-endian `u32` counter)
//! - the explicit configuration model consumed by the client and CLI
//! - error types shared by both
//!
//! Nothing in this crate touches the network or the filesystem except
//! [`config::GreeterConfig::from_json_file`].

pub mod config;
pub mod errors;
pub mod state;

pub use crate::errors::{CoreError, CoreResult};
