//! greeter-solana-client
//!
//! Off-chain driver for the hello / invoker programs.
//!
//! It includes:
//! - seed constants and address derivation (seed-based and program-derived)
//! - an RPC seam ([`rpc::RpcGateway`]) implemented for the nonblocking Solana RPC client
//! - an explicit run context carrying the connection, payer and deadlines
//! - program resolution and deployment checks
//! - payer funding, greeting account provisioning, instruction submission
//! - greeting state readback
//!
//! [`orchestrator::Orchestrator`] strings these together in the required order.

pub mod constants;
pub mod context;
pub mod error;
pub mod funding;
pub mod invoke;
pub mod orchestrator;
pub mod pda;
pub mod provision;
pub mod registry;
pub mod report;
pub mod rpc;

pub use context::GreeterContext;
pub use error::{GreeterError, Result};
pub use orchestrator::{Orchestrator, Route, RunReport};
pub use rpc::RpcGateway;
