//! End-to-end greeter flow.
//!
//! Step order is fixed and every step depends on the previous one's
//! postcondition, so the first error ends the run:
//!
//! 1. connect (`getVersion`)
//! 2. resolve and verify every program the route touches
//! 3. derive the greeting (and authority) addresses; for `pda-account`,
//!    check the greeting account already exists
//! 4. fund the payer
//! 5. provision the greeting account (seed-based routes only)
//! 6. submit the hello instruction
//! 7. read the counter back
//!
//! Mutating steps (4-6) are issued one at a time from a single payer.

use std::str::FromStr;

use greeter_core::state::GREETING_SIZE;
use serde::Serialize;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use tracing::info;

use crate::constants::GREETING_SEED;
use crate::context::GreeterContext;
use crate::error::{ConfigurationError, GreeterError, Result};
use crate::funding::{ensure_funded, estimate_cost, FundingReport};
use crate::invoke::{build_instruction, hello_accounts, invoke_chained, invoke_direct, invoker_accounts};
use crate::pda::{derive_greeting_account, derive_invoker_authority, derive_pda_greeting};
use crate::provision::{ensure_account, Provisioned};
use crate::registry::{verify_deployed, ProgramHandle, ProgramKind, ProgramRegistry};
use crate::report::read_counter;
use crate::rpc::RpcGateway;

/// How the hello program is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Route {
    /// hello called directly on the seed-derived greeting account.
    Direct,
    /// invoker forwards to hello, signing with its `"hello"` authority.
    Invoker,
    /// hello called directly on the invoker's `"hello002"` program address.
    PdaAccount,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Invoker => "invoker",
            Self::PdaAccount => "pda-account",
        }
    }

    /// Programs that must be resolved and deployed before the route runs.
    pub fn programs(&self) -> &'static [ProgramKind] {
        match self {
            Self::Direct => &[ProgramKind::Hello],
            Self::Invoker => &[ProgramKind::Hello, ProgramKind::Invoker],
            Self::PdaAccount => &[ProgramKind::Hello, ProgramKind::Invoker, ProgramKind::Invoker1],
        }
    }

    /// Whether the client creates the greeting account itself.
    pub fn provisions(&self) -> bool {
        !matches!(self, Self::PdaAccount)
    }
}

impl FromStr for Route {
    type Err = GreeterError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "direct" => Ok(Self::Direct),
            "invoker" => Ok(Self::Invoker),
            "pda-account" => Ok(Self::PdaAccount),
            _ => Err(ConfigurationError::Invalid(format!(
                "unknown route {s:?} (expected direct, invoker or pda-account)"
            ))
            .into()),
        }
    }
}

/// Everything needed to submit a route, computed without mutating anything.
#[derive(Debug, Clone)]
pub struct RoutePlan {
    pub route: Route,
    pub programs: Vec<ProgramHandle>,
    pub greeting: Pubkey,
    pub authority: Option<Pubkey>,
    pub instruction: Instruction,
}

impl RoutePlan {
    fn program(&self, kind: ProgramKind) -> Result<&ProgramHandle> {
        self.programs
            .iter()
            .find(|p| p.kind == kind)
            .ok_or_else(|| {
                ConfigurationError::Invalid(format!("route has no {} program", kind.as_str())).into()
            })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub rpc_url: String,
    pub node_version: String,
    pub route: Route,
    #[serde(serialize_with = "crate::report::serialize_display")]
    pub payer: Pubkey,
    pub funding: FundingReport,
    pub programs: Vec<ProgramHandle>,
    #[serde(serialize_with = "crate::report::serialize_display")]
    pub greeting: Pubkey,
    #[serde(serialize_with = "crate::report::serialize_display_opt")]
    pub authority: Option<Pubkey>,
    pub provisioned: Option<Provisioned>,
    #[serde(serialize_with = "crate::report::serialize_display")]
    pub signature: Signature,
    pub counter: u32,
}

pub struct Orchestrator<R> {
    ctx: GreeterContext<R>,
    registry: ProgramRegistry,
}

impl<R: RpcGateway> Orchestrator<R> {
    pub fn new(ctx: GreeterContext<R>, registry: ProgramRegistry) -> Self {
        Self { ctx, registry }
    }

    pub fn context(&self) -> &GreeterContext<R> {
        &self.ctx
    }

    /// Check that the cluster answers and return its version.
    pub async fn establish_connection(&self) -> Result<String> {
        let version = self
            .ctx
            .query("getVersion", self.ctx.rpc().get_version())
            .await?;
        info!(url = self.ctx.rpc_url(), %version, "connection to cluster established");
        Ok(version)
    }

    /// Resolve, verify and derive everything `route` needs. Read-only.
    ///
    /// Routes that never provision also require their greeting account to exist.
    pub async fn prepare(&self, route: Route) -> Result<RoutePlan> {
        let programs = route
            .programs()
            .iter()
            .map(|kind| self.registry.resolve(*kind))
            .collect::<Result<Vec<_>>>()?;

        for handle in &programs {
            verify_deployed(&self.ctx, handle).await?;
        }

        let plan = self.plan(route, programs)?;
        if !route.provisions() {
            // Nobody can create an account at a program address from here.
            self.ctx
                .query("getAccountInfo", self.ctx.rpc().get_account(&plan.greeting))
                .await?
                .ok_or(GreeterError::AccountNotFound(plan.greeting))?;
        }
        Ok(plan)
    }

    /// Derive addresses and build the route's instruction from resolved programs.
    pub fn plan(&self, route: Route, programs: Vec<ProgramHandle>) -> Result<RoutePlan> {
        let mut plan = RoutePlan {
            route,
            programs,
            greeting: Pubkey::default(),
            authority: None,
            instruction: build_instruction(&Pubkey::default(), Vec::new()),
        };
        let hello = plan.program(ProgramKind::Hello)?.id;

        match route {
            Route::Direct => {
                plan.greeting = derive_greeting_account(&self.ctx.payer_pubkey(), &hello)?;
                plan.instruction = build_instruction(&hello, hello_accounts(&hello, &plan.greeting));
            }
            Route::Invoker => {
                let invoker = plan.program(ProgramKind::Invoker)?.id;
                let authority = derive_invoker_authority(&invoker)?;
                plan.greeting = derive_greeting_account(&self.ctx.payer_pubkey(), &hello)?;
                plan.authority = Some(authority);
                plan.instruction = build_instruction(
                    &invoker,
                    invoker_accounts(&hello, &plan.greeting, &authority),
                );
            }
            Route::PdaAccount => {
                let invoker = plan.program(ProgramKind::Invoker)?.id;
                plan.greeting = derive_pda_greeting(&invoker)?;
                plan.instruction = build_instruction(&hello, hello_accounts(&hello, &plan.greeting));
            }
        }

        info!(route = route.as_str(), greeting = %plan.greeting, authority = ?plan.authority, "derived addresses");
        Ok(plan)
    }

    /// Run the whole flow once.
    pub async fn run(&self, route: Route) -> Result<RunReport> {
        let node_version = self.establish_connection().await?;
        let plan = self.prepare(route).await?;

        let estimated = estimate_cost(&self.ctx).await?;
        let funding = ensure_funded(&self.ctx, estimated).await?;

        let hello = plan.program(ProgramKind::Hello)?.id;
        let provisioned = if route.provisions() {
            Some(ensure_account(&self.ctx, &plan.greeting, GREETING_SEED, &hello, GREETING_SIZE).await?)
        } else {
            None
        };

        let instruction = plan.instruction.clone();
        let signature = match route {
            Route::Invoker => {
                invoke_chained(&self.ctx, &instruction.program_id, instruction.accounts).await?
            }
            Route::Direct | Route::PdaAccount => {
                invoke_direct(&self.ctx, &instruction.program_id, instruction.accounts).await?
            }
        };

        let counter = read_counter(&self.ctx, &plan.greeting).await?;

        Ok(RunReport {
            rpc_url: self.ctx.rpc_url().to_string(),
            node_version,
            route,
            payer: self.ctx.payer_pubkey(),
            funding,
            programs: plan.programs,
            greeting: plan.greeting,
            authority: plan.authority,
            provisioned,
            signature,
            counter,
        })
    }

    /// Read the counter of the greeting account `route` uses.
    pub async fn report(&self, route: Route) -> Result<(Pubkey, u32)> {
        self.establish_connection().await?;
        let plan = self.prepare(route).await?;
        let counter = read_counter(&self.ctx, &plan.greeting).await?;
        Ok((plan.greeting, counter))
    }
}
