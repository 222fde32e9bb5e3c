use greeter_solana_client::orchestrator::RoutePlan;
use greeter_solana_client::Route;
use serde::Serialize;
use solana_sdk::instruction::Instruction;

#[derive(Debug, Clone, Serialize)]
pub struct AccountLine {
    pub pubkey: String,
    pub signer: bool,
    pub writable: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct InstructionLine {
    pub program_id: String,
    pub accounts: Vec<AccountLine>,
    pub data_len: usize,
}

impl From<&Instruction> for InstructionLine {
    fn from(ix: &Instruction) -> Self {
        Self {
            program_id: ix.program_id.to_string(),
            accounts: ix
                .accounts
                .iter()
                .map(|m| AccountLine {
                    pubkey: m.pubkey.to_string(),
                    signer: m.is_signer,
                    writable: m.is_writable,
                })
                .collect(),
            data_len: ix.data.len(),
        }
    }
}

/// What `run` would submit, without submitting it.
#[derive(Debug, Clone, Serialize)]
pub struct TxPlan {
    pub route: Route,
    pub greeting: String,
    pub authority: Option<String>,
    /// Whether the greeting account would be created first if absent.
    pub provisions: bool,
    pub instructions: Vec<InstructionLine>,
}

impl TxPlan {
    pub fn from_route_plan(plan: &RoutePlan) -> Self {
        Self {
            route: plan.route,
            greeting: plan.greeting.to_string(),
            authority: plan.authority.map(|a| a.to_string()),
            provisions: plan.route.provisions(),
            instructions: vec![InstructionLine::from(&plan.instruction)],
        }
    }

    pub fn describe(&self) -> String {
        if self.instructions.is_empty() {
            "no instructions".to_string()
        } else {
            format!("{} instruction(s)", self.instructions.len())
        }
    }
}
