use anyhow::Result;
use greeter_core::config::GreeterConfig;
use greeter_solana_client::context::load_keypair;
use greeter_solana_client::registry::{ProgramKind, ProgramRegistry};
use serde::Serialize;
use solana_sdk::signature::Signer;

use crate::args::Cli;
use crate::{output, settings};

#[derive(Debug, Serialize)]
pub struct Check {
    pub name: String,
    pub ok: bool,
    /// Optional checks never fail the doctor run.
    pub required: bool,
    pub detail: String,
}

impl Check {
    fn new(name: impl Into<String>, required: bool, outcome: Result<String, String>) -> Self {
        let (ok, detail) = match outcome {
            Ok(d) => (true, d),
            Err(d) => (false, d),
        };
        Self { name: name.into(), ok, required, detail }
    }
}

#[derive(Debug, Serialize)]
pub struct DoctorOut {
    pub ok: bool,
    pub checks: Vec<Check>,
}

pub async fn run(cli: &Cli, offline: bool) -> Result<()> {
    let mut checks = Vec::new();

    match settings::resolve(cli) {
        Ok(cfg) => {
            checks.push(Check::new("config", true, Ok(format!("rpc {}", cfg.rpc_url))));
            checks.extend(local_checks(&cfg));
            if !offline {
                checks.push(node_check(&cfg).await);
            }
        }
        Err(e) => checks.push(Check::new("config", true, Err(format!("{e:#}")))),
    }

    checks.push(Check::new(
        "solana",
        false,
        if which_ok("solana") {
            Ok("found on PATH".to_string())
        } else {
            Err("not found on PATH (needed to deploy programs)".to_string())
        },
    ));

    let ok = checks.iter().all(|c| c.ok || !c.required);
    let out = DoctorOut { ok, checks };
    if output::is_json() {
        output::print(&out)?;
    } else {
        for c in &out.checks {
            let tag = if c.required { "" } else { " (optional)" };
            output::status_line(c.ok, &format!("{}{tag}: {}", c.name, c.detail))?;
        }
    }

    if !ok {
        anyhow::bail!("doctor found failing required checks");
    }
    Ok(())
}

/// Checks that only read local files.
fn local_checks(cfg: &GreeterConfig) -> Vec<Check> {
    let mut checks = vec![Check::new(
        "keypair",
        true,
        load_keypair(&cfg.keypair_path)
            .map(|kp| format!("payer {} from {}", kp.pubkey(), cfg.keypair_path.display()))
            .map_err(|e| e.to_string()),
    )];

    let registry = ProgramRegistry::new(cfg);
    for kind in [ProgramKind::Hello, ProgramKind::Invoker, ProgramKind::Invoker1] {
        // invoker1 only backs the pda-account route.
        let required = kind != ProgramKind::Invoker1;
        checks.push(Check::new(
            format!("{} program id", kind.as_str()),
            required,
            registry
                .resolve(kind)
                .map(|h| h.id.to_string())
                .map_err(|e| e.to_string()),
        ));

        let (_, artifact) = registry.files(kind);
        checks.push(Check::new(
            format!("{} artifact", kind.as_str()),
            false,
            if artifact.exists() {
                Ok(artifact.display().to_string())
            } else {
                Err(format!("{} not built", artifact.display()))
            },
        ));
    }
    checks
}

async fn node_check(cfg: &GreeterConfig) -> Check {
    let outcome = match super::orchestrator(cfg) {
        Ok(orchestrator) => orchestrator
            .establish_connection()
            .await
            .map(|v| format!("node version {v}"))
            .map_err(|e| e.to_string()),
        Err(e) => Err(format!("{e:#}")),
    };
    Check::new("node", true, outcome)
}

fn which_ok(cmd: &str) -> bool {
    std::env::var_os("PATH").and_then(|paths| {
        for p in std::env::split_paths(&paths) {
            let full = p.join(cmd);
            if full.exists() {
                return Some(());
            }
            #[cfg(windows)]
            {
                let full_exe = p.join(format!("{cmd}.exe"));
                if full_exe.exists() {
                    return Some(());
                }
            }
        }
        None
    }).is_some()
}
