use std::path::PathBuf;

use clap::{Parser, Subcommand};
use greeter_solana_client::Route;

#[derive(Parser, Debug, Clone)]
#[command(name = "greeter", version, about = "Greet an account through the hello and invoker programs")]
pub struct Cli {
    /// Emit JSON output on stdout (and JSON logs on stderr).
    #[arg(long, global = true)]
    pub json: bool,

    /// RPC URL or cluster moniker: localnet|devnet|testnet|mainnet-beta
    #[arg(long, short = 'u', global = true, env = "GREETER_RPC_URL")]
    pub url: Option<String>,

    /// Funding identity keypair file.
    #[arg(long, short = 'k', global = true, env = "GREETER_KEYPAIR")]
    pub keypair: Option<PathBuf>,

    /// Directory holding the program keypairs and shared objects.
    #[arg(long, global = true, env = "GREETER_PROGRAM_DIR")]
    pub program_dir: Option<PathBuf>,

    /// JSON config file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Deadline for every network call, in milliseconds.
    #[arg(long, global = true, env = "GREETER_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Fund, provision, invoke and read back the counter.
    Run {
        /// direct|invoker|pda-account
        #[arg(long, default_value = "invoker")]
        route: Route,

        /// Resolve programs and print the instruction without submitting anything.
        #[arg(long)]
        dry_run: bool,
    },

    /// Print every derived address without touching the network.
    Derive,

    /// Read the counter of the greeting account a route uses.
    Report {
        #[arg(long, default_value = "invoker")]
        route: Route,
    },

    /// Run environment checks.
    Doctor {
        /// Skip the node reachability check.
        #[arg(long)]
        offline: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "greeter",
            "run",
            "--route",
            "pda-account",
            "--url",
            "devnet",
            "--timeout-ms",
            "2500",
        ])
        .unwrap();
        assert_eq!(cli.url.as_deref(), Some("devnet"));
        assert_eq!(cli.timeout_ms, Some(2500));
        match cli.command {
            Command::Run { route, dry_run } => {
                assert_eq!(route, Route::PdaAccount);
                assert!(!dry_run);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn route_defaults_to_invoker() {
        let cli = Cli::try_parse_from(["greeter", "report"]).unwrap();
        assert!(matches!(cli.command, Command::Report { route: Route::Invoker }));
    }

    #[test]
    fn unknown_route_is_rejected() {
        assert!(Cli::try_parse_from(["greeter", "run", "--route", "cpi"]).is_err());
    }
}
