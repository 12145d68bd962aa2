//! Lineup CLI
//!
//! Replays match scenarios against the rotation engine and lists the team
//! modes available for a squad size.

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lineup")]
#[command(about = "Squad rotation and formation engine tools", long_about = None)]
struct Cli {
    /// Default log filter (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a scenario file and print the JSON report
    Run {
        /// Scenario JSON: { "session": {...}, "events": [...] }
        scenario: PathBuf,

        /// Write the report here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,

        /// Pretty-print the report
        #[arg(long, default_value = "false")]
        pretty: bool,
    },

    /// List team modes and options for a squad size
    Modes {
        squad_size: u8,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level.as_str()))
        .format_timestamp(None)
        .init();

    match cli.command {
        Commands::Run { scenario, out, pretty } => {
            log::info!("Running scenario {}", scenario.display());
            let scenario = lineup_cli::load_scenario(&scenario)?;
            let report = lineup_cli::run_scenario(scenario)?;
            lineup_cli::write_report(&report, out.as_deref(), pretty)?;
        }

        Commands::Modes { squad_size } => {
            let Some(report) = lineup_cli::describe_modes(squad_size) else {
                bail!("Squad size {} is not supported", squad_size);
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}
