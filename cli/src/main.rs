//! `credenza` - headless CLI over the specification pipeline.
//!
//! ## Exit codes
//!
//! - 0: success
//! - 1: domain rejection (validation issues printed, one per line)
//! - 2: usage or infrastructure error

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use credenza_core::engine::PipelineEngine;
use credenza_core::store::fs::FsProjectStore;
use tracing_subscriber::EnvFilter;

mod draft_cmd;
mod geometry_cmd;
mod project_cmd;
mod spec_cmd;

/// Parametric hi-fi cabinet specifier - design brief in, CAD variables out.
#[derive(Debug, Parser)]
#[command(name = "credenza", version)]
struct Cli {
    /// Store root directory.
    #[arg(long = "root", global = true, default_value = ".credenza", value_name = "DIR")]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a new project.
    Init(project_cmd::InitArgs),

    /// Edit and inspect the in-progress answer draft.
    Draft(draft_cmd::DraftCli),

    /// Register reference-geometry metadata.
    Geometry(geometry_cmd::GeometryCli),

    /// Confirm the draft into a new brief revision.
    Confirm(project_cmd::ProjectArgs),

    /// Synthesize, validate, and map the next spec revision.
    Generate(project_cmd::ProjectArgs),

    /// Show the project ledger.
    Status(project_cmd::StatusArgs),

    /// Print the markdown summary of a spec revision.
    Summary(spec_cmd::SpecArgs),

    /// Print the mapped Onshape variables of a spec revision.
    Variables(spec_cmd::SpecArgs),

    /// Approve a pending spec revision.
    Approve(project_cmd::DecisionArgs),

    /// Reject a pending spec revision.
    Reject(project_cmd::DecisionArgs),
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let engine = PipelineEngine::new(FsProjectStore::new(&cli.root))?;
    match cli.command {
        Command::Init(args) => project_cmd::run_init(&engine, args),
        Command::Draft(args) => draft_cmd::run(&engine, args),
        Command::Geometry(args) => geometry_cmd::run(&engine, args),
        Command::Confirm(args) => project_cmd::run_confirm(&engine, args),
        Command::Generate(args) => project_cmd::run_generate(&engine, args),
        Command::Status(args) => project_cmd::run_status(&engine, args),
        Command::Summary(args) => spec_cmd::run_summary(&engine, args),
        Command::Variables(args) => spec_cmd::run_variables(&engine, args),
        Command::Approve(args) => project_cmd::run_decision(&engine, args, true),
        Command::Reject(args) => project_cmd::run_decision(&engine, args, false),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }
}
