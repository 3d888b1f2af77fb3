//! Spec revision inspection: summary and mapped variables.

use std::process::ExitCode;

use clap::Parser;
use credenza_core::engine::PipelineEngine;
use credenza_core::store::ProjectStore;

use crate::project_cmd::parse_project;

#[derive(Debug, Parser)]
pub struct SpecArgs {
    /// Project identifier (UUID).
    #[arg(value_name = "PROJECT")]
    pub project: String,

    /// Spec revision; defaults to the latest.
    #[arg(long = "revision", short = 'r', value_name = "N", default_value = "0")]
    pub revision: u32,

    /// Output as JSON.
    #[arg(long = "json", short = 'j')]
    pub json: bool,
}

pub fn run_summary<S: ProjectStore>(
    engine: &PipelineEngine<S>,
    args: SpecArgs,
) -> anyhow::Result<ExitCode> {
    let project = parse_project(&args.project)?;
    if args.json {
        let spec = engine.spec(project, args.revision)?;
        println!("{}", serde_json::to_string_pretty(&spec)?);
    } else {
        print!("{}", engine.summary(project, args.revision)?);
    }
    Ok(ExitCode::SUCCESS)
}

pub fn run_variables<S: ProjectStore>(
    engine: &PipelineEngine<S>,
    args: SpecArgs,
) -> anyhow::Result<ExitCode> {
    let project = parse_project(&args.project)?;
    let mapping = engine.variables(project, args.revision)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&mapping)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!(
        "contract {} - spec revision {} - {} variables",
        mapping.contract_version,
        mapping.pspec_revision,
        mapping.variables.len()
    );
    for entry in &mapping.provenance {
        println!(
            "  {:<24} {:>6}  {:<9} {:<8} {}",
            entry.name,
            entry.value,
            format!("{:?}", entry.unit).to_lowercase(),
            format!("{:?}", entry.source).to_uppercase(),
            entry.pointer
        );
    }
    Ok(ExitCode::SUCCESS)
}
