//! Project lifecycle commands: init, confirm, generate, status,
//! approve/reject.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use credenza_core::engine::{BlockReason, ConfirmOutcome, GenerateOutcome, PipelineEngine};
use credenza_core::store::ProjectStore;
use credenza_protocol::ledger::RunMetadata;
use uuid::Uuid;

#[derive(Debug, Parser)]
pub struct InitArgs {
    /// Optional human-readable project name.
    #[arg(long = "name", value_name = "NAME")]
    pub name: Option<String>,
}

#[derive(Debug, Parser)]
pub struct ProjectArgs {
    /// Project identifier (UUID).
    #[arg(value_name = "PROJECT")]
    pub project: String,
}

#[derive(Debug, Parser)]
pub struct StatusArgs {
    /// Project identifier (UUID).
    #[arg(value_name = "PROJECT")]
    pub project: String,

    /// Output the raw ledger as JSON.
    #[arg(long = "json", short = 'j')]
    pub json: bool,
}

#[derive(Debug, Parser)]
pub struct DecisionArgs {
    /// Project identifier (UUID).
    #[arg(value_name = "PROJECT")]
    pub project: String,

    /// Spec revision to decide on.
    #[arg(long = "revision", short = 'r', value_name = "N")]
    pub revision: u32,
}

pub fn parse_project(raw: &str) -> anyhow::Result<Uuid> {
    Uuid::parse_str(raw).with_context(|| format!("`{raw}` is not a valid project id"))
}

pub fn run_init<S: ProjectStore>(
    engine: &PipelineEngine<S>,
    args: InitArgs,
) -> anyhow::Result<ExitCode> {
    let ledger = engine.create_project(args.name)?;
    println!("{}", ledger.project_id);
    Ok(ExitCode::SUCCESS)
}

pub fn run_confirm<S: ProjectStore>(
    engine: &PipelineEngine<S>,
    args: ProjectArgs,
) -> anyhow::Result<ExitCode> {
    let project = parse_project(&args.project)?;
    match engine.confirm_brief(project)? {
        ConfirmOutcome::Confirmed {
            revision,
            content_hash,
        } => {
            println!("brief revision {revision} confirmed (sha256 {content_hash})");
            Ok(ExitCode::SUCCESS)
        }
        ConfirmOutcome::Rejected { issues } => {
            println!("brief rejected: {} issue(s)", issues.len());
            for issue in issues {
                println!("  {}: {}", issue.path, issue.message);
            }
            Ok(ExitCode::from(1))
        }
    }
}

pub fn run_generate<S: ProjectStore>(
    engine: &PipelineEngine<S>,
    args: ProjectArgs,
) -> anyhow::Result<ExitCode> {
    let project = parse_project(&args.project)?;
    match engine.generate_spec(project)? {
        GenerateOutcome::Generated {
            revision,
            content_hash,
            variable_count,
        } => {
            println!(
                "spec revision {revision} generated (sha256 {content_hash}, {variable_count} variables) - pending approval"
            );
            Ok(ExitCode::SUCCESS)
        }
        GenerateOutcome::Blocked(reason) => {
            print_block_reason(&reason);
            Ok(ExitCode::from(1))
        }
    }
}

fn print_block_reason(reason: &BlockReason) {
    match reason {
        BlockReason::Schema(violations) => {
            println!("generation blocked at the schema gate: {} violation(s)", violations.len());
            for v in violations {
                println!("  {}: {}", v.pointer, v.message);
            }
        }
        BlockReason::Manufacturability(errors) => {
            println!("generation blocked: specification is not manufacturable");
            for e in errors {
                println!("  {e}");
            }
        }
        BlockReason::Mapping(issues) => {
            println!("generation blocked at variable mapping: {} issue(s)", issues.len());
            for i in issues {
                println!("  {} [{}] at {}: {}", i.variable, i.code.as_str(), i.pointer, i.message);
            }
        }
    }
}

pub fn run_status<S: ProjectStore>(
    engine: &PipelineEngine<S>,
    args: StatusArgs,
) -> anyhow::Result<ExitCode> {
    let project = parse_project(&args.project)?;
    let ledger = engine.status(project)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&ledger)?);
    } else {
        print_ledger(&ledger);
    }
    Ok(ExitCode::SUCCESS)
}

fn print_ledger(ledger: &RunMetadata) {
    println!(
        "project {}{}",
        ledger.project_id,
        ledger
            .name
            .as_deref()
            .map(|n| format!(" ({n})"))
            .unwrap_or_default()
    );
    println!("  created {}", ledger.created_at.to_rfc3339());
    match &ledger.geometry {
        Some(crg) => println!(
            "  geometry: {} ({}, {} bytes)",
            crg.filename,
            crg.format.as_str(),
            crg.size_bytes
        ),
        None => println!("  geometry: not registered"),
    }
    println!(
        "  approval: {:?}{}",
        ledger.approval.state,
        ledger
            .approval
            .revision
            .map(|r| format!(" (spec revision {r})"))
            .unwrap_or_default()
    );
    println!("  briefs:");
    for brief in &ledger.briefs {
        println!(
            "    rev {} - confirmed {} (sha256 {})",
            brief.revision,
            brief.confirmed_at.to_rfc3339(),
            &brief.content_hash[..12.min(brief.content_hash.len())]
        );
    }
    println!("  specs:");
    for spec in &ledger.specs {
        println!(
            "    rev {} - from brief {} - {:?}",
            spec.revision, spec.dib_revision, spec.approval.state
        );
    }
}

pub fn run_decision<S: ProjectStore>(
    engine: &PipelineEngine<S>,
    args: DecisionArgs,
    approve: bool,
) -> anyhow::Result<ExitCode> {
    let project = parse_project(&args.project)?;
    let ledger = if approve {
        engine.approve(project, args.revision)?
    } else {
        engine.reject(project, args.revision)?
    };
    println!(
        "spec revision {} is now {:?}",
        args.revision, ledger.approval.state
    );
    Ok(ExitCode::SUCCESS)
}
