//! Draft commands: set a single answer, import a JSON answer file, show
//! the current draft.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use credenza_core::engine::PipelineEngine;
use credenza_core::store::ProjectStore;
use serde_json::Value;

use crate::project_cmd::parse_project;

#[derive(Debug, Parser)]
pub struct DraftCli {
    #[command(subcommand)]
    pub command: DraftSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum DraftSubcommand {
    /// Set one answer by store path.
    Set(SetArgs),

    /// Replace the draft with answers from a JSON object file.
    Import(ImportArgs),

    /// Print the current draft.
    Show(ShowArgs),
}

#[derive(Debug, Parser)]
pub struct SetArgs {
    /// Project identifier (UUID).
    #[arg(value_name = "PROJECT")]
    pub project: String,

    /// Dotted store path, e.g. `overall.width_mm`.
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Answer value, parsed as JSON; bare words are taken as strings.
    #[arg(value_name = "VALUE")]
    pub value: String,
}

#[derive(Debug, Parser)]
pub struct ImportArgs {
    /// Project identifier (UUID).
    #[arg(value_name = "PROJECT")]
    pub project: String,

    /// JSON file with a flat `path: value` object.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// Project identifier (UUID).
    #[arg(value_name = "PROJECT")]
    pub project: String,
}

pub fn run<S: ProjectStore>(
    engine: &PipelineEngine<S>,
    cli: DraftCli,
) -> anyhow::Result<ExitCode> {
    match cli.command {
        DraftSubcommand::Set(args) => {
            let project = parse_project(&args.project)?;
            // `450`, `true` and `"plywood"` parse as JSON; a bare word
            // like `plywood` is taken as a string answer.
            let value: Value = serde_json::from_str(&args.value)
                .unwrap_or_else(|_| Value::String(args.value.clone()));
            engine.set_draft_answer(project, &args.path, value)?;
            println!("{} set", args.path);
            Ok(ExitCode::SUCCESS)
        }
        DraftSubcommand::Import(args) => {
            let project = parse_project(&args.project)?;
            let content = std::fs::read_to_string(&args.file)
                .with_context(|| format!("failed to read {}", args.file.display()))?;
            let answers: std::collections::BTreeMap<String, Value> =
                serde_json::from_str(&content)
                    .with_context(|| format!("{} is not a flat JSON object", args.file.display()))?;
            let count = answers.len();
            engine.save_draft(project, answers)?;
            println!("draft replaced with {count} answer(s)");
            Ok(ExitCode::SUCCESS)
        }
        DraftSubcommand::Show(args) => {
            let project = parse_project(&args.project)?;
            let draft = engine.draft(project)?;
            println!("{}", serde_json::to_string_pretty(&draft)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}
