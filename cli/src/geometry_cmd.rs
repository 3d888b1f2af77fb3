//! Reference-geometry registration.
//!
//! The mesh file is hashed and measured, never parsed: the pipeline
//! records provenance only, and the geometry contributes no dimensions.

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::Parser;
use credenza_core::engine::PipelineEngine;
use credenza_core::store::ProjectStore;
use credenza_protocol::canonical::bytes_hash;
use credenza_protocol::geometry::{CrgMeta, MeshFormat};

use crate::project_cmd::parse_project;

#[derive(Debug, Parser)]
pub struct GeometryCli {
    /// Project identifier (UUID).
    #[arg(value_name = "PROJECT")]
    pub project: String,

    /// Mesh file (.stl, .obj, or .ply).
    #[arg(value_name = "FILE")]
    pub file: std::path::PathBuf,
}

fn format_of(path: &Path) -> anyhow::Result<MeshFormat> {
    let ext = path
        .extension()
        .and_then(std::ffi::OsStr::to_str)
        .unwrap_or_default();
    match MeshFormat::from_extension(ext) {
        Some(format) => Ok(format),
        None => bail!(
            "`{}` has no recognized mesh extension (expected .stl, .obj, or .ply)",
            path.display()
        ),
    }
}

pub fn run<S: ProjectStore>(
    engine: &PipelineEngine<S>,
    args: GeometryCli,
) -> anyhow::Result<ExitCode> {
    let project = parse_project(&args.project)?;
    let format = format_of(&args.file)?;
    let bytes = std::fs::read(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;

    let filename = args
        .file
        .file_name()
        .and_then(std::ffi::OsStr::to_str)
        .map(str::to_string)
        .with_context(|| format!("{} has no usable file name", args.file.display()))?;

    let crg = CrgMeta {
        filename,
        format,
        size_bytes: bytes.len() as u64,
        content_hash: bytes_hash(&bytes),
        uploaded_at: chrono::Utc::now(),
    };
    let hash = crg.content_hash.clone();
    engine.register_geometry(project, crg)?;
    println!("geometry registered (sha256 {hash})");
    Ok(ExitCode::SUCCESS)
}
