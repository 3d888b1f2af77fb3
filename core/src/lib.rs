//! Root of the `credenza-core` library.
//!
//! The deterministic transformation-and-validation pipeline: draft
//! normalization into a Design Intent Brief, PSPEC synthesis, schema and
//! manufacturability validation, CAD variable mapping, approval
//! transitions, and the revisioned project store. Every pipeline stage is
//! a synchronous, side-effect-free function; all I/O lives in the store
//! implementations and the [`engine::PipelineEngine`].

// Prevent accidental direct writes to stdout/stderr in library code. All
// user-visible output must go through the CLI or the tracing stack.
#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod approval;
pub mod engine;
pub mod error;
pub mod normalizer;
pub mod onshape;
pub mod questions;
pub mod store;
pub mod summary;
pub mod synthesizer;
pub mod validate;

pub use approval::{ApprovalError, Decision};
pub use engine::{BlockReason, ConfirmOutcome, GenerateOutcome, PipelineEngine};
pub use error::{CoreError, Result};
pub use normalizer::{ValidationIssue, normalize};
pub use onshape::contract::ONSHAPE_CONTRACT_VERSION;
pub use onshape::mapper::{IssueCode, MappingIssue, map_to_variables};
pub use store::{ProjectStore, StoreError, fs::FsProjectStore, memory::MemoryProjectStore};
pub use summary::render_summary;
pub use synthesizer::synthesize;
pub use validate::manufacturability::{Feasibility, MIN_LP_DRAWER_DEPTH_MM, check_manufacturability};
pub use validate::schema::{SchemaValidator, SchemaViolation};

/// Core pipeline version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
