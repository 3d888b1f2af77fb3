//! Concept reference geometry (CRG) metadata.
//!
//! The uploaded mesh is non-authoritative: once ingested, only its
//! provenance is carried through the pipeline. The geometry payload never
//! contributes a single dimension to the specification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Supported reference mesh formats.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeshFormat {
    Stl,
    Obj,
    Ply,
}

impl MeshFormat {
    /// Resolve a format from a filename extension, case-insensitive.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "stl" => Some(Self::Stl),
            "obj" => Some(Self::Obj),
            "ply" => Some(Self::Ply),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stl => "stl",
            Self::Obj => "obj",
            Self::Ply => "ply",
        }
    }
}

/// Metadata-only record of an ingested reference mesh.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CrgMeta {
    /// Original filename of the upload.
    pub filename: String,
    /// Mesh format.
    pub format: MeshFormat,
    /// Payload size in bytes.
    pub size_bytes: u64,
    /// Lowercase-hex SHA-256 of the payload bytes.
    pub content_hash: String,
    /// When the mesh was ingested.
    pub uploaded_at: DateTime<Utc>,
}
