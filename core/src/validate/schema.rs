//! Structural schema validation for PSPEC revisions.
//!
//! The external contract is an embedded Draft-7 JSON Schema, compiled
//! once at construction. Synthesis should never produce a violating
//! record; this check runs anyway, as an independent safety net before
//! anything is persisted.

use jsonschema::{Draft, JSONSchema};
use serde_json::Value;

use credenza_protocol::spec::ParametricSpec;

use crate::error::CoreError;

/// One structural violation: message plus the JSON pointer it occurred at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchemaViolation {
    pub pointer: String,
    pub message: String,
}

/// Compiled PSPEC schema.
///
/// The schema is embedded at compile time with `include_str!` so the
/// validator has no filesystem dependency at runtime.
pub struct SchemaValidator {
    schema: JSONSchema,
}

impl SchemaValidator {
    pub fn new() -> Result<Self, CoreError> {
        let raw = include_str!("pspec.schema.json");
        let schema_value: Value = serde_json::from_str(raw)
            .map_err(|e| CoreError::SchemaCompile(format!("embedded schema is not JSON: {e}")))?;

        let schema = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&schema_value)
            .map_err(|e| CoreError::SchemaCompile(e.to_string()))?;

        Ok(Self { schema })
    }

    /// Validate a specification record; empty result means conformant.
    pub fn validate(&self, spec: &ParametricSpec) -> Result<Vec<SchemaViolation>, CoreError> {
        let value = serde_json::to_value(spec).map_err(|source| CoreError::Serialize { source })?;
        Ok(self.validate_value(&value))
    }

    /// Validate an already-serialized record. Exposed so stored JSON can
    /// be re-checked without deserializing through the typed model.
    pub fn validate_value(&self, value: &Value) -> Vec<SchemaViolation> {
        match self.schema.validate(value) {
            Ok(()) => Vec::new(),
            Err(errors) => errors
                .map(|e| {
                    let path = e.instance_path.to_string();
                    SchemaViolation {
                        pointer: if path.is_empty() { "/".to_string() } else { path },
                        message: e.to_string(),
                    }
                })
                .collect(),
        }
    }
}
