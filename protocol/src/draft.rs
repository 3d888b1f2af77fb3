//! The in-progress answer draft.
//!
//! A draft is the single mutable document of a project: an untyped mapping
//! from dotted store paths (for example `overall.width_mm`) to raw answer
//! values. It is overwritten on every save and carries no revision
//! history - confirmation turns it into an immutable
//! [`DesignIntentBrief`](crate::brief::DesignIntentBrief) revision.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Partially filled, untyped answers keyed by dotted store path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    /// Raw answer values. A `BTreeMap` keeps serialization key-sorted.
    pub answers: BTreeMap<String, Value>,
    /// When the draft was last saved.
    pub updated_at: DateTime<Utc>,
}

impl Draft {
    /// Create an empty draft stamped with `now`.
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            answers: BTreeMap::new(),
            updated_at: now,
        }
    }

    /// Look up the raw answer at `path`, if any.
    pub fn answer(&self, path: &str) -> Option<&Value> {
        self.answers.get(path)
    }

    /// Set (or overwrite) the answer at `path`.
    pub fn set(&mut self, path: impl Into<String>, value: Value, now: DateTime<Utc>) {
        self.answers.insert(path.into(), value);
        self.updated_at = now;
    }
}
