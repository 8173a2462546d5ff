//! Execution ID generation and parsing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide counter shared by every kind of execution.
static NEXT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// A unique identifier for one flow or process execution.
///
/// Format: `{kind}_{sequence}`, e.g. `flow_12` or `process_13`. Uniqueness
/// within the running program comes from a monotonically increasing counter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExecutionId {
    kind: String,
    sequence: u64,
}

impl ExecutionId {
    /// Generate the next ID for `kind`.
    pub fn next(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            sequence: NEXT_SEQUENCE.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Kind prefix (`flow`, `process`, ...).
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Counter value.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Get the ID as a string.
    pub fn as_str(&self) -> String {
        self.to_string()
    }

    /// Parse an ID from a string.
    pub fn parse(s: &str) -> Option<Self> {
        let (kind, sequence) = s.rsplit_once('_')?;
        if kind.is_empty() {
            return None;
        }
        let sequence: u64 = sequence.parse().ok()?;
        Some(Self {
            kind: kind.to_string(),
            sequence,
        })
    }
}

impl fmt::Display for ExecutionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.kind, self.sequence)
    }
}

// Custom serialization to store as string
impl Serialize for ExecutionId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ExecutionId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ExecutionId::parse(&s)
            .ok_or_else(|| serde::de::Error::custom("Invalid execution ID format"))
    }
}
