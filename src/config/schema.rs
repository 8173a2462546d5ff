//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::context::Context;

/// Root configuration for a [`FlowRunner`](crate::execution::FlowRunner).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Register the logging listener on every run.
    #[serde(default = "default_true")]
    pub log_events: bool,

    /// Values seeded into the runner context.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub settings: BTreeMap<String, serde_yaml::Value>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            log_events: true,
            settings: BTreeMap::new(),
        }
    }
}

impl RunnerConfig {
    /// Put every setting into `context` as a `serde_yaml::Value`.
    pub fn apply(&self, context: &Context) {
        for (key, value) in &self.settings {
            context.put(key.clone(), value.clone());
        }
    }
}

fn default_true() -> bool {
    true
}
