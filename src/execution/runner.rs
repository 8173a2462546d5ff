//! Entry point for running flows.

use std::any::Any;
use std::path::Path;
use std::sync::Arc;

use crate::config::{load_config, RunnerConfig};
use crate::context::Context;
use crate::error::Result;
use crate::graph::Flow;
use crate::listener::{ListenerSet, LoggingListener, RunListener};

use super::flow_execution::FlowExecution;

/// Holds the root context and the listeners shared by every run.
#[derive(Debug)]
pub struct FlowRunner {
    config: RunnerConfig,
    context: Arc<Context>,
    listeners: ListenerSet,
}

impl FlowRunner {
    /// Create a runner with the default configuration.
    pub fn new() -> Self {
        Self::with_config(RunnerConfig::default())
    }

    /// Create a runner whose context is seeded from `config.settings`.
    pub fn with_config(config: RunnerConfig) -> Self {
        let context = Context::root("runner");
        config.apply(&context);
        Self {
            config,
            context,
            listeners: ListenerSet::new(),
        }
    }

    /// Create a runner from a YAML configuration file.
    pub fn from_config_file(path: &Path) -> Result<Self> {
        Ok(Self::with_config(load_config(path)?))
    }

    /// The configuration this runner was built from.
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Root context every run falls back to.
    pub fn context(&self) -> &Arc<Context> {
        &self.context
    }

    /// Bind a value in the runner context.
    pub fn bind<T: Any + Send + Sync>(&self, key: impl Into<String>, value: T) -> &Self {
        self.context.put(key, value);
        self
    }

    /// Register a listener for every run started by this runner.
    pub fn add_listener(&mut self, listener: Arc<dyn RunListener>) -> &mut Self {
        self.listeners.push(listener);
        self
    }

    /// Validate `flow` and prepare a run of it.
    ///
    /// Graph errors (unknown processes, unbound arrows, cycles) surface here,
    /// before any process is touched.
    pub fn run<'f>(&self, flow: &'f Flow) -> Result<FlowExecution<'f>> {
        let graph = flow.analyze()?;

        let mut listeners = ListenerSet::new();
        if self.config.log_events {
            listeners.push(Arc::new(LoggingListener));
        }
        for listener in self.listeners.iter() {
            listeners.push(Arc::clone(listener));
        }

        Ok(FlowExecution::new(flow, graph, &self.context, listeners))
    }
}

impl Default for FlowRunner {
    fn default() -> Self {
        Self::new()
    }
}
