//! One run of a flow.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::context::Context;
use crate::error::{FlowError, Result};
use crate::graph::{AnalyzedFlowGraph, Flow};
use crate::listener::{ListenerSet, RunListener};
use crate::process::Dataset;

use super::id::ExecutionId;
use super::process_execution::ProcessExecution;
use super::stream::{InputStream, OutputStream};

/// Outcome of a successful run.
#[derive(Debug)]
pub struct FlowResult {
    /// Flow name.
    pub flow: String,
    /// ID of the run.
    pub execution: ExecutionId,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Total duration.
    pub duration: Duration,
    /// Processes in the order they performed.
    pub performed: Vec<String>,
    /// What each process wrote.
    pub outputs: HashMap<String, Arc<OutputStream>>,
}

impl FlowResult {
    /// Output stream of `process`.
    pub fn output(&self, process: &str) -> Option<&OutputStream> {
        self.outputs.get(process).map(Arc::as_ref)
    }

    /// Dataset `process` wrote on `port`.
    pub fn dataset(&self, process: &str, port: &str) -> Option<&Dataset> {
        self.output(process)?.get(port)
    }
}

/// A single run of a [`Flow`].
///
/// Created by [`FlowRunner::run`](super::FlowRunner::run) and consumed by
/// [`start`](Self::start), so an execution is never reused.
pub struct FlowExecution<'f> {
    id: ExecutionId,
    flow: &'f Flow,
    graph: AnalyzedFlowGraph,
    context: Arc<Context>,
    listeners: ListenerSet,
}

impl<'f> FlowExecution<'f> {
    pub(crate) fn new(
        flow: &'f Flow,
        graph: AnalyzedFlowGraph,
        runner_context: &Arc<Context>,
        listeners: ListenerSet,
    ) -> Self {
        Self {
            id: ExecutionId::next("flow"),
            flow,
            graph,
            context: runner_context.child(format!("flow:{}", flow.name())),
            listeners,
        }
    }

    /// Unique ID of this run.
    pub fn id(&self) -> &ExecutionId {
        &self.id
    }

    /// The flow being run.
    pub fn flow(&self) -> &'f Flow {
        self.flow
    }

    /// The validated graph driving this run.
    pub fn graph(&self) -> &AnalyzedFlowGraph {
        &self.graph
    }

    /// Flow-level context; falls back to the runner context.
    pub fn context(&self) -> &Arc<Context> {
        &self.context
    }

    /// Register a listener for this run only.
    pub fn add_listener(&mut self, listener: Arc<dyn RunListener>) -> &mut Self {
        self.listeners.push(listener);
        self
    }

    /// Run the flow to completion.
    ///
    /// Every process is initialized first, then processes perform in
    /// dependency order, each exactly once. The first failure is reported to
    /// listeners as `process_failed` and returned; `flow_shutdown` is only
    /// sent when every process succeeded.
    pub fn start(self) -> Result<FlowResult> {
        let started_at = Utc::now();
        let clock = Instant::now();
        debug!("Starting flow '{}' as {}", self.flow.name(), self.id);

        self.listeners.flow_started(&self);

        let mut executions: HashMap<String, ProcessExecution> =
            HashMap::with_capacity(self.flow.len());
        for name in self.flow.process_names() {
            let process = self
                .flow
                .process(name)
                .ok_or_else(|| FlowError::ProcessNotFound {
                    name: name.to_string(),
                })?;
            let execution =
                ProcessExecution::new(name, Arc::clone(process), &self.context, &self.id);
            execution.initialize(&self.context, &self.listeners)?;
            executions.insert(name.to_string(), execution);
        }

        let mut performed = Vec::with_capacity(executions.len());
        let outputs = self
            .graph
            .visit(|name, upstream: HashMap<String, Arc<OutputStream>>| {
                let execution = executions.get(name).ok_or_else(|| FlowError::ProcessNotFound {
                    name: name.to_string(),
                })?;

                let mut input = InputStream::new(name);
                for arrow in self.graph.previous_arrows(name) {
                    if let Some(stream) = upstream.get(arrow.input_key()) {
                        input.bind(arrow.input_key(), Arc::clone(stream), arrow.output_key());
                    }
                }

                let output = execution.perform(&input, &self.listeners)?;
                performed.push(name.to_string());
                Ok(Arc::new(output))
            })?;

        self.listeners.flow_shutdown(&self);

        let duration = clock.elapsed();
        debug!(
            "Flow '{}' finished in {:?} ({} processes)",
            self.flow.name(),
            duration,
            performed.len()
        );

        Ok(FlowResult {
            flow: self.flow.name().to_string(),
            execution: self.id,
            started_at,
            duration,
            performed,
            outputs,
        })
    }
}

impl std::fmt::Debug for FlowExecution<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowExecution")
            .field("id", &self.id)
            .field("flow", &self.flow.name())
            .field("listeners", &self.listeners)
            .finish()
    }
}
