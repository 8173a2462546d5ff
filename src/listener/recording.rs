//! Listener that keeps every event in memory.

use std::sync::{Mutex, MutexGuard};

use crate::error::FlowError;
use crate::execution::{ExecutionId, FlowExecution, OutputStream, ProcessExecution};

use super::RunListener;

/// A lifecycle event captured by [`RecordingListener`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    FlowStarted { flow: String, execution: ExecutionId },
    FlowShutdown { flow: String, execution: ExecutionId },
    ProcessInitialized { process: String, execution: ExecutionId },
    ProcessStarted { process: String, execution: ExecutionId },
    ProcessCompleted { process: String, execution: ExecutionId },
    ProcessFailed {
        process: String,
        execution: ExecutionId,
        error: String,
    },
}

impl RunEvent {
    /// Short event name, e.g. `process_completed`.
    pub fn kind(&self) -> &'static str {
        match self {
            RunEvent::FlowStarted { .. } => "flow_started",
            RunEvent::FlowShutdown { .. } => "flow_shutdown",
            RunEvent::ProcessInitialized { .. } => "process_initialized",
            RunEvent::ProcessStarted { .. } => "process_started",
            RunEvent::ProcessCompleted { .. } => "process_completed",
            RunEvent::ProcessFailed { .. } => "process_failed",
        }
    }

    /// Process the event is about, for process events.
    pub fn process(&self) -> Option<&str> {
        match self {
            RunEvent::ProcessInitialized { process, .. }
            | RunEvent::ProcessStarted { process, .. }
            | RunEvent::ProcessCompleted { process, .. }
            | RunEvent::ProcessFailed { process, .. } => Some(process),
            RunEvent::FlowStarted { .. } | RunEvent::FlowShutdown { .. } => None,
        }
    }
}

/// Collects [`RunEvent`]s in the order they were delivered.
#[derive(Debug, Default)]
pub struct RecordingListener {
    events: Mutex<Vec<RunEvent>>,
}

impl RecordingListener {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every event so far.
    pub fn events(&self) -> Vec<RunEvent> {
        self.lock().clone()
    }

    /// `kind()` of every event so far.
    pub fn kinds(&self) -> Vec<&'static str> {
        self.lock().iter().map(RunEvent::kind).collect()
    }

    /// Processes that produced an event of `kind`, in order.
    pub fn processes_with(&self, kind: &str) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|e| e.kind() == kind)
            .filter_map(|e| e.process().map(str::to_string))
            .collect()
    }

    fn record(&self, event: RunEvent) {
        self.lock().push(event);
    }

    fn lock(&self) -> MutexGuard<'_, Vec<RunEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl RunListener for RecordingListener {
    fn flow_started(&self, flow: &FlowExecution<'_>) -> anyhow::Result<()> {
        self.record(RunEvent::FlowStarted {
            flow: flow.flow().name().to_string(),
            execution: flow.id().clone(),
        });
        Ok(())
    }

    fn flow_shutdown(&self, flow: &FlowExecution<'_>) -> anyhow::Result<()> {
        self.record(RunEvent::FlowShutdown {
            flow: flow.flow().name().to_string(),
            execution: flow.id().clone(),
        });
        Ok(())
    }

    fn process_initialized(&self, process: &ProcessExecution) -> anyhow::Result<()> {
        self.record(RunEvent::ProcessInitialized {
            process: process.name().to_string(),
            execution: process.id().clone(),
        });
        Ok(())
    }

    fn process_started(&self, process: &ProcessExecution) -> anyhow::Result<()> {
        self.record(RunEvent::ProcessStarted {
            process: process.name().to_string(),
            execution: process.id().clone(),
        });
        Ok(())
    }

    fn process_completed(
        &self,
        process: &ProcessExecution,
        _: &OutputStream,
    ) -> anyhow::Result<()> {
        self.record(RunEvent::ProcessCompleted {
            process: process.name().to_string(),
            execution: process.id().clone(),
        });
        Ok(())
    }

    fn process_failed(&self, process: &ProcessExecution, error: &FlowError) -> anyhow::Result<()> {
        self.record(RunEvent::ProcessFailed {
            process: process.name().to_string(),
            execution: process.id().clone(),
            error: error.to_string(),
        });
        Ok(())
    }
}
