//! Lifecycle notifications for flow runs.
//!
//! A [`RunListener`] is told when a run starts and shuts down, and when each
//! process is initialized, started, completed or failed. Listeners run on
//! the calling thread, in registration order. An error returned by one
//! listener is logged and does not stop the others from being notified.

mod logging;
mod recording;

pub use logging::LoggingListener;
pub use recording::{RecordingListener, RunEvent};

use std::sync::Arc;

use tracing::warn;

use crate::error::FlowError;
use crate::execution::{FlowExecution, OutputStream, ProcessExecution};

/// Observer of a flow run's lifecycle.
///
/// Every method defaults to doing nothing.
pub trait RunListener: Send + Sync {
    /// The run is about to initialize its processes.
    fn flow_started(&self, _flow: &FlowExecution<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Every process performed successfully. Not sent for failed runs.
    fn flow_shutdown(&self, _flow: &FlowExecution<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// `Process::initialize` returned successfully.
    fn process_initialized(&self, _process: &ProcessExecution) -> anyhow::Result<()> {
        Ok(())
    }

    /// `Process::perform` is about to be called.
    fn process_started(&self, _process: &ProcessExecution) -> anyhow::Result<()> {
        Ok(())
    }

    /// `Process::perform` returned successfully.
    fn process_completed(
        &self,
        _process: &ProcessExecution,
        _output: &OutputStream,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    /// `Process::initialize` or `Process::perform` failed; the run aborts.
    fn process_failed(
        &self,
        _process: &ProcessExecution,
        _error: &FlowError,
    ) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Ordered listeners notified together.
#[derive(Clone, Default)]
pub struct ListenerSet {
    listeners: Vec<Arc<dyn RunListener>>,
}

impl ListenerSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a listener.
    pub fn push(&mut self, listener: Arc<dyn RunListener>) {
        self.listeners.push(listener);
    }

    /// Listeners in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn RunListener>> {
        self.listeners.iter()
    }

    /// Number of listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether no listener is registered.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub(crate) fn flow_started(&self, flow: &FlowExecution<'_>) {
        self.notify("flow_started", |l| l.flow_started(flow));
    }

    pub(crate) fn flow_shutdown(&self, flow: &FlowExecution<'_>) {
        self.notify("flow_shutdown", |l| l.flow_shutdown(flow));
    }

    pub(crate) fn process_initialized(&self, process: &ProcessExecution) {
        self.notify("process_initialized", |l| l.process_initialized(process));
    }

    pub(crate) fn process_started(&self, process: &ProcessExecution) {
        self.notify("process_started", |l| l.process_started(process));
    }

    pub(crate) fn process_completed(&self, process: &ProcessExecution, output: &OutputStream) {
        self.notify("process_completed", |l| l.process_completed(process, output));
    }

    pub(crate) fn process_failed(&self, process: &ProcessExecution, error: &FlowError) {
        self.notify("process_failed", |l| l.process_failed(process, error));
    }

    fn notify(
        &self,
        event: &str,
        mut deliver: impl FnMut(&dyn RunListener) -> anyhow::Result<()>,
    ) {
        for listener in &self.listeners {
            if let Err(e) = deliver(listener.as_ref()) {
                warn!("Listener failed on {}: {:#}", event, e);
            }
        }
    }
}

impl std::fmt::Debug for ListenerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerSet")
            .field("len", &self.listeners.len())
            .finish()
    }
}
