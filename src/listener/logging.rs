//! Default listener writing one debug line per event.

use tracing::debug;

use crate::error::FlowError;
use crate::execution::{FlowExecution, OutputStream, ProcessExecution};

use super::RunListener;

/// Logs every lifecycle event through `tracing` at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingListener;

impl RunListener for LoggingListener {
    fn flow_started(&self, flow: &FlowExecution<'_>) -> anyhow::Result<()> {
        debug!("Flow '{}' started ({})", flow.flow().name(), flow.id());
        Ok(())
    }

    fn flow_shutdown(&self, flow: &FlowExecution<'_>) -> anyhow::Result<()> {
        debug!("Flow '{}' shut down ({})", flow.flow().name(), flow.id());
        Ok(())
    }

    fn process_initialized(&self, process: &ProcessExecution) -> anyhow::Result<()> {
        debug!("Process '{}' initialized ({})", process.name(), process.id());
        Ok(())
    }

    fn process_started(&self, process: &ProcessExecution) -> anyhow::Result<()> {
        debug!("Process '{}' started ({})", process.name(), process.id());
        Ok(())
    }

    fn process_completed(
        &self,
        process: &ProcessExecution,
        output: &OutputStream,
    ) -> anyhow::Result<()> {
        let mut ports: Vec<&str> = output.ports().collect();
        ports.sort_unstable();
        debug!(
            "Process '{}' completed ({}), wrote [{}]",
            process.name(),
            process.id(),
            ports.join(", ")
        );
        Ok(())
    }

    fn process_failed(&self, process: &ProcessExecution, error: &FlowError) -> anyhow::Result<()> {
        debug!("Process '{}' failed ({}): {}", process.name(), process.id(), error);
        Ok(())
    }
}
