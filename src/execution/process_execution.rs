//! One process within a run.

use std::fmt;
use std::sync::Arc;

use crate::context::Context;
use crate::error::{FlowError, Result};
use crate::listener::ListenerSet;
use crate::process::Process;

use super::id::ExecutionId;
use super::stream::{InputStream, OutputStream};

/// Run-scoped state of a single process: its ID and its own context layer.
pub struct ProcessExecution {
    id: ExecutionId,
    flow_id: ExecutionId,
    name: String,
    process: Arc<dyn Process>,
    context: Arc<Context>,
}

impl ProcessExecution {
    pub(crate) fn new(
        name: &str,
        process: Arc<dyn Process>,
        flow_context: &Arc<Context>,
        flow_id: &ExecutionId,
    ) -> Self {
        Self {
            id: ExecutionId::next("process"),
            flow_id: flow_id.clone(),
            name: name.to_string(),
            process,
            context: flow_context.child(format!("process:{}", name)),
        }
    }

    /// Unique ID of this process execution.
    pub fn id(&self) -> &ExecutionId {
        &self.id
    }

    /// ID of the flow execution this belongs to.
    pub fn flow_id(&self) -> &ExecutionId {
        &self.flow_id
    }

    /// Process name within the flow.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Process-level context; falls back to the flow and runner layers.
    pub fn context(&self) -> &Arc<Context> {
        &self.context
    }

    /// Run `Process::initialize` against the flow context.
    pub(crate) fn initialize(&self, flow_context: &Context, listeners: &ListenerSet) -> Result<()> {
        match self.process.initialize(flow_context) {
            Ok(()) => {
                listeners.process_initialized(self);
                Ok(())
            }
            Err(source) => {
                let err = FlowError::InitializationFailed {
                    process: self.name.clone(),
                    source,
                };
                listeners.process_failed(self, &err);
                Err(err)
            }
        }
    }

    /// Run `Process::perform`, returning what it wrote.
    pub(crate) fn perform(
        &self,
        input: &InputStream,
        listeners: &ListenerSet,
    ) -> Result<OutputStream> {
        listeners.process_started(self);

        let mut output = OutputStream::new(self.name.as_str());
        match self.process.perform(input, &mut output, &self.context) {
            Ok(()) => {
                listeners.process_completed(self, &output);
                Ok(output)
            }
            Err(source) => {
                let err = FlowError::ProcessFailed {
                    process: self.name.clone(),
                    source,
                };
                listeners.process_failed(self, &err);
                Err(err)
            }
        }
    }
}

impl fmt::Debug for ProcessExecution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessExecution")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("context", &self.context)
            .finish()
    }
}
