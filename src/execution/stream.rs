//! Per-process input and output streams.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{FlowError, Result};
use crate::graph::DEFAULT_PORT;
use crate::process::Dataset;

/// Datasets written by one process, keyed by output port.
#[derive(Debug, Clone)]
pub struct OutputStream {
    process: String,
    ports: HashMap<String, Dataset>,
}

impl OutputStream {
    /// Create an empty output stream for `process`.
    pub fn new(process: impl Into<String>) -> Self {
        Self {
            process: process.into(),
            ports: HashMap::new(),
        }
    }

    /// Name of the process writing this stream.
    pub fn process(&self) -> &str {
        &self.process
    }

    /// Write `dataset` on `port`, replacing any earlier write.
    pub fn write(&mut self, port: impl Into<String>, dataset: Dataset) -> &mut Self {
        self.ports.insert(port.into(), dataset);
        self
    }

    /// Write `dataset` on the default port.
    pub fn write_default(&mut self, dataset: Dataset) -> &mut Self {
        self.write(DEFAULT_PORT, dataset)
    }

    /// Dataset written on `port`, if any.
    pub fn get(&self, port: &str) -> Option<&Dataset> {
        self.ports.get(port)
    }

    /// Ports written so far.
    pub fn ports(&self) -> impl Iterator<Item = &str> {
        self.ports.keys().map(String::as_str)
    }

    /// Whether nothing was written.
    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }
}

/// One input port: an upstream output stream and the port read from it.
#[derive(Debug, Clone)]
struct Binding {
    upstream: Arc<OutputStream>,
    output_port: String,
}

/// Upstream outputs visible to one process, keyed by input port.
#[derive(Debug, Clone)]
pub struct InputStream {
    process: String,
    bindings: HashMap<String, Binding>,
}

impl InputStream {
    /// Create an input stream with no bound ports.
    pub fn new(process: impl Into<String>) -> Self {
        Self {
            process: process.into(),
            bindings: HashMap::new(),
        }
    }

    /// Name of the process reading this stream.
    pub fn process(&self) -> &str {
        &self.process
    }

    /// Bind `input_port` to `output_port` of an upstream stream.
    pub fn bind(
        &mut self,
        input_port: impl Into<String>,
        upstream: Arc<OutputStream>,
        output_port: impl Into<String>,
    ) -> &mut Self {
        self.bindings.insert(
            input_port.into(),
            Binding {
                upstream,
                output_port: output_port.into(),
            },
        );
        self
    }

    /// Read the dataset arriving on `port`.
    ///
    /// Fails with `PortNotFound` when `port` is not bound and with
    /// `OutputNotWritten` when the upstream never wrote the bound port.
    pub fn read(&self, port: &str) -> Result<&Dataset> {
        let binding = self.bindings.get(port).ok_or_else(|| self.port_not_found(port))?;
        binding
            .upstream
            .get(&binding.output_port)
            .ok_or_else(|| FlowError::OutputNotWritten {
                process: self.process.clone(),
                upstream: binding.upstream.process().to_string(),
                port: binding.output_port.clone(),
            })
    }

    /// Read the only input.
    ///
    /// Fails with `PortNotFound` when nothing is bound and with
    /// `AmbiguousInput` when more than one port is.
    pub fn read_default(&self) -> Result<&Dataset> {
        let mut ports = self.bindings.keys();
        match (ports.next(), ports.next()) {
            (Some(port), None) => self.read(port),
            (None, _) => Err(self.port_not_found(DEFAULT_PORT)),
            (Some(_), Some(_)) => {
                let mut names: Vec<&str> = self.ports().collect();
                names.sort_unstable();
                Err(FlowError::AmbiguousInput {
                    process: self.process.clone(),
                    ports: names.join(", "),
                })
            }
        }
    }

    /// Bound input port names.
    pub fn ports(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    /// Whether `port` is bound.
    pub fn has_port(&self, port: &str) -> bool {
        self.bindings.contains_key(port)
    }

    /// Number of bound ports.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether no port is bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    fn port_not_found(&self, port: &str) -> FlowError {
        FlowError::PortNotFound {
            process: self.process.clone(),
            port: port.to_string(),
        }
    }
}
