//! Error types for procflow operations.
//!
//! This module defines [`FlowError`], the error type returned by graph
//! construction, analysis and execution, and a [`Result`] type alias.
//!
//! # Error Handling Strategy
//!
//! - Graph problems are reported by `Flow::analyze` before anything runs
//! - Process bodies return `anyhow::Result`; the engine wraps their errors in
//!   [`FlowError::ProcessFailed`] or [`FlowError::InitializationFailed`]
//! - Every error is fatal to the run that produced it

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for procflow operations.
#[derive(Debug, Error)]
pub enum FlowError {
    /// An arrow references a process that was never registered.
    #[error("Arrow {arrow} references unknown process '{process}'")]
    UnknownProcess { process: String, arrow: String },

    /// An arrow was started with `from` but never given a destination.
    #[error("Arrow from '{from}' has no destination")]
    UnboundArrow { from: String },

    /// `to` was called on a path with no arrow to bind.
    #[error("Path destination '{process}' has no source arrow")]
    OrphanDestination { process: String },

    /// A port was named on a path with no arrow to attach it to.
    #[error("Port '{port}' was named on a path with no arrow")]
    PortWithoutArrow { port: String },

    /// Two arrows feed the same input port of one process.
    #[error("Process '{process}' has more than one arrow on input port '{port}'")]
    DuplicateInputPort { process: String, port: String },

    /// The arrow set contains a cycle.
    #[error("Circular dependency detected: {cycle}")]
    CircularDependency { cycle: String },

    /// A process name has no registered implementation.
    #[error("Process not found: {name}")]
    ProcessNotFound { name: String },

    /// `Process::initialize` returned an error.
    #[error("Process '{process}' failed to initialize: {source}")]
    InitializationFailed {
        process: String,
        #[source]
        source: anyhow::Error,
    },

    /// `Process::perform` returned an error.
    #[error("Process '{process}' failed: {source}")]
    ProcessFailed {
        process: String,
        #[source]
        source: anyhow::Error,
    },

    /// A process read an input port that is not bound.
    #[error("Port '{port}' not found for process '{process}'")]
    PortNotFound { process: String, port: String },

    /// A process read a bound input whose upstream never wrote the port.
    #[error("Process '{process}' reads port '{port}' of '{upstream}', which was never written")]
    OutputNotWritten {
        process: String,
        upstream: String,
        port: String,
    },

    /// A default read was attempted on a process with several inputs.
    #[error("Process '{process}' has several input ports ({ports}); read one by name")]
    AmbiguousInput { process: String, ports: String },

    /// A context key is absent from every layer.
    #[error("Context key not found: {key}")]
    MissingKey { key: String },

    /// A context value exists but has a different type.
    #[error("Context key '{key}' does not hold a value of type {expected}")]
    TypeMismatch { key: String, expected: String },

    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FlowError {
    /// Name of the process this error is attributed to, if any.
    pub fn process(&self) -> Option<&str> {
        match self {
            FlowError::InitializationFailed { process, .. }
            | FlowError::ProcessFailed { process, .. }
            | FlowError::PortNotFound { process, .. }
            | FlowError::OutputNotWritten { process, .. }
            | FlowError::AmbiguousInput { process, .. }
            | FlowError::DuplicateInputPort { process, .. } => Some(process),
            FlowError::ProcessNotFound { name } => Some(name),
            _ => None,
        }
    }
}

/// Result type alias for procflow operations.
pub type Result<T> = std::result::Result<T, FlowError>;
