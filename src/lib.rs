//! Procflow - run named graphs of data-transforming processes.
//!
//! A [`Flow`](graph::Flow) is a set of named processes connected by
//! port-qualified arrows. Running a flow initializes every process, then
//! performs each one exactly once, after everything upstream of it, feeding
//! it the datasets its upstream processes wrote.
//!
//! # Modules
//!
//! - [`config`] - Runner configuration loading
//! - [`context`] - Layered key/value context with parent fallback
//! - [`error`] - Error types and result aliases
//! - [`execution`] - Flow runs, process runs and their streams
//! - [`graph`] - Flow definition, validation and traversal
//! - [`listener`] - Lifecycle notifications
//! - [`logging`] - Tracing subscriber setup
//! - [`process`] - The process contract and dataset handle
//!
//! # Example
//!
//! ```
//! use procflow::execution::FlowRunner;
//! use procflow::graph::{Flow, Path};
//! use procflow::process::{Dataset, FnProcess};
//!
//! let mut flow = Flow::new("greeting");
//! flow.add_process("name", FnProcess::new(|_, out, _| {
//!     out.write_default(Dataset::new("world".to_string()));
//!     Ok(())
//! }));
//! flow.add_process("greet", FnProcess::new(|input, out, _| {
//!     let name = input.read("name")?.downcast_ref::<String>().cloned().unwrap_or_default();
//!     out.write_default(Dataset::new(format!("hello, {}", name)));
//!     Ok(())
//! }));
//! flow.add_path(Path::from_process("name").to("greet"));
//!
//! let result = FlowRunner::new().run(&flow).unwrap().start().unwrap();
//! let greeting = result.dataset("greet", "default").and_then(|d| d.downcast_ref::<String>());
//! assert_eq!(greeting.map(String::as_str), Some("hello, world"));
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod execution;
pub mod graph;
pub mod listener;
pub mod logging;
pub mod process;

pub use error::{FlowError, Result};
