//! Run-scoped execution of flows.
//!
//! - [`FlowRunner`] - holds the runner context and starts runs
//! - [`FlowExecution`] - one run of a flow
//! - [`ProcessExecution`] - one process within a run
//! - [`InputStream`] / [`OutputStream`] - per-process port containers
//! - [`ExecutionId`] - unique run identifiers
//!
//! # Example
//!
//! ```
//! use procflow::execution::FlowRunner;
//! use procflow::graph::{Flow, Path};
//! use procflow::process::{Dataset, FnProcess};
//!
//! let mut flow = Flow::new("double");
//! flow.add_process("source", FnProcess::new(|_, out, ctx| {
//!     let base = ctx.require::<u32>("base")?;
//!     out.write_default(Dataset::new(*base));
//!     Ok(())
//! }));
//! flow.add_process("double", FnProcess::new(|input, out, _| {
//!     let n = input.read_default()?.downcast_ref::<u32>().copied().unwrap_or_default();
//!     out.write_default(Dataset::new(n * 2));
//!     Ok(())
//! }));
//! flow.add_path(Path::from_process("source").to("double"));
//!
//! let runner = FlowRunner::new();
//! runner.bind("base", 21u32);
//!
//! let result = runner.run(&flow).unwrap().start().unwrap();
//! let doubled = result.dataset("double", "default").and_then(|d| d.downcast_ref::<u32>());
//! assert_eq!(doubled, Some(&42));
//! ```

mod flow_execution;
mod id;
mod process_execution;
mod runner;
mod stream;

pub use flow_execution::{FlowExecution, FlowResult};
pub use id::ExecutionId;
pub use process_execution::ProcessExecution;
pub use runner::FlowRunner;
pub use stream::{InputStream, OutputStream};
