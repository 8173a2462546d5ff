//! Flow definition and graph analysis.
//!
//! - [`Arrow`] and [`Path`] - port-qualified edges and their builder
//! - [`Flow`] - named processes plus arrows
//! - [`AnalyzedFlowGraph`] - validated adjacency with memoized traversal

pub mod analysis;
pub mod arrow;
pub mod flow;

pub use analysis::AnalyzedFlowGraph;
pub use arrow::{Arrow, Path, DEFAULT_PORT};
pub use flow::Flow;
