//! Static flow definition: named processes plus the arrows between them.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::Result;
use crate::process::Process;

use super::analysis::AnalyzedFlowGraph;
use super::arrow::{Arrow, Path};

/// A named, directed graph of processes.
///
/// # Example
///
/// ```
/// use procflow::graph::{Flow, Path};
/// use procflow::process::{Dataset, FnProcess};
///
/// let mut flow = Flow::new("nightly");
/// flow.add_process("extract", FnProcess::new(|_, out, _| {
///     out.write_default(Dataset::new(3u32));
///     Ok(())
/// }));
/// flow.add_process("load", FnProcess::new(|input, _, _| {
///     input.read_default()?;
///     Ok(())
/// }));
/// flow.add_path(Path::from_process("extract").to("load"));
///
/// let graph = flow.analyze().unwrap();
/// assert_eq!(graph.sinks(), vec!["load"]);
/// ```
pub struct Flow {
    name: String,
    /// Registered processes, in registration order.
    processes: Vec<(String, Arc<dyn Process>)>,
    index: HashMap<String, usize>,
    arrows: Vec<Arrow>,
    /// Destinations passed to `to` on paths with no arrow.
    orphans: Vec<String>,
    /// Port names given on paths with no arrow.
    stray_ports: Vec<String>,
}

impl Flow {
    /// Create an empty flow.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            processes: Vec::new(),
            index: HashMap::new(),
            arrows: Vec::new(),
            orphans: Vec::new(),
            stray_ports: Vec::new(),
        }
    }

    /// Flow name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a process under `name`.
    ///
    /// Registering a name twice replaces the earlier process (last write
    /// wins) and keeps its original position.
    pub fn add_process(
        &mut self,
        name: impl Into<String>,
        process: impl Process + 'static,
    ) -> &mut Self {
        self.add_shared_process(name, Arc::new(process))
    }

    /// Register an already shared process.
    pub fn add_shared_process(
        &mut self,
        name: impl Into<String>,
        process: Arc<dyn Process>,
    ) -> &mut Self {
        let name = name.into();
        match self.index.get(&name) {
            Some(&slot) => self.processes[slot].1 = process,
            None => {
                self.index.insert(name.clone(), self.processes.len());
                self.processes.push((name, process));
            }
        }
        self
    }

    /// Append every arrow of `path`.
    pub fn add_path(&mut self, path: Path) -> &mut Self {
        let (arrows, orphans, stray_ports) = path.into_parts();
        self.arrows.extend(arrows);
        self.orphans.extend(orphans);
        self.stray_ports.extend(stray_ports);
        self
    }

    /// Append a single arrow.
    pub fn add_arrow(&mut self, arrow: Arrow) -> &mut Self {
        self.arrows.push(arrow);
        self
    }

    /// Look up a process by name.
    pub fn process(&self, name: &str) -> Option<&Arc<dyn Process>> {
        self.index.get(name).map(|&slot| &self.processes[slot].1)
    }

    /// Process names in registration order.
    pub fn process_names(&self) -> impl Iterator<Item = &str> {
        self.processes.iter().map(|(name, _)| name.as_str())
    }

    /// Every arrow added so far, in insertion order.
    pub fn arrows(&self) -> &[Arrow] {
        &self.arrows
    }

    pub(crate) fn orphans(&self) -> &[String] {
        &self.orphans
    }

    pub(crate) fn stray_ports(&self) -> &[String] {
        &self.stray_ports
    }

    /// Number of registered processes.
    pub fn len(&self) -> usize {
        self.processes.len()
    }

    /// Whether no process is registered.
    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// Validate the flow and build its adjacency view.
    ///
    /// Never mutates the flow; each call returns an independent graph.
    pub fn analyze(&self) -> Result<AnalyzedFlowGraph> {
        AnalyzedFlowGraph::build(self)
    }
}

impl fmt::Debug for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flow")
            .field("name", &self.name)
            .field("processes", &self.process_names().collect::<Vec<_>>())
            .field("arrows", &self.arrows)
            .finish()
    }
}
