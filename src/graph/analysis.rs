//! Validated adjacency view of a flow and the memoized traversal over it.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::debug;

use crate::error::{FlowError, Result};

use super::arrow::Arrow;
use super::flow::Flow;

/// An arrow with both endpoints resolved to process slots.
#[derive(Debug, Clone)]
struct Edge {
    arrow: Arrow,
    from: usize,
    to: usize,
}

enum Frame {
    /// Schedule upstream processes, then come back.
    Enter(usize),
    /// Every upstream result is memoized; evaluate this process.
    Exit(usize),
}

/// Read-only adjacency view derived from a [`Flow`].
///
/// Processes live in an arena indexed in registration order; arrows refer
/// to them by slot. Construction validates that every arrow is bound, that
/// it references registered processes, that no process receives two inputs
/// under one port, and that the graph is acyclic.
#[derive(Debug, Clone)]
pub struct AnalyzedFlowGraph {
    flow: String,
    names: Vec<String>,
    index: HashMap<String, usize>,
    edges: Vec<Edge>,
    /// Edges terminating at each process (its inputs).
    previous: Vec<Vec<usize>>,
    /// Edges originating at each process (its outputs).
    next: Vec<Vec<usize>>,
}

impl AnalyzedFlowGraph {
    pub(crate) fn build(flow: &Flow) -> Result<Self> {
        if let Some(process) = flow.orphans().first() {
            return Err(FlowError::OrphanDestination {
                process: process.clone(),
            });
        }
        if let Some(port) = flow.stray_ports().first() {
            return Err(FlowError::PortWithoutArrow { port: port.clone() });
        }

        let names: Vec<String> = flow.process_names().map(str::to_string).collect();
        let index: HashMap<String, usize> = names
            .iter()
            .enumerate()
            .map(|(slot, name)| (name.clone(), slot))
            .collect();

        let mut edges: Vec<Edge> = Vec::with_capacity(flow.arrows().len());
        let mut previous: Vec<Vec<usize>> = vec![Vec::new(); names.len()];
        let mut next: Vec<Vec<usize>> = vec![Vec::new(); names.len()];

        for arrow in flow.arrows() {
            let to_name = arrow.to.as_deref().ok_or_else(|| FlowError::UnboundArrow {
                from: arrow.from.clone(),
            })?;
            let slot_of = |name: &str| {
                index.get(name).copied().ok_or_else(|| FlowError::UnknownProcess {
                    process: name.to_string(),
                    arrow: arrow.to_string(),
                })
            };
            let from = slot_of(&arrow.from)?;
            let to = slot_of(to_name)?;

            let duplicate = previous[to]
                .iter()
                .any(|&e| edges[e].arrow.input_key() == arrow.input_key());
            if duplicate {
                return Err(FlowError::DuplicateInputPort {
                    process: to_name.to_string(),
                    port: arrow.input_key().to_string(),
                });
            }

            let edge = edges.len();
            edges.push(Edge {
                arrow: arrow.clone(),
                from,
                to,
            });
            previous[to].push(edge);
            next[from].push(edge);
        }

        let graph = Self {
            flow: flow.name().to_string(),
            names,
            index,
            edges,
            previous,
            next,
        };

        if let Some(cycle) = graph.find_cycle() {
            return Err(FlowError::CircularDependency {
                cycle: cycle.join(" -> "),
            });
        }

        debug!(
            "Analyzed flow '{}': {} processes, {} arrows",
            graph.flow,
            graph.names.len(),
            graph.edges.len()
        );

        Ok(graph)
    }

    /// Name of the flow this graph was built from.
    pub fn flow_name(&self) -> &str {
        &self.flow
    }

    /// Number of processes.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the graph has no processes.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Check if a process exists in the graph.
    pub fn contains(&self, process: &str) -> bool {
        self.index.contains_key(process)
    }

    /// Process names in registration order.
    pub fn process_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Arrows terminating at `process`, in insertion order.
    pub fn previous_arrows(&self, process: &str) -> Vec<&Arrow> {
        self.arrows_at(process, &self.previous)
    }

    /// Arrows originating at `process`, in insertion order.
    pub fn next_arrows(&self, process: &str) -> Vec<&Arrow> {
        self.arrows_at(process, &self.next)
    }

    /// Names of the processes feeding `process`.
    pub fn upstream_of(&self, process: &str) -> Vec<&str> {
        self.previous_arrows(process)
            .into_iter()
            .map(|arrow| arrow.from.as_str())
            .collect()
    }

    /// Processes with no outgoing arrow; traversal roots.
    pub fn sinks(&self) -> Vec<&str> {
        self.sink_slots().map(|slot| self.names[slot].as_str()).collect()
    }

    /// Processes with no incoming arrow.
    pub fn sources(&self) -> Vec<&str> {
        (0..self.names.len())
            .filter(|&slot| self.previous[slot].is_empty())
            .map(|slot| self.names[slot].as_str())
            .collect()
    }

    /// Processes ordered so every arrow points forward.
    pub fn topological_order(&self) -> Vec<&str> {
        match self.kahn() {
            Ok(order) | Err(order) => order
                .into_iter()
                .map(|slot| self.names[slot].as_str())
                .collect(),
        }
    }

    /// Every process downstream of `process`, directly or indirectly.
    pub fn transitive_dependents(&self, process: &str) -> HashSet<String> {
        let mut result = HashSet::new();
        let mut to_visit: Vec<usize> = self.index.get(process).copied().into_iter().collect();

        while let Some(current) = to_visit.pop() {
            for &edge in &self.next[current] {
                let dependent = self.edges[edge].to;
                if result.insert(self.names[dependent].clone()) {
                    to_visit.push(dependent);
                }
            }
        }

        result
    }

    /// Evaluate every process once, dependencies first.
    ///
    /// Starting from each sink, `operator(name, inputs)` is called for a
    /// process only after it has returned for every upstream process; the
    /// `inputs` map holds those upstream results keyed by input port. Each
    /// result is memoized for the duration of this call, so a process shared
    /// by several dependents is evaluated exactly once. The first error
    /// returned by `operator` stops the traversal and is returned as is.
    ///
    /// Returns every process's result keyed by name.
    pub fn visit<R, F>(&self, mut operator: F) -> Result<HashMap<String, R>>
    where
        R: Clone,
        F: FnMut(&str, HashMap<String, R>) -> Result<R>,
    {
        let mut memo: Vec<Option<R>> = (0..self.names.len()).map(|_| None).collect();

        for sink in self.sink_slots() {
            let mut stack = vec![Frame::Enter(sink)];

            while let Some(frame) = stack.pop() {
                match frame {
                    Frame::Enter(slot) => {
                        if memo[slot].is_some() {
                            continue;
                        }
                        stack.push(Frame::Exit(slot));
                        // Reversed so the first input is evaluated first
                        for &edge in self.previous[slot].iter().rev() {
                            let upstream = self.edges[edge].from;
                            if memo[upstream].is_none() {
                                stack.push(Frame::Enter(upstream));
                            }
                        }
                    }
                    Frame::Exit(slot) => {
                        if memo[slot].is_some() {
                            continue;
                        }
                        let mut inputs = HashMap::with_capacity(self.previous[slot].len());
                        for &edge in &self.previous[slot] {
                            let edge = &self.edges[edge];
                            let value = memo[edge.from].clone().ok_or_else(|| {
                                FlowError::CircularDependency {
                                    cycle: format!(
                                        "{} -> {}",
                                        self.names[edge.from], self.names[slot]
                                    ),
                                }
                            })?;
                            inputs.insert(edge.arrow.input_key().to_string(), value);
                        }
                        memo[slot] = Some(operator(&self.names[slot], inputs)?);
                    }
                }
            }
        }

        Ok(self
            .names
            .iter()
            .cloned()
            .zip(memo)
            .filter_map(|(name, result)| result.map(|r| (name, r)))
            .collect())
    }

    fn sink_slots(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.names.len()).filter(|&slot| self.next[slot].is_empty())
    }

    fn arrows_at(&self, process: &str, adjacency: &[Vec<usize>]) -> Vec<&Arrow> {
        match self.index.get(process) {
            Some(&slot) => adjacency[slot]
                .iter()
                .map(|&edge| &self.edges[edge].arrow)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Kahn's algorithm. `Err` carries the slots left over by a cycle.
    fn kahn(&self) -> std::result::Result<Vec<usize>, Vec<usize>> {
        let mut in_degree: Vec<usize> = self.previous.iter().map(Vec::len).collect();
        let mut queue: VecDeque<usize> = (0..self.names.len())
            .filter(|&slot| in_degree[slot] == 0)
            .collect();
        let mut order = Vec::with_capacity(self.names.len());

        while let Some(slot) = queue.pop_front() {
            order.push(slot);
            for &edge in &self.next[slot] {
                let dependent = self.edges[edge].to;
                in_degree[dependent] -= 1;
                if in_degree[dependent] == 0 {
                    queue.push_back(dependent);
                }
            }
        }

        if order.len() == self.names.len() {
            Ok(order)
        } else {
            Err((0..self.names.len())
                .filter(|&slot| in_degree[slot] > 0)
                .collect())
        }
    }

    /// Find a cycle, returning its path with the first process repeated at
    /// the end.
    fn find_cycle(&self) -> Option<Vec<String>> {
        let remaining: HashSet<usize> = self.kahn().err()?.into_iter().collect();
        let start = *remaining.iter().min()?;

        // Every leftover process has a leftover predecessor, so walking
        // backwards must revisit one.
        let mut position: HashMap<usize, usize> = HashMap::new();
        let mut walk: Vec<usize> = Vec::new();
        let mut current = start;
        loop {
            if let Some(&pos) = position.get(&current) {
                let mut slots: Vec<usize> = walk[pos..].iter().rev().copied().collect();
                let lead = slots
                    .iter()
                    .enumerate()
                    .min_by_key(|&(_, slot)| *slot)
                    .map_or(0, |(i, _)| i);
                slots.rotate_left(lead);
                slots.push(slots[0]);
                return Some(slots.iter().map(|&slot| self.names[slot].clone()).collect());
            }
            position.insert(current, walk.len());
            walk.push(current);
            current = self.previous[current]
                .iter()
                .map(|&edge| self.edges[edge].from)
                .find(|from| remaining.contains(from))?;
        }
    }
}
