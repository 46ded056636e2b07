//! Directed adjacency maps with a mirrored reverse index.

use std::collections::HashMap;

use serde::Serialize;

/// A directed graph stored as a forward adjacency map plus its exact inverse.
///
/// Every insertion into `forward` inserts the mirrored edge into `reverse`.
/// Adjacency lists keep insertion order and never hold duplicates.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DependencyGraph {
    forward: HashMap<String, Vec<String>>,
    reverse: HashMap<String, Vec<String>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `from -> to`. Returns false if the edge already existed.
    pub fn add_edge(&mut self, from: &str, to: &str) -> bool {
        let targets = self.forward.entry(from.to_string()).or_default();
        if targets.iter().any(|t| t == to) {
            return false;
        }
        targets.push(to.to_string());

        let sources = self.reverse.entry(to.to_string()).or_default();
        if !sources.iter().any(|s| s == from) {
            sources.push(from.to_string());
        }
        true
    }

    /// Nodes `key` depends on.
    pub fn dependencies(&self, key: &str) -> &[String] {
        self.forward.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Nodes that depend on `key`.
    pub fn dependents(&self, key: &str) -> &[String] {
        self.reverse.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains_edge(&self, from: &str, to: &str) -> bool {
        self.dependencies(from).iter().any(|t| t == to)
    }

    /// All edges, sorted by (from, to).
    pub fn edges(&self) -> Vec<(&str, &str)> {
        let mut edges: Vec<(&str, &str)> = self
            .forward
            .iter()
            .flat_map(|(from, tos)| tos.iter().map(move |to| (from.as_str(), to.as_str())))
            .collect();
        edges.sort();
        edges
    }

    pub fn edge_count(&self) -> usize {
        self.forward.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.edge_count() == 0
    }

    /// Check that forward and reverse maps mirror each other exactly.
    pub fn is_consistent(&self) -> bool {
        let forward_ok = self.forward.iter().all(|(from, tos)| {
            tos.iter()
                .all(|to| self.dependents(to).iter().filter(|s| *s == from).count() == 1)
        });
        let reverse_ok = self.reverse.iter().all(|(to, froms)| {
            froms
                .iter()
                .all(|from| self.dependencies(from).iter().filter(|t| *t == to).count() == 1)
        });
        forward_ok && reverse_ok
    }
}
