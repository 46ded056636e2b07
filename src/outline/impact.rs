//! Change-impact analysis over the reverse dependency graphs.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{DependencyGraph, SymbolModel};

/// Change risk classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Dependent-count cutoffs for risk classification.
///
/// A total strictly above `high_above` is high, strictly above
/// `medium_above` is medium, anything else is low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct RiskThresholds {
    #[serde(default = "default_medium_above")]
    pub medium_above: usize,
    #[serde(default = "default_high_above")]
    pub high_above: usize,
}

fn default_medium_above() -> usize {
    3
}

fn default_high_above() -> usize {
    10
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            medium_above: default_medium_above(),
            high_above: default_high_above(),
        }
    }
}

impl RiskThresholds {
    pub fn classify(&self, total_dependents: usize) -> RiskLevel {
        if total_dependents > self.high_above {
            RiskLevel::High
        } else if total_dependents > self.medium_above {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

/// Impact of changing one file or package.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImpactRecord {
    pub key: String,
    /// One hop in the reverse graph.
    pub direct_dependents: Vec<String>,
    /// Transitive dependents beyond the first hop, in traversal order.
    pub indirect_dependents: Vec<String>,
    pub risk_level: RiskLevel,
    /// Test files covering the key or any of its dependents.
    pub tests_affected: Vec<String>,
}

impl ImpactRecord {
    pub fn total_dependents(&self) -> usize {
        self.direct_dependents.len() + self.indirect_dependents.len()
    }
}

/// Walk `graph` backwards from `key`.
///
/// Direct dependents come straight from the reverse map. Indirect dependents
/// are collected depth-first from each direct dependent; every node is
/// recorded at most once and `key` itself is never reported.
pub fn trace_dependents(graph: &DependencyGraph, key: &str) -> (Vec<String>, Vec<String>) {
    let direct: Vec<String> = graph.dependents(key).to_vec();

    let mut visited: HashSet<&str> = HashSet::new();
    visited.insert(key);
    for dep in &direct {
        visited.insert(dep.as_str());
    }

    let mut indirect = Vec::new();
    for dep in &direct {
        visit(graph, dep, &mut visited, &mut indirect);
    }

    (direct, indirect)
}

fn visit<'g>(
    graph: &'g DependencyGraph,
    node: &str,
    visited: &mut HashSet<&'g str>,
    out: &mut Vec<String>,
) {
    for dep in graph.dependents(node) {
        if visited.insert(dep.as_str()) {
            out.push(dep.clone());
            visit(graph, dep, visited, out);
        }
    }
}

impl SymbolModel {
    /// Compute and cache the impact of changing a file.
    ///
    /// Recomputing overwrites the cached entry.
    pub fn compute_file_impact(&mut self, path: &str) -> &ImpactRecord {
        let (direct, indirect) = trace_dependents(&self.file_deps, path);
        let record = self.build_impact(path, direct, indirect, |model, key| {
            model.tests_for_file(key)
        });
        self.file_impacts.insert(path.to_string(), record);
        &self.file_impacts[path]
    }

    /// Compute and cache the impact of changing a package directory.
    pub fn compute_package_impact(&mut self, package: &str) -> &ImpactRecord {
        let (direct, indirect) = trace_dependents(&self.package_deps, package);
        let record = self.build_impact(package, direct, indirect, |model, key| {
            model
                .packages
                .get(key)
                .map(|pkg| {
                    pkg.files
                        .iter()
                        .flat_map(|f| model.tests_for_file(f))
                        .collect::<Vec<String>>()
                })
                .unwrap_or_default()
        });
        self.package_impacts.insert(package.to_string(), record);
        &self.package_impacts[package]
    }

    /// Cached impact for a file, if computed.
    pub fn file_impact(&self, path: &str) -> Option<&ImpactRecord> {
        self.file_impacts.get(path)
    }

    /// Cached impact for a package, if computed.
    pub fn package_impact(&self, package: &str) -> Option<&ImpactRecord> {
        self.package_impacts.get(package)
    }

    /// Compute the impact for a key that may name a file or a package.
    ///
    /// File paths win when a key is both.
    pub fn compute_impact(&mut self, key: &str) -> Option<&ImpactRecord> {
        if self.files.contains_key(key) {
            Some(self.compute_file_impact(key))
        } else if self.packages.contains_key(key) {
            Some(self.compute_package_impact(key))
        } else {
            None
        }
    }

    /// Compute impact for every file and store its risk level on the record.
    pub fn assign_risk_levels(&mut self) {
        let paths: Vec<String> = self.files.keys().cloned().collect();
        for path in paths {
            let risk = self.compute_file_impact(&path).risk_level;
            if let Some(file) = self.files.get_mut(&path) {
                file.risk_level = risk;
            }
        }
        let packages: Vec<String> = self.packages.keys().cloned().collect();
        for package in packages {
            self.compute_package_impact(&package);
        }
    }

    fn build_impact<F>(
        &self,
        key: &str,
        direct: Vec<String>,
        indirect: Vec<String>,
        tests_of: F,
    ) -> ImpactRecord
    where
        F: Fn(&SymbolModel, &str) -> Vec<String>,
    {
        let mut tests_affected: Vec<String> = Vec::new();
        for node in std::iter::once(key)
            .chain(direct.iter().map(String::as_str))
            .chain(indirect.iter().map(String::as_str))
        {
            for test in tests_of(self, node) {
                if !tests_affected.contains(&test) {
                    tests_affected.push(test);
                }
            }
        }

        let risk_level = self.risk.classify(direct.len() + indirect.len());
        ImpactRecord {
            key: key.to_string(),
            direct_dependents: direct,
            indirect_dependents: indirect,
            risk_level,
            tests_affected,
        }
    }

    fn tests_for_file(&self, path: &str) -> Vec<String> {
        self.files
            .get(path)
            .and_then(|f| f.test_info.as_ref())
            .map(|t| t.test_files.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn star(dependents: usize) -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        for i in 0..dependents {
            graph.add_edge(&format!("dep{}", i), "core");
        }
        graph
    }

    #[test]
    fn test_risk_threshold_boundaries() {
        let thresholds = RiskThresholds::default();
        assert_eq!(thresholds.classify(0), RiskLevel::Low);
        assert_eq!(thresholds.classify(3), RiskLevel::Low);
        assert_eq!(thresholds.classify(4), RiskLevel::Medium);
        assert_eq!(thresholds.classify(10), RiskLevel::Medium);
        assert_eq!(thresholds.classify(11), RiskLevel::High);
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = RiskThresholds {
            medium_above: 0,
            high_above: 1,
        };
        assert_eq!(thresholds.classify(0), RiskLevel::Low);
        assert_eq!(thresholds.classify(1), RiskLevel::Medium);
        assert_eq!(thresholds.classify(2), RiskLevel::High);
    }

    #[test]
    fn test_direct_only() {
        let graph = star(4);
        let (direct, indirect) = trace_dependents(&graph, "core");
        assert_eq!(direct.len(), 4);
        assert!(indirect.is_empty());
    }

    #[test]
    fn test_transitive_chain() {
        // d -> c -> b -> a
        let mut graph = DependencyGraph::new();
        graph.add_edge("b", "a");
        graph.add_edge("c", "b");
        graph.add_edge("d", "c");

        let (direct, indirect) = trace_dependents(&graph, "a");
        assert_eq!(direct, vec!["b"]);
        assert_eq!(indirect, vec!["c", "d"]);
    }

    #[test]
    fn test_cycle_terminates_without_self() {
        let mut graph = DependencyGraph::new();
        graph.add_edge("a", "b");
        graph.add_edge("b", "a");

        let (direct, indirect) = trace_dependents(&graph, "a");
        assert_eq!(direct, vec!["b"]);
        assert!(!indirect.contains(&"a".to_string()));
        assert!(indirect.is_empty());
    }

    #[test]
    fn test_diamond_visits_once() {
        // b and c both depend on a; d depends on both b and c.
        let mut graph = DependencyGraph::new();
        graph.add_edge("b", "a");
        graph.add_edge("c", "a");
        graph.add_edge("d", "b");
        graph.add_edge("d", "c");

        let (direct, indirect) = trace_dependents(&graph, "a");
        assert_eq!(direct, vec!["b", "c"]);
        assert_eq!(indirect, vec!["d"]);
    }
}
