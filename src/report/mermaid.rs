//! Mermaid diagram generation.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::Write;

use crate::outline::SymbolModel;

/// Maximum number of external dependencies drawn in the architecture view.
pub const MAX_EXTERNAL_DEPS: usize = 10;

/// File-to-file dependency graph, one node per indexed file.
pub fn file_dependency_graph(model: &SymbolModel) -> String {
    let mut out = String::from("```mermaid\ngraph TD\n");

    let paths = model.file_paths();
    let ids: HashMap<&str, String> = paths
        .iter()
        .enumerate()
        .map(|(i, path)| (*path, format!("F{}", i)))
        .collect();

    for path in &paths {
        let _ = writeln!(out, "    {}[\"{}\"]", ids[path], escape_label(path));
    }
    out.push('\n');

    for path in &paths {
        for dep in model.dependencies(path) {
            if let Some(to) = ids.get(dep.as_str()) {
                let _ = writeln!(out, "    {} --> {}", ids[path], to);
            }
        }
    }

    out.push_str("```\n");
    out
}

/// Architecture overview: files grouped into directory subgraphs, plus a
/// capped group of external dependencies.
pub fn architecture_overview(model: &SymbolModel, external: &BTreeSet<String>) -> String {
    let mut out = String::from("```mermaid\ngraph TB\n");

    let mut groups: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for file in model.files() {
        groups
            .entry(file.package_dir.as_str())
            .or_default()
            .push(file.path.as_str());
    }

    let mut ids: HashMap<&str, String> = HashMap::new();
    let mut counter = 0usize;
    for (dir, files) in &groups {
        let label = if *dir == "." { "root" } else { *dir };
        let _ = writeln!(
            out,
            "    subgraph {} [\"{}\"]",
            subgraph_id(label),
            escape_label(label)
        );
        for path in files {
            let id = format!("N{}", counter);
            counter += 1;
            let _ = writeln!(out, "        {}[\"{}\"]", id, escape_label(file_name(path)));
            ids.insert(*path, id);
        }
        out.push_str("    end\n\n");
    }

    if !external.is_empty() {
        out.push_str("    subgraph external [\"External Dependencies\"]\n");
        for (i, dep) in external.iter().take(MAX_EXTERNAL_DEPS).enumerate() {
            let _ = writeln!(out, "        EXT{}[\"{}\"]", i, escape_label(&clean_dep_name(dep)));
        }
        out.push_str("    end\n\n");
    }

    for file in model.files() {
        let Some(from) = ids.get(file.path.as_str()) else {
            continue;
        };
        for dep in model.dependencies(&file.path) {
            if let Some(to) = ids.get(dep.as_str()) {
                let _ = writeln!(out, "    {} --> {}", from, to);
            }
        }
    }

    out.push_str("```\n");
    out
}

/// Package graph with coupling counters as edge labels.
pub fn package_graph(model: &SymbolModel) -> String {
    let mut out = String::from("```mermaid\ngraph LR\n");

    let mut nodes: BTreeSet<&str> = BTreeSet::new();
    let edges = model.package_edges();
    for (from, to, _) in &edges {
        nodes.insert(*from);
        nodes.insert(*to);
    }
    let ids: HashMap<&str, String> = nodes
        .iter()
        .enumerate()
        .map(|(i, pkg)| (*pkg, format!("P{}", i)))
        .collect();

    for pkg in &nodes {
        let label = if *pkg == "." { "root" } else { *pkg };
        let _ = writeln!(out, "    {}[\"{}\"]", ids[pkg], escape_label(label));
    }
    for (from, to, stat) in &edges {
        let _ = writeln!(
            out,
            "    {} -->|\"{}\"| {}",
            ids[from],
            stat.label(),
            ids[to]
        );
    }

    out.push_str("```\n");
    out
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Shorten an external import for display.
pub fn clean_dep_name(dep: &str) -> String {
    let dep = dep
        .strip_prefix("github.com/")
        .or_else(|| dep.strip_prefix("golang.org/x/"))
        .unwrap_or(dep);
    if dep.chars().count() > 25 {
        let head: String = dep.chars().take(22).collect();
        format!("{}...", head)
    } else {
        dep.to_string()
    }
}

fn subgraph_id(label: &str) -> String {
    let id: String = label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("dir_{}", id)
}

fn escape_label(label: &str) -> String {
    label.replace('"', "#quot;")
}
