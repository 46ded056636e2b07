//! Report rendering over a finished [`SymbolModel`].
//!
//! Supports two document formats plus terminal output:
//! - Markdown: the outline document with mermaid diagrams
//! - JSON: the full model for programmatic consumption
//! - Pretty: colored scan summary and impact records on the terminal
//!
//! Rendering only reads the model; impact records come from the cache filled
//! by the indexer.

mod json;
mod markdown;
pub mod mermaid;
mod pretty;

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::config::Config;
use crate::outline::{Language, RiskLevel, SymbolModel};
use crate::resolve::{is_local_import, resolve_go_import};

pub use json::{render_json, JsonReport};
pub use markdown::{render_markdown, MarkdownWriter};
pub use pretty::{write_impact, write_summary};

/// Rendering switches.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Include mermaid diagrams.
    pub diagrams: bool,
    /// Alias table used to tell local script imports from packages.
    pub aliases: BTreeMap<String, String>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl ReportOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            diagrams: config.diagrams,
            aliases: config.aliases.clone(),
        }
    }
}

/// Headline counts for a scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportSummary {
    pub files: usize,
    pub packages: usize,
    pub modules: usize,
    pub types: usize,
    pub functions: usize,
    pub file_edges: usize,
    pub package_edges: usize,
    pub test_files: usize,
    pub parse_errors: usize,
    pub high_risk_files: usize,
}

impl ReportSummary {
    pub fn from_model(model: &SymbolModel) -> Self {
        Self {
            files: model.file_count(),
            packages: model.packages().count(),
            modules: model.modules().len(),
            types: model.types().filter(|t| t.declared_in.is_some()).count(),
            functions: model.files().map(|f| f.functions.len()).sum(),
            file_edges: model.file_graph().edge_count(),
            package_edges: model.package_graph().edge_count(),
            test_files: model.test_files().len(),
            parse_errors: model.files().filter(|f| f.parse_error.is_some()).count(),
            high_risk_files: model
                .files()
                .filter(|f| f.risk_level == RiskLevel::High)
                .count(),
        }
    }
}

/// Imports that leave the project: Go module paths outside every known
/// module (standard library excluded) and bare script package specifiers.
pub fn external_imports(
    model: &SymbolModel,
    aliases: &BTreeMap<String, String>,
) -> BTreeSet<String> {
    let mut external = BTreeSet::new();
    for file in model.files() {
        for import in &file.imports {
            let is_external = match file.language {
                Language::Go => {
                    let first = import.split('/').next().unwrap_or("");
                    first.contains('.')
                        && resolve_go_import(model.modules(), model.root(), import).is_none()
                }
                _ => !is_local_import(import, aliases),
            };
            if is_external {
                external.insert(import.clone());
            }
        }
    }
    external
}
