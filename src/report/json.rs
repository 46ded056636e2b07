//! JSON rendering of the full model.

use std::collections::BTreeMap;

use serde::Serialize;

use super::ReportSummary;
use crate::outline::{FileRecord, ImpactRecord, PackageRecord, SymbolModel, TypeRecord};

/// Top-level JSON document.
#[derive(Serialize)]
pub struct JsonReport<'a> {
    pub version: &'static str,
    pub root: String,
    pub summary: ReportSummary,
    pub modules: Vec<JsonModule<'a>>,
    pub files: Vec<&'a FileRecord>,
    pub types: Vec<&'a TypeRecord>,
    pub packages: Vec<&'a PackageRecord>,
    pub package_edges: Vec<JsonPackageEdge<'a>>,
    /// `path:Func` to callee names.
    pub function_calls: &'a BTreeMap<String, Vec<String>>,
    pub public_api: &'a BTreeMap<String, Vec<String>>,
    pub file_impacts: Vec<&'a ImpactRecord>,
    pub package_impacts: Vec<&'a ImpactRecord>,
}

#[derive(Serialize)]
pub struct JsonModule<'a> {
    pub dir: &'a str,
    pub module_path: &'a str,
}

#[derive(Serialize)]
pub struct JsonPackageEdge<'a> {
    pub from: &'a str,
    pub to: &'a str,
    pub imports: usize,
    pub calls: usize,
    pub type_uses: usize,
}

impl<'a> JsonReport<'a> {
    pub fn from_model(model: &'a SymbolModel) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            root: model.root().display().to_string(),
            summary: ReportSummary::from_model(model),
            modules: model
                .modules()
                .iter()
                .map(|m| JsonModule {
                    dir: &m.dir_rel,
                    module_path: &m.module_path,
                })
                .collect(),
            files: model.files().collect(),
            types: model.types().collect(),
            packages: model.packages().collect(),
            package_edges: model
                .package_edges()
                .into_iter()
                .map(|(from, to, stat)| JsonPackageEdge {
                    from,
                    to,
                    imports: stat.imports,
                    calls: stat.calls,
                    type_uses: stat.type_uses,
                })
                .collect(),
            function_calls: &model.function_calls,
            public_api: model.public_apis(),
            file_impacts: model
                .file_paths()
                .into_iter()
                .filter_map(|p| model.file_impact(p))
                .collect(),
            package_impacts: model
                .packages()
                .filter_map(|p| model.package_impact(&p.path))
                .collect(),
        }
    }
}

/// Render the model as pretty-printed JSON.
pub fn render_json(model: &SymbolModel) -> anyhow::Result<String> {
    let report = JsonReport::from_model(model);
    Ok(serde_json::to_string_pretty(&report)?)
}
