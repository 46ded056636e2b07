//! Second-pass import resolution.
//!
//! Go imports are resolved during extraction because module discovery has
//! already run. Script imports can name files the walk has not reached yet,
//! so they are resolved here once every file is in the model, followed by
//! package aggregation.

mod go;
mod packages;
mod script;

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::outline::{push_unique, Language, SymbolModel};

pub use go::resolve_go_import;
pub use packages::build_packages;
pub use script::{is_local_import, resolve_script_import, FileIndex, RESOLVE_EXTENSIONS};

/// Resolve script imports into file edges, then build packages.
///
/// Must only run after extraction has finished for every file.
pub fn resolve(model: &mut SymbolModel, aliases: &BTreeMap<String, String>) {
    let index = FileIndex::new(model.file_paths());

    let mut edges: Vec<(String, String)> = Vec::new();
    let mut unresolved = 0usize;
    for file in model.files() {
        if file.language == Language::Go {
            continue;
        }
        for import in &file.imports {
            if !is_local_import(import, aliases) {
                continue;
            }
            match resolve_script_import(import, &file.path, &index, aliases) {
                Some(target) if target != file.path => {
                    edges.push((file.path.clone(), target));
                }
                Some(_) => {}
                None => {
                    unresolved += 1;
                    debug!(file = %file.path, import = %import, "unresolved local import");
                }
            }
        }
    }

    let resolved = edges.len();
    for (from, to) in edges {
        model.add_dependency(&from, &to);
        if let Some(file) = model.file_mut(&from) {
            push_unique(&mut file.local_deps, to);
        }
    }

    build_packages(model);

    info!(
        resolved,
        unresolved,
        packages = model.packages().count(),
        file_edges = model.file_graph().edge_count(),
        "resolution complete"
    );
}
