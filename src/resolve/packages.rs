//! Package aggregation.

use std::collections::BTreeMap;

use tracing::debug;

use crate::outline::{push_unique, PackageRecord, SymbolModel};

/// Group files into packages and collapse package edges onto representatives.
///
/// Each package directory becomes one [`PackageRecord`] whose representative
/// is its lexicographically smallest file. Every resolved package dependency
/// of a file becomes a single file edge to that package's representative.
pub fn build_packages(model: &mut SymbolModel) {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for file in model.files.values() {
        grouped
            .entry(file.package_dir.clone())
            .or_default()
            .push(file.path.clone());
    }

    model.packages.clear();
    for (dir, mut files) in grouped {
        files.sort();
        let Some(representative) = files.first().cloned() else {
            continue;
        };
        model.packages.insert(
            dir.clone(),
            PackageRecord {
                path: dir,
                files,
                representative,
            },
        );
    }

    let mut collapsed = Vec::new();
    for file in model.files.values() {
        for pkg in &file.local_pkg_deps {
            let Some(target) = model.packages.get(pkg) else {
                debug!(file = %file.path, package = %pkg, "package has no indexed files");
                continue;
            };
            if target.representative != file.path {
                collapsed.push((file.path.clone(), target.representative.clone()));
            }
        }
    }

    for (from, to) in collapsed {
        model.add_dependency(&from, &to);
        if let Some(file) = model.file_mut(&from) {
            push_unique(&mut file.local_deps, to);
        }
    }
}
