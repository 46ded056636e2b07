//! Module-aware Go import resolution.

use std::path::Path;

use crate::modules::{normalize_path, relative_to, GoModule};

/// Map a Go import path to a repo-relative package directory.
///
/// The module with the longest matching path wins, so nested modules that
/// share a prefix with an enclosing module resolve to their own directory.
/// Returns None for imports outside every known module (stdlib and third
/// party packages).
pub fn resolve_go_import(modules: &[GoModule], root: &Path, import_path: &str) -> Option<String> {
    let module = modules
        .iter()
        .filter(|m| !m.module_path.is_empty())
        .filter(|m| {
            import_path == m.module_path
                || import_path
                    .strip_prefix(m.module_path.as_str())
                    .is_some_and(|rest| rest.starts_with('/'))
        })
        .max_by_key(|m| m.module_path.len())?;

    let suffix = import_path[module.module_path.len()..].trim_start_matches('/');

    let dir = if module.dir_rel == "." {
        if suffix.is_empty() {
            ".".to_string()
        } else {
            suffix.to_string()
        }
    } else if !module.dir_rel.starts_with("..") {
        if suffix.is_empty() {
            module.dir_rel.clone()
        } else {
            format!("{}/{}", module.dir_rel, suffix)
        }
    } else {
        // Module directory above or beside the scan root.
        let abs = normalize_path(&module.dir_abs.join(suffix));
        relative_to(root, &abs)
    };
    Some(dir)
}
