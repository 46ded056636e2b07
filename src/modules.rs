//! Go module discovery from `go.work` and `go.mod` files.
//!
//! A scan root can sit inside a workspace (several modules listed by a
//! `go.work` file) or inside a single module. Discovery looks upward from the
//! root for a `go.work` first and falls back to the nearest `go.mod`.

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};

/// A Go module known to the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoModule {
    /// Absolute, lexically normalized module directory.
    pub dir_abs: PathBuf,
    /// Directory relative to the scan root, `.` for the root itself.
    pub dir_rel: String,
    /// Module path from the `module` line of `go.mod`.
    pub module_path: String,
    /// The module directory is the scan root or one of its ancestors.
    pub encloses_root: bool,
}

impl GoModule {
    pub fn new(
        dir_abs: impl Into<PathBuf>,
        dir_rel: impl Into<String>,
        module_path: impl Into<String>,
    ) -> Self {
        let dir_rel = dir_rel.into();
        Self {
            dir_abs: dir_abs.into(),
            encloses_root: dir_rel == ".",
            dir_rel,
            module_path: module_path.into(),
        }
    }

    /// Whether a root-relative directory lies inside this module.
    pub fn contains_dir(&self, dir: &str) -> bool {
        if self.encloses_root {
            return true;
        }
        dir == self.dir_rel || dir.starts_with(&format!("{}/", self.dir_rel))
    }
}

/// Discover the modules relevant to `root`, deepest directory first.
///
/// `root` should be absolute. Returns an empty list when neither a `go.work`
/// nor a `go.mod` is found at or above it.
pub fn discover_modules(root: &Path) -> Vec<GoModule> {
    let root = normalize_path(root);
    let mut modules = Vec::new();

    if let Some(work_file) = find_nearest_file_up(&root, "go.work") {
        let work_dir = work_file.parent().map(Path::to_path_buf).unwrap_or_default();
        match fs::read_to_string(&work_file) {
            Ok(content) => {
                for use_dir in parse_go_work_use_dirs(&content) {
                    let dir_abs = normalize_path(&work_dir.join(&use_dir));
                    match read_go_mod_module_path(&dir_abs.join("go.mod")) {
                        Some(module_path) => modules.push(module_at(&root, dir_abs, module_path)),
                        None => {
                            debug!(dir = %dir_abs.display(), "go.work member without module line")
                        }
                    }
                }
            }
            Err(e) => warn!(path = %work_file.display(), error = %e, "failed to read go.work"),
        }
    }

    if modules.is_empty() {
        if let Some(go_mod) = find_nearest_file_up(&root, "go.mod") {
            if let Some(module_path) = read_go_mod_module_path(&go_mod) {
                let dir_abs = go_mod.parent().map(normalize_path).unwrap_or_default();
                modules.push(module_at(&root, dir_abs, module_path));
            }
        }
    }

    modules.sort_by(|a, b| {
        let (la, lb) = (a.dir_abs.as_os_str().len(), b.dir_abs.as_os_str().len());
        lb.cmp(&la).then_with(|| a.dir_abs.cmp(&b.dir_abs))
    });
    modules.dedup_by(|a, b| a.dir_abs == b.dir_abs);

    for module in &modules {
        debug!(module = %module.module_path, dir = %module.dir_rel, "discovered go module");
    }
    modules
}

fn module_at(root: &Path, dir_abs: PathBuf, module_path: String) -> GoModule {
    GoModule {
        dir_rel: relative_to(root, &dir_abs),
        encloses_root: root.starts_with(&dir_abs),
        dir_abs,
        module_path,
    }
}

/// Extract the directories named by `use` directives in a `go.work` file.
///
/// Handles both `use ./x` and `use ( ... )` blocks, with or without quotes.
pub fn parse_go_work_use_dirs(content: &str) -> Vec<String> {
    let mut dirs = Vec::new();
    let mut in_use_block = false;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("//") {
            continue;
        }

        if in_use_block {
            if line.starts_with(')') {
                in_use_block = false;
                continue;
            }
            push_use_dir(&mut dirs, line);
            continue;
        }

        if let Some(rest) = line.strip_prefix("use") {
            let rest = rest.trim();
            if rest.starts_with('(') {
                in_use_block = true;
                // `use ( ./a )` on one line
                let inner = rest.trim_start_matches('(');
                if let Some(inner) = inner.strip_suffix(')') {
                    in_use_block = false;
                    push_use_dir(&mut dirs, inner);
                } else {
                    push_use_dir(&mut dirs, inner);
                }
            } else if line.len() > 3 && line[3..].starts_with(char::is_whitespace) {
                push_use_dir(&mut dirs, rest);
            }
        }
    }
    dirs
}

fn push_use_dir(dirs: &mut Vec<String>, raw: &str) {
    let raw = match raw.find("//") {
        Some(idx) => &raw[..idx],
        None => raw,
    };
    let dir = raw.trim().trim_matches(|c| c == '"' || c == '`').trim();
    if !dir.is_empty() {
        dirs.push(dir.to_string());
    }
}

/// Read the module path declared by a `go.mod` file.
pub fn read_go_mod_module_path(go_mod: &Path) -> Option<String> {
    let content = fs::read_to_string(go_mod).ok()?;
    parse_module_line(&content)
}

fn parse_module_line(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let rest = line.trim().strip_prefix("module")?;
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        let path = rest.trim().trim_matches('"');
        (!path.is_empty()).then(|| path.to_string())
    })
}

/// Search `start` and its ancestors for a file called `name`.
pub fn find_nearest_file_up(start: &Path, name: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Collapse `.` and `..` components without touching the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Express `target` relative to `base` with `/` separators.
///
/// Returns `.` when both are the same directory.
pub fn relative_to(base: &Path, target: &Path) -> String {
    if let Ok(rel) = target.strip_prefix(base) {
        return join_components(rel);
    }

    let base: Vec<_> = base.components().collect();
    let target: Vec<_> = target.components().collect();
    let common = base
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = std::iter::repeat("..".to_string())
        .take(base.len() - common)
        .collect();
    parts.extend(
        target[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );
    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

fn join_components(rel: &Path) -> String {
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}
