//! Relative and alias import resolution for scripts and Astro files.

use std::collections::{BTreeMap, HashSet};

use crate::outline::package_dir_of;

/// Extensions tried, in order, for imports written without one.
pub const RESOLVE_EXTENSIONS: &[&str] = &[".tsx", ".ts", ".astro", ".js", ".jsx"];

/// Extensions that mark an import as already naming a file.
const KNOWN_EXTENSIONS: &[&str] = &[
    ".tsx", ".ts", ".astro", ".js", ".jsx", ".mjs", ".cjs", ".mts", ".cts",
];

/// Indexed file paths, sorted, with constant-time membership.
pub struct FileIndex {
    sorted: Vec<String>,
    members: HashSet<String>,
}

impl FileIndex {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut sorted: Vec<String> = paths.into_iter().map(Into::into).collect();
        sorted.sort();
        sorted.dedup();
        let members = sorted.iter().cloned().collect();
        Self { sorted, members }
    }

    pub fn contains(&self, path: &str) -> bool {
        self.members.contains(path)
    }

    /// Smallest indexed path equal to `tail` or ending in `/tail`.
    fn find_suffix(&self, tail: &str) -> Option<&str> {
        let with_slash = format!("/{}", tail);
        self.sorted
            .iter()
            .find(|p| p.as_str() == tail || p.ends_with(&with_slash))
            .map(String::as_str)
    }
}

/// Whether an import refers to a project file rather than a package.
pub fn is_local_import(import: &str, aliases: &BTreeMap<String, String>) -> bool {
    import.starts_with("./")
        || import.starts_with("../")
        || import == "."
        || import == ".."
        || alias_match(import, aliases).is_some()
}

/// The alias prefixing `import`, with the remainder after it.
fn alias_match<'a>(
    import: &'a str,
    aliases: &'a BTreeMap<String, String>,
) -> Option<(&'a str, &'a str)> {
    aliases
        .iter()
        .filter(|(alias, _)| !alias.is_empty())
        .filter_map(|(alias, target)| {
            let rest = import.strip_prefix(alias.as_str())?;
            if rest.is_empty() || rest.starts_with('/') {
                Some((target.as_str(), rest.trim_start_matches('/')))
            } else {
                None
            }
        })
        // Longest alias wins, so `@app` beats `@`.
        .max_by_key(|(_, rest)| import.len() - rest.len())
}

/// Strip `?query` and `#fragment` suffixes.
fn strip_query(import: &str) -> &str {
    let end = import.find(['?', '#']).unwrap_or(import.len());
    &import[..end]
}

/// Collapse `.` and `..` segments. Returns None when `..` climbs above the
/// scan root.
fn normalize_segments(path: &str) -> Option<String> {
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            other => parts.push(other),
        }
    }
    Some(parts.join("/"))
}

/// Normalize an import to a repo-relative path without extension handling.
///
/// Returns the path and whether it came from an alias.
fn normalize_import(
    import: &str,
    importer: &str,
    aliases: &BTreeMap<String, String>,
) -> Option<(String, bool)> {
    let import = strip_query(import);

    if import.starts_with('.') {
        let dir = package_dir_of(importer);
        let joined = if dir == "." {
            import.to_string()
        } else {
            format!("{}/{}", dir, import)
        };
        return normalize_segments(&joined).map(|p| (p, false));
    }

    let (target, rest) = alias_match(import, aliases)?;
    let joined = if rest.is_empty() {
        target.to_string()
    } else {
        format!("{}/{}", target, rest)
    };
    normalize_segments(&joined).map(|p| (p, true))
}

/// Resolve a local script import to an indexed file path.
///
/// Relative imports resolve against the importing file's directory; alias
/// imports against the alias target and, failing an exact hit, any indexed
/// path ending with the same tail. Imports with a known extension try the
/// path itself first; others try each extension in [`RESOLVE_EXTENSIONS`],
/// then `<path>/index.<ext>`. The first hit wins.
pub fn resolve_script_import(
    import: &str,
    importer: &str,
    files: &FileIndex,
    aliases: &BTreeMap<String, String>,
) -> Option<String> {
    let (base, from_alias) = normalize_import(import, importer, aliases)?;

    let lookup = |candidate: &str| -> Option<String> {
        if files.contains(candidate) {
            return Some(candidate.to_string());
        }
        if from_alias {
            return files.find_suffix(candidate).map(str::to_string);
        }
        None
    };

    if !base.is_empty() && KNOWN_EXTENSIONS.iter().any(|ext| base.ends_with(ext)) {
        if let Some(found) = lookup(&base) {
            return Some(found);
        }
        // ESM-style `./x.js` written for a `x.ts` source.
        for (written, actual) in [(".js", ".ts"), (".jsx", ".tsx"), (".mjs", ".mts")] {
            if let Some(stem) = base.strip_suffix(written) {
                if let Some(found) = lookup(&format!("{}{}", stem, actual)) {
                    return Some(found);
                }
            }
        }
    }

    for ext in RESOLVE_EXTENSIONS {
        if let Some(found) = lookup(&format!("{}{}", base, ext)) {
            return Some(found);
        }
    }

    let index_base = if base.is_empty() {
        "index".to_string()
    } else {
        format!("{}/index", base)
    };
    for ext in RESOLVE_EXTENSIONS {
        if let Some(found) = lookup(&format!("{}{}", index_base, ext)) {
            return Some(found);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aliases() -> BTreeMap<String, String> {
        let mut aliases = BTreeMap::new();
        aliases.insert("~".to_string(), "src".to_string());
        aliases.insert("@lib".to_string(), "packages/lib".to_string());
        aliases
    }

    fn index() -> FileIndex {
        FileIndex::new([
            "src/components/Button.tsx",
            "src/app/Main.ts",
            "src/app/util.ts",
            "src/app/widgets/index.ts",
            "src/layouts/Layout.astro",
            "src/lib/format.ts",
            "web/src/pages/Home.tsx",
            "packages/lib/index.js",
        ])
    }

    fn resolve(import: &str, importer: &str) -> Option<String> {
        resolve_script_import(import, importer, &index(), &aliases())
    }

    #[test]
    fn test_is_local_import() {
        let aliases = aliases();
        assert!(is_local_import("./util", &aliases));
        assert!(is_local_import("../lib/format", &aliases));
        assert!(is_local_import("~/components/Button", &aliases));
        assert!(is_local_import("@lib", &aliases));
        assert!(!is_local_import("react", &aliases));
        assert!(!is_local_import("@lib-extra/x", &aliases));
        assert!(!is_local_import("@tanstack/query", &aliases));
    }

    #[test]
    fn test_alias_with_extension_probe() {
        assert_eq!(
            resolve("~/components/Button", "src/pages/Index.tsx").as_deref(),
            Some("src/components/Button.tsx")
        );
        assert_eq!(
            resolve("~/layouts/Layout.astro", "src/pages/index.astro").as_deref(),
            Some("src/layouts/Layout.astro")
        );
        assert_eq!(resolve("@lib", "src/app/Main.ts").as_deref(), Some("packages/lib/index.js"));
    }

    #[test]
    fn test_relative_to_importer_directory() {
        assert_eq!(resolve("./util", "src/app/Main.ts").as_deref(), Some("src/app/util.ts"));
        assert_eq!(
            resolve("../lib/format", "src/app/Main.ts").as_deref(),
            Some("src/lib/format.ts")
        );
        assert_eq!(
            resolve("./widgets", "src/app/Main.ts").as_deref(),
            Some("src/app/widgets/index.ts")
        );
    }

    #[test]
    fn test_query_fragment_and_esm_extension() {
        assert_eq!(
            resolve("./util?raw", "src/app/Main.ts").as_deref(),
            Some("src/app/util.ts")
        );
        assert_eq!(
            resolve("./util.js#frag", "src/app/Main.ts").as_deref(),
            Some("src/app/util.ts")
        );
    }

    #[test]
    fn test_alias_suffix_match() {
        // Scan root above the app: `~/pages/Home` still finds `web/src/pages/Home.tsx`.
        assert_eq!(
            resolve("~/pages/Home", "web/src/App.tsx").as_deref(),
            Some("web/src/pages/Home.tsx")
        );
    }

    #[test]
    fn test_unresolved_is_none() {
        assert_eq!(resolve("./missing", "src/app/Main.ts"), None);
        assert_eq!(resolve("../../../outside", "src/app/Main.ts"), None);
        // Relative imports never fall back to suffix matching.
        assert_eq!(resolve("./pages/Home", "src/App.tsx"), None);
    }
}
