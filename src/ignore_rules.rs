//! Path exclusion for the tree walk.
//!
//! The walker consults an [`IgnorePredicate`] once per entry; a directory for
//! which it returns true is pruned with its whole subtree.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use ignore::Match;
use tracing::{debug, warn};

/// Patterns applied to every scan before any `.gitignore` file.
pub const DEFAULT_IGNORES: &[&str] = &[
    ".git/",
    "node_modules/",
    ".DS_Store",
    "*.tmp",
    "*.temp",
    ".vscode/",
    ".idea/",
];

/// Decides whether a filesystem entry is skipped.
pub trait IgnorePredicate: Send + Sync {
    fn should_ignore(&self, abs_path: &Path) -> bool;
}

/// Gitignore-style rules: built-in defaults plus every `.gitignore` from the
/// repository root down to the entry's directory.
///
/// Rule files are loaded lazily and cached per directory. Deeper files take
/// precedence over shallower ones, and a whitelist (`!pattern`) can undo an
/// earlier match.
pub struct GitignoreRules {
    root: PathBuf,
    base: PathBuf,
    defaults: Gitignore,
    cache: RwLock<HashMap<PathBuf, Option<Arc<Gitignore>>>>,
}

impl GitignoreRules {
    /// Build rules for a scan rooted at `root` (absolute).
    pub fn new(root: &Path) -> Self {
        let mut builder = GitignoreBuilder::new(root);
        for pattern in DEFAULT_IGNORES {
            if let Err(e) = builder.add_line(None, pattern) {
                warn!(pattern = %pattern, error = %e, "invalid default ignore pattern");
            }
        }
        let defaults = builder.build().unwrap_or_else(|_| Gitignore::empty());

        // .gitignore files above the scan root still apply up to the git root.
        let base = root
            .ancestors()
            .find(|dir| dir.join(".git").exists())
            .unwrap_or(root)
            .to_path_buf();

        Self {
            root: root.to_path_buf(),
            base,
            defaults,
            cache: RwLock::new(HashMap::new()),
        }
    }

    fn rules_for_dir(&self, dir: &Path) -> Option<Arc<Gitignore>> {
        if let Ok(cache) = self.cache.read() {
            if let Some(entry) = cache.get(dir) {
                return entry.clone();
            }
        }

        let loaded = load_gitignore(dir).map(Arc::new);
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(dir.to_path_buf(), loaded.clone());
        }
        loaded
    }
}

fn load_gitignore(dir: &Path) -> Option<Gitignore> {
    let file = dir.join(".gitignore");
    if !file.is_file() {
        return None;
    }
    let mut builder = GitignoreBuilder::new(dir);
    if let Some(e) = builder.add(&file) {
        warn!(path = %file.display(), error = %e, "failed to read .gitignore");
    }
    match builder.build() {
        Ok(gitignore) => {
            debug!(path = %file.display(), rules = gitignore.num_ignores(), "loaded .gitignore");
            Some(gitignore)
        }
        Err(e) => {
            warn!(path = %file.display(), error = %e, "invalid .gitignore");
            None
        }
    }
}

impl IgnorePredicate for GitignoreRules {
    fn should_ignore(&self, abs_path: &Path) -> bool {
        if abs_path == self.root || abs_path == self.base {
            return false;
        }
        let is_dir = abs_path.is_dir();
        let mut ignored = false;

        if abs_path.starts_with(&self.root) {
            ignored = apply(ignored, self.defaults.matched_path_or_any_parents(abs_path, is_dir));
        }

        let Some(parent) = abs_path.parent() else {
            return ignored;
        };
        let mut dirs: Vec<&Path> = parent
            .ancestors()
            .take_while(|dir| dir.starts_with(&self.base))
            .collect();
        dirs.reverse();

        for dir in dirs {
            if let Some(rules) = self.rules_for_dir(dir) {
                ignored = apply(ignored, rules.matched_path_or_any_parents(abs_path, is_dir));
            }
        }
        ignored
    }
}

fn apply<T>(current: bool, matched: Match<T>) -> bool {
    match matched {
        Match::Ignore(_) => true,
        Match::Whitelist(_) => false,
        Match::None => current,
    }
}
