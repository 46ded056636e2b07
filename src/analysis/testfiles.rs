//! Test file detection and test-to-source association.
//!
//! Test files are never extracted as sources. They are recorded during the
//! walk and later attached to the source files they cover by stem matching
//! within the same directory (`store.go` ↔ `store_test.go`,
//! `Button.tsx` ↔ `Button.test.tsx`).

use std::fs;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{debug, warn};

use crate::outline::{package_dir_of, push_unique, SymbolModel, TestInfo};

lazy_static! {
    static ref GO_TEST_FUNC: Regex = Regex::new(r"(?m)^func\s+(Test\w*)\s*\(").unwrap();
    static ref SCRIPT_TEST_TITLE: Regex =
        Regex::new(r#"\b(?:it|test|describe)(?:\.\w+)?\s*\(\s*(?:'([^']*)'|"([^"]*)"|`([^`]*)`)"#)
            .unwrap();
}

/// Whether a repo-relative path names a test file.
pub fn is_test_file(path: &str) -> bool {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.ends_with("_test.go") || name.contains(".test.") || name.contains(".spec.")
}

/// Stem a test file covers: `store` for `store_test.go` or `store.test.ts`.
fn covered_stem(test_path: &str) -> Option<&str> {
    let name = test_path.rsplit('/').next().unwrap_or(test_path);
    if let Some(stem) = name.strip_suffix("_test.go") {
        return Some(stem);
    }
    [".test.", ".spec."]
        .iter()
        .find_map(|marker| name.find(marker).map(|idx| &name[..idx]))
}

/// Stem of a source file: the file name up to its first dot.
fn source_stem(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.split('.').next().unwrap_or(name)
}

/// Scenario names in a test file: `TestXxx` functions for Go, `it`/`test`/
/// `describe` titles for scripts.
pub fn test_scenarios(path: &str, source: &str) -> Vec<String> {
    let mut scenarios = Vec::new();
    if path.ends_with(".go") {
        for c in GO_TEST_FUNC.captures_iter(source) {
            push_unique(&mut scenarios, &c[1]);
        }
    } else {
        for c in SCRIPT_TEST_TITLE.captures_iter(source) {
            if let Some(title) = c.get(1).or_else(|| c.get(2)).or_else(|| c.get(3)) {
                push_unique(&mut scenarios, title.as_str());
            }
        }
    }
    scenarios
}

/// Attach [`TestInfo`] to every source file that has matching test files.
pub fn attach_test_info(model: &mut SymbolModel) {
    let tests: Vec<String> = model.test_files().to_vec();
    if tests.is_empty() {
        return;
    }

    let mut scenarios_by_test = Vec::with_capacity(tests.len());
    for test in &tests {
        let abs = model.root().join(test);
        let scenarios = match fs::read_to_string(&abs) {
            Ok(source) => test_scenarios(test, &source),
            Err(e) => {
                warn!(path = %test, error = %e, "failed to read test file");
                Vec::new()
            }
        };
        scenarios_by_test.push(scenarios);
    }

    let paths: Vec<String> = model.file_paths().iter().map(|p| p.to_string()).collect();
    for path in paths {
        let dir = package_dir_of(&path);
        let stem = source_stem(&path);

        let mut info = TestInfo::default();
        for (test, scenarios) in tests.iter().zip(&scenarios_by_test) {
            if package_dir_of(test) == dir && covered_stem(test) == Some(stem) {
                push_unique(&mut info.test_files, test.as_str());
                for scenario in scenarios {
                    push_unique(&mut info.scenarios, scenario.as_str());
                }
            }
        }

        if !info.test_files.is_empty() {
            debug!(path = %path, tests = info.test_files.len(), "attached tests");
            if let Some(file) = model.file_mut(&path) {
                file.test_info = Some(info);
            }
        }
    }
}
