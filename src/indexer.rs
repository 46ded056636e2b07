//! Scan driver: walk, extract, resolve.
//!
//! [`process_root`] is the single entry point. It discovers modules, walks
//! the tree through the ignore predicate, parses every supported file, feeds
//! each one to its extractor in sorted path order, and finally runs the
//! resolution pass and the derived analyses over the finished model.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::analysis::{
    attach_test_info, get_extractor, is_test_file, register_extractors, registered_extensions,
    ExtractOptions, ParsedFile,
};
use crate::config::Config;
use crate::ignore_rules::{GitignoreRules, IgnorePredicate};
use crate::modules::{discover_modules, relative_to};
use crate::outline::{FileRecord, Language, SymbolModel};
use crate::resolve::resolve;

/// Errors that abort a scan.
///
/// Everything below the scan root is recoverable and only logged.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("scan root {0} does not exist")]
    RootNotFound(PathBuf),
    #[error("cannot access scan root {path}: {source}")]
    RootInaccessible {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// A file selected for extraction.
#[derive(Debug, Clone)]
struct Candidate {
    rel: String,
    abs: PathBuf,
    ext: String,
    language: Language,
}

/// Index a directory (or a single file) into a resolved [`SymbolModel`].
pub fn process_root(root: &Path, config: &Config) -> Result<SymbolModel, IndexError> {
    let abs_root = root.canonicalize().map_err(|e| root_error(root, e))?;
    let metadata = fs::metadata(&abs_root).map_err(|e| root_error(root, e))?;

    register_extractors();
    debug!(extensions = ?registered_extensions(), "extractors registered");

    // A single-file scan is rooted at the file's directory.
    let (scan_root, single_file) = if metadata.is_file() {
        let parent = abs_root
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| abs_root.clone());
        (parent, Some(abs_root.clone()))
    } else {
        (abs_root.clone(), None)
    };

    let mut model = SymbolModel::new(&scan_root).with_risk_thresholds(config.risk);
    let modules = discover_modules(&scan_root);
    info!(root = %scan_root.display(), modules = modules.len(), "starting scan");
    model.set_modules(modules);

    let candidates = match single_file {
        Some(file) => single_candidate(&scan_root, &file, &mut model),
        None => collect_candidates(&scan_root, config, &mut model)?,
    };
    info!(
        files = candidates.len(),
        tests = model.test_files().len(),
        "walk complete"
    );

    let parsed = parse_all(&candidates, config.parallel);

    let options = ExtractOptions {
        variable_keywords: config.variables.keywords.clone(),
    };
    let mut failed = 0usize;
    for (candidate, parsed) in candidates.iter().zip(parsed) {
        if !extract_one(candidate, parsed, &mut model, &options) {
            failed += 1;
        }
    }
    info!(
        files = model.file_count(),
        failed,
        types = model.types().count(),
        "extraction complete"
    );

    // Resolution needs every file in the model.
    resolve(&mut model, &config.aliases);
    attach_test_info(&mut model);
    model.remove_duplicates();
    model.assign_risk_levels();

    Ok(model)
}

fn root_error(root: &Path, e: io::Error) -> IndexError {
    if e.kind() == io::ErrorKind::NotFound {
        IndexError::RootNotFound(root.to_path_buf())
    } else {
        IndexError::RootInaccessible {
            path: root.to_path_buf(),
            source: e,
        }
    }
}

/// Classify a repo-relative path, returning its extension and language when
/// an extractor handles it.
fn supported(rel: &str) -> Option<(String, Language)> {
    let ext = Path::new(rel).extension().and_then(|e| e.to_str())?;
    let language = Language::from_extension(ext)?;
    get_extractor(ext)?;
    Some((ext.to_string(), language))
}

fn single_candidate(scan_root: &Path, file: &Path, model: &mut SymbolModel) -> Vec<Candidate> {
    let rel = relative_to(scan_root, file);
    let Some((ext, language)) = supported(&rel) else {
        warn!(path = %file.display(), "unsupported file type");
        return Vec::new();
    };
    if is_test_file(&rel) {
        model.record_test_file(&rel);
        return Vec::new();
    }
    vec![Candidate {
        rel,
        abs: file.to_path_buf(),
        ext,
        language,
    }]
}

fn collect_candidates(
    scan_root: &Path,
    config: &Config,
    model: &mut SymbolModel,
) -> Result<Vec<Candidate>, IndexError> {
    let rules = GitignoreRules::new(scan_root);
    let excluded = config.exclusion_set();

    let walker = WalkDir::new(scan_root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 {
                return true;
            }
            if rules.should_ignore(entry.path()) {
                debug!(path = %entry.path().display(), "ignored");
                return false;
            }
            !excluded.is_match(relative_to(scan_root, entry.path()))
        });

    let mut candidates = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(IndexError::Walk {
                    path: scan_root.to_path_buf(),
                    source: e,
                })
            }
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let rel = relative_to(scan_root, entry.path());
        let Some((ext, language)) = supported(&rel) else {
            continue;
        };
        if is_test_file(&rel) {
            model.record_test_file(&rel);
            continue;
        }
        candidates.push(Candidate {
            rel,
            abs: entry.path().to_path_buf(),
            ext,
            language,
        });
    }

    candidates.sort_by(|a, b| a.rel.cmp(&b.rel));
    Ok(candidates)
}

fn parse_one(candidate: &Candidate) -> anyhow::Result<ParsedFile> {
    let extractor = get_extractor(&candidate.ext)
        .with_context(|| format!("no extractor for .{}", candidate.ext))?;
    let source = fs::read(&candidate.abs)
        .with_context(|| format!("reading {}", candidate.abs.display()))?;
    extractor.parse(Path::new(&candidate.rel), &source)
}

/// Read and parse every candidate, preserving input order.
fn parse_all(candidates: &[Candidate], parallel: bool) -> Vec<anyhow::Result<ParsedFile>> {
    if parallel {
        candidates.par_iter().map(parse_one).collect()
    } else {
        candidates.iter().map(parse_one).collect()
    }
}

/// Extract one parsed file into the model. Returns false when the file was
/// kept as an empty record after a failure.
fn extract_one(
    candidate: &Candidate,
    parsed: anyhow::Result<ParsedFile>,
    model: &mut SymbolModel,
    options: &ExtractOptions,
) -> bool {
    let mut record = FileRecord::new(&candidate.rel, candidate.abs.clone(), candidate.language);

    let outcome = parsed.and_then(|parsed| {
        let extractor = get_extractor(&candidate.ext)
            .with_context(|| format!("no extractor for .{}", candidate.ext))?;
        extractor.extract(&parsed, &mut record, model, options)
    });

    let ok = match outcome {
        Ok(()) => {
            debug!(
                path = %candidate.rel,
                language = %candidate.language,
                functions = record.functions.len(),
                imports = record.imports.len(),
                "extracted"
            );
            true
        }
        Err(e) => {
            let message = format!("{:#}", e);
            warn!(path = %candidate.rel, error = %message, "extraction failed");
            record.reset_extracted();
            record.parse_error = Some(message);
            false
        }
    };
    model.add_file(record);
    ok
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope");
        let err = process_root(&missing, &Config::default()).unwrap_err();
        assert!(matches!(err, IndexError::RootNotFound(_)));
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_skips_ignored_excluded_and_unsupported() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, ".gitignore", "dist/\n");
        write(root, "src/app.ts", "export function run() {}\n");
        write(root, "dist/app.js", "function built() {}\n");
        write(root, "node_modules/lib/index.js", "function lib() {}\n");
        write(root, "generated/api.ts", "export function gen() {}\n");
        write(root, "README.md", "# readme\n");
        write(root, "src/app.test.ts", "it('runs', () => {});\n");

        let config = Config::parse_str("excluded_paths:\n  - \"generated/**\"\n").unwrap();
        let model = process_root(root, &config).unwrap();

        assert_eq!(model.file_paths(), vec!["src/app.ts"]);
        assert_eq!(model.test_files(), &["src/app.test.ts".to_string()]);
    }

    #[test]
    fn test_parse_failure_keeps_empty_record() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "broken.go", "package broken\n\nfunc Oops( {\n");
        write(root, "ok.go", "package broken\n\nfunc Fine() {}\n");

        let model = process_root(root, &Config::default()).unwrap();

        let broken = model.file("broken.go").unwrap();
        assert!(broken.parse_error.is_some());
        assert!(broken.functions.is_empty());
        assert_eq!(model.file("ok.go").unwrap().exported_funcs, vec!["Fine"]);
    }

    #[test]
    fn test_non_utf8_script_is_still_extracted() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(
            root.join("src/a.ts"),
            b"// caf\xE9\nexport function helper(a: string) {}\nimport { x } from './b';\n",
        )
        .unwrap();
        write(root, "src/b.ts", "export const x = 1;\n");

        let model = process_root(root, &Config::default()).unwrap();

        let a = model.file("src/a.ts").unwrap();
        assert!(a.parse_error.is_none());
        assert_eq!(a.functions.len(), 1);
        assert_eq!(a.functions[0].name, "helper");
        assert_eq!(a.imports, vec!["./b"]);
        assert_eq!(model.dependencies("src/a.ts"), &["src/b.ts".to_string()]);
    }

    #[test]
    fn test_sequential_and_parallel_agree() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write(root, "src/a.ts", "import { b } from './b';\nexport const a = () => b();\n");
        write(root, "src/b.ts", "export function b() {}\n");

        let parallel = process_root(root, &Config::default()).unwrap();
        let sequential = process_root(
            root,
            &Config {
                parallel: false,
                ..Config::default()
            },
        )
        .unwrap();

        assert_eq!(parallel.file_paths(), sequential.file_paths());
        assert_eq!(
            parallel.dependencies("src/a.ts"),
            sequential.dependencies("src/a.ts")
        );
        assert_eq!(parallel.dependencies("src/a.ts"), &["src/b.ts".to_string()]);
    }
}
