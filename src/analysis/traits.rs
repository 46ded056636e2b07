//! Core traits for per-file extraction.

use std::path::Path;

use tracing::warn;

use crate::outline::{FileRecord, SymbolModel};

/// A source file ready for extraction.
///
/// Parsing is separated from extraction so the parse phase can run on a
/// thread pool while extraction into the shared model stays sequential.
pub struct ParsedFile {
    /// Syntax tree, for extractors backed by a tree-sitter grammar.
    pub tree: Option<tree_sitter::Tree>,
    /// The original source code.
    pub source: Vec<u8>,
    /// Repo-relative path (for logging).
    pub path: String,
}

impl ParsedFile {
    /// Wrap source that is scanned without a syntax tree.
    ///
    /// Invalid UTF-8 sequences are replaced with U+FFFD so the rest of the
    /// file is still scanned.
    pub fn text_only(path: &Path, source: &[u8]) -> Self {
        let source = match std::str::from_utf8(source) {
            Ok(_) => source.to_vec(),
            Err(e) => {
                warn!(
                    path = %path.display(),
                    offset = e.valid_up_to(),
                    "invalid UTF-8, decoding lossily"
                );
                String::from_utf8_lossy(source).into_owned().into_bytes()
            }
        };
        Self {
            tree: None,
            source,
            path: path.to_string_lossy().to_string(),
        }
    }

    /// Get the source code as a string slice.
    pub fn source_str(&self) -> &str {
        std::str::from_utf8(&self.source).unwrap_or("")
    }

    /// Get text for a tree-sitter node.
    pub fn node_text(&self, node: tree_sitter::Node) -> &str {
        node.utf8_text(&self.source).unwrap_or("")
    }
}

/// Tunables shared by all extractors.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Lowercase substrings that make a script constant worth recording.
    pub variable_keywords: Vec<String>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            variable_keywords: ["config", "default", "option", "setting"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Language-specific extractor.
///
/// Each extractor fills one [`FileRecord`] and records cross-file facts
/// (calls, type usage, package coupling) directly in the shared model while
/// it walks the file.
pub trait Extractor: Send + Sync {
    /// Returns the language identifier (e.g., "go", "script").
    fn language_id(&self) -> &'static str;

    /// Returns file extensions this extractor handles (without dot).
    fn file_extensions(&self) -> &'static [&'static str];

    /// Prepare a source file for extraction.
    ///
    /// Grammar-backed extractors build a syntax tree here and reject files
    /// that contain syntax errors.
    fn parse(&self, path: &Path, source: &[u8]) -> anyhow::Result<ParsedFile>;

    /// Extract facts from a parsed file into `record` and `model`.
    fn extract(
        &self,
        parsed: &ParsedFile,
        record: &mut FileRecord,
        model: &mut SymbolModel,
        options: &ExtractOptions,
    ) -> anyhow::Result<()>;

    /// Check if this extractor handles the given file extension.
    fn handles_extension(&self, ext: &str) -> bool {
        self.file_extensions().contains(&ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_only_keeps_valid_source() {
        let parsed = ParsedFile::text_only(Path::new("a.ts"), "const café = 1;\n".as_bytes());
        assert_eq!(parsed.source_str(), "const café = 1;\n");
    }

    #[test]
    fn test_text_only_decodes_invalid_utf8_lossily() {
        let parsed = ParsedFile::text_only(Path::new("a.ts"), b"// caf\xE9\nexport const A = 1;\n");
        assert_eq!(parsed.source_str(), "// caf\u{FFFD}\nexport const A = 1;\n");
    }
}
