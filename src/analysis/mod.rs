//! Per-file extraction.
//!
//! Each supported language has an [`Extractor`] that turns source text into
//! a [`FileRecord`](crate::outline::FileRecord) and records cross-file facts
//! in the shared [`SymbolModel`](crate::outline::SymbolModel).
//!
//! Fidelity differs by language:
//!
//! - Go is parsed with tree-sitter and walked as a syntax tree.
//! - JavaScript and TypeScript are scanned line by line with patterns and
//!   brace-depth tracking.
//! - Astro frontmatter goes through the script scanner; the template is
//!   scanned for component tags, directives and slots.
//!
//! # Adding a New Language
//!
//! 1. Create a new module in `src/analysis/languages/`
//! 2. Implement the `Extractor` trait
//! 3. Register the extractor in `languages/mod.rs`

mod languages;
mod testfiles;
mod traits;

pub use languages::{
    get_extractor, register_extractors, registered_extensions, AstroExtractor, GoExtractor,
    ScriptExtractor,
};
pub use testfiles::{attach_test_info, is_test_file, test_scenarios};
pub use traits::{ExtractOptions, Extractor, ParsedFile};
