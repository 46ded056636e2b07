//! Codebrev - cross-referenced code outlines.
//!
//! Codebrev indexes a Go, JavaScript/TypeScript and Astro source tree into a
//! shared symbol model and renders it as an outline document for humans and
//! LLM coding agents.
//!
//! # Architecture
//!
//! A scan runs in two phases over one [`SymbolModel`]:
//!
//! - `modules`: Go module and workspace discovery
//! - `analysis`: per-language extractors (tree-sitter for Go, patterns for
//!   scripts and Astro) that fill the model file by file
//! - `resolve`: the second pass turning script imports into file edges and
//!   grouping files into packages
//! - `outline`: the model itself, its dependency graphs and impact analysis
//! - `report`: Markdown, mermaid, JSON and terminal output
//! - `indexer`: the driver tying the walk, extraction and resolution together
//!
//! # Adding a New Language
//!
//! See `src/analysis/languages/` for examples. Implement the `Extractor`
//! trait and register it in `languages/mod.rs`.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod ignore_rules;
pub mod indexer;
pub mod modules;
pub mod outline;
pub mod report;
pub mod resolve;

pub use analysis::{
    get_extractor, register_extractors, AstroExtractor, ExtractOptions, Extractor, GoExtractor,
    ParsedFile, ScriptExtractor,
};
pub use config::Config;
pub use ignore_rules::{GitignoreRules, IgnorePredicate};
pub use indexer::{process_root, IndexError};
pub use modules::{discover_modules, GoModule};
pub use outline::{
    EdgeStat, FileRecord, FunctionRecord, ImpactRecord, Language, PackageRecord, RiskLevel,
    RiskThresholds, SymbolModel, TypeRecord,
};
pub use report::{render_json, render_markdown, ReportOptions};
