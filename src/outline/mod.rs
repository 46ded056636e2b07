//! In-memory symbol model: records, dependency graphs and impact analysis.

mod graph;
mod impact;
mod model;
mod records;

pub use graph::DependencyGraph;
pub use impact::{trace_dependents, ImpactRecord, RiskLevel, RiskThresholds};
pub use model::SymbolModel;
pub use records::{
    is_exported, package_dir_of, push_unique, EdgeStat, FileRecord, FrameworkHints,
    FunctionRecord, Language, PackageRecord, TestInfo, TypeRecord,
};
