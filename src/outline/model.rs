//! The shared symbol model for one scan.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::modules::GoModule;

use super::{
    push_unique, DependencyGraph, EdgeStat, FileRecord, ImpactRecord, PackageRecord,
    RiskThresholds, TypeRecord,
};

/// Mutable aggregate of every fact extracted during a scan.
///
/// All accretion operations are idempotent and create their targets on first
/// mention, so the final graph shape does not depend on file order. Only the
/// order inside adjacency lists reflects insertion order.
#[derive(Debug, Default)]
pub struct SymbolModel {
    pub(crate) root: PathBuf,
    pub(crate) files: BTreeMap<String, FileRecord>,
    pub(crate) types: BTreeMap<String, TypeRecord>,
    pub(crate) function_calls: BTreeMap<String, Vec<String>>,
    pub(crate) public_apis: BTreeMap<String, Vec<String>>,
    pub(crate) file_deps: DependencyGraph,
    pub(crate) package_deps: DependencyGraph,
    pub(crate) package_edge_stats: HashMap<(String, String), EdgeStat>,
    pub(crate) packages: BTreeMap<String, PackageRecord>,
    pub(crate) modules: Vec<GoModule>,
    pub(crate) test_files: Vec<String>,
    pub(crate) risk: RiskThresholds,
    pub(crate) file_impacts: HashMap<String, ImpactRecord>,
    pub(crate) package_impacts: HashMap<String, ImpactRecord>,
}

impl SymbolModel {
    /// Create an empty model for a scan root.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    /// Use custom risk thresholds for impact classification.
    pub fn with_risk_thresholds(mut self, risk: RiskThresholds) -> Self {
        self.risk = risk;
        self
    }

    /// Install the discovered modules, deepest directory first.
    pub fn set_modules(&mut self, modules: Vec<GoModule>) {
        self.modules = modules;
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn modules(&self) -> &[GoModule] {
        &self.modules
    }

    pub fn risk_thresholds(&self) -> RiskThresholds {
        self.risk
    }

    // ------------------------------------------------------------------
    // Accretion
    // ------------------------------------------------------------------

    /// Fetch a type record, creating an empty one on first mention.
    pub fn ensure_type(&mut self, name: &str) -> &mut TypeRecord {
        self.types
            .entry(name.to_string())
            .or_insert_with(|| TypeRecord {
                name: name.to_string(),
                ..Default::default()
            })
    }

    /// Insert a file record, replacing any previous record at the same path.
    pub fn add_file(&mut self, mut record: FileRecord) -> &mut FileRecord {
        record.module = self.owning_module(&record.package_dir).to_string();
        match self.files.entry(record.path.clone()) {
            Entry::Occupied(mut slot) => {
                slot.insert(record);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(record),
        }
    }

    /// Add a file-level dependency edge and its reverse mirror.
    pub fn add_dependency(&mut self, from: &str, to: &str) -> bool {
        self.file_deps.add_edge(from, to)
    }

    /// Record that `caller` (a `path:Func` location) calls `callee`.
    pub fn add_function_call(&mut self, caller: &str, callee: &str) {
        let callees = self.function_calls.entry(caller.to_string()).or_default();
        push_unique(callees, callee);
    }

    /// Record that `used_by` (a `path:Func` location) uses `type_name`.
    pub fn add_type_usage(&mut self, type_name: &str, used_by: &str) {
        let record = self.ensure_type(type_name);
        push_unique(&mut record.used_by, used_by);
    }

    /// Add a package-level dependency edge and its reverse mirror.
    pub fn add_package_dependency(&mut self, from: &str, to: &str) -> bool {
        self.package_deps.add_edge(from, to)
    }

    /// Accumulate coupling counters on the `from -> to` package edge.
    pub fn add_package_edge_stat(&mut self, from: &str, to: &str, stat: EdgeStat) {
        self.package_edge_stats
            .entry((from.to_string(), to.to_string()))
            .or_default()
            .accumulate(stat);
    }

    /// Record a public API entry for a file (`Func` or `type:Type`).
    pub fn add_public_api(&mut self, path: &str, entry: &str) {
        let entries = self.public_apis.entry(path.to_string()).or_default();
        push_unique(entries, entry);
    }

    /// Remember a test file seen during the walk.
    pub fn record_test_file(&mut self, path: &str) {
        push_unique(&mut self.test_files, path);
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// All indexed file paths, sorted.
    pub fn file_paths(&self) -> Vec<&str> {
        self.files.keys().map(String::as_str).collect()
    }

    pub fn files(&self) -> impl Iterator<Item = &FileRecord> {
        self.files.values()
    }

    pub fn file(&self, path: &str) -> Option<&FileRecord> {
        self.files.get(path)
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn type_record(&self, name: &str) -> Option<&TypeRecord> {
        self.types.get(name)
    }

    pub fn types(&self) -> impl Iterator<Item = &TypeRecord> {
        self.types.values()
    }

    /// Files that `path` depends on.
    pub fn dependencies(&self, path: &str) -> &[String] {
        self.file_deps.dependencies(path)
    }

    /// Files that depend on `path`.
    pub fn dependents(&self, path: &str) -> &[String] {
        self.file_deps.dependents(path)
    }

    pub fn package_dependencies(&self, package: &str) -> &[String] {
        self.package_deps.dependencies(package)
    }

    pub fn package_dependents(&self, package: &str) -> &[String] {
        self.package_deps.dependents(package)
    }

    pub fn file_graph(&self) -> &DependencyGraph {
        &self.file_deps
    }

    pub fn package_graph(&self) -> &DependencyGraph {
        &self.package_deps
    }

    /// Coupling counters for a package edge, if any signal was recorded.
    pub fn edge_stat(&self, from: &str, to: &str) -> Option<EdgeStat> {
        self.package_edge_stats
            .get(&(from.to_string(), to.to_string()))
            .copied()
    }

    /// Package edges with their counters, sorted by (from, to).
    pub fn package_edges(&self) -> Vec<(&str, &str, EdgeStat)> {
        self.package_deps
            .edges()
            .into_iter()
            .map(|(from, to)| (from, to, self.edge_stat(from, to).unwrap_or_default()))
            .collect()
    }

    /// Callees recorded for a `path:Func` location.
    pub fn calls_from(&self, caller: &str) -> &[String] {
        self.function_calls
            .get(caller)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Locations whose recorded callees include `callee`, sorted.
    pub fn callers_of(&self, callee: &str) -> Vec<&str> {
        self.function_calls
            .iter()
            .filter(|(_, callees)| callees.iter().any(|c| c == callee))
            .map(|(caller, _)| caller.as_str())
            .collect()
    }

    /// Public API entries grouped by file, files sorted.
    pub fn public_apis(&self) -> &BTreeMap<String, Vec<String>> {
        &self.public_apis
    }

    pub fn packages(&self) -> impl Iterator<Item = &PackageRecord> {
        self.packages.values()
    }

    pub fn package(&self, path: &str) -> Option<&PackageRecord> {
        self.packages.get(path)
    }

    pub fn test_files(&self) -> &[String] {
        &self.test_files
    }

    /// Module identifier owning a repo-relative directory.
    ///
    /// Modules are kept deepest-first, so the first containing module wins.
    pub fn owning_module(&self, dir: &str) -> &str {
        self.modules
            .iter()
            .find(|m| m.contains_dir(dir))
            .map(|m| m.module_path.as_str())
            .unwrap_or("")
    }

    // ------------------------------------------------------------------
    // Maintenance
    // ------------------------------------------------------------------

    pub(crate) fn file_mut(&mut self, path: &str) -> Option<&mut FileRecord> {
        self.files.get_mut(path)
    }

    /// Drop repeated entries left by overlapping extraction patterns.
    ///
    /// Functions are compared by name and parameters; types and variables by
    /// value. The first occurrence is kept.
    pub fn remove_duplicates(&mut self) {
        for file in self.files.values_mut() {
            let mut seen: Vec<(String, Vec<String>)> = Vec::new();
            file.functions.retain(|f| {
                let key = (f.name.clone(), f.params.clone());
                if seen.contains(&key) {
                    false
                } else {
                    seen.push(key);
                    true
                }
            });
            dedup_in_place(&mut file.types);
            dedup_in_place(&mut file.vars);
            dedup_in_place(&mut file.exported_funcs);
            dedup_in_place(&mut file.exported_types);
        }
        for record in self.types.values_mut() {
            dedup_in_place(&mut record.fields);
            dedup_in_place(&mut record.methods);
        }
    }
}

fn dedup_in_place(list: &mut Vec<String>) {
    let mut seen = HashSet::new();
    list.retain(|item| seen.insert(item.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::Language;

    fn record(path: &str) -> FileRecord {
        FileRecord::new(path, PathBuf::from(path), Language::Go)
    }

    #[test]
    fn test_ensure_type_is_create_or_fetch() {
        let mut model = SymbolModel::new(".");
        model.ensure_type("Config").fields.push("Name".to_string());
        model.ensure_type("Config").methods.push("Validate".to_string());

        let config = model.type_record("Config").unwrap();
        assert_eq!(config.name, "Config");
        assert_eq!(config.fields, vec!["Name"]);
        assert_eq!(config.methods, vec!["Validate"]);
    }

    #[test]
    fn test_type_usage_before_declaration() {
        let mut model = SymbolModel::new(".");
        model.add_type_usage("Config", "b.go:Load");

        // Declaration arrives later and keeps the accumulated usage.
        let config = model.ensure_type("Config");
        config.is_public = true;
        config.declared_in = Some("a.go".to_string());

        let config = model.type_record("Config").unwrap();
        assert_eq!(config.used_by, vec!["b.go:Load"]);
        assert!(config.is_public);
    }

    #[test]
    fn test_dependency_edges_are_idempotent() {
        let mut model = SymbolModel::new(".");
        model.add_dependency("a.go", "b.go");
        model.add_dependency("a.go", "b.go");
        model.add_package_dependency("cmd", "internal/store");
        model.add_package_dependency("cmd", "internal/store");

        assert_eq!(model.dependencies("a.go"), &["b.go".to_string()]);
        assert_eq!(model.dependents("b.go"), &["a.go".to_string()]);
        assert_eq!(model.package_dependencies("cmd"), &["internal/store".to_string()]);
        assert_eq!(model.package_dependents("internal/store"), &["cmd".to_string()]);
    }

    #[test]
    fn test_edge_stats_accumulate() {
        let mut model = SymbolModel::new(".");
        model.add_package_edge_stat("cmd", "store", EdgeStat::import());
        model.add_package_edge_stat("cmd", "store", EdgeStat::call());
        model.add_package_edge_stat("cmd", "store", EdgeStat::call());
        model.add_package_edge_stat("store", "cmd", EdgeStat::type_use());

        assert_eq!(
            model.edge_stat("cmd", "store"),
            Some(EdgeStat {
                imports: 1,
                calls: 2,
                type_uses: 0
            })
        );
        assert_eq!(model.edge_stat("store", "cmd").unwrap().type_uses, 1);
        assert_eq!(model.edge_stat("other", "cmd"), None);
    }

    #[test]
    fn test_function_calls_and_callers() {
        let mut model = SymbolModel::new(".");
        model.add_function_call("main.go:main", "Run");
        model.add_function_call("main.go:main", "Run");
        model.add_function_call("cli.go:Execute", "Run");

        assert_eq!(model.calls_from("main.go:main"), &["Run".to_string()]);
        assert_eq!(model.callers_of("Run"), vec!["cli.go:Execute", "main.go:main"]);
    }

    #[test]
    fn test_owning_module_prefers_deepest() {
        let mut model = SymbolModel::new("/repo");
        model.set_modules(vec![
            GoModule::new("/repo/server", "server", "example.com/root/server"),
            GoModule::new("/repo", ".", "example.com/root"),
        ]);

        assert_eq!(model.owning_module("server/api"), "example.com/root/server");
        assert_eq!(model.owning_module("server"), "example.com/root/server");
        assert_eq!(model.owning_module("serverless"), "example.com/root");
        assert_eq!(model.owning_module("."), "example.com/root");

        let file = model.add_file(record("server/api/routes.go"));
        assert_eq!(file.module, "example.com/root/server");
    }

    #[test]
    fn test_remove_duplicates() {
        let mut model = SymbolModel::new(".");
        let mut file = record("a.ts");
        file.functions.push(crate::outline::FunctionRecord::new("load", 1));
        file.functions.push(crate::outline::FunctionRecord::new("load", 1));
        file.types = vec!["User".into(), "User".into(), "Role".into()];
        model.add_file(file);

        model.remove_duplicates();

        let file = model.file("a.ts").unwrap();
        assert_eq!(file.functions.len(), 1);
        assert_eq!(file.types, vec!["User", "Role"]);
    }
}
