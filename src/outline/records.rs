//! Record types stored in the symbol model.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use super::RiskLevel;

/// Source language of an indexed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Go,
    JavaScript,
    TypeScript,
    Astro,
}

impl Language {
    /// Map a file extension (without dot) to a language.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "go" => Some(Language::Go),
            "js" | "jsx" | "mjs" | "cjs" => Some(Language::JavaScript),
            "ts" | "tsx" | "mts" | "cts" => Some(Language::TypeScript),
            "astro" => Some(Language::Astro),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Go => "go",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Astro => "astro",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A function or method extracted from a file.
///
/// Methods carry a receiver-qualified name such as `(Server) Start`, so
/// several records with the same bare name can coexist in one file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FunctionRecord {
    pub name: String,
    /// Parameter descriptors, `name type` where both are known.
    pub params: Vec<String>,
    /// Return type descriptor, empty when unknown or absent.
    pub return_type: String,
    pub is_public: bool,
    /// Callee names (bare identifiers or selector names), unique.
    pub calls: Vec<String>,
    /// Type names referenced by the signature or the body, unique.
    pub uses_types: Vec<String>,
    /// 1-indexed source line.
    pub line: usize,
}

impl FunctionRecord {
    pub fn new(name: impl Into<String>, line: usize) -> Self {
        Self {
            name: name.into(),
            line,
            ..Default::default()
        }
    }

    /// Render as `name(params) -> ret`.
    pub fn signature(&self) -> String {
        let params = self.params.join(", ");
        if self.return_type.is_empty() {
            format!("{}({})", self.name, params)
        } else {
            format!("{}({}) -> {}", self.name, params, self.return_type)
        }
    }
}

/// A type entry in the global registry, keyed by name.
///
/// Created lazily by the first declaration or reference, so usage from one
/// file can accumulate before the declaring file is parsed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TypeRecord {
    pub name: String,
    pub fields: Vec<String>,
    pub methods: Vec<String>,
    pub is_public: bool,
    pub implements: Vec<String>,
    /// Embedded (Go) or base (extends) types.
    pub embedded: Vec<String>,
    /// Serialization tag keys such as `json:id`.
    pub contract_keys: Vec<String>,
    /// Qualified locations (`path:Func`) that use this type.
    pub used_by: Vec<String>,
    /// Declaring file, once a declaration has been seen.
    pub declared_in: Option<String>,
    /// 1-indexed line of the declaration, 0 when only referenced.
    pub line: usize,
}

/// Framework-idiomatic constructs detected in script and template files.
///
/// Best-effort enrichment, never a guarantee of completeness.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FrameworkHints {
    /// Component-like variable bindings (`const X: FC = ...`).
    pub components: Vec<String>,
    /// Hook-like calls (`useState(`).
    pub hooks: Vec<String>,
    /// Custom component tags used in markup.
    pub used_components: Vec<String>,
    /// Astro `client:*` directives.
    pub client_directives: Vec<String>,
    /// Astro slots, `default` for unnamed slots.
    pub slots: Vec<String>,
    /// Names destructured from `Astro.props`.
    pub props: Vec<String>,
}

impl FrameworkHints {
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
            && self.hooks.is_empty()
            && self.used_components.is_empty()
            && self.client_directives.is_empty()
            && self.slots.is_empty()
            && self.props.is_empty()
    }
}

/// Test files associated with a source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TestInfo {
    pub test_files: Vec<String>,
    /// Test function names or test titles found in those files.
    pub scenarios: Vec<String>,
}

/// Everything known about one indexed source file.
#[derive(Debug, Clone, Serialize)]
pub struct FileRecord {
    /// Repo-relative path with `/` separators; unique in the model.
    pub path: String,
    #[serde(skip)]
    pub abs_path: PathBuf,
    pub language: Language,
    /// Owning module identifier, empty when outside every known module.
    pub module: String,
    /// Repo-relative directory, `.` for the scan root.
    pub package_dir: String,
    /// Declared package name (Go only).
    pub package_name: Option<String>,
    pub functions: Vec<FunctionRecord>,
    pub types: Vec<String>,
    pub vars: Vec<String>,
    /// Raw import strings as written.
    pub imports: Vec<String>,
    /// Resolved local file dependencies (filled by the resolution pass).
    pub local_deps: Vec<String>,
    /// Resolved local package dependencies.
    pub local_pkg_deps: Vec<String>,
    pub exported_funcs: Vec<String>,
    pub exported_types: Vec<String>,
    pub routes: Vec<String>,
    pub framework: FrameworkHints,
    pub test_info: Option<TestInfo>,
    pub risk_level: RiskLevel,
    /// Set when extraction failed and the record is empty or partial.
    pub parse_error: Option<String>,
}

impl FileRecord {
    pub fn new(path: impl Into<String>, abs_path: PathBuf, language: Language) -> Self {
        let path = path.into();
        let package_dir = package_dir_of(&path);
        Self {
            path,
            abs_path,
            language,
            module: String::new(),
            package_dir,
            package_name: None,
            functions: Vec::new(),
            types: Vec::new(),
            vars: Vec::new(),
            imports: Vec::new(),
            local_deps: Vec::new(),
            local_pkg_deps: Vec::new(),
            exported_funcs: Vec::new(),
            exported_types: Vec::new(),
            routes: Vec::new(),
            framework: FrameworkHints::default(),
            test_info: None,
            risk_level: RiskLevel::Low,
            parse_error: None,
        }
    }

    /// Find a function by its (possibly receiver-qualified) name.
    pub fn find_function(&self, name: &str) -> Option<&FunctionRecord> {
        self.functions.iter().find(|f| f.name == name)
    }

    /// Clear everything extraction produced, keeping identity fields.
    pub fn reset_extracted(&mut self) {
        self.package_name = None;
        self.functions.clear();
        self.types.clear();
        self.vars.clear();
        self.imports.clear();
        self.local_deps.clear();
        self.local_pkg_deps.clear();
        self.exported_funcs.clear();
        self.exported_types.clear();
        self.routes.clear();
        self.framework = FrameworkHints::default();
    }
}

/// A package directory and its member files.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageRecord {
    /// Repo-relative directory, `.` for the scan root.
    pub path: String,
    /// Member file paths, sorted.
    pub files: Vec<String>,
    /// Lexicographically smallest member, stand-in for package edges.
    pub representative: String,
}

/// Coupling counters between two packages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EdgeStat {
    pub imports: usize,
    pub calls: usize,
    pub type_uses: usize,
}

impl EdgeStat {
    pub fn import() -> Self {
        Self {
            imports: 1,
            ..Default::default()
        }
    }

    pub fn call() -> Self {
        Self {
            calls: 1,
            ..Default::default()
        }
    }

    pub fn type_use() -> Self {
        Self {
            type_uses: 1,
            ..Default::default()
        }
    }

    /// Total coupling strength.
    pub fn weight(&self) -> usize {
        self.imports + self.calls + self.type_uses
    }

    /// Human-readable counters, e.g. `2 imports, 5 calls, 1 type uses`.
    pub fn label(&self) -> String {
        format!(
            "{} imports, {} calls, {} type uses",
            self.imports, self.calls, self.type_uses
        )
    }

    pub fn accumulate(&mut self, other: EdgeStat) {
        self.imports += other.imports;
        self.calls += other.calls;
        self.type_uses += other.type_uses;
    }
}

/// Repo-relative directory of a repo-relative file path.
pub fn package_dir_of(path: &str) -> String {
    match path.rfind('/') {
        Some(idx) if idx > 0 => path[..idx].to_string(),
        _ => ".".to_string(),
    }
}

/// Push `value` unless already present.
pub fn push_unique(list: &mut Vec<String>, value: impl Into<String>) {
    let value = value.into();
    if !list.contains(&value) {
        list.push(value);
    }
}

/// Whether an identifier is exported by Go's casing convention.
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_uppercase())
}
