//! Go extractor using tree-sitter.
//!
//! Extracts:
//! - Package name and imports (with alias bindings)
//! - Struct and interface declarations with fields, methods, embedded types
//!   and struct-tag contract keys
//! - Functions and receiver methods with parameter and return types
//! - Call and type-usage edges into the shared model
//! - Package coupling signals (imports, selector calls, qualified types)
//! - Router-style route registrations
//! - Exported package-level variables and constants

use std::collections::HashMap;
use std::path::Path;

use streaming_iterator::StreamingIterator;
use tree_sitter::{Language, Node, Parser, Query, QueryCursor};
use tracing::warn;

use crate::analysis::{ExtractOptions, Extractor, ParsedFile};
use crate::outline::{is_exported, push_unique, EdgeStat, FileRecord, FunctionRecord, SymbolModel};
use crate::resolve::resolve_go_import;

/// Tree-sitter query for package declaration.
const PACKAGE_QUERY: &str = r#"
(package_clause
  (package_identifier) @package_name
)
"#;

/// Tree-sitter query for router-style calls: `r.Get("/path", handler)`.
const ROUTE_QUERY: &str = r#"
(call_expression
  function: (selector_expression
    field: (field_identifier) @method
  )
  arguments: (argument_list) @args
) @call
"#;

/// Struct tag keys that describe an external contract surface.
const CONTRACT_TAG_KEYS: &[&str] = &["json", "form", "query", "header", "path", "param", "url"];

/// Selector names that register routes on common routers.
const ROUTE_METHODS: &[&str] = &[
    "Get",
    "Post",
    "Put",
    "Patch",
    "Delete",
    "Head",
    "Options",
    "Route",
    "Mount",
    "Handle",
    "HandleFunc",
];

/// Predeclared Go types, never recorded as type usage.
const BUILTIN_TYPES: &[&str] = &[
    "any",
    "bool",
    "byte",
    "comparable",
    "complex64",
    "complex128",
    "error",
    "float32",
    "float64",
    "int",
    "int8",
    "int16",
    "int32",
    "int64",
    "rune",
    "string",
    "uint",
    "uint8",
    "uint16",
    "uint32",
    "uint64",
    "uintptr",
];

/// Go extractor.
pub struct GoExtractor {
    language: Language,
}

impl GoExtractor {
    /// Create a new Go extractor.
    pub fn new() -> Self {
        Self {
            language: tree_sitter_go::LANGUAGE.into(),
        }
    }

    /// Create a new parser for this thread.
    fn create_parser(&self) -> anyhow::Result<Parser> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;
        Ok(parser)
    }

    fn extract_package(&self, parsed: &ParsedFile, root: Node) -> Option<String> {
        let query = Query::new(&self.language, PACKAGE_QUERY).ok()?;
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, root, &parsed.source[..]);

        if let Some(m) = matches.next() {
            for capture in m.captures {
                let name = query.capture_names()[capture.index as usize];
                if name == "package_name" {
                    return Some(parsed.node_text(capture.node).to_string());
                }
            }
        }
        None
    }

    /// Record imports and return alias to local package directory bindings.
    fn extract_imports(
        &self,
        parsed: &ParsedFile,
        root: Node,
        record: &mut FileRecord,
        model: &mut SymbolModel,
    ) -> HashMap<String, String> {
        let mut aliases = HashMap::new();

        let mut specs = Vec::new();
        for decl in named_children(root) {
            if decl.kind() == "import_declaration" {
                collect_kind(decl, &["import_spec"], &mut specs);
            }
        }

        for spec in specs {
            let Some(path_node) = spec.child_by_field_name("path") else {
                continue;
            };
            let import_path = unquote(parsed.node_text(path_node));
            if import_path.is_empty() {
                continue;
            }
            push_unique(&mut record.imports, import_path);

            let alias = match spec.child_by_field_name("name") {
                Some(name) => parsed.node_text(name).to_string(),
                None => import_path.rsplit('/').next().unwrap_or(import_path).to_string(),
            };

            let Some(pkg_dir) = resolve_go_import(model.modules(), model.root(), import_path)
            else {
                continue;
            };
            push_unique(&mut record.local_pkg_deps, pkg_dir.as_str());
            model.add_package_dependency(&record.package_dir, &pkg_dir);
            model.add_package_edge_stat(&record.package_dir, &pkg_dir, EdgeStat::import());
            if alias != "_" && alias != "." {
                aliases.insert(alias, pkg_dir);
            }
        }
        aliases
    }

    fn extract_type_declaration(
        &self,
        parsed: &ParsedFile,
        decl: Node,
        record: &mut FileRecord,
        model: &mut SymbolModel,
    ) {
        for spec in named_children(decl) {
            if !matches!(spec.kind(), "type_spec" | "type_alias") {
                continue;
            }
            let Some(name_node) = spec.child_by_field_name("name") else {
                continue;
            };
            let name = parsed.node_text(name_node).to_string();
            let public = is_exported(&name);

            push_unique(&mut record.types, name.as_str());
            if public {
                push_unique(&mut record.exported_types, name.as_str());
                model.add_public_api(&record.path, &format!("type:{}", name));
            }

            let shape = spec
                .child_by_field_name("type")
                .map(|node| self.type_shape(parsed, node))
                .unwrap_or_default();

            let info = model.ensure_type(&name);
            info.is_public = public;
            info.declared_in = Some(record.path.clone());
            info.line = spec.start_position().row + 1;
            for field in shape.fields {
                push_unique(&mut info.fields, field);
            }
            for method in shape.methods {
                push_unique(&mut info.methods, method);
            }
            for embedded in shape.embedded {
                push_unique(&mut info.embedded, embedded);
            }
            for key in shape.contract_keys {
                push_unique(&mut info.contract_keys, key);
            }
        }
    }

    /// Members of a struct or interface type literal.
    fn type_shape(&self, parsed: &ParsedFile, node: Node) -> TypeShape {
        let mut shape = TypeShape::default();
        match node.kind() {
            "struct_type" => {
                let mut fields = Vec::new();
                collect_kind(node, &["field_declaration"], &mut fields);
                for field in fields {
                    let names: Vec<String> = field
                        .children_by_field_name("name", &mut field.walk())
                        .map(|n| parsed.node_text(n).to_string())
                        .collect();
                    let type_node = field.child_by_field_name("type");

                    if names.is_empty() {
                        if let Some(type_node) = type_node {
                            shape.embedded.extend(type_names(parsed, type_node));
                        }
                        continue;
                    }

                    let tag = field
                        .child_by_field_name("tag")
                        .map(|t| unquote(parsed.node_text(t)).to_string());
                    for name in names {
                        if let Some(tag) = &tag {
                            shape.contract_keys.extend(contract_keys(&name, tag));
                        }
                        shape.fields.push(name);
                    }
                }
            }
            "interface_type" => {
                for member in named_children(node) {
                    match member.kind() {
                        "method_elem" | "method_spec" => {
                            if let Some(name) = member.child_by_field_name("name") {
                                shape.methods.push(parsed.node_text(name).to_string());
                            }
                        }
                        "type_elem" | "constraint_elem" | "interface_type_name" => {
                            shape.embedded.extend(type_names(parsed, member));
                        }
                        _ => {}
                    }
                }
            }
            _ => {}
        }
        shape
    }

    fn extract_function(
        &self,
        parsed: &ParsedFile,
        decl: Node,
        record: &mut FileRecord,
        model: &mut SymbolModel,
        aliases: &HashMap<String, String>,
    ) {
        let Some(name_node) = decl.child_by_field_name("name") else {
            return;
        };
        let bare_name = parsed.node_text(name_node).to_string();

        let mut function = FunctionRecord::new(bare_name.as_str(), decl.start_position().row + 1);
        function.is_public = is_exported(&bare_name);

        let mut signature_types = Vec::new();
        if let Some(params) = decl.child_by_field_name("parameters") {
            for param in parameter_declarations(params) {
                let Some(type_node) = param.child_by_field_name("type") else {
                    continue;
                };
                let mut type_text = render_type(parsed.node_text(type_node));
                if param.kind() == "variadic_parameter_declaration" {
                    type_text = format!("...{}", type_text);
                }
                let names: Vec<&str> = param
                    .children_by_field_name("name", &mut param.walk())
                    .map(|n| parsed.node_text(n))
                    .collect();
                if names.is_empty() {
                    function.params.push(type_text);
                } else {
                    for name in names {
                        function.params.push(format!("{} {}", name, type_text));
                    }
                }
                signature_types.push(type_node);
            }
        }

        if let Some(result) = decl.child_by_field_name("result") {
            if result.kind() == "parameter_list" {
                let mut returns = Vec::new();
                for param in parameter_declarations(result) {
                    if let Some(type_node) = param.child_by_field_name("type") {
                        returns.push(render_type(parsed.node_text(type_node)));
                        signature_types.push(type_node);
                    }
                }
                function.return_type = returns.join(", ");
            } else {
                function.return_type = render_type(parsed.node_text(result));
                signature_types.push(result);
            }
        }

        for type_node in &signature_types {
            for name in type_names(parsed, *type_node) {
                push_unique(&mut function.uses_types, name);
            }
        }

        let body = decl.child_by_field_name("body");
        if let Some(body) = body {
            self.scan_body(parsed, body, &mut function);
        }

        if decl.kind() == "method_declaration" {
            let receiver = decl
                .child_by_field_name("receiver")
                .and_then(|r| receiver_type(parsed, r))
                .unwrap_or_else(|| "?".to_string());
            let info = model.ensure_type(&receiver);
            info.name = receiver.clone();
            info.is_public = is_exported(&receiver);
            push_unique(&mut info.methods, bare_name.as_str());
            function.name = format!("({}) {}", receiver, bare_name);
        } else if function.is_public {
            push_unique(&mut record.exported_funcs, bare_name.as_str());
            model.add_public_api(&record.path, &bare_name);
        }

        let location = format!("{}:{}", record.path, function.name);
        for callee in &function.calls {
            model.add_function_call(&location, callee);
        }
        for type_name in &function.uses_types {
            model.add_type_usage(type_name, &location);
        }

        self.record_coupling(parsed, &signature_types, body, record, model, aliases);
        record.functions.push(function);
    }

    /// Collect callees and body-level type usage.
    fn scan_body(&self, parsed: &ParsedFile, body: Node, function: &mut FunctionRecord) {
        let mut nodes = Vec::new();
        collect_kind(
            body,
            &["call_expression", "composite_literal", "type_assertion_expression"],
            &mut nodes,
        );

        for node in nodes {
            match node.kind() {
                "call_expression" => {
                    let callee = node.child_by_field_name("function").and_then(|f| match f.kind() {
                        "identifier" => Some(parsed.node_text(f)),
                        "selector_expression" => {
                            f.child_by_field_name("field").map(|n| parsed.node_text(n))
                        }
                        _ => None,
                    });
                    if let Some(callee) = callee {
                        push_unique(&mut function.calls, callee);
                    }
                }
                _ => {
                    if let Some(type_node) = node.child_by_field_name("type") {
                        for name in type_names(parsed, type_node) {
                            push_unique(&mut function.uses_types, name);
                        }
                    }
                }
            }
        }
    }

    /// Count cross-package type uses in the signature and selector calls on
    /// local package aliases in the body.
    fn record_coupling(
        &self,
        parsed: &ParsedFile,
        signature_types: &[Node],
        body: Option<Node>,
        record: &FileRecord,
        model: &mut SymbolModel,
        aliases: &HashMap<String, String>,
    ) {
        if aliases.is_empty() {
            return;
        }
        let from = record.package_dir.as_str();

        for type_node in signature_types {
            let mut qualified = Vec::new();
            collect_kind(*type_node, &["qualified_type"], &mut qualified);
            let mut packages: Vec<&str> = Vec::new();
            for q in qualified {
                let Some(pkg) = q.child_by_field_name("package") else {
                    continue;
                };
                if let Some(to) = aliases.get(parsed.node_text(pkg)) {
                    if !packages.contains(&to.as_str()) {
                        packages.push(to);
                    }
                }
            }
            for to in packages {
                model.add_package_dependency(from, to);
                model.add_package_edge_stat(from, to, EdgeStat::type_use());
            }
        }

        let Some(body) = body else {
            return;
        };
        let mut calls = Vec::new();
        collect_kind(body, &["call_expression"], &mut calls);
        for call in calls {
            let operand = call
                .child_by_field_name("function")
                .filter(|f| f.kind() == "selector_expression")
                .and_then(|f| f.child_by_field_name("operand"))
                .filter(|o| o.kind() == "identifier");
            if let Some(to) = operand.and_then(|o| aliases.get(parsed.node_text(o))) {
                model.add_package_dependency(from, to);
                model.add_package_edge_stat(from, to, EdgeStat::call());
            }
        }
    }

    fn extract_package_vars(&self, parsed: &ParsedFile, decl: Node, record: &mut FileRecord) {
        let mut specs = Vec::new();
        collect_kind(decl, &["var_spec", "const_spec"], &mut specs);
        for spec in specs {
            for name in spec.children_by_field_name("name", &mut spec.walk()) {
                let name = parsed.node_text(name);
                if is_exported(name) {
                    push_unique(&mut record.vars, name);
                }
            }
        }
    }

    fn extract_routes(
        &self,
        parsed: &ParsedFile,
        root: Node,
        record: &mut FileRecord,
    ) -> anyhow::Result<()> {
        let query = Query::new(&self.language, ROUTE_QUERY)?;
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, root, &parsed.source[..]);

        while let Some(m) = matches.next() {
            let mut method = "";
            let mut args = None;
            for capture in m.captures {
                match query.capture_names()[capture.index as usize] {
                    "method" => method = parsed.node_text(capture.node),
                    "args" => args = Some(capture.node),
                    _ => {}
                }
            }
            let Some(args) = args else {
                continue;
            };
            if let Some(route) = route_from_call(parsed, method, args) {
                push_unique(&mut record.routes, route);
            }
        }
        Ok(())
    }
}

impl Default for GoExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for GoExtractor {
    fn language_id(&self) -> &'static str {
        "go"
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        &["go"]
    }

    fn parse(&self, path: &Path, source: &[u8]) -> anyhow::Result<ParsedFile> {
        let mut parser = self.create_parser()?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| anyhow::anyhow!("failed to parse Go source: {}", path.display()))?;

        if tree.root_node().has_error() {
            anyhow::bail!("Go source contains syntax errors: {}", path.display());
        }

        Ok(ParsedFile {
            tree: Some(tree),
            source: source.to_vec(),
            path: path.to_string_lossy().to_string(),
        })
    }

    fn extract(
        &self,
        parsed: &ParsedFile,
        record: &mut FileRecord,
        model: &mut SymbolModel,
        _options: &ExtractOptions,
    ) -> anyhow::Result<()> {
        let tree = parsed
            .tree
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("missing syntax tree for {}", parsed.path))?;
        let root = tree.root_node();

        record.package_name = self.extract_package(parsed, root);
        let aliases = self.extract_imports(parsed, root, record, model);

        for decl in named_children(root) {
            match decl.kind() {
                "type_declaration" => self.extract_type_declaration(parsed, decl, record, model),
                "function_declaration" | "method_declaration" => {
                    self.extract_function(parsed, decl, record, model, &aliases)
                }
                "var_declaration" | "const_declaration" => {
                    self.extract_package_vars(parsed, decl, record)
                }
                _ => {}
            }
        }

        if let Err(e) = self.extract_routes(parsed, root, record) {
            warn!(path = %record.path, error = %e, "route extraction failed");
        }
        Ok(())
    }
}

#[derive(Default)]
struct TypeShape {
    fields: Vec<String>,
    methods: Vec<String>,
    embedded: Vec<String>,
    contract_keys: Vec<String>,
}

fn named_children(node: Node) -> Vec<Node> {
    node.named_children(&mut node.walk()).collect()
}

/// Depth-first collection of descendants whose kind is in `kinds`.
///
/// Matching nodes are still descended into, so nested calls are found.
fn collect_kind<'t>(node: Node<'t>, kinds: &[&str], out: &mut Vec<Node<'t>>) {
    for child in node.named_children(&mut node.walk()) {
        if kinds.contains(&child.kind()) {
            out.push(child);
        }
        collect_kind(child, kinds, out);
    }
}

fn parameter_declarations(list: Node) -> Vec<Node> {
    named_children(list)
        .into_iter()
        .filter(|n| {
            matches!(
                n.kind(),
                "parameter_declaration" | "variadic_parameter_declaration"
            )
        })
        .collect()
}

/// Receiver base type: `(s *Server)` and `(s Server[T])` both give `Server`.
fn receiver_type(parsed: &ParsedFile, receiver: Node) -> Option<String> {
    let param = parameter_declarations(receiver).into_iter().next()?;
    let mut node = param.child_by_field_name("type")?;
    loop {
        match node.kind() {
            "pointer_type" | "parenthesized_type" => {
                node = node.named_child(0)?;
            }
            "generic_type" => {
                node = node.child_by_field_name("type")?;
            }
            "type_identifier" => return Some(parsed.node_text(node).to_string()),
            _ => return None,
        }
    }
}

/// Named, non-builtin types referenced by a type expression.
///
/// Qualified types contribute only their type name.
fn type_names(parsed: &ParsedFile, node: Node) -> Vec<String> {
    let mut names = Vec::new();
    walk_type_names(parsed, node, &mut names);
    names
}

fn walk_type_names(parsed: &ParsedFile, node: Node, out: &mut Vec<String>) {
    match node.kind() {
        "type_identifier" => {
            let name = parsed.node_text(node);
            if !BUILTIN_TYPES.contains(&name) {
                push_unique(out, name);
            }
        }
        "qualified_type" => {
            if let Some(name) = node.child_by_field_name("name") {
                push_unique(out, parsed.node_text(name));
            }
        }
        _ => {
            for child in named_children(node) {
                walk_type_names(parsed, child, out);
            }
        }
    }
}

fn render_type(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip one pair of surrounding `"` or `` ` `` quotes.
fn unquote(text: &str) -> &str {
    for quote in ['"', '`'] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return &text[1..text.len() - 1];
        }
    }
    text
}

/// Contract keys for one field, e.g. `json:id` from `json:"id,omitempty"`.
fn contract_keys(field_name: &str, tag: &str) -> Vec<String> {
    let mut keys = Vec::new();
    for key in CONTRACT_TAG_KEYS {
        let Some(raw) = lookup_tag(tag, key) else {
            continue;
        };
        if raw.is_empty() {
            continue;
        }
        let name = raw.split(',').next().unwrap_or("").trim();
        if name == "-" {
            continue;
        }
        let name = if name.is_empty() { field_name } else { name };
        let entry = format!("{}:{}", key, name);
        if !keys.contains(&entry) {
            keys.push(entry);
        }
    }
    keys
}

/// Look up `key` in a conventional `key:"value" key2:"value2"` struct tag.
fn lookup_tag(tag: &str, key: &str) -> Option<String> {
    let mut rest = tag;
    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            return None;
        }

        let colon = rest.find(':')?;
        let name = &rest[..colon];
        if name.is_empty() || name.contains(|c: char| c.is_whitespace() || c == '"') {
            return None;
        }
        rest = &rest[colon + 1..];
        if !rest.starts_with('"') {
            return None;
        }

        let mut value = String::new();
        let mut escaped = false;
        let mut end = None;
        for (i, c) in rest.char_indices().skip(1) {
            if escaped {
                value.push(c);
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                end = Some(i);
                break;
            } else {
                value.push(c);
            }
        }
        let end = end?;
        if name == key {
            return Some(value);
        }
        rest = &rest[end + 1..];
    }
}

fn route_from_call(parsed: &ParsedFile, method: &str, args: Node) -> Option<String> {
    if !ROUTE_METHODS.contains(&method) {
        return None;
    }
    let args: Vec<Node> = named_children(args)
        .into_iter()
        .filter(|n| n.kind() != "comment")
        .collect();
    // `header.Get("X")` has a single argument and is not a route.
    if args.len() < 2 {
        return None;
    }
    let first = args[0];
    if !matches!(
        first.kind(),
        "interpreted_string_literal" | "raw_string_literal"
    ) {
        return None;
    }
    let path = unquote(parsed.node_text(first));
    if path.is_empty() {
        return None;
    }
    Some(format!("{} {}", method.to_uppercase(), path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::modules::GoModule;
    use crate::outline::Language as SourceLanguage;

    fn extract(path: &str, source: &str, model: &mut SymbolModel) -> FileRecord {
        let extractor = GoExtractor::new();
        let parsed = extractor.parse(Path::new(path), source.as_bytes()).unwrap();
        let mut record = FileRecord::new(path, PathBuf::from(path), SourceLanguage::Go);
        extractor
            .extract(&parsed, &mut record, model, &ExtractOptions::default())
            .unwrap();
        record
    }

    fn model_with_module(module_path: &str) -> SymbolModel {
        let mut model = SymbolModel::new("/repo");
        model.set_modules(vec![GoModule::new("/repo", ".", module_path)]);
        model
    }

    #[test]
    fn test_package_and_functions() {
        let source = r#"
package store

func Open(path string, opts ...Option) (*DB, error) {
    return newDB(path), nil
}

func newDB(path string) *DB {
    return &DB{path: path}
}
"#;
        let mut model = SymbolModel::new("/repo");
        let record = extract("store/db.go", source, &mut model);

        assert_eq!(record.package_name.as_deref(), Some("store"));
        assert_eq!(record.functions.len(), 2);

        let open = record.find_function("Open").unwrap();
        assert!(open.is_public);
        assert_eq!(open.params, vec!["path string", "opts ...Option"]);
        assert_eq!(open.return_type, "*DB, error");
        assert_eq!(open.calls, vec!["newDB"]);
        assert_eq!(open.uses_types, vec!["Option", "DB"]);
        assert_eq!(open.line, 4);

        let new_db = record.find_function("newDB").unwrap();
        assert!(!new_db.is_public);
        assert_eq!(record.exported_funcs, vec!["Open"]);
        assert_eq!(model.public_apis().get("store/db.go").unwrap(), &vec!["Open".to_string()]);
        assert_eq!(model.calls_from("store/db.go:Open"), &["newDB".to_string()]);
        assert_eq!(
            model.type_record("DB").unwrap().used_by,
            vec!["store/db.go:Open", "store/db.go:newDB"]
        );
    }

    #[test]
    fn test_methods_are_receiver_qualified() {
        let source = r#"
package main

type Server struct {
    Addr string
}

func (s *Server) Start() error {
    return nil
}

func (s Server) String() string {
    return s.Addr
}
"#;
        let mut model = SymbolModel::new("/repo");
        let record = extract("main.go", source, &mut model);

        let names: Vec<_> = record.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["(Server) Start", "(Server) String"]);
        assert!(record.exported_funcs.is_empty());

        let server = model.type_record("Server").unwrap();
        assert_eq!(server.methods, vec!["Start", "String"]);
        assert_eq!(server.fields, vec!["Addr"]);
        assert_eq!(server.declared_in.as_deref(), Some("main.go"));
        assert_eq!(
            model.public_apis().get("main.go").unwrap(),
            &vec!["type:Server".to_string()]
        );
    }

    #[test]
    fn test_struct_tags_and_embedded_types() {
        let source = r#"
package api

type Request struct {
    Base
    *Meta
    ID     string `json:"id,omitempty" query:"id"`
    Name   string `json:",omitempty"`
    Secret string `json:"-"`
    Page   int    `form:"page" db:"page_no"`
}

type Store interface {
    io.Closer
    Get(id string) (*Request, error)
}
"#;
        let mut model = SymbolModel::new("/repo");
        let record = extract("api/types.go", source, &mut model);

        assert_eq!(record.types, vec!["Request", "Store"]);
        let request = model.type_record("Request").unwrap();
        assert_eq!(request.fields, vec!["ID", "Name", "Secret", "Page"]);
        assert_eq!(request.embedded, vec!["Base", "Meta"]);
        assert_eq!(
            request.contract_keys,
            vec!["json:id", "query:id", "json:Name", "form:page"]
        );

        let store = model.type_record("Store").unwrap();
        assert_eq!(store.methods, vec!["Get"]);
        assert_eq!(store.embedded, vec!["Closer"]);
    }

    #[test]
    fn test_queries_compile() {
        let extractor = GoExtractor::new();
        assert!(Query::new(&extractor.language, PACKAGE_QUERY).is_ok());
        assert!(Query::new(&extractor.language, ROUTE_QUERY).is_ok());
    }

    #[test]
    fn test_routes() {
        let source = r#"
package web

func Routes(r Router) {
    r.Get("/users", listUsers)
    r.Post(`/users`, createUser)
    r.Get("/users", listUsers)
    r.Route("/admin", func(r Router) {})
    value := header.Get("X-Request-ID")
    r.Get(path, handler)
    _ = value
}
"#;
        let mut model = SymbolModel::new("/repo");
        let record = extract("web/routes.go", source, &mut model);
        assert_eq!(record.routes, vec!["GET /users", "POST /users", "ROUTE /admin"]);
    }

    #[test]
    fn test_local_imports_and_coupling() {
        let source = r#"
package cmd

import (
    "fmt"
    st "example.com/app/internal/store"
    "example.com/app/internal/api"
)

func Run(db *st.DB, req api.Request) error {
    st.Migrate(db)
    st.Seed(db)
    fmt.Println("ok")
    return nil
}
"#;
        let mut model = model_with_module("example.com/app");
        let record = extract("cmd/run.go", source, &mut model);

        assert_eq!(
            record.imports,
            vec!["fmt", "example.com/app/internal/store", "example.com/app/internal/api"]
        );
        assert_eq!(record.local_pkg_deps, vec!["internal/store", "internal/api"]);
        assert_eq!(
            model.package_dependencies("cmd"),
            &["internal/store".to_string(), "internal/api".to_string()]
        );
        assert_eq!(
            model.edge_stat("cmd", "internal/store"),
            Some(EdgeStat {
                imports: 1,
                calls: 2,
                type_uses: 1
            })
        );
        assert_eq!(
            model.edge_stat("cmd", "internal/api"),
            Some(EdgeStat {
                imports: 1,
                calls: 0,
                type_uses: 1
            })
        );
    }

    #[test]
    fn test_exported_package_vars() {
        let source = r#"
package config

var (
    DefaultTimeout = 30
    internalCache  = map[string]string{}
)

const Version = "1.0"
"#;
        let mut model = SymbolModel::new("/repo");
        let record = extract("config/vars.go", source, &mut model);
        assert_eq!(record.vars, vec!["DefaultTimeout", "Version"]);
    }

    #[test]
    fn test_syntax_error_is_rejected() {
        let extractor = GoExtractor::new();
        let result = extractor.parse(Path::new("bad.go"), b"package main\nfunc {{{\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_lookup_tag() {
        let tag = r#"json:"id,omitempty" xml:"item" note:"a \"quoted\" value""#;
        assert_eq!(lookup_tag(tag, "json").as_deref(), Some("id,omitempty"));
        assert_eq!(lookup_tag(tag, "xml").as_deref(), Some("item"));
        assert_eq!(lookup_tag(tag, "note").as_deref(), Some(r#"a "quoted" value"#));
        assert_eq!(lookup_tag(tag, "yaml"), None);
    }
}
