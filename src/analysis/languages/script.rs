//! JavaScript and TypeScript extractor.
//!
//! Line-oriented pattern matching with brace-depth tracking. Interface,
//! class and enum bodies are scoped by depth so only their direct members
//! are recorded. This is a best-effort outline, not a parser: braces inside
//! strings or template literals can confuse the scoping.

use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;

use crate::analysis::{ExtractOptions, Extractor, ParsedFile};
use crate::outline::{push_unique, FileRecord, FunctionRecord, SymbolModel};

lazy_static! {
    static ref IMPORT_FROM: Regex =
        Regex::new(r#"^\s*import\s+(?:type\s+)?[\w*{}\s,$]+?\s+from\s+['"]([^'"]+)['"]"#).unwrap();
    static ref IMPORT_BARE: Regex = Regex::new(r#"^\s*import\s+['"]([^'"]+)['"]"#).unwrap();
    static ref IMPORT_OPEN: Regex =
        Regex::new(r#"^\s*import\s+(?:type\s+)?(?:[\w$]+\s*,\s*)?\{[^}'"]*$"#).unwrap();
    static ref REEXPORT_OPEN: Regex =
        Regex::new(r#"^\s*export\s+(?:type\s+)?\{[^}'"]*$"#).unwrap();
    static ref FROM_CLAUSE: Regex = Regex::new(r#"\bfrom\s+['"]([^'"]+)['"]"#).unwrap();
    static ref REEXPORT: Regex =
        Regex::new(r#"^\s*export\s+(?:type\s+)?(?:\*|\{[^}]*\})(?:\s+as\s+\w+)?\s+from\s+['"]([^'"]+)['"]"#)
            .unwrap();
    static ref REQUIRE: Regex = Regex::new(r#"\brequire\(\s*['"]([^'"]+)['"]\s*\)"#).unwrap();

    static ref EXPORT_DECL: Regex = Regex::new(
        r"^\s*export\s+(?:default\s+)?(?:declare\s+)?(?:async\s+)?(?:abstract\s+)?(?:const|let|var|function\*?|class|interface|type|enum)\s+(\w+)"
    )
    .unwrap();
    static ref EXPORT_LIST: Regex = Regex::new(r"^\s*export\s+(?:type\s+)?\{([^}]*)\}").unwrap();
    static ref EXPORT_DEFAULT_NAME: Regex = Regex::new(r"^\s*export\s+default\s+(\w+)\s*;?\s*$").unwrap();

    static ref INTERFACE: Regex = Regex::new(
        r"^\s*(?:export\s+)?(?:default\s+)?(?:declare\s+)?interface\s+(\w+)(?:<[^>]*>)?(?:\s+extends\s+([\w.,\s<>]+?))?\s*\{"
    )
    .unwrap();
    static ref CLASS: Regex = Regex::new(
        r"^\s*(?:export\s+)?(?:default\s+)?(?:declare\s+)?(?:abstract\s+)?class\s+(\w+)(?:<[^>]*>)?(?:\s+extends\s+([\w.]+)(?:<[^>]*>)?)?(?:\s+implements\s+([\w.,\s]+?))?\s*\{"
    )
    .unwrap();
    static ref ENUM: Regex =
        Regex::new(r"^\s*(?:export\s+)?(?:declare\s+)?(?:const\s+)?enum\s+(\w+)\s*\{").unwrap();
    static ref TYPE_ALIAS: Regex =
        Regex::new(r"^\s*(?:export\s+)?(?:declare\s+)?type\s+(\w+)(?:<[^>]*>)?\s*=\s*(.*)$").unwrap();

    static ref FUNCTION: Regex = Regex::new(
        r"^\s*(?:export\s+)?(?:default\s+)?(?:async\s+)?function\s*\*?\s*(\w+)\s*(?:<[^>]*>)?\s*\(([^)]*)\)(?:\s*:\s*([^{;]+))?"
    )
    .unwrap();
    static ref ARROW: Regex = Regex::new(
        r"^\s*(?:export\s+)?(?:const|let|var)\s+(\w+)(?:\s*:\s*[^=]+)?\s*=\s*(?:async\s+)?(?:<[^>]*>\s*)?\(([^)]*)\)(?:\s*:\s*([^=]+?))?\s*=>"
    )
    .unwrap();
    static ref SIMPLE_ARROW: Regex =
        Regex::new(r"^\s*(?:export\s+)?(?:const|let|var)\s+(\w+)\s*=\s*(?:async\s+)?(\w+)\s*=>").unwrap();

    static ref METHOD: Regex = Regex::new(
        r"^\s*(?:(?:public|private|protected|static|readonly|async|override|abstract|get|set)\s+)*#?(\w+)\s*[?!]?\s*(?:<[^>]*>)?\s*\(([^)]*)\)(?:\s*:\s*([^{;]+))?"
    )
    .unwrap();
    static ref INTERFACE_PROP: Regex =
        Regex::new(r"^\s*(?:readonly\s+)?(\w+)(\?)?\s*:\s*(.+?)[;,]?\s*$").unwrap();
    static ref CLASS_FIELD: Regex = Regex::new(
        r"^\s*(?:(?:public|private|protected|static|readonly|declare|override)\s+)*#?(\w+)[?!]?\s*(?::\s*([^=;]+?))?\s*(?:=|;)"
    )
    .unwrap();
    static ref ENUM_MEMBER: Regex = Regex::new(r"^\s*(\w+)\s*(?:=[^,]*)?,?\s*$").unwrap();

    static ref CONST: Regex = Regex::new(r"^\s*(?:export\s+)?const\s+(\w+)(?:\s*:\s*[^=]+)?\s*=").unwrap();
    static ref COMPONENT: Regex = Regex::new(
        r"^\s*(?:export\s+)?(?:const|let|var)\s+(\w+)\s*[:=]\s*(?:React\.)?(?:FC|FunctionComponent|Component)\b"
    )
    .unwrap();
    static ref HOOK: Regex = Regex::new(r"\b(use[A-Z]\w*)\s*\(").unwrap();
    static ref JSX_TAG: Regex = Regex::new(r"(?:^|[^\w.])<([A-Z][\w.]*)").unwrap();
}

/// Names too generic to be worth listing as variables.
const THROWAWAY_NAMES: &[&str] = &[
    "i", "j", "k", "x", "y", "z", "a", "b", "c", "d", "e", "f", "n", "m", "o", "p", "q", "r",
    "s", "t", "u", "v", "w", "idx", "len", "tmp", "temp", "val", "res", "ret", "err", "ctx",
    "req", "resp", "data", "item", "elem", "node", "key", "value", "index", "count", "size",
    "str", "num", "obj", "arr", "fn", "cb", "callback", "handler", "listener",
];

/// Words that look like method calls at member depth but are statements.
const CONTROL_KEYWORDS: &[&str] = &[
    "if", "for", "while", "switch", "catch", "return", "function", "with", "do", "else", "new",
    "typeof", "await", "super",
];

/// JavaScript / TypeScript extractor.
pub struct ScriptExtractor;

impl ScriptExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ScriptExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for ScriptExtractor {
    fn language_id(&self) -> &'static str {
        "script"
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        &["js", "jsx", "mjs", "cjs", "ts", "tsx", "mts", "cts"]
    }

    fn parse(&self, path: &Path, source: &[u8]) -> anyhow::Result<ParsedFile> {
        Ok(ParsedFile::text_only(path, source))
    }

    fn extract(
        &self,
        parsed: &ParsedFile,
        record: &mut FileRecord,
        model: &mut SymbolModel,
        options: &ExtractOptions,
    ) -> anyhow::Result<()> {
        let jsx = record.path.ends_with(".jsx") || record.path.ends_with(".tsx");
        extract_script(parsed.source_str(), 0, jsx, record, model, options);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Interface,
    Class,
    Enum,
}

struct Block {
    kind: BlockKind,
    name: String,
    /// Brace depth outside the block.
    depth: i32,
}

/// Extract script declarations from `source` into `record` and `model`.
///
/// `line_offset` is added to reported line numbers, for sources embedded in
/// another file (Astro frontmatter).
pub(crate) fn extract_script(
    source: &str,
    line_offset: usize,
    jsx: bool,
    record: &mut FileRecord,
    model: &mut SymbolModel,
    options: &ExtractOptions,
) {
    let mut depth: i32 = 0;
    let mut block: Option<Block> = None;
    let mut in_comment = false;
    let mut in_import = false;
    let mut exports: Vec<String> = Vec::new();

    for (idx, line) in source.lines().enumerate() {
        let line_no = line_offset + idx + 1;
        let trimmed = line.trim();

        if in_comment {
            if trimmed.contains("*/") {
                in_comment = false;
            }
            continue;
        }
        if trimmed.starts_with("/*") {
            in_comment = !trimmed.contains("*/");
            continue;
        }
        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }

        let depth_before = depth;
        depth += brace_delta(line);

        // Imports, including `import {\n a,\n b\n} from "./x"`. A local
        // `export {\n a\n};` list closes without a source.
        if in_import {
            if let Some(c) = FROM_CLAUSE.captures(line) {
                push_unique(&mut record.imports, &c[1]);
                in_import = false;
            } else if line.contains('}') {
                in_import = false;
            }
            continue;
        }
        if let Some(c) = IMPORT_FROM.captures(line).or_else(|| IMPORT_BARE.captures(line)) {
            push_unique(&mut record.imports, &c[1]);
            continue;
        }
        if IMPORT_OPEN.is_match(line) || REEXPORT_OPEN.is_match(line) {
            in_import = true;
            continue;
        }
        if let Some(c) = REEXPORT.captures(line) {
            push_unique(&mut record.imports, &c[1]);
        }
        for c in REQUIRE.captures_iter(line) {
            push_unique(&mut record.imports, &c[1]);
        }

        // Members of the enclosing interface, class or enum.
        let mut opened_here = false;
        if let Some(current) = &block {
            if depth_before == current.depth + 1 {
                record_member(current, trimmed, model);
            }
        } else if depth_before == 0 {
            opened_here = open_block(line, line_no, depth_before, &mut block, record, model);
        }

        if let Some(c) = TYPE_ALIAS.captures(line) {
            if depth_before == 0 {
                let name = c[1].to_string();
                let value = c[2].trim().trim_end_matches(';').trim().to_string();
                push_unique(&mut record.types, name.as_str());
                let exported = trimmed.starts_with("export");
                let info = declare_type(model, record, &name, line_no, exported);
                if !value.is_empty() {
                    push_unique(&mut info.fields, format!("= {}", value));
                }
            }
        }

        if block.is_none() || opened_here {
            extract_functions(line, line_no, depth_before, record);
        }

        if depth_before == 0 && block.is_none() {
            if let Some(c) = CONST.captures(line) {
                let name = &c[1];
                if is_meaningful_constant(name, &options.variable_keywords) {
                    push_unique(&mut record.vars, name);
                }
            }
        }

        if let Some(c) = COMPONENT.captures(line) {
            push_unique(&mut record.framework.components, &c[1]);
        }
        for c in HOOK.captures_iter(line) {
            push_unique(&mut record.framework.hooks, &c[1]);
        }
        if jsx {
            for c in JSX_TAG.captures_iter(line) {
                push_unique(&mut record.framework.used_components, &c[1]);
            }
        }

        if let Some(c) = EXPORT_DECL.captures(line) {
            push_unique(&mut exports, &c[1]);
        } else if let Some(c) = EXPORT_LIST.captures(line) {
            for item in c[1].split(',') {
                // `a as b` exports `b`.
                if let Some(name) = item.split_whitespace().last() {
                    if name != "type" && !name.is_empty() {
                        push_unique(&mut exports, name);
                    }
                }
            }
        } else if let Some(c) = EXPORT_DEFAULT_NAME.captures(line) {
            push_unique(&mut exports, &c[1]);
        }

        if let Some(current) = &block {
            if depth <= current.depth {
                block = None;
            }
        }
    }

    apply_exports(&exports, record, model);
}

/// Net `{` minus `}` on a line, ignoring line comments.
fn brace_delta(line: &str) -> i32 {
    let code = match line.find("//") {
        Some(idx) if !line[..idx].ends_with(':') => &line[..idx],
        _ => line,
    };
    code.chars().fold(0, |acc, c| match c {
        '{' => acc + 1,
        '}' => acc - 1,
        _ => acc,
    })
}

/// Start an interface, class or enum block. Returns true when one opened.
fn open_block(
    line: &str,
    line_no: usize,
    depth_before: i32,
    block: &mut Option<Block>,
    record: &mut FileRecord,
    model: &mut SymbolModel,
) -> bool {
    let exported = line.trim_start().starts_with("export");

    let (kind, name, bases) = if let Some(c) = INTERFACE.captures(line) {
        let bases = c.get(2).map(|m| split_names(m.as_str())).unwrap_or_default();
        (BlockKind::Interface, c[1].to_string(), bases)
    } else if let Some(c) = CLASS.captures(line) {
        let mut bases: Vec<String> = c
            .get(2)
            .map(|m| vec![m.as_str().to_string()])
            .unwrap_or_default();
        let implements = c.get(3).map(|m| split_names(m.as_str())).unwrap_or_default();
        let info = model.ensure_type(&c[1]);
        for name in &implements {
            push_unique(&mut info.implements, name.as_str());
        }
        bases.retain(|b| !b.is_empty());
        (BlockKind::Class, c[1].to_string(), bases)
    } else if let Some(c) = ENUM.captures(line) {
        (BlockKind::Enum, c[1].to_string(), Vec::new())
    } else {
        return false;
    };

    push_unique(&mut record.types, name.as_str());
    let info = declare_type(model, record, &name, line_no, exported);
    for base in bases {
        push_unique(&mut info.embedded, base);
    }

    *block = Some(Block {
        kind,
        name,
        depth: depth_before,
    });
    true
}

fn declare_type<'m>(
    model: &'m mut SymbolModel,
    record: &FileRecord,
    name: &str,
    line_no: usize,
    exported: bool,
) -> &'m mut crate::outline::TypeRecord {
    let info = model.ensure_type(name);
    info.name = name.to_string();
    info.is_public = info.is_public || exported;
    if info.declared_in.is_none() {
        info.declared_in = Some(record.path.clone());
        info.line = line_no;
    }
    info
}

fn record_member(block: &Block, trimmed: &str, model: &mut SymbolModel) {
    match block.kind {
        BlockKind::Interface => {
            if let Some(c) = METHOD.captures(trimmed) {
                if !CONTROL_KEYWORDS.contains(&&c[1]) {
                    let sig = member_signature(&c[1], &c[2], c.get(3).map(|m| m.as_str()));
                    push_unique(&mut model.ensure_type(&block.name).methods, sig);
                    return;
                }
            }
            if let Some(c) = INTERFACE_PROP.captures(trimmed) {
                let optional = c.get(2).map(|m| m.as_str()).unwrap_or("");
                let field = format!("{}{}: {}", &c[1], optional, c[3].trim());
                push_unique(&mut model.ensure_type(&block.name).fields, field);
            }
        }
        BlockKind::Class => {
            if let Some(c) = METHOD.captures(trimmed) {
                if !CONTROL_KEYWORDS.contains(&&c[1]) {
                    let sig = member_signature(&c[1], &c[2], c.get(3).map(|m| m.as_str()));
                    push_unique(&mut model.ensure_type(&block.name).methods, sig);
                    return;
                }
            }
            if let Some(c) = CLASS_FIELD.captures(trimmed) {
                if !CONTROL_KEYWORDS.contains(&&c[1]) {
                    let field = match c.get(2) {
                        Some(t) => format!("{}: {}", &c[1], t.as_str().trim()),
                        None => c[1].to_string(),
                    };
                    push_unique(&mut model.ensure_type(&block.name).fields, field);
                }
            }
        }
        BlockKind::Enum => {
            for part in trimmed.split(',') {
                if let Some(c) = ENUM_MEMBER.captures(part) {
                    push_unique(&mut model.ensure_type(&block.name).fields, &c[1]);
                }
            }
        }
    }
}

fn member_signature(name: &str, params: &str, ret: Option<&str>) -> String {
    let params = split_params(params).join(", ");
    match ret.map(str::trim).filter(|r| !r.is_empty()) {
        Some(ret) => format!("{}({}) -> {}", name, params, ret),
        None => format!("{}({})", name, params),
    }
}

fn extract_functions(line: &str, line_no: usize, depth_before: i32, record: &mut FileRecord) {
    if depth_before != 0 {
        return;
    }
    let exported = line.trim_start().starts_with("export");

    let function = if let Some(c) = FUNCTION.captures(line) {
        Some((
            c[1].to_string(),
            split_params(&c[2]),
            c.get(3).map(|m| m.as_str().trim().to_string()),
        ))
    } else if let Some(c) = ARROW.captures(line) {
        Some((
            c[1].to_string(),
            split_params(&c[2]),
            c.get(3).map(|m| m.as_str().trim().to_string()),
        ))
    } else {
        SIMPLE_ARROW
            .captures(line)
            .map(|c| (c[1].to_string(), vec![c[2].to_string()], None))
    };

    if let Some((name, params, ret)) = function {
        let mut f = FunctionRecord::new(name, line_no);
        f.params = params;
        f.return_type = ret.unwrap_or_default();
        f.is_public = exported;
        record.functions.push(f);
    }
}

fn apply_exports(exports: &[String], record: &mut FileRecord, model: &mut SymbolModel) {
    for name in exports {
        if let Some(f) = record.functions.iter_mut().find(|f| &f.name == name) {
            f.is_public = true;
            push_unique(&mut record.exported_funcs, name.as_str());
            model.add_public_api(&record.path, name);
        } else if record.types.iter().any(|t| t == name) {
            model.ensure_type(name).is_public = true;
            push_unique(&mut record.exported_types, name.as_str());
            model.add_public_api(&record.path, &format!("type:{}", name));
        } else {
            model.add_public_api(&record.path, name);
        }
    }
}

/// Split a parameter list on top-level commas.
///
/// Commas nested in generics, object types or default values do not split.
pub(crate) fn split_params(params: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut nesting = 0i32;

    for c in params.chars() {
        match c {
            '<' | '{' | '[' | '(' => nesting += 1,
            '>' | '}' | ']' | ')' => nesting -= 1,
            _ => {}
        }
        if c == ',' && nesting <= 0 {
            let param = current.trim();
            if !param.is_empty() {
                out.push(param.to_string());
            }
            current.clear();
        } else {
            current.push(c);
        }
    }
    let param = current.trim();
    if !param.is_empty() {
        out.push(param.to_string());
    }
    out
}

fn split_names(list: &str) -> Vec<String> {
    split_params(list)
        .into_iter()
        .map(|n| n.split('<').next().unwrap_or("").trim().to_string())
        .filter(|n| !n.is_empty())
        .collect()
}

/// Whether a top-level constant is worth listing.
///
/// Throwaway names are dropped; the rest must be ALL_CAPS or contain one of
/// `keywords`.
pub(crate) fn is_meaningful_constant(name: &str, keywords: &[String]) -> bool {
    let lower = name.to_lowercase();
    if name.len() <= 1 || THROWAWAY_NAMES.contains(&lower.as_str()) {
        return false;
    }
    let all_caps = name.to_uppercase() == name && lower != name;
    all_caps || keywords.iter().any(|k| lower.contains(k.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::outline::Language;

    fn extract(path: &str, source: &str, model: &mut SymbolModel) -> FileRecord {
        let extractor = ScriptExtractor::new();
        let parsed = extractor.parse(Path::new(path), source.as_bytes()).unwrap();
        let mut record = FileRecord::new(path, PathBuf::from(path), Language::TypeScript);
        extractor
            .extract(&parsed, &mut record, model, &ExtractOptions::default())
            .unwrap();
        record
    }

    #[test]
    fn test_imports() {
        let source = r#"
import React, { useState } from 'react';
import type { User } from "~/types/user";
import './styles.css';
import {
  formatDate,
  formatTime,
} from '../lib/format';
export { helper } from './helper';
const legacy = require('./legacy');
"#;
        let mut model = SymbolModel::new(".");
        let record = extract("src/app/Main.ts", source, &mut model);
        assert_eq!(
            record.imports,
            vec![
                "react",
                "~/types/user",
                "./styles.css",
                "../lib/format",
                "./helper",
                "./legacy"
            ]
        );
    }

    #[test]
    fn test_multiline_default_import_and_reexport() {
        let source = r#"
import React, {
  useEffect,
  useState,
} from 'react';
export {
  formatDate,
  formatTime,
} from './format';
export {
  local,
};
import { api } from './api';
"#;
        let mut model = SymbolModel::new(".");
        let record = extract("src/app/Main.tsx", source, &mut model);
        assert_eq!(record.imports, vec!["react", "./format", "./api"]);
    }

    #[test]
    fn test_functions_and_exports() {
        let source = r#"
export async function loadUser(id: string, opts: Record<string, number>): Promise<User> {
  return fetchUser(id);
}

export const formatName = (user: User): string => {
  return user.name;
};

const double = x => x * 2;

function internal() {}

export default internal;
"#;
        let mut model = SymbolModel::new(".");
        let record = extract("src/users.ts", source, &mut model);

        let names: Vec<_> = record.functions.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["loadUser", "formatName", "double", "internal"]);

        let load = record.find_function("loadUser").unwrap();
        assert_eq!(load.params, vec!["id: string", "opts: Record<string, number>"]);
        assert_eq!(load.return_type, "Promise<User>");
        assert_eq!(load.line, 2);

        let format = record.find_function("formatName").unwrap();
        assert_eq!(format.return_type, "string");
        assert_eq!(record.find_function("double").unwrap().params, vec!["x"]);

        assert_eq!(record.exported_funcs, vec!["loadUser", "formatName", "internal"]);
        assert!(record.find_function("internal").unwrap().is_public);
        assert!(!record.find_function("double").unwrap().is_public);
    }

    #[test]
    fn test_interface_class_enum_and_alias() {
        let source = r#"
export interface User extends Entity {
  id: string;
  nickname?: string;
  greet(other: User): string;
  settings: {
    theme: string;
  };
}

export class UserService extends BaseService implements Disposable {
  private cache: Map<string, User> = new Map();
  constructor(private api: Api) {}
  async find(id: string): Promise<User> {
    if (this.cache.has(id)) {
      return this.cache.get(id);
    }
  }
}

enum Role {
  Admin = 'admin',
  Viewer,
}

export type UserId = string;
"#;
        let mut model = SymbolModel::new(".");
        let record = extract("src/user.ts", source, &mut model);

        assert_eq!(record.types, vec!["User", "UserService", "Role", "UserId"]);

        let user = model.type_record("User").unwrap();
        assert_eq!(user.fields, vec!["id: string", "nickname?: string", "settings: {"]);
        assert_eq!(user.methods, vec!["greet(other: User) -> string"]);
        assert_eq!(user.embedded, vec!["Entity"]);
        assert!(user.is_public);

        let service = model.type_record("UserService").unwrap();
        assert_eq!(
            service.methods,
            vec!["constructor(private api: Api)", "find(id: string) -> Promise<User>"]
        );
        assert_eq!(service.fields, vec!["cache: Map<string, User>"]);
        assert_eq!(service.embedded, vec!["BaseService"]);
        assert_eq!(service.implements, vec!["Disposable"]);

        let role = model.type_record("Role").unwrap();
        assert_eq!(role.fields, vec!["Admin", "Viewer"]);
        assert!(!role.is_public);

        assert_eq!(model.type_record("UserId").unwrap().fields, vec!["= string"]);
        assert_eq!(record.exported_types, vec!["User", "UserService", "UserId"]);
    }

    #[test]
    fn test_meaningful_constants() {
        let keywords = ExtractOptions::default().variable_keywords;
        assert!(is_meaningful_constant("API_URL", &keywords));
        assert!(is_meaningful_constant("defaultTheme", &keywords));
        assert!(is_meaningful_constant("appConfig", &keywords));
        assert!(!is_meaningful_constant("data", &keywords));
        assert!(!is_meaningful_constant("X", &keywords));
        assert!(!is_meaningful_constant("userName", &keywords));

        let source = "const MAX_RETRIES = 3;\nconst tmp = 1;\nconst routeOptions = {};\n\
                      function f() {\n  const INNER = 2;\n}\n";
        let mut model = SymbolModel::new(".");
        let record = extract("src/consts.ts", source, &mut model);
        assert_eq!(record.vars, vec!["MAX_RETRIES", "routeOptions"]);
    }

    #[test]
    fn test_framework_hints() {
        let source = r#"
import { useState } from 'react';

export const Button: FC<Props> = ({ label }) => {
  const [count, setCount] = useState(0);
  const user = useCurrentUser();
  const ref = useState<User>(null);
  return <Card><Icon name="x" /><span>{label}</span></Card>;
};
"#;
        let mut model = SymbolModel::new(".");
        let record = extract("src/Button.tsx", source, &mut model);
        assert_eq!(record.framework.components, vec!["Button"]);
        assert_eq!(record.framework.hooks, vec!["useState", "useCurrentUser"]);
        assert_eq!(record.framework.used_components, vec!["Card", "Icon"]);

        // No JSX scanning outside .jsx/.tsx.
        let record = extract("src/button.ts", source, &mut model);
        assert!(record.framework.used_components.is_empty());
    }

    #[test]
    fn test_split_params() {
        assert_eq!(
            split_params("a: Map<string, number>, { x, y }: Point, cb = () => {}"),
            vec!["a: Map<string, number>", "{ x, y }: Point", "cb = () => {}"]
        );
        assert!(split_params("  ").is_empty());
    }
}
