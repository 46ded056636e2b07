//! Markdown outline document.

use std::io::Write;

use super::{external_imports, mermaid, ReportOptions, ReportSummary};
use crate::outline::{FileRecord, FunctionRecord, ImpactRecord, SymbolModel};

/// Writes the outline document section by section.
pub struct MarkdownWriter<'a, W: Write> {
    writer: W,
    options: &'a ReportOptions,
}

/// Render the whole document into a string.
pub fn render_markdown(model: &SymbolModel, options: &ReportOptions) -> anyhow::Result<String> {
    let mut buf = Vec::new();
    MarkdownWriter::new(&mut buf, options).write_report(model)?;
    Ok(String::from_utf8(buf)?)
}

impl<'a, W: Write> MarkdownWriter<'a, W> {
    pub fn new(writer: W, options: &'a ReportOptions) -> Self {
        Self { writer, options }
    }

    pub fn write_report(&mut self, model: &SymbolModel) -> anyhow::Result<()> {
        let sections: Vec<fn(&mut Self, &SymbolModel) -> anyhow::Result<()>> = vec![
            |w, _| w.write_header(),
            |w, m| w.write_summary(m),
            |w, m| w.write_diagrams(m),
            |w, m| w.write_package_graph(m),
            |w, m| w.write_public_api(m),
            |w, m| w.write_impact(m),
            |w, m| w.write_files(m),
        ];
        sections.iter().try_for_each(|section| section(self, model))?;
        self.writer.flush()?;
        Ok(())
    }

    fn write_header(&mut self) -> anyhow::Result<()> {
        writeln!(self.writer, "# Code Structure Outline")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "This file provides an overview of available functions, types, and variables per file for LLM context."
        )?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_summary(&mut self, model: &SymbolModel) -> anyhow::Result<()> {
        let summary = ReportSummary::from_model(model);
        let rows = [
            ("Files", summary.files),
            ("Packages", summary.packages),
            ("Modules", summary.modules),
            ("Types", summary.types),
            ("Functions", summary.functions),
            ("File dependencies", summary.file_edges),
            ("Package dependencies", summary.package_edges),
            ("Test files", summary.test_files),
            ("High-risk files", summary.high_risk_files),
        ];

        writeln!(self.writer, "## Summary")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "| Metric | Count |")?;
        writeln!(self.writer, "|--------|-------|")?;
        for (label, count) in rows {
            writeln!(self.writer, "| {} | {} |", label, count)?;
        }
        if summary.parse_errors > 0 {
            writeln!(self.writer, "| Files with parse errors | {} |", summary.parse_errors)?;
        }
        writeln!(self.writer)?;

        if !model.modules().is_empty() {
            writeln!(self.writer, "Modules:")?;
            for module in model.modules() {
                writeln!(self.writer, "- `{}` ({})", module.module_path, module.dir_rel)?;
            }
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn write_diagrams(&mut self, model: &SymbolModel) -> anyhow::Result<()> {
        if !self.options.diagrams || model.file_count() == 0 {
            return Ok(());
        }

        let external = external_imports(model, &self.options.aliases);
        writeln!(self.writer, "## Architecture Overview")?;
        writeln!(self.writer)?;
        write!(self.writer, "{}", mermaid::architecture_overview(model, &external))?;
        writeln!(self.writer)?;

        if !model.file_graph().is_empty() {
            writeln!(self.writer, "## File Dependencies")?;
            writeln!(self.writer)?;
            write!(self.writer, "{}", mermaid::file_dependency_graph(model))?;
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn write_package_graph(&mut self, model: &SymbolModel) -> anyhow::Result<()> {
        let mut edges = model.package_edges();
        if edges.is_empty() {
            return Ok(());
        }
        // Strongest coupling first.
        edges.sort_by(|a, b| {
            b.2.weight()
                .cmp(&a.2.weight())
                .then_with(|| a.0.cmp(b.0))
                .then_with(|| a.1.cmp(b.1))
        });

        writeln!(self.writer, "## Package Graph")?;
        writeln!(self.writer)?;
        if self.options.diagrams {
            write!(self.writer, "{}", mermaid::package_graph(model))?;
            writeln!(self.writer)?;
        }
        writeln!(self.writer, "| From | To | Imports | Calls | Type uses |")?;
        writeln!(self.writer, "|------|----|---------|-------|-----------|")?;
        for (from, to, stat) in edges {
            writeln!(
                self.writer,
                "| `{}` | `{}` | {} | {} | {} |",
                from, to, stat.imports, stat.calls, stat.type_uses
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_public_api(&mut self, model: &SymbolModel) -> anyhow::Result<()> {
        let apis = model.public_apis();
        if apis.values().all(Vec::is_empty) {
            return Ok(());
        }

        writeln!(self.writer, "## Public API")?;
        writeln!(self.writer)?;
        for (path, entries) in apis {
            if entries.is_empty() {
                continue;
            }
            let mut entries: Vec<&str> = entries.iter().map(String::as_str).collect();
            entries.sort_unstable();
            let rendered: Vec<String> = entries.iter().map(|e| format!("`{}`", e)).collect();
            writeln!(self.writer, "- `{}`: {}", path, rendered.join(", "))?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_impact(&mut self, model: &SymbolModel) -> anyhow::Result<()> {
        let files: Vec<&ImpactRecord> = model
            .file_paths()
            .into_iter()
            .filter_map(|path| model.file_impact(path))
            .collect();
        let packages: Vec<&ImpactRecord> = model
            .packages()
            .filter_map(|pkg| model.package_impact(&pkg.path))
            .collect();

        let files = ranked(files);
        let packages = ranked(packages);
        if files.is_empty() && packages.is_empty() {
            return Ok(());
        }

        writeln!(self.writer, "## Change Impact")?;
        writeln!(self.writer)?;
        if !files.is_empty() {
            self.write_impact_table("File", &files)?;
        }
        if !packages.is_empty() {
            self.write_impact_table("Package", &packages)?;
        }
        Ok(())
    }

    fn write_impact_table(&mut self, kind: &str, records: &[&ImpactRecord]) -> anyhow::Result<()> {
        writeln!(self.writer, "| {} | Risk | Direct | Indirect | Tests affected |", kind)?;
        writeln!(self.writer, "|------|------|--------|----------|----------------|")?;
        for record in records {
            writeln!(
                self.writer,
                "| `{}` | {} | {} | {} | {} |",
                record.key,
                record.risk_level,
                record.direct_dependents.len(),
                record.indirect_dependents.len(),
                record.tests_affected.len()
            )?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_files(&mut self, model: &SymbolModel) -> anyhow::Result<()> {
        if model.file_count() == 0 {
            return Ok(());
        }
        writeln!(self.writer, "## Files")?;
        writeln!(self.writer)?;
        for file in model.files() {
            self.write_file(model, file)?;
        }
        Ok(())
    }

    fn write_file(&mut self, model: &SymbolModel, file: &FileRecord) -> anyhow::Result<()> {
        writeln!(self.writer, "### {}", file.path)?;
        writeln!(self.writer)?;

        let mut meta = vec![format!("Language: {}", file.language)];
        if let Some(name) = &file.package_name {
            meta.push(format!("Package: `{}`", name));
        }
        if !file.module.is_empty() {
            meta.push(format!("Module: `{}`", file.module));
        }
        meta.push(format!("Risk: {}", file.risk_level));
        writeln!(self.writer, "{}", meta.join(" | "))?;
        writeln!(self.writer)?;

        if let Some(error) = &file.parse_error {
            writeln!(self.writer, "> Parse error: {}", error)?;
            writeln!(self.writer)?;
        }

        if !file.functions.is_empty() {
            let mut functions: Vec<&FunctionRecord> = file.functions.iter().collect();
            functions.sort_by(|a, b| a.name.cmp(&b.name).then(a.line.cmp(&b.line)));
            writeln!(self.writer, "#### Functions")?;
            for f in functions {
                writeln!(self.writer, "- {} (line {})", f.signature(), f.line)?;
            }
            writeln!(self.writer)?;
        }

        if !file.types.is_empty() {
            let mut types: Vec<&str> = file.types.iter().map(String::as_str).collect();
            types.sort_unstable();
            writeln!(self.writer, "#### Types")?;
            for name in types {
                write!(self.writer, "- {}", name)?;
                if let Some(record) = model.type_record(name) {
                    let details = [
                        ("methods", &record.methods),
                        ("fields", &record.fields),
                        ("embeds", &record.embedded),
                        ("implements", &record.implements),
                        ("contract", &record.contract_keys),
                    ];
                    for (label, values) in details {
                        if !values.is_empty() {
                            write!(self.writer, " ({}: {})", label, values.join(", "))?;
                        }
                    }
                }
                writeln!(self.writer)?;
            }
            writeln!(self.writer)?;
        }

        self.write_list("Variables", &file.vars, true)?;
        self.write_list("Routes", &file.routes, false)?;

        let hints = &file.framework;
        if !hints.is_empty() {
            writeln!(self.writer, "#### Framework")?;
            let rows = [
                ("Components", &hints.components),
                ("Hooks", &hints.hooks),
                ("Uses components", &hints.used_components),
                ("Client directives", &hints.client_directives),
                ("Slots", &hints.slots),
                ("Props", &hints.props),
            ];
            for (label, values) in rows {
                if !values.is_empty() {
                    writeln!(self.writer, "- {}: {}", label, values.join(", "))?;
                }
            }
            writeln!(self.writer)?;
        }

        self.write_list("Depends on", &file.local_deps, false)?;
        self.write_list("Used by", model.dependents(&file.path), false)?;

        if let Some(tests) = &file.test_info {
            writeln!(self.writer, "#### Tests")?;
            writeln!(self.writer, "- Files: {}", tests.test_files.join(", "))?;
            if !tests.scenarios.is_empty() {
                writeln!(self.writer, "- Scenarios: {}", tests.scenarios.join(", "))?;
            }
            writeln!(self.writer)?;
        }

        writeln!(self.writer, "---")?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_list(&mut self, title: &str, items: &[String], sort: bool) -> anyhow::Result<()> {
        if items.is_empty() {
            return Ok(());
        }
        let mut items: Vec<&str> = items.iter().map(String::as_str).collect();
        if sort {
            items.sort_unstable();
        }
        writeln!(self.writer, "#### {}", title)?;
        for item in items {
            writeln!(self.writer, "- {}", item)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }
}

/// Records with at least one dependent, riskiest and widest first.
fn ranked(mut records: Vec<&ImpactRecord>) -> Vec<&ImpactRecord> {
    records.retain(|r| r.total_dependents() > 0);
    records.sort_by(|a, b| {
        b.risk_level
            .cmp(&a.risk_level)
            .then_with(|| b.total_dependents().cmp(&a.total_dependents()))
            .then_with(|| a.key.cmp(&b.key))
    });
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::outline::{FunctionRecord, Language, TestInfo};
    use crate::resolve::build_packages;

    fn model() -> SymbolModel {
        let mut model = SymbolModel::new(".");

        let mut store = FileRecord::new("store/db.go", PathBuf::from("store/db.go"), Language::Go);
        store.package_name = Some("store".into());
        let mut open = FunctionRecord::new("Open", 5);
        open.params = vec!["dsn string".into()];
        open.return_type = "*DB, error".into();
        open.is_public = true;
        store.functions.push(open);
        store.types.push("DB".into());
        store.test_info = Some(TestInfo {
            test_files: vec!["store/db_test.go".into()],
            scenarios: vec!["TestOpen".into()],
        });
        model.add_file(store);
        model.ensure_type("DB").methods.push("(DB) Close".into());
        model.add_public_api("store/db.go", "Open");
        model.add_public_api("store/db.go", "type:DB");

        let mut main = FileRecord::new("main.go", PathBuf::from("main.go"), Language::Go);
        main.local_pkg_deps = vec!["store".into()];
        model.add_file(main);
        model.add_package_dependency(".", "store");

        build_packages(&mut model);
        model.assign_risk_levels();
        model
    }

    #[test]
    fn test_document_sections() {
        let doc = render_markdown(&model(), &ReportOptions::default()).unwrap();

        assert!(doc.starts_with("# Code Structure Outline\n"));
        assert!(doc.contains("| Files | 2 |"));
        assert!(doc.contains("## Architecture Overview"));
        assert!(doc.contains("## File Dependencies"));
        assert!(doc.contains("## Package Graph"));
        assert!(doc.contains("- `store/db.go`: `Open`, `type:DB`"));
        assert!(doc.contains("| `store/db.go` | low | 1 | 0 | 1 |"));
        assert!(doc.contains("### store/db.go"));
        assert!(doc.contains("- Open(dsn string) -> *DB, error (line 5)"));
        assert!(doc.contains("- DB (methods: (DB) Close)"));
        assert!(doc.contains("#### Used by\n- main.go"));
        assert!(doc.contains("- Scenarios: TestOpen"));
    }

    #[test]
    fn test_diagrams_can_be_disabled() {
        let options = ReportOptions {
            diagrams: false,
            ..ReportOptions::default()
        };
        let doc = render_markdown(&model(), &options).unwrap();
        assert!(!doc.contains("```mermaid"));
        assert!(doc.contains("| `.` | `store` | 0 | 0 | 0 |"));
    }
}
