//! Astro component extractor.
//!
//! The `---` delimited frontmatter is extracted as TypeScript; the template
//! below it is scanned for component tags, `client:*` directives and slots.

use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;

use super::script::extract_script;
use crate::analysis::{ExtractOptions, Extractor, ParsedFile};
use crate::outline::{push_unique, FileRecord, SymbolModel};

lazy_static! {
    static ref FRONTMATTER: Regex = Regex::new(r"(?s)^---\s*\n(.*?)\n---").unwrap();
    static ref PROPS: Regex = Regex::new(r"(?s)const\s*\{([^}]+)\}\s*=\s*Astro\.props").unwrap();
    static ref TAG: Regex = Regex::new(r"<([A-Za-z][\w.-]*)").unwrap();
    static ref CLIENT_DIRECTIVE: Regex = Regex::new(r"client:(\w+)").unwrap();
    static ref SLOT: Regex = Regex::new(r#"<slot(?:\s+name=["'](\w+)["'])?"#).unwrap();
}

/// Standard HTML (and a few SVG) element names, never reported as components.
const HTML_TAGS: &[&str] = &[
    "a", "abbr", "address", "area", "article", "aside", "audio", "b", "base", "bdi", "bdo",
    "blockquote", "body", "br", "button", "canvas", "caption", "cite", "code", "col", "colgroup",
    "data", "datalist", "dd", "del", "details", "dfn", "dialog", "div", "dl", "dt", "em", "embed",
    "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "head", "header", "hgroup", "hr", "html", "i", "iframe", "img", "input", "ins", "kbd",
    "label", "legend", "li", "link", "main", "map", "mark", "menu", "meta", "meter", "nav",
    "noscript", "object", "ol", "optgroup", "option", "output", "p", "param", "picture", "pre",
    "progress", "q", "rp", "rt", "ruby", "s", "samp", "script", "search", "section", "select",
    "slot", "small", "source", "span", "strong", "style", "sub", "summary", "sup", "table",
    "tbody", "td", "template", "textarea", "tfoot", "th", "thead", "time", "title", "tr",
    "track", "u", "ul", "var", "video", "wbr", "svg", "path", "circle", "rect", "line", "g",
    "polygon", "polyline", "ellipse", "defs", "use", "symbol", "Fragment",
];

/// Astro extractor.
pub struct AstroExtractor;

impl AstroExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AstroExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for AstroExtractor {
    fn language_id(&self) -> &'static str {
        "astro"
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        &["astro"]
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
        let content = parsed.source_str();
        let (frontmatter, template) = split_frontmatter(content);

        if let Some(frontmatter) = frontmatter {
            // Frontmatter starts on the line after the opening `---`.
            extract_script(frontmatter, 1, false, record, model, options);
            extract_props(frontmatter, record);
        }
        scan_template(template, record);
        Ok(())
    }
}

/// Split into (frontmatter, template). Without frontmatter the whole file is
/// template.
fn split_frontmatter(content: &str) -> (Option<&str>, &str) {
    match FRONTMATTER.captures(content) {
        Some(c) => {
            let body = c.get(1).map(|m| m.as_str());
            let end = c.get(0).map(|m| m.end()).unwrap_or(0);
            (body, &content[end..])
        }
        None => (None, content),
    }
}

fn extract_props(frontmatter: &str, record: &mut FileRecord) {
    for c in PROPS.captures_iter(frontmatter) {
        for prop in c[1].split(',') {
            // `title = "Home"` and `title: heading` both name `title`.
            let name = prop
                .split(|ch| ch == '=' || ch == ':')
                .next()
                .unwrap_or("")
                .trim()
                .trim_start_matches("...");
            if !name.is_empty() {
                push_unique(&mut record.framework.props, name);
            }
        }
    }
}

fn scan_template(template: &str, record: &mut FileRecord) {
    for c in TAG.captures_iter(template) {
        let tag = &c[1];
        if !HTML_TAGS.contains(&tag) {
            push_unique(&mut record.framework.used_components, tag);
        }
    }
    for c in CLIENT_DIRECTIVE.captures_iter(template) {
        push_unique(&mut record.framework.client_directives, &c[1]);
    }
    for c in SLOT.captures_iter(template) {
        let name = c.get(1).map(|m| m.as_str()).unwrap_or("default");
        push_unique(&mut record.framework.slots, name);
    }
}
