//! Report tests over the mixed Go/TypeScript/Astro workspace in
//! `testdata/workspace`.

use std::path::PathBuf;

use codebrev::{process_root, render_json, render_markdown, Config, ReportOptions, SymbolModel};

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn scan_workspace() -> SymbolModel {
    process_root(&testdata_path().join("workspace"), &Config::default()).unwrap()
}

#[test]
fn test_workspace_modules_and_edges() {
    let model = scan_workspace();

    let modules: Vec<&str> = model
        .modules()
        .iter()
        .map(|m| m.module_path.as_str())
        .collect();
    assert_eq!(modules.len(), 2);
    assert!(modules.contains(&"example.com/api"));
    assert!(modules.contains(&"example.com/shared"));

    assert_eq!(
        model.dependencies("api/main.go"),
        &["api/handlers/users.go".to_string()]
    );
    assert_eq!(
        model.dependencies("api/handlers/users.go"),
        &["shared/models/user.go".to_string()]
    );
    assert_eq!(
        model.dependencies("web/src/components/UserList.tsx"),
        &[
            "web/src/lib/api.ts".to_string(),
            "web/src/components/Button.tsx".to_string()
        ]
    );
    assert_eq!(
        model.dependencies("web/src/pages/index.astro"),
        &[
            "web/src/components/UserList.tsx".to_string(),
            "web/src/components/Button.tsx".to_string()
        ]
    );

    let stat = model.edge_stat("api/handlers", "shared/models").unwrap();
    assert_eq!(stat.imports, 1);
    assert!(stat.calls >= 1);
    let stat = model.edge_stat("api", "api/handlers").unwrap();
    assert_eq!(stat.imports, 1);
    assert_eq!(stat.calls, 1);
}

#[test]
fn test_workspace_file_details() {
    let model = scan_workspace();

    let users = model.file("api/handlers/users.go").unwrap();
    assert_eq!(users.module, "example.com/api");
    assert!(users.routes.contains(&"GET /users".to_string()));
    assert!(users.routes.contains(&"POST /users".to_string()));
    let tests = users.test_info.as_ref().unwrap();
    assert_eq!(tests.test_files, vec!["api/handlers/users_test.go"]);
    assert!(tests.scenarios.contains(&"TestListUsers".to_string()));

    let user = model.file("shared/models/user.go").unwrap();
    assert_eq!(user.module, "example.com/shared");
    assert!(user.exported_types.contains(&"User".to_string()));

    let button = model.file("web/src/components/Button.tsx").unwrap();
    assert!(button.test_info.is_some());
    assert!(model.file("web/src/components/Button.test.tsx").is_none());

    let page = model.file("web/src/pages/index.astro").unwrap();
    assert!(page.framework.props.contains(&"title".to_string()));
    assert_eq!(page.framework.client_directives, vec!["load"]);
    assert_eq!(page.framework.used_components, vec!["UserList", "Button"]);

    // Button is used by the list and the page.
    let impact = model.file_impact("web/src/components/Button.tsx").unwrap();
    assert_eq!(impact.direct_dependents.len(), 2);
}

#[test]
fn test_workspace_markdown_report() {
    let model = scan_workspace();
    let doc = render_markdown(&model, &ReportOptions::default()).unwrap();

    assert!(doc.starts_with("# Code Structure Outline"));
    for heading in [
        "## Summary",
        "## Architecture Overview",
        "## File Dependencies",
        "## Package Graph",
        "## Public API",
        "## Change Impact",
        "## Files",
    ] {
        assert!(doc.contains(heading), "missing {}", heading);
    }
    assert!(doc.contains("```mermaid"));
    assert!(doc.contains("### api/handlers/users.go"));
    assert!(doc.contains("### web/src/pages/index.astro"));
    assert!(doc.contains("`example.com/shared`"));
    // Third-party imports appear as external nodes.
    assert!(doc.contains("go-chi/chi/v5"));
}

#[test]
fn test_workspace_markdown_without_diagrams() {
    let model = scan_workspace();
    let options = ReportOptions {
        diagrams: false,
        ..ReportOptions::default()
    };
    let doc = render_markdown(&model, &options).unwrap();

    assert!(!doc.contains("```mermaid"));
    assert!(doc.contains("## Package Graph"));
    assert!(doc.contains("### api/main.go"));
}

#[test]
fn test_workspace_json_report() {
    let model = scan_workspace();
    let json = render_json(&model).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["summary"]["files"], 7);
    assert_eq!(value["modules"].as_array().unwrap().len(), 2);

    let paths: Vec<&str> = value["files"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|f| f["path"].as_str())
        .collect();
    assert!(paths.contains(&"api/main.go"));
    assert!(paths.contains(&"web/src/lib/api.ts"));

    let edges = value["package_edges"].as_array().unwrap();
    assert!(edges
        .iter()
        .any(|e| e["from"] == "api/handlers" && e["to"] == "shared/models"));

    assert!(value["file_impacts"].as_array().unwrap().len() >= 7);
    assert!(value["public_api"]["shared/models/user.go"].is_array());
}
