//! Command-line interface for codebrev.

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::indexer::process_root;
use crate::report::{self, ReportOptions};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 2;

/// Environment variable holding a tracing filter directive.
pub const LOG_ENV: &str = "CODEBREV_LOG";

/// Cross-referenced code outlines for LLM coding agents.
///
/// Codebrev indexes Go, JavaScript/TypeScript and Astro sources into a
/// single outline: per-file functions, types and variables, file and
/// package dependency graphs, the public API surface, and change-impact
/// estimates for every file and package.
#[derive(Parser)]
#[command(name = "codebrev")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub outline: OutlineArgs,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show what depends on a file or package
    Impact(ImpactArgs),
}

/// Arguments for the default outline run.
#[derive(Args)]
pub struct OutlineArgs {
    /// Path to index (directory or single file)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Report path (default: `output` from config, relative to the scan root)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format: markdown or json
    #[arg(short, long, default_value = "markdown")]
    pub format: String,

    /// Path to config YAML file (default: auto-discover in the scan root)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write the report to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,

    /// Leave mermaid diagrams out of the Markdown report
    #[arg(long)]
    pub no_diagrams: bool,

    /// Parse files on a single thread
    #[arg(long)]
    pub no_parallel: bool,
}

/// Arguments for the impact command.
#[derive(Parser)]
pub struct ImpactArgs {
    /// File path or package directory, relative to the scan root
    pub key: String,

    /// Path to index
    #[arg(short, long, default_value = ".")]
    pub path: PathBuf,

    /// Path to config YAML file (default: auto-discover in the scan root)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,
}

/// Load the config for a scan path (a directory, or a file's directory).
fn load_config(path: &Path, explicit: Option<&Path>) -> anyhow::Result<Config> {
    let dir = if path.is_file() {
        path.parent().unwrap_or_else(|| Path::new("."))
    } else {
        path
    };
    match explicit {
        Some(file) => Config::load(dir, Some(file))
            .with_context(|| format!("parsing config {}", file.display())),
        None => Config::load(dir, None).context("parsing discovered config"),
    }
}

/// Normalize a user-supplied impact key to the model's path form.
fn normalize_key(key: &str) -> String {
    let key = key.replace('\\', "/");
    let key = key.strip_prefix("./").unwrap_or(&key);
    let key = key.trim_end_matches('/');
    if key.is_empty() {
        ".".to_string()
    } else {
        key.to_string()
    }
}

/// Run the default outline command.
pub fn run_outline(args: &OutlineArgs) -> anyhow::Result<i32> {
    if args.format != "markdown" && args.format != "json" {
        eprintln!(
            "Error: invalid format {:?}, must be 'markdown' or 'json'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }

    let mut config = match load_config(&args.path, args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return Ok(EXIT_ERROR);
        }
    };
    if args.no_diagrams {
        config.diagrams = false;
    }
    if args.no_parallel {
        config.parallel = false;
    }

    let model = match process_root(&args.path, &config) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let document = match args.format.as_str() {
        "json" => report::render_json(&model)?,
        _ => report::render_markdown(&model, &ReportOptions::from_config(&config))?,
    };

    if args.stdout {
        print!("{}", document);
        report::write_summary(&model, "stdout");
        return Ok(EXIT_SUCCESS);
    }

    let mut output = match &args.output {
        Some(path) => path.clone(),
        None => config.output_path(model.root()),
    };
    if args.format == "json" && output.extension().is_some_and(|ext| ext == "md") {
        output.set_extension("json");
    }
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    fs::write(&output, document).with_context(|| format!("writing {}", output.display()))?;

    report::write_summary(&model, &output.display().to_string());
    Ok(EXIT_SUCCESS)
}

/// Run the impact command.
pub fn run_impact(args: &ImpactArgs) -> anyhow::Result<i32> {
    if args.format != "pretty" && args.format != "json" {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty' or 'json'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }

    let config = match load_config(&args.path, args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let mut model = match process_root(&args.path, &config) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let key = normalize_key(&args.key);
    let Some(record) = model.compute_impact(&key) else {
        eprintln!("Error: {:?} is not an indexed file or package", key);
        return Ok(EXIT_ERROR);
    };

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(record)?),
        _ => report::write_impact(record),
    }
    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("./store/db.go"), "store/db.go");
        assert_eq!(normalize_key("internal/store/"), "internal/store");
        assert_eq!(normalize_key("./"), ".");
        assert_eq!(normalize_key("."), ".");
    }

    #[test]
    fn test_cli_parses_default_and_subcommand() {
        let cli = Cli::try_parse_from(["codebrev", "src", "--format", "json", "-vv"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.outline.path, PathBuf::from("src"));
        assert_eq!(cli.outline.format, "json");
        assert_eq!(cli.verbose, 2);

        let cli = Cli::try_parse_from(["codebrev", "impact", "store/db.go", "-p", "repo"]).unwrap();
        match cli.command {
            Some(Commands::Impact(args)) => {
                assert_eq!(args.key, "store/db.go");
                assert_eq!(args.path, PathBuf::from("repo"));
            }
            None => panic!("expected impact subcommand"),
        }
    }
}
