//! Colored terminal output.

use colored::*;

use super::ReportSummary;
use crate::outline::{ImpactRecord, RiskLevel, SymbolModel};

/// Most high-risk files listed in the scan summary.
const MAX_RISKY_LISTED: usize = 5;

fn risk_colored(risk: RiskLevel) -> ColoredString {
    match risk {
        RiskLevel::High => risk.as_str().red().bold(),
        RiskLevel::Medium => risk.as_str().yellow(),
        RiskLevel::Low => risk.as_str().green(),
    }
}

/// Print the scan summary to stderr, keeping stdout free for reports.
pub fn write_summary(model: &SymbolModel, destination: &str) {
    let summary = ReportSummary::from_model(model);

    eprintln!();
    eprint!("  ");
    eprint!("{}", "codebrev".cyan().bold());
    eprintln!(" v{}", env!("CARGO_PKG_VERSION"));
    eprintln!();

    eprint!("  {}", "Scanned: ".dimmed());
    eprintln!("{}", model.root().display());
    eprint!("  {}", "Output:  ".dimmed());
    eprintln!("{}", destination);
    eprintln!();

    eprintln!(
        "  {} files, {} packages, {} types, {} functions",
        summary.files.to_string().bold(),
        summary.packages.to_string().bold(),
        summary.types.to_string().bold(),
        summary.functions.to_string().bold()
    );
    eprintln!(
        "  {} file dependencies, {} package dependencies, {} test files",
        summary.file_edges, summary.package_edges, summary.test_files
    );

    if summary.parse_errors > 0 {
        eprintln!(
            "  {} {} files could not be parsed",
            "warning:".yellow().bold(),
            summary.parse_errors
        );
    }

    let mut risky: Vec<&ImpactRecord> = model
        .files()
        .filter(|f| f.risk_level == RiskLevel::High)
        .filter_map(|f| model.file_impact(&f.path))
        .collect();
    if !risky.is_empty() {
        risky.sort_by(|a, b| b.total_dependents().cmp(&a.total_dependents()));
        eprintln!();
        eprintln!("  {}", "High-risk files:".red().bold());
        for record in risky.iter().take(MAX_RISKY_LISTED) {
            eprintln!(
                "    {} {} ({} dependents)",
                "●".red(),
                record.key,
                record.total_dependents()
            );
        }
        if risky.len() > MAX_RISKY_LISTED {
            eprintln!("    ... and {} more", risky.len() - MAX_RISKY_LISTED);
        }
    }
    eprintln!();
}

/// Print one impact record to stdout.
pub fn write_impact(record: &ImpactRecord) {
    println!();
    print!("  {}", "Impact of ".dimmed());
    println!("{}", record.key.bold());
    print!("  {}", "Risk:     ".dimmed());
    println!(
        "{} ({} dependents)",
        risk_colored(record.risk_level),
        record.total_dependents()
    );
    println!();

    let sections = [
        ("Direct dependents", &record.direct_dependents),
        ("Indirect dependents", &record.indirect_dependents),
        ("Tests affected", &record.tests_affected),
    ];
    for (title, items) in sections {
        println!("  {} ({})", title.bold(), items.len());
        for item in items {
            println!("    {}", item);
        }
        if items.is_empty() {
            println!("    {}", "none".dimmed());
        }
        println!();
    }
}
