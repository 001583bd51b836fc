use std::path::Path;

use colored::Colorize;

pub fn run(path: &Path) -> Result<(), String> {
    let graph = super::load_graph(path)?;
    let issues = graph.validate();

    for issue in &issues {
        if issue.is_error() {
            eprintln!("  {} {issue}", "error:".red().bold());
        } else {
            eprintln!("  {} {issue}", "warning:".yellow().bold());
        }
    }

    let errors = issues.iter().filter(|i| i.is_error()).count();
    let warnings = issues.len() - errors;
    if errors > 0 {
        eprintln!(
            "  {} error{}, {} warning{}",
            errors,
            if errors == 1 { "" } else { "s" },
            warnings,
            if warnings == 1 { "" } else { "s" },
        );
        return Err("graph has errors".into());
    }

    let name = if graph.name.is_empty() { "graph" } else { &graph.name };
    println!("  All checks passed for '{name}'.");
    println!(
        "  {} nodes, {} warning{}",
        graph.len(),
        warnings,
        if warnings == 1 { "" } else { "s" }
    );
    Ok(())
}
