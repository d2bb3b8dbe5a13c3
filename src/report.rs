//! Output formatting for extraction runs and document statistics.
//!
//! Supports two output formats:
//! - Pretty: colored terminal output for human readability
//! - JSON: the document or statistics, for programmatic consumption

use colored::*;
use std::path::Path;

use crate::builder::BuildStats;
use crate::model::RepoModel;
use crate::stats::{self, ClassMetric, RepoStats};

/// Output format selector shared by the subcommands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Pretty,
    Json,
}

impl Format {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pretty" => Some(Format::Pretty),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

// =============================================================================
// JSON Format
// =============================================================================

/// Print the document exactly as persisted.
pub fn write_json(model: &RepoModel) -> anyhow::Result<()> {
    println!("{}", model.to_json()?);
    Ok(())
}

/// Print the statistics as JSON.
pub fn write_stats_json(stats: &RepoStats) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(stats)?);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

fn write_header() {
    println!();
    print!("  ");
    print!("{}", "repomap".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();
}

/// Print a summary of one extraction run.
pub fn write_pretty(project: &str, output: &Path, model: &RepoModel, run: &BuildStats) {
    write_header();

    print!("  {}", "Project:  ".dimmed());
    println!("{}", project);
    print!("  {}", "Output:   ".dimmed());
    println!("{}", output.display());
    print!("  {}", "Language: ".dimmed());
    println!("{}", model.project_metadata.language.to_string().bold());
    println!();

    write_run_summary(run);
    println!();

    write_dependencies(&model.project_metadata.dependencies);
    println!();

    let classes: usize = model.files.iter().map(|f| f.classes.len()).sum();
    let functions: usize = model.files.iter().map(|f| f.functions.len()).sum();
    print!("  {}", "✓ DONE".green());
    println!(
        "  {} files, {} classes, {} functions",
        model.files.len(),
        classes,
        functions
    );
    println!();
}

fn write_run_summary(run: &BuildStats) {
    println!("  {}", "Files".bold());
    println!("    {:<22} {}", "tree entries", run.entries);
    println!("    {:<22} {}", "records", run.records.to_string().green());
    println!("    {:<22} {}", "skipped (test paths)", run.skipped_tests);
    println!("    {:<22} {}", "skipped (language)", run.skipped_language);
    println!("    {:<22} {}", "empty", run.empty_files);

    let failed = |n: usize| {
        if n == 0 {
            n.to_string().normal()
        } else {
            n.to_string().yellow()
        }
    };
    println!("    {:<22} {}", "fetch failures", failed(run.fetch_failures));
    println!("    {:<22} {}", "parse failures", failed(run.parse_failures));
}

fn write_dependencies(deps: &[String]) {
    println!("  {} ({})", "Dependencies".bold(), deps.len());
    if deps.is_empty() {
        println!("    {}", "no manifest found".dimmed());
        return;
    }
    for dep in deps {
        if dep.starts_with("Error parsing") {
            println!("    {}", dep.red());
        } else {
            println!("    {}", dep);
        }
    }
}

/// Print document statistics.
pub fn write_stats_pretty(path: &str, model: &RepoModel, repo_stats: &RepoStats) {
    write_header();

    print!("  {}", "Document: ".dimmed());
    println!("{}", path);
    print!("  {}", "Language: ".dimmed());
    println!("{}", model.project_metadata.language.to_string().bold());
    println!();

    println!("  {}", "Top imports".bold());
    if repo_stats.top_imports.is_empty() {
        println!("    {}", "none".dimmed());
    }
    for row in &repo_stats.top_imports {
        println!("    {:<30} {}", row.library, row.count.to_string().cyan());
    }
    println!();

    write_class_metrics("Functions per class", &repo_stats.functions_per_class);
    println!();
    write_class_metrics("Variables per class", &repo_stats.variables_per_class);
    println!();

    println!("  {}", "Heaviest file → import links".bold());
    let sankey = &repo_stats.sankey;
    if sankey.source.is_empty() {
        println!("    {}", "none".dimmed());
    }
    for i in 0..sankey.source.len() {
        println!(
            "    {} → {} ({})",
            stats::shorten_label(&sankey.labels[sankey.source[i]]),
            stats::shorten_label(&sankey.labels[sankey.target[i]]),
            sankey.value[i]
        );
    }
    println!();
}

fn write_class_metrics(title: &str, rows: &[ClassMetric]) {
    println!("  {}", title.bold());
    if rows.is_empty() {
        println!("    {}", "none".dimmed());
    }
    for row in rows {
        println!("    {:<30} {}", row.class, row.value.to_string().cyan());
    }
}
