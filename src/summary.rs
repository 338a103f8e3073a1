use crate::aggregate::CommitOrder;
use crate::cli::CommonArgs;
use crate::loader::load_commit_log;
use crate::model::{Commit, LineRecord, SummaryOutput, SummaryStats, SCHEMA_VERSION};
use crate::util::show_progress;
use anyhow::Context;
use chrono::Utc;
use console::style;
use std::collections::{HashMap, HashSet};
use std::path::Path;

pub fn exec(common: &CommonArgs, json: bool) -> anyhow::Result<()> {
    let log = load_commit_log(common, CommitOrder::FirstSeen, show_progress(json))
        .context("Failed to load commit log")?;
    let stats = compute_summary(&log.records, &log.commits);

    if json {
        output_json(&stats, &common.data)
    } else {
        output_list(&stats)
    }
}

pub fn compute_summary(records: &[LineRecord], commits: &[Commit]) -> SummaryStats {
    let mut per_file: HashMap<&str, usize> = HashMap::new();
    for r in records {
        *per_file.entry(r.file.as_str()).or_insert(0) += 1;
    }

    let avg_file_length = if per_file.is_empty() {
        0
    } else {
        let total: usize = per_file.values().sum();
        (total as f64 / per_file.len() as f64).round() as usize
    };

    let authors: HashSet<&str> = records.iter().map(|r| r.author.as_str()).collect();

    SummaryStats {
        total_loc: records.len(),
        total_commits: commits.len(),
        files: per_file.len(),
        avg_file_length,
        max_file_length: per_file.values().copied().max().unwrap_or(0),
        max_depth: records.iter().map(|r| r.depth).max().unwrap_or(0),
        longest_line: records.iter().map(|r| r.length).max().unwrap_or(0),
        authors: authors.len(),
    }
}

/// Label/value pairs in display order.
pub fn description_list(stats: &SummaryStats) -> Vec<(&'static str, String)> {
    vec![
        ("Total LOC", stats.total_loc.to_string()),
        ("Total commits", stats.total_commits.to_string()),
        ("Files", stats.files.to_string()),
        ("Avg file length (lines)", stats.avg_file_length.to_string()),
        ("Max file length (lines)", stats.max_file_length.to_string()),
        ("Max depth", stats.max_depth.to_string()),
        ("Longest line", stats.longest_line.to_string()),
        ("Authors", stats.authors.to_string()),
    ]
}

pub fn output_json(stats: &SummaryStats, data_path: &Path) -> anyhow::Result<()> {
    let output = SummaryOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        data_path: data_path.to_string_lossy().to_string(),
        stats: stats.clone(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn output_list(stats: &SummaryStats) -> anyhow::Result<()> {
    println!("{}", style("Summary").bold());
    println!("{}", "─".repeat(40));
    for (label, value) in description_list(stats) {
        println!("{:<28} {:>10}", label, style(value).cyan());
    }
    Ok(())
}
