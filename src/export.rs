use crate::aggregate::CommitOrder;
use crate::cli::CommonArgs;
use crate::loader::load_commit_log;
use crate::model::{Commit, CommitsOutput, SCHEMA_VERSION};
use crate::util::show_progress;
use anyhow::Context;
use chrono::Utc;
use std::collections::HashSet;
use std::path::Path;

pub fn exec(common: &CommonArgs, json: bool, ndjson: bool, order: CommitOrder) -> anyhow::Result<()> {
    let log = load_commit_log(common, order, show_progress(json || ndjson))
        .context("Failed to load commit log")?;

    if json {
        output_json(&log.commits, &common.data)?;
    } else if ndjson {
        output_ndjson(&log.commits)?;
    } else {
        output_table(&log.commits)?;
    }

    Ok(())
}

fn output_json(commits: &[Commit], data_path: &Path) -> anyhow::Result<()> {
    let output = CommitsOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        data_path: data_path.to_string_lossy().to_string(),
        commits: commits.to_vec(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn output_ndjson(commits: &[Commit]) -> anyhow::Result<()> {
    for commit in commits {
        println!("{}", serde_json::to_string(commit)?);
    }
    Ok(())
}

fn output_table(commits: &[Commit]) -> anyhow::Result<()> {
    use console::style;

    println!(
        "{:<12} {:<18} {:>6} {:>6} {:>6}  {}",
        style("Commit").bold(),
        style("Date").bold(),
        style("Hour").bold(),
        style("Lines").bold(),
        style("Files").bold(),
        style("Author").bold()
    );
    println!("{}", "─".repeat(72));
    for c in commits.iter().take(50) {
        println!(
            "{:<12} {:<18} {:>6.2} {:>6} {:>6}  {}",
            c.id.chars().take(10).collect::<String>(),
            c.datetime.format("%Y-%m-%d %H:%M"),
            c.hour_frac,
            c.total_lines,
            c.files(),
            style(&c.author).magenta()
        );
    }
    if commits.len() > 50 {
        println!("\n... and {} more commits", commits.len() - 50);
    }

    let authors: HashSet<_> = commits.iter().map(|c| &c.author).collect();
    println!(
        "\n{} commits by {} authors",
        style(commits.len()).cyan(),
        style(authors.len()).yellow()
    );
    Ok(())
}
