use crate::aggregate::CommitOrder;
use crate::cli::CommonArgs;
use crate::error::{LocmapError, Result};
use crate::loader::load_commit_log;
use crate::model::{Commit, FileComposition, WindowOutput, SCHEMA_VERSION};
use crate::scale::TimeScale;
use crate::util::{parse_user_date, show_progress};
use anyhow::Context;
use chrono::{DateTime, FixedOffset, Utc};
use console::style;
use std::collections::HashMap;
use std::path::Path;

pub fn exec(common: &CommonArgs, until: Option<&str>, progress: Option<f64>, json: bool) -> anyhow::Result<()> {
    let log = load_commit_log(common, CommitOrder::Chronological, show_progress(json))
        .context("Failed to load commit log")?;
    if log.commits.is_empty() {
        println!("No data to display");
        return Ok(());
    }

    let cutoff = match (until, progress) {
        (Some(u), _) => parse_user_date(u).context("Failed to parse --until")?,
        (None, Some(p)) => progress_to_cutoff(&log.commits, p)?,
        (None, None) => progress_to_cutoff(&log.commits, 100.0)?,
    };

    let visible = filter_by_time(&log.commits, &cutoff);
    let files = file_composition(&visible);
    tracing::debug!(cutoff = %cutoff, commits = visible.len(), files = files.len(), "applied time window");

    if json {
        output_json(&cutoff, &visible, files, &common.data)
    } else {
        output_window(&log.commits, &cutoff, &visible, &files)
    }
}

/// Commits at or before `cutoff`. Falls back to the earliest commit so a window is never empty.
pub fn filter_by_time<'a>(commits: &'a [Commit], cutoff: &DateTime<FixedOffset>) -> Vec<&'a Commit> {
    let filtered: Vec<&Commit> = commits.iter().filter(|c| c.datetime <= *cutoff).collect();
    if !filtered.is_empty() {
        return filtered;
    }
    commits.iter().min_by_key(|c| c.datetime).into_iter().collect()
}

/// Slider scale: `0..=100` across the span from the earliest to the latest commit.
pub fn progress_scale(commits: &[Commit]) -> Option<TimeScale> {
    let start = commits.iter().map(|c| c.datetime).min()?;
    let end = commits.iter().map(|c| c.datetime).max()?;
    Some(TimeScale::new(start, end, (0.0, 100.0)))
}

pub fn progress_to_cutoff(commits: &[Commit], progress: f64) -> Result<DateTime<FixedOffset>> {
    if !progress.is_finite() {
        return Err(LocmapError::InvalidArgument(format!("progress must be a number, got {progress}")));
    }
    let scale = progress_scale(commits)
        .ok_or_else(|| LocmapError::Other("no commits to place the slider on".to_string()))?;
    Ok(scale.invert(progress.clamp(0.0, 100.0)))
}

/// Slider position for `cutoff`. A history with a single instant is always fully shown.
pub fn cutoff_to_progress(commits: &[Commit], cutoff: &DateTime<FixedOffset>) -> f64 {
    match progress_scale(commits) {
        Some(scale) if scale.domain().0 < scale.domain().1 => scale.apply(cutoff).clamp(0.0, 100.0),
        _ => 100.0,
    }
}

/// Lines of the given commits grouped by file, largest file first.
pub fn file_composition(commits: &[&Commit]) -> Vec<FileComposition> {
    let mut order: Vec<&str> = Vec::new();
    let mut by_file: HashMap<&str, Vec<(String, usize)>> = HashMap::new();

    for line in commits.iter().flat_map(|c| c.lines()) {
        let types = by_file.entry(line.file.as_str()).or_insert_with(|| {
            order.push(line.file.as_str());
            Vec::new()
        });
        match types.iter_mut().find(|(kind, _)| *kind == line.kind) {
            Some((_, count)) => *count += 1,
            None => types.push((line.kind.clone(), 1)),
        }
    }

    let mut files: Vec<FileComposition> = order
        .into_iter()
        .filter_map(|file| {
            let types = by_file.remove(file)?;
            Some(FileComposition {
                file: file.to_string(),
                lines: types.iter().map(|(_, n)| n).sum(),
                types,
            })
        })
        .collect();

    files.sort_by(|a, b| b.lines.cmp(&a.lines).then_with(|| a.file.cmp(&b.file)));
    files
}

fn output_json(
    cutoff: &DateTime<FixedOffset>,
    visible: &[&Commit],
    files: Vec<FileComposition>,
    data_path: &Path,
) -> anyhow::Result<()> {
    let output = WindowOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        data_path: data_path.to_string_lossy().to_string(),
        cutoff: *cutoff,
        commits: visible.iter().map(|c| (*c).clone()).collect(),
        files,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn output_window(
    all: &[Commit],
    cutoff: &DateTime<FixedOffset>,
    visible: &[&Commit],
    files: &[FileComposition],
) -> anyhow::Result<()> {
    let progress = cutoff_to_progress(all, cutoff);
    let filled = (progress / 5.0).round() as usize;
    println!(
        "{} [{}{}] {:.0}%  {}",
        style("Commits until").bold(),
        style("█".repeat(filled)).green(),
        "░".repeat(20 - filled.min(20)),
        progress,
        style(cutoff.format("%Y-%m-%d %H:%M")).dim()
    );
    println!("{} of {} commits shown", style(visible.len()).cyan(), all.len());
    println!("{}", "─".repeat(60));

    let max = files.first().map(|f| f.lines).unwrap_or(1).max(1);
    for f in files.iter().take(30) {
        let dots = ((f.lines * 30) / max).max(1);
        let kinds: Vec<String> = f.types.iter().map(|(k, n)| format!("{k}:{n}")).collect();
        println!(
            "{:<36} {:>6} {} {}",
            f.file,
            f.lines,
            style("•".repeat(dots)).blue(),
            style(kinds.join(" ")).dim()
        );
    }
    if files.len() > 30 {
        println!("\n... and {} more files", files.len() - 30);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::tests::record;
    use crate::aggregate::{compute_commits, CommitOrder};
    use crate::util::parse_log_datetime;
    use pretty_assertions::assert_eq;

    fn sample() -> Vec<Commit> {
        let records = vec![
            record("B", "2024-02-05T10:00:00Z", "style.css", "css"),
            record("A", "2024-02-01T09:00:00Z", "index.html", "html"),
            record("A", "2024-02-01T09:00:00Z", "index.html", "js"),
            record("A", "2024-02-01T09:00:00Z", "global.js", "js"),
            record("C", "2024-02-09T10:00:00Z", "index.html", "html"),
        ];
        compute_commits(&records, CommitOrder::FirstSeen, None)
    }

    fn ids(commits: &[&Commit]) -> Vec<String> {
        commits.iter().map(|c| c.id.clone()).collect()
    }

    #[test]
    fn includes_commits_at_cutoff() {
        let commits = sample();
        let cutoff = parse_log_datetime("2024-02-05T10:00:00Z").unwrap();
        assert_eq!(ids(&filter_by_time(&commits, &cutoff)), vec!["B", "A"]);
    }

    #[test]
    fn empty_window_falls_back_to_earliest() {
        let commits = sample();
        let cutoff = parse_log_datetime("2023-01-01T00:00:00Z").unwrap();
        assert_eq!(ids(&filter_by_time(&commits, &cutoff)), vec!["A"]);
        assert!(filter_by_time(&[], &cutoff).is_empty());
    }

    #[test]
    fn filter_is_monotonic_and_idempotent() {
        let commits = sample();
        let cutoffs = [
            "2024-01-01T00:00:00Z",
            "2024-02-01T09:00:00Z",
            "2024-02-06T00:00:00Z",
            "2024-03-01T00:00:00Z",
        ];
        let mut previous: Vec<String> = Vec::new();
        for c in cutoffs {
            let cutoff = parse_log_datetime(c).unwrap();
            let current = ids(&filter_by_time(&commits, &cutoff));
            assert!(previous.iter().all(|id| current.contains(id)));
            let again = ids(&filter_by_time(&commits, &cutoff));
            assert_eq!(current, again);
            previous = current;
        }
        assert_eq!(previous.len(), 3);
    }

    #[test]
    fn progress_spans_commit_extent() {
        let commits = sample();
        assert_eq!(
            progress_to_cutoff(&commits, 0.0).unwrap(),
            parse_log_datetime("2024-02-01T09:00:00Z").unwrap()
        );
        assert_eq!(
            progress_to_cutoff(&commits, 250.0).unwrap(),
            parse_log_datetime("2024-02-09T10:00:00Z").unwrap()
        );
        assert!(progress_to_cutoff(&[], 50.0).is_err());
        assert!(progress_to_cutoff(&commits, f64::NAN).is_err());
        let mid = progress_to_cutoff(&commits, 50.0).unwrap();
        assert_eq!(cutoff_to_progress(&commits, &mid), 50.0);
    }

    #[test]
    fn single_instant_history_is_fully_shown() {
        let commits = compute_commits(
            &[record("A", "2024-02-01T09:00:00Z", "index.html", "html")],
            CommitOrder::FirstSeen,
            None,
        );
        assert_eq!(cutoff_to_progress(&commits, &commits[0].datetime), 100.0);
        let cutoff = progress_to_cutoff(&commits, 0.0).unwrap();
        assert_eq!(ids(&filter_by_time(&commits, &cutoff)), vec!["A"]);
    }

    #[test]
    fn composition_groups_lines_by_file() {
        let commits = sample();
        let all: Vec<&Commit> = commits.iter().collect();
        let files = file_composition(&all);
        assert_eq!(files[0].file, "index.html");
        assert_eq!(files[0].lines, 3);
        assert_eq!(
            files[0].types,
            vec![("html".to_string(), 2), ("js".to_string(), 1)]
        );
        let rest: Vec<_> = files[1..].iter().map(|f| f.file.as_str()).collect();
        assert_eq!(rest, vec!["global.js", "style.css"]);
    }
}
