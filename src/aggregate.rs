use crate::model::{Commit, LineRecord};
use crate::util::commit_url;
use chrono::Timelike;
use clap::ValueEnum;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CommitOrder {
    /// Order in which each commit id first appears in the log
    #[default]
    FirstSeen,
    /// Ascending by commit timestamp; ties keep first-seen order
    Chronological,
}

/// Group line records into commits. Every record ends up in exactly one commit.
pub fn compute_commits(records: &[LineRecord], order: CommitOrder, repo: Option<&str>) -> Vec<Commit> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<Vec<LineRecord>> = Vec::new();

    for record in records {
        let slot = *index.entry(record.commit.as_str()).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(record.clone());
    }

    let mut commits: Vec<Commit> = groups.into_iter().filter_map(|lines| build_commit(lines, repo)).collect();

    if order == CommitOrder::Chronological {
        commits.sort_by(|a, b| a.datetime.cmp(&b.datetime));
    }

    tracing::debug!(records = records.len(), commits = commits.len(), "grouped line log");
    commits
}

fn build_commit(lines: Vec<LineRecord>, repo: Option<&str>) -> Option<Commit> {
    let first = lines.first()?;
    let datetime = first.datetime;
    Some(Commit {
        id: first.commit.clone(),
        url: commit_url(repo, &first.commit),
        author: first.author.clone(),
        datetime,
        hour_frac: fractional_hour(&datetime),
        total_lines: lines.len(),
        lines,
    })
}

pub fn fractional_hour<T: Timelike>(time: &T) -> f64 {
    time.hour() as f64 + time.minute() as f64 / 60.0
}
