use crate::aggregate::{compute_commits, CommitOrder};
use crate::cli::CommonArgs;
use crate::error::{LocmapError, Result};
use crate::model::{Commit, LineRecord};
use crate::util::parse_log_datetime;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::{Duration, Instant};

const REQUIRED_COLUMNS: [&str; 8] = [
    "commit", "author", "datetime", "file", "line", "depth", "length", "type",
];

#[derive(Debug, Deserialize)]
struct RawRow {
    commit: String,
    author: String,
    datetime: String,
    file: String,
    line: u32,
    depth: u32,
    length: u32,
    #[serde(rename = "type")]
    kind: String,
}

/// Parsed line records and the commits built from them. Replaced wholesale on reload.
#[derive(Debug, Clone, Default)]
pub struct CommitLog {
    pub records: Vec<LineRecord>,
    pub commits: Vec<Commit>,
}

impl CommitLog {
    pub fn from_records(records: Vec<LineRecord>, order: CommitOrder, repo: Option<&str>) -> Self {
        let commits = compute_commits(&records, order, repo);
        Self { records, commits }
    }
}

pub fn load_commit_log(common: &CommonArgs, order: CommitOrder, show_progress: bool) -> Result<CommitLog> {
    let records = load_records(&common.data, show_progress)?;
    Ok(CommitLog::from_records(records, order, common.repo.as_deref()))
}

/// Read the line log at `path`. A spinner is drawn when `show_progress` is set.
pub fn load_records(path: &Path, show_progress: bool) -> Result<Vec<LineRecord>> {
    let started = Instant::now();
    let file = File::open(path)?;

    let spinner = if show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("Loading {}", path.display()));
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let result = parse_records(file);

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let records = result?;
    tracing::debug!(
        rows = records.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "loaded line log from {}",
        path.display()
    );
    Ok(records)
}

/// Parse CSV with a header row. Unknown columns are ignored.
pub fn parse_records<R: Read>(reader: R) -> Result<Vec<LineRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|col| !headers.iter().any(|h| h == **col))
    {
        return Err(LocmapError::InvalidArgument(format!(
            "line log is missing the '{missing}' column"
        )));
    }

    let mut records = Vec::new();
    for (idx, row_result) in rdr.deserialize::<RawRow>().enumerate() {
        let row = idx + 1;
        let raw = match row_result {
            Ok(raw) => raw,
            Err(e) => {
                return Err(LocmapError::Parse {
                    row,
                    message: e.to_string(),
                })
            }
        };
        let datetime = parse_log_datetime(&raw.datetime).ok_or_else(|| LocmapError::Parse {
            row,
            message: format!("invalid datetime '{}'", raw.datetime),
        })?;
        records.push(LineRecord {
            commit: raw.commit,
            author: raw.author,
            file: raw.file,
            datetime,
            line: raw.line,
            depth: raw.depth,
            length: raw.length,
            kind: raw.kind,
        });
    }

    Ok(records)
}
