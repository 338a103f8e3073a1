use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

/// One line of code as recorded in the log, tagged with the commit that last touched it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineRecord {
    pub commit: String,
    pub author: String,
    pub file: String,
    pub datetime: DateTime<FixedOffset>,
    pub line: u32,
    pub depth: u32,
    pub length: u32,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Lines grouped under a single commit id. Built by [`crate::aggregate::compute_commits`].
#[derive(Debug, Clone, Serialize)]
pub struct Commit {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub author: String,
    pub datetime: DateTime<FixedOffset>,
    pub hour_frac: f64,
    pub total_lines: usize,
    #[serde(skip)]
    pub(crate) lines: Vec<LineRecord>,
}

impl Commit {
    pub fn lines(&self) -> &[LineRecord] {
        &self.lines
    }

    pub fn files(&self) -> usize {
        let mut files: Vec<&str> = self.lines.iter().map(|l| l.file.as_str()).collect();
        files.sort_unstable();
        files.dedup();
        files.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_loc: usize,
    pub total_commits: usize,
    pub files: usize,
    pub avg_file_length: usize,
    pub max_file_length: usize,
    pub max_depth: u32,
    pub longest_line: u32,
    pub authors: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeCount {
    #[serde(rename = "type")]
    pub kind: String,
    pub lines: usize,
    pub share: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileComposition {
    pub file: String,
    pub lines: usize,
    pub types: Vec<(String, usize)>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub data_path: String,
    pub stats: SummaryStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommitsOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub data_path: String,
    pub commits: Vec<Commit>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WindowOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub data_path: String,
    pub cutoff: DateTime<FixedOffset>,
    pub commits: Vec<Commit>,
    pub files: Vec<FileComposition>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectionOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub data_path: String,
    pub label: String,
    pub commits: Vec<Commit>,
    pub breakdown: Vec<TypeCount>,
}
