use crate::aggregate::CommitOrder;
use crate::cli::CommonArgs;
use crate::loader::load_commit_log;
use crate::model::{Commit, LineRecord, SCHEMA_VERSION};
use crate::util::{hour_label, show_progress};
use anyhow::Context;
use chrono::{DateTime, Timelike, Utc};
use clap::ValueEnum;
use console::style;
use serde::Serialize;
use std::path::Path;

pub const OTHER: &str = "Other";

pub fn exec(common: &CommonArgs, chapter: Chapter, json: bool) -> anyhow::Result<()> {
    let log = load_commit_log(common, CommitOrder::FirstSeen, show_progress(json))
        .context("Failed to load commit log")?;
    let buckets = hour_buckets(&log.records, &log.commits);

    if json {
        output_json(chapter, buckets, line_types(&log.records), &common.data)
    } else {
        output_chart(chapter, &buckets)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourBucket {
    pub hour: u32,
    pub commits: usize,
    pub dominant_type: String,
}

/// The four chapters of the hour-of-day story, in scroll order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Chapter {
    Overview,
    Languages,
    Trend,
    Peak,
}

impl Chapter {
    pub const ALL: [Chapter; 4] = [Chapter::Overview, Chapter::Languages, Chapter::Trend, Chapter::Peak];

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index.min(Self::ALL.len() - 1)]
    }

    pub fn title(self) -> &'static str {
        match self {
            Chapter::Overview => "When do the commits happen?",
            Chapter::Languages => "What gets written at each hour",
            Chapter::Trend => "The shape of the day",
            Chapter::Peak => "The busiest hour",
        }
    }

    pub fn layers(self) -> Layers {
        match self {
            Chapter::Overview => Layers {
                bars: 1.0,
                legend: 0.0,
                trend: 0.0,
                annotation: 0.0,
                color_by_type: false,
                highlight_peak: false,
            },
            Chapter::Languages => Layers {
                bars: 1.0,
                legend: 1.0,
                trend: 0.0,
                annotation: 0.0,
                color_by_type: true,
                highlight_peak: false,
            },
            Chapter::Trend => Layers {
                bars: 0.5,
                legend: 0.5,
                trend: 1.0,
                annotation: 0.0,
                color_by_type: true,
                highlight_peak: false,
            },
            Chapter::Peak => Layers {
                bars: 0.2,
                legend: 0.3,
                trend: 0.3,
                annotation: 1.0,
                color_by_type: true,
                highlight_peak: true,
            },
        }
    }
}

/// Opacity of each chart layer for a chapter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Layers {
    pub bars: f64,
    pub legend: f64,
    pub trend: f64,
    pub annotation: f64,
    pub color_by_type: bool,
    pub highlight_peak: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HoursOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub data_path: String,
    pub chapter: Chapter,
    pub layers: Layers,
    pub peak_hour: Option<u32>,
    pub types: Vec<String>,
    pub buckets: Vec<HourBucket>,
}

/// Commits per whole hour plus the most common line type written at that hour. Always 24 buckets.
pub fn hour_buckets(records: &[LineRecord], commits: &[Commit]) -> Vec<HourBucket> {
    let mut counts = [0usize; 24];
    for c in commits {
        let hour = (c.hour_frac.floor() as usize).min(23);
        counts[hour] += 1;
    }

    let mut by_hour: Vec<Vec<(&str, usize)>> = vec![Vec::new(); 24];
    for r in records {
        let types = &mut by_hour[r.datetime.hour() as usize];
        match types.iter_mut().find(|(kind, _)| *kind == r.kind) {
            Some((_, n)) => *n += 1,
            None => types.push((r.kind.as_str(), 1)),
        }
    }

    (0..24u32)
        .map(|hour| {
            let dominant = by_hour[hour as usize]
                .iter()
                .fold(None, |best: Option<(&str, usize)>, &(kind, n)| match best {
                    Some((_, m)) if m >= n => best,
                    _ => Some((kind, n)),
                })
                .map(|(kind, _)| kind.to_string())
                .unwrap_or_else(|| OTHER.to_string());
            HourBucket {
                hour,
                commits: counts[hour as usize],
                dominant_type: dominant,
            }
        })
        .collect()
}

/// Busiest hour; the earlier hour wins a tie. `None` when nothing was committed.
pub fn peak_hour(buckets: &[HourBucket]) -> Option<u32> {
    buckets
        .iter()
        .filter(|b| b.commits > 0)
        .fold(None, |best: Option<&HourBucket>, b| match best {
            Some(p) if p.commits >= b.commits => best,
            _ => Some(b),
        })
        .map(|b| b.hour)
}

/// Distinct non-empty line types in first-seen order, for the legend.
pub fn line_types(records: &[LineRecord]) -> Vec<String> {
    let mut types: Vec<String> = Vec::new();
    for r in records {
        if !r.kind.is_empty() && !types.iter().any(|t| *t == r.kind) {
            types.push(r.kind.clone());
        }
    }
    types
}

pub fn output_json(chapter: Chapter, buckets: Vec<HourBucket>, types: Vec<String>, data_path: &Path) -> anyhow::Result<()> {
    let output = HoursOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        data_path: data_path.to_string_lossy().to_string(),
        chapter,
        layers: chapter.layers(),
        peak_hour: peak_hour(&buckets),
        types,
        buckets,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn output_chart(chapter: Chapter, buckets: &[HourBucket]) -> anyhow::Result<()> {
    let layers = chapter.layers();
    let peak = peak_hour(buckets);
    let max = buckets.iter().map(|b| b.commits).max().unwrap_or(0).max(1);

    println!("{}", style(chapter.title()).bold());
    println!("{}", "─".repeat(60));
    for b in buckets {
        let width = (b.commits * 40).div_ceil(max);
        let bar = "█".repeat(width);
        let is_peak = Some(b.hour) == peak;
        let bar = if layers.highlight_peak && is_peak {
            style(bar).red().bold()
        } else if layers.highlight_peak {
            style(bar).dim()
        } else if layers.bars < 1.0 {
            style(bar).dim()
        } else {
            style(bar).blue()
        };
        let kind = if layers.color_by_type {
            b.dominant_type.as_str()
        } else {
            ""
        };
        println!("{} {:<40} {:>4} {}", hour_label(b.hour), bar, b.commits, style(kind).cyan());
    }

    if layers.annotation > 0.0 {
        if let Some(hour) = peak {
            let count = buckets.iter().find(|b| b.hour == hour).map(|b| b.commits).unwrap_or(0);
            println!("\n{} {} ({})", style("Peak:").yellow().bold(), hour_label(hour), count);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::tests::record;
    use crate::aggregate::{compute_commits, CommitOrder};
    use pretty_assertions::assert_eq;

    #[test]
    fn buckets_cover_the_whole_day() {
        let records = vec![
            record("A", "2024-02-01T09:30:00Z", "index.html", "html"),
            record("A", "2024-02-01T09:30:00Z", "index.html", "css"),
            record("B", "2024-02-02T09:05:00Z", "global.js", "js"),
            record("B", "2024-02-02T09:05:00Z", "global.js", "js"),
            record("C", "2024-02-03T22:00:00Z", "global.js", "js"),
        ];
        let commits = compute_commits(&records, CommitOrder::FirstSeen, None);
        let buckets = hour_buckets(&records, &commits);
        assert_eq!(buckets.len(), 24);
        assert_eq!(buckets[9].commits, 2);
        assert_eq!(buckets[9].dominant_type, "js");
        assert_eq!(buckets[22].commits, 1);
        assert_eq!(buckets[3].commits, 0);
        assert_eq!(buckets[3].dominant_type, OTHER);
        assert_eq!(peak_hour(&buckets), Some(9));
        assert_eq!(line_types(&records), vec!["html", "css", "js"]);
    }

    #[test]
    fn dominant_type_tie_keeps_first_seen() {
        let records = vec![
            record("A", "2024-02-01T10:00:00Z", "a", "css"),
            record("A", "2024-02-01T10:00:00Z", "b", "js"),
        ];
        let commits = compute_commits(&records, CommitOrder::FirstSeen, None);
        assert_eq!(hour_buckets(&records, &commits)[10].dominant_type, "css");
    }

    #[test]
    fn peak_tie_goes_to_earlier_hour() {
        let records = vec![
            record("A", "2024-02-01T20:00:00Z", "a", "js"),
            record("B", "2024-02-01T08:00:00Z", "a", "js"),
        ];
        let commits = compute_commits(&records, CommitOrder::FirstSeen, None);
        assert_eq!(peak_hour(&hour_buckets(&records, &commits)), Some(8));
        assert_eq!(peak_hour(&hour_buckets(&[], &[])), None);
    }

    #[test]
    fn chapters_reveal_layers_in_order() {
        assert_eq!(Chapter::from_index(0), Chapter::Overview);
        assert_eq!(Chapter::from_index(9), Chapter::Peak);
        assert!(!Chapter::Overview.layers().color_by_type);
        assert_eq!(Chapter::Languages.layers().legend, 1.0);
        assert_eq!(Chapter::Trend.layers().trend, 1.0);
        assert!(Chapter::Peak.layers().highlight_peak);
    }
}
