//! Scroll-driven narrative over the commit history.
//!
//! Each commit gets one step in chronological order. Whichever visible step sits nearest the
//! middle of the viewport becomes active, and its commit time is used as the cutoff for the
//! same time-window pipeline the progress slider drives.

use crate::aggregate::CommitOrder;
use crate::cli::CommonArgs;
use crate::loader::load_commit_log;
use crate::model::{Commit, FileComposition, SCHEMA_VERSION};
use crate::timeline::{cutoff_to_progress, file_composition, filter_by_time};
use crate::util::show_progress;
use anyhow::Context;
use chrono::{DateTime, FixedOffset, Utc};
use console::style;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoryStep {
    pub index: usize,
    pub commit_id: String,
    pub datetime: DateTime<FixedOffset>,
    pub text: String,
}

/// Layout of one rendered step relative to the viewport top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepPosition {
    pub top: f64,
    pub visible: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoryFrame {
    pub step: StoryStep,
    pub progress: f64,
    pub commit_ids: Vec<String>,
    pub files: Vec<FileComposition>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoryOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub data_path: String,
    pub steps: Vec<StoryStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<StoryFrame>,
}

pub fn exec(common: &CommonArgs, step: Option<usize>, json: bool) -> anyhow::Result<()> {
    let log = load_commit_log(common, CommitOrder::Chronological, show_progress(json))
        .context("Failed to load commit log")?;
    let steps = build_steps(&log.commits);

    if let Some(index) = step {
        if index >= steps.len() {
            tracing::warn!(step = index, steps = steps.len(), "step out of range, showing none");
        }
    }
    let active = step.and_then(|index| frame_for_step(&log.commits, &steps, index));

    if json {
        output_json(steps, active, &common.data)
    } else {
        output_story(&steps, active.as_ref())
    }
}

pub fn build_steps(commits: &[Commit]) -> Vec<StoryStep> {
    let mut ordered: Vec<&Commit> = commits.iter().collect();
    ordered.sort_by_key(|c| c.datetime);
    ordered
        .into_iter()
        .enumerate()
        .map(|(index, c)| {
            let which = if index == 0 { "the first commit" } else { "another commit" };
            let files = c.files();
            let text = format!(
                "On {} at {}, {} made {which}, editing {} {} across {files} {}.",
                c.datetime.format("%B %-d, %Y"),
                c.datetime.format("%H:%M"),
                c.author,
                c.total_lines,
                if c.total_lines == 1 { "line" } else { "lines" },
                if files == 1 { "file" } else { "files" },
            );
            StoryStep {
                index,
                commit_id: c.id.clone(),
                datetime: c.datetime,
                text,
            }
        })
        .collect()
}

/// Index of the visible step whose top is closest to the viewport middle. Ties go to the earlier step.
pub fn nearest_step(positions: &[StepPosition], viewport_height: f64) -> Option<usize> {
    let mid = viewport_height * 0.5;
    positions
        .iter()
        .enumerate()
        .filter(|(_, p)| p.visible)
        .map(|(i, p)| (i, (p.top - mid).abs()))
        .fold(None, |best: Option<(usize, f64)>, (i, dist)| match best {
            Some((_, best_dist)) if best_dist <= dist => best,
            _ => Some((i, dist)),
        })
        .map(|(i, _)| i)
}

pub fn step_cutoff(steps: &[StoryStep], index: usize) -> Option<DateTime<FixedOffset>> {
    steps.get(index).map(|s| s.datetime)
}

/// Everything the page shows while step `index` is active.
pub fn frame_for_step(commits: &[Commit], steps: &[StoryStep], index: usize) -> Option<StoryFrame> {
    let step = steps.get(index)?.clone();
    let visible = filter_by_time(commits, &step.datetime);
    Some(StoryFrame {
        progress: cutoff_to_progress(commits, &step.datetime),
        commit_ids: visible.iter().map(|c| c.id.clone()).collect(),
        files: file_composition(&visible),
        step,
    })
}

pub fn output_json(steps: Vec<StoryStep>, active: Option<StoryFrame>, data_path: &Path) -> anyhow::Result<()> {
    let output = StoryOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        data_path: data_path.to_string_lossy().to_string(),
        steps,
        active,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn output_story(steps: &[StoryStep], active: Option<&StoryFrame>) -> anyhow::Result<()> {
    if steps.is_empty() {
        println!("No commits to tell a story about");
        return Ok(());
    }

    let active_index = active.map(|f| f.step.index);
    for step in steps {
        if Some(step.index) == active_index {
            println!("{} {}", style("▶").yellow().bold(), style(&step.text).bold());
        } else {
            println!("  {}", style(&step.text).dim());
        }
    }

    if let Some(frame) = active {
        println!();
        println!(
            "{} {:.0}% through history, {} commits shown",
            style("Progress:").bold(),
            frame.progress,
            frame.commit_ids.len()
        );
        for f in frame.files.iter().take(10) {
            println!("  {:<40} {:>6} lines", f.file, f.lines);
        }
    }
    Ok(())
}
