use std::time::Instant;

use crate::hours::{hour_buckets, line_types, Chapter, HourBucket};
use crate::loader::CommitLog;
use crate::model::{Commit, SummaryStats};
use crate::scatter::{is_commit_selected, Brush, ScatterPlot};
use crate::story::{build_steps, StoryStep};
use crate::summary::compute_summary;
use crate::timeline::{filter_by_time, progress_to_cutoff};

/// Rows one story step takes up in the story list.
pub const STEP_ROWS: usize = 3;

/// Everything derived from one load of the log. Rebuilt wholesale on reload.
#[derive(Default)]
pub struct TuiData {
    pub log: CommitLog,
    pub plot: Option<ScatterPlot>,
    pub steps: Vec<StoryStep>,
    pub buckets: Vec<HourBucket>,
    pub types: Vec<String>,
    pub summary: SummaryStats,
}

impl TuiData {
    pub fn from_log(log: CommitLog) -> Self {
        Self {
            plot: ScatterPlot::fit(&log.commits),
            steps: build_steps(&log.commits),
            buckets: hour_buckets(&log.records, &log.commits),
            types: line_types(&log.records),
            summary: compute_summary(&log.records, &log.commits),
            log,
        }
    }

    /// Commits inside the slider window.
    pub fn visible(&self, progress: f64) -> Vec<&Commit> {
        match progress_to_cutoff(&self.log.commits, progress) {
            Ok(cutoff) => filter_by_time(&self.log.commits, &cutoff),
            Err(_) => Vec::new(),
        }
    }

    /// Visible commits under the brush.
    pub fn brushed<'a>(&self, visible: &[&'a Commit], brush: Option<&BrushBox>) -> Vec<&'a Commit> {
        let (Some(plot), Some(b)) = (self.plot.as_ref(), brush) else {
            return Vec::new();
        };
        let brush = b.to_brush(plot);
        visible
            .iter()
            .copied()
            .filter(|c| is_commit_selected(plot, Some(&brush), c))
            .collect()
    }
}

/// Brush as fractions of the plot width (time) and hours of the day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushBox {
    pub x0: f64,
    pub x1: f64,
    pub h0: f64,
    pub h1: f64,
}

impl Default for BrushBox {
    fn default() -> Self {
        Self { x0: 0.25, x1: 0.75, h0: 9.0, h1: 17.0 }
    }
}

impl BrushBox {
    pub fn shift(&mut self, dx: f64, dh: f64) {
        let dx = dx.clamp(-self.x0, 1.0 - self.x1);
        let dh = dh.clamp(-self.h0, 24.0 - self.h1);
        self.x0 += dx;
        self.x1 += dx;
        self.h0 += dh;
        self.h1 += dh;
    }

    /// Grow or shrink around the left/bottom edge, never collapsing below a minimum size.
    pub fn resize(&mut self, dw: f64, dh: f64) {
        self.x1 = (self.x1 + dw).clamp(self.x0 + 0.01, 1.0);
        self.h1 = (self.h1 + dh).clamp(self.h0 + 0.25, 24.0);
    }

    pub fn to_brush(&self, plot: &ScatterPlot) -> Brush {
        Brush::new(
            (self.x0 * plot.inner_width, plot.y.apply(self.h0)),
            (self.x1 * plot.inner_width, plot.y.apply(self.h1)),
        )
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum View {
    Scatter,
    Files,
    Story,
    Hours,
    Summary,
}

impl View {
    pub const ALL: [View; 5] = [View::Scatter, View::Files, View::Story, View::Hours, View::Summary];

    pub fn title(self) -> &'static str {
        match self {
            View::Scatter => "Scatter",
            View::Files => "Files",
            View::Story => "Story",
            View::Hours => "Hours",
            View::Summary => "Summary",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|v| *v == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

pub struct TuiState {
    pub view: View,
    pub progress: f64,
    pub brush: Option<BrushBox>,
    pub brush_mode: bool,
    pub story_scroll: usize,
    pub story_active: Option<usize>,
    pub story_rows: usize,
    pub chapter: usize,
    pub file_scroll: usize,
    pub show_help: bool,
    pub status_message: Option<(String, Instant)>,
    pub last_refresh: Option<Instant>,
}

impl TuiState {
    pub fn chapter(&self) -> Chapter {
        Chapter::from_index(self.chapter)
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
    }
}

impl Default for TuiState {
    fn default() -> Self {
        Self {
            view: View::Scatter,
            progress: 100.0,
            brush: None,
            brush_mode: false,
            story_scroll: 0,
            story_active: None,
            story_rows: 0,
            chapter: 0,
            file_scroll: 0,
            show_help: false,
            status_message: None,
            last_refresh: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brush_box_stays_inside_the_plot() {
        let mut b = BrushBox::default();
        b.shift(2.0, 30.0);
        assert_eq!(b.x1, 1.0);
        assert_eq!(b.h1, 24.0);
        assert_eq!(b.x1 - b.x0, 0.5);
        b.shift(-5.0, -50.0);
        assert_eq!(b.x0, 0.0);
        assert_eq!(b.h0, 0.0);
        b.resize(-1.0, -100.0);
        assert_eq!(b.x1, 0.01);
        assert_eq!(b.h1, 0.25);
    }

    #[test]
    fn views_cycle() {
        assert_eq!(View::Scatter.prev(), View::Summary);
        assert_eq!(View::Summary.next(), View::Scatter);
        assert_eq!(View::Story.index(), 2);
    }
}
