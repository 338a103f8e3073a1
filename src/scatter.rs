use crate::aggregate::CommitOrder;
use crate::cli::CommonArgs;
use crate::error::{LocmapError, Result};
use crate::loader::load_commit_log;
use crate::model::{Commit, SelectionOutput, TypeCount, SCHEMA_VERSION};
use crate::scale::{LinearScale, SqrtScale, TimeScale};
use crate::util::{format_share, hour_label, parse_user_date, show_progress};
use anyhow::Context;
use chrono::{DateTime, FixedOffset, Utc};
use console::style;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

pub fn exec_select(common: &CommonArgs, from: &str, to: &str, hours: &str, json: bool) -> anyhow::Result<()> {
    let from = parse_user_date(from).context("Failed to parse --from")?;
    let to = parse_user_date(to).context("Failed to parse --to")?;
    let hours = parse_hour_range(hours)?;

    let log = load_commit_log(common, CommitOrder::Chronological, show_progress(json))
        .context("Failed to load commit log")?;
    let plot = ScatterPlot::fit(&log.commits);
    let brush = plot.as_ref().map(|p| p.brush_for(&from, &to, hours));
    let selected = match plot.as_ref() {
        Some(p) => selected_commits(p, brush.as_ref(), &log.commits),
        None => Vec::new(),
    };
    let breakdown = language_breakdown(&selected);
    let label = selection_label(selected.len());
    tracing::debug!(?brush, selected = selected.len(), "brushed scatter plot");

    if json {
        output_json(label, &selected, breakdown, &common.data)
    } else {
        output_selection(&label, &selected, &breakdown)
    }
}

pub fn exec_svg(common: &CommonArgs, out: &Path) -> anyhow::Result<()> {
    let log = load_commit_log(common, CommitOrder::FirstSeen, show_progress(false))
        .context("Failed to load commit log")?;
    let plot = ScatterPlot::fit(&log.commits)
        .ok_or_else(|| anyhow::anyhow!("No commits in {}", common.data.display()))?;
    std::fs::write(out, render_svg(&plot, &log.commits, None))
        .with_context(|| format!("Failed to write {}", out.display()))?;
    println!("Wrote {} commits to {}", log.commits.len(), out.display());
    Ok(())
}

/// Parse `lo-hi` hours of the day, e.g. `9-17` or `21.5-24`.
pub fn parse_hour_range(input: &str) -> Result<(f64, f64)> {
    let invalid = || LocmapError::InvalidArgument(format!("hour range '{input}' must look like 9-17"));
    let (lo, hi) = input.split_once('-').ok_or_else(invalid)?;
    let lo: f64 = lo.trim().parse().map_err(|_| invalid())?;
    let hi: f64 = hi.trim().parse().map_err(|_| invalid())?;
    if !(0.0..=24.0).contains(&lo) || !(0.0..=24.0).contains(&hi) {
        return Err(LocmapError::InvalidArgument(format!(
            "hours in '{input}' must be between 0 and 24"
        )));
    }
    Ok((lo.min(hi), lo.max(hi)))
}

pub const WIDTH: f64 = 900.0;
pub const HEIGHT: f64 = 520.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

pub const MARGIN: Margin = Margin { top: 10.0, right: 20.0, bottom: 40.0, left: 60.0 };

/// Scales fitted to one set of commits. Refit on every reload.
#[derive(Debug, Clone, Copy)]
pub struct ScatterPlot {
    pub x: TimeScale,
    pub y: LinearScale,
    pub r: SqrtScale,
    pub inner_width: f64,
    pub inner_height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub id: String,
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
}

/// A rectangle in plot pixels. Edges are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brush {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Brush {
    /// Build from two corners in any order.
    pub fn new((ax, ay): (f64, f64), (bx, by): (f64, f64)) -> Self {
        Self {
            x0: ax.min(bx),
            y0: ay.min(by),
            x1: ax.max(bx),
            y1: ay.max(by),
        }
    }

    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x0 && px <= self.x1 && py >= self.y0 && py <= self.y1
    }
}

impl ScatterPlot {
    pub fn fit(commits: &[Commit]) -> Option<Self> {
        Self::fit_to(commits, WIDTH, HEIGHT, MARGIN)
    }

    pub fn fit_to(commits: &[Commit], width: f64, height: f64, margin: Margin) -> Option<Self> {
        let start = commits.iter().map(|c| c.datetime).min()?;
        let end = commits.iter().map(|c| c.datetime).max()?;
        let inner_width = (width - margin.left - margin.right).max(1.0);
        let inner_height = (height - margin.top - margin.bottom).max(1.0);

        let min_lines = commits.iter().map(|c| c.total_lines.max(1)).min()?;
        let max_lines = commits.iter().map(|c| c.total_lines.max(1)).max()?;

        Some(Self {
            x: TimeScale::new(start, end, (0.0, inner_width)).nice(),
            y: LinearScale::new((0.0, 24.0), (inner_height, 0.0)),
            r: SqrtScale::new((min_lines as f64, max_lines as f64), (3.0, 18.0)),
            inner_width,
            inner_height,
        })
    }

    pub fn position(&self, commit: &Commit) -> (f64, f64) {
        (self.x.apply(&commit.datetime), self.y.apply(commit.hour_frac))
    }

    /// Dots ordered largest first so smaller ones stay visible on top.
    pub fn points(&self, commits: &[Commit]) -> Vec<ScatterPoint> {
        let mut sorted: Vec<&Commit> = commits.iter().collect();
        sorted.sort_by(|a, b| b.total_lines.cmp(&a.total_lines));
        sorted
            .into_iter()
            .map(|c| {
                let (cx, cy) = self.position(c);
                ScatterPoint {
                    id: c.id.clone(),
                    cx,
                    cy,
                    r: self.r.apply(c.total_lines as f64),
                }
            })
            .collect()
    }

    /// Brush covering `from..=to` on the time axis and `hours.0..=hours.1` on the hour axis.
    pub fn brush_for(
        &self,
        from: &DateTime<FixedOffset>,
        to: &DateTime<FixedOffset>,
        hours: (f64, f64),
    ) -> Brush {
        Brush::new(
            (self.x.apply(from), self.y.apply(hours.0)),
            (self.x.apply(to), self.y.apply(hours.1)),
        )
    }
}

pub fn is_commit_selected(plot: &ScatterPlot, brush: Option<&Brush>, commit: &Commit) -> bool {
    let Some(brush) = brush else {
        return false;
    };
    let (px, py) = plot.position(commit);
    brush.contains(px, py)
}

pub fn selected_commits<'a>(plot: &ScatterPlot, brush: Option<&Brush>, commits: &'a [Commit]) -> Vec<&'a Commit> {
    if brush.is_none() {
        return Vec::new();
    }
    commits.iter().filter(|c| is_commit_selected(plot, brush, c)).collect()
}

pub fn selection_label(count: usize) -> String {
    if count == 0 {
        "No commits selected".to_string()
    } else {
        format!("{count} commits selected")
    }
}

/// Lines per content type across the selected commits, in first-seen order.
pub fn language_breakdown(selected: &[&Commit]) -> Vec<TypeCount> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    let mut total = 0usize;
    for line in selected.iter().flat_map(|c| c.lines()) {
        total += 1;
        match counts.iter_mut().find(|(kind, _)| *kind == line.kind) {
            Some((_, n)) => *n += 1,
            None => counts.push((line.kind.clone(), 1)),
        }
    }

    counts
        .into_iter()
        .map(|(kind, lines)| TypeCount {
            share: format_share(lines as f64 / total as f64),
            kind,
            lines,
        })
        .collect()
}

pub fn output_json(label: String, selected: &[&Commit], breakdown: Vec<TypeCount>, data_path: &Path) -> anyhow::Result<()> {
    let output = SelectionOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        data_path: data_path.to_string_lossy().to_string(),
        label,
        commits: selected.iter().map(|c| (*c).clone()).collect(),
        breakdown,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn output_selection(label: &str, selected: &[&Commit], breakdown: &[TypeCount]) -> anyhow::Result<()> {
    println!("{}", style(label).bold());
    println!("{}", "─".repeat(50));
    for c in selected {
        println!(
            "{:<12} {:<20} {:>6} lines  {}",
            c.id.chars().take(10).collect::<String>(),
            c.datetime.format("%Y-%m-%d %H:%M"),
            c.total_lines,
            style(&c.author).magenta()
        );
    }
    if !breakdown.is_empty() {
        println!("\n{}", style("Language breakdown").bold());
        for t in breakdown {
            println!("  {:<12} {:>6} lines ({})", style(&t.kind).cyan(), t.lines, t.share);
        }
    }
    Ok(())
}

/// Standalone SVG of the scatter plot with hour gridlines and axis labels.
pub fn render_svg(plot: &ScatterPlot, commits: &[Commit], brush: Option<&Brush>) -> String {
    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="sans-serif">"#
    );
    let _ = writeln!(svg, r#"<g transform="translate({},{})">"#, MARGIN.left, MARGIN.top);

    svg.push_str("<g class=\"gridlines\" stroke=\"#ddd\">\n");
    for hour in (0..=24).step_by(2) {
        let y = plot.y.apply(hour as f64);
        let _ = writeln!(
            svg,
            r##"<line x1="0" x2="{:.1}" y1="{y:.1}" y2="{y:.1}"/><text x="-8" y="{y:.1}" text-anchor="end" font-size="10" fill="#555">{}</text>"##,
            plot.inner_width,
            hour_label(hour)
        );
    }
    svg.push_str("</g>\n");

    let (start, end) = plot.x.domain();
    let _ = writeln!(
        svg,
        r#"<text x="0" y="{:.1}" font-size="10">{}</text><text x="{:.1}" y="{:.1}" font-size="10" text-anchor="end">{}</text>"#,
        plot.inner_height + 16.0,
        start.format("%b %d %Y"),
        plot.inner_width,
        plot.inner_height + 16.0,
        end.format("%b %d %Y")
    );
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="12">Date</text>"#,
        plot.inner_width / 2.0,
        plot.inner_height + 30.0
    );
    let _ = writeln!(
        svg,
        r#"<text x="{:.1}" y="-40" transform="rotate(-90)" text-anchor="middle" font-size="12">Hour of day</text>"#,
        -plot.inner_height / 2.0
    );

    svg.push_str("<g class=\"dots\">\n");
    let by_id: std::collections::HashMap<&str, &Commit> = commits.iter().map(|c| (c.id.as_str(), c)).collect();
    for p in plot.points(commits) {
        let selected = by_id
            .get(p.id.as_str())
            .map(|c| is_commit_selected(plot, brush, c))
            .unwrap_or(false);
        let fill = if selected { "#ff6b6b" } else { "steelblue" };
        let _ = writeln!(
            svg,
            r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{fill}" fill-opacity="0.75"><title>{}</title></circle>"#,
            p.cx, p.cy, p.r, p.id
        );
    }
    svg.push_str("</g>\n");

    if let Some(b) = brush {
        let _ = writeln!(
            svg,
            r##"<rect class="selection" x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="#777" fill-opacity="0.2" stroke="#333"/>"##,
            b.x0,
            b.y0,
            b.x1 - b.x0,
            b.y1 - b.y0
        );
    }

    svg.push_str("</g>\n</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::tests::record;
    use crate::aggregate::{compute_commits, CommitOrder};
    use crate::util::parse_log_datetime;
    use pretty_assertions::assert_eq;

    fn sample() -> Vec<Commit> {
        let mut records = vec![
            record("A", "2024-02-01T09:30:00Z", "index.html", "html"),
            record("A", "2024-02-01T09:30:00Z", "index.html", "css"),
            record("B", "2024-02-03T14:00:00Z", "global.js", "js"),
            record("C", "2024-02-05T23:00:00Z", "global.js", "js"),
        ];
        for _ in 0..3 {
            records.push(record("C", "2024-02-05T23:00:00Z", "global.js", "js"));
        }
        compute_commits(&records, CommitOrder::FirstSeen, None)
    }

    #[test]
    fn boundary_points_are_selected() {
        let commits = sample();
        let plot = ScatterPlot::fit(&commits).unwrap();
        let from = parse_log_datetime("2024-02-01T09:30:00Z").unwrap();
        let to = parse_log_datetime("2024-02-03T14:00:00Z").unwrap();
        let brush = plot.brush_for(&from, &to, (9.5, 14.0));
        let ids: Vec<_> = selected_commits(&plot, Some(&brush), &commits)
            .iter()
            .map(|c| c.id.clone())
            .collect();
        assert_eq!(ids, vec!["A", "B"]);
    }

    #[test]
    fn midnight_only_log_ignores_brush_elsewhere() {
        let commits = compute_commits(
            &[
                record("A", "2024-02-01T00:00:00Z", "index.html", "html"),
                record("B", "2024-02-01T00:00:00Z", "global.js", "js"),
            ],
            CommitOrder::FirstSeen,
            None,
        );
        let plot = ScatterPlot::fit(&commits).unwrap();
        let from = parse_log_datetime("2025-06-01T00:00:00Z").unwrap();
        let to = parse_log_datetime("2025-07-01T00:00:00Z").unwrap();
        let brush = plot.brush_for(&from, &to, (0.0, 24.0));
        assert!(selected_commits(&plot, Some(&brush), &commits).is_empty());

        let from = parse_log_datetime("2020-01-01T00:00:00Z").unwrap();
        let to = parse_log_datetime("2020-12-31T00:00:00Z").unwrap();
        let brush = plot.brush_for(&from, &to, (0.0, 24.0));
        assert!(selected_commits(&plot, Some(&brush), &commits).is_empty());

        let day = parse_log_datetime("2024-02-01T00:00:00Z").unwrap();
        let brush = plot.brush_for(&day, &day, (0.0, 1.0));
        assert_eq!(selected_commits(&plot, Some(&brush), &commits).len(), 2);
    }

    #[test]
    fn corner_order_does_not_matter() {
        let a = Brush::new((10.0, 200.0), (50.0, 20.0));
        let b = Brush::new((50.0, 20.0), (10.0, 200.0));
        assert_eq!(a, b);
        assert!(a.contains(10.0, 20.0));
        assert!(a.contains(50.0, 200.0));
        assert!(!a.contains(50.1, 100.0));
    }

    #[test]
    fn no_brush_selects_nothing() {
        let commits = sample();
        let plot = ScatterPlot::fit(&commits).unwrap();
        assert!(selected_commits(&plot, None, &commits).is_empty());
        assert!(!is_commit_selected(&plot, None, &commits[0]));
        assert_eq!(selection_label(0), "No commits selected");
        assert_eq!(selection_label(2), "2 commits selected");
    }

    #[test]
    fn breakdown_shares_sum_over_selection() {
        let commits = sample();
        let selected: Vec<&Commit> = commits.iter().take(2).collect();
        let breakdown = language_breakdown(&selected);
        let got: Vec<_> = breakdown.iter().map(|t| (t.kind.as_str(), t.lines, t.share.as_str())).collect();
        assert_eq!(
            got,
            vec![("html", 1, "33.3%"), ("css", 1, "33.3%"), ("js", 1, "33.3%")]
        );
        assert!(language_breakdown(&[]).is_empty());
    }

    #[test]
    fn points_are_largest_first_with_radius_extent() {
        let commits = sample();
        let plot = ScatterPlot::fit(&commits).unwrap();
        let points = plot.points(&commits);
        assert_eq!(points[0].id, "C");
        assert_eq!(points[0].r, 18.0);
        assert_eq!(points[2].id, "B");
        assert_eq!(points[2].r, 3.0);
        assert!(points.iter().all(|p| p.cx >= 0.0 && p.cx <= plot.inner_width));
        assert_eq!(plot.y.apply(24.0), 0.0);
    }

    #[test]
    fn svg_marks_selected_dots() {
        let commits = sample();
        let plot = ScatterPlot::fit(&commits).unwrap();
        let brush = Brush::new((0.0, 0.0), (plot.inner_width, plot.inner_height));
        let svg = render_svg(&plot, &commits, Some(&brush));
        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches("<circle").count(), 3);
        assert_eq!(svg.matches("#ff6b6b").count(), 3);
        assert!(svg.contains("class=\"selection\""));
    }

    #[test]
    fn hour_range_parsing() {
        assert_eq!(parse_hour_range("9-17").unwrap(), (9.0, 17.0));
        assert_eq!(parse_hour_range("24 - 21.5").unwrap(), (21.5, 24.0));
        assert!(parse_hour_range("9").is_err());
        assert!(parse_hour_range("9-25").is_err());
    }

    #[test]
    fn fit_requires_commits() {
        assert!(ScatterPlot::fit(&[]).is_none());
    }
}
