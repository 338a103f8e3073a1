use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, Gauge, GraphType, Paragraph, Wrap};
use ratatui::Frame;

use crate::model::Commit;
use crate::scatter::{language_breakdown, selection_label, ScatterPlot};
use crate::tui::draw::type_color;
use crate::tui::state::{BrushBox, TuiData, TuiState};
use crate::util::hour_label;

/// Scatter of commits by date and hour, the brush outline, the selection panel and the slider.
pub fn draw_scatter_view(f: &mut Frame, area: Rect, data: &TuiData, state: &TuiState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(rows[0]);

    let visible = data.visible(state.progress);
    let brushed = data.brushed(&visible, state.brush.as_ref());

    match data.plot.as_ref() {
        Some(plot) => draw_chart(f, cols[0], plot, &visible, &brushed, state),
        None => {
            let empty = Paragraph::new("No data to display")
                .block(Block::default().borders(Borders::ALL).title("Commits by time of day"));
            f.render_widget(empty, cols[0]);
        }
    }
    draw_selection_panel(f, cols[1], data, &brushed);
    draw_slider(f, rows[1], data, state, visible.len());
}

fn point(commit: &Commit) -> (f64, f64) {
    (commit.datetime.timestamp() as f64, commit.hour_frac)
}

fn brush_outline(plot: &ScatterPlot, b: &BrushBox) -> Vec<(f64, f64)> {
    let x0 = plot.x.invert(b.x0 * plot.inner_width).timestamp() as f64;
    let x1 = plot.x.invert(b.x1 * plot.inner_width).timestamp() as f64;
    vec![(x0, b.h0), (x1, b.h0), (x1, b.h1), (x0, b.h1), (x0, b.h0)]
}

fn draw_chart(
    f: &mut Frame,
    area: Rect,
    plot: &ScatterPlot,
    visible: &[&Commit],
    brushed: &[&Commit],
    state: &TuiState,
) {
    let plain: Vec<(f64, f64)> = visible
        .iter()
        .filter(|c| !brushed.iter().any(|b| b.id == c.id))
        .map(|c| point(c))
        .collect();
    let picked: Vec<(f64, f64)> = brushed.iter().map(|c| point(c)).collect();
    let outline = state.brush.as_ref().map(|b| brush_outline(plot, b)).unwrap_or_default();

    let dot_style = if state.brush.is_some() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::Cyan)
    };
    let outline_style = if state.brush_mode {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    let mut datasets = vec![Dataset::default()
        .name("commits")
        .marker(Marker::Braille)
        .graph_type(GraphType::Scatter)
        .style(dot_style)
        .data(&plain)];
    if state.brush.is_some() {
        datasets.push(
            Dataset::default()
                .name("selected")
                .marker(Marker::Braille)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD))
                .data(&picked),
        );
        datasets.push(
            Dataset::default()
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(outline_style)
                .data(&outline),
        );
    }

    let (start, end) = plot.x.domain();
    let mid = plot.x.invert(plot.inner_width / 2.0);
    let x_axis = Axis::default()
        .title("Date")
        .style(Style::default().fg(Color::Gray))
        .bounds([start.timestamp() as f64, end.timestamp() as f64])
        .labels(vec![
            Span::raw(start.format("%b %d %Y").to_string()),
            Span::raw(mid.format("%b %d").to_string()),
            Span::raw(end.format("%b %d %Y").to_string()),
        ]);
    let y_axis = Axis::default()
        .title("Time")
        .style(Style::default().fg(Color::Gray))
        .bounds([0.0, 24.0])
        .labels(vec![
            Span::raw(hour_label(0)),
            Span::raw(hour_label(6)),
            Span::raw(hour_label(12)),
            Span::raw(hour_label(18)),
            Span::raw("24:00"),
        ]);

    let title = if state.brush_mode {
        "Commits by time of day [brush: arrows move, shift+arrows resize]"
    } else {
        "Commits by time of day"
    };
    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title(title))
        .x_axis(x_axis)
        .y_axis(y_axis);
    f.render_widget(chart, area);
}

fn draw_selection_panel(f: &mut Frame, area: Rect, data: &TuiData, brushed: &[&Commit]) {
    let mut lines = vec![
        Line::from(Span::styled(
            selection_label(brushed.len()),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    for t in language_breakdown(brushed) {
        lines.push(Line::from(vec![
            Span::styled(format!("{:<8}", t.kind), Style::default().fg(type_color(&t.kind, &data.types))),
            Span::raw(format!("{:>6} lines ", t.lines)),
            Span::styled(format!("({})", t.share), Style::default().fg(Color::Gray)),
        ]));
    }

    if !brushed.is_empty() {
        lines.push(Line::from(""));
        for c in brushed.iter().take(area.height.saturating_sub(4) as usize) {
            lines.push(Line::from(vec![
                Span::styled(c.id.chars().take(7).collect::<String>(), Style::default().fg(Color::Cyan)),
                Span::raw(format!(" {} ", c.datetime.format("%Y-%m-%d %H:%M"))),
                Span::styled(format!("{} lines", c.total_lines), Style::default().fg(Color::Green)),
            ]));
        }
    }

    let panel = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Selection"))
        .wrap(Wrap { trim: true });
    f.render_widget(panel, area);
}

fn draw_slider(f: &mut Frame, area: Rect, data: &TuiData, state: &TuiState, shown: usize) {
    let cutoff = crate::timeline::progress_to_cutoff(&data.log.commits, state.progress)
        .map(|c| c.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| "-".to_string());
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(format!("Commits until {cutoff}")))
        .gauge_style(Style::default().fg(Color::Green).bg(Color::Black))
        .ratio((state.progress / 100.0).clamp(0.0, 1.0))
        .label(format!(
            "{:.0}%  {} of {} commits",
            state.progress,
            shown,
            data.log.commits.len()
        ));
    f.render_widget(gauge, area);
}
