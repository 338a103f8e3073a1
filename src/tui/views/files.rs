use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

use crate::model::FileComposition;
use crate::timeline::file_composition;
use crate::tui::draw::{intensity_color, type_color};
use crate::tui::state::{TuiData, TuiState};

use super::{header_cell, truncate};

const DOTS_WIDTH: usize = 30;

/// Files touched by the commits inside the slider window, one dot per chunk of lines colored by type.
pub fn draw_files_view(f: &mut Frame, area: Rect, data: &TuiData, state: &TuiState) {
    let visible = data.visible(state.progress);
    let files = file_composition(&visible);
    let title = format!("Files ({} across {} commits)", files.len(), visible.len());

    if files.is_empty() {
        let empty = Paragraph::new("No data to display")
            .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(empty, area);
        return;
    }

    let max = files.first().map(|fc| fc.lines).unwrap_or(1).max(1);
    let start = state.file_scroll.min(files.len().saturating_sub(1));
    let rows: Vec<Row> = files[start..]
        .iter()
        .map(|fc| {
            Row::new(vec![
                Cell::from(truncate(&fc.file, 40)),
                Cell::from(fc.lines.to_string()).style(intensity_color(fc.lines, max)),
                Cell::from(dots(fc, max, &data.types)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [Constraint::Length(42), Constraint::Length(8), Constraint::Min(10)],
    )
    .header(Row::new(vec![
        header_cell("File", Color::Yellow),
        header_cell("Lines", Color::Yellow),
        header_cell("Types", Color::Yellow),
    ]))
    .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(table, area);
}

fn dots(fc: &FileComposition, max: usize, types: &[String]) -> Line<'static> {
    let mut spans: Vec<Span> = Vec::new();
    for (kind, n) in &fc.types {
        let count = (n * DOTS_WIDTH).div_ceil(max);
        spans.push(Span::styled("•".repeat(count), Style::default().fg(type_color(kind, types))));
    }
    Line::from(spans)
}
