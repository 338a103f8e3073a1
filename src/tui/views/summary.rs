use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

use crate::model::Commit;
use crate::scatter::language_breakdown;
use crate::summary::description_list;
use crate::tui::draw::{share_bar, type_color};
use crate::tui::state::TuiData;

use super::header_cell;

/// Headline statistics next to the line-type mix of the whole log.
pub fn draw_summary_view(f: &mut Frame, area: Rect, data: &TuiData) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let rows: Vec<Row> = description_list(&data.summary)
        .into_iter()
        .map(|(label, value)| {
            Row::new(vec![
                Cell::from(label),
                Cell::from(value).style(Style::default().fg(Color::Cyan)),
            ])
        })
        .collect();
    let table = Table::new(rows, [Constraint::Length(26), Constraint::Min(8)])
        .header(Row::new(vec![
            header_cell("Statistic", Color::Yellow),
            header_cell("Value", Color::Yellow),
        ]))
        .block(Block::default().borders(Borders::ALL).title("Summary"));
    f.render_widget(table, cols[0]);

    let all: Vec<&Commit> = data.log.commits.iter().collect();
    let breakdown = language_breakdown(&all);
    let max = breakdown.iter().map(|t| t.lines).max().unwrap_or(0);
    let bar_width = (cols[1].width as usize).saturating_sub(30).max(4);
    let lines: Vec<Line> = breakdown
        .iter()
        .map(|t| {
            Line::from(vec![
                Span::raw(format!("{:<8} ", t.kind)),
                Span::styled(
                    format!("{:<width$}", share_bar(t.lines, max, bar_width), width = bar_width),
                    Style::default().fg(type_color(&t.kind, &data.types)),
                ),
                Span::raw(format!(" {:>6}", t.share)),
            ])
        })
        .collect();
    let mix = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Line types"));
    f.render_widget(mix, cols[1]);
}
