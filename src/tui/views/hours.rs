use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Sparkline, Tabs};
use ratatui::Frame;

use crate::hours::{peak_hour, Chapter};
use crate::tui::draw::{layer_style, type_color};
use crate::tui::state::{TuiData, TuiState};
use crate::util::hour_label;

/// Commits per hour of day. Each chapter fades layers in or out.
pub fn draw_hours_view(f: &mut Frame, area: Rect, data: &TuiData, state: &TuiState) {
    let chapter = state.chapter();
    let layers = chapter.layers();
    let peak = peak_hour(&data.buckets);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(if layers.trend > 0.0 { 4 } else { 0 }),
            Constraint::Length(3),
        ])
        .split(area);

    let titles: Vec<String> = Chapter::ALL
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{}. {}", i + 1, c.title()))
        .collect();
    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title("Chapter"))
        .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .select(state.chapter.min(Chapter::ALL.len() - 1));
    f.render_widget(tabs, rows[0]);

    let inner_width = rows[1].width.saturating_sub(2) as usize;
    let bar_width = (inner_width.saturating_sub(23) / 24).max(1) as u16;
    let bars: Vec<Bar> = data
        .buckets
        .iter()
        .map(|b| {
            let base = if layers.color_by_type {
                Style::default().fg(type_color(&b.dominant_type, &data.types))
            } else {
                Style::default().fg(Color::Blue)
            };
            let style = if layers.highlight_peak {
                if Some(b.hour) == peak {
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
                } else {
                    layer_style(base, layers.bars)
                }
            } else {
                layer_style(base, layers.bars)
            };
            Bar::default()
                .value(b.commits as u64)
                .label(Line::from(format!("{:02}", b.hour)))
                .style(style)
        })
        .collect();
    let chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title(chapter.title()))
        .bar_width(bar_width)
        .bar_gap(1)
        .data(BarGroup::default().bars(&bars));
    f.render_widget(chart, rows[1]);

    if layers.trend > 0.0 {
        let counts: Vec<u64> = data.buckets.iter().map(|b| b.commits as u64).collect();
        let trend = Sparkline::default()
            .block(Block::default().borders(Borders::ALL).title("Trend"))
            .style(layer_style(Style::default().fg(Color::Magenta), layers.trend))
            .data(&counts);
        f.render_widget(trend, rows[2]);
    }

    let mut footer: Vec<Span> = Vec::new();
    if layers.legend > 0.0 {
        for kind in &data.types {
            footer.push(Span::styled(
                format!("■ {kind}  "),
                layer_style(Style::default().fg(type_color(kind, &data.types)), layers.legend),
            ));
        }
    }
    if layers.annotation > 0.0 {
        if let Some(hour) = peak {
            let count = data.buckets.iter().find(|b| b.hour == hour).map(|b| b.commits).unwrap_or(0);
            footer.push(Span::styled(
                format!("Peak: {} ({count} commits)", hour_label(hour)),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ));
        }
    }
    let footer = Paragraph::new(Line::from(footer)).block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, rows[3]);
}
