use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Wrap};
use ratatui::Frame;

use crate::story::frame_for_step;
use crate::tui::draw::{share_bar, type_color};
use crate::tui::state::{TuiData, TuiState, STEP_ROWS};

use super::truncate;

/// Scrolling narrative on the left, the window it selects on the right.
/// Returns the height of the step list so scrolling can work out which step sits mid-screen.
pub fn draw_story_view(f: &mut Frame, area: Rect, data: &TuiData, state: &TuiState) -> usize {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let block = Block::default().borders(Borders::ALL).title("Story");
    let inner = block.inner(cols[0]);
    f.render_widget(block, cols[0]);

    if data.steps.is_empty() {
        f.render_widget(Paragraph::new("No commits to tell a story about"), inner);
    }

    for (row, step) in data.steps.iter().skip(state.story_scroll).enumerate() {
        let y = inner.y as usize + row * STEP_ROWS;
        if y + STEP_ROWS > (inner.y + inner.height) as usize {
            break;
        }
        let style = if Some(step.index) == state.story_active {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let rect = Rect::new(inner.x, y as u16, inner.width, STEP_ROWS as u16);
        f.render_widget(Paragraph::new(step.text.as_str()).style(style).wrap(Wrap { trim: true }), rect);
    }

    draw_frame(f, cols[1], data, state);
    inner.height as usize
}

fn draw_frame(f: &mut Frame, area: Rect, data: &TuiData, state: &TuiState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let frame = state
        .story_active
        .and_then(|i| frame_for_step(&data.log.commits, &data.steps, i));
    let Some(frame) = frame else {
        let hint = Paragraph::new("Scroll with j/k or the mouse wheel to walk through the history")
            .block(Block::default().borders(Borders::ALL).title("Window"))
            .wrap(Wrap { trim: true });
        f.render_widget(hint, area);
        return;
    };

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(format!(
            "Commits until {}",
            frame.step.datetime.format("%Y-%m-%d %H:%M")
        )))
        .gauge_style(Style::default().fg(Color::Green).bg(Color::Black))
        .ratio((frame.progress / 100.0).clamp(0.0, 1.0))
        .label(format!("{:.0}%  {} commits", frame.progress, frame.commit_ids.len()));
    f.render_widget(gauge, rows[0]);

    let max = frame.files.first().map(|fc| fc.lines).unwrap_or(0);
    let bar_width = (rows[1].width as usize).saturating_sub(54).max(4);
    let lines: Vec<Line> = frame
        .files
        .iter()
        .take(rows[1].height.saturating_sub(2) as usize)
        .map(|fc| {
            let kind = fc.types.first().map(|(k, _)| k.as_str()).unwrap_or("");
            Line::from(vec![
                Span::raw(format!("{:<40} ", truncate(&fc.file, 40))),
                Span::styled(format!("{:>6} ", fc.lines), Style::default().fg(Color::Cyan)),
                Span::styled(share_bar(fc.lines, max, bar_width), Style::default().fg(type_color(kind, &data.types))),
            ])
        })
        .collect();
    let files = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Files ({})", frame.files.len())),
    );
    f.render_widget(files, rows[1]);
}
