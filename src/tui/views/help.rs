use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::tui::centered_rect;

/// Modal overlay listing key bindings.
pub fn draw_help_overlay(f: &mut Frame, area: Rect) {
    let block = Block::default().title("Help").borders(Borders::ALL);
    let help_area = centered_rect(70, 80, area);

    f.render_widget(Clear, help_area);

    let help_text = vec![
        Line::from(vec![Span::styled(
            "locmap - Help",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Views:",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )]),
        Line::from("  Tab / 1-5   Next view / jump to view (Scatter/Files/Story/Hours/Summary)"),
        Line::from("  Shift+Tab   Previous view"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Time window:",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )]),
        Line::from("  ←/→         Move the slider by 1%"),
        Line::from("  PgUp/PgDn   Move the slider by 10%"),
        Line::from("  Home/End    Earliest / latest commit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Brush (Scatter):",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )]),
        Line::from("  b           Add / clear the brush"),
        Line::from("  e           Toggle brush editing"),
        Line::from("  arrows      Move the brush while editing"),
        Line::from("  Shift+arrow Resize the brush while editing"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Story & Hours:",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )]),
        Line::from("  j/k or ↑/↓  Scroll the story / change chapter"),
        Line::from("  Mouse       Scroll with wheel"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "General:",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )]),
        Line::from("  c           Copy selected commit links"),
        Line::from("  r           Reload the log"),
        Line::from("  h, F1       Toggle this help"),
        Line::from("  q           Quit application"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press 'h' or 'Esc' to close this help",
            Style::default().fg(Color::Gray),
        )]),
    ];

    let help_paragraph = Paragraph::new(help_text)
        .block(block)
        .wrap(ratatui::widgets::Wrap { trim: true });
    f.render_widget(help_paragraph, help_area);
}
