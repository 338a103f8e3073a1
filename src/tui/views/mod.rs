use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Cell;

mod files;
mod help;
mod hours;
mod scatter;
mod story;
mod summary;

pub use files::draw_files_view;
pub use help::draw_help_overlay;
pub use hours::draw_hours_view;
pub use scatter::draw_scatter_view;
pub use story::draw_story_view;
pub use summary::draw_summary_view;

pub(crate) fn header_cell(text: &str, color: Color) -> Cell<'static> {
    Cell::from(text.to_string()).style(Style::default().fg(color).add_modifier(Modifier::BOLD))
}

/// Truncate to `max` chars with an ellipsis when necessary.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        s.to_string()
    }
}
