use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::story::StepPosition;
use crate::tui::state::STEP_ROWS;

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Where each story step lands in a list scrolled by `scroll` steps, in rows from the list top.
/// A step counts as visible only when all of its rows fit.
pub fn step_positions(count: usize, scroll: usize, rows: usize) -> Vec<StepPosition> {
    (0..count)
        .map(|i| {
            let top = (i as f64 - scroll as f64) * STEP_ROWS as f64;
            StepPosition {
                top,
                visible: top >= 0.0 && top + STEP_ROWS as f64 <= rows as f64,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::story::nearest_step;

    #[test]
    fn middle_step_becomes_active() {
        let positions = step_positions(10, 0, 12);
        let visible: Vec<usize> = (0..10).filter(|&i| positions[i].visible).collect();
        assert_eq!(visible, vec![0, 1, 2, 3]);
        assert_eq!(nearest_step(&positions, 12.0), Some(2));

        let scrolled = step_positions(10, 5, 12);
        assert!(!scrolled[4].visible);
        assert_eq!(nearest_step(&scrolled, 12.0), Some(7));
    }

    #[test]
    fn tiny_viewport_shows_nothing() {
        let positions = step_positions(3, 0, 2);
        assert_eq!(nearest_step(&positions, 2.0), None);
    }
}
