use std::io;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};

use crate::cli::CommonArgs;

use super::state::{BrushBox, TuiData, TuiState, View};

mod actions;

use actions::*;
pub use actions::sync_story;

const BRUSH_STEP_X: f64 = 0.02;
const BRUSH_STEP_HOURS: f64 = 0.5;

/// Handle a keyboard event, mutating TUI state and returning `true` if the loop should exit.
pub fn handle_key_events(
    key_event: KeyEvent,
    state: &mut TuiState,
    data: &mut TuiData,
    common: &CommonArgs,
) -> io::Result<bool> {
    if key_event.kind != KeyEventKind::Press {
        return Ok(false);
    }

    if state.show_help {
        if matches!(key_event.code, KeyCode::Esc | KeyCode::Char('h') | KeyCode::F(1)) {
            state.show_help = false;
        }
        return Ok(false);
    }

    if state.brush_mode && state.view == View::Scatter && handle_brush_keys(key_event, state) {
        return Ok(false);
    }

    match key_event.code {
        KeyCode::Char('q') => return Ok(true),
        KeyCode::Char('h') | KeyCode::F(1) => state.show_help = true,
        KeyCode::Char('r') => reload(state, data, common),
        KeyCode::Char('c') => copy_selection(state, data),
        KeyCode::Tab => state.view = state.view.next(),
        KeyCode::BackTab => state.view = state.view.prev(),
        KeyCode::Char(c @ '1'..='5') => {
            let index = c as usize - '1' as usize;
            state.view = View::ALL[index];
        }
        KeyCode::Char('b') if state.view == View::Scatter => {
            state.brush = match state.brush {
                Some(_) => None,
                None => Some(BrushBox::default()),
            };
            state.brush_mode = state.brush.is_some();
        }
        KeyCode::Char('e') if state.view == View::Scatter && state.brush.is_some() => {
            state.brush_mode = !state.brush_mode;
        }
        KeyCode::Esc => state.brush_mode = false,
        code => match state.view {
            View::Story => story_keys(code, state, data),
            View::Hours => hours_keys(code, state),
            View::Files => {
                if !file_keys(code, state) {
                    slider_keys(code, state);
                }
            }
            View::Scatter | View::Summary => slider_keys(code, state),
        },
    }

    Ok(false)
}

/// Returns `true` when the key was consumed by the brush.
fn handle_brush_keys(key_event: KeyEvent, state: &mut TuiState) -> bool {
    let Some(brush) = state.brush.as_mut() else {
        return false;
    };
    let (dx, dh) = match key_event.code {
        KeyCode::Left => (-BRUSH_STEP_X, 0.0),
        KeyCode::Right => (BRUSH_STEP_X, 0.0),
        KeyCode::Up => (0.0, BRUSH_STEP_HOURS),
        KeyCode::Down => (0.0, -BRUSH_STEP_HOURS),
        _ => return false,
    };
    if key_event.modifiers.contains(KeyModifiers::SHIFT) {
        brush.resize(dx, dh);
    } else {
        brush.shift(dx, dh);
    }
    true
}

fn slider_keys(code: KeyCode, state: &mut TuiState) {
    match code {
        KeyCode::Left => nudge_progress(state, -1.0),
        KeyCode::Right => nudge_progress(state, 1.0),
        KeyCode::PageDown => nudge_progress(state, -10.0),
        KeyCode::PageUp => nudge_progress(state, 10.0),
        KeyCode::Home => state.progress = 0.0,
        KeyCode::End => state.progress = 100.0,
        _ => {}
    }
}

fn file_keys(code: KeyCode, state: &mut TuiState) -> bool {
    match code {
        KeyCode::Up | KeyCode::Char('k') => state.file_scroll = state.file_scroll.saturating_sub(1),
        KeyCode::Down | KeyCode::Char('j') => state.file_scroll += 1,
        KeyCode::Char('g') => state.file_scroll = 0,
        _ => return false,
    }
    true
}

fn story_keys(code: KeyCode, state: &mut TuiState, data: &TuiData) {
    match code {
        KeyCode::Up | KeyCode::Char('k') => scroll_story(state, data, -1),
        KeyCode::Down | KeyCode::Char('j') => scroll_story(state, data, 1),
        KeyCode::PageUp => scroll_story(state, data, -5),
        KeyCode::PageDown => scroll_story(state, data, 5),
        KeyCode::Home | KeyCode::Char('g') => scroll_story(state, data, isize::MIN),
        KeyCode::End | KeyCode::Char('G') => scroll_story(state, data, isize::MAX),
        _ => {}
    }
}

fn hours_keys(code: KeyCode, state: &mut TuiState) {
    match code {
        KeyCode::Up | KeyCode::Left | KeyCode::Char('k') => change_chapter(state, -1),
        KeyCode::Down | KeyCode::Right | KeyCode::Char('j') => change_chapter(state, 1),
        _ => {}
    }
}

/// Wheel scrolls the story and the hour chapters, and nudges the slider elsewhere.
pub fn handle_mouse_event(mouse_event: MouseEvent, state: &mut TuiState, data: &TuiData) -> io::Result<()> {
    let delta: isize = match mouse_event.kind {
        MouseEventKind::ScrollUp => -1,
        MouseEventKind::ScrollDown => 1,
        _ => return Ok(()),
    };
    match state.view {
        View::Story => scroll_story(state, data, delta),
        View::Hours => change_chapter(state, delta),
        View::Files => state.file_scroll = state.file_scroll.saturating_add_signed(delta),
        View::Scatter | View::Summary => nudge_progress(state, -(delta as f64)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn common() -> CommonArgs {
        CommonArgs {
            data: PathBuf::from("missing.csv"),
            repo: None,
            verbose: false,
        }
    }

    #[test]
    fn brush_toggles_and_moves() {
        let mut state = TuiState::default();
        let mut data = TuiData::default();
        handle_key_events(key(KeyCode::Char('b')), &mut state, &mut data, &common()).unwrap();
        assert_eq!(state.brush, Some(BrushBox::default()));
        assert!(state.brush_mode);

        handle_key_events(key(KeyCode::Right), &mut state, &mut data, &common()).unwrap();
        let moved = state.brush.unwrap();
        assert!((moved.x0 - 0.27).abs() < 1e-9);
        assert_eq!(state.progress, 100.0);

        handle_key_events(key(KeyCode::Esc), &mut state, &mut data, &common()).unwrap();
        handle_key_events(key(KeyCode::Left), &mut state, &mut data, &common()).unwrap();
        assert_eq!(state.progress, 99.0);

        handle_key_events(key(KeyCode::Char('b')), &mut state, &mut data, &common()).unwrap();
        assert!(state.brush.is_none());
    }

    #[test]
    fn quits_and_switches_views() {
        let mut state = TuiState::default();
        let mut data = TuiData::default();
        assert!(!handle_key_events(key(KeyCode::Char('3')), &mut state, &mut data, &common()).unwrap());
        assert_eq!(state.view, View::Story);
        assert!(!handle_key_events(key(KeyCode::Tab), &mut state, &mut data, &common()).unwrap());
        assert_eq!(state.view, View::Hours);
        assert!(handle_key_events(key(KeyCode::Char('q')), &mut state, &mut data, &common()).unwrap());
    }

    #[test]
    fn help_swallows_keys_until_closed() {
        let mut state = TuiState::default();
        let mut data = TuiData::default();
        handle_key_events(key(KeyCode::F(1)), &mut state, &mut data, &common()).unwrap();
        assert!(state.show_help);
        assert!(!handle_key_events(key(KeyCode::Char('q')), &mut state, &mut data, &common()).unwrap());
        handle_key_events(key(KeyCode::Esc), &mut state, &mut data, &common()).unwrap();
        assert!(!state.show_help);
    }
}
