use crate::cli::CommonArgs;
use crate::model::Commit;
use crate::story::nearest_step;
use crate::timeline::cutoff_to_progress;

use super::super::input::{clipboard_text, copy_to_clipboard};
use super::super::layout::step_positions;
use super::super::run::load_data;
use super::super::state::{TuiData, TuiState, View};

/// Reload the log from disk and rebuild every derived view.
pub(super) fn reload(state: &mut TuiState, data: &mut TuiData, common: &CommonArgs) {
    if should_throttle_refresh(state) {
        return;
    }
    *data = load_data(common, state);
    state.story_scroll = state.story_scroll.min(data.steps.len().saturating_sub(1));
    state.file_scroll = 0;
    sync_story(state, data);
}

/// Copy links for the brushed commits, or the active story commit in the story view.
pub(super) fn copy_selection(state: &mut TuiState, data: &TuiData) {
    let visible = data.visible(state.progress);
    let picked: Vec<&Commit> = match state.view {
        View::Story => state
            .story_active
            .and_then(|i| data.steps.get(i))
            .and_then(|s| data.log.commits.iter().find(|c| c.id == s.commit_id))
            .into_iter()
            .collect(),
        _ => data.brushed(&visible, state.brush.as_ref()),
    };
    if picked.is_empty() {
        state.set_status("Nothing selected to copy");
        return;
    }
    match copy_to_clipboard(&clipboard_text(&picked)) {
        Ok(()) => state.set_status(format!("Copied {} commit link(s)", picked.len())),
        Err(err) => state.set_status(format!("Clipboard error: {err}")),
    }
}

pub(super) fn nudge_progress(state: &mut TuiState, delta: f64) {
    state.progress = (state.progress + delta).clamp(0.0, 100.0);
}

pub(super) fn scroll_story(state: &mut TuiState, data: &TuiData, delta: isize) {
    let last = data.steps.len().saturating_sub(1);
    state.story_scroll = state.story_scroll.saturating_add_signed(delta).min(last);
    sync_story(state, data);
}

/// Activate the step nearest the middle of the story list and move the window to its commit.
pub fn sync_story(state: &mut TuiState, data: &TuiData) {
    let positions = step_positions(data.steps.len(), state.story_scroll, state.story_rows);
    state.story_active = nearest_step(&positions, state.story_rows as f64);
    if let Some(step) = state.story_active.and_then(|i| data.steps.get(i)) {
        state.progress = cutoff_to_progress(&data.log.commits, &step.datetime);
    }
}

pub(super) fn change_chapter(state: &mut TuiState, delta: isize) {
    state.chapter = state
        .chapter
        .saturating_add_signed(delta)
        .min(crate::hours::Chapter::ALL.len() - 1);
}

/// Throttle rapid reloads to avoid re-reading the log on key repeat.
fn should_throttle_refresh(state: &mut TuiState) -> bool {
    let now = std::time::Instant::now();
    if let Some(t) = state.last_refresh {
        if now.duration_since(t).as_millis() < 300 {
            return true;
        }
    }
    state.last_refresh = Some(now);
    false
}
