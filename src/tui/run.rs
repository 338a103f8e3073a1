use std::io;
use std::time::Duration;

use crossterm::event::{poll, read, DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs};
use ratatui::Terminal;

use crate::aggregate::CommitOrder;
use crate::cli::CommonArgs;
use crate::loader::{load_commit_log, CommitLog};

use super::events::{handle_key_events, handle_mouse_event, sync_story};
use super::state::{TuiData, TuiState, View};
use super::views::{
    draw_files_view, draw_help_overlay, draw_hours_view, draw_scatter_view, draw_story_view,
    draw_summary_view,
};

const STATUS_TTL: Duration = Duration::from_secs(4);

/// Load the log for the TUI. A failed load leaves an empty view and a status message.
pub fn load_data(common: &CommonArgs, state: &mut TuiState) -> TuiData {
    match load_commit_log(common, CommitOrder::FirstSeen, false) {
        Ok(log) => {
            state.set_status(format!(
                "Loaded {} commits from {}",
                log.commits.len(),
                common.data.display()
            ));
            TuiData::from_log(log)
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to load {}", common.data.display());
            state.set_status(format!("Load error: {e}"));
            TuiData::from_log(CommitLog::default())
        }
    }
}

pub fn run(common: &CommonArgs) -> io::Result<()> {
    let mut state = TuiState::default();
    let mut data = load_data(common, &mut state);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;

    let result = event_loop(&mut terminal, &mut state, &mut data, common);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    result
}

fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    state: &mut TuiState,
    data: &mut TuiData,
    common: &CommonArgs,
) -> io::Result<()> {
    loop {
        let draw_result = terminal.draw(|f| {
            let size = f.size();
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)])
                .split(size);

            let titles: Vec<&str> = View::ALL.iter().map(|v| v.title()).collect();
            let tabs = Tabs::new(titles)
                .block(Block::default().borders(Borders::ALL).title("locmap"))
                .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
                .select(state.view.index());
            f.render_widget(tabs, chunks[0]);

            match state.view {
                View::Scatter => draw_scatter_view(f, chunks[1], data, state),
                View::Files => draw_files_view(f, chunks[1], data, state),
                View::Story => {
                    let rows = draw_story_view(f, chunks[1], data, state);
                    state.story_rows = rows;
                }
                View::Hours => draw_hours_view(f, chunks[1], data, state),
                View::Summary => draw_summary_view(f, chunks[1], data),
            }

            let status = match &state.status_message {
                Some((msg, at)) if at.elapsed() < STATUS_TTL => msg.clone(),
                _ => "q quit | h help | Tab switch view | r reload | c copy".to_string(),
            };
            f.render_widget(
                Paragraph::new(status).style(Style::default().fg(Color::Gray)),
                chunks[2],
            );

            if state.show_help {
                draw_help_overlay(f, size);
            }
        });

        if let Err(e) = draw_result {
            tracing::error!(error = %e, "TUI draw error");
        }

        if state.view == View::Story {
            sync_story(state, data);
        }

        if poll(Duration::from_millis(200))? {
            match read()? {
                Event::Key(key_event) => {
                    if handle_key_events(key_event, state, data, common)? {
                        break;
                    }
                }
                Event::Mouse(mouse_event) => handle_mouse_event(mouse_event, state, data)?,
                _ => {}
            }
        }
    }
    Ok(())
}
