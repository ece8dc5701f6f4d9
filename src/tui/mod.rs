pub mod render;
pub mod state;
pub mod theme;

use crate::task::TaskRecord;
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use state::AppState;
use std::io;
use std::time::Duration;
use tokio::sync::oneshot;

/// Run the preview UI until the user quits. `tasks_rx` delivers the one-shot
/// discovery result; the UI stays responsive while it is pending.
pub async fn run(mut state: AppState, tasks_rx: oneshot::Receiver<Vec<TaskRecord>>) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, &mut state, tasks_rx).await;
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
    mut tasks_rx: oneshot::Receiver<Vec<TaskRecord>>,
) -> Result<()> {
    let mut spinner_frame: u8 = 0;

    loop {
        // Discovery commits exactly once, after every module has settled.
        if !state.discovery_done {
            match tasks_rx.try_recv() {
                Ok(records) => {
                    tracing::info!(count = records.len(), "task discovery settled");
                    state.install_tasks(records);
                }
                Err(oneshot::error::TryRecvError::Empty) => {}
                Err(oneshot::error::TryRecvError::Closed) => {
                    tracing::warn!("task discovery ended without a result");
                    state.discovery_done = true;
                }
            }
        }

        terminal.draw(|f| render::draw(f, state, spinner_frame))?;
        spinner_frame = spinner_frame.wrapping_add(1);

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key)
                    if matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) =>
                {
                    state.handle_key(key);
                }
                Event::Mouse(mouse) => state.handle_mouse(mouse),
                // Resize is picked up by the next draw.
                _ => {}
            }
        }

        if state.should_quit {
            return Ok(());
        }
    }
}
