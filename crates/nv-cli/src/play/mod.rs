//! Terminal player: runs a session under ratatui.

mod app;
mod view;

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use nv_engine::NarrativeEngine;
use ratatui::prelude::*;

use app::PlayApp;

/// Upper bound on the time between two redraws.
const FRAME: Duration = Duration::from_millis(16);

pub fn run(engine: NarrativeEngine) -> Result<(), String> {
    let mut app = PlayApp::new(engine);
    app.start()?;

    enable_raw_mode().map_err(|e| format!("terminal error: {e}"))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| format!("terminal error: {e}"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| format!("terminal error: {e}"))?;

    let result = run_loop(&mut terminal, &mut app);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    result
}

/// Draw, wait for input up to one frame, then feed elapsed time to the engine.
fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut PlayApp,
) -> Result<(), String> {
    let mut last = Instant::now();
    loop {
        terminal
            .draw(|frame| view::draw(frame, app))
            .map_err(|e| format!("draw error: {e}"))?;

        if app.should_quit {
            return Ok(());
        }

        if event::poll(FRAME).map_err(|e| format!("event error: {e}"))?
            && let Event::Key(key) = event::read().map_err(|e| format!("event error: {e}"))?
            && key.kind == KeyEventKind::Press
        {
            // Ctrl+C always quits
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                return Ok(());
            }
            app.handle_key(key)?;
        }

        // Whole milliseconds only; the remainder carries into the next frame.
        let elapsed = u64::try_from(last.elapsed().as_millis()).unwrap_or(u64::MAX);
        if elapsed > 0 {
            last += Duration::from_millis(elapsed);
            app.tick(elapsed)?;
        }
    }
}
