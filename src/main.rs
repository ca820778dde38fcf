mod app;
mod catalog;
mod config;
mod logging;
mod render;
mod theme;

use std::io::{self, Stdout, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, ExecutableCommand};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{info, warn};

use crate::app::AppState;
use crate::config::{AppPaths, Cli, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::resolve(cli, AppPaths::new())?;

    if config.print {
        let mut stdout = io::stdout().lock();
        render::write_listing(&mut stdout, &config.catalog, config.filter)?;
        stdout.flush()?;
        return Ok(());
    }

    if let Some(path) = &config.log_file {
        // Logging is optional; a bad path must not keep the UI from starting.
        if let Err(err) = logging::init(path) {
            eprintln!("Logging disabled: {err:#}");
        }
    }

    if config.catalog.is_empty() {
        warn!("catalog has no extensions");
    }
    info!(
        extensions = config.catalog.len(),
        filter = config.filter.label(),
        theme = config.theme.label(),
        "session started"
    );
    let mut app = AppState::new(config.title, config.catalog, config.filter, config.theme);
    let result = run_app(&mut app);
    match &result {
        Ok(()) => info!(remaining = app.catalog.len(), "session ended"),
        Err(err) => warn!("session ended with error: {err:#}"),
    }
    result
}

fn run_app(app: &mut AppState) -> Result<()> {
    enable_raw_mode().context("Unable to enable raw mode; is this a terminal?")?;
    let mut terminal = unwind_on_error(setup_terminal(), || {
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        let _ = disable_raw_mode();
    })?;

    let result = event_loop(&mut terminal, app);

    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;
    Ok(terminal)
}

/// Raw mode is already on when setup runs, so a failed setup has to hand the
/// terminal back before the error propagates.
fn unwind_on_error<T>(result: Result<T>, cleanup: impl FnOnce()) -> Result<T> {
    if result.is_err() {
        cleanup();
    }
    result
}

fn event_loop<B>(terminal: &mut Terminal<B>, app: &mut AppState) -> Result<()>
where
    B: ratatui::backend::Backend + Write,
{
    let tick_rate = Duration::from_millis(200);
    loop {
        app.set_viewport(terminal.size()?);
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(tick_rate)? {
            match event::read()? {
                Event::Key(key) => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                Event::Resize(_, _) => {}
                Event::FocusGained | Event::FocusLost | Event::Paste(_) => {}
            };
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

fn restore_terminal<B>(terminal: &mut Terminal<B>) -> Result<()>
where
    B: ratatui::backend::Backend + Write,
{
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}
