pub mod app;
pub mod catalog;
pub mod event;
pub mod keys;
pub mod theme;
pub mod ui;

use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use app::App;
use event::{AppEvent, EventHandler};

/// Run the picker until the user quits.
///
/// Must be called inside a tokio runtime context; create calls are spawned
/// onto it.
pub fn run_tui(app: &mut App) -> Result<()> {
    // Install panic hook
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = std::io::stdout().execute(DisableMouseCapture);
        let _ = std::io::stdout().execute(crossterm::terminal::LeaveAlternateScreen);
        original_hook(info);
    }));

    // Setup terminal
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    io::stdout().execute(EnableMouseCapture)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let event_handler = EventHandler::new(Duration::from_millis(250));

    // Main loop
    loop {
        terminal.draw(|frame| {
            app.screen = frame.area();
            ui::render(frame, app);
        })?;
        sync_viewport(app);

        let timeout = app.poll_timeout(Instant::now(), event_handler.tick_rate());
        match event_handler.next(timeout)? {
            AppEvent::Key(key) => keys::handle_key(app, key.code, key.modifiers, Instant::now()),
            AppEvent::Mouse(mouse) => keys::handle_mouse(app, mouse, Instant::now()),
            AppEvent::CreationFinished { id, result } => app.finish_create(id, result),
            AppEvent::Resize(_, _) | AppEvent::Tick => {}
        }

        app.tick(Instant::now());
        app.drain_async();

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    io::stdout().execute(DisableMouseCapture)?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Keep the widget's scroll window as tall as the drawn list.
fn sync_viewport(app: &mut App) {
    if let Some(list) = ui::layout(app.screen, app).list {
        let rows = list.height as usize;
        if rows > 0 && rows != app.combobox.viewport().height() {
            app.combobox.set_viewport_height(rows);
        }
    }
}
