use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind, MouseEvent};
use selectra_core::CreationError;

/// Events that the TUI can handle.
#[derive(Debug)]
pub enum AppEvent {
    /// A key press event.
    Key(KeyEvent),
    /// Mouse click, move or scroll.
    Mouse(MouseEvent),
    /// Terminal was resized.
    Resize(u16, u16),
    /// Poll timeout; lets widget timers fire.
    Tick,
    /// A spawned create call settled.
    CreationFinished {
        id: u64,
        result: Result<Option<String>, CreationError>,
    },
}

/// Polls for terminal events.
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    pub fn tick_rate(&self) -> Duration {
        self.tick_rate
    }

    /// Block until the next terminal event or until `timeout` passes.
    pub fn next(&self, timeout: Duration) -> Result<AppEvent> {
        if event::poll(timeout.min(self.tick_rate))? {
            match event::read()? {
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Ok(AppEvent::Key(key)),
                CrosstermEvent::Mouse(mouse) => Ok(AppEvent::Mouse(mouse)),
                CrosstermEvent::Resize(w, h) => Ok(AppEvent::Resize(w, h)),
                _ => Ok(AppEvent::Tick),
            }
        } else {
            Ok(AppEvent::Tick)
        }
    }
}
