use std::time::Instant;

use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;
use selectra_core::{Key, KeyOutcome};

use crate::app::App;
use crate::ui;

/// Dispatch a key press to the widget.
pub fn handle_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers, now: Instant) {
    if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
        app.quit();
        return;
    }

    if app.combobox.is_open() {
        handle_open_key(app, code, modifiers, now);
    } else {
        handle_closed_key(app, code, now);
    }
    app.drain_notices();
}

fn handle_open_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers, now: Instant) {
    let combo = &mut app.combobox;
    match code {
        KeyCode::Esc => combo.close(),
        KeyCode::Down => {
            combo.handle_key(Key::ArrowDown);
        }
        KeyCode::Up => {
            combo.handle_key(Key::ArrowUp);
        }
        KeyCode::Enter => {
            if combo.handle_key(Key::Enter) == KeyOutcome::Ignored && combo.can_create() {
                app.request_create();
            }
        }
        KeyCode::Char('n') if modifiers.contains(KeyModifiers::CONTROL) => app.request_create(),
        KeyCode::Backspace => combo.backspace(now),
        KeyCode::Left => combo.cursor_left(),
        KeyCode::Right => combo.cursor_right(),
        KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => combo.input_char(c, now),
        _ => {}
    }
}

fn handle_closed_key(app: &mut App, code: KeyCode, now: Instant) {
    match code {
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Down => app.combobox.toggle(now),
        KeyCode::Delete | KeyCode::Backspace => {
            app.combobox.clear_selection();
        }
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        _ => {}
    }
}

/// Dispatch a mouse event using the last drawn layout.
pub fn handle_mouse(app: &mut App, mouse: MouseEvent, now: Instant) {
    let layout = ui::layout(app.screen, app);
    let at = Position::new(mouse.column, mouse.row);
    // Rows are hidden behind the loading overlay while the filter settles.
    let row_under = |app: &App| {
        layout
            .list
            .filter(|list| list.contains(at) && !app.combobox.is_loading_options())
            .map(|list| app.combobox.viewport().offset() + (at.y - list.y) as usize)
            .filter(|&position| position < app.combobox.filtered().len())
    };

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if layout.trigger.contains(at) {
                app.combobox.toggle(now);
            } else if let Some(position) = row_under(app) {
                app.combobox.select_position(position);
            } else if layout.create.is_some_and(|r| r.contains(at)) {
                app.request_create();
            } else if !layout.panel.is_some_and(|r| r.contains(at)) {
                app.combobox.click_outside();
            }
        }
        MouseEventKind::Moved => {
            if let Some(position) = row_under(app) {
                app.combobox.hover(position);
            }
        }
        MouseEventKind::ScrollDown if layout.panel.is_some_and(|r| r.contains(at)) => {
            app.combobox.handle_key(Key::ArrowDown);
        }
        MouseEventKind::ScrollUp if layout.panel.is_some_and(|r| r.contains(at)) => {
            app.combobox.handle_key(Key::ArrowUp);
        }
        _ => {}
    }
    app.drain_notices();
}
