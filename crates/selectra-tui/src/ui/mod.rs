mod panel;

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use selectra_core::SizeVariant;

use crate::app::App;

/// Screen regions of the widget, shared by rendering and mouse hit-testing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WidgetLayout {
    pub label: Option<Rect>,
    pub trigger: Rect,
    pub panel: Option<Rect>,
    pub search: Option<Rect>,
    pub message: Option<Rect>,
    pub list: Option<Rect>,
    pub create: Option<Rect>,
    pub status: Rect,
}

const MAX_WIDTH: u16 = 60;

fn trigger_height(size: SizeVariant) -> u16 {
    match size {
        SizeVariant::Sm => 1,
        SizeVariant::Md => 3,
        SizeVariant::Lg => 5,
    }
}

/// Take up to `height` rows starting at `*y`, clipped to `bottom`.
fn take_rows(y: &mut u16, x: u16, width: u16, height: u16, bottom: u16) -> Rect {
    let top = (*y).min(bottom);
    let height = height.min(bottom - top);
    *y = top + height;
    Rect::new(x, top, width, height)
}

pub fn layout(area: Rect, app: &App) -> WidgetLayout {
    let combo = &app.combobox;
    let config = combo.config();

    let status = Rect::new(area.x, area.bottom().saturating_sub(1), area.width, area.height.min(1));
    let bottom = status.y;
    let width = area.width.min(MAX_WIDTH);
    let x = area.x + (area.width - width) / 2;
    let mut y = area.y + area.height.min(1);

    let label = config
        .label
        .as_ref()
        .map(|_| take_rows(&mut y, x, width, 1, bottom));
    let trigger = take_rows(&mut y, x, width, trigger_height(config.size), bottom);

    let mut layout = WidgetLayout {
        label,
        trigger,
        status,
        ..WidgetLayout::default()
    };
    if !combo.is_open() {
        return layout;
    }

    // Oversized row counts are clipped to the screen by `take_rows`.
    let list_rows = u16::try_from(config.max_visible_rows.max(1)).unwrap_or(u16::MAX);
    let inner_rows = list_rows
        .saturating_add(u16::from(config.searchable) + 1)
        .saturating_add(u16::from(combo.shows_create_affordance() || combo.is_creating()));
    let panel = take_rows(&mut y, x, width, inner_rows.saturating_add(2), bottom);
    layout.panel = Some(panel);

    let inner = Block::default().borders(Borders::ALL).inner(panel);
    let mut row = inner.y;
    let inner_bottom = inner.bottom();
    if config.searchable {
        layout.search = Some(take_rows(&mut row, inner.x, inner.width, 1, inner_bottom));
    }
    layout.message = Some(take_rows(&mut row, inner.x, inner.width, 1, inner_bottom));
    layout.list = Some(take_rows(&mut row, inner.x, inner.width, list_rows, inner_bottom));
    if combo.shows_create_affordance() || combo.is_creating() {
        layout.create = Some(take_rows(&mut row, inner.x, inner.width, 1, inner_bottom));
    }
    layout
}

/// Render the whole screen.
pub fn render(frame: &mut Frame, app: &App) {
    let layout = layout(frame.area(), app);

    if let (Some(area), Some(text)) = (layout.label, app.combobox.config().label.as_ref()) {
        frame.render_widget(
            Paragraph::new(Span::styled(
                text.as_str(),
                Style::default().fg(app.theme.fg()).add_modifier(Modifier::BOLD),
            )),
            area,
        );
    }

    render_trigger(frame, app, layout.trigger);
    if app.combobox.is_open() {
        panel::render_panel(frame, app, &layout);
    }
    render_status(frame, app, layout.status);
}

fn render_trigger(frame: &mut Frame, app: &App, area: Rect) {
    let combo = &app.combobox;
    let config = combo.config();

    let text_style = if combo.is_disabled() {
        Style::default().fg(app.theme.muted()).add_modifier(Modifier::DIM)
    } else if combo.has_selection_label() {
        Style::default().fg(app.theme.fg())
    } else {
        Style::default().fg(app.theme.muted())
    };

    let mut spans = vec![Span::styled(combo.selected_label().to_string(), text_style)];
    if combo.is_loading() || combo.is_creating() {
        spans.push(Span::styled(" ◌", Style::default().fg(app.theme.warning())));
    }
    spans.push(Span::styled(
        if combo.is_open() { " ▴" } else { " ▾" },
        Style::default().fg(app.theme.muted()),
    ));

    let paragraph = Paragraph::new(Line::from(spans));
    if config.size == SizeVariant::Sm {
        frame.render_widget(paragraph, area);
        return;
    }

    let border = if combo.is_open() {
        app.theme.active_border()
    } else {
        app.theme.border()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    // Center the text vertically in large triggers.
    let text_area = Rect::new(inner.x + 1, inner.y + inner.height / 2, inner.width.saturating_sub(1), inner.height.min(1));
    frame.render_widget(paragraph, text_area);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let (message, color) = if app.status_message.is_empty() {
        (
            if app.combobox.is_open() {
                "↑/↓ move  Enter select  Ctrl+N create  Esc close"
            } else {
                "Enter open  Del clear  q quit"
            },
            app.theme.muted(),
        )
    } else if app.status_is_error {
        (app.status_message.as_str(), app.theme.danger())
    } else {
        (app.status_message.as_str(), app.theme.success())
    };
    frame.render_widget(
        Paragraph::new(Span::styled(format!(" {message}"), Style::default().fg(color))),
        area,
    );
}
