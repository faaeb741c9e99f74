use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
};
use ratatui::Frame;

use super::WidgetLayout;
use crate::app::App;

/// Draw the open dropdown: search line, hint, rows and create affordance.
pub(super) fn render_panel(frame: &mut Frame, app: &App, layout: &WidgetLayout) {
    let Some(panel) = layout.panel else {
        return;
    };
    let theme = &app.theme;

    frame.render_widget(Clear, panel);
    frame.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.active_border()))
            .style(Style::default().bg(theme.bg())),
        panel,
    );

    if let Some(area) = layout.search {
        render_search(frame, app, area);
    }
    if let Some(area) = layout.message {
        frame.render_widget(
            Paragraph::new(Span::styled(
                app.combobox.config().select_or_create_message.as_str(),
                Style::default().fg(theme.muted()).add_modifier(Modifier::ITALIC),
            )),
            area,
        );
    }
    if let Some(area) = layout.list {
        if app.combobox.is_loading_options() {
            render_loading(frame, app, area);
        } else {
            render_rows(frame, app, area);
        }
    }
    if let Some(area) = layout.create {
        render_create(frame, app, area);
    }
}

fn render_search(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let field = app.combobox.search_field();
    let focused = app.combobox.is_search_focused();

    let prompt_color = if focused { theme.frost_ice() } else { theme.muted() };
    let mut spans = vec![Span::styled("› ", Style::default().fg(prompt_color))];

    if field.is_empty() {
        if focused {
            spans.push(Span::styled("█", Style::default().fg(theme.fg_white())));
        }
        spans.push(Span::styled(
            app.combobox.config().search_placeholder.as_str(),
            Style::default().fg(theme.muted()),
        ));
    } else {
        let text = field.text();
        let (before, after) = text.split_at(field.cursor().min(text.len()));
        let text_style = Style::default().fg(theme.fg_white());
        spans.push(Span::styled(before, text_style));
        if focused {
            spans.push(Span::styled("█", Style::default().fg(theme.frost_ice())));
        }
        spans.push(Span::styled(after, text_style));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.bg_secondary())),
        area,
    );
}

fn render_rows(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let combo = &app.combobox;
    let rows = area.height as usize;
    let total = combo.filtered().len();

    if total == 0 && !combo.shows_create_affordance() {
        frame.render_widget(
            Paragraph::new(Span::styled("No options", Style::default().fg(theme.muted()))),
            Rect::new(area.x, area.y, area.width, area.height.min(1)),
        );
        return;
    }

    let offset = combo.viewport().offset();
    let selected = combo.selected_value();
    let highlighted = combo.highlighted();

    for (row, (position, option)) in combo.visible().skip(offset).take(rows).enumerate() {
        let is_selected = selected == Some(option.value.as_str());
        let mut style = Style::default().fg(theme.fg());
        if option.disabled {
            style = Style::default()
                .fg(theme.muted())
                .add_modifier(Modifier::DIM);
        } else if is_selected {
            style = style.fg(theme.green());
        }
        if highlighted == Some(position) {
            style = style
                .bg(theme.highlight_bg())
                .add_modifier(Modifier::BOLD);
        }

        let marker = if is_selected { "✓ " } else { "  " };
        let line = Line::from(vec![
            Span::styled(marker, style),
            Span::styled(option.label.as_str(), style),
        ]);
        let row_area = Rect::new(area.x, area.y + row as u16, area.width, 1);
        frame.render_widget(Paragraph::new(line).style(style), row_area);
    }

    if total > rows {
        let mut state = ScrollbarState::new(total.saturating_sub(rows)).position(offset);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(None)
                .end_symbol(None),
            area,
            &mut state,
        );
    }
}

fn render_loading(frame: &mut Frame, app: &App, area: Rect) {
    let message_area = Rect::new(area.x, area.y + area.height / 2, area.width, area.height.min(1));
    frame.render_widget(
        Paragraph::new(Span::styled(
            app.combobox.config().loading_message.as_str(),
            Style::default().fg(app.theme.yellow()),
        ))
        .alignment(Alignment::Center),
        message_area,
    );
}

fn render_create(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let combo = &app.combobox;
    let text = if combo.is_creating() {
        format!("◌ Creating \"{}\"...", combo.search_text())
    } else {
        format!("+ {} \"{}\"", combo.config().creatable_text, combo.search_text())
    };
    frame.render_widget(
        Paragraph::new(Span::styled(
            text,
            Style::default().fg(theme.green()).add_modifier(Modifier::BOLD),
        )),
        area,
    );
}
