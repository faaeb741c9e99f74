//! The combobox controller: one owner for open state, search text, filtered
//! rows, highlight, selection and creation.
//!
//! Time never advances on its own. Operations that start timers take the
//! current `Instant`, and the host calls [`Combobox::tick`] to let debounce,
//! focus and scroll timers fire.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::binding::Binding;
use crate::config::ComboboxConfig;
use crate::creation::{CreateHandler, CreateRequest, CreationGuard};
use crate::cursor::{Cursor, Key, KeyOutcome};
use crate::error::{CreationError, MisuseError};
use crate::filter::FilteredSet;
use crate::option::ComboOption;
use crate::search::SearchField;
use crate::timer::Timer;
use crate::viewport::Viewport;

type ChangeFn = Box<dyn FnMut(Option<&str>)>;
type OpenFn = Box<dyn FnMut(bool)>;
type CreateRequestedFn = Box<dyn FnMut(&str)>;

/// Outward notifications, called synchronously.
#[derive(Default)]
struct Listeners {
    on_change: Option<ChangeFn>,
    on_open_change: Option<OpenFn>,
    on_create_requested: Option<CreateRequestedFn>,
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("on_change", &self.on_change.is_some())
            .field("on_open_change", &self.on_open_change.is_some())
            .field("on_create_requested", &self.on_create_requested.is_some())
            .finish()
    }
}

/// Creatable, filterable single-select widget state.
#[derive(Debug)]
pub struct Combobox {
    config: ComboboxConfig,
    options: Vec<ComboOption>,
    binding: Binding,

    // ── Panel ────────────────────────────────────
    open: bool,
    search: SearchField,
    search_focused: bool,

    // ── Rows ─────────────────────────────────────
    filtered: FilteredSet,
    cursor: Cursor,
    viewport: Viewport,

    // ── Suspensions ──────────────────────────────
    debounce: Timer,
    focus: Timer,
    // Set for a widget built open; the focus timer is armed on the first tick.
    focus_on_first_tick: bool,
    creation: CreationGuard,

    disposed: bool,
    listeners: Listeners,
}

impl Combobox {
    /// Build the widget. With `initial_open` it starts open without an
    /// `on_open_change` call (listeners attach afterwards), and the search
    /// field focuses `focus_delay_ms` after the first [`Combobox::tick`].
    pub fn new(config: ComboboxConfig, options: Vec<ComboOption>, binding: Binding) -> Self {
        let filtered = FilteredSet::derive(&options, "");
        let open = config.initial_open && !config.disabled;
        let focus_on_first_tick = open && config.searchable;
        let viewport = Viewport::new(config.max_visible_rows);
        Self {
            config,
            options,
            binding,
            open,
            search: SearchField::new(),
            search_focused: false,
            filtered,
            cursor: Cursor::new(),
            viewport,
            debounce: Timer::new(),
            focus: Timer::new(),
            focus_on_first_tick,
            creation: CreationGuard::default(),
            disposed: false,
            listeners: Listeners::default(),
        }
    }

    pub fn on_change<F>(mut self, f: F) -> Self
    where
        F: FnMut(Option<&str>) + 'static,
    {
        self.listeners.on_change = Some(Box::new(f));
        self
    }

    pub fn on_open_change<F>(mut self, f: F) -> Self
    where
        F: FnMut(bool) + 'static,
    {
        self.listeners.on_open_change = Some(Box::new(f));
        self
    }

    pub fn on_create_requested<F>(mut self, f: F) -> Self
    where
        F: FnMut(&str) + 'static,
    {
        self.listeners.on_create_requested = Some(Box::new(f));
        self
    }

    // ── Read side ──────────────────────────────────

    pub fn config(&self) -> &ComboboxConfig {
        &self.config
    }

    pub fn options(&self) -> &[ComboOption] {
        &self.options
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_disabled(&self) -> bool {
        self.config.disabled || self.disposed
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn search_text(&self) -> &str {
        self.search.text()
    }

    pub fn search_field(&self) -> &SearchField {
        &self.search
    }

    pub fn is_search_focused(&self) -> bool {
        self.search_focused
    }

    /// A filter recomputation is waiting for input to settle.
    pub fn is_loading_options(&self) -> bool {
        self.debounce.is_armed()
    }

    /// Host-side loading flag from config.
    pub fn is_loading(&self) -> bool {
        self.config.loading
    }

    pub fn is_creating(&self) -> bool {
        self.creation.is_pending()
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.cursor.highlighted()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn filtered(&self) -> &FilteredSet {
        &self.filtered
    }

    /// Visible options with their row positions.
    pub fn visible(&self) -> impl Iterator<Item = (usize, &ComboOption)> + '_ {
        self.filtered.resolve(&self.options).enumerate()
    }

    pub fn visible_option(&self, position: usize) -> Option<&ComboOption> {
        self.filtered
            .candidate_index(position)
            .and_then(|i| self.options.get(i))
    }

    pub fn highlighted_option(&self) -> Option<&ComboOption> {
        self.highlighted().and_then(|i| self.visible_option(i))
    }

    pub fn is_controlled(&self) -> bool {
        self.binding.is_controlled()
    }

    pub fn selected_value(&self) -> Option<&str> {
        self.binding.value()
    }

    /// Label of the selected option, or the placeholder.
    pub fn selected_label(&self) -> &str {
        self.binding
            .label_in(&self.options)
            .unwrap_or(&self.config.placeholder)
    }

    pub fn has_selection_label(&self) -> bool {
        self.binding.label_in(&self.options).is_some()
    }

    /// Whether the "create <text>" affordance should be offered.
    pub fn shows_create_affordance(&self) -> bool {
        self.config.creatable
            && self.open
            && !self.is_disabled()
            && !self.is_loading_options()
            && self.filtered.is_empty()
            && !self.search.is_empty()
    }

    pub fn can_create(&self) -> bool {
        self.shows_create_affordance() && !self.creation.is_pending()
    }

    // ── Open / close ───────────────────────────────

    /// Trigger activation.
    pub fn toggle(&mut self, now: Instant) {
        if self.open {
            self.close();
        } else {
            self.open(now);
        }
    }

    pub fn open(&mut self, now: Instant) {
        if self.open || self.is_disabled() {
            return;
        }
        self.open = true;
        self.filtered = FilteredSet::derive(&self.options, self.search.text());
        self.cursor.clear();
        self.viewport.reset();
        self.focus.arm(now, self.config.focus_delay());
        debug!(rows = self.filtered.len(), "combobox opened");
        self.notify_open(true);
    }

    pub fn close(&mut self) {
        if !self.open {
            return;
        }
        self.open = false;
        self.search.clear();
        self.search_focused = false;
        self.focus_on_first_tick = false;
        self.debounce.cancel();
        self.focus.cancel();
        debug!("combobox closed");
        self.notify_open(false);
    }

    /// Pointer went down outside the widget.
    pub fn click_outside(&mut self) {
        if self.open {
            self.close();
        }
    }

    // ── Search text ────────────────────────────────

    fn accepts_text(&self) -> bool {
        self.open && self.config.searchable && !self.is_disabled()
    }

    pub fn input_char(&mut self, c: char, now: Instant) {
        if !self.accepts_text() {
            return;
        }
        self.search.insert_char(c);
        self.schedule_filter(now);
    }

    pub fn backspace(&mut self, now: Instant) {
        if self.accepts_text() && self.search.delete_back() {
            self.schedule_filter(now);
        }
    }

    pub fn cursor_left(&mut self) {
        self.search.move_left();
    }

    pub fn cursor_right(&mut self) {
        self.search.move_right();
    }

    pub fn set_search_text(&mut self, text: &str, now: Instant) {
        if !self.accepts_text() || self.search.text() == text {
            return;
        }
        self.search.set(text);
        self.schedule_filter(now);
    }

    fn schedule_filter(&mut self, now: Instant) {
        let quiet = self.config.debounce();
        if quiet.is_zero() {
            self.debounce.cancel();
            self.apply_filter(self.search.text().to_string());
        } else {
            self.debounce.arm(now, quiet);
        }
    }

    fn apply_filter(&mut self, query: String) {
        self.filtered = FilteredSet::derive(&self.options, &query);
        self.cursor.revalidate(self.filtered.len());
        self.viewport.clamp(self.filtered.len());
        debug!(query = %query, rows = self.filtered.len(), "filter applied");
    }

    /// Let due timers fire. Returns true when anything visible changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.disposed {
            return false;
        }
        let mut changed = false;
        if std::mem::take(&mut self.focus_on_first_tick) && self.open {
            self.focus.arm(now, self.config.focus_delay());
        }
        if self.debounce.fire(now) {
            self.apply_filter(self.search.text().to_string());
            changed = true;
        }
        if self.focus.fire(now) && self.open && self.config.searchable {
            self.search_focused = true;
            changed = true;
        }
        if self.viewport.is_animating() {
            self.viewport.step();
            changed = true;
        }
        changed
    }

    /// Earliest armed timer deadline, so a host can sleep until then.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.debounce.deadline(), self.focus.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    // ── Candidate set ──────────────────────────────

    /// Replace the candidate set. The filtered rows are re-derived at once
    /// for the query they currently reflect.
    pub fn set_options(&mut self, options: Vec<ComboOption>) {
        self.options = options;
        let query = self.filtered.query().to_string();
        self.apply_filter(query);
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.config.loading = loading;
    }

    // ── Navigation ─────────────────────────────────

    pub fn handle_key(&mut self, key: Key) -> KeyOutcome {
        if !self.open || self.is_disabled() {
            return KeyOutcome::Ignored;
        }
        let len = self.filtered.len();
        match key {
            Key::ArrowDown => {
                let next = self.cursor.move_down(len);
                self.reveal(next);
                KeyOutcome::Handled
            }
            Key::ArrowUp => {
                let next = self.cursor.move_up(len);
                self.reveal(next);
                KeyOutcome::Handled
            }
            Key::Enter => match self.cursor.highlighted() {
                Some(position) => {
                    self.select_position(position);
                    KeyOutcome::Handled
                }
                None => KeyOutcome::Ignored,
            },
            Key::Other => KeyOutcome::Ignored,
        }
    }

    /// Pointer moved over a row.
    pub fn hover(&mut self, position: usize) {
        if !self.open || self.is_disabled() {
            return;
        }
        let next = self.cursor.set(position, self.filtered.len());
        self.reveal(next);
    }

    fn reveal(&mut self, highlighted: Option<usize>) {
        if let Some(i) = highlighted {
            self.viewport.scroll_into_view(i);
        }
    }

    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport.set_height(height);
        if let Some(i) = self.cursor.highlighted() {
            self.viewport.scroll_into_view(i);
        }
    }

    // ── Selection ──────────────────────────────────

    /// Commit the visible row at `position`.
    pub fn select_position(&mut self, position: usize) -> bool {
        match self.visible_option(position).map(|o| o.value.clone()) {
            Some(value) => self.select(&value),
            None => false,
        }
    }

    /// Commit `value`, notify the owner and close. Disabled options are
    /// refused.
    pub fn select(&mut self, value: &str) -> bool {
        if self.is_disabled() {
            return false;
        }
        if self
            .options
            .iter()
            .any(|option| option.value == value && option.disabled)
        {
            debug!(value, "refused disabled option");
            return false;
        }
        self.commit(Some(value));
        self.close();
        true
    }

    /// Unset the selection when the widget is clearable.
    pub fn clear_selection(&mut self) -> bool {
        if !self.config.clearable || self.is_disabled() || self.binding.value().is_none() {
            return false;
        }
        self.commit(None);
        true
    }

    fn commit(&mut self, value: Option<&str>) {
        self.binding.commit(value);
        debug!(value = ?value, controlled = self.binding.is_controlled(), "selection committed");
        if let Some(f) = self.listeners.on_change.as_mut() {
            f(value);
        }
    }

    /// Owner re-supplies the value of a controlled widget.
    pub fn set_controlled_value(&mut self, value: Option<&str>) -> Result<(), MisuseError> {
        self.binding.supply(value).inspect_err(|err| warn!("{err}"))
    }

    // ── Creation ───────────────────────────────────

    /// Start a create call for the current search text. `None` when the
    /// affordance is not offered or a call is already in flight.
    pub fn begin_create(&mut self) -> Option<CreateRequest> {
        if !self.can_create() {
            return None;
        }
        let request = self.creation.begin(self.search.text())?;
        debug!(id = request.id, text = %request.text, "create requested");
        if let Some(f) = self.listeners.on_create_requested.as_mut() {
            f(&request.text);
        }
        Some(request)
    }

    /// Apply the outcome of a create call.
    ///
    /// Success clears the search text and closes, selecting the created value
    /// when the handler reported one. Failure leaves the panel and text as
    /// they were and hands the error back.
    pub fn finish_create(
        &mut self,
        id: u64,
        result: Result<Option<String>, CreationError>,
    ) -> Result<(), CreationError> {
        if !self.creation.settle(id) {
            debug!(id, "ignoring stale create result");
            return result.map(|_| ());
        }
        match result {
            Ok(created) => {
                info!(id, value = ?created, "option created");
                if let Some(value) = created {
                    self.commit(Some(&value));
                }
                self.search.clear();
                self.close();
                Ok(())
            }
            Err(err) => {
                warn!(id, "create failed: {err}");
                Err(err)
            }
        }
    }

    /// Run a whole create call against `handler`. Returns false when no call
    /// was started.
    pub async fn create_with(&mut self, handler: &dyn CreateHandler) -> Result<bool, CreationError> {
        let Some(request) = self.begin_create() else {
            return Ok(false);
        };
        let result = handler.create_option(&request.text).await;
        self.finish_create(request.id, result)?;
        Ok(true)
    }

    // ── Teardown ───────────────────────────────────

    /// Cancel every timer and in-flight creation; the widget is inert after.
    pub fn dispose(&mut self) {
        self.debounce.cancel();
        self.focus.cancel();
        self.focus_on_first_tick = false;
        self.creation.abandon();
        self.open = false;
        self.search_focused = false;
        self.disposed = true;
    }

    fn notify_open(&mut self, open: bool) {
        if let Some(f) = self.listeners.on_open_change.as_mut() {
            f(open);
        }
    }
}

#[cfg(test)]
mod tests;
