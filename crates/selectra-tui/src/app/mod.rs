pub mod async_tasks;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use ratatui::layout::Rect;
use selectra_core::{Binding, ComboOption, Combobox, ComboboxConfig, CreationError};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::catalog::Catalog;
use crate::event::AppEvent;
use crate::theme::NordTheme;

/// Outward notifications collected from the widget's listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    ValueChanged(Option<String>),
    OpenChanged(bool),
    CreateRequested(String),
}

/// Main application state: the widget plus the owner around it.
pub struct App {
    pub should_quit: bool,
    pub combobox: Combobox,
    pub catalog: Arc<Catalog>,

    /// Status bar message.
    pub status_message: String,
    /// Whether `status_message` reports a failure.
    pub status_is_error: bool,

    /// UI Theme
    pub theme: NordTheme,

    /// Last drawn terminal area, for mouse hit-testing.
    pub screen: Rect,

    notices: Rc<RefCell<Vec<Notice>>>,
    tx: UnboundedSender<AppEvent>,
    rx: UnboundedReceiver<AppEvent>,
}

impl App {
    pub fn new(config: ComboboxConfig, binding: Binding, catalog: Arc<Catalog>) -> Self {
        let notices = Rc::new(RefCell::new(Vec::new()));
        let (on_change, on_open, on_create) = (notices.clone(), notices.clone(), notices.clone());

        let combobox = Combobox::new(config, catalog.snapshot(), binding)
            .on_change(move |value| {
                on_change
                    .borrow_mut()
                    .push(Notice::ValueChanged(value.map(str::to_string)));
            })
            .on_open_change(move |open| on_open.borrow_mut().push(Notice::OpenChanged(open)))
            .on_create_requested(move |text| {
                on_create
                    .borrow_mut()
                    .push(Notice::CreateRequested(text.to_string()));
            });

        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            should_quit: false,
            combobox,
            catalog,
            status_message: String::new(),
            status_is_error: false,
            theme: NordTheme::default(),
            screen: Rect::default(),
            notices,
            tx,
            rx,
        }
    }

    /// Value currently shown by the widget.
    pub fn selected_value(&self) -> Option<&str> {
        self.combobox.selected_value()
    }

    pub fn selected_option(&self) -> Option<&ComboOption> {
        let value = self.selected_value()?;
        self.combobox.options().iter().find(|o| o.value == value)
    }

    fn set_status(&mut self, message: impl Into<String>, is_error: bool) {
        self.status_message = message.into();
        self.status_is_error = is_error;
    }

    /// Start a background create call for the current search text.
    pub fn request_create(&mut self) {
        if let Some(request) = self.combobox.begin_create() {
            async_tasks::spawn_create(self.tx.clone(), self.catalog.clone(), request);
        }
        self.drain_notices();
    }

    /// Apply a settled create call.
    pub fn finish_create(&mut self, id: u64, result: Result<Option<String>, CreationError>) {
        let ok = result.is_ok();
        if ok {
            self.combobox.set_options(self.catalog.snapshot());
        }
        match self.combobox.finish_create(id, result) {
            Ok(()) if ok => {
                let label = self.combobox.selected_label().to_string();
                self.set_status(format!("Created {label}"), false);
            }
            Ok(()) => {}
            Err(e) => self.set_status(format!("Create failed: {e}"), true),
        }
        self.drain_notices();
    }

    /// Process create results delivered since the last call.
    pub fn drain_async(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            if let AppEvent::CreationFinished { id, result } = event {
                self.finish_create(id, result);
            }
        }
    }

    /// Act on the widget's outward notifications, as the owner.
    pub fn drain_notices(&mut self) {
        let notices: Vec<Notice> = self.notices.borrow_mut().drain(..).collect();
        for notice in notices {
            match notice {
                Notice::ValueChanged(value) => {
                    if self.combobox.is_controlled() {
                        if let Err(e) = self.combobox.set_controlled_value(value.as_deref()) {
                            self.set_status(e.to_string(), true);
                            continue;
                        }
                    }
                    match value {
                        Some(_) => {
                            let label = self.combobox.selected_label().to_string();
                            self.set_status(format!("Selected: {label}"), false);
                        }
                        None => self.set_status("Selection cleared", false),
                    }
                }
                Notice::OpenChanged(open) => {
                    tracing::debug!(open, "panel visibility changed");
                }
                Notice::CreateRequested(text) => {
                    self.set_status(format!("Creating \"{text}\"..."), false);
                }
            }
        }
    }

    /// Let widget timers fire.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.combobox.tick(now)
    }

    /// How long the event loop may block before the next timer is due.
    pub fn poll_timeout(&self, now: Instant, tick_rate: Duration) -> Duration {
        if self.combobox.viewport().is_animating() {
            return Duration::from_millis(30).min(tick_rate);
        }
        match self.combobox.next_deadline() {
            Some(deadline) => deadline.saturating_duration_since(now).min(tick_rate),
            None => tick_rate,
        }
    }

    /// Tear down the widget before leaving the event loop.
    pub fn quit(&mut self) {
        self.combobox.dispose();
        self.should_quit = true;
    }
}
