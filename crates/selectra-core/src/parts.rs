//! Compound parts over a shared [`Combobox`].
//!
//! A [`Scope`] injects the controller into cooperating parts. Each part reads
//! the shared state and performs only its own mutation: the trigger toggles
//! the panel, an item commits its value. Resolving a part from a detached
//! scope is a programmer error, reported as [`MisuseError::MissingContext`].

use std::time::Instant;

use crate::combobox::Combobox;
use crate::error::MisuseError;
use crate::option::ComboOption;

/// Injection point for compound parts.
#[derive(Debug)]
pub struct Scope<'a> {
    combobox: Option<&'a mut Combobox>,
}

impl<'a> Scope<'a> {
    pub fn new(combobox: &'a mut Combobox) -> Self {
        Self {
            combobox: Some(combobox),
        }
    }

    /// A scope with no controller behind it.
    pub fn detached() -> Self {
        Self { combobox: None }
    }

    fn require(&mut self, part: &'static str) -> Result<&mut Combobox, MisuseError> {
        self.combobox
            .as_deref_mut()
            .ok_or(MisuseError::MissingContext { part })
    }

    pub fn trigger(&mut self) -> Result<Trigger<'_>, MisuseError> {
        Ok(Trigger {
            combobox: self.require("Trigger")?,
        })
    }

    pub fn content(&mut self) -> Result<Content<'_>, MisuseError> {
        Ok(Content {
            combobox: self.require("Content")?,
        })
    }

    pub fn item(&mut self, value: impl Into<String>) -> Result<Item<'_>, MisuseError> {
        Ok(Item {
            combobox: self.require("Item")?,
            value: value.into(),
        })
    }
}

/// Button that opens and closes the panel.
#[derive(Debug)]
pub struct Trigger<'a> {
    combobox: &'a mut Combobox,
}

impl Trigger<'_> {
    pub fn expanded(&self) -> bool {
        self.combobox.is_open()
    }

    pub fn disabled(&self) -> bool {
        self.combobox.is_disabled()
    }

    pub fn label(&self) -> &str {
        self.combobox.selected_label()
    }

    pub fn activate(&mut self, now: Instant) {
        if !self.disabled() {
            self.combobox.toggle(now);
        }
    }
}

/// The panel listing visible options. Renders nothing while closed.
#[derive(Debug)]
pub struct Content<'a> {
    combobox: &'a Combobox,
}

impl Content<'_> {
    pub fn is_rendered(&self) -> bool {
        self.combobox.is_open()
    }

    /// Visible options, empty while closed.
    pub fn options(&self) -> Vec<&ComboOption> {
        if !self.is_rendered() {
            return Vec::new();
        }
        self.combobox.visible().map(|(_, option)| option).collect()
    }
}

/// One option row.
#[derive(Debug)]
pub struct Item<'a> {
    combobox: &'a mut Combobox,
    value: String,
}

impl Item<'_> {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_selected(&self) -> bool {
        self.combobox.selected_value() == Some(self.value.as_str())
    }

    pub fn is_highlighted(&self) -> bool {
        self.combobox
            .highlighted_option()
            .is_some_and(|option| option.value == self.value)
    }

    /// Commit this item's value.
    pub fn commit(&mut self) -> bool {
        self.combobox.select(&self.value)
    }
}
