/// Keys the widget reacts to. Everything else passes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Enter,
    Other,
}

/// Whether a key was consumed by the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Handled,
    Ignored,
}

/// Highlighted row within the filtered set.
///
/// Always either `None` or a valid position for the length it was last
/// validated against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    highlighted: Option<usize>,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// Move highlight down (wraps).
    pub fn move_down(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            self.highlighted = None;
            return None;
        }
        self.highlighted = Some(match self.highlighted {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        });
        self.highlighted
    }

    /// Move highlight up (wraps).
    pub fn move_up(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            self.highlighted = None;
            return None;
        }
        self.highlighted = Some(match self.highlighted {
            Some(0) | None => len - 1,
            Some(i) => (i - 1).min(len - 1),
        });
        self.highlighted
    }

    /// Point at `index` directly, e.g. on pointer hover.
    pub fn set(&mut self, index: usize, len: usize) -> Option<usize> {
        self.highlighted = (index < len).then_some(index);
        self.highlighted
    }

    /// Drop a highlight that no longer fits a filtered set of `len` rows.
    pub fn revalidate(&mut self, len: usize) {
        if self.highlighted.is_some_and(|i| i >= len) {
            self.highlighted = None;
        }
    }

    pub fn clear(&mut self) {
        self.highlighted = None;
    }
}
