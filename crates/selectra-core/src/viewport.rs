/// Scroll window over the filtered rows.
///
/// `scroll_into_view` uses the nearest-edge rule: the window only moves when
/// the row is outside it, and only far enough to reveal it. The move is
/// animated: `target` jumps, `offset` follows one row per `step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    offset: usize,
    target: usize,
    height: usize,
}

impl Viewport {
    pub fn new(height: usize) -> Self {
        Self {
            offset: 0,
            target: 0,
            height: height.max(1),
        }
    }

    /// Rendered first row.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// First row the window is moving toward.
    pub fn target(&self) -> usize {
        self.target
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_animating(&self) -> bool {
        self.offset != self.target
    }

    pub fn set_height(&mut self, height: usize) {
        self.height = height.max(1);
    }

    pub fn scroll_into_view(&mut self, index: usize) {
        if index < self.target {
            self.target = index;
        } else if index >= self.target + self.height {
            self.target = index + 1 - self.height;
        }
    }

    /// Keep the window inside a list of `len` rows.
    pub fn clamp(&mut self, len: usize) {
        let max = len.saturating_sub(self.height);
        self.target = self.target.min(max);
        self.offset = self.offset.min(max);
    }

    /// Advance the smooth transition by one row. Returns true while moving.
    pub fn step(&mut self) -> bool {
        if self.offset < self.target {
            self.offset += 1;
        } else if self.offset > self.target {
            self.offset -= 1;
        }
        self.is_animating()
    }

    pub fn reset(&mut self) {
        self.offset = 0;
        self.target = 0;
    }
}
