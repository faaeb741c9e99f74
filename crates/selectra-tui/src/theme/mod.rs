use ratatui::style::Color;

pub struct NordTheme {
    // Polar Night
    pub nord0: Color, // #2E3440 - panel background
    pub nord1: Color, // #3B4252 - highlighted row
    pub nord2: Color, // #4C566A - borders
    pub nord3: Color, // #616E88 - placeholder, hints

    // Snow Storm
    pub nord4: Color, // #D8DEE9 - body text
    pub nord6: Color, // #ECEFF4 - cursor

    // Frost
    pub nord8: Color,  // #88C0D0 - focused border
    pub nord10: Color, // #5E81AC - highlighted row accent

    // Aurora
    pub nord11: Color, // #BF616A - errors
    pub nord13: Color, // #EBCB8B - loading
    pub nord14: Color, // #A3BE8C - selected value, create affordance
}

impl Default for NordTheme {
    fn default() -> Self {
        Self {
            nord0: Color::Rgb(46, 52, 64),
            nord1: Color::Rgb(59, 66, 82),
            nord2: Color::Rgb(76, 86, 106),
            nord3: Color::Rgb(97, 110, 136),
            nord4: Color::Rgb(216, 222, 233),
            nord6: Color::Rgb(236, 239, 244),
            nord8: Color::Rgb(136, 192, 208),
            nord10: Color::Rgb(94, 129, 172),
            nord11: Color::Rgb(191, 97, 106),
            nord13: Color::Rgb(235, 203, 139),
            nord14: Color::Rgb(163, 190, 140),
        }
    }
}

impl NordTheme {
    // Semantic aliases
    pub fn bg(&self) -> Color {
        self.nord0
    }
    pub fn bg_secondary(&self) -> Color {
        self.nord1
    }
    pub fn border(&self) -> Color {
        self.nord2
    }
    pub fn muted(&self) -> Color {
        self.nord3
    }
    pub fn fg(&self) -> Color {
        self.nord4
    }
    pub fn fg_white(&self) -> Color {
        self.nord6
    }
    pub fn frost_ice(&self) -> Color {
        self.nord8
    }
    pub fn frost_dark(&self) -> Color {
        self.nord10
    }
    pub fn red(&self) -> Color {
        self.nord11
    }
    pub fn yellow(&self) -> Color {
        self.nord13
    }
    pub fn green(&self) -> Color {
        self.nord14
    }

    // Logic aliases
    pub fn highlight_bg(&self) -> Color {
        self.frost_dark()
    }
    pub fn active_border(&self) -> Color {
        self.frost_ice()
    }
    pub fn danger(&self) -> Color {
        self.red()
    }
    pub fn success(&self) -> Color {
        self.green()
    }
    pub fn warning(&self) -> Color {
        self.yellow()
    }
}
