// Theme support for the TUI
//
// Two built-in palettes selected by `[ui] theme`. Both use the terminal's
// ANSI colours so they follow whatever scheme the terminal is set to.

use ratatui::style::Color;
use ratatui::widgets::BorderType;

/// Color palette for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    // Shell
    pub title: Color,
    pub status_bar: Color,
    pub border: Color,
    pub highlight: Color,
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,

    // Rows
    pub header: Color,
    pub selection: Color,
    pub selection_fg: Color,
    pub skeleton: Color,
    pub link: Color,

    // Severity
    pub success: Color,
    pub warning: Color,
    pub error: Color,

    pub border_type: BorderType,
}

impl Theme {
    /// Load theme by name; unknown names get the dark palette
    pub fn by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Apply the `use_theme_background` toggle
    pub fn with_background(mut self, use_theme_background: bool) -> Self {
        if !use_theme_background {
            self.background = Color::Reset;
        }
        self
    }

    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            title: Color::Cyan,
            status_bar: Color::Gray,
            border: Color::DarkGray,
            highlight: Color::Cyan,
            background: Color::Black,
            foreground: Color::White,
            muted: Color::DarkGray,
            header: Color::Yellow,
            selection: Color::Cyan,
            selection_fg: Color::Black,
            skeleton: Color::DarkGray,
            link: Color::LightBlue,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            border_type: BorderType::Rounded,
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            title: Color::Blue,
            status_bar: Color::DarkGray,
            border: Color::Gray,
            highlight: Color::Blue,
            background: Color::White,
            foreground: Color::Black,
            muted: Color::Gray,
            header: Color::Magenta,
            selection: Color::Blue,
            selection_fg: Color::White,
            skeleton: Color::Gray,
            link: Color::Blue,
            success: Color::Green,
            warning: Color::Rgb(176, 112, 0),
            error: Color::Red,
            border_type: BorderType::Plain,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}
