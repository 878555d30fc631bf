//! Core component trait - the foundation of the UI system

use crate::theme::Theme;
use ratatui::{layout::Rect, Frame};

/// Immutable context passed to components during rendering
///
/// Components only see what they need; no access to mutable app state.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// Color theme for styling
    pub theme: &'a Theme,

    /// Whether the component being drawn holds keyboard focus
    pub focused: bool,

    /// Animation frame counter (for spinners)
    pub animation_frame: usize,
}

impl<'a> RenderContext<'a> {
    pub fn new(theme: &'a Theme, focused: bool, animation_frame: usize) -> Self {
        Self {
            theme,
            focused,
            animation_frame,
        }
    }

    /// Same context with a different focus flag
    pub fn with_focus(self, focused: bool) -> Self {
        Self { focused, ..self }
    }

    /// Get spinner character for current animation frame
    pub fn spinner_char(&self) -> char {
        const SPINNER: [char; 4] = ['◐', '◓', '◑', '◒'];
        SPINNER[self.animation_frame % SPINNER.len()]
    }
}

/// Base trait for all UI components
///
/// Rendering takes `&mut self` because tables and panels record what they
/// drew (scroll position, row hit areas) for the next input event.
pub trait Component {
    /// Title used for borders and the status bar
    fn title(&self) -> String;

    /// Render the component to the given area
    fn render(&mut self, f: &mut Frame, area: Rect, ctx: &RenderContext);
}
