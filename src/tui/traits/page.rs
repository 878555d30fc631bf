//! Routed screens and the navigation contract

use super::{Component, Handled};
use crate::tui::components::data_table::ActiveElement;
use crossterm::event::KeyEvent;

/// Receives client-side navigation requests (`/credit-facilities/<id>`)
pub trait Navigator {
    fn navigate(&mut self, path: &str);
}

/// A screen the router can show
///
/// Pages own their tables. The App forwards focus changes and ticks only to
/// the page of the current route, so at most one table is ever focused.
pub trait Page: Component {
    fn handle_key(
        &mut self,
        key: KeyEvent,
        active: &ActiveElement,
        nav: &mut dyn Navigator,
    ) -> Handled;

    /// Pointer click at terminal cell (`column`, `row`); returns the row it focused
    fn handle_click(&mut self, column: u16, row: u16, nav: &mut dyn Navigator) -> Option<usize>;

    /// The shell's active element changed
    fn on_focus_change(&mut self, active: &ActiveElement);

    /// Fire deferred work; returns a row index that claimed focus
    fn tick(&mut self) -> Option<usize>;

    /// Page is being left; cancel anything pending
    fn dispose(&mut self);

    /// Row currently focused in the page's active table
    fn focused_row(&self) -> Option<usize>;

    /// Keybind hints for the status bar
    fn focus_hint(&self) -> &'static str;
}
