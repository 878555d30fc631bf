//! Keyboard focus state machine for the data table
//!
//! ```text
//!            data ready / focus fell to Body           ↑ ↓ (clamped)
//!  Unfocused ───────────────────────────▶ Focused(i) ◀───────┐
//!      ▲        (deferred one tick)           │  └────────────┘
//!      └──────────────────────────────────────┘
//!              focus moved outside the table
//! ```
//!
//! The shell tracks which widget holds keyboard focus as an
//! [`ActiveElement`] and reports every change here.

/// Kinds of interactive control that keep their own keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Input,
    Textarea,
    Select,
    Button,
}

/// What currently holds keyboard focus in the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveElement {
    /// Nothing at all
    #[default]
    Nothing,
    /// The page background; nothing interactive
    Body,
    /// A row of the table
    TableRow(usize),
    /// A control; `in_table` when it lives inside a table row
    Control { kind: ControlKind, in_table: bool },
    /// Some other widget outside the table
    Outside,
}

impl ActiveElement {
    pub fn is_control(&self) -> bool {
        matches!(self, Self::Control { .. })
    }
}

/// Focus state of one table
#[derive(Debug, Clone, Default)]
pub struct FocusState {
    /// `None` is the unfocused -1 index
    focused_row_index: Option<usize>,
    is_table_focused: bool,
    /// Last row that held focus, restored by auto-focus
    last_known: Option<usize>,
    /// Deferred auto-focus waiting for the next tick
    pending_auto_focus: bool,
    /// Whether the last sync saw loaded, non-empty data
    was_ready: bool,
    /// A widget outside the table holds focus
    held_elsewhere: bool,
    row_count: usize,
}

impl FocusState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current data shape; call on every frame
    ///
    /// Data turning non-empty with loading finished schedules auto-focus
    /// once per transition, unless focus is held outside the table.
    pub fn sync(&mut self, len: usize, loading: bool) {
        self.row_count = len;

        let ready = len > 0 && !loading;
        if ready && !self.was_ready && !self.held_elsewhere {
            self.pending_auto_focus = true;
        }
        self.was_ready = ready;

        if let Some(i) = self.focused_row_index {
            if len == 0 {
                self.blur();
            } else if i >= len {
                self.focused_row_index = Some(len - 1);
                self.last_known = self.focused_row_index;
            }
        }
    }

    /// React to the shell's active element changing
    pub fn on_focus_change(&mut self, active: &ActiveElement) {
        match *active {
            ActiveElement::TableRow(i) if i < self.row_count => {
                self.held_elsewhere = false;
                self.pending_auto_focus = false;
                self.focus(i);
            }
            ActiveElement::TableRow(_) => {}
            ActiveElement::Control { in_table: true, .. } => {}
            ActiveElement::Control { in_table: false, .. } | ActiveElement::Outside => {
                self.blur();
                self.held_elsewhere = true;
                self.pending_auto_focus = false;
            }
            ActiveElement::Body | ActiveElement::Nothing => {
                self.blur();
                self.held_elsewhere = false;
                self.pending_auto_focus = true;
            }
        }
    }

    /// Fire a pending auto-focus; returns the row that claimed focus
    pub fn tick(&mut self) -> Option<usize> {
        if !std::mem::take(&mut self.pending_auto_focus) || self.row_count == 0 {
            return None;
        }
        let index = self.last_known.unwrap_or(0).min(self.row_count - 1);
        self.focus(index);
        Some(index)
    }

    /// Cancel any pending auto-focus
    pub fn dispose(&mut self) {
        self.pending_auto_focus = false;
    }

    /// Prefer `index` the next time auto-focus fires
    pub fn remember(&mut self, index: usize) {
        self.last_known = Some(index);
    }

    /// Move up one row; `None` when not focused or already at the top
    pub fn move_up(&mut self) -> Option<usize> {
        match self.current() {
            Some(i) if i > 0 => {
                self.focus(i - 1);
                Some(i - 1)
            }
            _ => None,
        }
    }

    /// Move down one row; `None` when not focused or already at the bottom
    pub fn move_down(&mut self) -> Option<usize> {
        match self.current() {
            Some(i) if i + 1 < self.row_count => {
                self.focus(i + 1);
                Some(i + 1)
            }
            _ => None,
        }
    }

    /// Focused row, only while the table holds focus
    pub fn current(&self) -> Option<usize> {
        if self.is_table_focused {
            self.focused_row_index
        } else {
            None
        }
    }

    pub fn is_table_focused(&self) -> bool {
        self.is_table_focused
    }

    /// The raw index with -1 for "none"
    pub fn focused_row_index(&self) -> isize {
        self.focused_row_index.map_or(-1, |i| i as isize)
    }

    #[cfg(test)]
    pub fn has_pending_auto_focus(&self) -> bool {
        self.pending_auto_focus
    }

    pub fn focus(&mut self, index: usize) {
        self.focused_row_index = Some(index);
        self.is_table_focused = true;
        self.last_known = Some(index);
    }

    fn blur(&mut self) {
        self.focused_row_index = None;
        self.is_table_focused = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn focused_at(len: usize, index: usize) -> FocusState {
        let mut state = FocusState::new();
        state.sync(len, false);
        state.on_focus_change(&ActiveElement::TableRow(index));
        state
    }

    #[test]
    fn data_arrival_schedules_one_auto_focus() {
        let mut state = FocusState::new();
        state.sync(0, true);
        assert!(!state.has_pending_auto_focus());

        state.sync(3, true);
        assert!(!state.has_pending_auto_focus(), "still loading");

        state.sync(3, false);
        assert!(state.has_pending_auto_focus());
        assert!(!state.is_table_focused(), "deferred until tick");

        assert_eq!(state.tick(), Some(0));
        assert!(state.is_table_focused());

        // Same data on the next frame does not re-arm
        state.sync(3, false);
        assert_eq!(state.tick(), None);
    }

    #[test]
    fn focus_falling_to_body_restores_last_row() {
        let mut state = focused_at(5, 3);
        state.on_focus_change(&ActiveElement::Body);
        assert_eq!(state.focused_row_index(), -1);
        assert_eq!(state.tick(), Some(3));
        assert_eq!(state.current(), Some(3));
    }

    #[test]
    fn auto_focus_clamps_to_row_count() {
        let mut state = focused_at(5, 4);
        state.on_focus_change(&ActiveElement::Nothing);
        state.sync(2, false);
        assert_eq!(state.tick(), Some(1));
    }

    #[test]
    fn leaving_the_table_resets_index() {
        let mut state = focused_at(5, 2);
        state.on_focus_change(&ActiveElement::Outside);
        assert!(!state.is_table_focused());
        assert_eq!(state.focused_row_index(), -1);
        assert_eq!(state.tick(), None);

        let mut state = focused_at(5, 2);
        state.on_focus_change(&ActiveElement::Control {
            kind: ControlKind::Input,
            in_table: false,
        });
        assert_eq!(state.focused_row_index(), -1);
        assert_eq!(state.tick(), None);
    }

    #[test]
    fn leaving_cancels_auto_focus_scheduled_by_data() {
        let mut state = FocusState::new();
        state.sync(3, false);
        assert!(state.has_pending_auto_focus());

        state.on_focus_change(&ActiveElement::Outside);
        assert_eq!(state.tick(), None);
        assert!(!state.is_table_focused());
    }

    #[test]
    fn data_arriving_while_focus_is_elsewhere_waits_for_body() {
        let mut state = FocusState::new();
        state.on_focus_change(&ActiveElement::Outside);
        state.sync(0, true);
        state.sync(4, false);
        assert!(!state.has_pending_auto_focus());
        assert_eq!(state.tick(), None);

        state.on_focus_change(&ActiveElement::Body);
        assert_eq!(state.tick(), Some(0));
    }

    #[test]
    fn in_table_control_keeps_focus() {
        let mut state = focused_at(5, 2);
        state.on_focus_change(&ActiveElement::Control {
            kind: ControlKind::Button,
            in_table: true,
        });
        assert_eq!(state.current(), Some(2));
    }

    #[test]
    fn arrows_clamp_at_both_ends() {
        let mut state = focused_at(3, 0);
        assert_eq!(state.move_up(), None);
        assert_eq!(state.current(), Some(0));

        assert_eq!(state.move_down(), Some(1));
        assert_eq!(state.move_down(), Some(2));
        assert_eq!(state.move_down(), None);
        assert_eq!(state.current(), Some(2));
    }

    #[test]
    fn dispose_cancels_pending() {
        let mut state = FocusState::new();
        state.sync(4, false);
        state.dispose();
        assert_eq!(state.tick(), None);
        assert!(!state.is_table_focused());
    }

    #[test]
    fn remembered_row_wins_over_zero() {
        let mut state = FocusState::new();
        state.remember(2);
        state.sync(4, false);
        assert_eq!(state.tick(), Some(2));
    }

    #[test]
    fn shrinking_data_clamps_focus() {
        let mut state = focused_at(5, 4);
        state.sync(2, false);
        assert_eq!(state.current(), Some(1));
        state.sync(0, false);
        assert_eq!(state.focused_row_index(), -1);
    }
}
