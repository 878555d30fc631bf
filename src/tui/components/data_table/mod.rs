//! Generic keyboard-navigable data table
//!
//! The table borrows its rows on every call and never owns them. Pages keep
//! the data (usually in a `Pager`) and pass `&[T]` to `render`,
//! `handle_key` and `handle_click`.
//!
//! Wide areas get a classic table with a header row; areas narrower than
//! the `Normal` breakpoint get one card per record. Keyboard navigation
//! only exists in the table layout.

mod column;
mod focus;
mod render;

pub use column::{Align, CellValue, Column, Record};
pub use focus::{ActiveElement, ControlKind, FocusState};

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Position, Rect};
use ratatui::text::Line;

use crate::tui::scroll::ScrollState;
use crate::tui::traits::{Handled, Navigator};

/// Placeholder rows shown while the first page loads
pub const SKELETON_ROWS: usize = 5;

/// Row activation callback
pub type RowCallback<T> = Box<dyn Fn(&T)>;

/// Per-row navigation target; `None` or `""` hides the View cell
pub type NavTarget<T> = Box<dyn Fn(&T) -> Option<String>>;

/// Which of the three bodies to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Body {
    /// Placeholder rows; `cells` per row
    Skeleton { rows: usize, cells: usize },
    Empty,
    Rows,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableLayout {
    #[default]
    Desktop,
    Mobile,
}

/// Clickable region recorded at render time
#[derive(Debug, Clone, Copy)]
struct Hit {
    area: Rect,
    index: usize,
    /// The "View →" cell rather than the whole row
    view: bool,
}

pub struct DataTable<T: Record> {
    columns: Vec<Column<T>>,
    focus: FocusState,
    scroll: ScrollState,
    on_row_click: Option<RowCallback<T>>,
    navigate_to: Option<NavTarget<T>>,
    empty_message: Line<'static>,
    layout: TableLayout,
    hits: Vec<Hit>,
}

impl<T: Record> DataTable<T> {
    pub fn new(columns: Vec<Column<T>>) -> Self {
        Self {
            columns,
            focus: FocusState::new(),
            scroll: ScrollState::manual(),
            on_row_click: None,
            navigate_to: None,
            empty_message: Line::raw("No data"),
            layout: TableLayout::Desktop,
            hits: Vec::new(),
        }
    }

    pub fn on_row_click(mut self, callback: impl Fn(&T) + 'static) -> Self {
        self.on_row_click = Some(Box::new(callback));
        self
    }

    pub fn navigate_to(mut self, target: impl Fn(&T) -> Option<String> + 'static) -> Self {
        self.navigate_to = Some(Box::new(target));
        self
    }

    pub fn empty_message(mut self, message: impl Into<Line<'static>>) -> Self {
        self.empty_message = message.into();
        self
    }

    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    pub fn focus(&self) -> &FocusState {
        &self.focus
    }

    pub fn layout(&self) -> TableLayout {
        self.layout
    }

    /// Focused row while the table holds focus
    pub fn focused_row(&self) -> Option<usize> {
        self.focus.current()
    }

    /// Body for the given data shape
    pub fn body(&self, len: usize, loading: bool) -> Body {
        match (len, loading) {
            (0, true) => Body::Skeleton {
                rows: SKELETON_ROWS,
                cells: self.cell_count(),
            },
            (0, false) => Body::Empty,
            _ => Body::Rows,
        }
    }

    /// Cells per row including the trailing View cell
    pub fn cell_count(&self) -> usize {
        self.columns.len() + usize::from(self.navigate_to.is_some())
    }

    /// Non-empty navigation target for `row`
    pub fn target(&self, row: &T) -> Option<String> {
        self.navigate_to
            .as_ref()
            .and_then(|target| target(row))
            .filter(|path| !path.is_empty())
    }

    pub fn sync(&mut self, len: usize, loading: bool) {
        self.focus.sync(len, loading);
    }

    pub fn on_focus_change(&mut self, active: &ActiveElement) {
        self.focus.on_focus_change(active);
        if let Some(i) = self.focus.current() {
            self.scroll.ensure_visible(i);
        }
    }

    /// Fire the deferred auto-focus
    pub fn tick(&mut self) -> Option<usize> {
        let index = self.focus.tick()?;
        self.scroll.ensure_visible(index);
        Some(index)
    }

    pub fn dispose(&mut self) {
        self.focus.dispose();
    }

    /// Preselect `index` for the next auto-focus
    pub fn remember(&mut self, index: usize) {
        self.focus.remember(index);
    }

    pub fn handle_key(
        &mut self,
        key: KeyEvent,
        data: &[T],
        active: &ActiveElement,
        nav: &mut dyn Navigator,
    ) -> Handled {
        if active.is_control() || self.layout == TableLayout::Mobile || data.is_empty() {
            return Handled::No;
        }
        let Some(current) = self.focus.current() else {
            return Handled::No;
        };

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                if let Some(i) = self.focus.move_up() {
                    self.scroll.ensure_visible(i);
                }
                Handled::Yes
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if let Some(i) = self.focus.move_down() {
                    self.scroll.ensure_visible(i);
                }
                Handled::Yes
            }
            KeyCode::Enter => match data.get(current) {
                Some(row) => self.activate(row, nav).into(),
                None => Handled::No,
            },
            _ => Handled::No,
        }
    }

    /// Click at terminal cell (`column`, `row`); returns the row it focused
    pub fn handle_click(
        &mut self,
        column: u16,
        row: u16,
        data: &[T],
        nav: &mut dyn Navigator,
    ) -> Option<usize> {
        let position = Position::new(column, row);
        let hit = self
            .hits
            .iter()
            .filter(|hit| hit.area.contains(position))
            .max_by_key(|hit| hit.view)
            .copied()?;
        let record = data.get(hit.index)?;

        self.focus.focus(hit.index);
        if hit.view {
            if let Some(path) = self.target(record) {
                nav.navigate(&path);
            }
        } else if let Some(callback) = &self.on_row_click {
            callback(record);
        }
        Some(hit.index)
    }

    /// Enter on a row: the click callback wins over navigation
    fn activate(&self, row: &T, nav: &mut dyn Navigator) -> bool {
        if let Some(callback) = &self.on_row_click {
            callback(row);
            return true;
        }
        match self.target(row) {
            Some(path) => {
                nav.navigate(&path);
                true
            }
            None => false,
        }
    }
}

impl<T: Record> Drop for DataTable<T> {
    fn drop(&mut self) {
        self.dispose();
    }
}
