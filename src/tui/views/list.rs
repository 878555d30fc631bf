//! Paginated list screens
//!
//! One `ListView` per entity. The view owns the accumulated pages and the
//! table that displays them; the App starts requests and feeds results back
//! through `apply`.

use crossterm::event::KeyEvent;
use ratatui::{
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Block, Borders},
    Frame,
};
use tokio::sync::mpsc;

use super::Pages;
use crate::graphql::{ClientError, ListOperation, PageArgs, Pager};
use crate::theme::Theme;
use crate::tui::app::{AppMessage, PageResult};
use crate::tui::components::data_table::{ActiveElement, DataTable, Record};
use crate::tui::router::ViewKind;
use crate::tui::traits::{Component, Handled, Navigator, Page, RenderContext};

/// A row type with its own list screen
pub trait Listing: Record + Send + Sized + 'static {
    type Op: ListOperation<Node = Self> + 'static;
    const KIND: ViewKind;

    /// Stable id; `/customers/<id>` style routes preselect by it
    fn id(&self) -> &str;

    fn wrap(page: PageResult<Self>) -> AppMessage;

    fn table(tx: mpsc::Sender<AppMessage>, theme: &Theme) -> DataTable<Self>;

    fn view(pages: &mut Pages) -> &mut ListView<Self>;

    fn hint() -> &'static str {
        "↑↓:move  Enter:open"
    }
}

/// Type-erased operations the App needs on every list
pub trait ListPage: Page {
    fn needs_load(&self) -> bool;
    fn is_loading(&self) -> bool;
    fn has_more(&self) -> bool;
    /// Root field of the backing query, for cache invalidation
    fn root(&self) -> &'static str;
    /// Mark loaded pages stale so the next visit refetches
    fn invalidate(&mut self);
    fn preselect(&mut self, id: Option<String>);
}

pub struct ListView<T: Listing> {
    pager: Pager<T>,
    loading: bool,
    table: DataTable<T>,
    /// Row id to focus once it shows up
    preselect: Option<String>,
}

impl<T: Listing> ListView<T> {
    pub fn new(page_size: u32, tx: mpsc::Sender<AppMessage>, theme: &Theme) -> Self {
        Self {
            pager: Pager::new(page_size),
            loading: false,
            table: T::table(tx, theme),
            preselect: None,
        }
    }

    /// Mark a request in flight; `None` when there is no further page
    pub fn begin_load(&mut self, append: bool) -> Option<PageArgs> {
        let args = if append {
            self.pager.next_page()?
        } else {
            self.pager.first_page()
        };
        self.loading = true;
        Some(args)
    }

    /// Store a finished request; returns the number of rows received
    pub fn apply(&mut self, page: PageResult<T>) -> Result<usize, ClientError> {
        self.loading = false;
        let connection = page.result?;
        let received = connection.edges.len();
        if page.append {
            self.pager.append(connection);
        } else {
            self.pager.reset(connection);
        }
        self.apply_preselect();
        self.table.sync(self.pager.items().len(), false);
        Ok(received)
    }

    pub fn items(&self) -> &[T] {
        self.pager.items()
    }

    pub fn focused_item(&self) -> Option<&T> {
        self.table.focused_row().and_then(|i| self.pager.items().get(i))
    }

    fn apply_preselect(&mut self) {
        let Some(id) = self.preselect.as_deref() else {
            return;
        };
        if let Some(index) = self.pager.items().iter().position(|row| row.id() == id) {
            self.table.remember(index);
            self.preselect = None;
        }
    }
}

impl<T: Listing> Component for ListView<T> {
    fn title(&self) -> String {
        let count = self.pager.items().len();
        let more = if self.pager.has_next_page() { "+" } else { "" };
        format!(" {} ({}{}) ", T::KIND.title(), count, more)
    }

    fn render(&mut self, f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let border = if ctx.focused {
            ctx.theme.highlight
        } else {
            ctx.theme.border
        };
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_type(ctx.theme.border_type)
            .border_style(Style::default().fg(border))
            .title(self.title());
        if self.loading {
            block = block.title_bottom(Line::from(format!(" {} loading ", ctx.spinner_char())).right_aligned());
        } else if self.pager.has_next_page() {
            block = block.title_bottom(Line::from(" n: next page ").right_aligned());
        }

        let inner = block.inner(area);
        f.render_widget(block, area);
        self.table
            .render(f, inner, ctx, self.pager.items(), self.loading);
    }
}

impl<T: Listing> Page for ListView<T> {
    fn handle_key(&mut self, key: KeyEvent, active: &ActiveElement, nav: &mut dyn Navigator) -> Handled {
        self.table.handle_key(key, self.pager.items(), active, nav)
    }

    fn handle_click(&mut self, column: u16, row: u16, nav: &mut dyn Navigator) -> Option<usize> {
        self.table.handle_click(column, row, self.pager.items(), nav)
    }

    fn on_focus_change(&mut self, active: &ActiveElement) {
        self.table.on_focus_change(active);
    }

    fn tick(&mut self) -> Option<usize> {
        self.table.tick()
    }

    fn dispose(&mut self) {
        self.table.dispose();
    }

    fn focused_row(&self) -> Option<usize> {
        self.table.focused_row()
    }

    fn focus_hint(&self) -> &'static str {
        T::hint()
    }
}

impl<T: Listing> ListPage for ListView<T> {
    fn needs_load(&self) -> bool {
        !self.pager.is_loaded() && !self.loading
    }

    fn is_loading(&self) -> bool {
        self.loading
    }

    fn has_more(&self) -> bool {
        self.pager.has_next_page()
    }

    fn root(&self) -> &'static str {
        T::Op::OPERATION.root
    }

    fn invalidate(&mut self) {
        self.pager.mark_stale();
    }

    fn preselect(&mut self, id: Option<String>) {
        self.preselect = id;
        self.apply_preselect();
    }
}
