// Views module - screen-level rendering logic
//
// Every route maps to one page:
// - Lists: one paginated table per entity (customers … actions)
// - Facility: credit facility detail with its two tables
// - Not found: unknown paths, including disbursal links
//
// `draw` builds the shell around the page of the current route.

mod facility;
mod list;
mod modal;
mod records;

pub use facility::FacilityDetailView;
pub use list::{ListPage, ListView, Listing};
pub use records::customer_selection;

use crossterm::event::KeyEvent;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use tokio::sync::mpsc;

use super::app::{App, AppMessage};
use super::components::data_table::ActiveElement;
use super::router::{Route, ViewKind};
use super::traits::{Component, Handled, Interactive, Navigator, Page, RenderContext};
use crate::domain::{ApprovalProcess, Committee, CreditFacility, Customer, Deposit, Policy, Withdrawal};
use crate::theme::Theme;
use crate::tui::components;

const TITLE_HEIGHT: u16 = 3;
const LOGS_HEIGHT: u16 = 8;
const STATUS_HEIGHT: u16 = 2;

/// Every page the router can show
pub struct Pages {
    pub customers: ListView<Customer>,
    pub facilities: ListView<CreditFacility>,
    pub withdrawals: ListView<Withdrawal>,
    pub deposits: ListView<Deposit>,
    pub committees: ListView<Committee>,
    pub policies: ListView<Policy>,
    pub actions: ListView<ApprovalProcess>,
    /// Present while a facility route is current
    pub facility: Option<FacilityDetailView>,
    pub not_found: NotFoundPage,
}

impl Pages {
    pub fn new(page_size: u32, tx: &mpsc::Sender<AppMessage>, theme: &Theme) -> Self {
        Self {
            customers: ListView::new(page_size, tx.clone(), theme),
            facilities: ListView::new(page_size, tx.clone(), theme),
            withdrawals: ListView::new(page_size, tx.clone(), theme),
            deposits: ListView::new(page_size, tx.clone(), theme),
            committees: ListView::new(page_size, tx.clone(), theme),
            policies: ListView::new(page_size, tx.clone(), theme),
            actions: ListView::new(page_size, tx.clone(), theme),
            facility: None,
            not_found: NotFoundPage::default(),
        }
    }

    pub fn page_mut(&mut self, route: &Route) -> &mut dyn Page {
        match route {
            Route::List { kind, .. } => match kind {
                ViewKind::Customers => &mut self.customers,
                ViewKind::CreditFacilities => &mut self.facilities,
                ViewKind::Withdrawals => &mut self.withdrawals,
                ViewKind::Deposits => &mut self.deposits,
                ViewKind::Committees => &mut self.committees,
                ViewKind::Policies => &mut self.policies,
                ViewKind::Actions => &mut self.actions,
            },
            Route::CreditFacility(_) => match self.facility.as_mut() {
                Some(view) => view,
                None => &mut self.not_found,
            },
            Route::NotFound(_) => &mut self.not_found,
        }
    }

    pub fn list_mut(&mut self, kind: ViewKind) -> &mut dyn ListPage {
        match kind {
            ViewKind::Customers => &mut self.customers,
            ViewKind::CreditFacilities => &mut self.facilities,
            ViewKind::Withdrawals => &mut self.withdrawals,
            ViewKind::Deposits => &mut self.deposits,
            ViewKind::Committees => &mut self.committees,
            ViewKind::Policies => &mut self.policies,
            ViewKind::Actions => &mut self.actions,
        }
    }

    /// Whether the page behind `route` has a request in flight
    pub fn is_loading(&self, route: &Route) -> bool {
        match route {
            Route::List { kind, .. } => match kind {
                ViewKind::Customers => self.customers.is_loading(),
                ViewKind::CreditFacilities => self.facilities.is_loading(),
                ViewKind::Withdrawals => self.withdrawals.is_loading(),
                ViewKind::Deposits => self.deposits.is_loading(),
                ViewKind::Committees => self.committees.is_loading(),
                ViewKind::Policies => self.policies.is_loading(),
                ViewKind::Actions => self.actions.is_loading(),
            },
            Route::CreditFacility(_) => self.facility.as_ref().is_some_and(FacilityDetailView::is_loading),
            Route::NotFound(_) => false,
        }
    }

    /// Mark every list backed by `root` for refetch
    pub fn invalidate(&mut self, root: &str) {
        for kind in ViewKind::ALL {
            let list = self.list_mut(kind);
            if list.root() == root {
                tracing::debug!(view = kind.title(), "List invalidated");
                list.invalidate();
            }
        }
    }
}

/// Shown for paths no page handles
#[derive(Debug, Default)]
pub struct NotFoundPage {
    pub path: String,
}

impl Component for NotFoundPage {
    fn title(&self) -> String {
        " Not found ".to_string()
    }

    fn render(&mut self, f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(ctx.theme.border_type)
            .border_style(Style::default().fg(ctx.theme.border))
            .title(self.title());
        let lines = vec![
            Line::styled(format!("Nothing lives at {}", self.path), Style::default().fg(ctx.theme.foreground)),
            Line::raw(""),
            Line::styled("Esc: back", Style::default().fg(ctx.theme.muted)),
        ];
        f.render_widget(Paragraph::new(lines).block(block), area);
    }
}

impl Page for NotFoundPage {
    fn handle_key(&mut self, _key: KeyEvent, _active: &ActiveElement, _nav: &mut dyn Navigator) -> Handled {
        Handled::No
    }

    fn handle_click(&mut self, _column: u16, _row: u16, _nav: &mut dyn Navigator) -> Option<usize> {
        None
    }

    fn on_focus_change(&mut self, _active: &ActiveElement) {}

    fn tick(&mut self) -> Option<usize> {
        None
    }

    fn dispose(&mut self) {}

    fn focused_row(&self) -> Option<usize> {
        None
    }

    fn focus_hint(&self) -> &'static str {
        "Esc:back"
    }
}

/// Main UI render function - called on every frame
pub fn draw(f: &mut Frame, app: &mut App) {
    let bg_block = Block::default().style(Style::default().bg(app.theme.background));
    f.render_widget(bg_block, f.area());

    let logs_height = if app.show_logs { LOGS_HEIGHT } else { 0 };
    let [title_area, content_area, logs_area, status_area] = Layout::vertical([
        Constraint::Length(TITLE_HEIGHT),
        Constraint::Min(6),
        Constraint::Length(logs_height),
        Constraint::Length(STATUS_HEIGHT),
    ])
    .areas(f.area());

    components::title_bar::render(f, title_area, app);

    let no_modal = app.modal.is_none();
    let logs_focused = app.active == ActiveElement::Outside;
    let route = app.router.current().clone();

    app.content_area = Some(content_area);
    let ctx = RenderContext::new(&app.theme, no_modal && !logs_focused, app.animation_frame);
    let page = app.pages.page_mut(&route);
    page.render(f, content_area, &ctx);
    let hint = if logs_focused {
        app.logs_panel.focus_hint().unwrap_or_default()
    } else {
        page.focus_hint()
    };

    if app.show_logs {
        app.logs_area = Some(logs_area);
        let ctx = ctx.with_focus(no_modal && logs_focused);
        app.logs_panel.render(f, logs_area, &ctx);
    } else {
        app.logs_area = None;
    }

    components::status_bar::render(f, status_area, app, hint);

    if let Some(modal) = &app.modal {
        modal::render(f, modal, &RenderContext::new(&app.theme, true, app.animation_frame));
    }

    if let Some(toast) = &app.toast {
        let area = f.area();
        toast.render(f, area, &app.theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages() -> Pages {
        let (tx, _rx) = mpsc::channel(8);
        Pages::new(10, &tx, &Theme::default())
    }

    #[test]
    fn routes_resolve_to_pages() {
        let mut pages = pages();
        assert_eq!(
            pages.page_mut(&Route::list(ViewKind::Policies)).title(),
            " Policies (0) "
        );
        assert_eq!(
            pages.page_mut(&Route::CreditFacility("cf-1".into())).title(),
            " Not found ",
            "no detail view until the App creates one"
        );
        pages.facility = Some(FacilityDetailView::new("cf-1"));
        assert!(pages
            .page_mut(&Route::CreditFacility("cf-1".into()))
            .title()
            .contains("Credit Facility"));
    }

    #[test]
    fn invalidate_matches_root() {
        let mut pages = pages();
        assert_eq!(pages.list_mut(ViewKind::Actions).root(), "approvalProcesses");
        assert_eq!(pages.list_mut(ViewKind::Withdrawals).root(), "withdrawals");
        pages.invalidate("withdrawals");
        assert!(pages.list_mut(ViewKind::Withdrawals).needs_load());
    }
}
