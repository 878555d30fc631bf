//! Credit facility detail page
//!
//! Summary of balances and threshold prices on top, then two tables
//! (disbursals and history). Only one table holds keyboard focus; `t`
//! hands it to the other.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::records::{disbursal_columns, history_columns, state_color};
use crate::domain::{ApprovalProcess, CreditFacilityDetail, Disbursal, FacilityHistoryEntry};
use crate::finance::{self, CvlStatus};
use crate::graphql::operations::CreditFacilityResult;
use crate::graphql::ClientError;
use crate::money::{ConversionError, UsdCents};
use crate::theme::Theme;
use crate::tui::components::data_table::{ActiveElement, DataTable};
use crate::tui::traits::{Component, Handled, Navigator, Page, RenderContext};

const SUMMARY_HEIGHT: u16 = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacilityTable {
    Disbursals,
    History,
}

pub struct FacilityDetailView {
    id: String,
    detail: Option<CreditFacilityDetail>,
    /// Latest BTC price, for the collateral's USD value
    price: Option<UsdCents>,
    loading: bool,
    /// Request finished; `detail == None` then means the id is unknown
    loaded: bool,
    error: Option<String>,
    disbursals: DataTable<Disbursal>,
    history: DataTable<FacilityHistoryEntry>,
    active_table: FacilityTable,
}

impl FacilityDetailView {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            detail: None,
            price: None,
            loading: false,
            loaded: false,
            error: None,
            disbursals: DataTable::new(disbursal_columns()).empty_message("No disbursals"),
            history: DataTable::new(history_columns()).empty_message("No history"),
            active_table: FacilityTable::Disbursals,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn begin_load(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn apply(&mut self, result: Result<CreditFacilityResult, ClientError>, price: Option<UsdCents>) {
        self.loading = false;
        self.loaded = true;
        match result {
            Ok(detail) => {
                self.detail = detail;
                self.price = price.or(self.price);
            }
            Err(e) => self.error = Some(e.summary()),
        }
        let (disbursals, history) = self.lengths();
        self.disbursals.sync(disbursals, false);
        self.history.sync(history, false);
    }

    pub fn detail(&self) -> Option<&CreditFacilityDetail> {
        self.detail.as_ref()
    }

    /// Approval process still waiting on the current user
    pub fn pending_decision(&self) -> Option<&ApprovalProcess> {
        self.detail
            .as_ref()?
            .approval_process
            .as_ref()
            .filter(|p| p.is_actionable())
    }

    pub fn active_table(&self) -> FacilityTable {
        self.active_table
    }

    fn lengths(&self) -> (usize, usize) {
        self.detail
            .as_ref()
            .map_or((0, 0), |d| (d.disbursals.len(), d.history.len()))
    }

    fn switch_table(&mut self) {
        let (leaving, entering) = match self.active_table {
            FacilityTable::Disbursals => (FacilityTable::Disbursals, FacilityTable::History),
            FacilityTable::History => (FacilityTable::History, FacilityTable::Disbursals),
        };
        self.table_focus(leaving, &ActiveElement::Outside);
        self.active_table = entering;
        self.table_focus(entering, &ActiveElement::Body);
    }

    fn table_focus(&mut self, table: FacilityTable, active: &ActiveElement) {
        match table {
            FacilityTable::Disbursals => self.disbursals.on_focus_change(active),
            FacilityTable::History => self.history.on_focus_change(active),
        }
    }

    fn summary_lines(&self, detail: &CreditFacilityDetail, theme: &Theme) -> Vec<Line<'static>> {
        let label = Style::default().fg(theme.muted);
        let value = Style::default().fg(theme.foreground);
        let pair = |name: &str, text: String| {
            vec![
                Span::styled(format!("{:<18}", name), label),
                Span::styled(format!("{:<22}", text), value),
            ]
        };
        let money = |result: Result<UsdCents, ConversionError>| match result {
            Ok(cents) => cents.to_string(),
            Err(_) => "-".to_string(),
        };

        let terms = &detail.credit_facility_terms;
        let cvl_color = match detail.cvl_status() {
            CvlStatus::Healthy => theme.success,
            CvlStatus::MarginCall => theme.warning,
            CvlStatus::Liquidation => theme.error,
        };
        let collateral_usd = match self.price {
            Some(price) => money(finance::collateral_value(detail.collateral(), price)),
            None => "price unavailable".to_string(),
        };

        let mut lines = vec![
            Line::from(vec![
                Span::styled(
                    detail.customer.email.clone(),
                    Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
                ),
                Span::styled("  ·  ", label),
                Span::styled(detail.status.label(), value),
                Span::styled("  ·  ", label),
                Span::styled(
                    detail.collateralization_state.label(),
                    Style::default().fg(state_color(detail.collateralization_state, theme)),
                ),
            ]),
            Line::default(),
            Line::from(
                [
                    pair("Facility", detail.facility_amount.to_string()),
                    pair("Outstanding", detail.outstanding().to_string()),
                ]
                .concat(),
            ),
            Line::from(
                [
                    pair("Collateral", detail.collateral().to_string()),
                    pair("Collateral value", collateral_usd),
                ]
                .concat(),
            ),
            Line::from(
                [
                    vec![
                        Span::styled(format!("{:<18}", "Current CVL"), label),
                        Span::styled(
                            format!("{:<22}", format!("{} ({})", detail.current_cvl, detail.cvl_status().label())),
                            Style::default().fg(cvl_color),
                        ),
                    ],
                    pair(
                        "Thresholds",
                        format!(
                            "{} / {} / {}",
                            terms.initial_cvl, terms.margin_call_cvl, terms.liquidation_cvl
                        ),
                    ),
                ]
                .concat(),
            ),
            Line::from(
                [
                    pair("Margin call price", money(detail.margin_call_price())),
                    pair("Liquidation price", money(detail.liquidation_price())),
                ]
                .concat(),
            ),
            Line::from(
                [
                    pair("Base amount", detail.base_amount().to_string()),
                    pair("Total cost", money(detail.total_cost())),
                ]
                .concat(),
            ),
            Line::from(
                [
                    pair("Annual rate", format!("{}%", terms.annual_rate.normalize())),
                    pair("One-time fee", format!("{}%", terms.one_time_fee_rate.normalize())),
                ]
                .concat(),
            ),
        ];

        if let Some(matures_at) = detail.matures_at {
            lines.push(Line::from(pair(
                "Matures",
                matures_at.format("%Y-%m-%d").to_string(),
            )));
        }

        if let Some(process) = &detail.approval_process {
            let (text, color) = if process.is_actionable() {
                ("awaiting your decision (a)".to_string(), theme.warning)
            } else {
                (format!("{:?}", process.status).to_lowercase(), theme.muted)
            };
            lines.push(Line::from(vec![
                Span::styled(format!("{:<18}", "Approval"), label),
                Span::styled(text, Style::default().fg(color)),
            ]));
        }

        lines
    }

    fn render_table_block(
        &self,
        f: &mut Frame,
        area: Rect,
        ctx: &RenderContext,
        title: &str,
        focused: bool,
    ) -> Rect {
        let border = if focused {
            ctx.theme.highlight
        } else {
            ctx.theme.border
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(ctx.theme.border_type)
            .border_style(Style::default().fg(border))
            .title(format!(" {} ", title));
        let inner = block.inner(area);
        f.render_widget(block, area);
        inner
    }
}

impl Component for FacilityDetailView {
    fn title(&self) -> String {
        format!(" Credit Facility {} ", crate::util::short_id(&self.id))
    }

    fn render(&mut self, f: &mut Frame, area: Rect, ctx: &RenderContext) {
        let theme = ctx.theme;
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.border))
            .title(self.title());

        if self.detail.is_none() {
            let message = if self.loading || !self.loaded {
                Line::from(format!("{} Loading facility…", ctx.spinner_char()))
            } else if let Some(error) = &self.error {
                Line::styled(format!("Failed to load: {}", error), Style::default().fg(theme.error))
            } else {
                Line::styled("Not found", Style::default().fg(theme.muted))
            };
            f.render_widget(Paragraph::new(message).block(block), area);
            return;
        }

        let [summary_area, tables_area] =
            Layout::vertical([Constraint::Length(SUMMARY_HEIGHT), Constraint::Fill(1)]).areas(area);

        let lines = match &self.detail {
            Some(detail) => self.summary_lines(detail, theme),
            None => Vec::new(),
        };
        f.render_widget(Paragraph::new(lines).block(block), summary_area);

        let [left, right] =
            Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)]).areas(tables_area);
        let disbursals_focused = ctx.focused && self.active_table == FacilityTable::Disbursals;
        let history_focused = ctx.focused && self.active_table == FacilityTable::History;

        let left = self.render_table_block(f, left, ctx, "Disbursals", disbursals_focused);
        let right = self.render_table_block(f, right, ctx, "History", history_focused);

        let (disbursals, history) = match &self.detail {
            Some(d) => (d.disbursals.as_slice(), d.history.as_slice()),
            None => (&[][..], &[][..]),
        };
        self.disbursals
            .render(f, left, &ctx.with_focus(disbursals_focused), disbursals, self.loading);
        self.history
            .render(f, right, &ctx.with_focus(history_focused), history, self.loading);
    }
}

impl Page for FacilityDetailView {
    fn handle_key(&mut self, key: KeyEvent, active: &ActiveElement, nav: &mut dyn Navigator) -> Handled {
        if key.code == KeyCode::Char('t') && !active.is_control() {
            self.switch_table();
            return Handled::Yes;
        }
        let Some(detail) = &self.detail else {
            return Handled::No;
        };
        match self.active_table {
            FacilityTable::Disbursals => {
                self.disbursals
                    .handle_key(key, &detail.disbursals, active, nav)
            }
            FacilityTable::History => self.history.handle_key(key, &detail.history, active, nav),
        }
    }

    fn handle_click(&mut self, column: u16, row: u16, nav: &mut dyn Navigator) -> Option<usize> {
        let detail = self.detail.as_ref()?;
        if let Some(index) = self
            .disbursals
            .handle_click(column, row, &detail.disbursals, nav)
        {
            if self.active_table != FacilityTable::Disbursals {
                self.history.on_focus_change(&ActiveElement::Outside);
                self.active_table = FacilityTable::Disbursals;
            }
            return Some(index);
        }
        let index = self.history.handle_click(column, row, &detail.history, nav)?;
        if self.active_table != FacilityTable::History {
            self.disbursals.on_focus_change(&ActiveElement::Outside);
            self.active_table = FacilityTable::History;
        }
        Some(index)
    }

    fn on_focus_change(&mut self, active: &ActiveElement) {
        self.table_focus(self.active_table, active);
    }

    fn tick(&mut self) -> Option<usize> {
        match self.active_table {
            FacilityTable::Disbursals => self.disbursals.tick(),
            FacilityTable::History => self.history.tick(),
        }
    }

    fn dispose(&mut self) {
        self.disbursals.dispose();
        self.history.dispose();
    }

    fn focused_row(&self) -> Option<usize> {
        match self.active_table {
            FacilityTable::Disbursals => self.disbursals.focused_row(),
            FacilityTable::History => self.history.focused_row(),
        }
    }

    fn focus_hint(&self) -> &'static str {
        "↑↓:move  t:switch table  a:decide  u:collateral  D:disburse"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn detail() -> CreditFacilityDetail {
        serde_json::from_value(json!({
            "creditFacilityId": "cf-1",
            "status": "ACTIVE",
            "facilityAmount": 500_000,
            "collateralizationState": "FULLY_COLLATERALIZED",
            "currentCvl": 150,
            "createdAt": "2025-01-02T03:04:05Z",
            "balance": {
                "outstanding": { "usdBalance": 100_000 },
                "collateral": { "btcBalance": 100_000_000 }
            },
            "customer": { "customerId": "c-1", "email": "alice@x.io" },
            "creditFacilityTerms": {
                "annualRate": "12",
                "oneTimeFeeRate": "1",
                "initialCvl": 140,
                "marginCallCvl": 125,
                "liquidationCvl": 105
            },
            "disbursals": [
                { "disbursalId": "d-1", "amount": 50_000, "status": "CONFIRMED", "createdAt": "2025-01-03T00:00:00Z" },
                { "disbursalId": "d-2", "amount": 50_000, "status": "CONFIRMED", "createdAt": "2025-01-04T00:00:00Z" }
            ],
            "history": [
                { "__typename": "CreditFacilityApproved", "cents": 500_000, "recordedAt": "2025-01-02T03:04:05Z", "txId": "t-1" }
            ],
            "approvalProcess": {
                "approvalProcessId": "ap-1",
                "approvalProcessType": "CREDIT_FACILITY_APPROVAL",
                "status": "IN_PROGRESS",
                "subjectCanSubmitDecision": true,
                "createdAt": "2025-01-02T03:04:05Z"
            }
        }))
        .unwrap()
    }

    struct NoNav;

    impl Navigator for NoNav {
        fn navigate(&mut self, _path: &str) {}
    }

    fn loaded() -> FacilityDetailView {
        let mut view = FacilityDetailView::new("cf-1");
        view.begin_load();
        view.apply(Ok(Some(detail())), Some(UsdCents::new(5_000_000)));
        view
    }

    #[test]
    fn unknown_id_is_not_found() {
        let mut view = FacilityDetailView::new("missing");
        view.begin_load();
        view.apply(Ok(None), None);
        assert!(view.detail().is_none());
        assert!(view.loaded && !view.is_loading());
        assert_eq!(view.tick(), None);
    }

    #[test]
    fn data_arrival_focuses_first_disbursal() {
        let mut view = loaded();
        assert_eq!(view.tick(), Some(0));
        assert_eq!(view.focused_row(), Some(0));

        let handled = view.handle_key(KeyEvent::from(KeyCode::Down), &ActiveElement::TableRow(0), &mut NoNav);
        assert!(handled.was_handled());
        assert_eq!(view.focused_row(), Some(1));
    }

    #[test]
    fn switching_tables_moves_focus() {
        let mut view = loaded();
        view.tick();
        view.handle_key(KeyEvent::from(KeyCode::Char('t')), &ActiveElement::TableRow(0), &mut NoNav);
        assert_eq!(view.active_table(), FacilityTable::History);
        assert_eq!(view.focused_row(), None, "history waits for the deferred focus");
        assert_eq!(view.tick(), Some(0));
        assert_eq!(view.focused_row(), Some(0));
        assert!(!view.disbursals.focus().is_table_focused());
    }

    #[test]
    fn pending_decision_needs_actionable_process() {
        let view = loaded();
        assert_eq!(
            view.pending_decision().map(|p| p.approval_process_id.as_str()),
            Some("ap-1")
        );
    }

    #[test]
    fn errors_keep_previous_detail() {
        let mut view = loaded();
        view.begin_load();
        view.apply(Err(ClientError::Network("timeout".to_string())), None);
        assert!(view.detail().is_some());
        assert_eq!(view.error.as_deref(), Some("Network error: timeout"));
        assert_eq!(view.price, Some(UsdCents::new(5_000_000)));
    }
}
