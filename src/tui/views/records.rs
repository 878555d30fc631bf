//! How each entity appears in a table
//!
//! `Record` impls expose the fields, `Listing` impls wire the list screens:
//! columns, row activation and navigation targets.

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use tokio::sync::mpsc;

use super::list::{ListView, Listing};
use super::Pages;
use crate::domain::{
    ApprovalProcess, ApprovalProcessStatus, CollateralizationState, Committee, CreditFacility,
    Customer, CustomerRef, Deposit, Disbursal, FacilityHistoryEntry, Policy, Withdrawal,
    WithdrawalStatus,
};
use crate::graphql::operations::{
    ApprovalProcessesList, CommitteesList, CreditFacilitiesList, CustomersList, DepositsList,
    PoliciesList, WithdrawalsList,
};
use crate::theme::Theme;
use crate::tui::app::{AppMessage, PageResult, RowAction};
use crate::tui::components::data_table::{Align, CellValue, Column, DataTable, Record};
use crate::tui::context::Selection;
use crate::tui::router::ViewKind;

const DATE_WIDTH: u16 = 16;
const AMOUNT_WIDTH: u16 = 14;

/// Selection for an embedded customer, when the API sent its id
pub fn customer_selection(customer: &CustomerRef) -> Option<Selection> {
    customer
        .customer_id
        .as_ref()
        .map(|id| Selection::new(id.clone(), customer.email.clone()))
}

fn colored(text: impl Into<String>, color: Color) -> Line<'static> {
    Line::from(Span::styled(text.into(), Style::default().fg(color)))
}

/// Post a row action to the App without blocking the render loop
fn post(tx: &mpsc::Sender<AppMessage>, action: RowAction) {
    if tx.try_send(AppMessage::Row(action)).is_err() {
        tracing::warn!("Row action dropped, message queue full");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Customers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerField {
    Email,
    Telegram,
    Status,
    Created,
}

impl Record for Customer {
    type Field = CustomerField;

    fn value(&self, field: CustomerField) -> CellValue {
        match field {
            CustomerField::Email => CellValue::text(&self.email),
            CustomerField::Telegram => CellValue::opt_text(self.telegram_id.as_deref()),
            CustomerField::Status => CellValue::text(self.status.label()),
            CustomerField::Created => CellValue::Date(self.created_at),
        }
    }
}

impl Listing for Customer {
    type Op = CustomersList;
    const KIND: ViewKind = ViewKind::Customers;

    fn id(&self) -> &str {
        &self.customer_id
    }

    fn wrap(page: PageResult<Self>) -> AppMessage {
        AppMessage::Customers(page)
    }

    fn table(tx: mpsc::Sender<AppMessage>, _theme: &Theme) -> DataTable<Self> {
        DataTable::new(vec![
            Column::new(CustomerField::Email, "Email"),
            Column::new(CustomerField::Telegram, "Telegram"),
            Column::new(CustomerField::Status, "Status").width(10),
            Column::new(CustomerField::Created, "Created").width(DATE_WIDTH),
        ])
        .on_row_click(move |c: &Customer| {
            post(&tx, RowAction::Customer(Selection::new(&c.customer_id, &c.email)));
        })
        .empty_message("No customers yet")
    }

    fn view(pages: &mut Pages) -> &mut ListView<Self> {
        &mut pages.customers
    }

    fn hint() -> &'static str {
        "↑↓:move  Enter:select  d:deposit  w:withdraw  f:facility  N:new"
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Credit facilities
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacilityField {
    Customer,
    Status,
    Amount,
    Outstanding,
    Collateral,
    Cvl,
    Created,
}

impl Record for CreditFacility {
    type Field = FacilityField;

    fn value(&self, field: FacilityField) -> CellValue {
        match field {
            FacilityField::Customer => CellValue::text(&self.customer.email),
            FacilityField::Status => CellValue::text(self.status.label()),
            FacilityField::Amount => CellValue::Cents(self.facility_amount),
            FacilityField::Outstanding => CellValue::Cents(self.balance.outstanding.usd_balance),
            FacilityField::Collateral => CellValue::Sats(self.balance.collateral.btc_balance),
            FacilityField::Cvl => CellValue::Percent(self.current_cvl),
            FacilityField::Created => CellValue::Date(self.created_at),
        }
    }
}

/// Colour for a collateralization state
pub fn state_color(state: CollateralizationState, theme: &Theme) -> Color {
    match state {
        CollateralizationState::FullyCollateralized => theme.success,
        CollateralizationState::UnderMarginCallThreshold => theme.warning,
        CollateralizationState::UnderLiquidationThreshold => theme.error,
        CollateralizationState::NoCollateral => theme.muted,
    }
}

impl Listing for CreditFacility {
    type Op = CreditFacilitiesList;
    const KIND: ViewKind = ViewKind::CreditFacilities;

    fn id(&self) -> &str {
        &self.credit_facility_id
    }

    fn wrap(page: PageResult<Self>) -> AppMessage {
        AppMessage::CreditFacilities(page)
    }

    fn table(_tx: mpsc::Sender<AppMessage>, theme: &Theme) -> DataTable<Self> {
        let theme = theme.clone();
        DataTable::new(vec![
            Column::new(FacilityField::Customer, "Customer"),
            Column::new(FacilityField::Status, "Status").width(18),
            Column::new(FacilityField::Amount, "Facility")
                .width(AMOUNT_WIDTH)
                .align(Align::Right),
            Column::new(FacilityField::Outstanding, "Outstanding")
                .width(AMOUNT_WIDTH)
                .align(Align::Right),
            Column::new(FacilityField::Collateral, "Collateral")
                .width(16)
                .align(Align::Right),
            Column::with_node(
                FacilityField::Cvl,
                Line::from(vec![
                    Span::raw("CVL"),
                    Span::styled(" %", Style::default().fg(theme.muted)),
                ]),
            )
            .width(9)
            .align(Align::Right)
            .render(move |value, row: &CreditFacility| {
                colored(value.to_string(), state_color(row.collateralization_state, &theme))
            }),
            Column::new(FacilityField::Created, "Created").width(DATE_WIDTH),
        ])
        .navigate_to(|f: &CreditFacility| Some(format!("/credit-facilities/{}", f.credit_facility_id)))
        .empty_message("No credit facilities")
    }

    fn view(pages: &mut Pages) -> &mut ListView<Self> {
        &mut pages.facilities
    }

    fn hint() -> &'static str {
        "↑↓:move  Enter:details  u:collateral  D:disburse"
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Withdrawals and deposits
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementField {
    Customer,
    Amount,
    Status,
    Reference,
    Created,
}

impl Record for Withdrawal {
    type Field = MovementField;

    fn value(&self, field: MovementField) -> CellValue {
        match field {
            MovementField::Customer => CellValue::text(&self.customer.email),
            MovementField::Amount => CellValue::Cents(self.amount),
            MovementField::Status => CellValue::text(self.status.label()),
            MovementField::Reference => CellValue::opt_text(self.reference.as_deref()),
            MovementField::Created => CellValue::Date(self.created_at),
        }
    }
}

fn withdrawal_color(status: WithdrawalStatus, theme: &Theme) -> Color {
    match status {
        WithdrawalStatus::PendingApproval => theme.muted,
        WithdrawalStatus::PendingConfirmation => theme.warning,
        WithdrawalStatus::Confirmed => theme.success,
        WithdrawalStatus::Denied | WithdrawalStatus::Cancelled => theme.error,
    }
}

impl Listing for Withdrawal {
    type Op = WithdrawalsList;
    const KIND: ViewKind = ViewKind::Withdrawals;

    fn id(&self) -> &str {
        &self.withdrawal_id
    }

    fn wrap(page: PageResult<Self>) -> AppMessage {
        AppMessage::Withdrawals(page)
    }

    fn table(tx: mpsc::Sender<AppMessage>, theme: &Theme) -> DataTable<Self> {
        let theme = theme.clone();
        DataTable::new(vec![
            Column::new(MovementField::Customer, "Customer"),
            Column::new(MovementField::Amount, "Amount")
                .width(AMOUNT_WIDTH)
                .align(Align::Right),
            Column::new(MovementField::Status, "Status")
                .width(20)
                .render(move |value, row: &Withdrawal| {
                    colored(value.to_string(), withdrawal_color(row.status, &theme))
                }),
            Column::new(MovementField::Reference, "Reference"),
            Column::new(MovementField::Created, "Created").width(DATE_WIDTH),
        ])
        .on_row_click(move |w: &Withdrawal| post(&tx, RowAction::Withdrawal(w.clone())))
        .empty_message("No withdrawals")
    }

    fn view(pages: &mut Pages) -> &mut ListView<Self> {
        &mut pages.withdrawals
    }

    fn hint() -> &'static str {
        "↑↓:move  Enter:confirm/cancel  w:withdraw"
    }
}

impl Record for Deposit {
    type Field = MovementField;

    fn value(&self, field: MovementField) -> CellValue {
        match field {
            MovementField::Customer => CellValue::text(&self.customer.email),
            MovementField::Amount => CellValue::Cents(self.amount),
            MovementField::Status => CellValue::Empty,
            MovementField::Reference => CellValue::opt_text(self.reference.as_deref()),
            MovementField::Created => CellValue::Date(self.created_at),
        }
    }
}

impl Listing for Deposit {
    type Op = DepositsList;
    const KIND: ViewKind = ViewKind::Deposits;

    fn id(&self) -> &str {
        &self.deposit_id
    }

    fn wrap(page: PageResult<Self>) -> AppMessage {
        AppMessage::Deposits(page)
    }

    fn table(tx: mpsc::Sender<AppMessage>, _theme: &Theme) -> DataTable<Self> {
        DataTable::new(vec![
            Column::new(MovementField::Customer, "Customer"),
            Column::new(MovementField::Amount, "Amount")
                .width(AMOUNT_WIDTH)
                .align(Align::Right),
            Column::new(MovementField::Reference, "Reference"),
            Column::new(MovementField::Created, "Created").width(DATE_WIDTH),
        ])
        .on_row_click(move |d: &Deposit| {
            if let Some(customer) = customer_selection(&d.customer) {
                post(&tx, RowAction::Customer(customer));
            }
        })
        .empty_message("No deposits")
    }

    fn view(pages: &mut Pages) -> &mut ListView<Self> {
        &mut pages.deposits
    }

    fn hint() -> &'static str {
        "↑↓:move  Enter:select customer  d:deposit"
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Governance
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitteeField {
    Name,
    Members,
    Created,
}

impl Record for Committee {
    type Field = CommitteeField;

    fn value(&self, field: CommitteeField) -> CellValue {
        match field {
            CommitteeField::Name => CellValue::text(&self.name),
            CommitteeField::Members => CellValue::Int(self.current_members.len() as i64),
            CommitteeField::Created => CellValue::Date(self.created_at),
        }
    }
}

impl Listing for Committee {
    type Op = CommitteesList;
    const KIND: ViewKind = ViewKind::Committees;

    fn id(&self) -> &str {
        &self.committee_id
    }

    fn wrap(page: PageResult<Self>) -> AppMessage {
        AppMessage::Committees(page)
    }

    fn table(tx: mpsc::Sender<AppMessage>, _theme: &Theme) -> DataTable<Self> {
        DataTable::new(vec![
            Column::new(CommitteeField::Name, "Name"),
            Column::new(CommitteeField::Members, "Members")
                .width(8)
                .align(Align::Right),
            Column::new(CommitteeField::Created, "Created").width(DATE_WIDTH),
        ])
        .on_row_click(move |c: &Committee| {
            post(&tx, RowAction::Committee(Selection::new(&c.committee_id, &c.name)));
        })
        .empty_message("No committees. Press c to create one")
    }

    fn view(pages: &mut Pages) -> &mut ListView<Self> {
        &mut pages.committees
    }

    fn hint() -> &'static str {
        "↑↓:move  Enter:select  c:create"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyField {
    ProcessType,
    Rules,
}

impl Record for Policy {
    type Field = PolicyField;

    fn value(&self, field: PolicyField) -> CellValue {
        match field {
            PolicyField::ProcessType => CellValue::text(self.approval_process_type.label()),
            PolicyField::Rules => CellValue::Text(self.rules.describe()),
        }
    }
}

impl Listing for Policy {
    type Op = PoliciesList;
    const KIND: ViewKind = ViewKind::Policies;

    fn id(&self) -> &str {
        &self.policy_id
    }

    fn wrap(page: PageResult<Self>) -> AppMessage {
        AppMessage::Policies(page)
    }

    fn table(tx: mpsc::Sender<AppMessage>, _theme: &Theme) -> DataTable<Self> {
        DataTable::new(vec![
            Column::new(PolicyField::ProcessType, "Process"),
            Column::new(PolicyField::Rules, "Rule"),
        ])
        .on_row_click(move |p: &Policy| {
            post(
                &tx,
                RowAction::Policy(Selection::new(&p.policy_id, p.approval_process_type.label())),
            );
        })
        .empty_message("No policies")
    }

    fn view(pages: &mut Pages) -> &mut ListView<Self> {
        &mut pages.policies
    }

    fn hint() -> &'static str {
        "↑↓:move  Enter:assign committee"
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Actions (approval processes)
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessField {
    ProcessType,
    Customer,
    Rules,
    Status,
    Created,
}

impl Record for ApprovalProcess {
    type Field = ProcessField;

    fn value(&self, field: ProcessField) -> CellValue {
        match field {
            ProcessField::ProcessType => CellValue::text(self.approval_process_type.label()),
            ProcessField::Customer => {
                CellValue::opt_text(self.target.as_ref().map(|t| t.customer_email()))
            }
            ProcessField::Rules => match &self.rules {
                Some(rules) => CellValue::Text(rules.describe()),
                None => CellValue::Empty,
            },
            ProcessField::Status => CellValue::text(match self.status {
                _ if self.is_actionable() => "Awaiting you",
                ApprovalProcessStatus::InProgress => "In Progress",
                ApprovalProcessStatus::Approved => "Approved",
                ApprovalProcessStatus::Denied => "Denied",
            }),
            ProcessField::Created => CellValue::Date(self.created_at),
        }
    }
}

impl Listing for ApprovalProcess {
    type Op = ApprovalProcessesList;
    const KIND: ViewKind = ViewKind::Actions;

    fn id(&self) -> &str {
        &self.approval_process_id
    }

    fn wrap(page: PageResult<Self>) -> AppMessage {
        AppMessage::Actions(page)
    }

    fn table(_tx: mpsc::Sender<AppMessage>, theme: &Theme) -> DataTable<Self> {
        let theme = theme.clone();
        DataTable::new(vec![
            Column::new(ProcessField::ProcessType, "Type").width(26),
            Column::new(ProcessField::Customer, "Customer"),
            Column::new(ProcessField::Rules, "Rule"),
            Column::new(ProcessField::Status, "Status")
                .width(13)
                .render(move |value, row: &ApprovalProcess| {
                    let color = if row.is_actionable() {
                        theme.warning
                    } else {
                        theme.muted
                    };
                    colored(value.to_string(), color)
                }),
            Column::new(ProcessField::Created, "Created").width(DATE_WIDTH),
        ])
        .navigate_to(ApprovalProcess::visit_url)
        .empty_message("Nothing waiting for approval")
    }

    fn view(pages: &mut Pages) -> &mut ListView<Self> {
        &mut pages.actions
    }

    fn hint() -> &'static str {
        "↑↓:move  Enter:open  a:approve/deny"
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Facility detail tables
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisbursalField {
    Id,
    Amount,
    Status,
    Created,
}

impl Record for Disbursal {
    type Field = DisbursalField;

    fn value(&self, field: DisbursalField) -> CellValue {
        match field {
            DisbursalField::Id => CellValue::text(&self.disbursal_id),
            DisbursalField::Amount => CellValue::Cents(self.amount),
            DisbursalField::Status => CellValue::text(self.status.label()),
            DisbursalField::Created => CellValue::Date(self.created_at),
        }
    }
}

pub fn disbursal_columns() -> Vec<Column<Disbursal>> {
    vec![
        Column::new(DisbursalField::Id, "Disbursal")
            .render(|value, _| Line::raw(crate::util::short_id(&value.to_string()).to_string())),
        Column::new(DisbursalField::Amount, "Amount")
            .width(AMOUNT_WIDTH)
            .align(Align::Right),
        Column::new(DisbursalField::Status, "Status").width(10),
        Column::new(DisbursalField::Created, "Created").width(DATE_WIDTH),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryField {
    Kind,
    Amount,
    Recorded,
}

impl Record for FacilityHistoryEntry {
    type Field = HistoryField;

    fn value(&self, field: HistoryField) -> CellValue {
        match field {
            HistoryField::Kind => CellValue::Text(self.label()),
            HistoryField::Amount => CellValue::Text(self.amount()),
            HistoryField::Recorded => CellValue::Date(self.recorded_at()),
        }
    }
}

pub fn history_columns() -> Vec<Column<FacilityHistoryEntry>> {
    vec![
        Column::new(HistoryField::Kind, "Event"),
        Column::new(HistoryField::Amount, "Amount")
            .width(18)
            .align(Align::Right),
        Column::new(HistoryField::Recorded, "Recorded").width(DATE_WIDTH),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn process(actionable: bool) -> ApprovalProcess {
        serde_json::from_value(json!({
            "approvalProcessId": "ap-1",
            "approvalProcessType": "WITHDRAWAL_APPROVAL",
            "status": "IN_PROGRESS",
            "subjectCanSubmitDecision": actionable,
            "createdAt": "2025-03-01T12:00:00Z",
            "target": {
                "__typename": "Withdrawal",
                "withdrawalId": "w-1",
                "customer": { "customerId": "c-1", "email": "alice@x.io" }
            }
        }))
        .unwrap()
    }

    #[test]
    fn process_status_marks_actionable_rows() {
        assert_eq!(
            process(true).value(ProcessField::Status),
            CellValue::text("Awaiting you")
        );
        assert_eq!(
            process(false).value(ProcessField::Status),
            CellValue::text("In Progress")
        );
        assert_eq!(
            process(true).value(ProcessField::Customer),
            CellValue::text("alice@x.io")
        );
        assert_eq!(process(true).value(ProcessField::Rules), CellValue::Empty);
    }

    #[test]
    fn actions_link_to_gated_entity() {
        let (tx, _rx) = mpsc::channel(1);
        let table = ApprovalProcess::table(tx, &Theme::default());
        assert_eq!(table.target(&process(true)).as_deref(), Some("/withdrawals/w-1"));
    }

    #[test]
    fn customer_selection_needs_id() {
        let with_id = CustomerRef {
            customer_id: Some("c-1".to_string()),
            email: "alice@x.io".to_string(),
        };
        let without = CustomerRef {
            customer_id: None,
            email: "bob@x.io".to_string(),
        };
        assert_eq!(
            customer_selection(&with_id),
            Some(Selection::new("c-1", "alice@x.io"))
        );
        assert_eq!(customer_selection(&without), None);
    }

    #[test]
    fn row_click_posts_selection() {
        let (tx, mut rx) = mpsc::channel(4);
        let table = Customer::table(tx, &Theme::default());
        let customer: Customer = serde_json::from_value(json!({
            "customerId": "c-1",
            "email": "alice@x.io",
            "status": "ACTIVE",
            "createdAt": "2025-01-01T00:00:00Z"
        }))
        .unwrap();

        let mut nav = NoNav;
        let mut table = table;
        table.sync(1, false);
        table.tick();
        let handled = table.handle_key(
            crossterm::event::KeyEvent::from(crossterm::event::KeyCode::Enter),
            std::slice::from_ref(&customer),
            &crate::tui::components::data_table::ActiveElement::TableRow(0),
            &mut nav,
        );
        assert!(handled.was_handled());
        match rx.try_recv() {
            Ok(AppMessage::Row(RowAction::Customer(selection))) => {
                assert_eq!(selection, Selection::new("c-1", "alice@x.io"));
            }
            _ => panic!("expected a customer selection"),
        }
    }

    struct NoNav;

    impl crate::tui::traits::Navigator for NoNav {
        fn navigate(&mut self, path: &str) {
            panic!("unexpected navigation to {}", path);
        }
    }
}
