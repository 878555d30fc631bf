// TUI application state
//
// App owns everything the event loop touches: the router and its pages, the
// page-scoped selection, the open dialog and toast, and the senders that
// background requests report back on. Network work never runs inline; it is
// spawned and its result arrives later as an `AppMessage`.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::mpsc;

use super::components::data_table::{ActiveElement, ControlKind};
use super::components::logs_panel::LogsPanel;
use super::components::toast::Toast;
use super::context::{PageContext, Selection};
use super::modal::{ExportState, Form, Modal, Submission};
use super::router::{Route, Router, ViewKind};
use super::views::{customer_selection, FacilityDetailView, Listing, Pages};
use crate::config::Config;
use crate::domain::{
    ApprovalProcess, Committee, CreditFacility, Customer, Deposit, Policy, Withdrawal,
};
use crate::export::{ExportJob, ExportUpdate};
use crate::graphql::operations::{
    ApprovalProcessPayload, CollateralUpdateInput, CommitteeCreateInput, CommitteePayload,
    CreditFacilityCreateInput, CreditFacilityPayload, CreditFacilityResult, CustomerAmountInput,
    CustomerCreateInput, CustomerPayload, DenyVars, DepositPayload, DisbursalInitiateInput,
    DisbursalPayload, IdVars, Input, PolicyAssignCommitteeInput, PolicyPayload, ProcessInput,
    RealtimePrice, WithdrawalIdInput, WithdrawalPayload, APPROVAL_PROCESS_APPROVE,
    APPROVAL_PROCESS_DENY, COMMITTEE_CREATE, CREDIT_FACILITY, CREDIT_FACILITY_COLLATERAL_UPDATE,
    CREDIT_FACILITY_CREATE, CREDIT_FACILITY_DISBURSAL_INITIATE, CUSTOMER_CREATE, DEPOSIT_RECORD,
    POLICY_ASSIGN_COMMITTEE, REALTIME_PRICE, WITHDRAWAL_CANCEL, WITHDRAWAL_CONFIRM,
    WITHDRAWAL_INITIATE,
};
use crate::graphql::{ClientError, Connection, GraphqlClient, Operation};
use crate::logging::LogBuffer;
use crate::money::UsdCents;
use crate::session::{Session, SessionState};
use crate::theme::Theme;
use crate::util::short_id;
use crate::validation;

/// Finished list request
#[derive(Debug)]
pub struct PageResult<T> {
    pub result: Result<Connection<T>, ClientError>,
    /// Next page rather than a fresh first page
    pub append: bool,
}

/// Row activations posted by table callbacks
#[derive(Debug, Clone)]
pub enum RowAction {
    Customer(Selection),
    Withdrawal(Withdrawal),
    Committee(Selection),
    Policy(Selection),
}

/// Everything background tasks report back to the UI loop
#[derive(Debug)]
pub enum AppMessage {
    Customers(PageResult<Customer>),
    CreditFacilities(PageResult<CreditFacility>),
    Withdrawals(PageResult<Withdrawal>),
    Deposits(PageResult<Deposit>),
    Committees(PageResult<Committee>),
    Policies(PageResult<Policy>),
    Actions(PageResult<ApprovalProcess>),
    Facility {
        id: String,
        result: Result<CreditFacilityResult, ClientError>,
        price: Option<UsdCents>,
    },
    /// A mutation finished; `Ok` carries the cache roots it made stale
    Mutation {
        submission: Submission,
        result: Result<&'static [&'static str], ClientError>,
    },
    Session(Result<SessionState, ClientError>),
    ExportStarted(Result<ExportJob, ClientError>),
    Row(RowAction),
}

/// Main application state for the TUI
pub struct App {
    pub client: GraphqlClient,
    pub config: Config,
    pub theme: Theme,
    pub router: Router,
    pub pages: Pages,
    /// Selection scoped to the current route
    pub context: PageContext,
    /// What holds keyboard focus
    pub active: ActiveElement,
    pub modal: Option<Modal>,
    pub toast: Option<Toast>,
    pub logs_panel: LogsPanel,
    pub show_logs: bool,
    /// Signed-in user, once the session check answers
    pub session_email: Option<String>,
    pub should_quit: bool,
    /// Animation frame counter for spinners
    pub animation_frame: usize,
    /// Areas drawn last frame, for mouse hit-testing
    pub logs_area: Option<ratatui::layout::Rect>,
    pub content_area: Option<ratatui::layout::Rect>,
    tx: mpsc::Sender<AppMessage>,
    export_tx: mpsc::Sender<ExportUpdate>,
    export_job: Option<ExportJob>,
    session: Option<Arc<Session>>,
}

impl App {
    pub fn new(
        config: Config,
        client: GraphqlClient,
        session: Option<Session>,
        log_buffer: LogBuffer,
        tx: mpsc::Sender<AppMessage>,
        export_tx: mpsc::Sender<ExportUpdate>,
    ) -> Self {
        let theme = Theme::by_name(&config.ui.theme).with_background(config.ui.use_theme_background);
        let pages = Pages::new(config.api.page_size, &tx, &theme);
        let session_email = session.as_ref().and_then(Session::cached_email);

        Self {
            client,
            theme,
            router: Router::new(Route::list(ViewKind::Customers)),
            pages,
            context: PageContext::default(),
            active: ActiveElement::Body,
            modal: None,
            toast: None,
            logs_panel: LogsPanel::new(log_buffer),
            show_logs: false,
            session_email,
            should_quit: false,
            animation_frame: 0,
            logs_area: None,
            content_area: None,
            tx,
            export_tx,
            export_job: None,
            session: session.map(Arc::new),
            config,
        }
    }

    /// Kick off the first page and the session check
    pub fn start(&mut self) {
        self.load_current();
        self.check_session();
    }

    // ─────────────────────────────────────────────────────────────────────
    // Focus
    // ─────────────────────────────────────────────────────────────────────

    /// Move keyboard focus and tell the current page
    pub fn set_active(&mut self, active: ActiveElement) {
        if self.active == active {
            return;
        }
        self.active = active;
        let route = self.router.current().clone();
        self.pages.page_mut(&route).on_focus_change(&active);
    }

    pub fn open_modal(&mut self, modal: Modal) {
        let kind = if modal.is_form() {
            ControlKind::Input
        } else {
            ControlKind::Button
        };
        self.modal = Some(modal);
        self.set_active(ActiveElement::Control {
            kind,
            in_table: false,
        });
    }

    pub fn close_modal(&mut self) {
        if let Some(Modal::Export { .. }) = self.modal.take() {
            self.export_job = None;
        }
        self.set_active(ActiveElement::Body);
    }

    /// Tab: table ↔ logs panel
    pub fn toggle_logs_focus(&mut self) {
        if self.active == ActiveElement::Outside {
            self.set_active(ActiveElement::Body);
        } else {
            self.show_logs = true;
            self.set_active(ActiveElement::Outside);
        }
    }

    pub fn toggle_logs(&mut self) {
        self.show_logs = !self.show_logs;
        if !self.show_logs && self.active == ActiveElement::Outside {
            self.set_active(ActiveElement::Body);
        }
    }

    /// Advance animation, expire toasts, fire deferred auto-focus
    pub fn tick(&mut self) {
        self.animation_frame = self.animation_frame.wrapping_add(1);

        if self.toast.as_ref().is_some_and(Toast::is_expired) {
            self.toast = None;
        }

        // Auto-focus only claims focus nobody else holds
        if !matches!(self.active, ActiveElement::Body | ActiveElement::Nothing) {
            return;
        }
        let route = self.router.current().clone();
        if let Some(index) = self.pages.page_mut(&route).tick() {
            self.active = ActiveElement::TableRow(index);
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────

    pub fn navigate(&mut self, route: Route) {
        self.router.go(route);
        self.after_navigation();
    }

    pub fn back(&mut self) -> bool {
        let moved = self.router.back();
        self.after_navigation();
        moved
    }

    /// Pick up a route change made by a page or the router
    pub fn after_navigation(&mut self) {
        let Some(previous) = self.router.take_changed() else {
            return;
        };
        self.pages.page_mut(&previous).dispose();
        self.context.clear();

        let route = self.router.current().clone();
        tracing::debug!(path = %route.path(), "Route changed");

        match &route {
            Route::List { kind, selected } => {
                self.pages.list_mut(*kind).preselect(selected.clone());
            }
            Route::CreditFacility(id) => {
                if self.pages.facility.as_ref().map(FacilityDetailView::id) != Some(id.as_str()) {
                    self.pages.facility = Some(FacilityDetailView::new(id.clone()));
                }
            }
            Route::NotFound(path) => {
                tracing::warn!(path = %path, "No page for path");
                self.pages.not_found.path = path.clone();
            }
        }
        if !matches!(route, Route::CreditFacility(_)) {
            self.pages.facility = None;
        }

        // Re-enter at Body so the new page's table can claim focus
        self.active = ActiveElement::Nothing;
        self.set_active(ActiveElement::Body);
        self.load_current();
    }

    // ─────────────────────────────────────────────────────────────────────
    // Loading
    // ─────────────────────────────────────────────────────────────────────

    /// Fetch whatever the current route shows, unless it is already there
    pub fn load_current(&mut self) {
        match self.router.current().clone() {
            Route::List { kind, .. } => {
                if self.pages.list_mut(kind).needs_load() {
                    self.load_kind(kind, false);
                }
            }
            Route::CreditFacility(id) => {
                if self.pages.facility.as_ref().is_some_and(|f| f.detail().is_none() && !f.is_loading()) {
                    self.load_facility(id);
                }
            }
            Route::NotFound(_) => {}
        }
    }

    /// `r`: drop cached results for the current route and fetch again
    pub fn refresh(&mut self) {
        // A reply still in flight would land on top of the fresh first page
        if self.pages.is_loading(self.router.current()) {
            self.toast = Some(Toast::new("Still loading"));
            return;
        }
        match self.router.current().clone() {
            Route::List { kind, .. } => {
                let root = self.pages.list_mut(kind).root();
                self.client.evict(root);
                self.load_kind(kind, false);
            }
            Route::CreditFacility(id) => {
                self.client.evict(CREDIT_FACILITY.root);
                self.load_facility(id);
            }
            Route::NotFound(_) => {}
        }
    }

    /// `n`: append the next page of the current list
    pub fn next_page(&mut self) {
        let Route::List { kind, .. } = self.router.current().clone() else {
            return;
        };
        let list = self.pages.list_mut(kind);
        if list.is_loading() {
            return;
        }
        if !list.has_more() {
            self.toast = Some(Toast::new("No more pages"));
            return;
        }
        self.load_kind(kind, true);
    }

    fn load_kind(&mut self, kind: ViewKind, append: bool) {
        match kind {
            ViewKind::Customers => self.load::<Customer>(append),
            ViewKind::CreditFacilities => self.load::<CreditFacility>(append),
            ViewKind::Withdrawals => self.load::<Withdrawal>(append),
            ViewKind::Deposits => self.load::<Deposit>(append),
            ViewKind::Committees => self.load::<Committee>(append),
            ViewKind::Policies => self.load::<Policy>(append),
            ViewKind::Actions => self.load::<ApprovalProcess>(append),
        }
    }

    fn load<T: Listing>(&mut self, append: bool) {
        let Some(args) = T::view(&mut self.pages).begin_load(append) else {
            return;
        };
        tracing::debug!(view = T::KIND.title(), append, "Loading page");

        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.list::<T::Op>(&args).await;
            let _ = tx.send(T::wrap(PageResult { result, append })).await;
        });
    }

    fn apply_page<T: Listing>(&mut self, page: PageResult<T>) {
        match T::view(&mut self.pages).apply(page) {
            Ok(rows) => tracing::debug!(view = T::KIND.title(), rows, "Page loaded"),
            Err(e) => {
                tracing::warn!(view = T::KIND.title(), error = %e, "Page failed to load");
                self.show_error(&format!("Loading {}", T::KIND.title().to_lowercase()), &e);
            }
        }
    }

    fn load_facility(&mut self, id: String) {
        let Some(view) = self.pages.facility.as_mut() else {
            return;
        };
        view.begin_load();

        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = {
                let vars = IdVars { id: &id };
                client
                    .execute_cached::<_, CreditFacilityResult>(&CREDIT_FACILITY, &vars)
                    .await
            };
            let price = match client
                .execute::<_, RealtimePrice>(&REALTIME_PRICE, &serde_json::json!({}))
                .await
            {
                Ok(price) => Some(price.usd_cents_per_btc),
                Err(e) => {
                    tracing::debug!(error = %e, "BTC price unavailable");
                    None
                }
            };
            let _ = tx.send(AppMessage::Facility { id, result, price }).await;
        });
    }

    fn check_session(&mut self) {
        let Some(session) = self.session.clone() else {
            return;
        };
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = session.check(&client).await;
            let _ = tx.send(AppMessage::Session(result)).await;
        });
    }

    // ─────────────────────────────────────────────────────────────────────
    // Messages
    // ─────────────────────────────────────────────────────────────────────

    pub fn handle_message(&mut self, message: AppMessage) {
        match message {
            AppMessage::Customers(page) => self.apply_page(page),
            AppMessage::CreditFacilities(page) => self.apply_page(page),
            AppMessage::Withdrawals(page) => self.apply_page(page),
            AppMessage::Deposits(page) => self.apply_page(page),
            AppMessage::Committees(page) => self.apply_page(page),
            AppMessage::Policies(page) => self.apply_page(page),
            AppMessage::Actions(page) => self.apply_page(page),
            AppMessage::Facility { id, result, price } => {
                if let Err(e) = &result {
                    tracing::warn!(credit_facility_id = %id, error = %e, "Facility failed to load");
                    self.show_error("Loading facility", e);
                }
                match self.pages.facility.as_mut() {
                    Some(view) if view.id() == id => view.apply(result, price),
                    _ => tracing::trace!(credit_facility_id = %id, "Dropping stale facility result"),
                }
            }
            AppMessage::Mutation { submission, result } => self.finish_mutation(submission, result),
            AppMessage::Session(result) => match result {
                Ok(SessionState::LoggedIn(user)) => self.session_email = Some(user.email),
                Ok(SessionState::LoggedOut) => {
                    self.session_email = None;
                    self.toast = Some(Toast::error("Not logged in: check [api] token"));
                }
                Err(e) => tracing::warn!(error = %e, "Session check failed"),
            },
            AppMessage::ExportStarted(result) => match result {
                Ok(job) => {
                    let csv_id = job.csv_id().to_string();
                    self.export_job = Some(job);
                    self.open_modal(Modal::Export {
                        csv_id,
                        state: ExportState::Pending,
                    });
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Export could not start");
                    self.show_error("Export", &e);
                }
            },
            AppMessage::Row(action) => self.handle_row(action),
        }
    }

    pub fn handle_export(&mut self, update: ExportUpdate) {
        let Some(job) = &self.export_job else {
            return;
        };
        let state = match update {
            ExportUpdate::Pending { csv_id } => {
                tracing::trace!(csv_id = %csv_id, "Export pending");
                return;
            }
            ExportUpdate::Completed { csv_id, link } if csv_id == job.csv_id() => {
                self.toast = Some(Toast::success(format!("CSV ready: {}", link)));
                ExportState::Ready(link)
            }
            ExportUpdate::Failed { csv_id } if csv_id == job.csv_id() => {
                self.toast = Some(Toast::error("CSV export failed"));
                ExportState::Failed("the server could not generate the file".to_string())
            }
            ExportUpdate::Error(e) => {
                self.toast = Some(Toast::error(format!("CSV export: {}", e.summary())));
                ExportState::Failed(e.summary())
            }
            _ => return,
        };
        if let Some(Modal::Export { state: shown, .. }) = self.modal.as_mut() {
            *shown = state;
        }
    }

    fn handle_row(&mut self, action: RowAction) {
        match action {
            RowAction::Customer(customer) => {
                self.toast = Some(Toast::new(format!(
                    "{} selected  d:deposit  w:withdraw",
                    customer.label
                )));
                self.context.customer = Some(customer);
            }
            RowAction::Withdrawal(withdrawal) => {
                self.context.customer = customer_selection(&withdrawal.customer);
                if withdrawal.status.awaiting_confirmation() {
                    self.open_modal(Modal::WithdrawalDecision {
                        withdrawal_id: withdrawal.withdrawal_id,
                        description: format!("{} for {}", withdrawal.amount, withdrawal.customer.email),
                    });
                } else {
                    self.toast = Some(Toast::new(format!(
                        "Withdrawal is {}",
                        withdrawal.status.label().to_lowercase()
                    )));
                }
            }
            RowAction::Committee(committee) => {
                self.toast = Some(Toast::new(format!("Committee {} selected", committee.label)));
                self.context.committee = Some(committee);
            }
            RowAction::Policy(policy) => {
                if self.pages.committees.items().is_empty() {
                    self.load::<Committee>(false);
                }
                let form = Form::assign(policy.clone(), self.context.committee.as_ref());
                self.context.policy = Some(policy);
                self.open_modal(Modal::Form(form));
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Actions
    // ─────────────────────────────────────────────────────────────────────

    /// Customer for `d` / `w`: the selection, else the focused customer row
    fn customer_for_action(&self) -> Option<Selection> {
        if let Some(customer) = &self.context.customer {
            return Some(customer.clone());
        }
        match self.router.current() {
            Route::List {
                kind: ViewKind::Customers,
                ..
            } => self
                .pages
                .customers
                .focused_item()
                .map(|c| Selection::new(&c.customer_id, &c.email)),
            _ => None,
        }
    }

    pub fn record_deposit(&mut self) {
        match self.customer_for_action() {
            Some(customer) => self.open_modal(Modal::Form(Form::deposit(customer))),
            None => self.toast = Some(Toast::error("Select a customer first")),
        }
    }

    pub fn initiate_withdrawal(&mut self) {
        match self.customer_for_action() {
            Some(customer) => self.open_modal(Modal::Form(Form::withdrawal(customer))),
            None => self.toast = Some(Toast::error("Select a customer first")),
        }
    }

    /// Facility for `u` / `D`: the open detail page, else the focused facility row
    fn facility_for_action(&self) -> Option<Selection> {
        match self.router.current() {
            Route::CreditFacility(id) => {
                let label = self
                    .pages
                    .facility
                    .as_ref()
                    .and_then(FacilityDetailView::detail)
                    .map_or_else(|| short_id(id).to_string(), |d| d.customer.email.clone());
                Some(Selection::new(id, label))
            }
            Route::List {
                kind: ViewKind::CreditFacilities,
                ..
            } => self
                .pages
                .facilities
                .focused_item()
                .map(|f| Selection::new(&f.credit_facility_id, &f.customer.email)),
            _ => self.context.facility.clone(),
        }
    }

    pub fn create_customer(&mut self) {
        self.open_modal(Modal::Form(Form::customer()));
    }

    pub fn create_credit_facility(&mut self) {
        match self.customer_for_action() {
            Some(customer) => self.open_modal(Modal::Form(Form::credit_facility(customer))),
            None => self.toast = Some(Toast::error("Select a customer first")),
        }
    }

    pub fn update_collateral(&mut self) {
        match self.facility_for_action() {
            Some(facility) => self.open_modal(Modal::Form(Form::collateral(facility))),
            None => self.toast = Some(Toast::error("Open a credit facility first")),
        }
    }

    pub fn initiate_disbursal(&mut self) {
        match self.facility_for_action() {
            Some(facility) => self.open_modal(Modal::Form(Form::disbursal(facility))),
            None => self.toast = Some(Toast::error("Open a credit facility first")),
        }
    }

    pub fn create_committee(&mut self) {
        self.open_modal(Modal::Form(Form::committee()));
    }

    pub fn start_export_form(&mut self) {
        self.open_modal(Modal::Form(Form::export()));
    }

    /// `a`: decide the focused approval process or the facility's pending one
    pub fn decide(&mut self) {
        let process = match self.router.current() {
            Route::List {
                kind: ViewKind::Actions,
                ..
            } => self.pages.actions.focused_item(),
            Route::CreditFacility(_) => self
                .pages
                .facility
                .as_ref()
                .and_then(FacilityDetailView::pending_decision),
            _ => None,
        };

        match process {
            Some(p) if p.is_actionable() => {
                let description = match &p.target {
                    Some(target) => format!(
                        "{} for {}",
                        p.approval_process_type.label(),
                        target.customer_email()
                    ),
                    None => p.approval_process_type.label().to_string(),
                };
                let modal = Modal::ApprovalDecision {
                    process_id: p.approval_process_id.clone(),
                    description,
                };
                self.open_modal(modal);
            }
            Some(_) => self.toast = Some(Toast::new("Not awaiting your decision")),
            None => self.toast = Some(Toast::error("Nothing to decide here")),
        }
    }

    /// Resolve what a dialog submitted and start it
    pub fn submit(&mut self, submission: Submission) {
        self.close_modal();
        let submission = match submission {
            Submission::StartExport { ledger_account_id } => {
                self.start_export(ledger_account_id);
                return;
            }
            Submission::AssignCommittee {
                policy_id,
                committee,
                threshold,
            } => match self.resolve_committee(&committee) {
                Some(committee_id) => Submission::AssignCommittee {
                    policy_id,
                    committee: committee_id,
                    threshold,
                },
                None => {
                    self.toast = Some(Toast::error(format!("Unknown committee: {}", committee)));
                    return;
                }
            },
            other => other,
        };

        tracing::info!(action = ?submission, "Submitting");
        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = run_mutation(&client, &submission).await;
            let _ = tx.send(AppMessage::Mutation { submission, result }).await;
        });
    }

    /// Committee by exact name (case-insensitive) or id; a bare UUID passes through
    fn resolve_committee(&self, input: &str) -> Option<String> {
        let input = input.trim();
        self.pages
            .committees
            .items()
            .iter()
            .find(|c| c.committee_id == input || c.name.eq_ignore_ascii_case(input))
            .map(|c| c.committee_id.clone())
            .or_else(|| validation::uuid("Committee", input).ok().map(str::to_string))
    }

    fn finish_mutation(&mut self, submission: Submission, result: Result<&'static [&'static str], ClientError>) {
        match result {
            Ok(roots) => {
                tracing::info!(action = submission.label(), "Mutation succeeded");
                self.toast = Some(Toast::success(submission.label()));
                for root in roots {
                    self.pages.invalidate(root);
                }
                if let Some(view) = self.pages.facility.as_ref() {
                    let id = view.id().to_string();
                    self.load_facility(id);
                }
                self.load_current();
            }
            Err(e) => {
                tracing::warn!(action = ?submission, error = %e, "Mutation failed");
                self.show_error(submission.label(), &e);
            }
        }
    }

    fn start_export(&mut self, ledger_account_id: String) {
        // Replacing the handle aborts any earlier poller
        self.export_job = None;
        let client = self.client.clone();
        let tx = self.tx.clone();
        let updates = self.export_tx.clone();
        let interval = self.config.export.poll_interval();
        tokio::spawn(async move {
            let result = ExportJob::start(client, ledger_account_id, interval, updates).await;
            let _ = tx.send(AppMessage::ExportStarted(result)).await;
        });
    }

    fn show_error(&mut self, action: &str, error: &ClientError) {
        let message = match error {
            ClientError::Unauthorized => "Not authorized: check [api] token".to_string(),
            other => format!("{}: {}", action, other.summary()),
        };
        self.toast = Some(Toast::error(message));
    }
}

async fn mutate<V, D>(
    client: &GraphqlClient,
    op: &'static Operation,
    variables: &V,
) -> Result<&'static [&'static str], ClientError>
where
    V: Serialize,
    D: DeserializeOwned,
{
    client.execute::<V, D>(op, variables).await?;
    Ok(op.evicts)
}

/// Send the mutation for `submission`; returns the roots it made stale
async fn run_mutation(
    client: &GraphqlClient,
    submission: &Submission,
) -> Result<&'static [&'static str], ClientError> {
    match submission {
        Submission::Approve { process_id } => {
            let vars = Input {
                input: ProcessInput { process_id },
            };
            mutate::<_, ApprovalProcessPayload>(client, &APPROVAL_PROCESS_APPROVE, &vars).await
        }
        Submission::Deny { process_id, reason } => {
            let vars = DenyVars {
                input: ProcessInput { process_id },
                reason,
            };
            mutate::<_, ApprovalProcessPayload>(client, &APPROVAL_PROCESS_DENY, &vars).await
        }
        Submission::ConfirmWithdrawal { withdrawal_id } => {
            let vars = Input {
                input: WithdrawalIdInput { withdrawal_id },
            };
            mutate::<_, WithdrawalPayload>(client, &WITHDRAWAL_CONFIRM, &vars).await
        }
        Submission::CancelWithdrawal { withdrawal_id } => {
            let vars = Input {
                input: WithdrawalIdInput { withdrawal_id },
            };
            mutate::<_, WithdrawalPayload>(client, &WITHDRAWAL_CANCEL, &vars).await
        }
        Submission::RecordDeposit {
            customer_id,
            amount,
            reference,
        } => {
            let vars = Input {
                input: CustomerAmountInput {
                    customer_id,
                    amount: *amount,
                    reference: reference.as_deref(),
                },
            };
            mutate::<_, DepositPayload>(client, &DEPOSIT_RECORD, &vars).await
        }
        Submission::InitiateWithdrawal {
            customer_id,
            amount,
            reference,
        } => {
            let vars = Input {
                input: CustomerAmountInput {
                    customer_id,
                    amount: *amount,
                    reference: reference.as_deref(),
                },
            };
            mutate::<_, WithdrawalPayload>(client, &WITHDRAWAL_INITIATE, &vars).await
        }
        Submission::CreateCommittee { name } => {
            let vars = Input {
                input: CommitteeCreateInput { name },
            };
            mutate::<_, CommitteePayload>(client, &COMMITTEE_CREATE, &vars).await
        }
        Submission::AssignCommittee {
            policy_id,
            committee,
            threshold,
        } => {
            let vars = Input {
                input: PolicyAssignCommitteeInput {
                    policy_id,
                    committee_id: committee,
                    threshold: *threshold,
                },
            };
            mutate::<_, PolicyPayload>(client, &POLICY_ASSIGN_COMMITTEE, &vars).await
        }
        Submission::CreateCustomer { email, telegram_id } => {
            let vars = Input {
                input: CustomerCreateInput { email, telegram_id },
            };
            mutate::<_, CustomerPayload>(client, &CUSTOMER_CREATE, &vars).await
        }
        Submission::CreateCreditFacility {
            customer_id,
            facility,
            terms,
        } => {
            let vars = Input {
                input: CreditFacilityCreateInput {
                    customer_id,
                    facility: *facility,
                    terms: *terms,
                },
            };
            mutate::<_, CreditFacilityPayload>(client, &CREDIT_FACILITY_CREATE, &vars).await
        }
        Submission::UpdateCollateral {
            credit_facility_id,
            collateral,
        } => {
            let vars = Input {
                input: CollateralUpdateInput {
                    credit_facility_id,
                    collateral: *collateral,
                },
            };
            mutate::<_, CreditFacilityPayload>(client, &CREDIT_FACILITY_COLLATERAL_UPDATE, &vars)
                .await
        }
        Submission::InitiateDisbursal {
            credit_facility_id,
            amount,
        } => {
            let vars = Input {
                input: DisbursalInitiateInput {
                    credit_facility_id,
                    amount: *amount,
                },
            };
            mutate::<_, DisbursalPayload>(client, &CREDIT_FACILITY_DISBURSAL_INITIATE, &vars).await
        }
        Submission::StartExport { .. } => Ok(&[]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphql::connection::{Edge, PageInfo};
    use crate::tui::modal::FormKind;
    use serde_json::json;

    fn app() -> (App, mpsc::Receiver<AppMessage>) {
        let (tx, rx) = mpsc::channel(16);
        let (export_tx, _export_rx) = mpsc::channel(4);
        let config = Config::default();
        let client = GraphqlClient::new(&config.api).unwrap();
        (App::new(config, client, None, LogBuffer::new(), tx, export_tx), rx)
    }

    fn customers(n: usize) -> AppMessage {
        customers_page(n, None)
    }

    fn customers_page(n: usize, end_cursor: Option<&str>) -> AppMessage {
        let edges = (0..n)
            .map(|i| Edge {
                cursor: format!("c{}", i),
                node: serde_json::from_value(json!({
                    "customerId": format!("c-{}", i),
                    "email": format!("user{}@x.io", i),
                    "status": "ACTIVE",
                    "createdAt": "2025-01-01T00:00:00Z"
                }))
                .unwrap(),
            })
            .collect();
        AppMessage::Customers(PageResult {
            result: Ok(Connection {
                edges,
                page_info: PageInfo {
                    has_next_page: end_cursor.is_some(),
                    end_cursor: end_cursor.map(str::to_string),
                },
            }),
            append: false,
        })
    }

    #[tokio::test]
    async fn first_page_claims_focus_on_next_tick() {
        let (mut app, _rx) = app();
        app.handle_message(customers(3));
        assert_eq!(app.active, ActiveElement::Body);
        app.tick();
        assert_eq!(app.active, ActiveElement::TableRow(0));
    }

    #[tokio::test]
    async fn modal_steals_and_returns_focus() {
        let (mut app, _rx) = app();
        app.handle_message(customers(2));
        app.tick();

        app.create_committee();
        assert!(app.active.is_control());
        assert_eq!(app.pages.customers.focused_item().map(|c| c.email.as_str()), None);

        app.close_modal();
        app.tick();
        assert_eq!(app.active, ActiveElement::TableRow(0));
    }

    #[tokio::test]
    async fn data_arriving_behind_the_logs_panel_leaves_focus_there() {
        let (mut app, _rx) = app();
        app.toggle_logs_focus();
        assert_eq!(app.active, ActiveElement::Outside);

        app.handle_message(customers(3));
        app.tick();
        assert_eq!(app.active, ActiveElement::Outside);
        assert!(app.pages.customers.focused_item().is_none());

        app.toggle_logs_focus();
        app.tick();
        assert_eq!(app.active, ActiveElement::TableRow(0));
    }

    #[tokio::test]
    async fn data_arriving_under_a_dialog_does_not_steal_focus() {
        let (mut app, _rx) = app();
        app.create_committee();
        app.handle_message(customers(2));
        app.tick();
        assert!(app.active.is_control());
        assert!(app.modal.is_some());
    }

    #[tokio::test]
    async fn rows_stay_visible_while_refetching_after_a_mutation() {
        let (mut app, _rx) = app();
        app.handle_message(customers(3));
        app.tick();

        app.finish_mutation(
            Submission::CreateCommittee {
                name: "risk".to_string(),
            },
            Ok(&["customers"]),
        );
        assert!(app.pages.list_mut(ViewKind::Customers).is_loading());
        assert_eq!(app.pages.customers.items().len(), 3);
        assert_eq!(app.active, ActiveElement::TableRow(0));
    }

    #[tokio::test]
    async fn refresh_waits_for_the_next_page_in_flight() {
        let (mut app, _rx) = app();
        app.handle_message(customers_page(2, Some("c1")));
        app.next_page();
        assert!(app.pages.list_mut(ViewKind::Customers).is_loading());

        app.refresh();
        assert_eq!(app.toast.as_ref().map(|t| t.message.as_str()), Some("Still loading"));
        assert_eq!(app.pages.customers.items().len(), 2);
    }

    #[tokio::test]
    async fn route_change_clears_context() {
        let (mut app, _rx) = app();
        app.handle_message(AppMessage::Row(RowAction::Committee(Selection::new("k-1", "risk"))));
        assert!(!app.context.is_empty());

        app.navigate(Route::list(ViewKind::Policies));
        assert!(app.context.is_empty());
        assert!(app.back());
        assert_eq!(app.router.current(), &Route::list(ViewKind::Customers));
    }

    #[tokio::test]
    async fn deposit_needs_a_customer() {
        let (mut app, _rx) = app();
        app.navigate(Route::list(ViewKind::Deposits));
        app.record_deposit();
        assert!(app.modal.is_none());
        assert!(app.toast.is_some());

        app.context.customer = Some(Selection::new("c-1", "alice@x.io"));
        app.record_deposit();
        assert!(matches!(app.modal, Some(Modal::Form(_))));
    }

    #[tokio::test]
    async fn collateral_and_disbursal_need_a_facility() {
        let (mut app, _rx) = app();
        app.update_collateral();
        assert!(app.modal.is_none());
        assert_eq!(
            app.toast.as_ref().map(|t| t.message.as_str()),
            Some("Open a credit facility first")
        );

        app.navigate(Route::CreditFacility("f-1".to_string()));
        app.initiate_disbursal();
        let Some(Modal::Form(form)) = &app.modal else {
            panic!("expected disbursal form");
        };
        assert_eq!(
            form.kind,
            FormKind::InitiateDisbursal {
                facility: Selection::new("f-1", "f")
            }
        );
    }

    #[tokio::test]
    async fn new_facility_uses_focused_customer() {
        let (mut app, _rx) = app();
        app.create_credit_facility();
        assert!(app.modal.is_none());

        app.handle_message(customers(2));
        app.tick();
        app.create_credit_facility();
        let Some(Modal::Form(form)) = &app.modal else {
            panic!("expected facility form");
        };
        assert_eq!(
            form.kind,
            FormKind::CreateCreditFacility {
                customer: Selection::new("c-0", "user0@x.io")
            }
        );
    }

    #[tokio::test]
    async fn unknown_committee_is_rejected_before_network() {
        let (mut app, _rx) = app();
        app.submit(Submission::AssignCommittee {
            policy_id: "p-1".to_string(),
            committee: "nobody".to_string(),
            threshold: 1,
        });
        let toast = app.toast.as_ref().map(|t| t.message.as_str());
        assert_eq!(toast, Some("Unknown committee: nobody"));
    }

    #[tokio::test]
    async fn failed_page_shows_toast() {
        let (mut app, _rx) = app();
        app.handle_message(AppMessage::Customers(PageResult {
            result: Err(ClientError::Unauthorized),
            append: false,
        }));
        assert_eq!(
            app.toast.as_ref().map(|t| t.message.as_str()),
            Some("Not authorized: check [api] token")
        );
    }
}
