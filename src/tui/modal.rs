// Modal dialogs
//
// Self-contained dialogs that handle their own input and return actions.
// App holds Option<Modal> and acts on the returned ModalAction; nothing
// reaches the network until a dialog returns Submit.

use crossterm::event::KeyCode;

use super::context::Selection;
use crate::graphql::operations::TermsInput;
use crate::money::{Satoshis, UsdCents};
use crate::validation::{self, ValidationError};

/// A validated request, ready to become a mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Approve {
        process_id: String,
    },
    Deny {
        process_id: String,
        reason: String,
    },
    ConfirmWithdrawal {
        withdrawal_id: String,
    },
    CancelWithdrawal {
        withdrawal_id: String,
    },
    RecordDeposit {
        customer_id: String,
        amount: UsdCents,
        reference: Option<String>,
    },
    InitiateWithdrawal {
        customer_id: String,
        amount: UsdCents,
        reference: Option<String>,
    },
    CreateCommittee {
        name: String,
    },
    /// `committee` is a name or id typed by the user; App resolves it
    AssignCommittee {
        policy_id: String,
        committee: String,
        threshold: u32,
    },
    StartExport {
        ledger_account_id: String,
    },
    CreateCustomer {
        email: String,
        telegram_id: String,
    },
    CreateCreditFacility {
        customer_id: String,
        facility: UsdCents,
        terms: TermsInput,
    },
    /// `collateral` is the new total, not a delta
    UpdateCollateral {
        credit_facility_id: String,
        collateral: Satoshis,
    },
    InitiateDisbursal {
        credit_facility_id: String,
        amount: UsdCents,
    },
}

impl Submission {
    /// Past-tense outcome for the success toast
    pub fn label(&self) -> &'static str {
        match self {
            Self::Approve { .. } => "Approval submitted",
            Self::Deny { .. } => "Denial submitted",
            Self::ConfirmWithdrawal { .. } => "Withdrawal confirmed",
            Self::CancelWithdrawal { .. } => "Withdrawal cancelled",
            Self::RecordDeposit { .. } => "Deposit recorded",
            Self::InitiateWithdrawal { .. } => "Withdrawal initiated",
            Self::CreateCommittee { .. } => "Committee created",
            Self::AssignCommittee { .. } => "Committee assigned",
            Self::StartExport { .. } => "Export started",
            Self::CreateCustomer { .. } => "Customer created",
            Self::CreateCreditFacility { .. } => "Credit facility created",
            Self::UpdateCollateral { .. } => "Collateral updated",
            Self::InitiateDisbursal { .. } => "Disbursal initiated",
        }
    }
}

/// Actions returned by modal input handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalAction {
    /// Input consumed, no state change needed
    None,
    Close,
    Submit(Submission),
    /// Swap this dialog for another (decision → confirm)
    Replace(Modal),
    /// Put text on the clipboard
    Copy(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportState {
    Pending,
    Ready(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    Help,
    /// Approve or deny a pending approval process
    ApprovalDecision {
        process_id: String,
        description: String,
    },
    /// Confirm or cancel an approved withdrawal
    WithdrawalDecision {
        withdrawal_id: String,
        description: String,
    },
    Confirm {
        prompt: String,
        submission: Submission,
    },
    Form(Form),
    /// Running CSV export; closing it cancels the poller
    Export { csv_id: String, state: ExportState },
}

impl Modal {
    pub fn is_form(&self) -> bool {
        matches!(self, Self::Form(_))
    }

    pub fn handle_input(&mut self, key: KeyCode) -> ModalAction {
        match self {
            Self::Help => match key {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => ModalAction::Close,
                _ => ModalAction::None,
            },
            Self::ApprovalDecision {
                process_id,
                description,
            } => match key {
                KeyCode::Char('a') => ModalAction::Replace(Modal::Confirm {
                    prompt: format!("Approve {}?", description),
                    submission: Submission::Approve {
                        process_id: process_id.clone(),
                    },
                }),
                KeyCode::Char('d') => ModalAction::Replace(Modal::Form(Form::deny(process_id))),
                KeyCode::Esc => ModalAction::Close,
                _ => ModalAction::None,
            },
            Self::WithdrawalDecision {
                withdrawal_id,
                description,
            } => match key {
                KeyCode::Char('c') => ModalAction::Replace(Modal::Confirm {
                    prompt: format!("Confirm {}?", description),
                    submission: Submission::ConfirmWithdrawal {
                        withdrawal_id: withdrawal_id.clone(),
                    },
                }),
                KeyCode::Char('x') => ModalAction::Replace(Modal::Confirm {
                    prompt: format!("Cancel {}?", description),
                    submission: Submission::CancelWithdrawal {
                        withdrawal_id: withdrawal_id.clone(),
                    },
                }),
                KeyCode::Esc => ModalAction::Close,
                _ => ModalAction::None,
            },
            Self::Confirm { submission, .. } => match key {
                KeyCode::Char('y') | KeyCode::Enter => ModalAction::Submit(submission.clone()),
                KeyCode::Char('n') | KeyCode::Esc => ModalAction::Close,
                _ => ModalAction::None,
            },
            Self::Form(form) => form.handle_input(key),
            Self::Export { state, .. } => match (key, state) {
                (KeyCode::Char('y'), ExportState::Ready(link)) => ModalAction::Copy(link.clone()),
                (KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q'), _) => ModalAction::Close,
                _ => ModalAction::None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormKind {
    Deny { process_id: String },
    RecordDeposit { customer: Selection },
    InitiateWithdrawal { customer: Selection },
    CreateCommittee,
    AssignCommittee { policy: Selection },
    Export,
    CreateCustomer,
    CreateCreditFacility { customer: Selection },
    UpdateCollateral { facility: Selection },
    InitiateDisbursal { facility: Selection },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub label: &'static str,
    pub value: String,
}

impl Field {
    fn new(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
        }
    }

    fn with_value(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

/// Text-input dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    pub kind: FormKind,
    pub fields: Vec<Field>,
    pub focus: usize,
    /// Last validation failure, shown under the fields
    pub error: Option<String>,
}

impl Form {
    fn new(kind: FormKind, fields: Vec<Field>) -> Self {
        Self {
            kind,
            fields,
            focus: 0,
            error: None,
        }
    }

    pub fn deny(process_id: &str) -> Self {
        Self::new(
            FormKind::Deny {
                process_id: process_id.to_string(),
            },
            vec![Field::new("Reason")],
        )
    }

    pub fn deposit(customer: Selection) -> Self {
        Self::new(
            FormKind::RecordDeposit { customer },
            vec![Field::new("Amount (USD)"), Field::new("Reference")],
        )
    }

    pub fn withdrawal(customer: Selection) -> Self {
        Self::new(
            FormKind::InitiateWithdrawal { customer },
            vec![Field::new("Amount (USD)"), Field::new("Reference")],
        )
    }

    pub fn committee() -> Self {
        Self::new(FormKind::CreateCommittee, vec![Field::new("Name")])
    }

    /// Committee field is prefilled when one is already selected
    pub fn assign(policy: Selection, committee: Option<&Selection>) -> Self {
        let committee = committee.map(|c| c.label.clone()).unwrap_or_default();
        Self::new(
            FormKind::AssignCommittee { policy },
            vec![
                Field::with_value("Committee", committee),
                Field::with_value("Threshold", "1"),
            ],
        )
    }

    pub fn export() -> Self {
        Self::new(FormKind::Export, vec![Field::new("Ledger account id")])
    }

    pub fn customer() -> Self {
        Self::new(
            FormKind::CreateCustomer,
            vec![Field::new("Email"), Field::new("Telegram id")],
        )
    }

    /// Terms start from common defaults; every field stays editable
    pub fn credit_facility(customer: Selection) -> Self {
        Self::new(
            FormKind::CreateCreditFacility { customer },
            vec![
                Field::new("Facility (USD)"),
                Field::with_value("Annual rate (%)", "12"),
                Field::with_value("Duration (months)", "12"),
                Field::with_value("Initial CVL (%)", "140"),
                Field::with_value("Margin call CVL (%)", "125"),
                Field::with_value("Liquidation CVL (%)", "105"),
                Field::with_value("One-time fee (%)", "1"),
            ],
        )
    }

    pub fn collateral(facility: Selection) -> Self {
        Self::new(
            FormKind::UpdateCollateral { facility },
            vec![Field::new("New collateral (BTC)")],
        )
    }

    pub fn disbursal(facility: Selection) -> Self {
        Self::new(
            FormKind::InitiateDisbursal { facility },
            vec![Field::new("Amount (USD)")],
        )
    }

    pub fn title(&self) -> String {
        match &self.kind {
            FormKind::Deny { .. } => " Deny approval ".to_string(),
            FormKind::RecordDeposit { customer } => format!(" Record deposit for {} ", customer.label),
            FormKind::InitiateWithdrawal { customer } => {
                format!(" Initiate withdrawal for {} ", customer.label)
            }
            FormKind::CreateCommittee => " Create committee ".to_string(),
            FormKind::AssignCommittee { policy } => format!(" Assign committee to {} ", policy.label),
            FormKind::Export => " Export ledger account CSV ".to_string(),
            FormKind::CreateCustomer => " Create customer ".to_string(),
            FormKind::CreateCreditFacility { customer } => {
                format!(" New credit facility for {} ", customer.label)
            }
            FormKind::UpdateCollateral { facility } => {
                format!(" Update collateral of {} ", facility.label)
            }
            FormKind::InitiateDisbursal { facility } => {
                format!(" Initiate disbursal on {} ", facility.label)
            }
        }
    }

    fn value(&self, index: usize) -> &str {
        self.fields.get(index).map_or("", |f| f.value.as_str())
    }

    fn optional(&self, index: usize) -> Option<String> {
        let value = self.value(index).trim();
        (!value.is_empty()).then(|| value.to_string())
    }

    /// Check every field and build the request
    pub fn validate(&self) -> Result<Submission, ValidationError> {
        match &self.kind {
            FormKind::Deny { process_id } => Ok(Submission::Deny {
                process_id: process_id.clone(),
                reason: validation::required("Reason", self.value(0))?.to_string(),
            }),
            FormKind::RecordDeposit { customer } => Ok(Submission::RecordDeposit {
                customer_id: customer.id.clone(),
                amount: validation::usd_amount("Amount", self.value(0))?,
                reference: self.optional(1),
            }),
            FormKind::InitiateWithdrawal { customer } => Ok(Submission::InitiateWithdrawal {
                customer_id: customer.id.clone(),
                amount: validation::usd_amount("Amount", self.value(0))?,
                reference: self.optional(1),
            }),
            FormKind::CreateCommittee => Ok(Submission::CreateCommittee {
                name: validation::required("Name", self.value(0))?.to_string(),
            }),
            FormKind::AssignCommittee { policy } => Ok(Submission::AssignCommittee {
                policy_id: policy.id.clone(),
                committee: validation::required("Committee", self.value(0))?.to_string(),
                threshold: validation::threshold(self.value(1))?,
            }),
            FormKind::Export => Ok(Submission::StartExport {
                ledger_account_id: validation::uuid("Ledger account id", self.value(0))?.to_string(),
            }),
            FormKind::CreateCustomer => Ok(Submission::CreateCustomer {
                email: validation::email(self.value(0))?.to_string(),
                telegram_id: validation::required("Telegram id", self.value(1))?.to_string(),
            }),
            FormKind::CreateCreditFacility { customer } => {
                let facility = validation::usd_amount("Facility", self.value(0))?;
                let annual_rate = validation::percent("Annual rate", self.value(1))?;
                let months = validation::count("Duration", self.value(2))?;
                let initial = validation::percent("Initial CVL", self.value(3))?;
                let margin_call = validation::percent("Margin call CVL", self.value(4))?;
                let liquidation = validation::percent("Liquidation CVL", self.value(5))?;
                let fee = validation::percent("One-time fee", self.value(6))?;
                validation::cvl_order(initial, margin_call, liquidation)?;
                Ok(Submission::CreateCreditFacility {
                    customer_id: customer.id.clone(),
                    facility,
                    terms: TermsInput::monthly(annual_rate, months, initial, margin_call, liquidation, fee),
                })
            }
            FormKind::UpdateCollateral { facility } => Ok(Submission::UpdateCollateral {
                credit_facility_id: facility.id.clone(),
                collateral: validation::btc_amount("Collateral", self.value(0))?,
            }),
            FormKind::InitiateDisbursal { facility } => Ok(Submission::InitiateDisbursal {
                credit_facility_id: facility.id.clone(),
                amount: validation::usd_amount("Amount", self.value(0))?,
            }),
        }
    }

    fn handle_input(&mut self, key: KeyCode) -> ModalAction {
        match key {
            KeyCode::Esc => return ModalAction::Close,
            KeyCode::Enter => {
                return match self.validate() {
                    Ok(submission) => ModalAction::Submit(submission),
                    Err(e) => {
                        self.error = Some(e.to_string());
                        ModalAction::None
                    }
                };
            }
            KeyCode::Tab | KeyCode::Down => self.focus = (self.focus + 1) % self.fields.len().max(1),
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = self.focus.checked_sub(1).unwrap_or(self.fields.len().saturating_sub(1))
            }
            KeyCode::Backspace => {
                if let Some(field) = self.fields.get_mut(self.focus) {
                    field.value.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(field) = self.fields.get_mut(self.focus) {
                    field.value.push(c);
                }
            }
            _ => {}
        }
        ModalAction::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(modal: &mut Modal, text: &str) {
        for c in text.chars() {
            modal.handle_input(KeyCode::Char(c));
        }
    }

    fn customer() -> Selection {
        Selection::new("c-1", "alice@x.io")
    }

    #[test]
    fn approve_goes_through_confirmation() {
        let mut modal = Modal::ApprovalDecision {
            process_id: "p-1".to_string(),
            description: "Withdrawal Approval".to_string(),
        };
        let ModalAction::Replace(mut confirm) = modal.handle_input(KeyCode::Char('a')) else {
            panic!("expected confirm dialog");
        };
        assert_eq!(
            confirm.handle_input(KeyCode::Enter),
            ModalAction::Submit(Submission::Approve {
                process_id: "p-1".to_string()
            })
        );
        assert_eq!(confirm.handle_input(KeyCode::Esc), ModalAction::Close);
    }

    #[test]
    fn deny_requires_reason() {
        let mut modal = Modal::Form(Form::deny("p-1"));
        assert_eq!(modal.handle_input(KeyCode::Enter), ModalAction::None);
        let Modal::Form(form) = &modal else { unreachable!() };
        assert_eq!(form.error.as_deref(), Some("Reason is required"));

        type_text(&mut modal, "missing docs");
        assert_eq!(
            modal.handle_input(KeyCode::Enter),
            ModalAction::Submit(Submission::Deny {
                process_id: "p-1".to_string(),
                reason: "missing docs".to_string()
            })
        );
    }

    #[test]
    fn deposit_needs_positive_amount() {
        let mut modal = Modal::Form(Form::deposit(customer()));
        type_text(&mut modal, "0");
        assert_eq!(modal.handle_input(KeyCode::Enter), ModalAction::None);

        modal.handle_input(KeyCode::Backspace);
        type_text(&mut modal, "1,250.50");
        modal.handle_input(KeyCode::Tab);
        type_text(&mut modal, "wire-42");
        assert_eq!(
            modal.handle_input(KeyCode::Enter),
            ModalAction::Submit(Submission::RecordDeposit {
                customer_id: "c-1".to_string(),
                amount: UsdCents::new(125_050),
                reference: Some("wire-42".to_string()),
            })
        );
    }

    #[test]
    fn blank_reference_is_none() {
        let mut form = Form::withdrawal(customer());
        form.fields[0].value = "$20".to_string();
        form.fields[1].value = "   ".to_string();
        assert_eq!(
            form.validate(),
            Ok(Submission::InitiateWithdrawal {
                customer_id: "c-1".to_string(),
                amount: UsdCents::new(2_000),
                reference: None,
            })
        );
    }

    #[test]
    fn assign_prefills_selected_committee() {
        let committee = Selection::new("k-1", "risk");
        let form = Form::assign(Selection::new("p-1", "Withdrawal Approval"), Some(&committee));
        assert_eq!(
            form.validate(),
            Ok(Submission::AssignCommittee {
                policy_id: "p-1".to_string(),
                committee: "risk".to_string(),
                threshold: 1,
            })
        );
    }

    #[test]
    fn export_rejects_malformed_ids() {
        let mut form = Form::export();
        form.fields[0].value = "not-a-uuid".to_string();
        assert!(matches!(form.validate(), Err(ValidationError::InvalidId(_))));
    }

    #[test]
    fn customer_needs_valid_email_and_telegram_id() {
        let mut form = Form::customer();
        form.fields[0].value = "alice".to_string();
        form.fields[1].value = "@alice".to_string();
        assert!(matches!(form.validate(), Err(ValidationError::InvalidEmail(_))));

        form.fields[0].value = "alice@bank.io".to_string();
        assert_eq!(
            form.validate(),
            Ok(Submission::CreateCustomer {
                email: "alice@bank.io".to_string(),
                telegram_id: "@alice".to_string(),
            })
        );
    }

    #[test]
    fn facility_terms_are_checked_before_submitting() {
        let mut form = Form::credit_facility(customer());
        assert_eq!(form.validate(), Err(ValidationError::Required("Facility")));

        form.fields[0].value = "10,000".to_string();
        form.fields[4].value = "150".to_string();
        assert_eq!(form.validate(), Err(ValidationError::CvlOrder));

        form.fields[4].value = "125".to_string();
        let Ok(Submission::CreateCreditFacility {
            customer_id,
            facility,
            terms,
        }) = form.validate()
        else {
            panic!("expected a facility submission");
        };
        assert_eq!(customer_id, "c-1");
        assert_eq!(facility, UsdCents::new(1_000_000));
        assert_eq!(terms.duration.units, 12);
        assert_eq!(terms.margin_call_cvl, rust_decimal::Decimal::from(125));
    }

    #[test]
    fn collateral_is_entered_in_btc() {
        let facility = Selection::new("f-1", "alice@x.io");
        let mut modal = Modal::Form(Form::collateral(facility.clone()));
        type_text(&mut modal, "1.5");
        assert_eq!(
            modal.handle_input(KeyCode::Enter),
            ModalAction::Submit(Submission::UpdateCollateral {
                credit_facility_id: "f-1".to_string(),
                collateral: Satoshis::new(150_000_000),
            })
        );

        let mut form = Form::disbursal(facility);
        form.fields[0].value = "0".to_string();
        assert_eq!(form.validate(), Err(ValidationError::NotPositive("Amount")));
        form.fields[0].value = "2,500".to_string();
        assert_eq!(
            form.validate(),
            Ok(Submission::InitiateDisbursal {
                credit_facility_id: "f-1".to_string(),
                amount: UsdCents::new(250_000),
            })
        );
    }

    #[test]
    fn focus_wraps_both_ways() {
        let mut form = Form::deposit(customer());
        form.handle_input(KeyCode::BackTab);
        assert_eq!(form.focus, 1);
        form.handle_input(KeyCode::Tab);
        assert_eq!(form.focus, 0);
    }

    #[test]
    fn export_link_copies_only_when_ready() {
        let mut modal = Modal::Export {
            csv_id: "csv-1".to_string(),
            state: ExportState::Pending,
        };
        assert_eq!(modal.handle_input(KeyCode::Char('y')), ModalAction::None);

        let mut modal = Modal::Export {
            csv_id: "csv-1".to_string(),
            state: ExportState::Ready("https://x/csv".to_string()),
        };
        assert_eq!(
            modal.handle_input(KeyCode::Char('y')),
            ModalAction::Copy("https://x/csv".to_string())
        );
    }

    #[test]
    fn withdrawal_decision_offers_confirm_and_cancel() {
        let mut modal = Modal::WithdrawalDecision {
            withdrawal_id: "w-1".to_string(),
            description: "$20.00 for alice@x.io".to_string(),
        };
        let ModalAction::Replace(Modal::Confirm { submission, .. }) = modal.handle_input(KeyCode::Char('x'))
        else {
            panic!("expected confirm dialog");
        };
        assert_eq!(
            submission,
            Submission::CancelWithdrawal {
                withdrawal_id: "w-1".to_string()
            }
        );
    }
}
