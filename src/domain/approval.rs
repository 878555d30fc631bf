use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::customer::CustomerRef;
use super::governance::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalProcessType {
    CreditFacilityApproval,
    WithdrawalApproval,
    DisbursalApproval,
}

impl ApprovalProcessType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::CreditFacilityApproval => "Credit Facility Approval",
            Self::WithdrawalApproval => "Withdrawal Approval",
            Self::DisbursalApproval => "Disbursal Approval",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalProcessStatus {
    InProgress,
    Approved,
    Denied,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitteeSummary {
    pub name: String,
    #[serde(default)]
    pub current_members: Vec<User>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitteeThreshold {
    pub threshold: u32,
    pub committee: CommitteeSummary,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemApproval {
    pub auto_approve: bool,
}

/// Voting rule attached to a policy or process
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "__typename")]
pub enum ApprovalRules {
    CommitteeThreshold(CommitteeThreshold),
    SystemApproval(SystemApproval),
}

impl ApprovalRules {
    pub fn describe(&self) -> String {
        match self {
            ApprovalRules::CommitteeThreshold(rule) => format!(
                "{} of {} ({})",
                rule.threshold,
                rule.committee.current_members.len(),
                rule.committee.name
            ),
            ApprovalRules::SystemApproval(rule) => {
                if rule.auto_approve {
                    "System (auto-approve)".to_string()
                } else {
                    "System (manual)".to_string()
                }
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalTarget {
    pub withdrawal_id: String,
    pub customer: CustomerRef,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditFacilityTarget {
    pub credit_facility_id: String,
    pub customer: CustomerRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisbursalFacility {
    pub customer: CustomerRef,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisbursalTarget {
    pub disbursal_id: String,
    pub credit_facility: DisbursalFacility,
}

/// Entity an approval process gates
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "__typename")]
pub enum ApprovalTarget {
    Withdrawal(WithdrawalTarget),
    CreditFacility(CreditFacilityTarget),
    CreditFacilityDisbursal(DisbursalTarget),
}

impl ApprovalTarget {
    pub fn customer_email(&self) -> &str {
        match self {
            ApprovalTarget::Withdrawal(t) => &t.customer.email,
            ApprovalTarget::CreditFacility(t) => &t.customer.email,
            ApprovalTarget::CreditFacilityDisbursal(t) => &t.credit_facility.customer.email,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalProcess {
    pub approval_process_id: String,
    pub approval_process_type: ApprovalProcessType,
    pub status: ApprovalProcessStatus,
    pub subject_can_submit_decision: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub denied_reason: Option<String>,
    #[serde(default)]
    pub rules: Option<ApprovalRules>,
    #[serde(default)]
    pub target: Option<ApprovalTarget>,
}

impl ApprovalProcess {
    /// Waiting on a decision the current user is allowed to make
    pub fn is_actionable(&self) -> bool {
        self.subject_can_submit_decision && self.status == ApprovalProcessStatus::InProgress
    }

    /// Detail page for the gated entity, when the type and target agree
    pub fn visit_url(&self) -> Option<String> {
        match (self.approval_process_type, self.target.as_ref()?) {
            (ApprovalProcessType::CreditFacilityApproval, ApprovalTarget::CreditFacility(t)) => {
                Some(format!("/credit-facilities/{}", t.credit_facility_id))
            }
            (ApprovalProcessType::WithdrawalApproval, ApprovalTarget::Withdrawal(t)) => {
                Some(format!("/withdrawals/{}", t.withdrawal_id))
            }
            (ApprovalProcessType::DisbursalApproval, ApprovalTarget::CreditFacilityDisbursal(t)) => {
                Some(format!("/disbursals/{}", t.disbursal_id))
            }
            _ => None,
        }
    }
}
