use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::customer::CustomerRef;
use crate::money::UsdCents;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WithdrawalStatus {
    PendingApproval,
    PendingConfirmation,
    Confirmed,
    Denied,
    Cancelled,
}

impl WithdrawalStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::PendingApproval => "Pending Approval",
            Self::PendingConfirmation => "Pending Confirmation",
            Self::Confirmed => "Confirmed",
            Self::Denied => "Denied",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Only approved, unconfirmed withdrawals may be confirmed or cancelled
    pub fn awaiting_confirmation(&self) -> bool {
        matches!(self, Self::PendingConfirmation)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Withdrawal {
    pub withdrawal_id: String,
    pub amount: UsdCents,
    pub status: WithdrawalStatus,
    #[serde(default)]
    pub reference: Option<String>,
    pub created_at: DateTime<Utc>,
    pub customer: CustomerRef,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deposit {
    pub deposit_id: String,
    pub amount: UsdCents,
    #[serde(default)]
    pub reference: Option<String>,
    pub created_at: DateTime<Utc>,
    pub customer: CustomerRef,
}
