use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use super::approval::ApprovalProcess;
use super::customer::CustomerRef;
use crate::finance::{self, CvlStatus};
use crate::money::{ConversionError, CvlPct, Satoshis, UsdCents};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CreditFacilityStatus {
    PendingCollateralization,
    PendingApproval,
    Active,
    Matured,
    Closed,
}

impl CreditFacilityStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::PendingCollateralization => "Pending Collateralization",
            Self::PendingApproval => "Pending Approval",
            Self::Active => "Active",
            Self::Matured => "Matured",
            Self::Closed => "Closed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisbursalStatus {
    New,
    Approved,
    Denied,
    Confirmed,
}

impl DisbursalStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Approved => "Approved",
            Self::Denied => "Denied",
            Self::Confirmed => "Confirmed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CollateralizationState {
    FullyCollateralized,
    UnderMarginCallThreshold,
    UnderLiquidationThreshold,
    NoCollateral,
}

impl CollateralizationState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::FullyCollateralized => "Fully Collateralized",
            Self::UnderMarginCallThreshold => "Under Margin Call",
            Self::UnderLiquidationThreshold => "Under Liquidation",
            Self::NoCollateral => "No Collateral",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CollateralAction {
    Add,
    Remove,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsdBalance {
    pub usd_balance: UsdCents,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BtcBalance {
    pub btc_balance: Satoshis,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InterestBalance {
    pub total: UsdBalance,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityBalance {
    pub outstanding: UsdBalance,
    pub collateral: BtcBalance,
    #[serde(default)]
    pub interest: Option<InterestBalance>,
}

/// Row of the credit facilities list
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditFacility {
    pub credit_facility_id: String,
    pub status: CreditFacilityStatus,
    pub facility_amount: UsdCents,
    pub collateralization_state: CollateralizationState,
    pub current_cvl: CvlPct,
    pub created_at: DateTime<Utc>,
    pub balance: FacilityBalance,
    pub customer: CustomerRef,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Disbursal {
    pub disbursal_id: String,
    pub amount: UsdCents,
    pub status: DisbursalStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityTerms {
    pub annual_rate: Decimal,
    pub one_time_fee_rate: Decimal,
    pub initial_cvl: CvlPct,
    pub margin_call_cvl: CvlPct,
    pub liquidation_cvl: CvlPct,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollateralUpdated {
    pub satoshis: Satoshis,
    pub recorded_at: DateTime<Utc>,
    pub action: CollateralAction,
    pub tx_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollateralizationUpdated {
    pub state: CollateralizationState,
    pub collateral: Satoshis,
    pub outstanding_interest: UsdCents,
    pub outstanding_disbursal: UsdCents,
    pub recorded_at: DateTime<Utc>,
    pub price: UsdCents,
}

/// Cash movement entry (approval, payment, disbursal)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CentsEntry {
    pub cents: UsdCents,
    pub recorded_at: DateTime<Utc>,
    pub tx_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterestAccrued {
    pub cents: UsdCents,
    pub recorded_at: DateTime<Utc>,
    pub days: u32,
}

/// One entry of a facility's history, discriminated by `__typename`
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "__typename")]
pub enum FacilityHistoryEntry {
    #[serde(rename = "CreditFacilityCollateralUpdated")]
    CollateralUpdated(CollateralUpdated),
    #[serde(rename = "CreditFacilityCollateralizationUpdated")]
    CollateralizationUpdated(CollateralizationUpdated),
    #[serde(rename = "CreditFacilityApproved")]
    Approved(CentsEntry),
    #[serde(rename = "CreditFacilityIncrementalPayment")]
    IncrementalPayment(CentsEntry),
    #[serde(rename = "CreditFacilityDisbursalExecuted")]
    DisbursalExecuted(CentsEntry),
    #[serde(rename = "CreditFacilityInterestAccrued")]
    InterestAccrued(InterestAccrued),
}

impl FacilityHistoryEntry {
    pub fn label(&self) -> String {
        match self {
            Self::CollateralUpdated(e) => match e.action {
                CollateralAction::Add => "Collateral Updated (Added)".to_string(),
                CollateralAction::Remove => "Collateral Updated (Removed)".to_string(),
            },
            Self::CollateralizationUpdated(e) => {
                format!("Collateralization Updated ({})", e.state.label())
            }
            Self::Approved(_) => "Approved".to_string(),
            Self::IncrementalPayment(_) => "Incremental Payment".to_string(),
            Self::DisbursalExecuted(_) => "Disbursal Executed".to_string(),
            Self::InterestAccrued(e) => format!("Interest Accrued ({} days)", e.days),
        }
    }

    pub fn recorded_at(&self) -> DateTime<Utc> {
        match self {
            Self::CollateralUpdated(e) => e.recorded_at,
            Self::CollateralizationUpdated(e) => e.recorded_at,
            Self::Approved(e) | Self::IncrementalPayment(e) | Self::DisbursalExecuted(e) => {
                e.recorded_at
            }
            Self::InterestAccrued(e) => e.recorded_at,
        }
    }

    /// Signed amount column: `+0.1 BTC`, `-$5.00`, or the price for CVL updates
    pub fn amount(&self) -> String {
        match self {
            Self::CollateralUpdated(e) => match e.action {
                CollateralAction::Add => format!("+{}", e.satoshis),
                CollateralAction::Remove => format!("-{}", e.satoshis),
            },
            Self::CollateralizationUpdated(e) => e.collateral.to_string(),
            Self::Approved(e) | Self::IncrementalPayment(e) | Self::DisbursalExecuted(e) => {
                e.cents.to_string()
            }
            Self::InterestAccrued(e) => e.cents.to_string(),
        }
    }
}

/// Full facility as shown on the detail view
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditFacilityDetail {
    pub credit_facility_id: String,
    pub status: CreditFacilityStatus,
    pub facility_amount: UsdCents,
    pub collateralization_state: CollateralizationState,
    pub current_cvl: CvlPct,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub matures_at: Option<DateTime<Utc>>,
    pub balance: FacilityBalance,
    pub customer: CustomerRef,
    pub credit_facility_terms: FacilityTerms,
    #[serde(default)]
    pub disbursals: Vec<Disbursal>,
    #[serde(default)]
    pub history: Vec<FacilityHistoryEntry>,
    #[serde(default)]
    pub approval_process: Option<ApprovalProcess>,
}

impl CreditFacilityDetail {
    pub fn outstanding(&self) -> UsdCents {
        self.balance.outstanding.usd_balance
    }

    pub fn collateral(&self) -> Satoshis {
        self.balance.collateral.btc_balance
    }

    pub fn total_interest(&self) -> UsdCents {
        self.balance
            .interest
            .as_ref()
            .map(|i| i.total.usd_balance)
            .unwrap_or(UsdCents::ZERO)
    }

    /// Amount the threshold prices are computed against
    pub fn base_amount(&self) -> UsdCents {
        let disbursals: Vec<DisbursalStatus> = self.disbursals.iter().map(|d| d.status).collect();
        finance::base_amount(
            self.status,
            self.facility_amount,
            &disbursals,
            self.outstanding(),
        )
    }

    pub fn margin_call_price(&self) -> Result<UsdCents, ConversionError> {
        finance::price_at_cvl(
            self.credit_facility_terms.margin_call_cvl,
            self.base_amount(),
            self.collateral(),
        )
    }

    pub fn liquidation_price(&self) -> Result<UsdCents, ConversionError> {
        finance::price_at_cvl(
            self.credit_facility_terms.liquidation_cvl,
            self.base_amount(),
            self.collateral(),
        )
    }

    pub fn cvl_status(&self) -> CvlStatus {
        finance::cvl_status(
            self.current_cvl,
            self.credit_facility_terms.margin_call_cvl,
            self.credit_facility_terms.liquidation_cvl,
        )
    }

    pub fn total_cost(&self) -> Result<UsdCents, ConversionError> {
        finance::total_cost(
            self.facility_amount,
            self.credit_facility_terms.one_time_fee_rate,
            self.total_interest(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn detail_json() -> serde_json::Value {
        json!({
            "creditFacilityId": "cf-1",
            "status": "ACTIVE",
            "facilityAmount": 500_000,
            "collateralizationState": "FULLY_COLLATERALIZED",
            "currentCvl": 150,
            "createdAt": "2025-01-02T03:04:05Z",
            "balance": {
                "outstanding": { "usdBalance": 123_456 },
                "collateral": { "btcBalance": 100_000_000 },
                "interest": { "total": { "usdBalance": 5_000 } }
            },
            "customer": { "customerId": "c-1", "email": "a@b.c" },
            "creditFacilityTerms": {
                "annualRate": "12",
                "oneTimeFeeRate": 2,
                "initialCvl": 140,
                "marginCallCvl": 125,
                "liquidationCvl": 105
            },
            "disbursals": [
                {
                    "disbursalId": "d-1",
                    "amount": 100_000,
                    "status": "APPROVED",
                    "createdAt": "2025-01-03T00:00:00Z"
                }
            ],
            "history": [
                {
                    "__typename": "CreditFacilityCollateralUpdated",
                    "satoshis": 100_000_000,
                    "recordedAt": "2025-01-02T03:04:05Z",
                    "action": "ADD",
                    "txId": "tx-1"
                },
                {
                    "__typename": "CreditFacilityInterestAccrued",
                    "cents": 5_000,
                    "recordedAt": "2025-02-01T00:00:00Z",
                    "days": 30
                }
            ]
        })
    }

    #[test]
    fn detail_decodes_history_union() {
        let detail: CreditFacilityDetail = serde_json::from_value(detail_json()).unwrap();
        assert_eq!(detail.history.len(), 2);
        assert!(matches!(
            detail.history[0],
            FacilityHistoryEntry::CollateralUpdated(CollateralUpdated {
                action: CollateralAction::Add,
                ..
            })
        ));
        assert_eq!(detail.history[1].label(), "Interest Accrued (30 days)");
        assert_eq!(detail.history[0].amount(), "+1.00000000 BTC");
    }

    #[test]
    fn unknown_history_typename_is_rejected() {
        let entry = json!({ "__typename": "SomethingElse", "cents": 1 });
        assert!(serde_json::from_value::<FacilityHistoryEntry>(entry).is_err());
    }

    #[test]
    fn detail_calculations_use_outstanding_after_approval() {
        let detail: CreditFacilityDetail = serde_json::from_value(detail_json()).unwrap();
        assert_eq!(detail.base_amount(), UsdCents::new(123_456));
        // 125% of $1,234.56 against one coin
        assert_eq!(detail.margin_call_price().unwrap(), UsdCents::new(154_320));
        assert_eq!(detail.cvl_status(), CvlStatus::Healthy);
        // 2% of $5,000.00 + $50.00 interest
        assert_eq!(detail.total_cost().unwrap(), UsdCents::new(15_000));
    }
}
