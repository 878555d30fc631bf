//! Operation catalogue
//!
//! Each operation names the root field its result lives under and, for
//! mutations, the cached roots a successful write makes stale.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{
    ApprovalProcess, Committee, CreditFacility, CreditFacilityDetail, Customer, Deposit, Disbursal,
    Policy, User, Withdrawal,
};
use crate::money::{Satoshis, UsdCents};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
}

#[derive(Debug)]
pub struct Operation {
    pub name: &'static str,
    pub kind: OperationKind,
    /// Field under `data` holding the result
    pub root: &'static str,
    pub document: &'static str,
    /// Cached roots to drop after this mutation succeeds
    pub evicts: &'static [&'static str],
}

// ─────────────────────────────────────────────────────────────────────────────
// List queries
// ─────────────────────────────────────────────────────────────────────────────

pub const CUSTOMERS: Operation = Operation {
    name: "Customers",
    kind: OperationKind::Query,
    root: "customers",
    document: r#"query Customers($first: Int!, $after: String) {
  customers(first: $first, after: $after) {
    edges { cursor node { customerId email telegramId status createdAt } }
    pageInfo { hasNextPage endCursor }
  }
}"#,
    evicts: &[],
};

pub const CREDIT_FACILITIES: Operation = Operation {
    name: "CreditFacilities",
    kind: OperationKind::Query,
    root: "creditFacilities",
    document: r#"query CreditFacilities($first: Int!, $after: String) {
  creditFacilities(first: $first, after: $after) {
    edges {
      cursor
      node {
        creditFacilityId status facilityAmount collateralizationState currentCvl createdAt
        balance { outstanding { usdBalance } collateral { btcBalance } }
        customer { customerId email }
      }
    }
    pageInfo { hasNextPage endCursor }
  }
}"#,
    evicts: &[],
};

pub const WITHDRAWALS: Operation = Operation {
    name: "Withdrawals",
    kind: OperationKind::Query,
    root: "withdrawals",
    document: r#"query Withdrawals($first: Int!, $after: String) {
  withdrawals(first: $first, after: $after) {
    edges {
      cursor
      node { withdrawalId amount status reference createdAt customer { customerId email } }
    }
    pageInfo { hasNextPage endCursor }
  }
}"#,
    evicts: &[],
};

pub const DEPOSITS: Operation = Operation {
    name: "Deposits",
    kind: OperationKind::Query,
    root: "deposits",
    document: r#"query Deposits($first: Int!, $after: String) {
  deposits(first: $first, after: $after) {
    edges {
      cursor
      node { depositId amount reference createdAt customer { customerId email } }
    }
    pageInfo { hasNextPage endCursor }
  }
}"#,
    evicts: &[],
};

pub const COMMITTEES: Operation = Operation {
    name: "Committees",
    kind: OperationKind::Query,
    root: "committees",
    document: r#"query Committees($first: Int!, $after: String) {
  committees(first: $first, after: $after) {
    edges {
      cursor
      node { committeeId name createdAt currentMembers { userId email roles } }
    }
    pageInfo { hasNextPage endCursor }
  }
}"#,
    evicts: &[],
};

pub const POLICIES: Operation = Operation {
    name: "Policies",
    kind: OperationKind::Query,
    root: "policies",
    document: r#"query Policies($first: Int!, $after: String) {
  policies(first: $first, after: $after) {
    edges {
      cursor
      node {
        policyId approvalProcessType
        rules {
          __typename
          ... on CommitteeThreshold { threshold committee { name currentMembers { userId email roles } } }
          ... on SystemApproval { autoApprove }
        }
      }
    }
    pageInfo { hasNextPage endCursor }
  }
}"#,
    evicts: &[],
};

pub const APPROVAL_PROCESSES: Operation = Operation {
    name: "ApprovalProcesses",
    kind: OperationKind::Query,
    root: "approvalProcesses",
    document: r#"query ApprovalProcesses($first: Int!, $after: String) {
  approvalProcesses(first: $first, after: $after) {
    edges {
      cursor
      node {
        approvalProcessId approvalProcessType status subjectCanSubmitDecision createdAt deniedReason
        target {
          __typename
          ... on Withdrawal { withdrawalId customer { email } }
          ... on CreditFacility { creditFacilityId customer { email } }
          ... on CreditFacilityDisbursal { disbursalId creditFacility { customer { email } } }
        }
      }
    }
    pageInfo { hasNextPage endCursor }
  }
}"#,
    evicts: &[],
};

pub const ACCOUNTING_CSVS: Operation = Operation {
    name: "AccountingCsvsForLedgerAccountId",
    kind: OperationKind::Query,
    root: "accountingCsvsForLedgerAccountId",
    document: r#"query AccountingCsvsForLedgerAccountId($ledgerAccountId: UUID!, $first: Int!, $after: String) {
  accountingCsvsForLedgerAccountId(ledgerAccountId: $ledgerAccountId, first: $first, after: $after) {
    edges { cursor node { csvId status createdAt } }
    pageInfo { hasNextPage endCursor }
  }
}"#,
    evicts: &[],
};

// ─────────────────────────────────────────────────────────────────────────────
// Single-record queries
// ─────────────────────────────────────────────────────────────────────────────

pub const CREDIT_FACILITY: Operation = Operation {
    name: "CreditFacility",
    kind: OperationKind::Query,
    root: "creditFacility",
    document: r#"query CreditFacility($id: UUID!) {
  creditFacility(id: $id) {
    creditFacilityId status facilityAmount collateralizationState currentCvl createdAt maturesAt
    balance {
      outstanding { usdBalance }
      collateral { btcBalance }
      interest { total { usdBalance } }
    }
    customer { customerId email }
    creditFacilityTerms { annualRate oneTimeFeeRate initialCvl marginCallCvl liquidationCvl }
    disbursals { disbursalId amount status createdAt }
    history {
      __typename
      ... on CreditFacilityCollateralUpdated { satoshis recordedAt action txId }
      ... on CreditFacilityCollateralizationUpdated {
        state collateral outstandingInterest outstandingDisbursal recordedAt price
      }
      ... on CreditFacilityApproved { cents recordedAt txId }
      ... on CreditFacilityIncrementalPayment { cents recordedAt txId }
      ... on CreditFacilityDisbursalExecuted { cents recordedAt txId }
      ... on CreditFacilityInterestAccrued { cents recordedAt days }
    }
    approvalProcess {
      approvalProcessId approvalProcessType status subjectCanSubmitDecision createdAt deniedReason
      rules {
        __typename
        ... on CommitteeThreshold { threshold committee { name currentMembers { userId email roles } } }
        ... on SystemApproval { autoApprove }
      }
    }
  }
}"#,
    evicts: &[],
};

pub const REALTIME_PRICE: Operation = Operation {
    name: "RealtimePrice",
    kind: OperationKind::Query,
    root: "realtimePrice",
    document: r#"query RealtimePrice { realtimePrice { usdCentsPerBtc } }"#,
    evicts: &[],
};

pub const ME: Operation = Operation {
    name: "Me",
    kind: OperationKind::Query,
    root: "me",
    document: r#"query Me { me { user { userId email roles } } }"#,
    evicts: &[],
};

// ─────────────────────────────────────────────────────────────────────────────
// Mutations
// ─────────────────────────────────────────────────────────────────────────────

pub const APPROVAL_PROCESS_APPROVE: Operation = Operation {
    name: "ApprovalProcessApprove",
    kind: OperationKind::Mutation,
    root: "approvalProcessApprove",
    document: r#"mutation ApprovalProcessApprove($input: ApprovalProcessApproveInput!) {
  approvalProcessApprove(input: $input) {
    approvalProcess { approvalProcessId approvalProcessType status subjectCanSubmitDecision createdAt }
  }
}"#,
    evicts: &["creditFacilities", "withdrawals", "approvalProcesses", "creditFacility"],
};

pub const APPROVAL_PROCESS_DENY: Operation = Operation {
    name: "ApprovalProcessDeny",
    kind: OperationKind::Mutation,
    root: "approvalProcessDeny",
    document: r#"mutation ApprovalProcessDeny($input: ApprovalProcessDenyInput!, $reason: String!) {
  approvalProcessDeny(input: $input, reason: $reason) {
    approvalProcess { approvalProcessId approvalProcessType status subjectCanSubmitDecision createdAt deniedReason }
  }
}"#,
    evicts: &["creditFacilities", "withdrawals", "approvalProcesses", "creditFacility"],
};

pub const WITHDRAWAL_INITIATE: Operation = Operation {
    name: "WithdrawalInitiate",
    kind: OperationKind::Mutation,
    root: "withdrawalInitiate",
    document: r#"mutation WithdrawalInitiate($input: WithdrawalInitiateInput!) {
  withdrawalInitiate(input: $input) {
    withdrawal { withdrawalId amount status reference createdAt customer { customerId email } }
  }
}"#,
    evicts: &["withdrawals", "approvalProcesses", "customers"],
};

pub const WITHDRAWAL_CONFIRM: Operation = Operation {
    name: "WithdrawalConfirm",
    kind: OperationKind::Mutation,
    root: "withdrawalConfirm",
    document: r#"mutation WithdrawalConfirm($input: WithdrawalConfirmInput!) {
  withdrawalConfirm(input: $input) {
    withdrawal { withdrawalId amount status reference createdAt customer { customerId email } }
  }
}"#,
    evicts: &["withdrawals", "customers"],
};

pub const WITHDRAWAL_CANCEL: Operation = Operation {
    name: "WithdrawalCancel",
    kind: OperationKind::Mutation,
    root: "withdrawalCancel",
    document: r#"mutation WithdrawalCancel($input: WithdrawalCancelInput!) {
  withdrawalCancel(input: $input) {
    withdrawal { withdrawalId amount status reference createdAt customer { customerId email } }
  }
}"#,
    evicts: &["withdrawals", "customers"],
};

pub const DEPOSIT_RECORD: Operation = Operation {
    name: "DepositRecord",
    kind: OperationKind::Mutation,
    root: "depositRecord",
    document: r#"mutation DepositRecord($input: DepositRecordInput!) {
  depositRecord(input: $input) {
    deposit { depositId amount reference createdAt customer { customerId email } }
  }
}"#,
    evicts: &["deposits", "customers"],
};

pub const COMMITTEE_CREATE: Operation = Operation {
    name: "CommitteeCreate",
    kind: OperationKind::Mutation,
    root: "committeeCreate",
    document: r#"mutation CommitteeCreate($input: CommitteeCreateInput!) {
  committeeCreate(input: $input) {
    committee { committeeId name createdAt currentMembers { userId email roles } }
  }
}"#,
    evicts: &["committees"],
};

pub const POLICY_ASSIGN_COMMITTEE: Operation = Operation {
    name: "PolicyAssignCommittee",
    kind: OperationKind::Mutation,
    root: "policyAssignCommittee",
    document: r#"mutation PolicyAssignCommittee($input: PolicyAssignCommitteeInput!) {
  policyAssignCommittee(input: $input) {
    policy {
      policyId approvalProcessType
      rules {
        __typename
        ... on CommitteeThreshold { threshold committee { name currentMembers { userId email roles } } }
        ... on SystemApproval { autoApprove }
      }
    }
  }
}"#,
    evicts: &["policies"],
};

pub const CUSTOMER_CREATE: Operation = Operation {
    name: "CustomerCreate",
    kind: OperationKind::Mutation,
    root: "customerCreate",
    document: r#"mutation CustomerCreate($input: CustomerCreateInput!) {
  customerCreate(input: $input) {
    customer { customerId email telegramId status createdAt }
  }
}"#,
    evicts: &["customers"],
};

pub const CREDIT_FACILITY_CREATE: Operation = Operation {
    name: "CreditFacilityCreate",
    kind: OperationKind::Mutation,
    root: "creditFacilityCreate",
    document: r#"mutation CreditFacilityCreate($input: CreditFacilityCreateInput!) {
  creditFacilityCreate(input: $input) {
    creditFacility {
      creditFacilityId status facilityAmount collateralizationState currentCvl createdAt
      balance { outstanding { usdBalance } collateral { btcBalance } }
      customer { customerId email }
    }
  }
}"#,
    evicts: &["creditFacilities", "approvalProcesses"],
};

pub const CREDIT_FACILITY_COLLATERAL_UPDATE: Operation = Operation {
    name: "CreditFacilityCollateralUpdate",
    kind: OperationKind::Mutation,
    root: "creditFacilityCollateralUpdate",
    document: r#"mutation CreditFacilityCollateralUpdate($input: CreditFacilityCollateralUpdateInput!) {
  creditFacilityCollateralUpdate(input: $input) {
    creditFacility {
      creditFacilityId status facilityAmount collateralizationState currentCvl createdAt
      balance { outstanding { usdBalance } collateral { btcBalance } }
      customer { customerId email }
    }
  }
}"#,
    evicts: &["creditFacilities", "creditFacility"],
};

pub const CREDIT_FACILITY_DISBURSAL_INITIATE: Operation = Operation {
    name: "CreditFacilityDisbursalInitiate",
    kind: OperationKind::Mutation,
    root: "creditFacilityDisbursalInitiate",
    document: r#"mutation CreditFacilityDisbursalInitiate($input: CreditFacilityDisbursalInitiateInput!) {
  creditFacilityDisbursalInitiate(input: $input) {
    disbursal { disbursalId amount status createdAt }
  }
}"#,
    evicts: &["creditFacility", "creditFacilities", "approvalProcesses"],
};

pub const LEDGER_ACCOUNT_CSV_CREATE: Operation = Operation {
    name: "LedgerAccountCsvCreate",
    kind: OperationKind::Mutation,
    root: "ledgerAccountCsvCreate",
    document: r#"mutation LedgerAccountCsvCreate($input: LedgerAccountCsvCreateInput!) {
  ledgerAccountCsvCreate(input: $input) { accountingCsv { csvId status createdAt } }
}"#,
    evicts: &["accountingCsvsForLedgerAccountId"],
};

pub const ACCOUNTING_CSV_DOWNLOAD_LINK_GENERATE: Operation = Operation {
    name: "AccountingCsvDownloadLinkGenerate",
    kind: OperationKind::Mutation,
    root: "accountingCsvDownloadLinkGenerate",
    document: r#"mutation AccountingCsvDownloadLinkGenerate($input: AccountingCsvDownloadLinkGenerateInput!) {
  accountingCsvDownloadLinkGenerate(input: $input) { link { url csvId } }
}"#,
    evicts: &[],
};

// ─────────────────────────────────────────────────────────────────────────────
// Variables
// ─────────────────────────────────────────────────────────────────────────────

/// Wraps a mutation's input object as `{ "input": ... }`
#[derive(Debug, Serialize)]
pub struct Input<T> {
    pub input: T,
}

#[derive(Debug, Serialize)]
pub struct IdVars<'a> {
    pub id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessInput<'a> {
    pub process_id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct DenyVars<'a> {
    pub input: ProcessInput<'a>,
    pub reason: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalIdInput<'a> {
    pub withdrawal_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerAmountInput<'a> {
    pub customer_id: &'a str,
    pub amount: UsdCents,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct CommitteeCreateInput<'a> {
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyAssignCommitteeInput<'a> {
    pub policy_id: &'a str,
    pub committee_id: &'a str,
    pub threshold: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerCreateInput<'a> {
    pub email: &'a str,
    pub telegram_id: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterestInterval {
    EndOfDay,
    EndOfMonth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Period {
    Months,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Duration {
    pub units: u32,
    pub period: Period,
}

/// Credit terms of a new facility; rates and CVLs are percentages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TermsInput {
    #[serde(with = "rust_decimal::serde::float")]
    pub annual_rate: Decimal,
    pub accrual_interval: InterestInterval,
    pub incurrence_interval: InterestInterval,
    #[serde(with = "rust_decimal::serde::float")]
    pub liquidation_cvl: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub margin_call_cvl: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub initial_cvl: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub one_time_fee_rate: Decimal,
    pub duration: Duration,
}

impl TermsInput {
    /// Interest accrues daily and is charged at the end of each month
    pub fn monthly(
        annual_rate: Decimal,
        months: u32,
        initial_cvl: Decimal,
        margin_call_cvl: Decimal,
        liquidation_cvl: Decimal,
        one_time_fee_rate: Decimal,
    ) -> Self {
        Self {
            annual_rate,
            accrual_interval: InterestInterval::EndOfMonth,
            incurrence_interval: InterestInterval::EndOfDay,
            liquidation_cvl,
            margin_call_cvl,
            initial_cvl,
            one_time_fee_rate,
            duration: Duration {
                units: months,
                period: Period::Months,
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditFacilityCreateInput<'a> {
    pub customer_id: &'a str,
    pub facility: UsdCents,
    pub terms: TermsInput,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollateralUpdateInput<'a> {
    pub credit_facility_id: &'a str,
    pub collateral: Satoshis,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisbursalInitiateInput<'a> {
    pub credit_facility_id: &'a str,
    pub amount: UsdCents,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerAccountInput<'a> {
    pub ledger_account_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvListVars<'a> {
    pub ledger_account_id: &'a str,
    pub first: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvIdInput<'a> {
    pub accounting_csv_id: &'a str,
}

// ─────────────────────────────────────────────────────────────────────────────
// Payloads
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct MePayload {
    pub user: User,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealtimePrice {
    pub usd_cents_per_btc: UsdCents,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalProcessPayload {
    pub approval_process: ApprovalProcess,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WithdrawalPayload {
    pub withdrawal: Withdrawal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DepositPayload {
    pub deposit: Deposit,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitteePayload {
    pub committee: Committee,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PolicyPayload {
    pub policy: Policy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CustomerPayload {
    pub customer: Customer,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditFacilityPayload {
    pub credit_facility: CreditFacility,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisbursalPayload {
    pub disbursal: Disbursal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountingCsvStatus {
    Pending,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountingCsv {
    pub csv_id: String,
    pub status: AccountingCsvStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvCreatePayload {
    pub accounting_csv: AccountingCsv,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadLink {
    pub url: String,
    pub csv_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DownloadLinkPayload {
    pub link: DownloadLink,
}

/// Marker tying each list operation to its row type
pub trait ListOperation {
    type Node: serde::de::DeserializeOwned;
    const OPERATION: &'static Operation;
}

macro_rules! list_operation {
    ($name:ident, $node:ty, $op:ident) => {
        pub struct $name;

        impl ListOperation for $name {
            type Node = $node;
            const OPERATION: &'static Operation = &$op;
        }
    };
}

list_operation!(CustomersList, Customer, CUSTOMERS);
list_operation!(CreditFacilitiesList, CreditFacility, CREDIT_FACILITIES);
list_operation!(WithdrawalsList, Withdrawal, WITHDRAWALS);
list_operation!(DepositsList, Deposit, DEPOSITS);
list_operation!(CommitteesList, Committee, COMMITTEES);
list_operation!(PoliciesList, Policy, POLICIES);
list_operation!(ApprovalProcessesList, ApprovalProcess, APPROVAL_PROCESSES);

/// Decoded `CREDIT_FACILITY` result; `None` when the id is unknown
pub type CreditFacilityResult = Option<CreditFacilityDetail>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn mutations_declare_evictions() {
        for op in [
            &APPROVAL_PROCESS_APPROVE,
            &APPROVAL_PROCESS_DENY,
            &WITHDRAWAL_CONFIRM,
            &WITHDRAWAL_CANCEL,
            &DEPOSIT_RECORD,
            &COMMITTEE_CREATE,
            &POLICY_ASSIGN_COMMITTEE,
            &CUSTOMER_CREATE,
            &CREDIT_FACILITY_CREATE,
            &CREDIT_FACILITY_COLLATERAL_UPDATE,
            &CREDIT_FACILITY_DISBURSAL_INITIATE,
        ] {
            assert_eq!(op.kind, OperationKind::Mutation);
            assert!(!op.evicts.is_empty(), "{} evicts nothing", op.name);
        }
        assert!(COMMITTEE_CREATE.evicts.contains(&"committees"));
        assert!(WITHDRAWAL_CONFIRM.evicts.contains(&"withdrawals"));
        assert!(CUSTOMER_CREATE.evicts.contains(&"customers"));
        assert!(CREDIT_FACILITY_COLLATERAL_UPDATE.evicts.contains(&"creditFacility"));
        assert!(CREDIT_FACILITY_DISBURSAL_INITIATE.evicts.contains(&"creditFacility"));
    }

    #[test]
    fn documents_select_their_root() {
        for op in [
            &CUSTOMERS,
            &CREDIT_FACILITY,
            &ME,
            &LEDGER_ACCOUNT_CSV_CREATE,
            &CUSTOMER_CREATE,
            &CREDIT_FACILITY_CREATE,
            &CREDIT_FACILITY_COLLATERAL_UPDATE,
            &CREDIT_FACILITY_DISBURSAL_INITIATE,
        ] {
            assert!(op.document.contains(op.root), "{} missing {}", op.name, op.root);
        }
    }

    #[test]
    fn amounts_serialize_as_integers() {
        let vars = Input {
            input: CustomerAmountInput {
                customer_id: "c-1",
                amount: UsdCents::new(12_345),
                reference: None,
            },
        };
        assert_eq!(
            serde_json::to_value(&vars).unwrap(),
            json!({ "input": { "customerId": "c-1", "amount": 12345 } })
        );
    }

    #[test]
    fn facility_terms_serialize_as_numbers_and_enums() {
        let terms = TermsInput::monthly(
            Decimal::new(125, 1),
            12,
            Decimal::from(140),
            Decimal::from(125),
            Decimal::from(105),
            Decimal::ONE,
        );
        let vars = Input {
            input: CreditFacilityCreateInput {
                customer_id: "c-1",
                facility: UsdCents::new(1_000_000),
                terms,
            },
        };
        assert_eq!(
            serde_json::to_value(&vars).unwrap(),
            json!({
                "input": {
                    "customerId": "c-1",
                    "facility": 1000000,
                    "terms": {
                        "annualRate": 12.5,
                        "accrualInterval": "END_OF_MONTH",
                        "incurrenceInterval": "END_OF_DAY",
                        "liquidationCvl": 105.0,
                        "marginCallCvl": 125.0,
                        "initialCvl": 140.0,
                        "oneTimeFeeRate": 1.0,
                        "duration": { "units": 12, "period": "MONTHS" }
                    }
                }
            })
        );
    }

    #[test]
    fn collateral_is_sent_in_satoshis() {
        let vars = Input {
            input: CollateralUpdateInput {
                credit_facility_id: "f-1",
                collateral: Satoshis::new(50_000_000),
            },
        };
        assert_eq!(
            serde_json::to_value(&vars).unwrap(),
            json!({ "input": { "creditFacilityId": "f-1", "collateral": 50000000 } })
        );
    }
}
