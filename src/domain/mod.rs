//! Typed records for the entities the console shows
//!
//! Shapes mirror the GraphQL selections in `graphql::operations`. Field names
//! arrive in camelCase; union fragments are decoded by their `__typename`.

pub mod approval;
pub mod credit_facility;
pub mod customer;
pub mod governance;
pub mod withdrawal;

pub use approval::{ApprovalProcess, ApprovalProcessStatus};
pub use credit_facility::{
    CollateralizationState, CreditFacility, CreditFacilityDetail, CreditFacilityStatus, Disbursal,
    DisbursalStatus, FacilityHistoryEntry,
};
pub use customer::{Customer, CustomerRef};
pub use governance::{Committee, Policy, User};
pub use withdrawal::{Deposit, Withdrawal, WithdrawalStatus};
