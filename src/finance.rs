// Facility calculators
//
// Pure functions over server-computed values. Everything is done in
// rust_decimal or integer minor units; floating point never touches money.

use crate::domain::{CreditFacilityStatus, DisbursalStatus};
use crate::money::{ConversionError, CvlPct, Satoshis, UsdCents, CENTS_PER_USD, SATS_PER_BTC};
use rust_decimal::{Decimal, RoundingStrategy};

/// Risk tier of a facility given its current CVL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CvlStatus {
    /// At or above the margin call threshold
    Healthy,
    /// Below margin call, at or above liquidation
    MarginCall,
    /// Below the liquidation threshold
    Liquidation,
}

impl CvlStatus {
    pub fn label(&self) -> &'static str {
        match self {
            CvlStatus::Healthy => "High",
            CvlStatus::MarginCall => "Moderate",
            CvlStatus::Liquidation => "Critical",
        }
    }
}

/// Collateral price (cents per whole BTC) at which the position sits exactly at `cvl`.
///
/// `price = (cvl/100 * basis/100) / (collateral/SATS_PER_BTC)`, returned in
/// cents. Zero collateral has no meaningful price and yields zero.
pub fn price_at_cvl(
    cvl: CvlPct,
    basis: UsdCents,
    collateral: Satoshis,
) -> Result<UsdCents, ConversionError> {
    if collateral.is_zero() {
        return Ok(UsdCents::ZERO);
    }

    let ratio = cvl.into_inner() / Decimal::ONE_HUNDRED;
    let basis_usd = basis.to_usd();
    let collateral_btc = collateral.to_btc();

    let price_cents = ratio
        .checked_mul(basis_usd)
        .and_then(|exposure| exposure.checked_div(collateral_btc))
        .and_then(|price_usd| price_usd.checked_mul(Decimal::from(CENTS_PER_USD)))
        .ok_or(ConversionError::Overflow(cvl.into_inner()))?;
    UsdCents::from_cents_rounded(price_cents)
}

/// Amount the CVL and liquidation prices should be computed against.
///
/// Pending facilities use the nominal amount. Active facilities switch to the
/// outstanding balance once any disbursal has been approved. Everything else
/// has no exposure.
pub fn base_amount(
    status: CreditFacilityStatus,
    facility_amount: UsdCents,
    disbursals: &[DisbursalStatus],
    outstanding: UsdCents,
) -> UsdCents {
    match status {
        CreditFacilityStatus::PendingCollateralization | CreditFacilityStatus::PendingApproval => {
            facility_amount
        }
        CreditFacilityStatus::Active => {
            if disbursals.contains(&DisbursalStatus::Approved) {
                outstanding
            } else {
                facility_amount
            }
        }
        CreditFacilityStatus::Matured | CreditFacilityStatus::Closed => UsdCents::ZERO,
    }
}

/// One-time fee (`facility_amount * fee_rate_percent / 100`) plus accrued interest
pub fn total_cost(
    facility_amount: UsdCents,
    fee_rate_percent: Decimal,
    total_interest: UsdCents,
) -> Result<UsdCents, ConversionError> {
    let fee_cents = Decimal::from(facility_amount.into_inner())
        .checked_mul(fee_rate_percent)
        .ok_or(ConversionError::Overflow(fee_rate_percent))?
        / Decimal::ONE_HUNDRED;
    let fee = UsdCents::from_cents_rounded(fee_cents)?;
    fee.checked_add(total_interest)
}

/// Classify the current CVL against the facility's thresholds
pub fn cvl_status(current: CvlPct, margin_call: CvlPct, liquidation: CvlPct) -> CvlStatus {
    if current >= margin_call {
        CvlStatus::Healthy
    } else if current >= liquidation {
        CvlStatus::MarginCall
    } else {
        CvlStatus::Liquidation
    }
}

/// Market value of `collateral` at `price_of_one_btc`, rounded down to the cent
pub fn collateral_value(
    collateral: Satoshis,
    price_of_one_btc: UsdCents,
) -> Result<UsdCents, ConversionError> {
    let usd = (Decimal::from(collateral.into_inner()) / Decimal::from(SATS_PER_BTC))
        .checked_mul(price_of_one_btc.to_usd())
        .ok_or(ConversionError::Overflow(price_of_one_btc.to_usd()))?;
    UsdCents::try_from_usd(usd.round_dp_with_strategy(2, RoundingStrategy::ToZero))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_is_zero_without_collateral() {
        let price = price_at_cvl(CvlPct::new(150), UsdCents::new(1_000_00), Satoshis::ZERO);
        assert_eq!(price.unwrap(), UsdCents::ZERO);
    }

    #[test]
    fn price_equals_basis_at_full_cvl_for_one_coin() {
        let price = price_at_cvl(
            CvlPct::new(100),
            UsdCents::new(100_000_00),
            Satoshis::new(100_000_000),
        );
        assert_eq!(price.unwrap(), UsdCents::new(100_000_00));
    }

    #[test]
    fn price_scales_with_cvl_and_collateral() {
        // 125% of $50,000 spread over half a coin -> $125,000 per coin
        let price = price_at_cvl(
            CvlPct::new(125),
            UsdCents::new(50_000_00),
            Satoshis::new(50_000_000),
        );
        assert_eq!(price.unwrap(), UsdCents::new(125_000_00));
    }

    #[test]
    fn price_rounds_to_whole_cents() {
        let price = price_at_cvl(CvlPct::new(100), UsdCents::new(100_00), Satoshis::new(3))
            .unwrap();
        // 100 / 0.00000003 = 3,333,333,333.33.. USD
        assert_eq!(price, UsdCents::new(333_333_333_333));
    }

    #[test]
    fn pending_facilities_use_nominal_amount() {
        let amount = base_amount(
            CreditFacilityStatus::PendingApproval,
            UsdCents::new(500_000),
            &[],
            UsdCents::ZERO,
        );
        assert_eq!(amount, UsdCents::new(500_000));

        let amount = base_amount(
            CreditFacilityStatus::PendingCollateralization,
            UsdCents::new(500_000),
            &[DisbursalStatus::Approved],
            UsdCents::new(1),
        );
        assert_eq!(amount, UsdCents::new(500_000));
    }

    #[test]
    fn active_facility_switches_to_outstanding_after_approval() {
        let amount = base_amount(
            CreditFacilityStatus::Active,
            UsdCents::new(500_000),
            &[DisbursalStatus::Approved],
            UsdCents::new(123_456),
        );
        assert_eq!(amount, UsdCents::new(123_456));
    }

    #[test]
    fn active_facility_without_approved_disbursal_uses_nominal() {
        let amount = base_amount(
            CreditFacilityStatus::Active,
            UsdCents::new(500_000),
            &[DisbursalStatus::New, DisbursalStatus::Denied],
            UsdCents::new(123_456),
        );
        assert_eq!(amount, UsdCents::new(500_000));
    }

    #[test]
    fn closed_and_matured_have_no_base() {
        for status in [CreditFacilityStatus::Closed, CreditFacilityStatus::Matured] {
            let amount = base_amount(status, UsdCents::new(1), &[], UsdCents::new(1));
            assert_eq!(amount, UsdCents::ZERO);
        }
    }

    #[test]
    fn total_cost_adds_fee_and_interest() {
        let cost = total_cost(UsdCents::new(1_000_00), Decimal::from(2), UsdCents::new(50_00));
        assert_eq!(cost.unwrap(), UsdCents::new(70_00));
    }

    #[test]
    fn total_cost_is_stable_across_repeated_calls() {
        let rate = Decimal::new(1, 1);
        let first = total_cost(UsdCents::new(33_333_33), rate, UsdCents::new(1)).unwrap();
        for _ in 0..1_000 {
            assert_eq!(
                total_cost(UsdCents::new(33_333_33), rate, UsdCents::new(1)).unwrap(),
                first
            );
        }
        // 0.1% of 3,333,333 cents = 3,333.333 -> 3,333 cents, +1 interest
        assert_eq!(first, UsdCents::new(3_334));
    }

    #[test]
    fn negative_fee_rate_is_rejected() {
        let result = total_cost(UsdCents::new(100), Decimal::from(-5), UsdCents::ZERO);
        assert!(result.is_err());
    }

    #[test]
    fn extreme_server_values_overflow_instead_of_panicking() {
        let huge = UsdCents::new(u64::MAX);
        let price = price_at_cvl(CvlPct::new(u64::MAX), huge, Satoshis::new(1));
        assert!(matches!(price, Err(ConversionError::Overflow(_))));

        let cost = total_cost(huge, Decimal::from(u64::MAX), UsdCents::ZERO);
        assert!(matches!(cost, Err(ConversionError::Overflow(_))));

        let cost = total_cost(UsdCents::ZERO, Decimal::ONE, huge);
        assert_eq!(cost, Ok(huge));
        let cost = total_cost(UsdCents::new(100), Decimal::ONE_HUNDRED, huge);
        assert!(matches!(cost, Err(ConversionError::Overflow(_))));

        let value = collateral_value(Satoshis::new(u64::MAX), huge);
        assert!(matches!(value, Err(ConversionError::Overflow(_))));
    }

    #[test]
    fn cvl_tiers() {
        let margin = CvlPct::new(125);
        let liquidation = CvlPct::new(105);
        assert_eq!(cvl_status(CvlPct::new(150), margin, liquidation), CvlStatus::Healthy);
        assert_eq!(cvl_status(CvlPct::new(125), margin, liquidation), CvlStatus::Healthy);
        assert_eq!(cvl_status(CvlPct::new(110), margin, liquidation), CvlStatus::MarginCall);
        assert_eq!(cvl_status(CvlPct::new(105), margin, liquidation), CvlStatus::MarginCall);
        assert_eq!(cvl_status(CvlPct::new(90), margin, liquidation), CvlStatus::Liquidation);
    }

    #[test]
    fn collateral_value_rounds_down() {
        // 12,345 sats at $50,000/BTC = $6.1725 -> $6.17
        let value = collateral_value(Satoshis::new(12_345), UsdCents::new(5_000_000)).unwrap();
        assert_eq!(value, UsdCents::new(617));
    }
}
