// Money primitives
//
// Currency crosses the API boundary as integers only: US cents for fiat and
// satoshis for collateral. Conversions to major units go through rust_decimal
// so that display values round-trip exactly with the stored minor units.

use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const CENTS_PER_USD: u64 = 100;
pub const SATS_PER_BTC: u64 = 100_000_000;

/// Error converting a decimal major-unit amount into minor units
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    /// Amount has more precision than the minor unit allows
    FractionalMinorUnits(Decimal),
    /// Amount is below zero
    Negative(Decimal),
    /// Amount does not fit in a u64
    Overflow(Decimal),
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FractionalMinorUnits(d) => write!(f, "{} has fractional minor units", d),
            Self::Negative(d) => write!(f, "unexpected negative amount: {}", d),
            Self::Overflow(d) => write!(f, "amount out of range: {}", d),
        }
    }
}

impl std::error::Error for ConversionError {}

fn minor_units(value: Decimal) -> Result<u64, ConversionError> {
    if value.trunc() != value {
        return Err(ConversionError::FractionalMinorUnits(value));
    }
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ConversionError::Negative(value));
    }
    value.to_u64().ok_or(ConversionError::Overflow(value))
}

/// Fiat amount in US cents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsdCents(u64);

impl UsdCents {
    pub const ZERO: Self = Self(0);

    pub const fn new(cents: u64) -> Self {
        Self(cents)
    }

    pub fn to_usd(self) -> Decimal {
        Decimal::from(self.0) / Decimal::from(CENTS_PER_USD)
    }

    pub fn try_from_usd(usd: Decimal) -> Result<Self, ConversionError> {
        let cents = usd
            .checked_mul(Decimal::from(CENTS_PER_USD))
            .ok_or(ConversionError::Overflow(usd))?;
        minor_units(cents).map(Self)
    }

    /// Round an arbitrary cents value (possibly fractional) to whole cents
    pub fn from_cents_rounded(cents: Decimal) -> Result<Self, ConversionError> {
        minor_units(cents.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
            .map(Self)
    }

    pub fn into_inner(self) -> u64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl From<u64> for UsdCents {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl UsdCents {
    pub fn checked_add(self, other: Self) -> Result<Self, ConversionError> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or_else(|| ConversionError::Overflow(Decimal::from(self.0) + Decimal::from(other.0)))
    }
}

/// Renders as `$1,234.56`
impl fmt::Display for UsdCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dollars = self.0 / CENTS_PER_USD;
        let cents = self.0 % CENTS_PER_USD;
        write!(f, "${}.{:02}", group_thousands(dollars), cents)
    }
}

/// Collateral amount in satoshis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Satoshis(u64);

impl Satoshis {
    pub const ZERO: Self = Self(0);

    pub const fn new(sats: u64) -> Self {
        Self(sats)
    }

    pub fn to_btc(self) -> Decimal {
        Decimal::from(self.0) / Decimal::from(SATS_PER_BTC)
    }

    pub fn try_from_btc(btc: Decimal) -> Result<Self, ConversionError> {
        let sats = btc
            .checked_mul(Decimal::from(SATS_PER_BTC))
            .ok_or(ConversionError::Overflow(btc))?;
        minor_units(sats).map(Self)
    }

    pub fn into_inner(self) -> u64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl From<u64> for Satoshis {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Renders as `0.50000000 BTC`
impl fmt::Display for Satoshis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / SATS_PER_BTC;
        let frac = self.0 % SATS_PER_BTC;
        write!(f, "{}.{:08} BTC", group_thousands(whole), frac)
    }
}

/// Collateral value locked ratio, as a percentage (150 = 150%)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CvlPct(Decimal);

impl CvlPct {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(value: u64) -> Self {
        Self(Decimal::from(value))
    }

    pub fn into_inner(self) -> Decimal {
        self.0
    }
}

impl fmt::Display for CvlPct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}

/// Insert thousands separators: 1234567 -> "1,234,567"
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cents_display_groups_thousands() {
        assert_eq!(UsdCents::new(123_456_789).to_string(), "$1,234,567.89");
        assert_eq!(UsdCents::new(5).to_string(), "$0.05");
        assert_eq!(UsdCents::ZERO.to_string(), "$0.00");
    }

    #[test]
    fn sats_display_has_eight_places() {
        assert_eq!(Satoshis::new(50_000_000).to_string(), "0.50000000 BTC");
        assert_eq!(Satoshis::new(100_000_001).to_string(), "1.00000001 BTC");
    }

    #[test]
    fn usd_conversion_is_exact() {
        let cents = UsdCents::try_from_usd(Decimal::new(100_01, 2)).unwrap();
        assert_eq!(cents, UsdCents::new(10_001));
        assert_eq!(cents.to_usd(), Decimal::new(100_01, 2));
    }

    #[test]
    fn fractional_cents_are_rejected() {
        let err = UsdCents::try_from_usd(Decimal::new(1_001, 3)).unwrap_err();
        assert!(matches!(err, ConversionError::FractionalMinorUnits(_)));
    }

    #[test]
    fn negative_amounts_are_rejected() {
        let err = UsdCents::try_from_usd(Decimal::new(-1, 0)).unwrap_err();
        assert!(matches!(err, ConversionError::Negative(_)));
    }

    #[test]
    fn btc_conversion_stops_at_one_satoshi() {
        assert_eq!(
            Satoshis::try_from_btc(Decimal::new(150_000_000, 8)),
            Ok(Satoshis::new(150_000_000))
        );
        assert!(matches!(
            Satoshis::try_from_btc(Decimal::new(1, 9)),
            Err(ConversionError::FractionalMinorUnits(_))
        ));
    }

    #[test]
    fn out_of_range_amounts_are_errors() {
        let err = UsdCents::try_from_usd(Decimal::MAX).unwrap_err();
        assert_eq!(err, ConversionError::Overflow(Decimal::MAX));

        let sum = UsdCents::new(u64::MAX).checked_add(UsdCents::new(1));
        assert!(matches!(sum, Err(ConversionError::Overflow(_))));
        assert_eq!(
            UsdCents::new(70).checked_add(UsdCents::new(30)),
            Ok(UsdCents::new(100))
        );
    }

    #[test]
    fn rounding_goes_half_away_from_zero() {
        assert_eq!(
            UsdCents::from_cents_rounded(Decimal::new(1005, 1)).unwrap(),
            UsdCents::new(101)
        );
        assert_eq!(
            UsdCents::from_cents_rounded(Decimal::new(1004, 1)).unwrap(),
            UsdCents::new(100)
        );
    }

    #[test]
    fn amounts_deserialize_from_integers() {
        let cents: UsdCents = serde_json::from_str("150000").unwrap();
        assert_eq!(cents, UsdCents::new(150_000));
        let sats: Satoshis = serde_json::from_str("21").unwrap();
        assert_eq!(sats, Satoshis::new(21));
    }

    #[test]
    fn cvl_display_drops_trailing_zeros() {
        let cvl: CvlPct = serde_json::from_str(r#""125.00""#).unwrap();
        assert_eq!(cvl.to_string(), "125%");
    }
}
