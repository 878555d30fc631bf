//! Pre-submit form checks
//!
//! Every mutation form runs its input through these before a request is
//! built. A failing check blocks submission and is shown inline.

use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

use crate::money::{Satoshis, UsdCents};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was left blank
    Required(&'static str),
    /// Text that should be a dollar amount isn't one
    InvalidAmount(String),
    /// Amount or count must be greater than zero
    NotPositive(&'static str),
    /// Identifier isn't a hyphenated UUID
    InvalidId(String),
    /// Text that should be a BTC amount isn't one
    InvalidBtc(String),
    InvalidEmail(String),
    /// Text that should be a number isn't one
    InvalidNumber(&'static str, String),
    /// Terms need initial > margin call > liquidation
    CvlOrder,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required(field) => write!(f, "{} is required", field),
            Self::InvalidAmount(input) => write!(f, "'{}' is not a valid USD amount", input),
            Self::NotPositive(field) => write!(f, "{} must be greater than zero", field),
            Self::InvalidId(input) => write!(f, "'{}' is not a valid id", input),
            Self::InvalidBtc(input) => write!(f, "'{}' is not a valid BTC amount", input),
            Self::InvalidEmail(input) => write!(f, "'{}' is not a valid email", input),
            Self::InvalidNumber(field, input) => write!(f, "{}: '{}' is not a number", field, input),
            Self::CvlOrder => write!(
                f,
                "Initial CVL must be above margin call CVL, and margin call above liquidation"
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Trimmed, non-empty field value
pub fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(trimmed)
}

/// Parse a dollar amount like `1,250.50` or `$20` into cents
pub fn usd_amount(field: &'static str, input: &str) -> Result<UsdCents, ValidationError> {
    let trimmed = required(field, input)?;
    let cleaned: String = trimmed
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();

    let usd = Decimal::from_str(&cleaned)
        .map_err(|_| ValidationError::InvalidAmount(trimmed.to_string()))?;
    if usd <= Decimal::ZERO {
        return Err(ValidationError::NotPositive(field));
    }

    UsdCents::try_from_usd(usd).map_err(|_| ValidationError::InvalidAmount(trimmed.to_string()))
}

/// Committee vote threshold
pub fn threshold(input: &str) -> Result<u32, ValidationError> {
    count("Threshold", input)
}

/// Whole number above zero
pub fn count(field: &'static str, input: &str) -> Result<u32, ValidationError> {
    let trimmed = required(field, input)?;
    let value: u32 = trimmed
        .parse()
        .map_err(|_| ValidationError::NotPositive(field))?;
    if value == 0 {
        return Err(ValidationError::NotPositive(field));
    }
    Ok(value)
}

/// Collateral in BTC, up to 8 decimals; zero releases all collateral
pub fn btc_amount(field: &'static str, input: &str) -> Result<Satoshis, ValidationError> {
    let trimmed = required(field, input)?;
    let btc = Decimal::from_str(trimmed)
        .map_err(|_| ValidationError::InvalidBtc(trimmed.to_string()))?;
    Satoshis::try_from_btc(btc).map_err(|_| ValidationError::InvalidBtc(trimmed.to_string()))
}

/// Percentage above zero, e.g. `12.5`
pub fn percent(field: &'static str, input: &str) -> Result<Decimal, ValidationError> {
    let trimmed = required(field, input)?;
    let value = Decimal::from_str(trimmed.trim_end_matches('%').trim_end())
        .map_err(|_| ValidationError::InvalidNumber(field, trimmed.to_string()))?;
    if value <= Decimal::ZERO {
        return Err(ValidationError::NotPositive(field));
    }
    Ok(value)
}

/// Credit terms must step down from initial to margin call to liquidation
pub fn cvl_order(
    initial: Decimal,
    margin_call: Decimal,
    liquidation: Decimal,
) -> Result<(), ValidationError> {
    if initial <= margin_call || margin_call <= liquidation {
        return Err(ValidationError::CvlOrder);
    }
    Ok(())
}

/// `local@domain.tld` with nothing else around it
pub fn email(input: &str) -> Result<&str, ValidationError> {
    let trimmed = required("Email", input)?;
    let valid = match trimmed.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.split('.').count() >= 2
                && domain.split('.').all(|part| !part.is_empty())
                && !trimmed.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(ValidationError::InvalidEmail(trimmed.to_string()));
    }
    Ok(trimmed)
}

/// Hyphenated 8-4-4-4-12 hex id, as the API issues them
pub fn uuid<'a>(field: &'static str, input: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = required(field, input)?;
    let groups: Vec<&str> = trimmed.split('-').collect();
    let lengths_ok = groups.len() == 5
        && groups
            .iter()
            .zip([8, 4, 4, 4, 12])
            .all(|(g, len)| g.len() == len);
    if !lengths_ok || !groups.iter().all(|g| g.chars().all(|c| c.is_ascii_hexdigit())) {
        return Err(ValidationError::InvalidId(trimmed.to_string()));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_is_required() {
        assert_eq!(required("Reason", "   "), Err(ValidationError::Required("Reason")));
        assert_eq!(required("Reason", " fraud "), Ok("fraud"));
    }

    #[test]
    fn amounts_parse_to_cents() {
        assert_eq!(usd_amount("Amount", "1,250.50"), Ok(UsdCents::new(125_050)));
        assert_eq!(usd_amount("Amount", "$20"), Ok(UsdCents::new(2_000)));
    }

    #[test]
    fn bad_amounts_are_rejected() {
        assert_eq!(usd_amount("Amount", "0"), Err(ValidationError::NotPositive("Amount")));
        assert_eq!(usd_amount("Amount", "-3"), Err(ValidationError::NotPositive("Amount")));
        assert!(matches!(
            usd_amount("Amount", "12.345"),
            Err(ValidationError::InvalidAmount(_))
        ));
        assert!(matches!(
            usd_amount("Amount", "ten"),
            Err(ValidationError::InvalidAmount(_))
        ));
    }

    #[test]
    fn threshold_must_be_positive() {
        assert_eq!(threshold("2"), Ok(2));
        assert!(threshold("0").is_err());
        assert!(threshold("").is_err());
    }

    #[test]
    fn btc_amounts_parse_to_sats() {
        assert_eq!(btc_amount("Collateral", "0.5"), Ok(Satoshis::new(50_000_000)));
        assert_eq!(btc_amount("Collateral", "0"), Ok(Satoshis::ZERO));
        assert!(matches!(
            btc_amount("Collateral", "0.000000001"),
            Err(ValidationError::InvalidBtc(_))
        ));
        assert!(matches!(
            btc_amount("Collateral", "-1"),
            Err(ValidationError::InvalidBtc(_))
        ));
    }

    #[test]
    fn percents_must_be_positive_numbers() {
        assert_eq!(percent("Annual rate", "12.5%"), Ok(Decimal::new(125, 1)));
        assert_eq!(percent("Annual rate", "0"), Err(ValidationError::NotPositive("Annual rate")));
        assert!(matches!(
            percent("Annual rate", "lots"),
            Err(ValidationError::InvalidNumber("Annual rate", _))
        ));
    }

    #[test]
    fn cvl_thresholds_step_down() {
        let d = |v: u32| Decimal::from(v);
        assert_eq!(cvl_order(d(140), d(125), d(105)), Ok(()));
        assert_eq!(cvl_order(d(125), d(125), d(105)), Err(ValidationError::CvlOrder));
        assert_eq!(cvl_order(d(140), d(100), d(105)), Err(ValidationError::CvlOrder));
    }

    #[test]
    fn emails_need_user_and_domain() {
        assert_eq!(email(" alice@bank.io "), Ok("alice@bank.io"));
        for bad in ["alice", "@bank.io", "alice@bank", "alice@@bank.io", "a b@bank.io", "alice@bank."] {
            assert!(matches!(email(bad), Err(ValidationError::InvalidEmail(_))), "{}", bad);
        }
        assert_eq!(count("Duration", "12"), Ok(12));
    }

    #[test]
    fn uuid_shape_is_checked() {
        let id = "5b2c1a4e-9f3d-4c1b-8e2a-7d6f5e4c3b2a";
        assert_eq!(uuid("Ledger account", id), Ok(id));
        assert!(matches!(
            uuid("Ledger account", "5b2c1a4e9f3d4c1b8e2a7d6f5e4c3b2a"),
            Err(ValidationError::InvalidId(_))
        ));
        assert!(matches!(
            uuid("Ledger account", "zzzzzzzz-9f3d-4c1b-8e2a-7d6f5e4c3b2a"),
            Err(ValidationError::InvalidId(_))
        ));
        assert_eq!(
            uuid("Ledger account", ""),
            Err(ValidationError::Required("Ledger account"))
        );
    }
}
