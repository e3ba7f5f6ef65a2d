use crate::error::{Result, SettlementError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// USDC carries 6 decimal places on every supported chain.
pub const USDC_DECIMALS: u32 = 6;

const SMALLEST_UNITS_PER_WHOLE: Decimal = dec!(1000000);

/// Represents a positive payment amount in whole USDC.
///
/// This is a wrapper around `rust_decimal::Decimal` to enforce domain-specific rules
/// and provide type safety for financial calculations.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(SettlementError::Validation(
                "Amount must be positive".to_string(),
            ))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = SettlementError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

/// Converts a human-readable amount to the on-chain integer representation.
///
/// Fractions finer than 6 decimals are truncated, never rounded; the loss
/// only occurs on this path.
pub fn to_smallest_unit(amount: Decimal) -> String {
    (amount * SMALLEST_UNITS_PER_WHOLE).trunc().to_string()
}

/// Inverse of [`to_smallest_unit`]; exact for any integer unit count.
pub fn from_smallest_unit(units: &str) -> Result<Decimal> {
    let units = Decimal::from_str_exact(units.trim()).map_err(|e| {
        SettlementError::Validation(format!("invalid smallest-unit amount '{units}': {e}"))
    })?;
    if !units.is_integer() {
        return Err(SettlementError::Validation(format!(
            "smallest-unit amount must be an integer, got {units}"
        )));
    }
    Ok((units / SMALLEST_UNITS_PER_WHOLE).normalize())
}
