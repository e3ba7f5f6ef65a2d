use crate::error::{Result, SettlementError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Default platform fee, mirroring the deployed escrow contract.
pub const DEFAULT_FEE_PERCENT: Decimal = dec!(2.5);

const ONE_HUNDRED: Decimal = dec!(100);

/// The monetary split of a gross payment between the platform and the
/// service provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeeSplit {
    pub platform_fee: Decimal,
    pub provider_amount: Decimal,
    pub total: Decimal,
}

/// Splits a gross amount between the platform and the service provider.
///
/// Pure and deterministic. Decimal arithmetic keeps
/// `platform_fee + provider_amount == total` exact, so the result agrees
/// with the on-chain integer fee computation for the same percentage.
pub fn split(amount: Decimal, fee_percent: Decimal) -> Result<FeeSplit> {
    if amount < Decimal::ZERO {
        return Err(SettlementError::Validation(format!(
            "amount must be non-negative, got {amount}"
        )));
    }
    if fee_percent < Decimal::ZERO || fee_percent > ONE_HUNDRED {
        return Err(SettlementError::Validation(format!(
            "fee percentage must be within 0..=100, got {fee_percent}"
        )));
    }

    let platform_fee = amount * fee_percent / ONE_HUNDRED;
    Ok(FeeSplit {
        platform_fee,
        provider_amount: amount - platform_fee,
        total: amount,
    })
}
