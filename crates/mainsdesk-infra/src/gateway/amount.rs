use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use super::GatewayError;

/// Converts a major-unit price (499.00) into the gateway's minor units (49900).
pub fn to_minor_units(price: Decimal) -> Result<i64, GatewayError> {
    if price <= Decimal::ZERO {
        return Err(GatewayError::InvalidAmount(format!(
            "price must be positive, got {}",
            price
        )));
    }

    price
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|v| v.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|v| v.to_i64())
        .ok_or_else(|| GatewayError::InvalidAmount(format!("price {} is out of range", price)))
}
