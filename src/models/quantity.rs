use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::{KytchenError, Result};

/// Parse a user-supplied quantity into an exact decimal.
///
/// Quantities are never floats: repeated additive reconciliation across
/// many days must not drift. Negative and non-numeric input is rejected
/// here, before it enters the data model.
pub fn parse_quantity(text: &str) -> Result<Decimal> {
    let value = Decimal::from_str(text.trim())
        .map_err(|_| KytchenError::InvalidQuantity(text.to_string()))?;
    ensure_non_negative(text, value)
}

/// Reject negative quantities that arrive already parsed (e.g. from JSON).
pub fn ensure_non_negative(context: &str, value: Decimal) -> Result<Decimal> {
    if value < Decimal::ZERO {
        return Err(KytchenError::InvalidQuantity(context.to_string()));
    }
    Ok(value)
}
