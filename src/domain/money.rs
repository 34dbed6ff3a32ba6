use crate::error::{PricingError, Result};
use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places kept for currency amounts.
pub const CURRENCY_DP: u32 = 2;

/// Rejects negative monetary inputs.
///
/// `field` names the offending input in the error message so callers can
/// surface it directly.
pub fn ensure_non_negative(field: &str, value: Decimal) -> Result<Decimal> {
    if value.is_sign_negative() && !value.is_zero() {
        Err(PricingError::ValidationError(format!(
            "{field} must not be negative (got {value})"
        )))
    } else {
        Ok(value)
    }
}

/// Rounds an amount to currency precision, midpoint away from zero.
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CURRENCY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Validates an externally supplied amount and rounds it to currency precision.
///
/// The sign check runs first so that `-0.001` is rejected rather than rounded to zero.
pub fn currency_input(field: &str, value: Decimal) -> Result<Decimal> {
    ensure_non_negative(field, value).map(round_currency)
}

/// Rounds to currency precision and fixes the scale so that `50` renders as `50.00`.
pub fn to_currency(value: Decimal) -> Decimal {
    let mut rounded = round_currency(value);
    rounded.rescale(CURRENCY_DP);
    rounded
}
