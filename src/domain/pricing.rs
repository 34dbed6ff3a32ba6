//! Coupon discount and order total rules.
//!
//! Every function here is pure: inputs are snapshots, nothing is mutated, and
//! repeated calls with the same arguments give the same answer.

use crate::domain::coupon::{Coupon, CouponStatus, CouponType};
use crate::domain::money::{CURRENCY_DP, ensure_non_negative, round_currency};
use crate::error::{PricingError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;

/// Why a coupon produced no discount.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Rejection {
    NoCoupon,
    UnknownCode,
    Inactive,
    Expired,
    Exhausted,
    BelowMinimum,
}

impl Rejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rejection::NoCoupon => "no_coupon",
            Rejection::UnknownCode => "unknown_code",
            Rejection::Inactive => "inactive",
            Rejection::Expired => "expired",
            Rejection::Exhausted => "exhausted",
            Rejection::BelowMinimum => "below_minimum",
        }
    }

    /// Message suitable for showing to a shopper.
    pub fn message(&self) -> &'static str {
        match self {
            Rejection::NoCoupon => "No coupon was applied",
            Rejection::UnknownCode => "This coupon code does not exist",
            Rejection::Inactive => "This coupon is not active",
            Rejection::Expired => "This coupon has expired",
            Rejection::Exhausted => "This coupon has reached its usage limit",
            Rejection::BelowMinimum => "The order does not meet the coupon's minimum amount",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DiscountOutcome {
    Applied(Decimal),
    Rejected(Rejection),
}

impl DiscountOutcome {
    pub fn discount(&self) -> Decimal {
        match self {
            DiscountOutcome::Applied(amount) => *amount,
            DiscountOutcome::Rejected(_) => Decimal::ZERO,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, DiscountOutcome::Applied(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            DiscountOutcome::Applied(_) => "applied",
            DiscountOutcome::Rejected(reason) => reason.as_str(),
        }
    }
}

/// Full price breakdown of an order.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

/// Evaluates a coupon against a subtotal and reports the discount or the reason
/// none applies.
pub fn evaluate_discount(
    coupon: Option<&Coupon>,
    subtotal: Decimal,
    now: DateTime<Utc>,
) -> Result<DiscountOutcome> {
    let subtotal = ensure_non_negative("subtotal", subtotal)?;
    let Some(coupon) = coupon else {
        return Ok(DiscountOutcome::Rejected(Rejection::NoCoupon));
    };
    coupon.validate()?;

    match coupon.status(now) {
        CouponStatus::Valid => {}
        CouponStatus::Inactive => return Ok(DiscountOutcome::Rejected(Rejection::Inactive)),
        CouponStatus::Expired => return Ok(DiscountOutcome::Rejected(Rejection::Expired)),
        CouponStatus::Exhausted => return Ok(DiscountOutcome::Rejected(Rejection::Exhausted)),
    }

    if let Some(min_amount) = coupon.min_amount
        && subtotal < min_amount
    {
        return Ok(DiscountOutcome::Rejected(Rejection::BelowMinimum));
    }

    let raw = match coupon.coupon_type {
        CouponType::Percentage => {
            let raw = percent_of(subtotal, coupon.value)?;
            match coupon.max_amount {
                Some(cap) if raw > cap => cap,
                _ => raw,
            }
        }
        CouponType::Fixed => coupon.value,
    };

    Ok(DiscountOutcome::Applied(clamp_to_subtotal(
        raw.min(subtotal),
        subtotal,
    )))
}

/// `subtotal * percent / 100`, saturating at the subtotal for 100% and above.
///
/// Dividing the rate first keeps large subtotals representable.
fn percent_of(subtotal: Decimal, percent: Decimal) -> Result<Decimal> {
    if percent >= Decimal::ONE_HUNDRED {
        return Ok(subtotal);
    }
    percent
        .checked_div(Decimal::ONE_HUNDRED)
        .and_then(|rate| subtotal.checked_mul(rate))
        .ok_or_else(|| overflow("discount"))
}

fn overflow(what: &str) -> PricingError {
    PricingError::ValidationError(format!("{what} overflows the supported decimal range"))
}

/// Rounds a discount to cents while keeping it within `[0, subtotal]`.
fn clamp_to_subtotal(discount: Decimal, subtotal: Decimal) -> Decimal {
    let rounded = round_currency(discount);
    if rounded > subtotal {
        // Sub-cent subtotal: round down instead of past it.
        discount.round_dp_with_strategy(CURRENCY_DP, RoundingStrategy::ToZero)
    } else {
        rounded
    }
}

/// Returns the discount a coupon grants on `subtotal` at `now`.
///
/// Invalid, absent, or non-qualifying coupons yield zero. Negative subtotals
/// and malformed coupons are validation errors.
pub fn compute_discount(
    coupon: Option<&Coupon>,
    subtotal: Decimal,
    now: DateTime<Utc>,
) -> Result<Decimal> {
    evaluate_discount(coupon, subtotal, now).map(|outcome| outcome.discount())
}

/// `subtotal - discount + shipping + tax`, never below zero.
pub fn compute_order_total(
    subtotal: Decimal,
    discount: Decimal,
    shipping: Decimal,
    tax: Decimal,
) -> Result<Decimal> {
    let subtotal = ensure_non_negative("subtotal", subtotal)?;
    let discount = ensure_non_negative("discount", discount)?;
    let shipping = ensure_non_negative("shipping", shipping)?;
    let tax = ensure_non_negative("tax", tax)?;

    let total = subtotal
        .checked_sub(discount)
        .and_then(|t| t.checked_add(shipping))
        .and_then(|t| t.checked_add(tax))
        .ok_or_else(|| overflow("order total"))?;

    Ok(total.max(Decimal::ZERO))
}

/// Prices a whole order: discount evaluation followed by the total.
pub fn price_order(
    coupon: Option<&Coupon>,
    subtotal: Decimal,
    shipping: Decimal,
    tax: Decimal,
    now: DateTime<Utc>,
) -> Result<(DiscountOutcome, OrderTotals)> {
    let outcome = evaluate_discount(coupon, subtotal, now)?;
    let discount = outcome.discount();
    let total = compute_order_total(subtotal, discount, shipping, tax)?;
    Ok((
        outcome,
        OrderTotals {
            subtotal,
            discount,
            shipping,
            tax,
            total,
        },
    ))
}
