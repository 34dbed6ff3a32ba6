use crate::domain::money::ensure_non_negative;
use crate::error::{PricingError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a coupon's `value` is interpreted.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum CouponType {
    /// `value` is a percentage of the subtotal.
    Percentage,
    /// `value` is a currency amount.
    Fixed,
}

impl CouponType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CouponType::Percentage => "percentage",
            CouponType::Fixed => "fixed",
        }
    }
}

impl FromStr for CouponType {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "percentage" => Ok(CouponType::Percentage),
            "fixed" => Ok(CouponType::Fixed),
            other => Err(PricingError::ValidationError(format!(
                "Unknown coupon type '{other}'"
            ))),
        }
    }
}

impl fmt::Display for CouponType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of checking a coupon's validity conditions, in check order.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CouponStatus {
    Valid,
    Inactive,
    Expired,
    Exhausted,
}

/// A discount code as defined by an administrator.
///
/// Values are snapshots: pricing never mutates a coupon, and the usage
/// counter only moves forward through [`Coupon::increment_usage`] or the
/// store's guarded increment.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Coupon {
    /// Unique, case-sensitive code.
    pub code: String,
    #[serde(rename = "type")]
    pub coupon_type: CouponType,
    /// Percent (for `Percentage`) or currency amount (for `Fixed`).
    pub value: Decimal,
    /// Subtotal floor below which the coupon does not apply.
    pub min_amount: Option<Decimal>,
    /// Discount cap, honoured only by percentage coupons.
    pub max_amount: Option<Decimal>,
    /// `None` means unlimited redemptions.
    pub usage_limit: Option<u32>,
    pub times_used: u32,
    /// `None` means the coupon never expires.
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl Coupon {
    /// Creates an active, unlimited, non-expiring coupon.
    pub fn new(code: impl Into<String>, coupon_type: CouponType, value: Decimal) -> Result<Self> {
        let coupon = Self {
            code: code.into(),
            coupon_type,
            value,
            min_amount: None,
            max_amount: None,
            usage_limit: None,
            times_used: 0,
            expires_at: None,
            is_active: true,
        };
        coupon.validate()?;
        Ok(coupon)
    }

    pub fn with_min_amount(mut self, min_amount: Decimal) -> Self {
        self.min_amount = Some(min_amount);
        self
    }

    pub fn with_max_amount(mut self, max_amount: Decimal) -> Self {
        self.max_amount = Some(max_amount);
        self
    }

    pub fn with_usage_limit(mut self, usage_limit: u32) -> Self {
        self.usage_limit = Some(usage_limit);
        self
    }

    pub fn with_times_used(mut self, times_used: u32) -> Self {
        self.times_used = times_used;
        self
    }

    pub fn with_expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Checks the structural rules: non-empty code, no negative amounts.
    pub fn validate(&self) -> Result<()> {
        if self.code.trim().is_empty() {
            return Err(PricingError::ValidationError(
                "Coupon code must not be empty".to_string(),
            ));
        }
        ensure_non_negative("coupon value", self.value)?;
        if let Some(min_amount) = self.min_amount {
            ensure_non_negative("coupon min_amount", min_amount)?;
        }
        if let Some(max_amount) = self.max_amount {
            ensure_non_negative("coupon max_amount", max_amount)?;
        }
        Ok(())
    }

    /// Reports which validity condition, if any, fails at `now`.
    pub fn status(&self, now: DateTime<Utc>) -> CouponStatus {
        if !self.is_active {
            return CouponStatus::Inactive;
        }
        // The expiry instant itself is already expired.
        if let Some(expires_at) = self.expires_at
            && now >= expires_at
        {
            return CouponStatus::Expired;
        }
        if let Some(limit) = self.usage_limit
            && self.times_used >= limit
        {
            return CouponStatus::Exhausted;
        }
        CouponStatus::Valid
    }

    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        self.status(now) == CouponStatus::Valid
    }

    /// Returns whether another redemption fits under the usage limit.
    pub fn has_remaining_uses(&self) -> bool {
        self.usage_limit.is_none_or(|limit| self.times_used < limit)
    }

    /// Returns a copy with one more recorded redemption.
    ///
    /// The limit is not checked here; stores guard it atomically.
    pub fn increment_usage(&self) -> Self {
        Self {
            times_used: self.times_used.saturating_add(1),
            ..self.clone()
        }
    }
}
