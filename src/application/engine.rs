use crate::domain::coupon::Coupon;
use crate::domain::money::currency_input;
use crate::domain::pricing::{DiscountOutcome, OrderTotals, Rejection, price_order};
use crate::domain::ports::CouponStoreBox;
use crate::error::{PricingError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

/// An order to be priced.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct OrderRequest {
    pub order: String,
    pub subtotal: Decimal,
    #[serde(default)]
    pub shipping: Option<Decimal>,
    #[serde(default)]
    pub tax: Option<Decimal>,
    #[serde(default)]
    pub coupon: Option<String>,
}

impl OrderRequest {
    pub fn new(order: impl Into<String>, subtotal: Decimal) -> Self {
        Self {
            order: order.into(),
            subtotal,
            shipping: None,
            tax: None,
            coupon: None,
        }
    }

    pub fn with_shipping(mut self, shipping: Decimal) -> Self {
        self.shipping = Some(shipping);
        self
    }

    pub fn with_tax(mut self, tax: Decimal) -> Self {
        self.tax = Some(tax);
        self
    }

    pub fn with_coupon(mut self, code: impl Into<String>) -> Self {
        self.coupon = Some(code.into());
        self
    }

    /// The coupon code, ignoring blank cells.
    fn coupon_code(&self) -> Option<&str> {
        self.coupon.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }
}

/// The priced result of an order.
#[derive(Debug, PartialEq, Clone)]
pub struct OrderReceipt {
    pub order: String,
    pub coupon: Option<String>,
    pub outcome: DiscountOutcome,
    pub totals: OrderTotals,
}

/// Prices orders against the coupons held in a [`CouponStore`](crate::domain::ports::CouponStore).
///
/// Pricing itself is pure; the only side effect is the guarded usage increment
/// performed by [`PricingEngine::checkout`]. The engine can be shared behind an
/// `Arc` and driven from many tasks at once.
pub struct PricingEngine {
    coupon_store: CouponStoreBox,
}

impl PricingEngine {
    pub fn new(coupon_store: CouponStoreBox) -> Self {
        Self { coupon_store }
    }

    /// Saves an administrator's coupon definition.
    ///
    /// When the code already exists the larger of the two usage counters is
    /// kept, so reloading definitions never rolls redemptions back.
    pub async fn register_coupon(&self, coupon: Coupon) -> Result<()> {
        coupon.validate()?;
        let stored = self.coupon_store.upsert_definition(coupon).await?;
        tracing::debug!(code = %stored.code, times_used = stored.times_used, "registered coupon");
        Ok(())
    }

    /// Prices an order without redeeming its coupon.
    ///
    /// Subtotal, shipping and tax are rounded to cents on intake, so the
    /// breakdown adds up exactly at currency precision.
    pub async fn quote(&self, request: &OrderRequest, now: DateTime<Utc>) -> Result<OrderReceipt> {
        let subtotal = currency_input("subtotal", request.subtotal)?;
        let shipping = currency_input("shipping", request.shipping.unwrap_or(Decimal::ZERO))?;
        let tax = currency_input("tax", request.tax.unwrap_or(Decimal::ZERO))?;

        let (outcome, totals) = match request.coupon_code() {
            Some(code) => match self.coupon_store.get(code).await? {
                Some(coupon) => price_order(Some(&coupon), subtotal, shipping, tax, now)?,
                None => {
                    let (_, totals) = price_order(None, subtotal, shipping, tax, now)?;
                    (DiscountOutcome::Rejected(Rejection::UnknownCode), totals)
                }
            },
            None => price_order(None, subtotal, shipping, tax, now)?,
        };

        Ok(OrderReceipt {
            order: request.order.clone(),
            coupon: request.coupon_code().map(str::to_string),
            outcome,
            totals,
        })
    }

    /// Prices an order and redeems its coupon when a discount was granted.
    ///
    /// If another redemption consumed the last use between pricing and the
    /// increment, the order is re-priced without the discount.
    pub async fn checkout(
        &self,
        request: &OrderRequest,
        now: DateTime<Utc>,
    ) -> Result<OrderReceipt> {
        let receipt = self.quote(request, now).await?;

        if !receipt.outcome.is_applied() || receipt.outcome.discount().is_zero() {
            return Ok(receipt);
        }
        let Some(code) = receipt.coupon.clone() else {
            return Ok(receipt);
        };

        match self.coupon_store.increment_usage(&code).await {
            Ok(coupon) => {
                tracing::info!(
                    order = %receipt.order,
                    code = %code,
                    times_used = coupon.times_used,
                    "redeemed coupon"
                );
                Ok(receipt)
            }
            Err(PricingError::UsageLimitReached(_)) => {
                tracing::warn!(
                    order = %receipt.order,
                    code = %code,
                    "coupon exhausted by a concurrent redemption, pricing without discount"
                );
                let (_, totals) = price_order(
                    None,
                    receipt.totals.subtotal,
                    receipt.totals.shipping,
                    receipt.totals.tax,
                    now,
                )?;
                Ok(OrderReceipt {
                    outcome: DiscountOutcome::Rejected(Rejection::Exhausted),
                    totals,
                    ..receipt
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Consumes the engine and returns the final state of all coupons.
    pub async fn into_coupons(self) -> Result<Vec<Coupon>> {
        self.coupon_store.all_coupons().await
    }
}
