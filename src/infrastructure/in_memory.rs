use crate::domain::coupon::Coupon;
use crate::domain::ports::CouponStore;
use crate::error::{PricingError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for coupons.
///
/// Uses `Arc<RwLock<HashMap<String, Coupon>>>` to allow shared concurrent access.
/// The guarded increment runs under the write lock, so concurrent redemptions
/// cannot overshoot a usage limit.
#[derive(Default, Clone)]
pub struct InMemoryCouponStore {
    coupons: Arc<RwLock<HashMap<String, Coupon>>>,
}

impl InMemoryCouponStore {
    /// Creates a new, empty in-memory coupon store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CouponStore for InMemoryCouponStore {
    async fn store(&self, coupon: Coupon) -> Result<()> {
        let mut coupons = self.coupons.write().await;
        coupons.insert(coupon.code.clone(), coupon);
        Ok(())
    }

    async fn upsert_definition(&self, mut coupon: Coupon) -> Result<Coupon> {
        let mut coupons = self.coupons.write().await;
        if let Some(existing) = coupons.get(&coupon.code) {
            coupon.times_used = coupon.times_used.max(existing.times_used);
        }
        coupons.insert(coupon.code.clone(), coupon.clone());
        Ok(coupon)
    }

    async fn get(&self, code: &str) -> Result<Option<Coupon>> {
        let coupons = self.coupons.read().await;
        Ok(coupons.get(code).cloned())
    }

    async fn all_coupons(&self) -> Result<Vec<Coupon>> {
        let coupons = self.coupons.read().await;
        let mut all: Vec<Coupon> = coupons.values().cloned().collect();
        all.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(all)
    }

    async fn increment_usage(&self, code: &str) -> Result<Coupon> {
        let mut coupons = self.coupons.write().await;
        let coupon = coupons
            .get_mut(code)
            .ok_or_else(|| PricingError::CouponNotFound(code.to_string()))?;

        if !coupon.has_remaining_uses() {
            return Err(PricingError::UsageLimitReached(code.to_string()));
        }

        *coupon = coupon.increment_usage();
        Ok(coupon.clone())
    }
}
