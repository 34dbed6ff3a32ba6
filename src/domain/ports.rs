use super::coupon::Coupon;
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait CouponStore: Send + Sync {
    /// Inserts or replaces the coupon stored under `coupon.code`.
    async fn store(&self, coupon: Coupon) -> Result<()>;
    /// Saves an administrator's definition of a coupon.
    ///
    /// Every field comes from `coupon` except `times_used`, which becomes the
    /// larger of the stored and the supplied counter. The read and the write
    /// happen atomically with respect to `increment_usage`, so a counter never
    /// moves backwards. Returns the coupon as stored.
    async fn upsert_definition(&self, coupon: Coupon) -> Result<Coupon>;
    async fn get(&self, code: &str) -> Result<Option<Coupon>>;
    /// All coupons, ordered by code.
    async fn all_coupons(&self) -> Result<Vec<Coupon>>;
    /// Records one redemption, guarded by the usage limit.
    ///
    /// The check and the write happen atomically: implementations must fail
    /// with `UsageLimitReached` rather than push `times_used` past
    /// `usage_limit`, and with `CouponNotFound` for unknown codes.
    async fn increment_usage(&self, code: &str) -> Result<Coupon>;
}

pub type CouponStoreBox = Box<dyn CouponStore>;
