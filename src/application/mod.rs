//! Application layer orchestrating pricing and redemption.
//!
//! This module defines the `PricingEngine`, the entry point used by order
//! processing. It reads coupons through the `CouponStore` port and records
//! redemptions with the store's guarded increment.

pub mod engine;
