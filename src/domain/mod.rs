//! Pricing rules and the storage port they depend on.

pub mod coupon;
pub mod money;
pub mod ports;
pub mod pricing;
