//! CSV adapters for coupon definitions, incoming orders and priced receipts.

pub mod coupon_reader;
pub mod coupon_writer;
pub mod order_reader;
pub mod receipt_writer;
