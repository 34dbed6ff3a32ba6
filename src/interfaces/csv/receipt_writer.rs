use crate::application::engine::OrderReceipt;
use crate::domain::money::to_currency;
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct ReceiptRecord<'a> {
    order: &'a str,
    coupon: Option<&'a str>,
    subtotal: Decimal,
    discount: Decimal,
    shipping: Decimal,
    tax: Decimal,
    total: Decimal,
    status: &'static str,
}

impl<'a> From<&'a OrderReceipt> for ReceiptRecord<'a> {
    fn from(receipt: &'a OrderReceipt) -> Self {
        Self {
            order: &receipt.order,
            coupon: receipt.coupon.as_deref(),
            subtotal: to_currency(receipt.totals.subtotal),
            discount: to_currency(receipt.totals.discount),
            shipping: to_currency(receipt.totals.shipping),
            tax: to_currency(receipt.totals.tax),
            total: to_currency(receipt.totals.total),
            status: receipt.outcome.label(),
        }
    }
}

/// Writes priced orders as CSV, one row per receipt, amounts with two decimals.
pub struct ReceiptWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ReceiptWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_receipt(&mut self, receipt: &OrderReceipt) -> Result<()> {
        self.writer.serialize(ReceiptRecord::from(receipt))?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
