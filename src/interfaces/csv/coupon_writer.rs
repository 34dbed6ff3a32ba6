use crate::domain::coupon::Coupon;
use crate::error::Result;
use crate::interfaces::csv::coupon_reader::CouponRecord;
use std::io::Write;

/// Writes coupons back out in the same layout `CouponReader` accepts.
pub struct CouponWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CouponWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_coupons(&mut self, coupons: impl IntoIterator<Item = Coupon>) -> Result<()> {
        for coupon in coupons {
            self.writer.serialize(CouponRecord::from(&coupon))?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
