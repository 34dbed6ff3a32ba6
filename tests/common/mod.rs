use std::fs::File;
use std::io::Error;
use std::path::Path;

pub const COUPON_HEADER: [&str; 9] = [
    "code",
    "type",
    "value",
    "min_amount",
    "max_amount",
    "usage_limit",
    "times_used",
    "expires_at",
    "is_active",
];

pub const ORDER_HEADER: [&str; 5] = ["order", "subtotal", "shipping", "tax", "coupon"];

pub fn write_csv(path: &Path, header: &[&str], rows: &[&[&str]]) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(file);

    wtr.write_record(header)?;
    for row in rows {
        wtr.write_record(*row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes `rows` orders that all try to redeem `coupon` for a 10.00 subtotal.
pub fn generate_orders(path: &Path, rows: usize, coupon: &str) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);
    wtr.write_record(ORDER_HEADER)?;

    for i in 1..=rows {
        wtr.write_record([format!("O{i}").as_str(), "10.00", "0", "0", coupon])?;
    }

    wtr.flush()?;
    Ok(())
}
