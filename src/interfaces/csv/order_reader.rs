use crate::application::engine::OrderRequest;
use crate::error::{PricingError, Result};
use std::io::Read;

/// Reads orders to be priced from a CSV source.
///
/// Expected columns are `order, subtotal, shipping, tax, coupon`; the last
/// three may be left empty.
pub struct OrderReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> OrderReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes orders.
    pub fn orders(self) -> impl Iterator<Item = Result<OrderRequest>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(PricingError::from))
    }
}
