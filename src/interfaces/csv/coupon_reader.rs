use crate::domain::coupon::Coupon;
use crate::error::{PricingError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// One row of a coupon CSV file, before validation.
///
/// `type` stays a string here so that an unknown value surfaces as a
/// `ValidationError` rather than a CSV parse error.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct CouponRecord {
    pub code: String,
    #[serde(rename = "type")]
    pub coupon_type: String,
    pub value: Decimal,
    #[serde(default)]
    pub min_amount: Option<Decimal>,
    #[serde(default)]
    pub max_amount: Option<Decimal>,
    #[serde(default)]
    pub usage_limit: Option<u32>,
    #[serde(default)]
    pub times_used: Option<u32>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl TryFrom<CouponRecord> for Coupon {
    type Error = PricingError;

    fn try_from(record: CouponRecord) -> Result<Self> {
        let coupon = Coupon {
            code: record.code,
            coupon_type: record.coupon_type.parse()?,
            value: record.value,
            min_amount: record.min_amount,
            max_amount: record.max_amount,
            usage_limit: record.usage_limit,
            times_used: record.times_used.unwrap_or(0),
            expires_at: record.expires_at,
            is_active: record.is_active.unwrap_or(true),
        };
        coupon.validate()?;
        Ok(coupon)
    }
}

impl From<&Coupon> for CouponRecord {
    fn from(coupon: &Coupon) -> Self {
        Self {
            code: coupon.code.clone(),
            coupon_type: coupon.coupon_type.to_string(),
            value: coupon.value,
            min_amount: coupon.min_amount,
            max_amount: coupon.max_amount,
            usage_limit: coupon.usage_limit,
            times_used: Some(coupon.times_used),
            expires_at: coupon.expires_at,
            is_active: Some(coupon.is_active),
        }
    }
}

/// Reads coupon definitions from a CSV source.
///
/// Rows are trimmed and may omit trailing optional columns. Each item is
/// either a validated `Coupon` or the error for that row, so one bad row
/// does not stop the rest of the file.
pub struct CouponReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> CouponReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    pub fn coupons(self) -> impl Iterator<Item = Result<Coupon>> {
        self.reader
            .into_deserialize::<CouponRecord>()
            .map(|result| result.map_err(PricingError::from).and_then(Coupon::try_from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::coupon::CouponType;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    const HEADER: &str =
        "code, type, value, min_amount, max_amount, usage_limit, times_used, expires_at, is_active";

    #[test]
    fn test_reader_full_row() {
        let data = format!(
            "{HEADER}\nSAVE20, percentage, 20, 100, 50, 5, 2, 2030-01-01T00:00:00Z, true"
        );
        let coupons: Vec<Result<Coupon>> = CouponReader::new(data.as_bytes()).coupons().collect();

        assert_eq!(coupons.len(), 1);
        let coupon = coupons[0].as_ref().unwrap();
        assert_eq!(coupon.code, "SAVE20");
        assert_eq!(coupon.coupon_type, CouponType::Percentage);
        assert_eq!(coupon.value, dec!(20));
        assert_eq!(coupon.min_amount, Some(dec!(100)));
        assert_eq!(coupon.max_amount, Some(dec!(50)));
        assert_eq!(coupon.usage_limit, Some(5));
        assert_eq!(coupon.times_used, 2);
        assert_eq!(
            coupon.expires_at,
            Some(Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap())
        );
        assert!(coupon.is_active);
    }

    #[test]
    fn test_reader_empty_optionals_use_defaults() {
        let data = format!("{HEADER}\nFLAT5, fixed, 5, , , , , , ");
        let coupons: Vec<Result<Coupon>> = CouponReader::new(data.as_bytes()).coupons().collect();

        let coupon = coupons[0].as_ref().unwrap();
        assert_eq!(coupon.min_amount, None);
        assert_eq!(coupon.max_amount, None);
        assert_eq!(coupon.usage_limit, None);
        assert_eq!(coupon.times_used, 0);
        assert_eq!(coupon.expires_at, None);
        assert!(coupon.is_active);
    }

    #[test]
    fn test_reader_unknown_type_is_validation_error() {
        let data = format!("{HEADER}\nBOGO, buy_one, 5, , , , , , \nOK, fixed, 1, , , , , , ");
        let coupons: Vec<Result<Coupon>> = CouponReader::new(data.as_bytes()).coupons().collect();

        assert!(matches!(coupons[0], Err(PricingError::ValidationError(_))));
        assert!(coupons[1].is_ok());
    }

    #[test]
    fn test_reader_negative_value_is_validation_error() {
        let data = format!("{HEADER}\nNEG, fixed, -5, , , , , , ");
        let coupons: Vec<Result<Coupon>> = CouponReader::new(data.as_bytes()).coupons().collect();

        assert!(matches!(coupons[0], Err(PricingError::ValidationError(_))));
    }

    #[test]
    fn test_reader_malformed_number_is_csv_error() {
        let data = format!("{HEADER}\nBAD, fixed, lots, , , , , , ");
        let coupons: Vec<Result<Coupon>> = CouponReader::new(data.as_bytes()).coupons().collect();

        assert!(matches!(coupons[0], Err(PricingError::CsvError(_))));
    }
}
