use crate::domain::coupon::Coupon;
use crate::domain::ports::CouponStore;
use crate::error::{PricingError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for storing coupon definitions and their usage counters.
pub const CF_COUPONS: &str = "coupons";

/// A persistent store implementation using RocksDB.
///
/// Coupons are stored as JSON under their code. Usage increments are
/// read-modify-write cycles serialised through a shared async mutex, which
/// makes the limit guard atomic for every clone of the store.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    write_guard: Arc<Mutex<()>>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the "coupons" column family exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_coupons = ColumnFamilyDescriptor::new(CF_COUPONS, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_coupons])?;

        Ok(Self {
            db: Arc::new(db),
            write_guard: Arc::new(Mutex::new(())),
        })
    }

    fn coupons_cf(&self) -> Result<&ColumnFamily> {
        self.db.cf_handle(CF_COUPONS).ok_or_else(|| {
            PricingError::InternalError(Box::new(std::io::Error::other(
                "Coupons column family not found",
            )))
        })
    }

    fn put(&self, coupon: &Coupon) -> Result<()> {
        let cf = self.coupons_cf()?;
        let value = serde_json::to_vec(coupon).map_err(|e| {
            PricingError::InternalError(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Serialization error: {}", e),
            )))
        })?;
        self.db.put_cf(cf, coupon.code.as_bytes(), value)?;
        Ok(())
    }

    fn read(&self, code: &str) -> Result<Option<Coupon>> {
        let cf = self.coupons_cf()?;
        match self.db.get_cf(cf, code.as_bytes())? {
            Some(bytes) => decode(&bytes).map(Some),
            None => Ok(None),
        }
    }
}

fn decode(bytes: &[u8]) -> Result<Coupon> {
    serde_json::from_slice(bytes).map_err(|e| {
        PricingError::InternalError(Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("Deserialization error: {}", e),
        )))
    })
}

#[async_trait]
impl CouponStore for RocksDBStore {
    async fn store(&self, coupon: Coupon) -> Result<()> {
        let _guard = self.write_guard.lock().await;
        self.put(&coupon)
    }

    async fn upsert_definition(&self, mut coupon: Coupon) -> Result<Coupon> {
        let _guard = self.write_guard.lock().await;
        if let Some(existing) = self.read(&coupon.code)? {
            coupon.times_used = coupon.times_used.max(existing.times_used);
        }
        self.put(&coupon)?;
        Ok(coupon)
    }

    async fn get(&self, code: &str) -> Result<Option<Coupon>> {
        self.read(code)
    }

    async fn all_coupons(&self) -> Result<Vec<Coupon>> {
        let cf = self.coupons_cf()?;

        // Keys are the codes themselves, so iteration order is already by code.
        let mut coupons = Vec::new();
        for item in self.db.iterator_cf(cf, rocksdb::IteratorMode::Start) {
            let (_key, value) = item.map_err(|e| {
                PricingError::InternalError(Box::new(std::io::Error::other(format!(
                    "RocksDB iteration error: {}",
                    e
                ))))
            })?;
            coupons.push(decode(&value)?);
        }

        Ok(coupons)
    }

    async fn increment_usage(&self, code: &str) -> Result<Coupon> {
        let _guard = self.write_guard.lock().await;

        let coupon = self
            .read(code)?
            .ok_or_else(|| PricingError::CouponNotFound(code.to_string()))?;
        if !coupon.has_remaining_uses() {
            return Err(PricingError::UsageLimitReached(code.to_string()));
        }

        let updated = coupon.increment_usage();
        self.put(&updated)?;
        Ok(updated)
    }
}
