use chrono::{DateTime, Utc};
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use pricing_engine::application::engine::PricingEngine;
use pricing_engine::domain::ports::CouponStoreBox;
use pricing_engine::infrastructure::in_memory::InMemoryCouponStore;
#[cfg(feature = "storage-rocksdb")]
use pricing_engine::infrastructure::rocksdb::RocksDBStore;
use pricing_engine::interfaces::csv::coupon_reader::CouponReader;
use pricing_engine::interfaces::csv::coupon_writer::CouponWriter;
use pricing_engine::interfaces::csv::order_reader::OrderReader;
use pricing_engine::interfaces::csv::receipt_writer::ReceiptWriter;
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input orders CSV file
    orders: PathBuf,

    /// Coupon definitions CSV file to load before pricing
    #[arg(long)]
    coupons: Option<PathBuf>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, env = "PRICING_DB_PATH")]
    db_path: Option<PathBuf>,

    /// Pricing instant as RFC 3339 (defaults to the current time)
    #[arg(long, env = "PRICING_NOW")]
    now: Option<DateTime<Utc>>,

    /// Price orders without redeeming coupons
    #[arg(long)]
    quote_only: bool,

    /// Write the final coupon state to this CSV file
    #[arg(long)]
    coupon_report: Option<PathBuf>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn open_store(db_path: Option<PathBuf>) -> Result<CouponStoreBox> {
    match db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(db_path) => {
            let store = RocksDBStore::open(db_path).into_diagnostic()?;
            Ok(Box::new(store))
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            tracing::warn!(
                "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
            );
            Ok(Box::new(InMemoryCouponStore::new()))
        }
        None => Ok(Box::new(InMemoryCouponStore::new())),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let now = cli.now.unwrap_or_else(Utc::now);

    let engine = PricingEngine::new(open_store(cli.db_path)?);

    if let Some(path) = cli.coupons {
        let file = File::open(path).into_diagnostic()?;
        for coupon_result in CouponReader::new(file).coupons() {
            match coupon_result {
                Ok(coupon) => engine.register_coupon(coupon).await.into_diagnostic()?,
                Err(e) => tracing::error!("Error reading coupon: {}", e),
            }
        }
    }

    let stdout = io::stdout();
    let mut writer = ReceiptWriter::new(stdout.lock());

    let file = File::open(cli.orders).into_diagnostic()?;
    for order_result in OrderReader::new(file).orders() {
        let order = match order_result {
            Ok(order) => order,
            Err(e) => {
                tracing::error!("Error reading order: {}", e);
                continue;
            }
        };

        let priced = if cli.quote_only {
            engine.quote(&order, now).await
        } else {
            engine.checkout(&order, now).await
        };

        match priced {
            Ok(receipt) => writer.write_receipt(&receipt).into_diagnostic()?,
            Err(e) => tracing::error!(order = %order.order, "Error pricing order: {}", e),
        }
    }
    writer.flush().into_diagnostic()?;

    if let Some(path) = cli.coupon_report {
        let coupons = engine.into_coupons().await.into_diagnostic()?;
        let file = File::create(path).into_diagnostic()?;
        CouponWriter::new(file)
            .write_coupons(coupons)
            .into_diagnostic()?;
    }

    Ok(())
}
