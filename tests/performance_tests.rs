use assert_cmd::cargo_bin;
use std::process::Command;

mod common;

#[test]
fn test_large_order_file_streaming() {
    let dir = tempfile::tempdir().unwrap();
    let coupons = dir.path().join("coupons.csv");
    let orders = dir.path().join("orders.csv");

    common::write_csv(
        &coupons,
        &common::COUPON_HEADER,
        &[&["BULK", "fixed", "1", "", "", "1000", "0", "", "true"]],
    )
    .unwrap();
    common::generate_orders(&orders, 50_000, "BULK").expect("Failed to generate orders");

    let output = Command::new(cargo_bin!("pricing-engine"))
        .arg(&orders)
        .arg("--coupons")
        .arg(&coupons)
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success(), "Binary failed to process large file");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let applied = stdout.lines().filter(|l| l.ends_with(",applied")).count();
    let exhausted = stdout.lines().filter(|l| l.ends_with(",exhausted")).count();
    assert_eq!(applied, 1000);
    assert_eq!(exhausted, 49_000);
}
