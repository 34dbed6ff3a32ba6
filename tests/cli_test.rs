use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

const NOW: &str = "2024-06-01T00:00:00Z";

fn priced_fixtures() -> Command {
    let mut cmd = Command::new(cargo_bin!("pricing-engine"));
    cmd.arg("tests/fixtures/orders.csv")
        .arg("--coupons")
        .arg("tests/fixtures/coupons.csv")
        .arg("--now")
        .arg(NOW);
    cmd
}

#[test]
fn test_cli_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    priced_fixtures()
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "order,coupon,subtotal,discount,shipping,tax,total,status",
        ))
        // Percentage capped at max_amount
        .stdout(predicate::str::contains("A1,SAVE20,500.00,50.00,0.00,0.00,450.00,applied"))
        .stdout(predicate::str::contains("A2,FLAT30,80.00,0.00,0.00,0.00,80.00,below_minimum"))
        // Fixed amount clamped to subtotal
        .stdout(predicate::str::contains("A3,BIG200,150.00,150.00,0.00,0.00,0.00,applied"))
        .stdout(predicate::str::contains("A4,SAVE20,300.00,50.00,20.00,10.00,280.00,applied"))
        .stdout(predicate::str::contains("A5,GONE,100.00,0.00,0.00,0.00,100.00,exhausted"))
        .stdout(predicate::str::contains("A6,OLD,100.00,0.00,0.00,0.00,100.00,expired"))
        .stdout(predicate::str::contains("A7,OFF,100.00,0.00,0.00,0.00,100.00,inactive"))
        .stdout(predicate::str::contains("A10,NOPE,42.50,0.00,0.00,0.00,42.50,unknown_code"))
        .stdout(predicate::str::contains("A11,,19.99,0.00,4.99,1.60,26.58,no_coupon"));

    Ok(())
}

#[test]
fn test_single_use_coupon_redeemed_once() {
    priced_fixtures()
        .assert()
        .success()
        .stdout(predicate::str::contains("A8,ONCE,100.00,15.00,5.00,0.00,90.00,applied"))
        .stdout(predicate::str::contains("A9,ONCE,100.00,0.00,5.00,0.00,105.00,exhausted"));
}

#[test]
fn test_quote_only_does_not_redeem() {
    priced_fixtures()
        .arg("--quote-only")
        .assert()
        .success()
        .stdout(predicate::str::contains("A8,ONCE,100.00,15.00,5.00,0.00,90.00,applied"))
        .stdout(predicate::str::contains("A9,ONCE,100.00,15.00,5.00,0.00,90.00,applied"));
}

#[test]
fn test_coupon_report_reflects_redemptions() {
    let dir = tempfile::tempdir().unwrap();
    let report = dir.path().join("coupons_out.csv");

    priced_fixtures()
        .arg("--coupon-report")
        .arg(&report)
        .assert()
        .success();

    let content = std::fs::read_to_string(&report).unwrap();
    assert!(content.starts_with(
        "code,type,value,min_amount,max_amount,usage_limit,times_used,expires_at,is_active"
    ));
    assert!(content.contains("ONCE,fixed,15,,,1,1,,true"));
    assert!(content.contains("SAVE20,percentage,20,,50,,2,,true"));
    // Rejected coupons keep their counters
    assert!(content.contains("GONE,fixed,10,,,5,5,,true"));
    assert!(content.contains("FLAT30,fixed,30,100,,,0,,true"));
}

#[test]
fn test_now_from_environment() {
    // Before OLD's expiry it still applies.
    let mut cmd = Command::new(cargo_bin!("pricing-engine"));
    cmd.arg("tests/fixtures/orders.csv")
        .arg("--coupons")
        .arg("tests/fixtures/coupons.csv")
        .env("PRICING_NOW", "2019-12-31T23:59:59Z");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("A6,OLD,100.00,10.00,0.00,0.00,90.00,applied"));
}

#[test]
fn test_missing_orders_file_fails() {
    let mut cmd = Command::new(cargo_bin!("pricing-engine"));
    cmd.arg("tests/fixtures/does_not_exist.csv");

    cmd.assert().failure();
}
