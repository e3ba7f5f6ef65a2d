use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

mod common;

#[test]
fn test_cli_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin!("usdc-settle"));
    cmd.arg("tests/fixtures/requests.csv").arg("--dry-run");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "payment_id,success,transaction_hash,error,platform_fee,provider_amount,total",
        ))
        // 100 USDC at the default 2.5% fee
        .stdout(predicate::str::contains("pay_1,true,0x"))
        .stdout(predicate::str::contains(",2.5,97.5,100"))
        // 1.5 USDC at the default 2.5% fee
        .stdout(predicate::str::contains(",0.0375,1.4625,1.5"));

    Ok(())
}

#[test]
fn test_cli_requires_a_provider() {
    let mut cmd = Command::new(cargo_bin!("usdc-settle"));
    cmd.arg("tests/fixtures/requests.csv");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--provider-url"));
}

#[test]
fn test_cli_fee_percent_override() {
    let mut cmd = Command::new(cargo_bin!("usdc-settle"));
    cmd.arg("tests/fixtures/requests.csv")
        .arg("--dry-run")
        .arg("--fee-percent")
        .arg("0");

    // Zero fee pays the provider everything.
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(",0,100,100"))
        .stdout(predicate::str::contains(",0,1.5,1.5"));
}

#[test]
fn test_cli_batch_settlement() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("requests.csv");
    common::generate_requests_csv(&input, 25).unwrap();

    let mut cmd = Command::new(cargo_bin!("usdc-settle"));
    cmd.arg(&input).arg("--dry-run");

    let assert = cmd.assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();

    // Header plus one record per request, all settled.
    assert_eq!(stdout.lines().count(), 26);
    assert_eq!(stdout.matches(",true,").count(), 25);
}
