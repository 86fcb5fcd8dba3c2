mod common;

use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;
use tempfile::NamedTempFile;

#[test]
fn test_malformed_rows_do_not_stop_the_run() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", common::OPS_HEADER).unwrap();
    // Unknown operation
    writeln!(file, "teleport, 1").unwrap();
    // Valid registration
    writeln!(
        file,
        "register-vendor, , , , Plumbing, , Ramesh Plumber, ramesh@example.com, +91-9876543214, , , Sector 15 Noida"
    )
    .unwrap();
    // Text where a request id belongs
    writeln!(file, "start, abc").unwrap();
    // Valid create after the noise
    writeln!(
        file,
        "create, , , 42, Plumbing, , , , , , Leaking kitchen tap, Sector 15 Noida"
    )
    .unwrap();

    let mut cmd = Command::new(cargo_bin!("karigar"));
    cmd.arg(file.path());
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Error reading operation"))
        .stdout(predicate::str::contains("1,42,,Plumbing,pending,500,,,,"));
}

#[test]
fn test_missing_required_column() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", common::OPS_HEADER).unwrap();
    writeln!(
        file,
        "create, , , 42, Plumbing, , , , , , Leaking kitchen tap, Sector 15 Noida"
    )
    .unwrap();
    writeln!(file, "assign, 1").unwrap(); // no vendor column

    let mut cmd = Command::new(cargo_bin!("karigar"));
    cmd.arg(file.path());
    cmd.assert()
        .success()
        .stderr(predicate::str::contains(
            "missing required column 'vendor'",
        ))
        .stdout(predicate::str::contains("1,42,,Plumbing,pending,500,,,,"));
}

#[test]
fn test_short_happy_code_is_validation_not_auth() {
    let mut file = NamedTempFile::new().unwrap();
    common::write_in_progress_prelude(&mut file);
    writeln!(file, "complete, 1, , , , 12").unwrap();
    writeln!(file, "complete, 1, , , , abcdef").unwrap();

    let mut cmd = Command::new(cargo_bin!("karigar"));
    cmd.arg(file.path());
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Happy Code must be 6 digits"))
        .stderr(predicate::str::contains("authentication failed").not())
        .stdout(predicate::str::contains("1,42,1,Plumbing,in_progress,500,,,"));
}

#[test]
fn test_unknown_service_name() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", common::OPS_HEADER).unwrap();
    writeln!(
        file,
        "create, , , 42, Gardening, , , , , , Hedge trim, Sector 15 Noida"
    )
    .unwrap();

    let mut cmd = Command::new(cargo_bin!("karigar"));
    cmd.arg(file.path());
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("unknown service type \"Gardening\""));
}

#[test]
fn test_empty_input_prints_bare_report() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", common::OPS_HEADER).unwrap();

    let mut cmd = Command::new(cargo_bin!("karigar"));
    cmd.arg(file.path());
    cmd.assert().success().stdout(predicate::str::is_empty());
}
