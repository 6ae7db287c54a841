//! End-to-end tests driving the `kontor` binary against a temp data dir.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn kontor(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("kontor").expect("binary builds");
    cmd.arg("--data-dir").arg(data_dir.path());
    cmd
}

/// Run a command, assert success, and return stdout.
fn run_ok(cmd: &mut Command) -> String {
    let output = cmd.assert().success().get_output().stdout.clone();
    String::from_utf8(output).expect("stdout is utf-8")
}

/// `Created <noun> <id> (<label>)` -> id
fn created_id(stdout: &str, noun: &str) -> String {
    let line = stdout
        .lines()
        .find(|l| l.contains(&format!("Created {}", noun)))
        .unwrap_or_else(|| panic!("no 'Created {}' line in: {}", noun, stdout));
    let after = line
        .split(&format!("Created {} ", noun))
        .nth(1)
        .expect("id follows noun");
    after.split_whitespace().next().expect("id token").to_string()
}

#[test]
fn product_lifecycle_via_cli() {
    let dir = TempDir::new().unwrap();

    let stdout = run_ok(kontor(&dir).args([
        "products", "add", "--title", "Widget", "--price", "100", "--discount", "10",
    ]));
    let id = created_id(&stdout, "product");

    // Storefront list shows it with the derived sale price
    kontor(&dir)
        .args(["products", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Widget"))
        .stdout(predicate::str::contains("90.00"));

    // Soft delete hides it from the storefront but not from --all
    run_ok(kontor(&dir).args(["products", "rm", &id]));
    kontor(&dir)
        .args(["products", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Widget").not());
    kontor(&dir)
        .args(["products", "list", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Widget"))
        .stdout(predicate::str::contains("deleted"));

    // Restore brings it back
    run_ok(kontor(&dir).args(["products", "restore", &id]));
    kontor(&dir)
        .args(["products", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Widget"));

    // Purge removes it for good
    run_ok(kontor(&dir).args(["products", "purge", &id]));
    kontor(&dir)
        .args(["products", "list", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No products found"));
}

#[test]
fn duplicate_seller_email_fails_with_error() {
    let dir = TempDir::new().unwrap();

    run_ok(kontor(&dir).args([
        "sellers",
        "add",
        "--first-name",
        "Ada",
        "--email",
        "ada@acme.test",
        "--seller-id",
        "SLR-001",
    ]));

    kontor(&dir)
        .args([
            "sellers",
            "add",
            "--first-name",
            "Ada",
            "--email",
            "ADA@acme.test",
            "--seller-id",
            "SLR-002",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate email"));
}

#[test]
fn stock_adjustment_clamps_at_zero() {
    let dir = TempDir::new().unwrap();

    let stdout = run_ok(kontor(&dir).args([
        "inventory", "add", "--sku", "BLT-10", "--name", "Bolts", "--stock", "10",
    ]));
    let id = created_id(&stdout, "inventory item");

    kontor(&dir)
        .args(["inventory", "adjust", &id, "--subtract", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("BLT-10 -> 0"));
}

#[test]
fn receiving_a_purchase_bumps_inventory() {
    let dir = TempDir::new().unwrap();

    run_ok(kontor(&dir).args([
        "inventory",
        "add",
        "--sku",
        "BLT-10",
        "--name",
        "Bolts",
        "--stock",
        "10",
    ]));

    let stdout = run_ok(kontor(&dir).args([
        "purchases",
        "add",
        "--supplier",
        "sup-1",
        "--item",
        "BLT-10:25:2.50",
        "--item",
        "GHOST-1:5:1.00",
    ]));
    let po = created_id(&stdout, "purchase");
    assert!(po.starts_with("PO-"), "purchase number format: {}", po);

    kontor(&dir)
        .args(["purchases", "receive", &po])
        .assert()
        .success()
        .stdout(predicate::str::contains("BLT-10"))
        .stdout(predicate::str::contains("35"))
        .stdout(predicate::str::contains("GHOST-1"));

    // Receiving twice fails and does not double-bump
    kontor(&dir)
        .args(["purchases", "receive", &po])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already delivered"));

    kontor(&dir)
        .args(["inventory", "search", "BLT-10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("35"));
}

#[test]
fn unknown_id_exits_with_failure() {
    let dir = TempDir::new().unwrap();
    kontor(&dir)
        .args(["products", "show", "missing-id"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}
