mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;

use common::{TestWorkspace, sample_orders_csv};

fn profitlens() -> Command {
    Command::cargo_bin("profitlens").expect("binary exists")
}

#[test]
fn domains_lists_values_counts_and_discount_bounds() {
    let ws = TestWorkspace::new();
    let input = ws.write("superstore.csv", &sample_orders_csv());

    profitlens()
        .args(["domains", "-i", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("Region"))
        .stdout(contains("East"))
        .stdout(contains("Sub-Category"))
        .stdout(contains("Phones"))
        .stdout(contains("Discount range: 0.00 to 0.40"));
}

#[test]
fn domains_json_is_machine_readable() {
    let ws = TestWorkspace::new();
    let input = ws.write("superstore.csv", &sample_orders_csv());

    let output = profitlens()
        .args(["domains", "-i", input.to_str().unwrap(), "--format", "json"])
        .output()
        .expect("run domains");
    assert!(output.status.success());

    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).expect("parse json");
    assert_eq!(doc["regions"]["East"], 2);
    assert_eq!(doc["discount_max"].as_f64(), Some(0.4));
}

#[test]
fn preview_shows_cleaned_rows_only() {
    let ws = TestWorkspace::new();
    let input = ws.write("superstore.csv", &sample_orders_csv());

    // Two rows: the later fixture rows never appear.
    profitlens()
        .args(["preview", "-i", input.to_str().unwrap(), "--rows", "2"])
        .assert()
        .success()
        .stdout(contains("New York City"))
        .stdout(contains("1200.00"))
        .stdout(contains("Houston").not());
}

#[test]
fn preview_json_serializes_orders() {
    let ws = TestWorkspace::new();
    let input = ws.write("superstore.csv", &sample_orders_csv());

    let output = profitlens()
        .args([
            "preview",
            "-i",
            input.to_str().unwrap(),
            "--rows",
            "2",
            "--format",
            "json",
        ])
        .output()
        .expect("run preview");
    assert!(output.status.success());

    let doc: serde_json::Value = serde_json::from_slice(&output.stdout).expect("parse json");
    let rows = doc.as_array().expect("array of orders");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["region"], "East");
    assert_eq!(rows[0]["sales"].as_f64(), Some(1200.0));
    assert_eq!(rows[0]["order_date"], "2016-11-08");
}

#[test]
fn columns_reports_coercion_verdicts() {
    let ws = TestWorkspace::new();
    let input = ws.write("superstore.csv", &sample_orders_csv());

    profitlens()
        .args(["columns", "-i", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("Order Date"))
        .stdout(contains("date"))
        .stdout(contains("number"))
        .stdout(contains("Sub-Category"));
}

#[test]
fn semicolon_delimiter_is_honoured() {
    let ws = TestWorkspace::new();
    let input = ws.write(
        "orders.csv",
        "Region;Sales;Profit;Discount\nEast;100;20;0.1\nWest;200;-50;0.3\n",
    );

    profitlens()
        .args([
            "report",
            "-i",
            input.to_str().unwrap(),
            "--delimiter",
            ";",
        ])
        .assert()
        .success()
        .stdout(contains("$300"))
        .stdout(contains("Lowest-profit region: West"));
}

#[test]
fn tsv_extension_switches_to_tab_delimiter() {
    let ws = TestWorkspace::new();
    let input = ws.write(
        "orders.tsv",
        "Region\tSales\tProfit\tDiscount\nEast\t100\t20\t0.1\n",
    );

    profitlens()
        .args(["preview", "-i", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("East"));
}

#[test]
fn invalid_delimiter_is_rejected_at_parse_time() {
    profitlens()
        .args(["report", "-i", "orders.csv", "--delimiter", "ab"])
        .assert()
        .failure()
        .stderr(contains("single character"));
}
