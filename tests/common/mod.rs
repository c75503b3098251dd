#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::{TempDir, tempdir};

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    /// Returns the root path for all files owned by this workspace.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        self.write_bytes(name, contents.as_bytes())
    }

    /// Raw-byte variant for fixtures in legacy encodings.
    pub fn write_bytes(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents).expect("write temp file contents");
        path
    }
}

/// A small but complete orders export: currency-formatted sales, a loss-maker
/// per axis, and one exact duplicate row (the second Ohio line).
///
/// After cleaning it holds four orders with totals sales 2450, profit 170,
/// average discount 0.175; West and Phones are the worst performers.
pub fn sample_orders_csv() -> String {
    let mut csv = String::from(
        "Order Date,Sales,Profit,Discount,Quantity,Region,State,City,Category,Sub-Category,Segment,Customer ID\n",
    );
    csv.push_str("2016-11-08,\"$1,200\",300,0.0,2,East,New York,New York City,Furniture,Chairs,Consumer,CG-12520\n");
    csv.push_str("2016-11-09,$950,-150,0.2,3,West,California,Los Angeles,Technology,Phones,Corporate,DV-13045\n");
    csv.push_str("2017-01-15,$200,50,0.1,1,East,Ohio,Columbus,Office Supplies,Paper,Home Office,AB-10015\n");
    csv.push_str("2017-01-15,$200,50,0.1,1,East,Ohio,Columbus,Office Supplies,Paper,Home Office,AB-10015\n");
    csv.push_str("2017-02-20,$100,-30,0.4,5,South,Texas,Houston,Furniture,Tables,Consumer,ZD-21925\n");
    csv
}
