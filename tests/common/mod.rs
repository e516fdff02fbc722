// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use tally::application::{LedgerService, LoadOptions};
use tally::domain::{Cents, Transaction};
use tempfile::TempDir;

/// Helper to create a service backed by a ledger file in a temporary directory
pub fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let service = LedgerService::open(ledger_path(&temp_dir), LoadOptions::default())?;
    Ok((service, temp_dir))
}

/// Path of the ledger file inside a test directory
pub fn ledger_path(temp_dir: &TempDir) -> PathBuf {
    temp_dir.path().join("transactions.csv")
}

/// Write raw ledger contents and return the file path
pub fn write_ledger(temp_dir: &TempDir, contents: &str) -> Result<PathBuf> {
    let path = ledger_path(temp_dir);
    fs::write(&path, contents)?;
    Ok(path)
}

/// Helper to parse a date string into NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Transaction at noon on the given date
pub fn txn(date: &str, description: &str, vendor: &str, amount: Cents) -> Transaction {
    Transaction::new(date, "12:00:00", description, vendor, amount)
}

/// Test fixture: a small household ledger spanning a year boundary
pub struct StandardLedger;

impl StandardLedger {
    pub fn populate(service: &mut LedgerService) -> Result<()> {
        for transaction in [
            txn("2023-11-28", "Rent", "Landlord", -120000),
            txn("2023-12-01", "Paycheck", "ACME Corp", 250000),
            txn("2023-12-14", "Groceries", "Walmart", -8412),
            txn("2023-12-24", "Gifts", "K-Mart", -3999),
            txn("2024-01-02", "Refund", "Target", 1500),
            txn("2024-01-05", "Groceries", "Walmart", -6120),
            txn("2024-01-09", "Adjustment", "Bank", 0),
            txn("2024-01-12", "Paycheck", "ACME Corp", 250000),
        ] {
            service.append(transaction)?;
        }
        Ok(())
    }
}
