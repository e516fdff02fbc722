mod common;

use std::fs;

use anyhow::Result;
use chrono::NaiveDate;
use common::{ledger_path, test_service, txn, write_ledger, StandardLedger};
use tally::application::{AppError, LedgerService, LoadOptions};
use tally::domain::{Cents, Transaction};

fn at(date: &str, time: (u32, u32, u32)) -> chrono::NaiveDateTime {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(time.0, time.1, time.2)
        .unwrap()
}

#[test]
fn test_missing_file_is_an_empty_ledger() -> Result<()> {
    let (service, temp) = test_service()?;

    assert!(service.is_empty());
    assert!(!service.load_report().file_existed);
    // Nothing is created until the first append
    assert!(!ledger_path(&temp).exists());
    Ok(())
}

#[test]
fn test_append_survives_reload() -> Result<()> {
    let (mut service, temp) = test_service()?;

    service.record_deposit(at("2024-05-01", (9, 0, 0)), "Paycheck", "ACME", 150000)?;
    service.record_payment(at("2024-05-01", (14, 30, 0)), "Groceries", "Walmart", 4250)?;

    let contents = fs::read_to_string(ledger_path(&temp))?;
    assert_eq!(
        contents,
        "2024-05-01|09:00:00|Paycheck|ACME| $1500.00\n\
         2024-05-01|14:30:00|Groceries|Walmart| $-42.50\n"
    );

    let reloaded = LedgerService::open(ledger_path(&temp), LoadOptions::default())?;
    assert!(reloaded.load_report().file_existed);
    assert_eq!(reloaded.load_report().loaded, 2);
    assert_eq!(reloaded.transactions(), service.transactions());
    Ok(())
}

#[test]
fn test_round_trip_through_load() -> Result<()> {
    let (mut service, temp) = test_service()?;
    let originals = vec![
        Transaction::new("2024-02-29", "23:59:59", "Leap day dinner", "Chez Nous", -12345),
        Transaction::new("2024-03-01", "00:00:00", "", "", 1),
        Transaction::new("2024-03-02", "08:15:00", "Salary, March", "ACME, Inc.", 123456789),
    ];
    for original in &originals {
        service.append(original.clone())?;
    }

    let reloaded = LedgerService::open(ledger_path(&temp), LoadOptions::default())?;
    assert_eq!(reloaded.transactions(), originals.as_slice());
    Ok(())
}

#[test]
fn test_payments_are_always_negative() -> Result<()> {
    let (mut service, _temp) = test_service()?;
    let now = at("2024-05-01", (10, 0, 0));

    for typed in [4250, -4250, 1, -1] {
        let stored = service.record_payment(now, "Bill", "Utility", typed)?;
        assert!(stored.amount() < 0, "payment of {} stored as {}", typed, stored.amount());
        assert_eq!(stored.amount(), -typed.abs());
    }
    Ok(())
}

#[test]
fn test_load_skips_malformed_lines() -> Result<()> {
    let temp = tempfile::TempDir::new()?;
    let path = write_ledger(
        &temp,
        "2024-05-01|14:30:00|Groceries|Walmart| $-42.50\n2024-05-01|15:00:00|Half a line\n",
    )?;

    let service = LedgerService::open(&path, LoadOptions::default())?;

    assert_eq!(service.len(), 1);
    assert_eq!(service.transactions()[0].vendor(), "Walmart");
    assert_eq!(service.load_report().skipped_lines, vec![2]);
    Ok(())
}

#[test]
fn test_load_skips_lines_with_blank_trailing_fields() -> Result<()> {
    let temp = tempfile::TempDir::new()?;
    let path = write_ledger(
        &temp,
        "2024-05-01|14:30:00|Groceries|Walmart| $-42.50\n2024-05-02|10:00:00|Note|Vendor|\n||||\n",
    )?;

    let service = LedgerService::open(&path, LoadOptions::default())?;

    assert_eq!(service.len(), 1);
    assert_eq!(service.load_report().skipped_lines, vec![2, 3]);
    Ok(())
}

#[test]
fn test_rejected_text_never_reaches_the_file() -> Result<()> {
    let (mut service, temp) = test_service()?;
    service.append(txn("2024-05-01", "Groceries", "Walmart", -4250))?;

    let piped = service.append(txn("2024-05-02", "a|b", "Walmart", -100));
    assert!(matches!(piped, Err(AppError::InvalidField(_))));
    let multiline = service.append(txn("2024-05-03", "Rent", "line1\nline2", -100));
    assert!(matches!(multiline, Err(AppError::InvalidField(_))));

    let reloaded = LedgerService::open(ledger_path(&temp), LoadOptions::default())?;
    assert_eq!(reloaded.transactions(), service.transactions());
    assert!(reloaded.load_report().skipped_lines.is_empty());
    Ok(())
}

#[test]
fn test_strict_load_fails_on_malformed_line() -> Result<()> {
    let temp = tempfile::TempDir::new()?;
    let path = write_ledger(
        &temp,
        "2024-05-01|14:30:00|Groceries|Walmart| $-42.50\n\n",
    )?;

    let result = LedgerService::open(&path, LoadOptions { strict: true });

    assert!(matches!(
        result,
        Err(AppError::MalformedLine { line: 2, fields: 1 })
    ));
    Ok(())
}

#[test]
fn test_load_accepts_plain_amounts() -> Result<()> {
    let temp = tempfile::TempDir::new()?;
    let path = write_ledger(
        &temp,
        "2024-05-01|14:30:00|Refund|Target|12.5\n2024-05-02|09:00:00|Bonus|ACME| $1,000.00\n",
    )?;

    let service = LedgerService::open(&path, LoadOptions::default())?;

    let amounts: Vec<Cents> = service.transactions().iter().map(|t| t.amount()).collect();
    assert_eq!(amounts, vec![1250, 100000]);
    Ok(())
}

#[test]
fn test_load_fails_on_bad_amount() -> Result<()> {
    let temp = tempfile::TempDir::new()?;
    let path = write_ledger(
        &temp,
        "2024-05-01|14:30:00|Groceries|Walmart| $-42.50\n2024-05-02|09:00:00|Oops|Nobody| $twelve\n",
    )?;

    let result = LedgerService::open(&path, LoadOptions::default());

    assert!(matches!(result, Err(AppError::InvalidAmount { line: 2, .. })));
    Ok(())
}

#[test]
fn test_listings_are_newest_first() -> Result<()> {
    let (mut service, _temp) = test_service()?;
    StandardLedger::populate(&mut service)?;

    let inserted: Vec<&Transaction> = service.transactions().iter().collect();
    let mut reversed = inserted.clone();
    reversed.reverse();
    assert_eq!(service.all_transactions(), reversed);

    let deposits = service.deposits();
    let deposit_dates: Vec<&str> = deposits.iter().map(|t| t.date()).collect();
    assert_eq!(deposit_dates, vec!["2024-01-12", "2024-01-02", "2023-12-01"]);

    let payments = service.payments();
    let payment_dates: Vec<&str> = payments.iter().map(|t| t.date()).collect();
    assert_eq!(
        payment_dates,
        vec!["2024-01-05", "2023-12-24", "2023-12-14", "2023-11-28"]
    );
    Ok(())
}

#[test]
fn test_deposits_and_payments_partition_nonzero_records() -> Result<()> {
    let (mut service, _temp) = test_service()?;
    StandardLedger::populate(&mut service)?;

    let deposits = service.deposits();
    let payments = service.payments();

    // Disjoint
    assert!(deposits
        .iter()
        .all(|d| !payments.iter().any(|p| std::ptr::eq(*d, *p))));

    // Union is everything except the zero-amount adjustment
    let nonzero = service
        .transactions()
        .iter()
        .filter(|t| t.amount() != 0)
        .count();
    assert_eq!(deposits.len() + payments.len(), nonzero);
    assert_eq!(nonzero, service.len() - 1);
    Ok(())
}

#[test]
fn test_appended_records_use_ledger_line_format() -> Result<()> {
    let (mut service, temp) = test_service()?;
    service.append(txn("2024-05-01", "Groceries", "Walmart", -4250))?;

    let contents = fs::read_to_string(ledger_path(&temp))?;
    assert_eq!(contents, "2024-05-01|12:00:00|Groceries|Walmart| $-42.50\n");
    Ok(())
}
