use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{contains_ignore_case, ReportPeriod, SearchFilter, TotalCents, Transaction};

/// Every transaction, newest first.
pub fn newest_first(transactions: &[Transaction]) -> Vec<&Transaction> {
    transactions.iter().rev().collect()
}

/// Transactions with a positive amount, newest first.
pub fn deposits(transactions: &[Transaction]) -> Vec<&Transaction> {
    transactions.iter().rev().filter(|t| t.is_deposit()).collect()
}

/// Transactions with a negative amount, newest first.
/// Zero-amount transactions are neither deposits nor payments.
pub fn payments(transactions: &[Transaction]) -> Vec<&Transaction> {
    transactions.iter().rev().filter(|t| t.is_payment()).collect()
}

/// Transactions whose vendor contains `query`, ignoring case, in insertion order.
pub fn search_by_vendor<'a>(transactions: &'a [Transaction], query: &str) -> Vec<&'a Transaction> {
    transactions
        .iter()
        .filter(|t| contains_ignore_case(t.vendor(), query))
        .collect()
}

/// Transactions dated inside `period` relative to `today`, in insertion order.
///
/// Every stored date is parsed; the first malformed one aborts the report.
pub fn in_period(
    transactions: &[Transaction],
    period: ReportPeriod,
    today: NaiveDate,
) -> Result<Vec<&Transaction>, InvalidDateError> {
    let mut selected = Vec::new();
    for txn in transactions {
        let date = txn
            .parsed_date()
            .map_err(|source| InvalidDateError::new(txn, source))?;
        if period.contains(date, today) {
            selected.push(txn);
        }
    }
    Ok(selected)
}

/// Transactions matching every criterion of `filter`, in insertion order.
pub fn custom_search<'a>(
    transactions: &'a [Transaction],
    filter: &SearchFilter,
) -> Result<Vec<&'a Transaction>, InvalidDateError> {
    let mut selected = Vec::new();
    for txn in transactions {
        let matched = filter
            .matches(txn)
            .map_err(|source| InvalidDateError::new(txn, source))?;
        if matched {
            selected.push(txn);
        }
    }
    Ok(selected)
}

/// Totals over a sequence of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub count: usize,
    /// Sum of positive amounts
    pub total_deposits: TotalCents,
    /// Sum of negative amounts (zero or below)
    pub total_payments: TotalCents,
    pub net: TotalCents,
}

/// Compute deposit, payment and net totals.
pub fn summarize<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> LedgerSummary {
    transactions
        .into_iter()
        .fold(LedgerSummary::default(), |mut summary, txn| {
            let amount = TotalCents::from(txn.amount());
            summary.count += 1;
            if txn.is_deposit() {
                summary.total_deposits += amount;
            } else {
                summary.total_payments += amount;
            }
            summary.net += amount;
            summary
        })
}

/// A stored date that is not a valid ISO 8601 calendar date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidDateError {
    pub date: String,
    pub source: chrono::ParseError,
}

impl InvalidDateError {
    fn new(txn: &Transaction, source: chrono::ParseError) -> Self {
        Self {
            date: txn.date().to_string(),
            source,
        }
    }
}

impl fmt::Display for InvalidDateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid stored date '{}': {}", self.date, self.source)
    }
}

impl std::error::Error for InvalidDateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}
