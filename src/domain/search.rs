use chrono::NaiveDate;

use super::{Cents, Transaction};

/// Criteria for a custom search. Every field is optional; an absent field
/// imposes no constraint and present fields are combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    /// Inclusive lower bound on the transaction date
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on the transaction date
    pub end_date: Option<NaiveDate>,
    /// Case-insensitive substring of the description
    pub description: Option<String>,
    /// Case-insensitive substring of the vendor
    pub vendor: Option<String>,
    /// Exact amount in cents
    pub amount: Option<Cents>,
}

impl SearchFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn with_end_date(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    pub fn with_description(mut self, keyword: impl Into<String>) -> Self {
        self.description = Some(keyword.into());
        self
    }

    pub fn with_vendor(mut self, keyword: impl Into<String>) -> Self {
        self.vendor = Some(keyword.into());
        self
    }

    pub fn with_amount(mut self, amount: Cents) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Whether the filter needs the transaction date to decide a match.
    pub fn uses_dates(&self) -> bool {
        self.start_date.is_some() || self.end_date.is_some()
    }

    /// Test a transaction against every criterion.
    ///
    /// The stored date is parsed first whenever a date bound is set, so a
    /// malformed date is reported even if another criterion would reject the
    /// transaction. A keyword-only search never parses dates.
    pub fn matches(&self, txn: &Transaction) -> Result<bool, chrono::ParseError> {
        if self.uses_dates() {
            let date = txn.parsed_date()?;
            if self.start_date.is_some_and(|start| date < start) {
                return Ok(false);
            }
            if self.end_date.is_some_and(|end| date > end) {
                return Ok(false);
            }
        }
        if let Some(amount) = self.amount {
            if txn.amount() != amount {
                return Ok(false);
            }
        }
        if let Some(keyword) = &self.description {
            if !contains_ignore_case(txn.description(), keyword) {
                return Ok(false);
            }
        }
        if let Some(keyword) = &self.vendor {
            if !contains_ignore_case(txn.vendor(), keyword) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Case-insensitive substring test. An empty needle matches everything.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
