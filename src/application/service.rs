use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use log::{debug, info, warn};

use crate::domain::{self, Cents, ParseLineError, ReportPeriod, SearchFilter, Transaction};
use crate::storage::Repository;

use super::AppError;

/// How the ledger file is read at startup.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    /// Fail on lines that do not have exactly five fields instead of skipping them.
    pub strict: bool,
}

/// Outcome of reading the ledger file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// False when no ledger file existed and the ledger starts empty.
    pub file_existed: bool,
    pub loaded: usize,
    /// 1-based line numbers of malformed lines that were skipped
    pub skipped_lines: Vec<usize>,
}

/// Application service owning the transaction history.
/// This is the primary interface for any client (CLI, interactive menu, tests).
///
/// Transactions are kept in insertion order, which is also the order of the
/// ledger file. Listing operations return them newest first; reports and
/// searches keep insertion order.
pub struct LedgerService {
    repo: Repository,
    transactions: Vec<Transaction>,
    load_report: LoadReport,
}

impl LedgerService {
    /// Open the ledger file at `path` and load its transactions.
    pub fn open(path: impl Into<PathBuf>, options: LoadOptions) -> Result<Self, AppError> {
        Self::load(Repository::new(path), options)
    }

    /// Load every transaction from the repository.
    ///
    /// A missing file yields an empty ledger. A line without exactly five
    /// fields is skipped (or rejected in strict mode); an unparseable amount
    /// fails the whole load.
    pub fn load(repo: Repository, options: LoadOptions) -> Result<Self, AppError> {
        let Some(lines) = repo.read_lines()? else {
            info!(
                "No existing ledger at {}, starting empty",
                repo.path().display()
            );
            return Ok(Self {
                repo,
                transactions: Vec::new(),
                load_report: LoadReport::default(),
            });
        };

        let mut transactions = Vec::with_capacity(lines.len());
        let mut skipped_lines = Vec::new();

        for (index, line) in lines.iter().enumerate() {
            let line_number = index + 1;
            match Transaction::from_line(line) {
                Ok(txn) => transactions.push(txn),
                Err(ParseLineError::FieldCount(fields)) => {
                    if options.strict {
                        return Err(AppError::MalformedLine {
                            line: line_number,
                            fields,
                        });
                    }
                    warn!(
                        "Skipping malformed line {} of {}: expected 5 fields, found {}",
                        line_number,
                        repo.path().display(),
                        fields
                    );
                    skipped_lines.push(line_number);
                }
                Err(ParseLineError::Amount { value, source }) => {
                    return Err(AppError::InvalidAmount {
                        line: line_number,
                        value: value.trim().to_string(),
                        source,
                    });
                }
            }
        }

        if !skipped_lines.is_empty() {
            warn!(
                "Skipped {} malformed line(s) in {}",
                skipped_lines.len(),
                repo.path().display()
            );
        }
        debug!(
            "Loaded {} transaction(s) from {}",
            transactions.len(),
            repo.path().display()
        );

        let load_report = LoadReport {
            file_existed: true,
            loaded: transactions.len(),
            skipped_lines,
        };
        Ok(Self {
            repo,
            transactions,
            load_report,
        })
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.load_report
    }

    pub fn path(&self) -> &Path {
        self.repo.path()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// All transactions in insertion order.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    // ========================
    // Recording
    // ========================

    /// Add a transaction to the ledger and append it to the file.
    ///
    /// A transaction whose text would not survive a reload is rejected before
    /// anything is stored. The in-memory copy is kept even when the file write
    /// fails, so memory and file may then disagree until the next restart.
    pub fn append(&mut self, transaction: Transaction) -> Result<&Transaction, AppError> {
        transaction.validate()?;
        self.transactions.push(transaction);
        let index = self.transactions.len() - 1;
        let stored = &self.transactions[index];

        self.repo.append(stored)?;
        debug!("Appended transaction: {}", stored);
        Ok(stored)
    }

    /// Record a deposit stamped with `now`.
    pub fn record_deposit(
        &mut self,
        now: NaiveDateTime,
        description: impl Into<String>,
        vendor: impl Into<String>,
        amount: Cents,
    ) -> Result<&Transaction, AppError> {
        self.append(Transaction::deposit(now, description, vendor, amount))
    }

    /// Record a payment stamped with `now`. The amount is stored negative
    /// regardless of the sign given.
    pub fn record_payment(
        &mut self,
        now: NaiveDateTime,
        description: impl Into<String>,
        vendor: impl Into<String>,
        amount: Cents,
    ) -> Result<&Transaction, AppError> {
        self.append(Transaction::payment(now, description, vendor, amount))
    }

    // ========================
    // Listings (newest first)
    // ========================

    pub fn all_transactions(&self) -> Vec<&Transaction> {
        domain::newest_first(&self.transactions)
    }

    pub fn deposits(&self) -> Vec<&Transaction> {
        domain::deposits(&self.transactions)
    }

    pub fn payments(&self) -> Vec<&Transaction> {
        domain::payments(&self.transactions)
    }

    // ========================
    // Reports (insertion order)
    // ========================

    /// Transactions in the same month and year as `today`.
    pub fn month_to_date(&self, today: NaiveDate) -> Result<Vec<&Transaction>, AppError> {
        self.report(ReportPeriod::MonthToDate, today)
    }

    /// Transactions in the calendar month before `today`'s month.
    pub fn previous_month(&self, today: NaiveDate) -> Result<Vec<&Transaction>, AppError> {
        self.report(ReportPeriod::PreviousMonth, today)
    }

    /// Transactions in the same year as `today`.
    pub fn year_to_date(&self, today: NaiveDate) -> Result<Vec<&Transaction>, AppError> {
        self.report(ReportPeriod::YearToDate, today)
    }

    pub fn report(
        &self,
        period: ReportPeriod,
        today: NaiveDate,
    ) -> Result<Vec<&Transaction>, AppError> {
        Ok(domain::in_period(&self.transactions, period, today)?)
    }

    pub fn search_by_vendor(&self, query: &str) -> Vec<&Transaction> {
        domain::search_by_vendor(&self.transactions, query)
    }

    pub fn custom_search(&self, filter: &SearchFilter) -> Result<Vec<&Transaction>, AppError> {
        Ok(domain::custom_search(&self.transactions, filter)?)
    }
}
