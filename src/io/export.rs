use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::domain::{format_cents, Transaction};

/// JSON snapshot of an exported selection. Amounts are integer cents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub transactions: Vec<Transaction>,
}

/// Output formats supported by [`Exporter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "csv" => Some(ExportFormat::Csv),
            "json" => Some(ExportFormat::Json),
            _ => None,
        }
    }
}

/// Exporter for writing a selection of transactions to other formats
pub struct Exporter<'a> {
    transactions: &'a [&'a Transaction],
}

impl<'a> Exporter<'a> {
    pub fn new(transactions: &'a [&'a Transaction]) -> Self {
        Self { transactions }
    }

    /// Write in the requested format, returning the number of transactions written.
    pub fn export<W: Write>(&self, format: ExportFormat, writer: W) -> Result<usize> {
        match format {
            ExportFormat::Csv => self.export_csv(writer),
            ExportFormat::Json => Ok(self.export_json(writer)?.transactions.len()),
        }
    }

    /// Export transactions to CSV with a header row and two-decimal amounts
    pub fn export_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["date", "time", "description", "vendor", "amount"])?;

        let mut count = 0;
        for txn in self.transactions {
            let amount = format_cents(txn.amount());
            csv_writer.write_record([
                txn.date(),
                txn.time(),
                txn.description(),
                txn.vendor(),
                amount.as_str(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export transactions as a pretty-printed JSON snapshot
    pub fn export_json<W: Write>(&self, mut writer: W) -> Result<LedgerSnapshot> {
        let snapshot = LedgerSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            transactions: self.transactions.iter().map(|t| (*t).clone()).collect(),
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Transaction> {
        vec![
            Transaction::new("2024-05-01", "14:30:00", "Groceries, weekly", "Walmart", -4250),
            Transaction::new("2024-05-02", "09:00:00", "Paycheck", "ACME", 150000),
        ]
    }

    #[test]
    fn test_export_csv() -> Result<()> {
        let transactions = sample();
        let selection: Vec<&Transaction> = transactions.iter().collect();

        let mut out = Vec::new();
        let count = Exporter::new(&selection).export_csv(&mut out)?;

        assert_eq!(count, 2);
        assert_eq!(
            String::from_utf8(out)?,
            "date,time,description,vendor,amount\n\
             2024-05-01,14:30:00,\"Groceries, weekly\",Walmart,-42.50\n\
             2024-05-02,09:00:00,Paycheck,ACME,1500.00\n"
        );
        Ok(())
    }

    #[test]
    fn test_export_json_snapshot() -> Result<()> {
        let transactions = sample();
        let selection: Vec<&Transaction> = transactions.iter().rev().collect();

        let mut out = Vec::new();
        let snapshot = Exporter::new(&selection).export_json(&mut out)?;
        assert_eq!(snapshot.transactions.len(), 2);

        let parsed: LedgerSnapshot = serde_json::from_slice(&out)?;
        assert_eq!(parsed.version, env!("CARGO_PKG_VERSION"));
        // Selection order is preserved
        assert_eq!(parsed.transactions[0].vendor(), "ACME");
        assert_eq!(parsed.transactions[1].amount(), -4250);
        Ok(())
    }

    #[test]
    fn test_export_format_from_str() {
        assert_eq!(ExportFormat::from_str("CSV"), Some(ExportFormat::Csv));
        assert_eq!(ExportFormat::from_str("json"), Some(ExportFormat::Json));
        assert_eq!(ExportFormat::from_str("xml"), None);
    }
}
