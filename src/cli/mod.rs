use std::fs::File;
use std::io::{self, stdout, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};

use crate::application::{LedgerService, LoadOptions};
use crate::domain::{
    check_text_field, format_total, parse_cents, summarize, Cents, ReportPeriod, SearchFilter,
    Transaction,
};
use crate::io::{ExportFormat, Exporter};
use crate::storage::DEFAULT_LEDGER_FILE;

mod menu;

pub use menu::{Menu, Screen};

/// Tally - Personal Finance Ledger
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "A flat-file ledger for deposits and payments")]
#[command(version)]
pub struct Cli {
    /// Ledger file path
    #[arg(short, long, global = true, env = "TALLY_FILE", default_value = DEFAULT_LEDGER_FILE)]
    pub file: PathBuf,

    /// Fail on malformed ledger lines instead of skipping them
    #[arg(long, global = true)]
    pub strict: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to run (interactive menu if omitted)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record a deposit
    Deposit {
        /// Amount deposited (e.g., "42.50" or "42")
        #[arg(allow_hyphen_values = true)]
        amount: String,

        /// Description of the deposit
        #[arg(short, long, default_value = "")]
        description: String,

        /// Who the money came from
        #[arg(long, default_value = "")]
        vendor: String,
    },

    /// Record a payment (always stored as a negative amount)
    Payment {
        /// Amount paid (sign is ignored)
        #[arg(allow_hyphen_values = true)]
        amount: String,

        /// Description of the payment
        #[arg(short, long, default_value = "")]
        description: String,

        /// Who was paid
        #[arg(long, default_value = "")]
        vendor: String,
    },

    /// List transactions, newest first
    List {
        #[command(flatten)]
        selection: Selection,
    },

    /// Reports and searches
    #[command(subcommand)]
    Report(ReportCommands),

    /// Export transactions to CSV or JSON
    Export {
        /// Format: csv, json
        format: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        selection: Selection,
    },

    /// Interactive menu
    Menu,
}

/// Which transactions a listing covers.
#[derive(clap::Args, Debug, Clone, Copy)]
pub struct Selection {
    /// Only deposits
    #[arg(long, conflicts_with = "payments")]
    pub deposits: bool,

    /// Only payments
    #[arg(long)]
    pub payments: bool,
}

impl Selection {
    fn select<'a>(&self, service: &'a LedgerService) -> Vec<&'a Transaction> {
        if self.deposits {
            service.deposits()
        } else if self.payments {
            service.payments()
        } else {
            service.all_transactions()
        }
    }
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Transactions in the current month
    MonthToDate,

    /// Transactions in the previous calendar month
    PreviousMonth,

    /// Transactions in the current year
    YearToDate,

    /// Transactions whose vendor contains the query (case-insensitive)
    Vendor {
        /// Text to search for
        query: String,
    },

    /// Search with any combination of filters
    Search {
        /// Start date, inclusive (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// End date, inclusive (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Description keyword (case-insensitive)
        #[arg(short, long)]
        description: Option<String>,

        /// Vendor keyword (case-insensitive)
        #[arg(long)]
        vendor: Option<String>,

        /// Exact amount (e.g., "-42.50")
        #[arg(long, allow_hyphen_values = true)]
        amount: Option<String>,
    },
}

impl Cli {
    /// Default log filter for the chosen verbosity; `RUST_LOG` takes precedence.
    pub fn log_filter(&self) -> &'static str {
        if self.verbose { "debug" } else { "warn" }
    }

    pub fn run(self) -> Result<()> {
        let options = LoadOptions {
            strict: self.strict,
        };
        let mut service = LedgerService::open(&self.file, options)
            .with_context(|| format!("Failed to load ledger {}", self.file.display()))?;

        if !service.load_report().file_existed {
            eprintln!("No existing transactions found. A new file will be created.");
        }

        match self.command {
            Some(Commands::Deposit {
                amount,
                description,
                vendor,
            }) => {
                let amount_cents = parse_amount(&amount)?;
                check_field("Description", &description)?;
                check_field("Vendor", &vendor)?;

                let txn = service.record_deposit(now(), description, vendor, amount_cents)?;
                println!("Deposit added: {}", txn);
            }

            Some(Commands::Payment {
                amount,
                description,
                vendor,
            }) => {
                let amount_cents = parse_amount(&amount)?;
                check_field("Description", &description)?;
                check_field("Vendor", &vendor)?;

                let txn = service.record_payment(now(), description, vendor, amount_cents)?;
                println!("Payment recorded: {}", txn);
            }

            Some(Commands::List { selection }) => {
                let transactions = selection.select(&service);
                render_transactions(&mut stdout().lock(), &transactions)?;
            }

            Some(Commands::Report(report_cmd)) => {
                run_report_command(&service, report_cmd)?;
            }

            Some(Commands::Export {
                format,
                output,
                selection,
            }) => {
                run_export_command(&service, &format, output, selection)?;
            }

            Some(Commands::Menu) | None => {
                let stdin = io::stdin();
                Menu::new(&mut service, stdin.lock(), stdout().lock()).run()?;
            }
        }

        Ok(())
    }
}

fn run_report_command(service: &LedgerService, cmd: ReportCommands) -> Result<()> {
    let transactions = match cmd {
        ReportCommands::MonthToDate => service.report(ReportPeriod::MonthToDate, today())?,
        ReportCommands::PreviousMonth => service.report(ReportPeriod::PreviousMonth, today())?,
        ReportCommands::YearToDate => service.report(ReportPeriod::YearToDate, today())?,
        ReportCommands::Vendor { query } => service.search_by_vendor(&query),
        ReportCommands::Search {
            from,
            to,
            description,
            vendor,
            amount,
        } => {
            let mut filter = SearchFilter::new();
            if let Some(date_str) = from {
                filter = filter.with_start_date(parse_date(&date_str)?);
            }
            if let Some(date_str) = to {
                filter = filter.with_end_date(parse_date(&date_str)?);
            }
            if let Some(keyword) = description.filter(|k| !k.is_empty()) {
                filter = filter.with_description(keyword);
            }
            if let Some(keyword) = vendor.filter(|k| !k.is_empty()) {
                filter = filter.with_vendor(keyword);
            }
            if let Some(amount) = amount {
                filter = filter.with_amount(parse_amount(&amount)?);
            }
            service.custom_search(&filter)?
        }
    };

    render_transactions(&mut stdout().lock(), &transactions)?;
    Ok(())
}

fn run_export_command(
    service: &LedgerService,
    format: &str,
    output: Option<PathBuf>,
    selection: Selection,
) -> Result<()> {
    let Some(export_format) = ExportFormat::from_str(format) else {
        anyhow::bail!("Invalid export format '{}'. Valid formats: csv, json", format);
    };

    let transactions = selection.select(service);
    let exporter = Exporter::new(&transactions);

    // Determine output writer
    let writer: Box<dyn Write> = match &output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    let count = exporter.export(export_format, writer)?;
    if output.is_some() {
        eprintln!(
            "Exported {} transaction(s) as {}",
            count,
            export_format.as_str()
        );
    }
    Ok(())
}

/// Print one ledger line per transaction followed by totals.
pub fn render_transactions<W: Write>(out: &mut W, transactions: &[&Transaction]) -> io::Result<()> {
    if transactions.is_empty() {
        writeln!(out, "No transactions found.")?;
        return Ok(());
    }

    for txn in transactions {
        writeln!(out, "{}", txn)?;
    }

    let summary = summarize(transactions.iter().copied());
    writeln!(out, "{}", "-".repeat(44))?;
    writeln!(
        out,
        "{} transaction(s)  deposits ${}  payments ${}  net ${}",
        summary.count,
        format_total(summary.total_deposits),
        format_total(summary.total_payments),
        format_total(summary.net)
    )
}

/// Read one line, without its line ending. `None` at end of input.
pub(crate) fn read_input<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed_len);
    Ok(Some(line))
}

pub(crate) fn parse_amount(input: &str) -> Result<Cents> {
    parse_cents(input).with_context(|| format!("Invalid amount '{}'. Use '42.50' or '42'", input))
}

pub(crate) fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str.trim(), crate::domain::DATE_FORMAT)
        .with_context(|| format!("Invalid date format '{}'. Use YYYY-MM-DD", date_str))
}

/// Free-text fields must fit on one ledger line.
pub(crate) fn check_field(name: &'static str, value: &str) -> Result<()> {
    check_text_field(name, value)?;
    Ok(())
}

pub(crate) fn now() -> chrono::NaiveDateTime {
    Local::now().naive_local()
}

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}
