//! Interactive menu: Home, Ledger and Reports screens driven by one-letter
//! commands read from any `BufRead`.

use std::io::{BufRead, Write};

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use log::debug;

use crate::application::LedgerService;
use crate::domain::{parse_cents, ReportPeriod, SearchFilter, DATE_FORMAT};

use super::{check_field, now, read_input, render_transactions};

/// Menu screens. Each command token either acts and stays on the screen or
/// moves to another one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Ledger,
    Reports,
}

impl Screen {
    fn title(&self) -> &'static str {
        match self {
            Screen::Home => "=== Home Screen ===",
            Screen::Ledger => "=== Ledger Menu ===",
            Screen::Reports => "=== Reports Menu ===",
        }
    }

    fn options(&self) -> &'static [&'static str] {
        match self {
            Screen::Home => &[
                "D) Add Deposit",
                "P) Make Payment (Debit)",
                "L) Ledger",
                "X) Exit",
            ],
            Screen::Ledger => &[
                "A) All Transactions",
                "D) Deposits Only",
                "P) Payments Only",
                "R) Reports",
                "H) Home",
            ],
            Screen::Reports => &[
                "C) Custom Search",
                "M) Month-to-Date",
                "P) Previous Month",
                "Y) Year-to-Date",
                "V) Search by Vendor",
                "B) Back to Ledger Menu",
            ],
        }
    }
}

/// What happens after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Goto(Screen),
    Exit,
}

#[derive(Debug, Clone, Copy)]
enum Kind {
    Deposit,
    Payment,
}

pub struct Menu<'a, R, W> {
    service: &'a mut LedgerService,
    input: R,
    output: W,
    clock: fn() -> NaiveDateTime,
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(service: &'a mut LedgerService, input: R, output: W) -> Self {
        Self {
            service,
            input,
            output,
            clock: now,
        }
    }

    /// Replace the local clock used to stamp new transactions and date reports.
    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    /// Run until the user exits or input ends.
    pub fn run(&mut self) -> Result<()> {
        writeln!(self.output, "Welcome to Tally!")?;
        let mut screen = Screen::Home;

        loop {
            self.show(screen)?;
            let Some(choice) = read_input(&mut self.input)? else {
                writeln!(self.output)?;
                writeln!(self.output, "Goodbye!")?;
                return Ok(());
            };

            match self.handle(screen, &choice.trim().to_uppercase())? {
                Flow::Goto(next) => {
                    if next != screen {
                        debug!("Menu: {:?} -> {:?}", screen, next);
                    }
                    screen = next;
                }
                Flow::Exit => return Ok(()),
            }
        }
    }

    fn show(&mut self, screen: Screen) -> Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "{}", screen.title())?;
        for option in screen.options() {
            writeln!(self.output, "{}", option)?;
        }
        write!(self.output, "Select an option: ")?;
        self.output.flush()?;
        Ok(())
    }

    fn handle(&mut self, screen: Screen, choice: &str) -> Result<Flow> {
        match (screen, choice) {
            (Screen::Home, "D") => self.record(Kind::Deposit),
            (Screen::Home, "P") => self.record(Kind::Payment),
            (Screen::Home, "L") => Ok(Flow::Goto(Screen::Ledger)),
            (Screen::Home, "X") => {
                writeln!(self.output, "Goodbye!")?;
                Ok(Flow::Exit)
            }

            (Screen::Ledger, "A") => {
                let transactions = self.service.all_transactions();
                render_transactions(&mut self.output, &transactions)?;
                Ok(Flow::Goto(screen))
            }
            (Screen::Ledger, "D") => {
                let transactions = self.service.deposits();
                render_transactions(&mut self.output, &transactions)?;
                Ok(Flow::Goto(screen))
            }
            (Screen::Ledger, "P") => {
                let transactions = self.service.payments();
                render_transactions(&mut self.output, &transactions)?;
                Ok(Flow::Goto(screen))
            }
            (Screen::Ledger, "R") => Ok(Flow::Goto(Screen::Reports)),
            (Screen::Ledger, "H") => Ok(Flow::Goto(Screen::Home)),

            (Screen::Reports, "C") => self.custom_search(),
            (Screen::Reports, "M") => self.period_report(ReportPeriod::MonthToDate),
            (Screen::Reports, "P") => self.period_report(ReportPeriod::PreviousMonth),
            (Screen::Reports, "Y") => self.period_report(ReportPeriod::YearToDate),
            (Screen::Reports, "V") => self.vendor_search(),
            (Screen::Reports, "B") => Ok(Flow::Goto(Screen::Ledger)),

            _ => {
                writeln!(self.output, "Invalid option. Try again.")?;
                Ok(Flow::Goto(screen))
            }
        }
    }

    /// Ask for a value. `None` means input ended.
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        writeln!(self.output, "{}", label)?;
        self.output.flush()?;
        Ok(read_input(&mut self.input)?)
    }

    fn record(&mut self, kind: Kind) -> Result<Flow> {
        let Some(description) = self.prompt("Enter description: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(vendor) = self.prompt("Enter vendor: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(amount) = self.prompt("Enter amount: ")? else {
            return Ok(Flow::Exit);
        };

        let checked = check_field("Description", &description)
            .and_then(|_| check_field("Vendor", &vendor));
        if let Err(e) = checked {
            writeln!(self.output, "{}. Nothing recorded.", e)?;
            return Ok(Flow::Goto(Screen::Home));
        }
        let Ok(amount) = parse_cents(&amount) else {
            writeln!(self.output, "Invalid amount. Nothing recorded.")?;
            return Ok(Flow::Goto(Screen::Home));
        };

        let now = (self.clock)();
        let result = match kind {
            Kind::Deposit => self
                .service
                .record_deposit(now, description, vendor, amount)
                .map(|_| "Deposit added!"),
            Kind::Payment => self
                .service
                .record_payment(now, description, vendor, amount)
                .map(|_| "Payment successfully recorded!"),
        };

        match result {
            Ok(message) => writeln!(self.output, "{}", message)?,
            Err(e) => writeln!(self.output, "Error: {}", e)?,
        }
        Ok(Flow::Goto(Screen::Home))
    }

    fn period_report(&mut self, period: ReportPeriod) -> Result<Flow> {
        let today = (self.clock)().date();
        writeln!(self.output, "--- {} ---", period.title())?;

        match self.service.report(period, today) {
            Ok(transactions) => render_transactions(&mut self.output, &transactions)?,
            Err(e) => writeln!(self.output, "Error: {}", e)?,
        }
        Ok(Flow::Goto(Screen::Reports))
    }

    fn vendor_search(&mut self) -> Result<Flow> {
        let Some(query) = self.prompt("Enter vendor name to search: ")? else {
            return Ok(Flow::Exit);
        };

        let transactions = self.service.search_by_vendor(query.trim());
        render_transactions(&mut self.output, &transactions)?;
        Ok(Flow::Goto(Screen::Reports))
    }

    fn custom_search(&mut self) -> Result<Flow> {
        let mut answers = Vec::with_capacity(5);
        for label in [
            "Enter the start date (YYYY-MM-DD) or leave blank: ",
            "Enter end date (YYYY-MM-DD) or leave blank: ",
            "Enter description keyword or leave blank: ",
            "Enter vendor keyword or leave blank: ",
            "Enter amount (exact) or leave blank: ",
        ] {
            let Some(answer) = self.prompt(label)? else {
                return Ok(Flow::Exit);
            };
            answers.push(answer.trim().to_string());
        }

        let mut filter = SearchFilter::new();
        if let Some(date) = self.optional_date(&answers[0], "start date")? {
            filter = filter.with_start_date(date);
        }
        if let Some(date) = self.optional_date(&answers[1], "end date")? {
            filter = filter.with_end_date(date);
        }
        if !answers[2].is_empty() {
            filter = filter.with_description(answers[2].as_str());
        }
        if !answers[3].is_empty() {
            filter = filter.with_vendor(answers[3].as_str());
        }
        if !answers[4].is_empty() {
            match parse_cents(&answers[4]) {
                Ok(amount) => filter = filter.with_amount(amount),
                Err(_) => writeln!(self.output, "Invalid amount. Ignoring amount filter.")?,
            }
        }

        match self.service.custom_search(&filter) {
            Ok(transactions) => render_transactions(&mut self.output, &transactions)?,
            Err(e) => writeln!(self.output, "Error: {}", e)?,
        }
        Ok(Flow::Goto(Screen::Reports))
    }

    /// Blank input means no bound; an invalid date is reported and ignored.
    fn optional_date(&mut self, input: &str, name: &str) -> Result<Option<NaiveDate>> {
        if input.is_empty() {
            return Ok(None);
        }
        match NaiveDate::parse_from_str(input, DATE_FORMAT) {
            Ok(date) => Ok(Some(date)),
            Err(_) => {
                writeln!(self.output, "Invalid date '{}'. Ignoring {} filter.", input, name)?;
                Ok(None)
            }
        }
    }
}
