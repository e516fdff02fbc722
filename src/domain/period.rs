use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Calendar windows used by the date-based reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportPeriod {
    /// Same month and year as today.
    MonthToDate,
    /// The calendar month before today's month.
    PreviousMonth,
    /// Same year as today.
    YearToDate,
}

impl ReportPeriod {
    /// Whether `date` falls in this period, relative to `today`.
    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        match self {
            ReportPeriod::MonthToDate => same_month(date, today),
            ReportPeriod::PreviousMonth => same_month(date, previous_month_of(today)),
            ReportPeriod::YearToDate => date.year() == today.year(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportPeriod::MonthToDate => "month-to-date",
            ReportPeriod::PreviousMonth => "previous-month",
            ReportPeriod::YearToDate => "year-to-date",
        }
    }

    /// Human-readable title for report headers.
    pub fn title(&self) -> &'static str {
        match self {
            ReportPeriod::MonthToDate => "Month-to-Date",
            ReportPeriod::PreviousMonth => "Previous Month",
            ReportPeriod::YearToDate => "Year-to-Date",
        }
    }
}

impl std::fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

/// First day of the month before `today`'s month.
fn previous_month_of(today: NaiveDate) -> NaiveDate {
    let first = today.with_day(1).unwrap_or(today);
    first.checked_sub_months(Months::new(1)).unwrap_or(first)
}
