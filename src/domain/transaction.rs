use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::{format_cents, parse_cents, Cents, ParseCentsError};

/// Field separator of the ledger file.
pub const FIELD_SEPARATOR: char = '|';

/// Number of fields in a well-formed ledger line.
pub const FIELD_COUNT: usize = 5;

/// Characters a stored text field must not contain: any of them would split
/// the record across fields or lines.
pub const RESERVED_CHARS: [char; 3] = [FIELD_SEPARATOR, '\n', '\r'];

/// Date layout used for stored dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Time layout used for stored times.
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// A single monetary event: positive amounts are deposits, negative amounts payments.
/// Transactions are immutable once created; the ledger never edits or deletes them.
///
/// Date and time are kept as the text that was recorded. They are only parsed
/// when a report needs them, see [`Transaction::parsed_date`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    date: String,
    time: String,
    description: String,
    vendor: String,
    amount: Cents,
}

impl Transaction {
    pub fn new(
        date: impl Into<String>,
        time: impl Into<String>,
        description: impl Into<String>,
        vendor: impl Into<String>,
        amount: Cents,
    ) -> Self {
        Self {
            date: date.into(),
            time: time.into(),
            description: description.into(),
            vendor: vendor.into(),
            amount,
        }
    }

    /// Create a deposit stamped with the given local date-time.
    pub fn deposit(
        now: NaiveDateTime,
        description: impl Into<String>,
        vendor: impl Into<String>,
        amount: Cents,
    ) -> Self {
        Self::new(
            now.format(DATE_FORMAT).to_string(),
            now.format(TIME_FORMAT).to_string(),
            description,
            vendor,
            amount,
        )
    }

    /// Create a payment stamped with the given local date-time.
    /// The stored amount is always negative, whatever sign was entered.
    pub fn payment(
        now: NaiveDateTime,
        description: impl Into<String>,
        vendor: impl Into<String>,
        amount: Cents,
    ) -> Self {
        Self::deposit(now, description, vendor, -amount.abs())
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn time(&self) -> &str {
        &self.time
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn vendor(&self) -> &str {
        &self.vendor
    }

    pub fn amount(&self) -> Cents {
        self.amount
    }

    pub fn is_deposit(&self) -> bool {
        self.amount > 0
    }

    pub fn is_payment(&self) -> bool {
        self.amount < 0
    }

    /// Check that every text field can be stored on a single ledger line.
    pub fn validate(&self) -> Result<(), InvalidFieldError> {
        check_text_field("Date", &self.date)?;
        check_text_field("Time", &self.time)?;
        check_text_field("Description", &self.description)?;
        check_text_field("Vendor", &self.vendor)
    }

    /// Parse the stored date as an ISO 8601 calendar date.
    pub fn parsed_date(&self) -> Result<NaiveDate, chrono::ParseError> {
        NaiveDate::parse_from_str(&self.date, DATE_FORMAT)
    }

    /// Parse one line of the ledger file.
    ///
    /// The amount may carry `$` and `,` decoration (`" $-1,042.50"`) or be a
    /// plain signed decimal. Trailing empty fields are not counted, so a line
    /// with a blank amount is malformed rather than a bad amount.
    pub fn from_line(line: &str) -> Result<Self, ParseLineError> {
        let mut fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
        while fields.len() > 1 && fields.last().is_some_and(|f| f.is_empty()) {
            fields.pop();
        }
        if fields.len() != FIELD_COUNT {
            return Err(ParseLineError::FieldCount(fields.len()));
        }

        let raw_amount = fields[4];
        let cleaned: String = raw_amount
            .chars()
            .filter(|c| *c != '$' && *c != ',')
            .collect();
        let amount = parse_cents(&cleaned).map_err(|source| ParseLineError::Amount {
            value: raw_amount.to_string(),
            source,
        })?;

        Ok(Self::new(fields[0], fields[1], fields[2], fields[3], amount))
    }
}

/// The ledger file line: `date|time|description|vendor| $amount`.
impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{date}{sep}{time}{sep}{description}{sep}{vendor}{sep} ${amount}",
            date = self.date,
            time = self.time,
            description = self.description,
            vendor = self.vendor,
            amount = format_cents(self.amount),
            sep = FIELD_SEPARATOR,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseLineError {
    /// The line did not split into exactly five fields.
    FieldCount(usize),
    /// The amount field is not a number once `$` and `,` are stripped.
    Amount {
        value: String,
        source: ParseCentsError,
    },
}

impl fmt::Display for ParseLineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseLineError::FieldCount(count) => {
                write!(f, "expected {} fields, found {}", FIELD_COUNT, count)
            }
            ParseLineError::Amount { value, source } => {
                write!(f, "invalid amount '{}': {}", value.trim(), source)
            }
        }
    }
}

impl std::error::Error for ParseLineError {}

/// Reject text that would break the one-record-per-line file format.
pub fn check_text_field(field: &'static str, value: &str) -> Result<(), InvalidFieldError> {
    if value.contains(RESERVED_CHARS) {
        return Err(InvalidFieldError {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// A text field containing the field separator or a line break.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidFieldError {
    pub field: &'static str,
    pub value: String,
}

impl fmt::Display for InvalidFieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} cannot contain '{}' or line breaks",
            self.field, FIELD_SEPARATOR
        )
    }
}

impl std::error::Error for InvalidFieldError {}
