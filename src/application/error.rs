use thiserror::Error;

use crate::domain::{InvalidDateError, InvalidFieldError, ParseCentsError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid amount '{value}' on line {line}: {source}")]
    InvalidAmount {
        line: usize,
        value: String,
        source: ParseCentsError,
    },

    #[error("Malformed line {line}: expected 5 fields, found {fields}")]
    MalformedLine { line: usize, fields: usize },

    #[error("Invalid date '{date}' in ledger: {source}")]
    InvalidDate {
        date: String,
        source: chrono::ParseError,
    },

    #[error(transparent)]
    InvalidField(#[from] InvalidFieldError),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl From<InvalidDateError> for AppError {
    fn from(err: InvalidDateError) -> Self {
        AppError::InvalidDate {
            date: err.date,
            source: err.source,
        }
    }
}
