use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::domain::Transaction;

/// Repository for the flat ledger file: one transaction per line,
/// `date|time|description|vendor| $amount`.
///
/// The file is only ever read whole or appended to; existing lines are never
/// rewritten.
#[derive(Debug, Clone)]
pub struct Repository {
    path: PathBuf,
}

impl Repository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every line of the ledger file.
    /// Returns `None` when the file does not exist yet.
    pub fn read_lines(&self) -> Result<Option<Vec<String>>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to open ledger file {}", self.path.display())
                });
            }
        };

        let lines = BufReader::new(file)
            .lines()
            .collect::<std::io::Result<Vec<String>>>()
            .with_context(|| format!("Failed to read ledger file {}", self.path.display()))?;
        Ok(Some(lines))
    }

    /// Append one transaction line, creating the file (and its parent
    /// directory) on first use. The data is synced to disk before returning.
    pub fn append(&self, transaction: &Transaction) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create directory {}", parent.display())
                })?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open ledger file {}", self.path.display()))?;

        writeln!(file, "{}", transaction)
            .with_context(|| format!("Failed to append to {}", self.path.display()))?;
        file.flush()
            .with_context(|| format!("Failed to flush {}", self.path.display()))?;
        file.sync_all()
            .with_context(|| format!("Failed to sync {}", self.path.display()))?;
        Ok(())
    }
}
