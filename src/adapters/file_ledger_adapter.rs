//! Append-only ledger file adapter.
//!
//! One line per transaction in the fixed format
//! `type,day,stock,shares,price,net` (amounts at 2 decimals). The file is
//! opened for append and created if absent. Concurrent appends to the same
//! file are a caller responsibility.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::domain::error::TradesimError;
use crate::domain::ledger::LedgerRecord;
use crate::ports::ledger_port::LedgerPort;

pub struct FileLedger {
    path: PathBuf,
    file: File,
}

impl FileLedger {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, TradesimError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().append(true).create(true).open(&path)?;
        Ok(FileLedger { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse every record from a ledger file, in order. Blank lines are
    /// tolerated; anything else malformed is an error.
    pub fn read_records<P: AsRef<Path>>(path: P) -> Result<Vec<LedgerRecord>, TradesimError> {
        let content = fs::read_to_string(path)?;
        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::parse)
            .collect()
    }
}

impl LedgerPort for FileLedger {
    fn append(&mut self, record: &LedgerRecord) -> Result<(), TradesimError> {
        writeln!(self.file, "{}", record.to_line())?;
        Ok(())
    }
}
