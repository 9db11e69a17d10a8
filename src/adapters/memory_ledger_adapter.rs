//! In-memory ledger adapter for tests and dry runs.

use crate::domain::error::TradesimError;
use crate::domain::ledger::LedgerRecord;
use crate::ports::ledger_port::LedgerPort;

#[derive(Debug, Default)]
pub struct MemoryLedger {
    records: Vec<LedgerRecord>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[LedgerRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<LedgerRecord> {
        self.records
    }
}

impl LedgerPort for MemoryLedger {
    fn append(&mut self, record: &LedgerRecord) -> Result<(), TradesimError> {
        self.records.push(record.clone());
        Ok(())
    }
}
