//! Transaction ledger port trait.

use crate::domain::error::TradesimError;
use crate::domain::ledger::LedgerRecord;

/// Append-only sink for executed transactions. The ledger is the only
/// persisted entity in a simulation run; portfolio state is reconstructable
/// by replaying it.
pub trait LedgerPort {
    fn append(&mut self, record: &LedgerRecord) -> Result<(), TradesimError>;
}
