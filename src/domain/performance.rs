//! Ledger replay and aggregate statistics.
//!
//! The ledger is the only persisted output of a run, and everything here is
//! recomputed purely from its records plus the day horizon.

use std::fmt;

use super::error::TradesimError;
use super::ledger::{LedgerRecord, TradeAction};

#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceReport {
    pub transactions: usize,
    pub purchases: usize,
    pub sales: usize,
    /// Sum of buy-record |net| — money out, fees included.
    pub amount_spent: f64,
    /// Sum of sell-record net — money in, fees already deducted.
    pub amount_earned: f64,
    /// `amount_earned - amount_spent`.
    pub net: f64,
    /// Cumulative cash flow per day over the full horizon.
    pub daily_balance: Vec<f64>,
    /// Share counts entering the final day, recovered from its records.
    pub final_holdings: Vec<u64>,
}

/// Replay `records` over a `days` horizon.
pub fn summarize(
    records: &[LedgerRecord],
    days: usize,
) -> Result<PerformanceReport, TradesimError> {
    let mut purchases = 0usize;
    let mut sales = 0usize;
    let mut amount_spent = 0.0;
    let mut amount_earned = 0.0;
    let mut daily_balance = vec![0.0; days];

    for record in records {
        if record.day >= days {
            return Err(TradesimError::LedgerDayOutOfRange {
                day: record.day,
                days,
            });
        }
        match record.action {
            TradeAction::Buy => {
                purchases += 1;
                amount_spent += record.net.abs();
            }
            TradeAction::Sell => {
                sales += 1;
                amount_earned += record.net;
            }
        }
        daily_balance[record.day] += record.net;
    }

    for day in 1..days {
        daily_balance[day] += daily_balance[day - 1];
    }

    let stocks = records.iter().map(|r| r.stock + 1).max().unwrap_or(0);
    let mut final_holdings = vec![0u64; stocks];
    if let Some(final_day) = days.checked_sub(1) {
        for record in records {
            if record.day == final_day {
                final_holdings[record.stock] = record.shares;
            }
        }
    }

    Ok(PerformanceReport {
        transactions: records.len(),
        purchases,
        sales,
        amount_spent,
        amount_earned,
        net: amount_earned - amount_spent,
        daily_balance,
        final_holdings,
    })
}

impl fmt::Display for PerformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "transactions: {} ({} buys, {} sells)",
            self.transactions, self.purchases, self.sales
        )?;
        writeln!(f, "total spent:  {:.2}", self.amount_spent)?;
        writeln!(f, "total earned: {:.2}", self.amount_earned)?;
        if self.net >= 0.0 {
            writeln!(f, "overall profit: {:.2}", self.net)?;
        } else {
            writeln!(f, "overall loss: {:.2}", self.net.abs())?;
        }
        write!(f, "holdings before close: {:?}", self.final_holdings)
    }
}
