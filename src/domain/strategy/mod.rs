//! Trading strategies.
//!
//! All three runners share one skeleton: open the day-0 portfolio with an
//! equal allocation per stock, walk the horizon, write off bankrupt positions
//! before any decision is evaluated, and liquidate every position still
//! priced on the run's final visited day. A stock whose price has gone
//! undefined is permanently out of the game from that day on.

pub mod crossing_averages;
pub mod momentum;
pub mod random;

pub use crossing_averages::{run_crossing_averages, CrossingAveragesParams};
pub use momentum::{run_momentum, MomentumParams};
pub use random::{run_random, RandomParams};

use crate::domain::error::TradesimError;
use crate::domain::execution;
use crate::domain::portfolio::Portfolio;
use crate::domain::series::PriceMatrix;
use crate::ports::ledger_port::LedgerPort;

/// Default capital spent per purchase.
pub const DEFAULT_AMOUNT: f64 = 5000.0;

/// Default flat fee per transaction.
pub const DEFAULT_FEES: f64 = 20.0;

/// Day-0 portfolio with `amount` allocated to every stock.
fn open_positions(
    matrix: &PriceMatrix,
    amount: f64,
    fees: f64,
    ledger: &mut dyn LedgerPort,
) -> Result<Portfolio, TradesimError> {
    let allocations = vec![amount; matrix.stocks()];
    execution::create_portfolio(&allocations, &matrix.day_prices(0), fees, ledger)
}

/// Liquidate every position whose price today is defined.
fn close_positions(
    day: usize,
    prices_today: &[Option<f64>],
    fees: f64,
    portfolio: &mut Portfolio,
    ledger: &mut dyn LedgerPort,
) -> Result<(), TradesimError> {
    for (stock, price) in prices_today.iter().enumerate() {
        if let Some(price) = *price {
            execution::sell(day, stock, price, fees, portfolio, ledger)?;
        }
    }
    Ok(())
}
