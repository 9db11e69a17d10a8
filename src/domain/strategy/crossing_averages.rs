//! Crossing moving-averages strategy.

use super::{close_positions, open_positions, DEFAULT_AMOUNT, DEFAULT_FEES};
use crate::domain::error::TradesimError;
use crate::domain::execution;
use crate::domain::indicator::moving_average::moving_average;
use crate::domain::portfolio::Portfolio;
use crate::domain::series::PriceMatrix;
use crate::ports::config_port::ConfigPort;
use crate::ports::ledger_port::LedgerPort;

#[derive(Debug, Clone, PartialEq)]
pub struct CrossingAveragesParams {
    /// Slow moving-average window.
    pub slow: usize,
    /// Fast moving-average window.
    pub fast: usize,
    pub amount: f64,
    pub fees: f64,
}

impl Default for CrossingAveragesParams {
    fn default() -> Self {
        CrossingAveragesParams {
            slow: 200,
            fast: 50,
            amount: DEFAULT_AMOUNT,
            fees: DEFAULT_FEES,
        }
    }
}

impl CrossingAveragesParams {
    pub fn from_config(config: &dyn ConfigPort) -> Self {
        let defaults = Self::default();
        CrossingAveragesParams {
            slow: config
                .get_int("crossing_averages", "slow", defaults.slow as i64)
                .max(1) as usize,
            fast: config
                .get_int("crossing_averages", "fast", defaults.fast as i64)
                .max(1) as usize,
            amount: config.get_double("crossing_averages", "amount", defaults.amount),
            fees: config.get_double("crossing_averages", "fees", defaults.fees),
        }
    }
}

/// Trade on sign changes of (fast MA − slow MA).
///
/// A crossing from negative to positive buys; positive to negative sells.
/// Days where either average is undefined produce no signal, so buy and sell
/// can never fire for the same stock on the same day.
pub fn run_crossing_averages(
    matrix: &PriceMatrix,
    params: &CrossingAveragesParams,
    ledger: &mut dyn LedgerPort,
) -> Result<Portfolio, TradesimError> {
    let days = matrix.days();
    let mut portfolio = open_positions(matrix, params.amount, params.fees, ledger)?;

    // (fast − slow) per stock over the whole horizon.
    let mut differences: Vec<Vec<Option<f64>>> = Vec::with_capacity(matrix.stocks());
    for series in matrix.all_series() {
        let slow = moving_average(series, params.slow, &[])?;
        let fast = moving_average(series, params.fast, &[])?;
        let difference = fast
            .values
            .iter()
            .zip(&slow.values)
            .map(|(fast, slow)| match (fast, slow) {
                (Some(fast), Some(slow)) => Some(fast - slow),
                _ => None,
            })
            .collect();
        differences.push(difference);
    }

    for day in 1..days {
        let prices_today = matrix.day_prices(day);
        portfolio.write_off_undefined(&prices_today);

        if day < days - 1 {
            for (stock, price) in prices_today.iter().enumerate() {
                let Some(price) = *price else {
                    continue;
                };
                let (Some(yesterday), Some(today)) =
                    (differences[stock][day - 1], differences[stock][day])
                else {
                    continue;
                };

                if yesterday < 0.0 && today > 0.0 {
                    execution::buy(
                        day,
                        stock,
                        params.amount,
                        price,
                        params.fees,
                        &mut portfolio,
                        ledger,
                    )?;
                } else if yesterday > 0.0 && today < 0.0 {
                    execution::sell(day, stock, price, params.fees, &mut portfolio, ledger)?;
                }
            }
        } else {
            close_positions(day, &prices_today, params.fees, &mut portfolio, ledger)?;
        }
    }

    Ok(portfolio)
}
