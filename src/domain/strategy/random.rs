//! Random decision strategy.

use rand::Rng;

use super::{close_positions, open_positions, DEFAULT_AMOUNT, DEFAULT_FEES};
use crate::domain::error::TradesimError;
use crate::domain::execution;
use crate::domain::portfolio::Portfolio;
use crate::domain::series::PriceMatrix;
use crate::ports::config_port::ConfigPort;
use crate::ports::ledger_port::LedgerPort;

#[derive(Debug, Clone, PartialEq)]
pub struct RandomParams {
    /// Days between decision rounds.
    pub period: usize,
    /// Capital spent on each purchase, fees included.
    pub amount: f64,
    pub fees: f64,
}

impl Default for RandomParams {
    fn default() -> Self {
        RandomParams {
            period: 7,
            amount: DEFAULT_AMOUNT,
            fees: DEFAULT_FEES,
        }
    }
}

impl RandomParams {
    pub fn from_config(config: &dyn ConfigPort) -> Self {
        let defaults = Self::default();
        RandomParams {
            period: config
                .get_int("random", "period", defaults.period as i64)
                .max(1) as usize,
            amount: config.get_double("random", "amount", defaults.amount),
            fees: config.get_double("random", "fees", defaults.fees),
        }
    }
}

/// Every `period` days, draw uniformly from {buy, hold, sell} for each
/// tradable stock independently. The last visited day of the stride sells
/// every remaining position instead.
pub fn run_random<R: Rng>(
    matrix: &PriceMatrix,
    params: &RandomParams,
    rng: &mut R,
    ledger: &mut dyn LedgerPort,
) -> Result<Portfolio, TradesimError> {
    let days = matrix.days();
    let period = params.period.max(1);
    let mut portfolio = open_positions(matrix, params.amount, params.fees, ledger)?;

    let mut day = 1;
    while day < days {
        let prices_today = matrix.day_prices(day);
        portfolio.write_off_undefined(&prices_today);

        if day + period < days {
            for (stock, price) in prices_today.iter().enumerate() {
                let Some(price) = *price else {
                    continue;
                };
                match rng.gen_range(0..3u8) {
                    0 => {
                        execution::buy(
                            day,
                            stock,
                            params.amount,
                            price,
                            params.fees,
                            &mut portfolio,
                            ledger,
                        )?;
                    }
                    1 => {}
                    _ => {
                        execution::sell(day, stock, price, params.fees, &mut portfolio, ledger)?;
                    }
                }
            }
        } else {
            close_positions(day, &prices_today, params.fees, &mut portfolio, ledger)?;
        }

        day += period;
    }

    Ok(portfolio)
}
