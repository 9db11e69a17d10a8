//! Momentum strategy driven by an oscillator.

use super::{close_positions, open_positions, DEFAULT_AMOUNT, DEFAULT_FEES};
use crate::domain::error::TradesimError;
use crate::domain::execution;
use crate::domain::indicator::oscillator::{oscillator, OscillatorKind};
use crate::domain::indicator::IndicatorSeries;
use crate::domain::portfolio::Portfolio;
use crate::domain::series::PriceMatrix;
use crate::ports::config_port::ConfigPort;
use crate::ports::ledger_port::LedgerPort;

#[derive(Debug, Clone, PartialEq)]
pub struct MomentumParams {
    pub oscillator: OscillatorKind,
    /// Oscillator window in days.
    pub window: usize,
    /// Buy when the oscillator drops below this level.
    pub low_threshold: f64,
    /// Sell when the oscillator rises above this level.
    pub high_threshold: f64,
    /// Minimum day gap after a trade before the next buy of the same stock.
    pub cool_down: usize,
    pub amount: f64,
    pub fees: f64,
}

impl Default for MomentumParams {
    fn default() -> Self {
        MomentumParams {
            oscillator: OscillatorKind::Stochastic,
            window: 7,
            low_threshold: 0.25,
            high_threshold: 0.75,
            cool_down: 7,
            amount: DEFAULT_AMOUNT,
            fees: DEFAULT_FEES,
        }
    }
}

impl MomentumParams {
    pub fn from_config(config: &dyn ConfigPort) -> Self {
        let defaults = Self::default();
        let oscillator = config
            .get_string("momentum", "oscillator")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.oscillator);
        MomentumParams {
            oscillator,
            window: config
                .get_int("momentum", "window", defaults.window as i64)
                .max(1) as usize,
            low_threshold: config.get_double("momentum", "low_threshold", defaults.low_threshold),
            high_threshold: config.get_double(
                "momentum",
                "high_threshold",
                defaults.high_threshold,
            ),
            cool_down: config
                .get_int("momentum", "cool_down", defaults.cool_down as i64)
                .max(0) as usize,
            amount: config.get_double("momentum", "amount", defaults.amount),
            fees: config.get_double("momentum", "fees", defaults.fees),
        }
    }
}

/// Buy oversold, sell overbought.
///
/// A stock is bought when its oscillator is below the low threshold and it
/// has either never traded or last traded more than `cool_down` days ago; it
/// is sold (fully) when the oscillator is above the high threshold, with no
/// cool-down on sells. Both actions stamp the stock's last-trade day. Days
/// with an undefined oscillator produce no action.
pub fn run_momentum(
    matrix: &PriceMatrix,
    params: &MomentumParams,
    ledger: &mut dyn LedgerPort,
) -> Result<Portfolio, TradesimError> {
    let days = matrix.days();
    let mut portfolio = open_positions(matrix, params.amount, params.fees, ledger)?;

    let oscillators: Vec<IndicatorSeries> = matrix
        .all_series()
        .iter()
        .map(|series| oscillator(series, params.window, params.oscillator))
        .collect();

    let mut last_trade: Vec<Option<usize>> = vec![None; matrix.stocks()];

    for day in 1..days {
        let prices_today = matrix.day_prices(day);
        portfolio.write_off_undefined(&prices_today);

        if day < days - 1 {
            for (stock, price) in prices_today.iter().enumerate() {
                let Some(price) = *price else {
                    continue;
                };
                let Some(level) = oscillators[stock].value(day) else {
                    continue;
                };

                let off_cool_down =
                    last_trade[stock].is_none_or(|traded| day - traded > params.cool_down);

                if level < params.low_threshold && off_cool_down {
                    execution::buy(
                        day,
                        stock,
                        params.amount,
                        price,
                        params.fees,
                        &mut portfolio,
                        ledger,
                    )?;
                    last_trade[stock] = Some(day);
                } else if level > params.high_threshold {
                    execution::sell(day, stock, price, params.fees, &mut portfolio, ledger)?;
                    last_trade[stock] = Some(day);
                }
            }
        } else {
            close_positions(day, &prices_today, params.fees, &mut portfolio, ledger)?;
        }
    }

    Ok(portfolio)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory_ledger_adapter::MemoryLedger;
    use crate::domain::ledger::TradeAction;
    use crate::domain::series::PriceSeries;

    fn stoch2_params(cool_down: usize) -> MomentumParams {
        // A 2-day stochastic window is 1 on a rise and 0 on a fall, which
        // makes the signal sequence fully predictable.
        MomentumParams {
            oscillator: OscillatorKind::Stochastic,
            window: 2,
            cool_down,
            ..MomentumParams::default()
        }
    }

    #[test]
    fn buys_oversold_then_sells_overbought() {
        // Falls on days 1-2 (oscillator 0), rises on day 3 (oscillator 1).
        let matrix = PriceMatrix::new(vec![PriceSeries::from_prices(&[
            100.0, 90.0, 80.0, 120.0, 121.0,
        ])])
        .unwrap();

        let mut ledger = MemoryLedger::new();
        run_momentum(&matrix, &stoch2_params(7), &mut ledger).unwrap();

        let trades: Vec<(usize, TradeAction)> = ledger
            .records()
            .iter()
            .map(|r| (r.day, r.action))
            .collect();

        // Day 0 open; day 1 oversold buy; day 2 blocked by cool-down;
        // day 3 overbought sell; day 4 close finds nothing to sell.
        assert_eq!(
            trades,
            vec![
                (0, TradeAction::Buy),
                (1, TradeAction::Buy),
                (3, TradeAction::Sell),
            ]
        );
    }

    #[test]
    fn cool_down_zero_allows_consecutive_buys() {
        let matrix = PriceMatrix::new(vec![PriceSeries::from_prices(&[
            100.0, 90.0, 80.0, 120.0, 121.0,
        ])])
        .unwrap();

        let mut ledger = MemoryLedger::new();
        run_momentum(&matrix, &stoch2_params(0), &mut ledger).unwrap();

        let buy_days: Vec<usize> = ledger
            .records()
            .iter()
            .filter(|r| r.action == TradeAction::Buy)
            .map(|r| r.day)
            .collect();
        assert_eq!(buy_days, vec![0, 1, 2]);
    }

    #[test]
    fn sells_have_no_cool_down() {
        // Rise, fall, rise again: sell on day 1, buy on day 2, sell on day 3.
        let matrix = PriceMatrix::new(vec![PriceSeries::from_prices(&[
            100.0, 120.0, 90.0, 130.0, 131.0,
        ])])
        .unwrap();

        let mut ledger = MemoryLedger::new();
        run_momentum(&matrix, &stoch2_params(0), &mut ledger).unwrap();

        let trades: Vec<(usize, TradeAction)> = ledger
            .records()
            .iter()
            .map(|r| (r.day, r.action))
            .collect();
        assert_eq!(
            trades,
            vec![
                (0, TradeAction::Buy),
                (1, TradeAction::Sell),
                (2, TradeAction::Buy),
                (3, TradeAction::Sell),
            ]
        );
    }

    #[test]
    fn undefined_oscillator_produces_no_action() {
        // A flat series has an undefined stochastic level every day.
        let matrix =
            PriceMatrix::new(vec![PriceSeries::from_prices(&vec![100.0; 10])]).unwrap();

        let mut ledger = MemoryLedger::new();
        let portfolio = run_momentum(&matrix, &stoch2_params(0), &mut ledger).unwrap();

        assert!(portfolio.holdings().iter().all(|&h| h == 0));
        // Only the day-0 open and the final-day close.
        assert_eq!(ledger.records().len(), 2);
        assert_eq!(ledger.records()[1].day, 9);
        assert_eq!(ledger.records()[1].action, TradeAction::Sell);
    }

    #[test]
    fn bankrupt_stock_is_dropped() {
        let mut values: Vec<Option<f64>> = (0..12)
            .map(|d| Some(100.0 - d as f64 * 5.0))
            .collect();
        for value in values.iter_mut().skip(6) {
            *value = None;
        }
        let matrix = PriceMatrix::new(vec![
            PriceSeries::from_prices(&vec![100.0; 12]),
            PriceSeries::new(values),
        ])
        .unwrap();

        let mut ledger = MemoryLedger::new();
        let portfolio = run_momentum(&matrix, &stoch2_params(0), &mut ledger).unwrap();

        assert_eq!(portfolio.shares(1), 0);
        for record in ledger.records() {
            assert!(record.stock != 1 || record.day < 6);
        }
    }

    #[test]
    fn params_from_config_pick_the_oscillator() {
        use crate::adapters::file_config_adapter::FileConfigAdapter;

        let adapter = FileConfigAdapter::from_string(
            "[momentum]\noscillator = rsi\nwindow = 14\ncool_down = 3\n",
        )
        .unwrap();
        let params = MomentumParams::from_config(&adapter);
        assert_eq!(params.oscillator, OscillatorKind::Rsi);
        assert_eq!(params.window, 14);
        assert_eq!(params.cool_down, 3);
        assert!((params.low_threshold - 0.25).abs() < f64::EPSILON);
    }
}
