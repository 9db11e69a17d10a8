//! Trade execution: buy / sell against a portfolio, logged to a ledger.

use super::error::TradesimError;
use super::ledger::{LedgerRecord, TradeAction};
use super::portfolio::Portfolio;
use crate::ports::ledger_port::LedgerPort;

/// Buy as many whole shares as `available_capital` covers after fees.
///
/// The share count is `floor((available_capital - fees) / price)`, clamped at
/// zero. A zero-share buy still logs a record at that price; the ledger keeps
/// the attempt observable.
pub fn buy(
    day: usize,
    stock: usize,
    available_capital: f64,
    price: f64,
    fees: f64,
    portfolio: &mut Portfolio,
    ledger: &mut dyn LedgerPort,
) -> Result<u64, TradesimError> {
    let shares = (((available_capital - fees) / price).floor()).max(0.0) as u64;
    ledger.append(&LedgerRecord::new(
        TradeAction::Buy,
        day,
        stock,
        shares,
        price,
        fees,
    ))?;
    portfolio.add_shares(stock, shares);
    Ok(shares)
}

/// Sell the entire held quantity of `stock`.
///
/// Holding zero shares is a no-op and writes nothing; partial sells are not
/// supported.
pub fn sell(
    day: usize,
    stock: usize,
    price: f64,
    fees: f64,
    portfolio: &mut Portfolio,
    ledger: &mut dyn LedgerPort,
) -> Result<u64, TradesimError> {
    let shares = portfolio.shares(stock);
    if shares == 0 {
        return Ok(0);
    }
    ledger.append(&LedgerRecord::new(
        TradeAction::Sell,
        day,
        stock,
        shares,
        price,
        fees,
    ))?;
    portfolio.clear(stock);
    Ok(shares)
}

/// Build the day-0 portfolio: one buy per stock with its allocated capital.
///
/// A stock whose day-0 price is undefined is skipped: its holding stays zero
/// and nothing is logged.
pub fn create_portfolio(
    allocations: &[f64],
    prices_day0: &[Option<f64>],
    fees: f64,
    ledger: &mut dyn LedgerPort,
) -> Result<Portfolio, TradesimError> {
    if allocations.len() != prices_day0.len() {
        return Err(TradesimError::AllocationCount {
            allocations: allocations.len(),
            stocks: prices_day0.len(),
        });
    }

    let mut portfolio = Portfolio::new(prices_day0.len());
    for (stock, price) in prices_day0.iter().enumerate() {
        let Some(price) = *price else {
            continue;
        };
        buy(
            0,
            stock,
            allocations[stock],
            price,
            fees,
            &mut portfolio,
            ledger,
        )?;
    }
    Ok(portfolio)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory_ledger_adapter::MemoryLedger;
    use crate::domain::ledger::TradeAction;

    #[test]
    fn buy_floors_whole_shares_after_fees() {
        let mut portfolio = Portfolio::new(1);
        let mut ledger = MemoryLedger::new();

        let shares = buy(21, 0, 1000.0, 100.0, 50.0, &mut portfolio, &mut ledger).unwrap();

        assert_eq!(shares, 9);
        assert_eq!(portfolio.shares(0), 9);
        assert_eq!(ledger.records().len(), 1);
        assert_eq!(ledger.records()[0].to_line(), "buy,21,0,9,100.00,-950.00");
    }

    #[test]
    fn zero_share_buy_still_logs() {
        let mut portfolio = Portfolio::new(1);
        let mut ledger = MemoryLedger::new();

        let shares = buy(3, 0, 60.0, 100.0, 50.0, &mut portfolio, &mut ledger).unwrap();

        assert_eq!(shares, 0);
        assert_eq!(portfolio.shares(0), 0);
        assert_eq!(ledger.records().len(), 1);
        assert_eq!(ledger.records()[0].shares, 0);
    }

    #[test]
    fn buy_never_goes_negative() {
        let mut portfolio = Portfolio::new(1);
        let mut ledger = MemoryLedger::new();

        // Fees exceed capital at a cheap price; floor would be negative.
        let shares = buy(3, 0, 40.0, 0.01, 50.0, &mut portfolio, &mut ledger).unwrap();
        assert_eq!(shares, 0);
    }

    #[test]
    fn sell_with_no_holding_writes_nothing() {
        let mut portfolio = Portfolio::new(1);
        let mut ledger = MemoryLedger::new();

        let shares = sell(8, 0, 100.0, 20.0, &mut portfolio, &mut ledger).unwrap();

        assert_eq!(shares, 0);
        assert!(ledger.records().is_empty());
    }

    #[test]
    fn sell_liquidates_the_entire_holding() {
        let mut portfolio = Portfolio::new(1);
        let mut ledger = MemoryLedger::new();
        portfolio.add_shares(0, 25);

        let shares = sell(8, 0, 110.0, 20.0, &mut portfolio, &mut ledger).unwrap();

        assert_eq!(shares, 25);
        assert_eq!(portfolio.shares(0), 0);
        assert_eq!(ledger.records().len(), 1);

        let record = &ledger.records()[0];
        assert_eq!(record.action, TradeAction::Sell);
        assert_eq!(record.shares, 25);
        assert!((record.net - (25.0 * 110.0 - 20.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn create_portfolio_buys_each_stock_at_day_zero() {
        let mut ledger = MemoryLedger::new();
        let portfolio = create_portfolio(
            &[1000.0, 1000.0],
            &[Some(100.0), Some(45.0)],
            40.0,
            &mut ledger,
        )
        .unwrap();

        assert_eq!(portfolio.holdings(), &[9, 21]);
        assert_eq!(ledger.records().len(), 2);
        assert!(ledger.records().iter().all(|r| r.day == 0));
    }

    #[test]
    fn create_portfolio_skips_undefined_day_zero_prices() {
        let mut ledger = MemoryLedger::new();
        let portfolio =
            create_portfolio(&[1000.0, 1000.0], &[Some(100.0), None], 40.0, &mut ledger).unwrap();

        assert_eq!(portfolio.holdings(), &[9, 0]);
        assert_eq!(ledger.records().len(), 1);
    }

    #[test]
    fn create_portfolio_rejects_mismatched_allocations() {
        let mut ledger = MemoryLedger::new();
        let result = create_portfolio(&[1000.0], &[Some(100.0), Some(45.0)], 40.0, &mut ledger);
        assert!(matches!(result, Err(TradesimError::AllocationCount { .. })));
    }
}
