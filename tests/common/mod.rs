#![allow(dead_code)]

use tradesim::domain::series::{PriceMatrix, PriceSeries};

/// Build a matrix from per-stock price rows.
pub fn make_matrix(columns: &[&[f64]]) -> PriceMatrix {
    let series = columns
        .iter()
        .map(|prices| PriceSeries::from_prices(prices))
        .collect();
    PriceMatrix::new(series).unwrap()
}

/// A series that trades at `price` until `bankrupt_from`, then goes
/// undefined for the rest of the horizon.
pub fn bankrupt_series(price: f64, days: usize, bankrupt_from: usize) -> PriceSeries {
    let values = (0..days)
        .map(|day| (day < bankrupt_from).then_some(price))
        .collect();
    PriceSeries::new(values)
}

/// A steadily rising series: `start`, `start + step`, ...
pub fn rising_series(start: f64, step: f64, days: usize) -> PriceSeries {
    let prices: Vec<f64> = (0..days).map(|day| start + step * day as f64).collect();
    PriceSeries::from_prices(&prices)
}
