//! Price series and price matrix representation.

use super::error::TradesimError;

/// Daily closing prices for one stock, indexed by day.
///
/// `None` marks an undefined price (bankruptcy). Undefined is absorbing: the
/// constructor forces every entry after the first `None` to `None`, so a
/// bankrupt stock can never come back into range.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    values: Vec<Option<f64>>,
}

impl PriceSeries {
    pub fn new(mut values: Vec<Option<f64>>) -> Self {
        if let Some(first_undefined) = values.iter().position(|v| v.is_none()) {
            for value in &mut values[first_undefined..] {
                *value = None;
            }
        }
        PriceSeries { values }
    }

    /// A series in which every day has a defined price.
    pub fn from_prices(prices: &[f64]) -> Self {
        PriceSeries {
            values: prices.iter().map(|&p| Some(p)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The price on `day`, or `None` if the day is undefined or out of range.
    pub fn price(&self, day: usize) -> Option<f64> {
        self.values.get(day).copied().flatten()
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }
}

/// Price series for N stocks over a shared day range. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceMatrix {
    series: Vec<PriceSeries>,
    days: usize,
}

impl PriceMatrix {
    /// Build a matrix from per-stock series. Every series must cover the same
    /// number of days.
    pub fn new(series: Vec<PriceSeries>) -> Result<Self, TradesimError> {
        let days = series.first().map_or(0, PriceSeries::len);
        if let Some(odd) = series.iter().find(|s| s.len() != days) {
            return Err(TradesimError::Dataset {
                reason: format!(
                    "price series length mismatch: expected {days} days, found {}",
                    odd.len()
                ),
            });
        }
        Ok(PriceMatrix { series, days })
    }

    pub fn stocks(&self) -> usize {
        self.series.len()
    }

    pub fn days(&self) -> usize {
        self.days
    }

    pub fn series(&self, stock: usize) -> &PriceSeries {
        &self.series[stock]
    }

    pub fn all_series(&self) -> &[PriceSeries] {
        &self.series
    }

    /// The price of `stock` on `day`, or `None` if undefined or out of range.
    pub fn price(&self, stock: usize, day: usize) -> Option<f64> {
        self.series.get(stock).and_then(|s| s.price(day))
    }

    /// One price per stock for a single day.
    pub fn day_prices(&self, day: usize) -> Vec<Option<f64>> {
        self.series.iter().map(|s| s.price(day)).collect()
    }
}
