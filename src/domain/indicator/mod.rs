//! Technical indicator series.
//!
//! - `IndicatorType`: indicator identity + window (serves as a map key)
//! - `IndicatorSeries`: values aligned 1:1 with the source price series
//!
//! Every indicator uses an edge-adjusted window: day i is computed over the
//! last `min(i+1, n)` days, so the early series degrades to shorter windows
//! instead of going invalid. An entry is `None` where the computation is
//! undefined (flat stochastic window, degenerate RSI, undefined price in
//! range).

pub mod moving_average;
pub mod oscillator;

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Wma(usize),
    Stochastic(usize),
    Rsi(usize),
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(n) => write!(f, "SMA({})", n),
            IndicatorType::Wma(n) => write!(f, "WMA({})", n),
            IndicatorType::Stochastic(n) => write!(f, "STOCHASTIC({})", n),
            IndicatorType::Rsi(n) => write!(f, "RSI({})", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<Option<f64>>,
}

impl IndicatorSeries {
    /// The value on `day`, or `None` if undefined or out of range.
    pub fn value(&self, day: usize) -> Option<f64> {
        self.values.get(day).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicator_type_display() {
        assert_eq!(IndicatorType::Sma(200).to_string(), "SMA(200)");
        assert_eq!(IndicatorType::Wma(7).to_string(), "WMA(7)");
        assert_eq!(IndicatorType::Stochastic(7).to_string(), "STOCHASTIC(7)");
        assert_eq!(IndicatorType::Rsi(14).to_string(), "RSI(14)");
    }

    #[test]
    fn indicator_type_hash_eq() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert(IndicatorType::Sma(200), "slow");
        map.insert(IndicatorType::Sma(50), "fast");

        assert_eq!(map.get(&IndicatorType::Sma(200)), Some(&"slow"));
        assert_eq!(map.get(&IndicatorType::Sma(50)), Some(&"fast"));
        assert_eq!(map.get(&IndicatorType::Rsi(50)), None);
    }

    #[test]
    fn value_accessor_flattens() {
        let series = IndicatorSeries {
            indicator_type: IndicatorType::Sma(2),
            values: vec![Some(1.0), None],
        };
        assert_eq!(series.value(0), Some(1.0));
        assert_eq!(series.value(1), None);
        assert_eq!(series.value(2), None);
    }
}
