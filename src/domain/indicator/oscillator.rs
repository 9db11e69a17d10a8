//! Stochastic and RSI oscillators.

use std::str::FromStr;

use super::{IndicatorSeries, IndicatorType};
use crate::domain::series::PriceSeries;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OscillatorKind {
    Stochastic,
    Rsi,
}

impl FromStr for OscillatorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stochastic" => Ok(OscillatorKind::Stochastic),
            "rsi" => Ok(OscillatorKind::Rsi),
            other => Err(format!(
                "unknown oscillator '{other}', expected 'stochastic' or 'rsi'"
            )),
        }
    }
}

/// n-day oscillator level of a price series with an edge-adjusted window.
///
/// Stochastic: `(price - windowMin) / (windowMax - windowMin)`, undefined on
/// a flat window or when the window touches an undefined price.
///
/// RSI: day-over-day differences are taken over the whole series first, with
/// day 0's "difference" being the day-0 price itself. Over the windowed
/// differences, RS = mean(positives) / mean(|negatives|) and RSI = RS/(1+RS);
/// a window with only positive differences is exactly 1, only negative
/// exactly 0, neither (all zero) undefined. Differences with an undefined
/// operand belong to neither set.
pub fn oscillator(series: &PriceSeries, n: usize, kind: OscillatorKind) -> IndicatorSeries {
    let indicator_type = match kind {
        OscillatorKind::Stochastic => IndicatorType::Stochastic(n),
        OscillatorKind::Rsi => IndicatorType::Rsi(n),
    };

    let m = series.len();
    if n == 0 {
        return IndicatorSeries {
            indicator_type,
            values: vec![None; m],
        };
    }

    let effective_n = n.min(m);
    let values = match kind {
        OscillatorKind::Stochastic => stochastic_values(series, effective_n),
        OscillatorKind::Rsi => rsi_values(series, effective_n),
    };

    IndicatorSeries {
        indicator_type,
        values,
    }
}

fn stochastic_values(series: &PriceSeries, n: usize) -> Vec<Option<f64>> {
    let m = series.len();
    let mut values = Vec::with_capacity(m);

    for i in 0..m {
        let window_len = (i + 1).min(n);
        let window = &series.values()[i + 1 - window_len..=i];
        values.push(stochastic_level(window));
    }
    values
}

fn stochastic_level(window: &[Option<f64>]) -> Option<f64> {
    let mut lowest = f64::INFINITY;
    let mut highest = f64::NEG_INFINITY;
    for value in window {
        let price = (*value)?;
        lowest = lowest.min(price);
        highest = highest.max(price);
    }

    let spread = highest - lowest;
    if spread == 0.0 {
        return None;
    }
    let today = window[window.len() - 1]?;
    Some((today - lowest) / spread)
}

fn rsi_values(series: &PriceSeries, n: usize) -> Vec<Option<f64>> {
    let m = series.len();

    // Differences over the whole series; day 0's entry is the raw price.
    let mut differences: Vec<Option<f64>> = Vec::with_capacity(m);
    for (i, value) in series.values().iter().enumerate() {
        let difference = if i == 0 {
            *value
        } else {
            match (*value, series.values()[i - 1]) {
                (Some(today), Some(yesterday)) => Some(today - yesterday),
                _ => None,
            }
        };
        differences.push(difference);
    }

    let mut values = Vec::with_capacity(m);
    for i in 0..m {
        let window_len = (i + 1).min(n);
        let window = &differences[i + 1 - window_len..=i];
        values.push(rsi_level(window));
    }
    values
}

fn rsi_level(window: &[Option<f64>]) -> Option<f64> {
    let mut gain_sum = 0.0;
    let mut gain_count = 0usize;
    let mut loss_sum = 0.0;
    let mut loss_count = 0usize;

    for difference in window.iter().flatten() {
        if *difference > 0.0 {
            gain_sum += difference;
            gain_count += 1;
        } else if *difference < 0.0 {
            loss_sum += difference.abs();
            loss_count += 1;
        }
    }

    match (gain_count, loss_count) {
        (0, 0) => None,
        (_, 0) => Some(1.0),
        (0, _) => Some(0.0),
        _ => {
            let rs = (gain_sum / gain_count as f64) / (loss_sum / loss_count as f64);
            Some(rs / (1.0 + rs))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stochastic_known_values() {
        let series = PriceSeries::from_prices(&[3.0, 1.0, 2.0]);
        let osc = oscillator(&series, 3, OscillatorKind::Stochastic);

        assert_eq!(osc.indicator_type, IndicatorType::Stochastic(3));
        // Day 0's window is a single price: flat, undefined.
        assert_eq!(osc.value(0), None);
        assert_eq!(osc.value(1), Some(0.0));
        assert_eq!(osc.value(2), Some(0.5));
    }

    #[test]
    fn stochastic_window_slides() {
        let series = PriceSeries::from_prices(&[10.0, 1.0, 2.0, 3.0]);
        let osc = oscillator(&series, 2, OscillatorKind::Stochastic);

        // Day 3's window is [2, 3]: (3-2)/(3-2).
        assert_eq!(osc.value(3), Some(1.0));
    }

    #[test]
    fn stochastic_flat_window_is_undefined() {
        let series = PriceSeries::from_prices(&[5.0, 5.0, 5.0]);
        let osc = oscillator(&series, 2, OscillatorKind::Stochastic);
        assert_eq!(osc.values, vec![None, None, None]);
    }

    #[test]
    fn stochastic_undefined_price_in_window() {
        let series = PriceSeries::new(vec![Some(1.0), Some(2.0), None]);
        let osc = oscillator(&series, 2, OscillatorKind::Stochastic);
        assert_eq!(osc.value(1), Some(1.0));
        assert_eq!(osc.value(2), None);
    }

    #[test]
    fn rsi_all_gains_is_one() {
        let series = PriceSeries::from_prices(&[100.0, 101.0, 102.0, 103.0]);
        let osc = oscillator(&series, 3, OscillatorKind::Rsi);
        // Day 0's "difference" is the price itself, also a gain.
        for day in 0..4 {
            assert_eq!(osc.value(day), Some(1.0), "day {day}");
        }
    }

    #[test]
    fn rsi_all_losses_is_zero() {
        let series = PriceSeries::from_prices(&[100.0, 99.0, 98.0, 97.0]);
        // Window of 2 keeps day 0's positive pseudo-difference out from day 2.
        let osc = oscillator(&series, 2, OscillatorKind::Rsi);
        assert_eq!(osc.value(2), Some(0.0));
        assert_eq!(osc.value(3), Some(0.0));
    }

    #[test]
    fn rsi_all_zero_differences_is_undefined() {
        let series = PriceSeries::from_prices(&[5.0, 5.0, 5.0]);
        let osc = oscillator(&series, 2, OscillatorKind::Rsi);
        // Day 1's window still holds day 0's positive pseudo-difference.
        assert_eq!(osc.value(1), Some(1.0));
        assert_eq!(osc.value(2), None);
    }

    #[test]
    fn rsi_known_mixed_window() {
        let series = PriceSeries::from_prices(&[100.0, 102.0, 101.0]);
        let osc = oscillator(&series, 3, OscillatorKind::Rsi);

        // Window differences: [100, 2, -1]; RS = mean(100,2)/1 = 51.
        let expected = 51.0 / 52.0;
        assert!((osc.value(2).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn rsi_ignores_undefined_differences() {
        let series = PriceSeries::new(vec![Some(100.0), Some(99.0), None]);
        let osc = oscillator(&series, 3, OscillatorKind::Rsi);

        // Day 2's window: [100, -1, undefined]; the undefined entry joins
        // neither set, leaving one gain and one loss.
        let rs = 100.0 / 1.0;
        let expected = rs / (1.0 + rs);
        assert!((osc.value(2).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn zero_window_is_all_undefined() {
        let series = PriceSeries::from_prices(&[1.0, 2.0]);
        let osc = oscillator(&series, 0, OscillatorKind::Rsi);
        assert_eq!(osc.values, vec![None, None]);
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!(
            "RSI".parse::<OscillatorKind>().unwrap(),
            OscillatorKind::Rsi
        );
        assert_eq!(
            "stochastic".parse::<OscillatorKind>().unwrap(),
            OscillatorKind::Stochastic
        );
        assert!("macd".parse::<OscillatorKind>().is_err());
    }
}
