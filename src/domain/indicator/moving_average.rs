//! Moving average, optionally weighted.

use super::{IndicatorSeries, IndicatorType};
use crate::domain::error::TradesimError;
use crate::domain::series::PriceSeries;

/// n-day moving average of a price series with an edge-adjusted window.
///
/// Day i averages the last `min(i+1, n)` prices, capped further at the series
/// length when the whole history is shorter than `n`. With a non-empty
/// `weights` (length must equal `n`) the average is weighted, right-aligned:
/// the most recent day in the window always takes the last weight, and the
/// divisor is the sum of the weights actually used, so weights need not sum
/// to 1. A window containing an undefined price yields an undefined entry.
pub fn moving_average(
    series: &PriceSeries,
    n: usize,
    weights: &[f64],
) -> Result<IndicatorSeries, TradesimError> {
    if !weights.is_empty() && weights.len() != n {
        return Err(TradesimError::WeightsLength {
            expected: n,
            got: weights.len(),
        });
    }

    let indicator_type = if weights.is_empty() {
        IndicatorType::Sma(n)
    } else {
        IndicatorType::Wma(n)
    };

    let m = series.len();
    if n == 0 {
        return Ok(IndicatorSeries {
            indicator_type,
            values: vec![None; m],
        });
    }

    let effective_n = n.min(m);
    let mut values = Vec::with_capacity(m);

    for i in 0..m {
        let window_len = (i + 1).min(effective_n);
        let window = &series.values()[i + 1 - window_len..=i];
        let value = if weights.is_empty() {
            mean(window)
        } else {
            weighted_mean(window, &weights[n - window_len..])
        };
        values.push(value);
    }

    Ok(IndicatorSeries {
        indicator_type,
        values,
    })
}

fn mean(window: &[Option<f64>]) -> Option<f64> {
    let mut sum = 0.0;
    for value in window {
        sum += (*value)?;
    }
    Some(sum / window.len() as f64)
}

fn weighted_mean(window: &[Option<f64>], weights: &[f64]) -> Option<f64> {
    let mut numerator = 0.0;
    let mut divisor = 0.0;
    for (value, weight) in window.iter().zip(weights) {
        numerator += (*value)? * weight;
        divisor += weight;
    }
    if divisor == 0.0 {
        return None;
    }
    Some(numerator / divisor)
}
