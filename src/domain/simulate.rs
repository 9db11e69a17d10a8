//! Synthetic daily closing-price generation.
//!
//! Random-walk drift plus transient "news" shocks: each day has a small
//! chance of an event whose drift is applied additively to a short run of
//! subsequent days. Overlapping shocks accumulate.

use rand::Rng;
use rand_distr::StandardNormal;

use super::error::TradesimError;
use super::series::{PriceMatrix, PriceSeries};

/// Probability that a news event fires on any given day.
const NEWS_PROBABILITY: f64 = 0.01;

/// Duration of a news shock in days, inclusive on both ends.
const NEWS_DURATION_DAYS: std::ops::RangeInclusive<usize> = 3..=14;

/// Standard deviation of the news drift magnitude before volatility scaling.
const NEWS_MAGNITUDE_SIGMA: f64 = 2.0;

/// Generate a daily closing-price series of length `days`.
///
/// Day 0 is `initial_price` as given. Each later day adds a N(0, volatility)
/// increment and the accumulated news drift to the previous price. A price
/// that comes out at or below zero is recorded as undefined (bankruptcy),
/// which is absorbing: the rest of the series stays undefined and no further
/// randomness is consumed for it.
pub fn generate_price_series<R: Rng>(
    days: usize,
    initial_price: f64,
    volatility: f64,
    rng: &mut R,
) -> Result<PriceSeries, TradesimError> {
    if !volatility.is_finite() || volatility <= 0.0 {
        return Err(TradesimError::InvalidVolatility { value: volatility });
    }

    let mut values: Vec<Option<f64>> = vec![None; days];
    let mut total_drift = vec![0.0_f64; days];

    if days > 0 {
        values[0] = Some(initial_price);
    }

    for day in 1..days {
        let Some(previous) = values[day - 1] else {
            break;
        };

        let increment = rng.sample::<f64, _>(StandardNormal) * volatility;

        if rng.gen_bool(NEWS_PROBABILITY) {
            let magnitude = rng.sample::<f64, _>(StandardNormal) * NEWS_MAGNITUDE_SIGMA;
            let drift = magnitude * volatility;
            let duration = rng.gen_range(NEWS_DURATION_DAYS);
            let end = (day + duration).min(days);
            for slot in &mut total_drift[day..end] {
                *slot += drift;
            }
        }

        let price = previous + increment + total_drift[day];
        values[day] = (price > 0.0).then_some(price);
    }

    Ok(PriceSeries::new(values))
}

/// Generate one series per (initial price, volatility) pair.
pub fn generate_matrix<R: Rng>(
    initial_prices: &[f64],
    volatilities: &[f64],
    days: usize,
    rng: &mut R,
) -> Result<PriceMatrix, TradesimError> {
    if initial_prices.len() != volatilities.len() {
        return Err(TradesimError::UnpairedInputs {
            prices: initial_prices.len(),
            volatilities: volatilities.len(),
        });
    }

    let mut series = Vec::with_capacity(initial_prices.len());
    for (&price, &volatility) in initial_prices.iter().zip(volatilities) {
        series.push(generate_price_series(days, price, volatility, rng)?);
    }
    PriceMatrix::new(series)
}
