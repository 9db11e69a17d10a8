//! Dataset assembly and column selection.
//!
//! A stored dataset keeps one volatility per column; its price matrix starts
//! at the initial-price row, so day 0 of every column is that stock's initial
//! price. Requests can select the stored columns closest to requested initial
//! prices or volatilities.

use rand::Rng;

use super::error::TradesimError;
use super::series::PriceMatrix;
use super::simulate;
use crate::ports::data_port::MarketDataPort;

/// Fixed horizon for generated datasets: five years of daily closes.
pub const DEFAULT_HORIZON_DAYS: usize = 1825;

#[derive(Debug, Clone, PartialEq)]
pub struct StockDataset {
    volatilities: Vec<f64>,
    prices: PriceMatrix,
}

impl StockDataset {
    pub fn new(volatilities: Vec<f64>, prices: PriceMatrix) -> Result<Self, TradesimError> {
        if volatilities.len() != prices.stocks() {
            return Err(TradesimError::Dataset {
                reason: format!(
                    "{} volatilities for {} price columns",
                    volatilities.len(),
                    prices.stocks()
                ),
            });
        }
        Ok(StockDataset {
            volatilities,
            prices,
        })
    }

    pub fn volatilities(&self) -> &[f64] {
        &self.volatilities
    }

    pub fn prices(&self) -> &PriceMatrix {
        &self.prices
    }

    /// The day-0 price of every column. An undefined day 0 (possible only in
    /// a hand-edited file) yields NaN, which no closest-match ever selects.
    pub fn initial_prices(&self) -> Vec<f64> {
        (0..self.prices.stocks())
            .map(|stock| self.prices.price(stock, 0).unwrap_or(f64::NAN))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataMethod {
    Read,
    Generate,
}

/// A resolved price matrix plus any user-visible selection notices.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSelection {
    pub matrix: PriceMatrix,
    pub notices: Vec<String>,
}

/// Resolve a price matrix per the request method.
///
/// `Read` loads the stored dataset and selects columns; `Generate` simulates
/// fresh series over [`DEFAULT_HORIZON_DAYS`] and requires both argument
/// lists. Missing arguments are usage errors with user-facing messages, not
/// panics.
pub fn get_data<R: Rng>(
    method: DataMethod,
    initial_prices: Option<&[f64]>,
    volatilities: Option<&[f64]>,
    port: &dyn MarketDataPort,
    rng: &mut R,
) -> Result<DataSelection, TradesimError> {
    match method {
        DataMethod::Read => {
            let dataset = port.load_dataset()?;
            select_columns(&dataset, initial_prices, volatilities)
        }
        DataMethod::Generate => {
            let (prices, vols) = match (initial_prices, volatilities) {
                (Some(p), Some(v)) => (p, v),
                (Some(_), None) => return Err(TradesimError::MissingVolatilities),
                (None, Some(_)) => return Err(TradesimError::MissingInitialPrices),
                (None, None) => return Err(TradesimError::MissingPricesAndVolatilities),
            };
            let matrix = simulate::generate_matrix(prices, vols, DEFAULT_HORIZON_DAYS, rng)?;
            Ok(DataSelection {
                matrix,
                notices: Vec::new(),
            })
        }
    }
}

/// Select the stored columns closest to the requested values.
///
/// With neither argument the whole dataset comes back unfiltered. With both,
/// selection is driven by the initial prices only and a notice reports the
/// ignored volatility argument. Every non-empty selection reports the stored
/// initial prices and volatilities actually found.
pub fn select_columns(
    dataset: &StockDataset,
    initial_prices: Option<&[f64]>,
    volatilities: Option<&[f64]>,
) -> Result<DataSelection, TradesimError> {
    let mut notices = Vec::new();

    let (targets, stored, volatility_ignored): (&[f64], Vec<f64>, bool) =
        match (initial_prices, volatilities) {
            (None, None) => {
                return Ok(DataSelection {
                    matrix: dataset.prices.clone(),
                    notices,
                });
            }
            (None, Some(targets)) => (targets, dataset.volatilities.clone(), false),
            (Some(targets), None) => (targets, dataset.initial_prices(), false),
            (Some(targets), Some(_)) => (targets, dataset.initial_prices(), true),
        };

    if dataset.prices.stocks() == 0 {
        return Err(TradesimError::Dataset {
            reason: "dataset has no columns to select from".into(),
        });
    }

    let indices: Vec<usize> = targets
        .iter()
        .map(|&target| closest_index(&stored, target))
        .collect();

    let found_prices: Vec<f64> = {
        let all = dataset.initial_prices();
        indices.iter().map(|&i| all[i]).collect()
    };
    let found_vols: Vec<f64> = indices.iter().map(|&i| dataset.volatilities[i]).collect();
    notices.push(format!(
        "Found data with initial prices {} and volatilities {}.",
        format_list(&found_prices),
        format_list(&found_vols)
    ));
    if volatility_ignored {
        notices.push("Input argument volatility ignored.".into());
    }

    let series = indices
        .iter()
        .map(|&i| dataset.prices.series(i).clone())
        .collect();
    let matrix = PriceMatrix::new(series)?;

    Ok(DataSelection { matrix, notices })
}

/// Index of the stored value with minimum absolute difference from `target`;
/// the first such index on ties. NaN entries never win.
fn closest_index(stored: &[f64], target: f64) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (i, &value) in stored.iter().enumerate() {
        let distance = (value - target).abs();
        if distance < best_distance {
            best = i;
            best_distance = distance;
        }
    }
    best
}

fn format_list(values: &[f64]) -> String {
    let joined = values
        .iter()
        .map(f64::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{joined}]")
}
