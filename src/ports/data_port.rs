//! Market data access port trait.

use crate::domain::dataset::StockDataset;
use crate::domain::error::TradesimError;

pub trait MarketDataPort {
    /// Load the full stored dataset: per-column volatilities plus the price
    /// matrix whose day 0 is the initial-price row.
    fn load_dataset(&self) -> Result<StockDataset, TradesimError>;

    /// Persist a dataset, volatility header row included.
    fn store_dataset(&self, dataset: &StockDataset) -> Result<(), TradesimError>;
}
