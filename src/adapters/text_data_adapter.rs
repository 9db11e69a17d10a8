//! Flat-file price dataset adapter.
//!
//! The dataset is a space-delimited text file of floats: row 0 holds one
//! volatility per column, and every following row is one day of closing
//! prices, the first of which doubles as the per-column initial price.
//! Undefined (bankrupt) entries render as `nan` and load back as undefined.

use std::fs::File;
use std::path::{Path, PathBuf};

use crate::domain::dataset::StockDataset;
use crate::domain::error::TradesimError;
use crate::domain::series::{PriceMatrix, PriceSeries};
use crate::ports::data_port::MarketDataPort;

pub struct TextDataAdapter {
    path: PathBuf,
}

impl TextDataAdapter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        TextDataAdapter {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl MarketDataPort for TextDataAdapter {
    fn load_dataset(&self) -> Result<StockDataset, TradesimError> {
        let file = File::open(&self.path)?;
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b' ')
            .has_headers(false)
            .from_reader(file);

        let mut rows: Vec<Vec<f64>> = Vec::new();
        for (line, result) in reader.records().enumerate() {
            let record = result.map_err(|e| TradesimError::Dataset {
                reason: format!("{}: {e}", self.path.display()),
            })?;
            let mut row = Vec::with_capacity(record.len());
            for field in record.iter() {
                let value: f64 = field.parse().map_err(|_| TradesimError::Dataset {
                    reason: format!(
                        "{}: bad value '{field}' on line {}",
                        self.path.display(),
                        line + 1
                    ),
                })?;
                row.push(value);
            }
            rows.push(row);
        }

        if rows.len() < 2 {
            return Err(TradesimError::Dataset {
                reason: format!(
                    "{}: need a volatility row and at least one price row",
                    self.path.display()
                ),
            });
        }

        let volatilities = rows[0].clone();
        let stocks = volatilities.len();
        let mut columns: Vec<PriceSeries> = Vec::with_capacity(stocks);
        for stock in 0..stocks {
            let values = rows[1..]
                .iter()
                .map(|row| {
                    let value = row[stock];
                    value.is_finite().then_some(value)
                })
                .collect();
            columns.push(PriceSeries::new(values));
        }

        StockDataset::new(volatilities, PriceMatrix::new(columns)?)
    }

    fn store_dataset(&self, dataset: &StockDataset) -> Result<(), TradesimError> {
        let file = File::create(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b' ')
            .has_headers(false)
            .from_writer(file);

        let csv_err = |e: csv::Error| TradesimError::Dataset {
            reason: format!("{}: {e}", self.path.display()),
        };

        let volatility_row: Vec<String> =
            dataset.volatilities().iter().map(f64::to_string).collect();
        writer.write_record(&volatility_row).map_err(csv_err)?;

        let matrix = dataset.prices();
        for day in 0..matrix.days() {
            let row: Vec<String> = matrix
                .day_prices(day)
                .iter()
                .map(|value| value.map_or_else(|| "nan".to_string(), |v| v.to_string()))
                .collect();
            writer.write_record(&row).map_err(csv_err)?;
        }

        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn sample_dataset() -> StockDataset {
        let matrix = PriceMatrix::new(vec![
            PriceSeries::from_prices(&[210.0, 211.5, 209.25]),
            PriceSeries::new(vec![Some(100.0), None, None]),
        ])
        .unwrap();
        StockDataset::new(vec![1.2, 3.4], matrix).unwrap()
    }

    #[test]
    fn store_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stock_data.txt");
        let adapter = TextDataAdapter::new(&path);

        adapter.store_dataset(&sample_dataset()).unwrap();
        let loaded = adapter.load_dataset().unwrap();

        assert_eq!(loaded, sample_dataset());
    }

    #[test]
    fn stored_file_has_volatility_header_and_nan_markers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stock_data.txt");
        let adapter = TextDataAdapter::new(&path);

        adapter.store_dataset(&sample_dataset()).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(lines[0], "1.2 3.4");
        assert_eq!(lines[1], "210 100");
        assert_eq!(lines[2], "211.5 nan");
        assert_eq!(lines[3], "209.25 nan");
    }

    #[test]
    fn load_treats_nan_as_undefined_and_absorbing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stock_data.txt");
        fs::write(&path, "2.0\n50\nnan\n51\n").unwrap();

        let dataset = TextDataAdapter::new(&path).load_dataset().unwrap();
        let series = dataset.prices().series(0);
        assert_eq!(series.price(0), Some(50.0));
        assert_eq!(series.price(1), None);
        // A defined value after an undefined one stays undefined.
        assert_eq!(series.price(2), None);
    }

    #[test]
    fn load_rejects_non_numeric_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stock_data.txt");
        fs::write(&path, "2.0 1.0\n50 oops\n").unwrap();

        let result = TextDataAdapter::new(&path).load_dataset();
        assert!(matches!(result, Err(TradesimError::Dataset { .. })));
    }

    #[test]
    fn load_rejects_a_headerless_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stock_data.txt");
        fs::write(&path, "2.0 1.0\n").unwrap();

        let result = TextDataAdapter::new(&path).load_dataset();
        assert!(matches!(result, Err(TradesimError::Dataset { .. })));
    }
}
