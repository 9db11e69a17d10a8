//! Domain error types.
//!
//! Usage errors (bad arguments, mismatched lists) carry the descriptive
//! message the caller reports to the user; none of the core paths panic.

/// Top-level error type for tradesim.
#[derive(Debug, thiserror::Error)]
pub enum TradesimError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("please specify the initial price and the volatility for each stock")]
    MissingPricesAndVolatilities,

    #[error("please specify the initial price for each stock")]
    MissingInitialPrices,

    #[error("please specify the volatility for each stock")]
    MissingVolatilities,

    #[error("initial prices and volatilities must pair up: {prices} prices, {volatilities} volatilities")]
    UnpairedInputs { prices: usize, volatilities: usize },

    #[error("volatility must be a positive, finite number (got {value})")]
    InvalidVolatility { value: f64 },

    #[error("allocation list must have one entry per stock: {allocations} allocations, {stocks} stocks")]
    AllocationCount { allocations: usize, stocks: usize },

    #[error("weights length must equal the moving average period: expected {expected}, got {got}")]
    WeightsLength { expected: usize, got: usize },

    #[error("unusable dataset: {reason}")]
    Dataset { reason: String },

    #[error("malformed ledger record: {reason}")]
    LedgerParse { reason: String },

    #[error("ledger record on day {day} is outside the {days}-day horizon")]
    LedgerDayOutOfRange { day: usize, days: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&TradesimError> for std::process::ExitCode {
    fn from(err: &TradesimError) -> Self {
        let code: u8 = match err {
            TradesimError::Io(_) => 1,
            TradesimError::ConfigParse { .. }
            | TradesimError::MissingPricesAndVolatilities
            | TradesimError::MissingInitialPrices
            | TradesimError::MissingVolatilities
            | TradesimError::UnpairedInputs { .. }
            | TradesimError::InvalidVolatility { .. }
            | TradesimError::AllocationCount { .. }
            | TradesimError::WeightsLength { .. } => 2,
            TradesimError::Dataset { .. } => 3,
            TradesimError::LedgerParse { .. } | TradesimError::LedgerDayOutOfRange { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_errors_have_stable_messages() {
        assert_eq!(
            TradesimError::MissingVolatilities.to_string(),
            "please specify the volatility for each stock"
        );
        assert_eq!(
            TradesimError::WeightsLength {
                expected: 5,
                got: 3
            }
            .to_string(),
            "weights length must equal the moving average period: expected 5, got 3"
        );
    }

    #[test]
    fn io_errors_convert_transparently() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: TradesimError = io.into();
        assert!(matches!(err, TradesimError::Io(_)));
        assert_eq!(err.to_string(), "missing");
    }
}
