//! Transaction records and their persisted line format.

use std::fmt;
use std::str::FromStr;

use super::error::TradesimError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeAction {
    Buy,
    Sell,
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeAction::Buy => write!(f, "buy"),
            TradeAction::Sell => write!(f, "sell"),
        }
    }
}

impl FromStr for TradeAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buy" => Ok(TradeAction::Buy),
            "sell" => Ok(TradeAction::Sell),
            other => Err(format!("unknown transaction type '{other}'")),
        }
    }
}

/// One executed transaction.
///
/// `net` is the signed cash flow: negative for buys (shares·price + fees
/// spent), positive for sells (shares·price − fees earned). In-memory values
/// stay unrounded; rounding to 2 decimals happens only in the line format.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerRecord {
    pub action: TradeAction,
    pub day: usize,
    pub stock: usize,
    pub shares: u64,
    pub price: f64,
    pub net: f64,
}

impl LedgerRecord {
    pub fn new(
        action: TradeAction,
        day: usize,
        stock: usize,
        shares: u64,
        price: f64,
        fees: f64,
    ) -> Self {
        let gross = shares as f64 * price;
        let net = match action {
            TradeAction::Buy => -(gross + fees),
            TradeAction::Sell => gross - fees,
        };
        LedgerRecord {
            action,
            day,
            stock,
            shares,
            price,
            net,
        }
    }

    /// The persisted form: `type,day,stock,shares,price,net`, amounts with
    /// exactly 2 digits after the decimal point.
    pub fn to_line(&self) -> String {
        format!(
            "{},{},{},{},{:.2},{:.2}",
            self.action, self.day, self.stock, self.shares, self.price, self.net
        )
    }
}

impl FromStr for LedgerRecord {
    type Err = TradesimError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let malformed = |reason: String| TradesimError::LedgerParse { reason };

        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != 6 {
            return Err(malformed(format!(
                "expected 6 fields, got {} in '{line}'",
                fields.len()
            )));
        }

        let action = fields[0].parse::<TradeAction>().map_err(&malformed)?;
        let day = fields[1]
            .parse::<usize>()
            .map_err(|e| malformed(format!("bad day '{}': {e}", fields[1])))?;
        let stock = fields[2]
            .parse::<usize>()
            .map_err(|e| malformed(format!("bad stock '{}': {e}", fields[2])))?;
        let shares = fields[3]
            .parse::<u64>()
            .map_err(|e| malformed(format!("bad share count '{}': {e}", fields[3])))?;
        let price = fields[4]
            .parse::<f64>()
            .map_err(|e| malformed(format!("bad price '{}': {e}", fields[4])))?;
        let net = fields[5]
            .parse::<f64>()
            .map_err(|e| malformed(format!("bad net amount '{}': {e}", fields[5])))?;

        Ok(LedgerRecord {
            action,
            day,
            stock,
            shares,
            price,
            net,
        })
    }
}
