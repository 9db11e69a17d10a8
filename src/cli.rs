//! CLI definition and dispatch.

use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::file_ledger_adapter::FileLedger;
use crate::adapters::text_data_adapter::TextDataAdapter;
use crate::domain::dataset::{self, DataMethod, StockDataset};
use crate::domain::error::TradesimError;
use crate::domain::indicator::moving_average::moving_average;
use crate::domain::indicator::oscillator::{oscillator, OscillatorKind};
use crate::domain::indicator::IndicatorSeries;
use crate::domain::performance;
use crate::domain::strategy::{
    run_crossing_averages, run_momentum, run_random, CrossingAveragesParams, MomentumParams,
    RandomParams,
};
use crate::ports::data_port::MarketDataPort;

#[derive(Parser, Debug)]
#[command(name = "tradesim", about = "Stock market simulation and strategy backtesting")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum StrategyArg {
    Random,
    CrossingAverages,
    Momentum,
}

impl fmt::Display for StrategyArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyArg::Random => write!(f, "random"),
            StrategyArg::CrossingAverages => write!(f, "crossing-averages"),
            StrategyArg::Momentum => write!(f, "momentum"),
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum IndicatorArg {
    Sma,
    Wma,
    Stochastic,
    Rsi,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a synthetic price dataset and write it to a file
    Generate {
        /// One initial price per stock, comma-separated
        #[arg(long, value_delimiter = ',')]
        initial_prices: Option<Vec<f64>>,
        /// One volatility per stock, comma-separated
        #[arg(long, value_delimiter = ',')]
        volatilities: Option<Vec<f64>>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Run a trading strategy over a dataset, appending trades to a ledger
    Run {
        #[arg(long)]
        data: PathBuf,
        #[arg(long, value_enum)]
        strategy: StrategyArg,
        #[arg(long)]
        ledger: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        seed: Option<u64>,
        /// Select the stored columns closest to these initial prices
        #[arg(long, value_delimiter = ',')]
        initial_prices: Option<Vec<f64>>,
        /// Select the stored columns closest to these volatilities
        #[arg(long, value_delimiter = ',')]
        volatilities: Option<Vec<f64>>,
    },
    /// Summarize a ledger file
    Report {
        #[arg(long)]
        ledger: PathBuf,
        #[arg(long, default_value_t = dataset::DEFAULT_HORIZON_DAYS)]
        days: usize,
        /// Also write the cumulative daily balance as CSV
        #[arg(long)]
        series: Option<PathBuf>,
    },
    /// Dump one indicator series for one stock as CSV
    Indicator {
        #[arg(long)]
        data: PathBuf,
        #[arg(long, default_value_t = 0)]
        stock: usize,
        #[arg(long, value_enum)]
        kind: IndicatorArg,
        #[arg(long, default_value_t = 7)]
        window: usize,
        /// Weights for the weighted moving average; length must equal window
        #[arg(long, value_delimiter = ',')]
        weights: Option<Vec<f64>>,
        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Generate {
            initial_prices,
            volatilities,
            seed,
            output,
        } => run_generate(initial_prices, volatilities, seed, &output),
        Command::Run {
            data,
            strategy,
            ledger,
            config,
            seed,
            initial_prices,
            volatilities,
        } => run_strategy(
            &data,
            strategy,
            &ledger,
            config.as_ref(),
            seed,
            initial_prices,
            volatilities,
        ),
        Command::Report {
            ledger,
            days,
            series,
        } => run_report(&ledger, days, series.as_ref()),
        Command::Indicator {
            data,
            stock,
            kind,
            window,
            weights,
            output,
        } => run_indicator(&data, stock, kind, window, weights, output.as_ref()),
    }
}

fn report_error(err: &TradesimError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = TradesimError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        report_error(&err)
    })
}

fn run_generate(
    initial_prices: Option<Vec<f64>>,
    volatilities: Option<Vec<f64>>,
    seed: Option<u64>,
    output: &PathBuf,
) -> ExitCode {
    let adapter = TextDataAdapter::new(output);
    let mut rng = seeded_rng(seed);

    let result = dataset::get_data(
        DataMethod::Generate,
        initial_prices.as_deref(),
        volatilities.as_deref(),
        &adapter,
        &mut rng,
    )
    .and_then(|selection| {
        let volatilities = volatilities.clone().unwrap_or_default();
        let dataset = StockDataset::new(volatilities, selection.matrix)?;
        adapter.store_dataset(&dataset)?;
        Ok(dataset)
    });

    match result {
        Ok(dataset) => {
            eprintln!(
                "Wrote {} stocks over {} days to {}",
                dataset.prices().stocks(),
                dataset.prices().days(),
                output.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => report_error(&e),
    }
}

fn run_strategy(
    data: &PathBuf,
    strategy: StrategyArg,
    ledger_path: &PathBuf,
    config_path: Option<&PathBuf>,
    seed: Option<u64>,
    initial_prices: Option<Vec<f64>>,
    volatilities: Option<Vec<f64>>,
) -> ExitCode {
    // Stage 1: resolve price data, applying any column selection.
    eprintln!("Loading price data from {}", data.display());
    let adapter = TextDataAdapter::new(data);
    let mut rng = seeded_rng(seed);
    let selection = match dataset::get_data(
        DataMethod::Read,
        initial_prices.as_deref(),
        volatilities.as_deref(),
        &adapter,
        &mut rng,
    ) {
        Ok(selection) => selection,
        Err(e) => return report_error(&e),
    };
    for notice in &selection.notices {
        println!("{notice}");
    }

    // Stage 2: optional strategy configuration.
    let config = match config_path {
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            match load_config(path) {
                Ok(adapter) => Some(adapter),
                Err(code) => return code,
            }
        }
        None => None,
    };

    // Stage 3: open the ledger and run.
    let mut ledger = match FileLedger::open(ledger_path) {
        Ok(ledger) => ledger,
        Err(e) => return report_error(&e),
    };

    let matrix = &selection.matrix;
    eprintln!(
        "Running {strategy} over {} stocks x {} days",
        matrix.stocks(),
        matrix.days()
    );

    let result = match strategy {
        StrategyArg::Random => {
            let params = config
                .as_ref()
                .map_or_else(RandomParams::default, |c| RandomParams::from_config(c));
            run_random(matrix, &params, &mut rng, &mut ledger)
        }
        StrategyArg::CrossingAverages => {
            let params = config.as_ref().map_or_else(CrossingAveragesParams::default, |c| {
                CrossingAveragesParams::from_config(c)
            });
            run_crossing_averages(matrix, &params, &mut ledger)
        }
        StrategyArg::Momentum => {
            let params = config
                .as_ref()
                .map_or_else(MomentumParams::default, |c| MomentumParams::from_config(c));
            run_momentum(matrix, &params, &mut ledger)
        }
    };

    match result {
        Ok(_) => {
            eprintln!("Run complete; transactions appended to {}", ledger_path.display());
            ExitCode::SUCCESS
        }
        Err(e) => report_error(&e),
    }
}

fn run_report(ledger: &PathBuf, days: usize, series: Option<&PathBuf>) -> ExitCode {
    let records = match FileLedger::read_records(ledger) {
        Ok(records) => records,
        Err(e) => return report_error(&e),
    };
    let report = match performance::summarize(&records, days) {
        Ok(report) => report,
        Err(e) => return report_error(&e),
    };

    println!("Summary of {}", ledger.display());
    println!("{report}");

    if let Some(path) = series {
        if let Err(e) = write_balance_series(&report.daily_balance, path) {
            return report_error(&e);
        }
        eprintln!("Wrote daily balance series to {}", path.display());
    }

    ExitCode::SUCCESS
}

fn write_balance_series(balance: &[f64], path: &PathBuf) -> Result<(), TradesimError> {
    let mut writer = csv::Writer::from_path(path).map_err(csv_to_io)?;
    writer.write_record(["day", "balance"]).map_err(csv_to_io)?;
    for (day, amount) in balance.iter().enumerate() {
        writer
            .write_record([day.to_string(), format!("{amount:.2}")])
            .map_err(csv_to_io)?;
    }
    writer.flush()?;
    Ok(())
}

fn run_indicator(
    data: &PathBuf,
    stock: usize,
    kind: IndicatorArg,
    window: usize,
    weights: Option<Vec<f64>>,
    output: Option<&PathBuf>,
) -> ExitCode {
    let dataset = match TextDataAdapter::new(data).load_dataset() {
        Ok(dataset) => dataset,
        Err(e) => return report_error(&e),
    };

    let matrix = dataset.prices();
    if stock >= matrix.stocks() {
        return report_error(&TradesimError::Dataset {
            reason: format!(
                "stock {stock} out of range, dataset has {} columns",
                matrix.stocks()
            ),
        });
    }
    let series = matrix.series(stock);
    let weights = weights.unwrap_or_default();

    let result = match kind {
        IndicatorArg::Sma => moving_average(series, window, &[]),
        IndicatorArg::Wma if weights.is_empty() => Err(TradesimError::WeightsLength {
            expected: window,
            got: 0,
        }),
        IndicatorArg::Wma => moving_average(series, window, &weights),
        IndicatorArg::Stochastic => Ok(oscillator(series, window, OscillatorKind::Stochastic)),
        IndicatorArg::Rsi => Ok(oscillator(series, window, OscillatorKind::Rsi)),
    };
    let indicator = match result {
        Ok(indicator) => indicator,
        Err(e) => return report_error(&e),
    };

    match write_indicator(&indicator, output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report_error(&e),
    }
}

fn write_indicator(
    indicator: &IndicatorSeries,
    output: Option<&PathBuf>,
) -> Result<(), TradesimError> {
    let sink: Box<dyn Write> = match output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout()),
    };
    let mut writer = csv::Writer::from_writer(sink);

    writer
        .write_record(["day", &indicator.indicator_type.to_string()])
        .map_err(csv_to_io)?;
    for (day, value) in indicator.values.iter().enumerate() {
        let rendered = value.map_or_else(|| "nan".to_string(), |v| v.to_string());
        writer
            .write_record([day.to_string(), rendered])
            .map_err(csv_to_io)?;
    }
    writer.flush()?;
    Ok(())
}

fn csv_to_io(err: csv::Error) -> TradesimError {
    TradesimError::Io(io::Error::other(err))
}
