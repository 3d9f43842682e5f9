use anyhow::{bail, Context};
use bid_grader::config::{Config, Credentials};
use bid_grader::market::MarketAnalyzer;
use bid_grader::{loader, report, Strategy};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, error};

/// Grade a marketplace bid against observed listing prices.
#[derive(Parser, Debug)]
#[command(name = "bid_grader", version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (optional)
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarize a set of prices
    Stats(PriceSource),
    /// Fee breakdown for a selling price
    Fees { price: f64 },
    /// Net profit for buying at one price and selling at another
    Profit {
        #[arg(long)]
        bid: f64,
        #[arg(long)]
        sell: f64,
        #[arg(long)]
        shipping: Option<f64>,
    },
    /// Multi-factor grade for one or more bids against a set of prices
    Grade {
        #[arg(long = "bid", required = true)]
        bids: Vec<f64>,
        #[command(flatten)]
        source: PriceSource,
    },
    /// Quick grade from an average price and a bid
    Quick {
        #[arg(long)]
        average: f64,
        #[arg(long)]
        bid: f64,
    },
    /// Search the marketplace and grade a bid
    Analyze {
        #[arg(long)]
        keywords: String,
        #[arg(long)]
        bid: f64,
        #[arg(long, value_enum, default_value_t = Strategy::Simple)]
        strategy: Strategy,
    },
    /// List active and sold listings for a search
    Search {
        #[arg(long)]
        keywords: String,
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
}

#[derive(Args, Debug)]
struct PriceSource {
    /// Comma-separated prices
    #[arg(long, value_delimiter = ',', conflicts_with = "file")]
    prices: Vec<f64>,

    /// JSON file of prices or listings
    #[arg(long)]
    file: Option<PathBuf>,
}

impl PriceSource {
    fn load(&self) -> anyhow::Result<Vec<f64>> {
        match &self.file {
            Some(path) => loader::load_prices(path)
                .with_context(|| format!("failed to load prices from {}", path.display())),
            None if self.prices.is_empty() => bail!("provide --prices or --file"),
            None => Ok(self.prices.clone()),
        }
    }
}

fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce() -> String) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", text());
    }
    Ok(())
}

async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    match cli.command {
        Command::Stats(source) => {
            let stats = bid_grader::aggregate(&source.load()?);
            emit(cli.json, &stats, || report::statistics(&stats))
        }
        Command::Fees { price } => {
            let fees = bid_grader::fees(price);
            emit(cli.json, &fees, || report::fees(price, &fees))
        }
        Command::Profit {
            bid,
            sell,
            shipping,
        } => {
            let profit = bid_grader::net_profit(bid, sell, shipping);
            emit(cli.json, &profit, || report::net_profit(&profit))
        }
        Command::Grade { bids, source } => {
            let stats = bid_grader::aggregate(&source.load()?);
            debug!(?stats, bids = bids.len(), "grading bids");
            let results = bid_grader::grade_bids(&bids, &stats);
            emit(cli.json, &results, || {
                bids.iter()
                    .zip(&results)
                    .map(|(bid, r)| report::grade(*bid, r))
                    .collect::<Vec<_>>()
                    .join("\n\n")
            })
        }
        Command::Quick { average, bid } => {
            let grade = bid_grader::grade_simple(average, bid);
            emit(cli.json, &grade, || report::simple(average, bid, &grade))
        }
        Command::Analyze {
            keywords,
            bid,
            strategy,
        } => {
            let analyzer = analyzer(&config)?;
            match strategy {
                Strategy::Simple => {
                    let analysis = analyzer.analyze_bid(&keywords, bid).await?;
                    emit(cli.json, &analysis, || report::bid_analysis(bid, &analysis))
                }
                Strategy::Full => {
                    let market = analyzer.analyze_market(&keywords, bid).await?;
                    emit(cli.json, &market, || report::market_report(bid, &market))
                }
            }
        }
        Command::Search { keywords, limit } => {
            let results = analyzer(&config)?.search_all(&keywords, limit).await?;
            emit(cli.json, &results, || report::search(&results))
        }
    }
}

fn analyzer(config: &Config) -> anyhow::Result<MarketAnalyzer> {
    let credentials = Credentials::from_env(config.marketplace.environment);
    debug!(environment = %config.marketplace.environment, ?credentials, "resolved credentials");
    Ok(MarketAnalyzer::from_config(&config.marketplace, credentials)?)
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match Config::load_or_default(&cli.config) {
        Ok(c) => c.apply_env(),
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };

    config.logging.init();

    if let Err(e) = run(cli, config).await {
        error!(error = %e, "command failed");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
