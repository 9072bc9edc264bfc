use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use market_forecast::{
    build_models_with, ForecastConfig, ForecastError, MarketAdvice, MatchPolicy,
    PriceHistoryLoader,
};
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "market-forecast")]
#[command(about = "Commodity price outlooks from historical market reports", long_about = None)]
struct Cli {
    /// Path to the market price CSV
    #[arg(short, long, default_value = "data/market_prices.csv")]
    data: String,

    /// Optional TOML file overriding forecast thresholds
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Forecast prices for a crop at a place
    Forecast {
        /// Market or place name
        #[arg(long)]
        place: String,
        /// Crop or commodity name
        #[arg(long)]
        crop: String,
        /// Target date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Answer with an unrelated market when nothing matches
        #[arg(long)]
        allow_fallback: bool,
    },
    /// List commodities present in the data
    Crops,
    /// List markets present in the data
    Markets,
}

fn parse_date(raw: Option<&str>) -> Result<NaiveDate, ForecastError> {
    match raw {
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map_err(|e| ForecastError::InvalidDate(format!("{s}: {e}"))),
        None => Ok(Local::now().date_naive()),
    }
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("market_forecast=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ForecastConfig::from_file(path)
            .with_context(|| format!("failed to load forecast config at {path}"))?,
        None => ForecastConfig::default(),
    };
    tracing::debug!(?config, "using forecast config");

    let store = PriceHistoryLoader::new(config.date_format.clone())
        .load_csv(&cli.data)
        .with_context(|| format!("failed to load price history from {}", cli.data))?;

    match cli.command {
        Commands::Crops => {
            println!("{}", serde_json::to_string_pretty(&store.available_commodities())?);
        }
        Commands::Markets => {
            println!("{}", serde_json::to_string_pretty(&store.available_markets())?);
        }
        Commands::Forecast {
            place,
            crop,
            date,
            allow_fallback,
        } => {
            let target_date = parse_date(date.as_deref())?;
            let models = build_models_with(store, &config)?;

            let found = models.lookup(&place, &crop, MatchPolicy::from(allow_fallback))?;
            let outlook = models.forecast(&found.key, target_date)?;
            let advice = MarketAdvice::from_forecast(&outlook);

            let payload = json!({
                "commodity": found.key.commodity,
                "market": found.key.market,
                "match": found.kind,
                "date": target_date,
                "forecast": outlook,
                "advice": advice.message,
            });
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
    }

    Ok(())
}
