use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use tickerscope_lib::export;
use tickerscope_lib::validation;
use tickerscope_lib::yahoo::ChartSource;
use tickerscope_lib::{collect, Config, Loader, Provider, RawParams};

use crate::output::{present, OutputFormat};

#[derive(Args, Debug, Clone)]
pub struct FetchArgs {
    /// Data provider: yahoo or google
    #[arg(long, default_value = "yahoo")]
    pub provider: String,

    /// Ticker symbol as listed on the exchange (default AAPL)
    #[arg(long)]
    pub symbol: Option<String>,

    /// Exchange: NSE, BSE, NASDAQ, NYSE or none
    #[arg(long)]
    pub exchange: Option<String>,

    /// Trailing window: 1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd, max
    #[arg(long, conflicts_with_all = ["start", "end"])]
    pub period: Option<String>,

    /// Start date (YYYY-MM-DD or DD/MM/YYYY)
    #[arg(long)]
    pub start: Option<String>,

    /// End date, inclusive (YYYY-MM-DD or DD/MM/YYYY)
    #[arg(long)]
    pub end: Option<String>,

    /// Sampling interval: 1m, 2m, 5m, 15m, 30m, 60m, 90m, 1h, 1d, 5d, 1wk, 1mo, 3mo
    #[arg(long)]
    pub interval: Option<String>,

    /// Write the data to {symbol}_data.{ext}: csv, xlsx or slx
    #[arg(long)]
    pub export: Option<String>,

    /// Directory for the export file (default: TICKERSCOPE_EXPORT_DIR or .)
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Skip the closing price chart
    #[arg(long)]
    pub no_chart: bool,
}

impl FetchArgs {
    fn raw_params(&self) -> RawParams {
        RawParams {
            symbol: self.symbol.clone(),
            exchange: self.exchange.clone(),
            period: self.period.clone(),
            start: self.start.clone(),
            end: self.end.clone(),
            interval: self.interval.clone(),
        }
    }
}

pub async fn run<S: ChartSource>(
    args: &FetchArgs,
    loader: &Loader<S>,
    config: &Config,
    format: &OutputFormat,
) -> Result<()> {
    let provider: Provider = args.provider.parse()?;
    let export_format = args
        .export
        .as_deref()
        .map(validation::validate_export_format)
        .transpose()?;

    let collected = collect(provider, &args.raw_params(), Utc::now().date_naive())?;
    for notice in &collected.notices {
        if notice.is_warning() {
            eprintln!("Warning: {}", notice);
        } else {
            eprintln!("{}", notice);
        }
    }

    let symbol = collected.query.symbol.clone();
    let outcome = loader.load(provider, &collected.query).await;
    present(&symbol, &outcome, format, !args.no_chart)?;

    if let Some(export_format) = export_format {
        if !outcome.is_data() {
            eprintln!("Nothing to export.");
            return Ok(());
        }
        let series = outcome.into_series(provider.layout());
        let blob = export::export_as(&series, export_format)?;
        let dir = args
            .out_dir
            .clone()
            .unwrap_or_else(|| config.export_dir.clone());
        let path = export::write_blob(&dir, &symbol, &blob)?;
        eprintln!(
            "Saved {} export ({}) to {}",
            export_format.label(),
            blob.mime,
            path.display()
        );
    }

    Ok(())
}
