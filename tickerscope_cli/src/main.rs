mod chart;
mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tickerscope_lib::{Config, Loader};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "tickerscope")]
#[command(about = "Fetch, chart, summarize and export historical stock prices")]
struct Cli {
    /// Output format: table, json, csv, markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one query, print it and optionally export it
    Fetch(Box<commands::fetch::FetchArgs>),
    /// Read fetch arguments line by line from stdin, quoted as in a shell,
    /// reusing cached results
    Session(commands::session::SessionArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tickerscope=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format: OutputFormat = cli.output.parse()?;

    let config = Config::from_env();
    let loader = Loader::from_config(&config)?;

    match &cli.command {
        Commands::Fetch(args) => {
            commands::fetch::run(args.as_ref(), &loader, &config, &format).await?
        }
        Commands::Session(args) => commands::session::run(args, &loader, &config, &format).await?,
    }

    Ok(())
}
