use std::io::Write;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::{Args, Parser};
use tickerscope_lib::yahoo::ChartSource;
use tickerscope_lib::{Config, Loader};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::fetch::{self, FetchArgs};
use crate::output::OutputFormat;

#[derive(Args)]
pub struct SessionArgs {
    /// Do not print a prompt before each line
    #[arg(long)]
    pub no_prompt: bool,
}

/// One session line: the same flags as `fetch`.
#[derive(Parser, Debug)]
#[command(name = "fetch", no_binary_name = true)]
struct SessionLine {
    #[command(flatten)]
    fetch: FetchArgs,
}

/// Splits `line` with POSIX shell quoting rules and parses it as fetch flags.
fn parse_line(line: &str) -> Result<FetchArgs, clap::Error> {
    let words = shlex::split(line)
        .ok_or_else(|| clap::Error::raw(ErrorKind::InvalidValue, "unbalanced quotes in line\n"))?;
    SessionLine::try_parse_from(words).map(|l| l.fetch)
}

fn prompt(args: &SessionArgs) {
    if !args.no_prompt {
        eprint!("tickerscope> ");
        let _ = std::io::stderr().flush();
    }
}

/// Runs fetch lines from stdin until EOF or `quit`/`exit`. Errors are
/// reported and the session continues; all lines share `loader`'s cache.
pub async fn run<S: ChartSource>(
    args: &SessionArgs,
    loader: &Loader<S>,
    config: &Config,
    format: &OutputFormat,
) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt(args);
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if matches!(line, "quit" | "exit") {
            break;
        }
        if !line.is_empty() {
            match parse_line(line) {
                Ok(fetch_args) => {
                    if let Err(e) = fetch::run(&fetch_args, loader, config, format).await {
                        eprintln!("Error: {:#}", e);
                    }
                }
                Err(e) => eprintln!("{}", e),
            }
        }
        prompt(args);
    }
    tracing::debug!("session ended with {} cached results", loader.cached_len());
    Ok(())
}
