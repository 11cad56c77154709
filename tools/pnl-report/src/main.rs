use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use pnl_engine::OrderingCheck;
use pnl_report::logging::init_logging;
use pnl_report::{run_report, ReportOptions};

#[derive(Parser)]
#[command(name = "pnl-report", version, about = "FIFO realized PnL report for a CSV trade file")]
struct Cli {
    /// Trade file with a TIME,SYMBOL,SIDE,PRICE,QUANTITY header
    path: PathBuf,

    /// Print closed trades after ingestion instead of as they close
    #[arg(long)]
    store: bool,

    /// Reject out-of-order or duplicate-tick trades per symbol
    #[arg(long, conflicts_with = "warn_order")]
    strict: bool,

    /// Log out-of-order or duplicate-tick trades and process them anyway
    #[arg(long)]
    warn_order: bool,

    /// Default log level when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let ordering = if cli.strict {
        OrderingCheck::Reject
    } else if cli.warn_order {
        OrderingCheck::Warn
    } else {
        OrderingCheck::Off
    };

    let file = File::open(&cli.path)
        .with_context(|| format!("open trade file failed: {}", cli.path.display()))?;

    tracing::info!(path = %cli.path.display(), store = cli.store, ?ordering, "starting report");

    let stdout = io::stdout();
    run_report(
        BufReader::new(file),
        BufWriter::new(stdout.lock()),
        &ReportOptions {
            store: cli.store,
            ordering,
        },
    )?;

    Ok(())
}
