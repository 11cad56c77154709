//! Realized PnL reporting tool
//!
//! Feeds a CSV trade file through the FIFO ledger and prints every closed
//! trade followed by the running total.
//!
//! # Modules
//! - `reader`: CSV trade ingestion and validation
//! - `render`: Row and total rendering, CSV row sink
//! - `logging`: tracing subscriber setup

pub mod reader;
pub mod render;
pub mod logging;

use std::io::{Read, Write};

use anyhow::{Context, Result};
use pnl_engine::{ClosedTradeSink, OrderingCheck, ProcessorConfig, TradeProcessor};
use rust_decimal::Decimal;
use tracing::info;

use crate::reader::TradeReader;
use crate::render::{format_total, CsvRowSink};

/// Options for a report run
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    /// Buffer closed trades and print them after ingestion instead of
    /// streaming each row as it is produced
    pub store: bool,
    pub ordering: OrderingCheck,
}

impl ReportOptions {
    fn processor_config(&self) -> ProcessorConfig {
        ProcessorConfig {
            store: self.store,
            emit: !self.store,
            ordering: self.ordering,
        }
    }
}

/// Run a full report: header, closed-trade rows, total line.
///
/// Returns the realized PnL total.
pub fn run_report<R: Read, W: Write>(input: R, out: W, options: &ReportOptions) -> Result<Decimal> {
    let mut sink = CsvRowSink::new(out);
    sink.write_header().context("write header failed")?;

    let mut processor = TradeProcessor::with_sink(options.processor_config(), &mut sink);
    let reader = TradeReader::new(input).context("open trade csv failed")?;

    for trade in reader {
        let trade = trade.context("read trade failed")?;
        let time = trade.time.clone();
        processor
            .process(trade)
            .with_context(|| format!("process trade at {time} failed"))?;
    }

    let total = processor.pnl();
    let stored = processor.closed_trades();
    let trades_processed = processor.trades_processed();
    let symbols = processor.ledger().symbols().len();
    drop(processor);

    for record in &stored {
        sink.accept(record).context("write row failed")?;
    }

    info!(
        trades = trades_processed,
        symbols,
        closed = sink.rows_written(),
        total = %total,
        "report complete"
    );

    let mut out = sink.into_inner();
    writeln!(out, "{}", format_total(total)).context("write total failed")?;
    out.flush().context("flush output failed")?;

    Ok(total)
}
