//! Report rendering
//!
//! Writes closed trades as comma-separated rows and the running total with
//! two fraction digits.

use std::io::Write;

use pnl_engine::ClosedTradeSink;
use rust_decimal::Decimal;
use types::errors::SinkError;
use types::numeric::to_fixed;
use types::trade::ClosedTrade;

/// Column header for closed-trade rows
pub const HEADER: &str =
    "OPEN_TIME,CLOSE_TIME,SYMBOL,QUANTITY,PNL,OPEN_SIDE,CLOSE_SIDE,OPEN_PRICE,CLOSE_PRICE";

/// Fraction digits for the total line
pub const TOTAL_DECIMALS: u32 = 2;

/// Render the running total, e.g. `23.00`
pub fn format_total(total: Decimal) -> String {
    to_fixed(total, TOTAL_DECIMALS)
}

/// Sink writing one row per closed trade
pub struct CsvRowSink<W: Write> {
    out: W,
    rows_written: u64,
}

impl<W: Write> CsvRowSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, rows_written: 0 }
    }

    pub fn write_header(&mut self) -> Result<(), SinkError> {
        writeln!(self.out, "{HEADER}")?;
        Ok(())
    }

    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ClosedTradeSink for CsvRowSink<W> {
    fn accept(&mut self, trade: &ClosedTrade) -> Result<(), SinkError> {
        writeln!(self.out, "{trade}")?;
        self.rows_written += 1;
        Ok(())
    }
}
