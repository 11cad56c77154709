//! Trade record ingestion
//!
//! Reads comma-delimited trade records with a `TIME,SYMBOL,SIDE,PRICE,QUANTITY`
//! header and validates each one before it can reach the ledger. The first
//! bad record stops ingestion.

use std::io::Read;

use serde::Deserialize;
use tracing::debug;
use types::errors::ParseError;
use types::ids::{Symbol, TradeTime};
use types::numeric::{parse_decimal, Price, Quantity};
use types::side::Side;
use types::trade::Trade;

/// Raw record as it appears in the file
#[derive(Debug, Deserialize)]
struct TradeRecord {
    #[serde(rename = "TIME")]
    time: String,
    #[serde(rename = "SYMBOL")]
    symbol: String,
    #[serde(rename = "SIDE")]
    side: String,
    #[serde(rename = "PRICE")]
    price: String,
    #[serde(rename = "QUANTITY")]
    quantity: String,
}

impl TradeRecord {
    fn into_trade(self, line: u64) -> Result<Trade, ParseError> {
        let time = TradeTime::new(self.time);
        if time.is_empty() {
            return Err(ParseError::MissingField { line, field: "TIME" });
        }
        let symbol = Symbol::new(self.symbol);
        if symbol.is_empty() {
            return Err(ParseError::MissingField { line, field: "SYMBOL" });
        }

        let side = Side::from_code(&self.side).ok_or_else(|| ParseError::UnknownSide {
            line,
            value: self.side.clone(),
        })?;

        let price = parse_decimal(&self.price).map_err(|_| ParseError::InvalidDecimal {
            line,
            field: "PRICE",
            value: self.price.clone(),
        })?;

        let quantity = parse_decimal(&self.quantity).map_err(|_| ParseError::InvalidDecimal {
            line,
            field: "QUANTITY",
            value: self.quantity.clone(),
        })?;
        let quantity = Quantity::new(quantity);
        if !quantity.is_positive() {
            return Err(ParseError::NonPositiveQuantity {
                line,
                value: self.quantity,
            });
        }

        Ok(Trade::new(time, symbol, side, Price::new(price), quantity))
    }
}

/// Iterator of validated trades over a CSV source
pub struct TradeReader<R: Read> {
    records: csv::StringRecordsIntoIter<R>,
    headers: csv::StringRecord,
    records_read: u64,
}

impl<R: Read> TradeReader<R> {
    /// Open a reader, consuming the header row
    pub fn new(reader: R) -> Result<Self, ParseError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers().map_err(|e| malformed(&e, 1))?.clone();
        debug!(headers = ?headers, "trade csv opened");

        Ok(Self {
            records: rdr.into_records(),
            headers,
            records_read: 0,
        })
    }

    /// Records read so far, including a failing one
    pub fn records_read(&self) -> u64 {
        self.records_read
    }
}

impl<R: Read> Iterator for TradeReader<R> {
    type Item = Result<Trade, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(e) => return Some(Err(malformed(&e, self.records_read + 2))),
        };
        self.records_read += 1;

        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(self.records_read + 1);

        let parsed = record
            .deserialize::<TradeRecord>(Some(&self.headers))
            .map_err(|e| ParseError::Malformed {
                line,
                reason: e.to_string(),
            })
            .and_then(|raw| raw.into_trade(line));

        if let Err(err) = &parsed {
            debug!(line = err.line(), error = %err, "trade record rejected");
        }

        Some(parsed)
    }
}

fn malformed(err: &csv::Error, fallback_line: u64) -> ParseError {
    ParseError::Malformed {
        line: err.position().map(|p| p.line()).unwrap_or(fallback_line),
        reason: err.to_string(),
    }
}

/// Read and validate every trade, stopping at the first bad record
pub fn read_trades<R: Read>(reader: R) -> Result<Vec<Trade>, ParseError> {
    TradeReader::new(reader)?.collect()
}
