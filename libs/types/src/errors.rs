//! Error types for the PnL ledger
//!
//! The matching core fails only when a trade's PnL or inventory would leave
//! the decimal range, and then it refuses the whole trade. Every other
//! error comes from the layers around it: record parsing, output sinks and
//! the optional ordering guard.

use thiserror::Error;

/// Record ingestion errors
///
/// `line` is the 1-based line of the offending record in its source.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("line {line}: missing field {field}")]
    MissingField { line: u64, field: &'static str },

    #[error("line {line}: unknown side code {value:?}")]
    UnknownSide { line: u64, value: String },

    #[error("line {line}: invalid {field} {value:?}")]
    InvalidDecimal {
        line: u64,
        field: &'static str,
        value: String,
    },

    #[error("line {line}: quantity must be positive, got {value}")]
    NonPositiveQuantity { line: u64, value: String },

    #[error("line {line}: malformed record: {reason}")]
    Malformed { line: u64, reason: String },
}

impl ParseError {
    pub fn line(&self) -> u64 {
        match self {
            ParseError::MissingField { line, .. }
            | ParseError::UnknownSide { line, .. }
            | ParseError::InvalidDecimal { line, .. }
            | ParseError::NonPositiveQuantity { line, .. }
            | ParseError::Malformed { line, .. } => *line,
        }
    }
}

/// Closed-trade sink errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SinkError {
    #[error("sink write failed: {0}")]
    Io(String),

    #[error("sink closed")]
    Closed,
}

impl From<std::io::Error> for SinkError {
    fn from(err: std::io::Error) -> Self {
        SinkError::Io(err.to_string())
    }
}

/// Trade processor errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProcessError {
    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    #[error("out-of-order trade for {symbol}: {time} precedes {last}")]
    OutOfOrder {
        symbol: String,
        time: String,
        last: String,
    },

    #[error("duplicate tick for {symbol} at {time}")]
    DuplicateTick { symbol: String, time: String },

    #[error("non-positive quantity {quantity} for {symbol} at {time}")]
    NonPositiveQuantity {
        symbol: String,
        time: String,
        quantity: String,
    },

    #[error("arithmetic overflow applying trade for {symbol} at {time}")]
    Overflow { symbol: String, time: String },
}
