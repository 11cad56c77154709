//! Arrival-order guard
//!
//! The ledger assumes each symbol's trades arrive in increasing time order,
//! one per tick. The guard tracks the latest time seen per symbol so the
//! processor can flag or reject input that breaks that assumption.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use types::errors::ProcessError;
use types::ids::{Symbol, TradeTime};
use types::trade::Trade;

/// How the processor treats input that violates arrival order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderingCheck {
    /// Trust the caller; no tracking
    #[default]
    Off,
    /// Log a warning and process anyway
    Warn,
    /// Refuse the trade before it reaches the ledger
    Reject,
}

/// Latest trade time per symbol
#[derive(Debug, Default)]
pub struct OrderingGuard {
    last_seen: HashMap<Symbol, TradeTime>,
}

impl OrderingGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check a trade against the latest time recorded for its symbol
    pub fn check(&self, trade: &Trade) -> Result<(), ProcessError> {
        if !trade.quantity.is_positive() {
            return Err(ProcessError::NonPositiveQuantity {
                symbol: trade.symbol.to_string(),
                time: trade.time.to_string(),
                quantity: trade.quantity.to_string(),
            });
        }

        match self.last_seen.get(&trade.symbol) {
            Some(last) if trade.time < *last => Err(ProcessError::OutOfOrder {
                symbol: trade.symbol.to_string(),
                time: trade.time.to_string(),
                last: last.to_string(),
            }),
            Some(last) if trade.time == *last => Err(ProcessError::DuplicateTick {
                symbol: trade.symbol.to_string(),
                time: trade.time.to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Record a processed trade; the stored time never moves backwards
    pub fn record(&mut self, trade: &Trade) {
        match self.last_seen.get_mut(&trade.symbol) {
            Some(last) if trade.time > *last => *last = trade.time.clone(),
            Some(_) => {}
            None => {
                self.last_seen.insert(trade.symbol.clone(), trade.time.clone());
            }
        }
    }

    /// Latest recorded time for a symbol
    pub fn last_seen(&self, symbol: &str) -> Option<&TradeTime> {
        self.last_seen.get(symbol)
    }
}
