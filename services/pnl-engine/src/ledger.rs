//! Inventory ledger core
//!
//! Owns the per-symbol open-lot queues and the running realized PnL.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::{debug, trace};
use types::errors::ProcessError;
use types::ids::Symbol;
use types::side::Side;
use types::trade::{ClosedTrade, Trade};

use crate::inventory::LotQueue;
use crate::matching::{crossing, realizer};

/// FIFO inventory ledger
///
/// Every instance is independent: the PnL accumulator is a field, not a
/// process-wide global.
#[derive(Debug, Default)]
pub struct InventoryLedger {
    /// Open lots per symbol, created on first reference
    books: HashMap<Symbol, LotQueue>,
    /// Realized PnL across all symbols, never reset
    realized_pnl: Decimal,
}

impl InventoryLedger {
    /// Create an empty ledger with zero realized PnL
    pub fn new() -> Self {
        Self {
            books: HashMap::new(),
            realized_pnl: Decimal::ZERO,
        }
    }

    /// Submit a trade to the ledger
    ///
    /// A trade on a flat symbol, or on the same side as its open lots, is
    /// appended as a new lot. A closing trade consumes the oldest lots first
    /// until either side runs out; any remainder opens a position in the
    /// trade's own direction. Returns the closed trades in match order.
    ///
    /// A trade whose PnL, running total or open quantity would leave the
    /// decimal range is refused with `ProcessError::Overflow` and leaves the
    /// ledger exactly as it was.
    ///
    /// Callers must keep per-symbol arrival in non-decreasing time order.
    pub fn submit(&mut self, mut trade: Trade) -> Result<Vec<ClosedTrade>, ProcessError> {
        let lots = self.books.entry(trade.symbol.clone()).or_default();

        match lots.side() {
            Some(open_side) if crossing::closes(open_side, trade.side) => {}
            _ => {
                if lots.total_quantity().checked_add(trade.quantity).is_none() {
                    return Err(overflow(&trade));
                }
                trace!(symbol = %trade.symbol, time = %trade.time, "lot opened");
                lots.push_back(trade);
                return Ok(Vec::new());
            }
        }

        // Price every match before touching the queue
        let mut closed = Vec::new();
        let mut realized = self.realized_pnl;
        let mut remaining = trade.quantity;

        for head in lots.iter() {
            if !remaining.is_positive() {
                break;
            }

            let matched = remaining.min(head.quantity);
            let record = realizer::realize(head, &trade, matched).ok_or_else(|| overflow(&trade))?;
            realized = realized
                .checked_add(record.pnl)
                .ok_or_else(|| overflow(&trade))?;
            remaining = remaining - matched;
            closed.push(record);
        }

        for record in &closed {
            debug!(
                symbol = %record.symbol,
                open_time = %record.open_time,
                close_time = %record.close_time,
                quantity = %record.matched_quantity,
                pnl = %record.pnl,
                "lot matched"
            );
            lots.fill_front(record.matched_quantity);
        }
        self.realized_pnl = realized;
        trade.quantity = remaining;

        // Inventory flip: the queue is drained, remainder opens the other way
        if trade.quantity.is_positive() {
            debug!(
                symbol = %trade.symbol,
                side = %trade.side,
                quantity = %trade.quantity,
                "position flipped"
            );
            lots.push_back(trade);
        }

        Ok(closed)
    }

    /// Running realized PnL across all symbols
    pub fn total_pnl(&self) -> Decimal {
        self.realized_pnl
    }

    /// Open lots for a symbol, if it has ever been traded
    pub fn open_lots(&self, symbol: &str) -> Option<&LotQueue> {
        self.books.get(symbol)
    }

    /// Signed open quantity: positive when long, negative when short
    pub fn net_position(&self, symbol: &str) -> Decimal {
        match self.books.get(symbol).and_then(|lots| lots.side().map(|side| (side, lots))) {
            Some((Side::BUY, lots)) => lots.total_quantity().as_decimal(),
            Some((Side::SELL, lots)) => -lots.total_quantity().as_decimal(),
            None => Decimal::ZERO,
        }
    }

    /// Symbols seen so far, sorted
    pub fn symbols(&self) -> Vec<&Symbol> {
        let mut symbols: Vec<&Symbol> = self.books.keys().collect();
        symbols.sort();
        symbols
    }
}

fn overflow(trade: &Trade) -> ProcessError {
    ProcessError::Overflow {
        symbol: trade.symbol.to_string(),
        time: trade.time.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use types::numeric::{Price, Quantity};

    fn trade(time: &str, symbol: &str, side: Side, price: &str, qty: &str) -> Trade {
        Trade::new(
            time,
            symbol,
            side,
            Price::from_str(price).unwrap(),
            Quantity::from_str(qty).unwrap(),
        )
    }

    #[test]
    fn test_ledger_opens_lot_on_flat_symbol() {
        let mut ledger = InventoryLedger::new();
        let closed = ledger.submit(trade("1", "AAPL", Side::BUY, "10", "5")).unwrap();

        assert!(closed.is_empty());
        assert_eq!(ledger.open_lots("AAPL").unwrap().len(), 1);
        assert_eq!(ledger.total_pnl(), Decimal::ZERO);
    }

    #[test]
    fn test_ledger_same_side_appends() {
        let mut ledger = InventoryLedger::new();
        ledger.submit(trade("1", "AAPL", Side::SELL, "10", "5")).unwrap();
        let closed = ledger.submit(trade("2", "AAPL", Side::SELL, "11", "3")).unwrap();

        assert!(closed.is_empty());
        let lots = ledger.open_lots("AAPL").unwrap();
        assert_eq!(lots.len(), 2);
        assert_eq!(lots.total_quantity(), Quantity::from_u64(8));
        assert_eq!(ledger.net_position("AAPL"), Decimal::from(-8));
    }

    #[test]
    fn test_ledger_long_round_trip() {
        let mut ledger = InventoryLedger::new();
        ledger.submit(trade("1", "AAPL", Side::BUY, "10", "5")).unwrap();
        let closed = ledger.submit(trade("2", "AAPL", Side::SELL, "12", "5")).unwrap();

        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].pnl, Decimal::from(10));
        assert_eq!(closed[0].opened_side, Side::BUY);
        assert!(ledger.open_lots("AAPL").unwrap().is_empty());
        assert_eq!(ledger.net_position("AAPL"), Decimal::ZERO);
    }

    #[test]
    fn test_ledger_short_round_trip() {
        let mut ledger = InventoryLedger::new();
        ledger.submit(trade("1", "AAPL", Side::SELL, "12", "5")).unwrap();
        let closed = ledger.submit(trade("2", "AAPL", Side::BUY, "10", "5")).unwrap();

        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].pnl, Decimal::from(10));
        assert_eq!(closed[0].opened_side, Side::SELL);
        assert_eq!(ledger.total_pnl(), Decimal::from(10));
    }

    #[test]
    fn test_ledger_symbols_are_independent() {
        let mut ledger = InventoryLedger::new();
        ledger.submit(trade("1", "AAPL", Side::BUY, "10", "5")).unwrap();
        let closed = ledger.submit(trade("2", "MSFT", Side::SELL, "12", "5")).unwrap();

        assert!(closed.is_empty());
        assert_eq!(ledger.net_position("AAPL"), Decimal::from(5));
        assert_eq!(ledger.net_position("MSFT"), Decimal::from(-5));
        let symbols: Vec<&str> = ledger.symbols().iter().map(|s| s.as_str()).collect();
        assert_eq!(symbols, vec!["AAPL", "MSFT"]);
    }

    #[test]
    fn test_ledger_symbol_is_case_sensitive() {
        let mut ledger = InventoryLedger::new();
        ledger.submit(trade("1", "aapl", Side::BUY, "10", "5")).unwrap();
        let closed = ledger.submit(trade("2", "AAPL", Side::SELL, "12", "5")).unwrap();

        assert!(closed.is_empty());
        assert_eq!(ledger.symbols().len(), 2);
    }

    #[test]
    fn test_ledgers_do_not_share_totals() {
        let mut first = InventoryLedger::new();
        let second = InventoryLedger::new();
        first.submit(trade("1", "AAPL", Side::BUY, "10", "5")).unwrap();
        first.submit(trade("2", "AAPL", Side::SELL, "12", "5")).unwrap();

        assert_eq!(first.total_pnl(), Decimal::from(10));
        assert_eq!(second.total_pnl(), Decimal::ZERO);
    }

    #[test]
    fn test_ledger_zero_quantity_does_not_panic() {
        let mut ledger = InventoryLedger::new();
        ledger.submit(trade("1", "AAPL", Side::BUY, "10", "0")).unwrap();
        let closed = ledger.submit(trade("2", "AAPL", Side::SELL, "12", "5")).unwrap();

        // The empty lot is matched for nothing and dropped
        assert_eq!(closed.len(), 1);
        assert!(closed[0].matched_quantity.is_zero());
        assert_eq!(ledger.net_position("AAPL"), Decimal::from(-5));
    }

    #[test]
    fn test_ledger_refuses_out_of_range_pnl() {
        let mut ledger = InventoryLedger::new();
        ledger.submit(trade("1", "X", Side::BUY, "0", "1e20")).unwrap();

        let err = ledger.submit(trade("2", "X", Side::SELL, "1e10", "1e20")).unwrap_err();
        assert_eq!(
            err,
            ProcessError::Overflow {
                symbol: "X".to_string(),
                time: "2".to_string(),
            }
        );

        // Nothing was applied
        assert_eq!(ledger.total_pnl(), Decimal::ZERO);
        assert_eq!(ledger.open_lots("X").unwrap().len(), 1);
        assert_eq!(ledger.net_position("X"), Decimal::from_scientific("1e20").unwrap());

        // An in-range trade still closes the lot
        let closed = ledger.submit(trade("3", "X", Side::SELL, "1", "1e20")).unwrap();
        assert_eq!(closed.len(), 1);
        assert_eq!(ledger.total_pnl(), Decimal::from_scientific("1e20").unwrap());
    }

    #[test]
    fn test_ledger_refuses_out_of_range_total() {
        let mut ledger = InventoryLedger::new();
        ledger.submit(trade("1", "X", Side::BUY, "0", "1e14")).unwrap();
        ledger.submit(trade("2", "X", Side::SELL, "5e14", "1e14")).unwrap();
        ledger.submit(trade("3", "Y", Side::BUY, "0", "1e14")).unwrap();

        let err = ledger.submit(trade("4", "Y", Side::SELL, "5e14", "1e14")).unwrap_err();
        assert!(matches!(err, ProcessError::Overflow { .. }));
        assert_eq!(ledger.total_pnl(), Decimal::from_scientific("5e28").unwrap());
        assert_eq!(ledger.net_position("Y"), Decimal::from_scientific("1e14").unwrap());
    }

    #[test]
    fn test_ledger_refuses_out_of_range_inventory() {
        let mut ledger = InventoryLedger::new();
        let huge = Decimal::MAX.to_string();
        ledger.submit(trade("1", "X", Side::BUY, "1", &huge)).unwrap();

        let err = ledger.submit(trade("2", "X", Side::BUY, "1", &huge)).unwrap_err();
        assert!(matches!(err, ProcessError::Overflow { .. }));
        assert_eq!(ledger.open_lots("X").unwrap().len(), 1);
    }

    #[test]
    fn test_ledger_unknown_symbol() {
        let ledger = InventoryLedger::new();
        assert!(ledger.open_lots("NOPE").is_none());
        assert_eq!(ledger.net_position("NOPE"), Decimal::ZERO);
    }
}
