//! Trade input and realized-trade output types
//!
//! A `Trade` is submitted once and owned by the ledger afterwards; its
//! `quantity` is the only field that changes, shrinking as it is matched.
//! A `ClosedTrade` records one match between an open lot and a closing
//! trade and is never mutated after creation.

use crate::ids::{Symbol, TradeTime};
use crate::numeric::{to_fixed, Price, Quantity};
use crate::side::Side;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fraction digits for PnL and prices in the rendered row
pub const ROW_DECIMALS: u32 = 4;

/// Incoming trade (and, once retained, an open lot remnant)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub time: TradeTime,
    pub symbol: Symbol,
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
}

impl Trade {
    pub fn new(
        time: impl Into<TradeTime>,
        symbol: impl Into<Symbol>,
        side: Side,
        price: Price,
        quantity: Quantity,
    ) -> Self {
        Self {
            time: time.into(),
            symbol: symbol.into(),
            side,
            price,
            quantity,
        }
    }
}

/// One realized match between an open lot and a closing trade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosedTrade {
    pub open_time: TradeTime,
    pub close_time: TradeTime,
    pub symbol: Symbol,
    pub matched_quantity: Quantity,
    pub pnl: Decimal,
    /// Side of the older (opening) trade
    pub opened_side: Side,
    pub open_price: Price,
    pub close_price: Price,
}

impl ClosedTrade {
    /// Side of the closing trade
    pub fn closed_side(&self) -> Side {
        self.opened_side.opposite()
    }
}

/// Renders the comma-separated report row:
/// `open_time,close_time,symbol,quantity,pnl,open_side,close_side,open_price,close_price`
impl fmt::Display for ClosedTrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{},{},{},{},{}",
            self.open_time,
            self.close_time,
            self.symbol,
            self.matched_quantity,
            to_fixed(self.pnl, ROW_DECIMALS),
            self.opened_side.code(),
            self.closed_side().code(),
            to_fixed(self.open_price.as_decimal(), ROW_DECIMALS),
            to_fixed(self.close_price.as_decimal(), ROW_DECIMALS),
        )
    }
}
