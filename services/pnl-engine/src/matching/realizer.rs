//! PnL realization
//!
//! Turns one match between the oldest open lot and a closing trade into a
//! `ClosedTrade` with its signed realized PnL.

use rust_decimal::Decimal;
use types::numeric::Quantity;
use types::side::Side;
use types::trade::{ClosedTrade, Trade};

/// Realized PnL for `matched` units of `open` closed by `close`
///
/// Profit is quantity × (sell price − buy price). The open lot is always the
/// earlier trade, so a closing sell earns `close − open` and a closing buy
/// (covering a short) earns `open − close`. Returns None when the result
/// does not fit in a `Decimal`.
pub fn realized_pnl(open: &Trade, close: &Trade, matched: Quantity) -> Option<Decimal> {
    let (sell, buy) = match close.side {
        Side::SELL => (close.price, open.price),
        Side::BUY => (open.price, close.price),
    };
    let spread = sell.as_decimal().checked_sub(buy.as_decimal())?;
    matched.as_decimal().checked_mul(spread)
}

/// Build the closed-trade record for one lot match
pub fn realize(open: &Trade, close: &Trade, matched: Quantity) -> Option<ClosedTrade> {
    Some(ClosedTrade {
        open_time: open.time.clone(),
        close_time: close.time.clone(),
        symbol: close.symbol.clone(),
        matched_quantity: matched,
        pnl: realized_pnl(open, close, matched)?,
        opened_side: open.side,
        open_price: open.price,
        close_price: close.price,
    })
}
