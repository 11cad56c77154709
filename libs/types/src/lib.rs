//! Types library for the FIFO PnL ledger
//!
//! This library provides the core type definitions shared by the ledger
//! engine and the reporting tool, keeping every price, quantity and PnL
//! figure in exact decimal arithmetic.
//!
//! # Modules
//! - `ids`: Identifiers and ordering keys (Symbol, TradeTime)
//! - `numeric`: Fixed-point decimal types (Price, Quantity)
//! - `side`: Trade direction
//! - `trade`: Input trades and realized closed trades
//! - `errors`: Error taxonomy

// Public modules
pub mod ids;
pub mod numeric;
pub mod side;
pub mod trade;
pub mod errors;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::numeric::*;
    pub use crate::side::*;
    pub use crate::trade::*;
    pub use crate::errors::*;
}
