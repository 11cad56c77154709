//! PnL Engine Service
//!
//! Realized profit-and-loss over a time-ordered trade stream, using FIFO lot
//! matching per symbol.
//!
//! **Key Invariants:**
//! - A symbol's open lots are all on one side
//! - Oldest lot is always consumed first
//! - Conservation of quantity (exact decimal arithmetic, no rounding)
//! - Running PnL equals the sum of every emitted closed trade's PnL
//!
//! The engine performs no I/O and is single-writer: callers serialize
//! submissions.

pub mod inventory;
pub mod matching;
pub mod ledger;
pub mod guard;
pub mod processor;

pub use guard::OrderingCheck;
pub use ledger::InventoryLedger;
pub use processor::{ClosedTradeSink, NullSink, ProcessorConfig, TradeProcessor};
