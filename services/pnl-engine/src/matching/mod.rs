//! Matching logic module
//!
//! Implements FIFO lot matching and PnL realization

pub mod crossing;
pub mod realizer;

pub use crossing::closes;
pub use realizer::realize;
