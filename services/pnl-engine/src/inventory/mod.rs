//! Inventory infrastructure module
//!
//! Contains the per-symbol open-lot queue.

pub mod lot_queue;

pub use lot_queue::LotQueue;
