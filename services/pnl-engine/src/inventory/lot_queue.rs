//! Open-lot queue with FIFO ordering
//!
//! A lot queue holds every open lot for one symbol. Lots are kept in
//! arrival order so the oldest lot is always consumed first, and all lots
//! in a queue share one side: a queue is drained empty before it can flip.

use std::collections::VecDeque;
use types::numeric::Quantity;
use types::side::Side;
use types::trade::Trade;

/// Open inventory for a single symbol
#[derive(Debug, Clone, Default)]
pub struct LotQueue {
    /// Open lots, oldest first
    lots: VecDeque<Trade>,
    /// Total remaining quantity across all lots
    total_quantity: Quantity,
}

impl LotQueue {
    /// Create a new empty queue
    pub fn new() -> Self {
        Self {
            lots: VecDeque::new(),
            total_quantity: Quantity::zero(),
        }
    }

    /// Append a lot at the back of the queue (time priority)
    pub fn push_back(&mut self, lot: Trade) {
        self.total_quantity = self.total_quantity + lot.quantity;
        self.lots.push_back(lot);
    }

    /// Peek at the oldest open lot
    pub fn front(&self) -> Option<&Trade> {
        self.lots.front()
    }

    /// Consume `quantity` from the oldest lot
    ///
    /// The lot is removed once its remnant is no longer positive. Returns
    /// the removed lot, if any.
    pub fn fill_front(&mut self, quantity: Quantity) -> Option<Trade> {
        let entry = self.lots.front_mut()?;
        entry.quantity = entry.quantity - quantity;
        self.total_quantity = self.total_quantity - quantity;

        if entry.quantity.is_positive() {
            None
        } else {
            self.lots.pop_front()
        }
    }

    /// Side shared by every lot in the queue, or None when flat
    pub fn side(&self) -> Option<Side> {
        self.lots.front().map(|lot| lot.side)
    }

    /// Check if the queue is empty
    pub fn is_empty(&self) -> bool {
        self.lots.is_empty()
    }

    /// Number of open lots
    pub fn len(&self) -> usize {
        self.lots.len()
    }

    /// Get the total open quantity
    pub fn total_quantity(&self) -> Quantity {
        self.total_quantity
    }

    /// Iterate open lots, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Trade> {
        self.lots.iter()
    }

    /// True if no two lots in the queue have different sides
    pub fn is_single_sided(&self) -> bool {
        match self.side() {
            Some(side) => self.lots.iter().all(|lot| lot.side == side),
            None => true,
        }
    }
}
