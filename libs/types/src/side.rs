//! Trade direction

use serde::{Deserialize, Serialize};
use std::fmt;

/// Trade side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy: opens or extends a long, or covers a short
    BUY,
    /// Sell: opens or extends a short, or closes a long
    SELL,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::BUY => Side::SELL,
            Side::SELL => Side::BUY,
        }
    }

    /// Single-character wire code ("B" / "S")
    pub fn code(&self) -> char {
        match self {
            Side::BUY => 'B',
            Side::SELL => 'S',
        }
    }

    /// Parse a wire code. Exact match only; anything else is unknown.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "B" => Some(Side::BUY),
            "S" => Some(Side::SELL),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
