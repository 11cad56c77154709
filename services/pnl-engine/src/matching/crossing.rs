//! Side crossing logic
//!
//! Determines whether an incoming trade closes open inventory

use types::side::Side;

/// Check if an incoming trade closes inventory held on `open_side`
///
/// Only opposite sides match. Same-direction trades extend the position
/// and never realize PnL.
#[inline]
pub fn closes(open_side: Side, incoming_side: Side) -> bool {
    open_side != incoming_side
}
