//! Consistent top-of-book snapshot handed out to readers

use super::update::L1Update;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// An internally consistent copy of the book at one accepted sequence number.
///
/// A snapshot never refers back into the store: it is a plain value that fits
/// in a single cache line, so handing it across threads is a 64-byte copy.
#[repr(C, align(64))]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct L1Snapshot {
    /// Sequence number of the update these fields came from (0 if none yet)
    pub sequence: u64,

    /// Best bid price
    pub bid_price: f64,

    /// Quantity resting at the best bid
    pub bid_size: f64,

    /// Best ask price
    pub ask_price: f64,

    /// Quantity resting at the best ask
    pub ask_size: f64,
}

impl L1Snapshot {
    /// True when no update has been accepted yet
    pub fn is_empty(&self) -> bool {
        self.sequence == 0
    }

    /// Get the mid price (average of best bid and best ask)
    pub fn mid_price(&self) -> Option<f64> {
        let mid_price = if self.is_empty() {
            None
        } else {
            Some((self.bid_price + self.ask_price) / 2.0)
        };
        trace!("mid_price: {:?}", mid_price);
        mid_price
    }

    /// Get the spread (best ask - best bid)
    pub fn spread(&self) -> Option<f64> {
        let spread = if self.is_empty() {
            None
        } else {
            Some(self.ask_price - self.bid_price)
        };
        trace!("spread: {:?}", spread);
        spread
    }

    /// Size imbalance at the top level, in `[-1.0, 1.0]`.
    ///
    /// Positive values mean more size on the bid. Returns `None` for an empty
    /// snapshot or when both sizes are zero.
    pub fn imbalance(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        let total = self.bid_size + self.ask_size;
        let imbalance = if total > 1e-9 {
            Some((self.bid_size - self.ask_size) / total)
        } else {
            None
        };
        trace!("imbalance: {:?}", imbalance);
        imbalance
    }
}

impl From<L1Update> for L1Snapshot {
    fn from(update: L1Update) -> Self {
        Self {
            sequence: update.sequence,
            bid_price: update.bid_price,
            bid_size: update.bid_size,
            ask_price: update.ask_price,
            ask_size: update.ask_size,
        }
    }
}

impl From<L1Snapshot> for L1Update {
    fn from(snapshot: L1Snapshot) -> Self {
        Self {
            sequence: snapshot.sequence,
            bid_price: snapshot.bid_price,
            bid_size: snapshot.bid_size,
            ask_price: snapshot.ask_price,
            ask_size: snapshot.ask_size,
        }
    }
}
