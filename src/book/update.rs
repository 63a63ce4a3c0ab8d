//! Incoming top-of-book update record

use serde::{Deserialize, Serialize};

/// One market-data tick carrying a full best bid/ask level.
///
/// Updates are produced outside the store (a feed handler, a CSV replay) and
/// passed by value into [`TopOfBook::apply`](crate::TopOfBook::apply). The
/// serde field names match the replay file columns.
#[repr(C, align(64))]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct L1Update {
    /// Monotonic feed sequence number
    #[serde(rename = "seq")]
    pub sequence: u64,

    /// Best bid price
    #[serde(rename = "bid_px")]
    pub bid_price: f64,

    /// Quantity resting at the best bid
    #[serde(rename = "bid_sz")]
    pub bid_size: f64,

    /// Best ask price
    #[serde(rename = "ask_px")]
    pub ask_price: f64,

    /// Quantity resting at the best ask
    #[serde(rename = "ask_sz")]
    pub ask_size: f64,
}

impl L1Update {
    /// Create a new update
    pub fn new(sequence: u64, bid_price: f64, bid_size: f64, ask_price: f64, ask_size: f64) -> Self {
        Self {
            sequence,
            bid_price,
            bid_size,
            ask_price,
            ask_size,
        }
    }
}
