//! Synthetic L1 feed with occasional late packets

use crate::book::L1Update;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Parameters of a synthetic update stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Number of updates to produce
    pub count: usize,

    /// Probability, per update, that it is delayed behind a later one
    pub reorder_rate: f64,

    /// Largest distance a delayed update can slip
    pub max_gap: usize,

    /// Chance of growing the slip by one more position
    pub gap_decay: f64,

    /// RNG seed; `None` draws one from the OS
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            count: 100_000,
            reorder_rate: 5e-4,
            max_gap: 3,
            gap_decay: 0.4,
            seed: None,
        }
    }
}

/// How disordered a stream is
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutOfOrderSummary {
    /// Updates whose sequence is below the highest seen before them
    pub count: usize,

    /// Mean distance below that high-water mark
    pub average_lag: f64,
}

/// Generate a random-walk top-of-book stream in arrival order.
///
/// Sequences run from 0 to `count - 1`. Prices walk from 100.00 in steps of at
/// most one cent with a one-cent spread; sizes are whole numbers in 1..=100.
/// Some updates are then swapped with a later neighbour so that they arrive
/// late.
///
/// `reorder_rate` and `gap_decay` are clamped to `[0.0, 1.0]`; NaN counts
/// as 0.0, so it never reorders.
pub fn generate_updates(config: &GeneratorConfig) -> Vec<L1Update> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut price = 100.0f64;
    let mut updates: Vec<L1Update> = (0..config.count)
        .map(|sequence| {
            price += rng.gen_range(-0.01..=0.01);
            L1Update {
                sequence: sequence as u64,
                bid_price: round_cents(price),
                bid_size: rng.gen_range(1..=100) as f64,
                ask_price: round_cents(price + 0.01),
                ask_size: rng.gen_range(1..=100) as f64,
            }
        })
        .collect();

    let n = updates.len();
    let mut swaps = 0usize;
    let mut i = 0;
    while i < n {
        if rng.gen_bool(probability(config.reorder_rate)) {
            let mut gap = 1;
            while gap < config.max_gap && rng.gen_bool(probability(config.gap_decay)) {
                gap += 1;
            }
            let j = (i + gap).min(n - 1);
            updates.swap(i, j);
            swaps += 1;
            i += gap;
        }
        i += 1;
    }

    debug!("Generated {} updates with {} delayed packets", n, swaps);
    updates
}

/// Count updates that arrive after a higher sequence number has been seen
pub fn count_out_of_order(updates: &[L1Update]) -> OutOfOrderSummary {
    let mut highest: Option<u64> = None;
    let mut count = 0usize;
    let mut total_lag = 0u64;

    for update in updates {
        match highest {
            Some(high) if update.sequence < high => {
                count += 1;
                total_lag += high - update.sequence;
            }
            _ => highest = Some(update.sequence),
        }
    }

    let average_lag = if count == 0 {
        0.0
    } else {
        total_lag as f64 / count as f64
    };
    OutOfOrderSummary { count, average_lag }
}

fn probability(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
