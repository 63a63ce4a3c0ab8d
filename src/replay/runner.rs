//! Timed replay of an update stream into a `TopOfBook`

use super::error::ReplayError;
use crate::book::{L1Snapshot, L1Update, TopOfBook};
use crate::utils::current_time_millis;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Outcome of one replay run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayStats {
    /// Updates fed to the book
    pub total: usize,

    /// Updates rejected as stale, duplicated or out of order
    pub stale: usize,

    /// Wall time spent in the apply loop
    pub elapsed: Duration,

    /// Updates per second over `elapsed`
    pub throughput: f64,

    /// Book state after the last update
    pub final_snapshot: L1Snapshot,

    /// When the run finished (milliseconds since epoch)
    pub timestamp: u64,
}

impl ReplayStats {
    /// Updates that moved the book forward
    pub fn accepted(&self) -> usize {
        self.total - self.stale
    }

    /// Fraction of updates rejected, 0.0 for an empty run
    pub fn stale_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.stale as f64 / self.total as f64
        }
    }
}

/// Apply `updates` in order and measure how many the book rejected.
///
/// The replay claims the book's writer handle for its whole duration, so it
/// fails if another writer is active. An update counts as stale when the
/// book's sequence is unchanged by it.
pub fn replay(book: &TopOfBook, updates: &[L1Update]) -> Result<ReplayStats, ReplayError> {
    let mut writer = book.try_writer()?;
    debug!("Replaying {} updates from sequence {}", updates.len(), writer.sequence());

    let mut stale = 0usize;
    let start = Instant::now();
    for update in updates {
        let before = writer.sequence();
        writer.apply(*update);
        if writer.sequence() == before {
            stale += 1;
        }
    }
    let elapsed = start.elapsed();
    drop(writer);

    let seconds = elapsed.as_secs_f64();
    let throughput = if seconds > 0.0 {
        updates.len() as f64 / seconds
    } else {
        0.0
    };

    let stats = ReplayStats {
        total: updates.len(),
        stale,
        elapsed,
        throughput,
        final_snapshot: book.snapshot(),
        timestamp: current_time_millis(),
    };
    info!(
        "Replay done: {} updates, {} stale, {:.0} msgs/s",
        stats.total, stats.stale, stats.throughput
    );
    Ok(stats)
}

impl fmt::Display for ReplayStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const RULE: &str = "--------------------------------------------------";
        let snap = &self.final_snapshot;

        writeln!(f, "RESULTS")?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "Total updates applied : {}", self.total)?;
        writeln!(
            f,
            "Stale / out-of-order  : {}  ({:.6}%)",
            self.stale,
            100.0 * self.stale_ratio()
        )?;
        writeln!(f, "Elapsed time          : {:.6} s", self.elapsed.as_secs_f64())?;
        writeln!(f, "Throughput (msgs/s)   : {:.6}", self.throughput)?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "Final snapshot")?;
        writeln!(f, "  seq     : {}", snap.sequence)?;
        writeln!(f, "  bid px  : {:.6}  sz: {:.6}", snap.bid_price, snap.bid_size)?;
        writeln!(f, "  ask px  : {:.6}  sz: {:.6}", snap.ask_price, snap.ask_size)?;
        write!(f, "{RULE}")
    }
}
