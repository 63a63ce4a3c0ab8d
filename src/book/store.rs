//! Seqlock-backed top-of-book store for a single instrument

use super::error::TopOfBookError;
use super::snapshot::L1Snapshot;
use super::update::L1Update;
use super::writer::BookWriter;
use crossbeam::utils::CachePadded;
use std::fmt;
use std::hint;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering, fence};
use tracing::trace;

/// Counter line: touched by the writer on every accepted update and by every
/// reader on every snapshot.
struct Counter {
    /// Seqlock generation, odd while the writer is in the middle of an update
    generation: AtomicU64,

    /// Sequence number of the last accepted update
    sequence: AtomicU64,
}

/// Field line: the four prices and sizes as `f64` bit patterns.
struct Fields {
    bid_price: AtomicU64,
    bid_size: AtomicU64,
    ask_price: AtomicU64,
    ask_size: AtomicU64,
}

/// Latest best bid/ask for one instrument, shared between one writer and any
/// number of readers.
///
/// The writer calls [`apply`](Self::apply) for every tick; an update is
/// accepted only if its sequence number is strictly greater than the current
/// one, otherwise it is dropped without side effects. Readers call
/// [`snapshot`](Self::snapshot), which never blocks and never returns a mix of
/// fields from two different updates.
///
/// Only one thread may write at a time. This is not checked by `apply`; use
/// [`try_writer`](Self::try_writer) to get a handle that enforces it.
pub struct TopOfBook {
    counter: CachePadded<Counter>,
    fields: CachePadded<Fields>,

    /// Set while a `BookWriter` is alive
    writer_claimed: AtomicBool,
}

impl TopOfBook {
    /// Create an empty store (sequence 0, every field 0.0)
    pub fn new() -> Self {
        Self {
            counter: CachePadded::new(Counter {
                generation: AtomicU64::new(0),
                sequence: AtomicU64::new(0),
            }),
            fields: CachePadded::new(Fields {
                bid_price: AtomicU64::new(0.0f64.to_bits()),
                bid_size: AtomicU64::new(0.0f64.to_bits()),
                ask_price: AtomicU64::new(0.0f64.to_bits()),
                ask_size: AtomicU64::new(0.0f64.to_bits()),
            }),
            writer_claimed: AtomicBool::new(false),
        }
    }

    /// Apply an update if it is newer than the current state.
    ///
    /// Updates whose sequence is less than or equal to the current one are
    /// stale, duplicated or out of order and are silently discarded; the
    /// first update seen for a given sequence number wins.
    ///
    /// Must not be called from more than one thread concurrently.
    #[inline]
    pub fn apply(&self, update: L1Update) {
        let current = self.counter.sequence.load(Ordering::Relaxed);
        if update.sequence <= current {
            trace!(
                "Rejecting stale update {} (current sequence {})",
                update.sequence, current
            );
            return;
        }

        let generation = self.counter.generation.load(Ordering::Relaxed);
        self.counter
            .generation
            .store(generation.wrapping_add(1), Ordering::Relaxed);
        // Field stores below must not become visible before the odd generation
        fence(Ordering::Release);

        self.fields
            .bid_price
            .store(update.bid_price.to_bits(), Ordering::Relaxed);
        self.fields
            .bid_size
            .store(update.bid_size.to_bits(), Ordering::Relaxed);
        self.fields
            .ask_price
            .store(update.ask_price.to_bits(), Ordering::Relaxed);
        self.fields
            .ask_size
            .store(update.ask_size.to_bits(), Ordering::Relaxed);

        self.counter
            .sequence
            .store(update.sequence, Ordering::Release);
        self.counter
            .generation
            .store(generation.wrapping_add(2), Ordering::Release);
    }

    /// Take a consistent copy of the current state.
    ///
    /// Retries while the writer is mid-update or has moved on during the
    /// read. Lock-free, not wait-free: a writer that never pauses could in
    /// theory keep a reader spinning.
    pub fn snapshot(&self) -> L1Snapshot {
        loop {
            let before = self.counter.generation.load(Ordering::Acquire);
            if before & 1 == 1 {
                hint::spin_loop();
                continue;
            }

            let snapshot = L1Snapshot {
                sequence: self.counter.sequence.load(Ordering::Relaxed),
                bid_price: f64::from_bits(self.fields.bid_price.load(Ordering::Relaxed)),
                bid_size: f64::from_bits(self.fields.bid_size.load(Ordering::Relaxed)),
                ask_price: f64::from_bits(self.fields.ask_price.load(Ordering::Relaxed)),
                ask_size: f64::from_bits(self.fields.ask_size.load(Ordering::Relaxed)),
            };

            fence(Ordering::Acquire);
            let after = self.counter.generation.load(Ordering::Relaxed);
            if before == after {
                return snapshot;
            }

            trace!("Snapshot raced writer (generation {} -> {}), retrying", before, after);
            hint::spin_loop();
        }
    }

    /// Snapshot only if something newer than `last_seen` has been accepted.
    ///
    /// The returned snapshot may be more recent than the sequence that made
    /// the poll succeed.
    pub fn snapshot_if_newer(&self, last_seen: u64) -> Option<L1Snapshot> {
        if self.sequence() <= last_seen {
            return None;
        }
        Some(self.snapshot())
    }

    /// Sequence number of the last accepted update (0 if none)
    #[inline]
    pub fn sequence(&self) -> u64 {
        self.counter.sequence.load(Ordering::Relaxed)
    }

    /// Best bid price, read without any consistency check.
    ///
    /// Two accessor calls may observe different updates; use
    /// [`snapshot`](Self::snapshot) when the fields must agree.
    #[inline]
    pub fn best_bid_price(&self) -> f64 {
        f64::from_bits(self.fields.bid_price.load(Ordering::Relaxed))
    }

    /// Best bid size, unsynchronized (see [`best_bid_price`](Self::best_bid_price))
    #[inline]
    pub fn best_bid_size(&self) -> f64 {
        f64::from_bits(self.fields.bid_size.load(Ordering::Relaxed))
    }

    /// Best ask price, unsynchronized (see [`best_bid_price`](Self::best_bid_price))
    #[inline]
    pub fn best_ask_price(&self) -> f64 {
        f64::from_bits(self.fields.ask_price.load(Ordering::Relaxed))
    }

    /// Best ask size, unsynchronized (see [`best_bid_price`](Self::best_bid_price))
    #[inline]
    pub fn best_ask_size(&self) -> f64 {
        f64::from_bits(self.fields.ask_size.load(Ordering::Relaxed))
    }

    /// Return the store to its initial state: sequence 0 and every field 0.0.
    ///
    /// Taking `&mut self` guarantees no reader, writer or `BookWriter` is
    /// active while this runs.
    pub fn reset(&mut self) {
        *self.counter.generation.get_mut() = 0;
        *self.counter.sequence.get_mut() = 0;
        *self.fields.bid_price.get_mut() = 0.0f64.to_bits();
        *self.fields.bid_size.get_mut() = 0.0f64.to_bits();
        *self.fields.ask_price.get_mut() = 0.0f64.to_bits();
        *self.fields.ask_size.get_mut() = 0.0f64.to_bits();
        trace!("Top of book reset");
    }

    /// Claim the exclusive writer handle for this store.
    ///
    /// At most one `BookWriter` exists at a time; the claim is released when
    /// the handle is dropped.
    pub fn try_writer(&self) -> Result<BookWriter<'_>, TopOfBookError> {
        self.writer_claimed
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .map_err(|_| TopOfBookError::WriterAlreadyClaimed)?;
        trace!("Writer claimed");
        Ok(BookWriter::new(self))
    }

    /// Whether a `BookWriter` is currently alive
    pub fn has_writer(&self) -> bool {
        self.writer_claimed.load(Ordering::Relaxed)
    }

    pub(super) fn release_writer(&self) {
        self.writer_claimed.store(false, Ordering::Release);
        trace!("Writer released");
    }
}

impl Default for TopOfBook {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TopOfBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TopOfBook")
            .field("snapshot", &self.snapshot())
            .field("has_writer", &self.has_writer())
            .finish()
    }
}
