//! # Lock-Free Top-of-Book Store
//!
//! A single-writer, multi-reader store for the best bid and ask of one
//! trading instrument. One thread pushes market-data ticks at full speed while
//! any number of other threads take consistent snapshots, with no lock on
//! either side.
//!
//! ## Key Features
//!
//! - **Wait-Free Writer**: [`TopOfBook::apply`] is a handful of atomic stores. It never
//!   blocks, allocates or retries.
//!
//! - **Lock-Free Readers**: [`TopOfBook::snapshot`] uses a seqlock. A reader that races the
//!   writer simply re-reads; it never sees bid fields from one tick and ask fields from another.
//!
//! - **Sequence Ordering**: An update is accepted only if its sequence number is strictly greater
//!   than the current one. Duplicates, late packets and replays are dropped silently, and the
//!   first update for a given sequence number wins.
//!
//! - **Cache-Line Layout**: Snapshots are 64-byte values. Inside the store the counter and the
//!   price/size fields live on separate cache lines.
//!
//! - **Exclusive Writer Handle**: [`TopOfBook::try_writer`] hands out a [`BookWriter`] that
//!   guarantees a single writer at runtime, for callers that want more than a convention.
//!
//! - **Replay Harness**: The [`replay`] module loads CSV tick files, generates synthetic
//!   streams with late packets, and measures staleness and throughput.
//!
//! ## Protocol
//!
//! The writer bumps a private generation counter to an odd value, stores the four fields, then
//! publishes the new sequence number and an even generation with release ordering. A reader
//! acquire-loads the generation, copies the fields, and loads the generation again after an
//! acquire fence; if the two values differ, or the first one was odd, it retries.
//!
//! ## Threading Rules
//!
//! - Exactly one thread may call [`TopOfBook::apply`] at a time. This is not checked unless
//!   you go through [`BookWriter`].
//! - [`TopOfBook::reset`] takes `&mut self`, so it can only run when nothing else holds the store.
//! - The single-field accessors such as [`TopOfBook::best_bid_price`] do not check the
//!   sequence and may observe fields from different updates.
//!
//! ## Example
//!
//! ```
//! use l1_book::{L1Update, TopOfBook};
//! use std::sync::Arc;
//! use std::thread;
//!
//! let book = Arc::new(TopOfBook::new());
//!
//! let writer_book = Arc::clone(&book);
//! let writer = thread::spawn(move || {
//!     for sequence in 1..=1_000u64 {
//!         let price = 100.0 + sequence as f64 * 0.01;
//!         writer_book.apply(L1Update::new(sequence, price, 10.0, price + 0.01, 8.0));
//!     }
//! });
//!
//! let snapshot = book.snapshot();
//! assert!(snapshot.sequence <= 1_000);
//!
//! writer.join().unwrap();
//! assert_eq!(book.sequence(), 1_000);
//! ```
//!
//! ## Status
//! This project is currently in active development and is not yet suitable for production use.

pub mod book;
pub mod replay;

mod utils;

pub use book::{BookWriter, L1Snapshot, L1Update, TopOfBook, TopOfBookError};
pub use utils::{current_time_millis, setup_logger};
