//! Multi-threaded tests for the seqlock contract: no torn snapshots,
//! monotonic observation per reader, and a single writer handle.

#[cfg(test)]
mod concurrency_tests {
    use l1_book::{L1Snapshot, L1Update, TopOfBook};
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use std::sync::{Arc, Barrier};
    use std::thread;

    const READERS: usize = 6;
    const WRITES: u64 = 200_000;

    /// Every field encodes the sequence, so a torn read shows up as a mismatch
    fn self_describing(sequence: u64) -> L1Update {
        let value = sequence as f64;
        L1Update::new(sequence, value, value + 0.25, value + 0.5, value + 0.75)
    }

    #[test]
    fn test_no_torn_snapshots_under_contention() {
        let book = Arc::new(TopOfBook::new());
        let barrier = Arc::new(Barrier::new(READERS + 1));
        let done = Arc::new(AtomicBool::new(false));
        let observed = Arc::new(AtomicU64::new(0));

        let mut handles = Vec::with_capacity(READERS);
        for _ in 0..READERS {
            let book = Arc::clone(&book);
            let barrier = Arc::clone(&barrier);
            let done = Arc::clone(&done);
            let observed = Arc::clone(&observed);

            handles.push(thread::spawn(move || {
                barrier.wait();
                let mut last_seen = 0u64;
                let mut reads = 0u64;

                loop {
                    let finished = done.load(Ordering::Acquire);
                    let snapshot = book.snapshot();
                    let base = snapshot.sequence as f64;

                    if snapshot.sequence == 0 {
                        assert_eq!(snapshot.bid_price, 0.0);
                        assert_eq!(snapshot.ask_size, 0.0);
                    } else {
                        assert_eq!(snapshot.bid_price, base, "torn bid price");
                        assert_eq!(snapshot.bid_size, base + 0.25, "torn bid size");
                        assert_eq!(snapshot.ask_price, base + 0.5, "torn ask price");
                        assert_eq!(snapshot.ask_size, base + 0.75, "torn ask size");
                    }
                    assert!(snapshot.sequence >= last_seen, "reader went back in time");

                    last_seen = snapshot.sequence;
                    reads += 1;
                    if finished {
                        break;
                    }
                }

                assert_eq!(last_seen, WRITES, "final read must see the last update");
                observed.fetch_add(reads, Ordering::Relaxed);
            }));
        }

        barrier.wait();
        for sequence in 1..=WRITES {
            book.apply(self_describing(sequence));
        }
        done.store(true, Ordering::Release);

        for handle in handles {
            handle.join().expect("reader thread panicked");
        }
        assert!(observed.load(Ordering::Relaxed) >= READERS as u64);
        assert_eq!(book.snapshot(), L1Snapshot::from(self_describing(WRITES)));
    }

    #[test]
    fn test_writer_handle_across_threads() {
        let book = Arc::new(TopOfBook::new());

        let writer_book = Arc::clone(&book);
        let writer = thread::spawn(move || {
            let mut writer = writer_book.try_writer().expect("only writer");
            for sequence in 1..=WRITES {
                writer.apply(self_describing(sequence));
            }
        });

        let poller_book = Arc::clone(&book);
        let poller = thread::spawn(move || {
            let mut last_seen = 0u64;
            let mut changes = 0u64;
            while last_seen < WRITES {
                if let Some(snapshot) = poller_book.snapshot_if_newer(last_seen) {
                    assert!(snapshot.sequence > last_seen);
                    assert_eq!(snapshot.bid_price, snapshot.sequence as f64);
                    last_seen = snapshot.sequence;
                    changes += 1;
                }
            }
            changes
        });

        writer.join().expect("writer thread panicked");
        let changes = poller.join().expect("poller thread panicked");

        assert!((1..=WRITES).contains(&changes));
        assert!(!book.has_writer(), "handle released when the writer thread ends");
    }

    #[test]
    fn test_out_of_order_stream_with_concurrent_readers() {
        let book = Arc::new(TopOfBook::new());
        let done = Arc::new(AtomicBool::new(false));

        let readers: Vec<_> = (0..2)
            .map(|_| {
                let book = Arc::clone(&book);
                let done = Arc::clone(&done);
                thread::spawn(move || {
                    let mut last_seen = 0u64;
                    while !done.load(Ordering::Acquire) {
                        let snapshot = book.snapshot();
                        assert!(snapshot.sequence >= last_seen);
                        if snapshot.sequence > 0 {
                            assert_eq!(snapshot.bid_price, snapshot.sequence as f64);
                        }
                        last_seen = snapshot.sequence;
                    }
                })
            })
            .collect();

        // Pairs arrive swapped: 2,1,4,3,... every odd sequence is late
        let mut stale = 0u64;
        for pair in 0..10_000u64 {
            for sequence in [pair * 2 + 2, pair * 2 + 1] {
                let before = book.sequence();
                book.apply(self_describing(sequence));
                if book.sequence() == before {
                    stale += 1;
                }
            }
        }
        done.store(true, Ordering::Release);

        for reader in readers {
            reader.join().expect("reader thread panicked");
        }
        assert_eq!(stale, 10_000);
        assert_eq!(book.sequence(), 20_000);
    }

    #[test]
    fn test_reset_between_runs() {
        let mut book = TopOfBook::new();

        for _run in 0..3 {
            let shared = Arc::new(book);
            let writer_book = Arc::clone(&shared);
            thread::spawn(move || {
                for sequence in 1..=1_000 {
                    writer_book.apply(self_describing(sequence));
                }
            })
            .join()
            .expect("writer thread panicked");

            book = Arc::try_unwrap(shared).expect("writer thread released its handle");
            assert_eq!(book.sequence(), 1_000);
            book.reset();
            assert_eq!(book.sequence(), 0);
        }
    }
}
