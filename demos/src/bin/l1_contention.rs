use anyhow::{Result, anyhow};
use clap::Parser;
use l1_book::{L1Update, TopOfBook, setup_logger};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// One writer, N readers hammering the same top of book
#[derive(Parser, Debug)]
#[command(name = "l1-contention", about = "Measure writer and reader throughput on a shared top of book")]
struct Cli {
    /// Number of reader threads
    #[arg(long, default_value_t = 4)]
    readers: usize,

    /// Test duration in milliseconds
    #[arg(long, default_value_t = 3_000)]
    duration_ms: u64,
}

struct ReaderReport {
    snapshots: u64,
    distinct: u64,
    torn: u64,
}

fn main() -> Result<()> {
    setup_logger();
    let cli = Cli::parse();
    info!("Top-of-book contention test");
    info!("----------------------------------------");
    info!("Readers: {}", cli.readers);
    info!("Duration: {} ms", cli.duration_ms);

    let book = Arc::new(TopOfBook::new());
    let barrier = Arc::new(Barrier::new(cli.readers + 2));
    let running = Arc::new(AtomicBool::new(true));

    let writer_book = Arc::clone(&book);
    let writer_barrier = Arc::clone(&barrier);
    let writer_running = Arc::clone(&running);
    let writer = thread::spawn(move || -> Result<u64> {
        writer_barrier.wait();
        let mut writer = writer_book
            .try_writer()
            .map_err(|err| anyhow!("claiming writer: {err}"))?;

        let mut sequence = 0u64;
        while writer_running.load(Ordering::Relaxed) {
            sequence += 1;
            // Every field carries the sequence so readers can detect tearing
            let value = sequence as f64;
            writer.apply(L1Update::new(sequence, value, value, value, value));
        }
        Ok(sequence)
    });

    let readers: Vec<_> = (0..cli.readers)
        .map(|_| {
            let thread_book = Arc::clone(&book);
            let thread_barrier = Arc::clone(&barrier);
            let thread_running = Arc::clone(&running);

            thread::spawn(move || {
                thread_barrier.wait();
                let mut report = ReaderReport {
                    snapshots: 0,
                    distinct: 0,
                    torn: 0,
                };
                let mut last_seen = 0u64;

                while thread_running.load(Ordering::Relaxed) {
                    let snapshot = thread_book.snapshot();
                    let expected = snapshot.sequence as f64;
                    if snapshot.bid_price != expected
                        || snapshot.bid_size != expected
                        || snapshot.ask_price != expected
                        || snapshot.ask_size != expected
                    {
                        report.torn += 1;
                    }
                    if snapshot.sequence != last_seen {
                        report.distinct += 1;
                        last_seen = snapshot.sequence;
                    }
                    report.snapshots += 1;
                }
                report
            })
        })
        .collect();

    barrier.wait();
    let start = Instant::now();
    thread::sleep(Duration::from_millis(cli.duration_ms));
    running.store(false, Ordering::Relaxed);
    let elapsed = start.elapsed().as_secs_f64();

    let writes = writer
        .join()
        .map_err(|_| anyhow!("writer thread panicked"))??;

    let mut total_snapshots = 0u64;
    let mut total_torn = 0u64;
    for (index, reader) in readers.into_iter().enumerate() {
        let report = reader
            .join()
            .map_err(|_| anyhow!("reader thread {index} panicked"))?;
        info!(
            "Reader {}: {} snapshots ({:.2} M/s), {} distinct states seen",
            index,
            report.snapshots,
            report.snapshots as f64 / elapsed / 1e6,
            report.distinct
        );
        total_snapshots += report.snapshots;
        total_torn += report.torn;
    }

    info!("----------------------------------------");
    info!("Writes: {} ({:.2} M/s)", writes, writes as f64 / elapsed / 1e6);
    info!(
        "Snapshots: {} ({:.2} M/s)",
        total_snapshots,
        total_snapshots as f64 / elapsed / 1e6
    );
    info!("Final snapshot: {:?}", book.snapshot());
    if total_torn > 0 {
        warn!("Torn snapshots observed: {}", total_torn);
    } else {
        info!("Torn snapshots observed: 0");
    }

    Ok(())
}
