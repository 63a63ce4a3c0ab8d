use criterion::Criterion;
use l1_book::{L1Update, TopOfBook};
use std::hint::black_box;

/// Reader path without a competing writer
pub fn register_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("TopOfBook - Read");

    let book = TopOfBook::new();
    book.apply(L1Update::new(1, 100.0, 10.0, 100.01, 8.0));

    group.bench_function("snapshot", |b| b.iter(|| black_box(book.snapshot())));

    group.bench_function("sequence", |b| b.iter(|| black_box(book.sequence())));

    group.bench_function("snapshot_if_newer_unchanged", |b| {
        b.iter(|| black_box(book.snapshot_if_newer(black_box(1))))
    });

    group.bench_function("field_accessors", |b| {
        b.iter(|| {
            black_box(book.best_bid_price());
            black_box(book.best_bid_size());
            black_box(book.best_ask_price());
            black_box(book.best_ask_size());
        })
    });

    group.finish();
}
