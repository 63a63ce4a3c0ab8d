use criterion::{criterion_group, criterion_main};

mod book;

use book::register_benchmarks as register_book_benchmarks;
use concurrent::register_benchmarks as register_concurrent_benchmarks;

criterion_group!(
    benches,
    register_book_benchmarks,
    register_concurrent_benchmarks,
);

criterion_main!(benches);
