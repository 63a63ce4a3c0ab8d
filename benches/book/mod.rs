pub mod snapshot;

pub fn register_benchmarks(c: &mut criterion::Criterion) {
    apply::register_benchmarks(c);
    snapshot::register_benchmarks(c);
    replay::register_benchmarks(c);
}
