//! Replay harness: load or generate update streams and push them through a
//! `TopOfBook`, measuring staleness and throughput.

mod error;
pub mod generator;
pub mod loader;
pub mod runner;

pub use error::ReplayError;
pub use generator::{GeneratorConfig, OutOfOrderSummary, count_out_of_order, generate_updates};
pub use loader::{load_csv, load_from_reader, write_csv};
pub use runner::{ReplayStats, replay};
