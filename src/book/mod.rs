//! Top-of-book store: one writer, many readers, torn-free snapshots.

mod error;
mod snapshot;
pub mod store;
mod update;
mod writer;

pub use error::TopOfBookError;
pub use snapshot::L1Snapshot;
pub use store::TopOfBook;
pub use update::L1Update;
pub use writer::BookWriter;
