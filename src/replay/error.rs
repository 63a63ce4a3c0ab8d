//! Replay error types

use crate::book::TopOfBookError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, writing or replaying update files
#[derive(Debug, Error)]
pub enum ReplayError {
    /// The file could not be opened, created or read
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// File involved in the failed operation
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A header or row could not be parsed or written
    #[error("malformed update data: {0}")]
    Csv(#[from] csv::Error),

    /// A row has a different number of fields than the header
    #[error("row on line {line} has {found} fields, header has {expected}")]
    RowLength {
        /// 1-based line number of the row
        line: u64,
        /// Number of header columns
        expected: usize,
        /// Number of fields in the row
        found: usize,
    },

    /// The target book already has a writer
    #[error(transparent)]
    Book(#[from] TopOfBookError),
}
