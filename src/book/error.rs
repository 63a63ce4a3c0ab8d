//! Top-of-book error types

use thiserror::Error;

/// Errors that can occur when working with a `TopOfBook`.
///
/// Applying updates and taking snapshots cannot fail; stale updates are
/// dropped silently. The only fallible operation is claiming the writer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopOfBookError {
    /// Another `BookWriter` is already alive for this store
    #[error("writer already claimed for this book")]
    WriterAlreadyClaimed,
}
