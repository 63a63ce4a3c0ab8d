//! Exclusive writer capability for a `TopOfBook`

use super::store::TopOfBook;
use super::update::L1Update;

/// Handle proving its holder is the only writer of a [`TopOfBook`].
///
/// Obtained from [`TopOfBook::try_writer`]. Not `Clone`; dropping it lets
/// another thread claim the store.
#[derive(Debug)]
pub struct BookWriter<'a> {
    book: &'a TopOfBook,
}

impl<'a> BookWriter<'a> {
    pub(super) fn new(book: &'a TopOfBook) -> Self {
        Self { book }
    }

    /// Apply an update through the exclusive handle
    #[inline]
    pub fn apply(&mut self, update: L1Update) {
        self.book.apply(update);
    }

    /// Sequence number of the last accepted update
    #[inline]
    pub fn sequence(&self) -> u64 {
        self.book.sequence()
    }

    /// The store this handle writes to
    pub fn book(&self) -> &'a TopOfBook {
        self.book
    }
}

impl Drop for BookWriter<'_> {
    fn drop(&mut self) {
        self.book.release_writer();
    }
}
