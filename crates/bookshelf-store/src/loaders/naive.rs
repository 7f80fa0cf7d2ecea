//! Naive per-book loader (the N+1 baseline)
//!
//! One statement for the books, then one more per book. Kept deliberately
//! unoptimized: it is the oracle the other loaders are checked against.

#![allow(clippy::result_large_err)]

use super::fetch_books;
use crate::assembler::{reviews_from_rows, ReviewRow};
use crate::errors::Result;
use crate::session::Session;
use bookshelf_core::model::BookWithReviews;

const REVIEWS_FOR_BOOK_SQL: &str =
    "SELECT book_id, rating, comment FROM reviews WHERE book_id = ?1 ORDER BY id";

/// Load every book, querying its reviews separately (`1 + N` round trips)
pub fn load_naive(session: &Session<'_>) -> Result<Vec<BookWithReviews>> {
    let books = fetch_books(session)?;

    let mut shelf = Vec::with_capacity(books.len());
    for book in books {
        let rows = session.query(REVIEWS_FOR_BOOK_SQL, [book.id], ReviewRow::from_row)?;
        shelf.push(BookWithReviews::new(book, reviews_from_rows(rows)?));
    }

    Ok(shelf)
}
