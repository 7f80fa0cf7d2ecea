//! Batched IN-query loader
//!
//! Two statements regardless of the number of books: the books, then every
//! review whose `book_id` is in the fetched id set. Grouping happens in
//! memory. The id set travels as one JSON array parameter expanded by
//! `json_each`, so the statement never approaches SQLite's bound-parameter
//! ceiling however many books there are.

#![allow(clippy::result_large_err)]

use super::fetch_books;
use crate::assembler::{group_reviews, ReviewRow};
use crate::errors::Result;
use crate::session::Session;
use bookshelf_core::model::BookWithReviews;

const REVIEWS_IN_SQL: &str = "SELECT book_id, rating, comment FROM reviews
    WHERE book_id IN (SELECT value FROM json_each(?1))
    ORDER BY id";

/// Load every book and all of their reviews in at most two round trips
pub fn load_batched(session: &Session<'_>) -> Result<Vec<BookWithReviews>> {
    let books = fetch_books(session)?;

    // No ids, no reviews; skip the second statement
    if books.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i64> = books.iter().map(|b| b.id).collect();
    let id_set = serde_json::to_string(&ids)?;
    let rows = session.query(REVIEWS_IN_SQL, [id_set], ReviewRow::from_row)?;

    group_reviews(books, rows)
}
